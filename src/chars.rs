// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Character sources for the reader: characters and their positions,
//! either decoded lazily from anything implementing `Read`, or taken
//! from an in-memory string.

use crate::pos::Pos;
use std::io::{self, Read};
use anyhow::{Result, anyhow};
use utf8::BufReadDecoder;
use genawaiter::rc::Gen;

/// Anything the reader can pull characters from.
pub trait CharSource: Iterator<Item = Result<(char, Pos)>> {}

impl<T: Iterator<Item = Result<(char, Pos)>>> CharSource for T {}

/// Lazily decode `fh` as UTF-8, pairing every character with its
/// position. Invalid input is reported once as an error, after which
/// the stream ends.
pub fn buffered_chars<R>(
    fh: R
) -> impl CharSource
    where R: Read
{
    Gen::new(|co| async move {
        let mut inp = BufReadDecoder::new(io::BufReader::new(fh));
        let mut pos = Pos::START;
        loop {
            if let Some(r) = inp.next_strict() {
                match r {
                    Ok(x) => {
                        for c in x.chars() {
                            co.yield_(Ok((c, pos))).await;
                            pos = pos.advance(c);
                        }
                    },
                    Err(e) => {
                        co.yield_(Err(anyhow!("invalid UTF-8 input at {}: {}", pos, e))).await;
                        return;
                    }
                }
            } else {
                return;
            }
        }
    }).into_iter()
}

/// Characters of a private copy of a string, so that pushing
/// characters back never touches the caller's buffer.
#[derive(Debug, Clone)]
pub struct StrChars {
    text: String,
    offset: usize,
    pos: Pos,
}

impl Iterator for StrChars {
    type Item = Result<(char, Pos)>;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.text[self.offset..].chars().next()?;
        self.offset += c.len_utf8();
        let pos = self.pos;
        self.pos = pos.advance(c);
        Some(Ok((c, pos)))
    }
}

pub fn str_chars(s: &str) -> StrChars {
    StrChars {
        text: s.to_owned(),
        offset: 0,
        pos: Pos::START,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_lines() -> Result<()> {
        let cs: Vec<(char, Pos)> = str_chars("a\nbc").collect::<Result<_>>()?;
        assert_eq!(cs, vec![('a', Pos { line: 0, col: 0 }),
                            ('\n', Pos { line: 0, col: 1 }),
                            ('b', Pos { line: 1, col: 0 }),
                            ('c', Pos { line: 1, col: 1 })]);
        Ok(())
    }

    #[test]
    fn buffered_matches_str() -> Result<()> {
        let s = "(λ x)\n;; ü";
        let a: Vec<(char, Pos)> = buffered_chars(s.as_bytes()).collect::<Result<_>>()?;
        let b: Vec<(char, Pos)> = str_chars(s).collect::<Result<_>>()?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let bytes: &[u8] = b"(a \xff)";
        assert!(buffered_chars(bytes).any(|r| r.is_err()));
    }
}
