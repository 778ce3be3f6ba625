// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::chars::CharSource;
use crate::classify::is_bracket_atom_char;
use crate::dialect::Dialect;
use crate::read::{Reader, ReadErrorWithPos, Token};
use crate::settings::{Format, BASIC_FORMAT};
use crate::value::Parenkind;

/// The minimal grammar: round lists, strings, numbers and symbols.
#[derive(Debug, Default, Clone)]
pub struct Basic;

impl Dialect for Basic {
    const NAME: &'static str = "basic";
    const FORMAT: &'static Format = &BASIC_FORMAT;
}

/// Basic plus `[...]` lists and `;` line comments.
#[derive(Debug, Default, Clone)]
pub struct Extended;

pub(super) fn bracket_paren(c: char) -> Option<Token> {
    match c {
        '(' => Some(Token::Open(Parenkind::Round)),
        ')' => Some(Token::Close(Parenkind::Round)),
        '[' => Some(Token::Open(Parenkind::Square)),
        ']' => Some(Token::Close(Parenkind::Square)),
        _ => None
    }
}

/// Skip whitespace, and lines starting with one of `comment_starts`.
pub(super) fn skip_line_comments<D: Dialect, I: CharSource>(
    r: &mut Reader<D, I>,
    comment_starts: &[char],
) -> Result<(), ReadErrorWithPos> {
    loop {
        r.skip_whitespace()?;
        match r.peek()? {
            Some(c) if comment_starts.contains(&c) => r.skip_line()?,
            _ => return Ok(())
        }
    }
}

impl Dialect for Extended {
    const NAME: &'static str = "extended";
    const FORMAT: &'static Format = &BASIC_FORMAT;

    fn paren(c: char) -> Option<Token> {
        bracket_paren(c)
    }

    fn is_atom_char(c: char) -> bool {
        is_bracket_atom_char(c)
    }

    fn skip_trivia<I: CharSource>(
        r: &mut Reader<Self, I>
    ) -> Result<(), ReadErrorWithPos> {
        skip_line_comments(r, &[';'])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::{read_str, read_all_str, ReadError};
    use crate::value::{Value, symbol, integer};

    #[test]
    fn basic_has_no_brackets_or_comments() -> Result<(), ReadErrorWithPos> {
        assert_eq!(read_str("[a]", Basic)?, symbol("[a]"));
        assert_eq!(read_all_str("(a ;b)", Basic)?,
                   vec![Value::List(vec![symbol("a"), symbol(";b")])]);
        Ok(())
    }

    #[test]
    fn extended_brackets_and_comments() -> Result<(), ReadErrorWithPos> {
        assert_eq!(read_all_str("; hi\n[1 (2)] ; done", Extended)?,
                   vec![Value::List(vec![integer(1), Value::List(vec![integer(2)])])]);
        Ok(())
    }

    #[test]
    fn extended_mismatch() {
        let e = read_all_str("[1 2)", Extended).unwrap_err();
        assert!(matches!(e.err, ReadError::UnexpectedListTerminator {
            expected: Some(Parenkind::Square),
            got: Parenkind::Round
        }));
    }
}
