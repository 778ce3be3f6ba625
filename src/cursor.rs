// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Single character lookahead over a [CharSource](CharSource), with
//! the ability to push back text that was read speculatively.

use crate::chars::CharSource;
use crate::pos::Pos;
use crate::read::{ReadError, ReadErrorWithPos, Expecting};

pub struct CharCursor<I> {
    chars: I,
    /// Stack of characters to deliver before pulling from `chars`;
    /// the last one is next.
    pending: Vec<(char, Pos)>,
    /// Position of the character after the last one consumed
    next_pos: Pos,
    // Generators must not be resumed after they finished.
    exhausted: bool,
}

impl<I: CharSource> CharCursor<I> {
    pub fn new(chars: I) -> Self {
        CharCursor {
            chars,
            pending: Vec::new(),
            next_pos: Pos::START,
            exhausted: false,
        }
    }

    // Make sure `pending` is non-empty unless at EOF.
    fn fill(&mut self) -> Result<(), ReadErrorWithPos> {
        if self.pending.is_empty() && !self.exhausted {
            match self.chars.next() {
                None => self.exhausted = true,
                Some(Err(e)) => {
                    self.exhausted = true;
                    return Err(ReadError::IOError(e).at(self.next_pos))
                }
                Some(Ok(cp)) => self.pending.push(cp),
            }
        }
        Ok(())
    }

    pub fn peek(&mut self) -> Result<Option<char>, ReadErrorWithPos> {
        self.fill()?;
        Ok(self.pending.last().map(|(c, _)| *c))
    }

    /// Consume the next character, `None` at end of input.
    pub fn next_opt(&mut self) -> Result<Option<char>, ReadErrorWithPos> {
        self.fill()?;
        if let Some((c, pos)) = self.pending.pop() {
            self.next_pos = pos.advance(c);
            Ok(Some(c))
        } else {
            Ok(None)
        }
    }

    /// Consume the next character; end of input is an error, with
    /// `expecting` describing what was being read.
    pub fn next(&mut self, expecting: Expecting) -> Result<char, ReadErrorWithPos> {
        let pos = self.pos();
        self.next_opt()?.ok_or_else(|| ReadError::EndOfInput(expecting).at(pos))
    }

    /// Put `text` back so that it is read again next. The text is
    /// assumed to have been read from the current line.
    pub fn push_back(&mut self, text: &str) {
        let mut pos = self.pos();
        for c in text.chars().rev() {
            pos.col = pos.col.saturating_sub(1);
            self.pending.push((c, pos));
        }
    }

    pub fn at_end(&mut self) -> Result<bool, ReadErrorWithPos> {
        Ok(self.peek()?.is_none())
    }

    /// Position of the next character (or of the end of input).
    pub fn pos(&self) -> Pos {
        self.pending.last().map_or(self.next_pos, |(_, pos)| *pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chars::str_chars;

    #[test]
    fn peek_does_not_consume() -> Result<(), ReadErrorWithPos> {
        let mut cur = CharCursor::new(str_chars("ab"));
        assert_eq!(cur.peek()?, Some('a'));
        assert_eq!(cur.peek()?, Some('a'));
        assert_eq!(cur.next_opt()?, Some('a'));
        assert_eq!(cur.pos(), Pos { line: 0, col: 1 });
        assert_eq!(cur.next_opt()?, Some('b'));
        assert!(cur.at_end()?);
        assert_eq!(cur.next_opt()?, None);
        Ok(())
    }

    #[test]
    fn push_back_restores_text_and_positions() -> Result<(), ReadErrorWithPos> {
        let mut cur = CharCursor::new(str_chars("xabc d"));
        cur.next_opt()?;
        for _ in 0..3 {
            cur.next_opt()?;
        }
        cur.push_back("bc");
        assert_eq!(cur.pos(), Pos { line: 0, col: 2 });
        assert_eq!(cur.next(Expecting::Value)?, 'b');
        assert_eq!(cur.next(Expecting::Value)?, 'c');
        assert_eq!(cur.next(Expecting::Value)?, ' ');
        Ok(())
    }

    #[test]
    fn next_at_end_is_end_of_input() {
        let mut cur = CharCursor::new(str_chars(""));
        let e = cur.next(Expecting::Value).unwrap_err();
        assert!(matches!(e.err, ReadError::EndOfInput(Expecting::Value)));
    }
}
