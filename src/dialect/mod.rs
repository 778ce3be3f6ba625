// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Dialects plug into the [Reader](../read/struct.Reader.html) at a
//! few hook points. The reader keeps the list structure and calls
//! back into the dialect for trivia, tokens and atoms; the dialect
//! value itself is the mutable state of a reading session.
//!
//! The defaults of the trait implement the basic grammar: round
//! parentheses, strings in either quote, and numbers or symbols for
//! everything else.

mod basic;
mod common_lisp;
mod scheme;
mod sparql;

pub use basic::{Basic, Extended};
pub use common_lisp::CommonLisp;
pub use scheme::Scheme;
pub use sparql::Sparql;

use crate::chars::CharSource;
use crate::classify::{classify_atom, is_round_atom_char};
use crate::pos::Pos;
use crate::read::{Reader, ReadErrorWithPos, Token, At};
use crate::settings::Format;
use crate::value::{Value, Parenkind};

pub trait Dialect: Sized {
    /// For diagnostics
    const NAME: &'static str;
    /// Spellings shared with the writer, e.g. character names.
    const FORMAT: &'static Format;

    /// The list token that `c` stands for, if any.
    fn paren(c: char) -> Option<Token> {
        match c {
            '(' => Some(Token::Open(Parenkind::Round)),
            ')' => Some(Token::Close(Parenkind::Round)),
            _ => None
        }
    }

    /// Whether `c` continues a literal atom.
    fn is_atom_char(c: char) -> bool {
        is_round_atom_char(c)
    }

    /// Skip whitespace and comments.
    fn skip_trivia<I: CharSource>(
        r: &mut Reader<Self, I>
    ) -> Result<(), ReadErrorWithPos> {
        r.skip_whitespace()
    }

    /// Read the next token; trivia has been skipped already.
    fn read_token<I: CharSource>(
        r: &mut Reader<Self, I>
    ) -> Result<Token, ReadErrorWithPos> {
        r.read_basic_token()
    }

    /// Turn the text of a literal atom starting at `pos` into a value.
    fn read_atom<I: CharSource>(
        _r: &mut Reader<Self, I>,
        literal: &str,
        pos: Pos,
    ) -> Result<Value, ReadErrorWithPos> {
        classify_atom(literal).at(pos)
    }
}
