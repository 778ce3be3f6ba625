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
use crate::dialect::basic::{bracket_paren, skip_line_comments};
use crate::read::{Reader, ReadError, ReadErrorWithPos, Token, Expecting};
use crate::settings::{Format, SCHEME_FORMAT};
use crate::value::{Value, Atom};

/// Extended plus sharp syntax: `#t`, `#f`, `#n`, radix integers,
/// `#\` characters, `#;` datum comments and `#!` line comments.
#[derive(Debug, Default, Clone)]
pub struct Scheme;

impl Dialect for Scheme {
    const NAME: &'static str = "scheme";
    const FORMAT: &'static Format = &SCHEME_FORMAT;

    fn paren(c: char) -> Option<Token> {
        bracket_paren(c)
    }

    fn is_atom_char(c: char) -> bool {
        is_bracket_atom_char(c)
    }

    fn skip_trivia<I: CharSource>(
        r: &mut Reader<Self, I>
    ) -> Result<(), ReadErrorWithPos> {
        loop {
            skip_line_comments(r, &[';'])?;
            if r.peek()? != Some('#') {
                return Ok(())
            }
            let pos = r.pos();
            r.next_opt()?;
            match r.peek()? {
                Some(';') => {
                    r.next_opt()?;
                    r.read_nested(pos)?;
                }
                Some('!') => r.skip_line()?,
                _ => {
                    r.push_back("#");
                    return Ok(())
                }
            }
        }
    }

    fn read_token<I: CharSource>(
        r: &mut Reader<Self, I>
    ) -> Result<Token, ReadErrorWithPos> {
        if r.peek()? != Some('#') {
            return r.read_basic_token()
        }
        let pos = r.pos();
        r.next_opt()?;
        let c = r.peek()?.ok_or_else(
            || ReadError::EndOfInput(Expecting::Value).at(r.pos()))?;
        let v = match c {
            '\\' => {
                r.next_opt()?;
                Value::Atom(Atom::Char(r.read_char_literal()?))
            }
            'b' | 'B' => { r.next_opt()?; r.read_radix_integer(2)? }
            'o' | 'O' => { r.next_opt()?; r.read_radix_integer(8)? }
            'd' | 'D' => { r.next_opt()?; r.read_radix_integer(10)? }
            'x' | 'X' => { r.next_opt()?; r.read_radix_integer(16)? }
            _ if c.is_alphabetic() => {
                let lit = r.read_literal()?;
                match lit.to_lowercase().as_str() {
                    "t" | "true" => Value::Atom(Atom::Bool(true)),
                    "f" | "false" => Value::Atom(Atom::Bool(false)),
                    "n" => Value::Atom(Atom::Nil),
                    _ => return Err(ReadError::InvalidSharpSyntax(c).at(pos))
                }
            }
            _ => return Err(ReadError::InvalidSharpSyntax(c).at(pos))
        };
        Ok(Token::Value(v))
    }
}
