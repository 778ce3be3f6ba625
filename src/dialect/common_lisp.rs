// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::chars::CharSource;
use crate::classify::classify_atom;
use crate::dialect::Dialect;
use crate::dialect::basic::skip_line_comments;
use crate::pos::Pos;
use crate::read::{Reader, ReadError, ReadErrorWithPos, Token, Expecting, At};
use crate::settings::{CommonLispOptions, Format, COMMON_LISP_FORMAT};
use crate::value::{Value, Atom, Parenkind};
use kstring::KString;

/// Round lists only, `;` comments, `|...|` symbols, `'x` and `#'x`
/// shorthands, `#(...)` vectors, and `t`/`nil` atoms.
#[derive(Debug, Default, Clone)]
pub struct CommonLisp {
    pub options: CommonLispOptions,
}

impl CommonLisp {
    pub fn new(options: CommonLispOptions) -> Self {
        CommonLisp { options }
    }
}

fn marker<I: CharSource>(
    r: &mut Reader<CommonLisp, I>,
    head: KString,
    pos: Pos,
) -> Result<Token, ReadErrorWithPos> {
    let v = r.read_nested(pos)?;
    Ok(Token::Value(Value::List(vec![Value::Atom(Atom::Symbol(head)), v])))
}

fn read_pipe_symbol<I: CharSource>(
    r: &mut Reader<CommonLisp, I>,
    pos: Pos,
) -> Result<Value, ReadErrorWithPos> {
    let mut out = String::new();
    r.next_opt()?;
    loop {
        let c = match r.next_opt()? {
            Some('|') => return Ok(Value::Atom(Atom::Symbol(KString::from_string(out)))),
            Some('\\') => r.next_opt()?,
            c => c
        };
        match c {
            Some(c) => out.push(c),
            None => {
                out.insert(0, '|');
                return Err(ReadError::InvalidSymbolSyntax(KString::from_string(out)).at(pos))
            }
        }
    }
}

fn read_sharp<I: CharSource>(
    r: &mut Reader<CommonLisp, I>,
    pos: Pos,
) -> Result<Token, ReadErrorWithPos> {
    r.next_opt()?;
    let v = match r.next_char(Expecting::Value)? {
        'b' | 'B' => r.read_radix_integer(2)?,
        'o' | 'O' => r.read_radix_integer(8)?,
        'x' | 'X' => r.read_radix_integer(16)?,
        '\\' => Value::Atom(Atom::Char(r.read_char_literal()?)),
        '(' => Value::Vector(r.read_list(Parenkind::Round, pos)?),
        '\'' => {
            let head = r.dialect().options.function.clone();
            return marker(r, head, pos)
        }
        c => return Err(ReadError::InvalidSharpSyntax(c).at(pos))
    };
    Ok(Token::Value(v))
}

impl Dialect for CommonLisp {
    const NAME: &'static str = "common-lisp";
    const FORMAT: &'static Format = &COMMON_LISP_FORMAT;

    fn skip_trivia<I: CharSource>(
        r: &mut Reader<Self, I>
    ) -> Result<(), ReadErrorWithPos> {
        skip_line_comments(r, &[';'])
    }

    fn read_token<I: CharSource>(
        r: &mut Reader<Self, I>
    ) -> Result<Token, ReadErrorWithPos> {
        let pos = r.pos();
        match r.peek()? {
            Some('#') => read_sharp(r, pos),
            Some('|') => Ok(Token::Value(read_pipe_symbol(r, pos)?)),
            Some('\'') => {
                r.next_opt()?;
                let head = r.dialect().options.quote.clone();
                marker(r, head, pos)
            }
            _ => r.read_basic_token()
        }
    }

    fn read_atom<I: CharSource>(
        r: &mut Reader<Self, I>,
        literal: &str,
        pos: Pos,
    ) -> Result<Value, ReadErrorWithPos> {
        if literal.eq_ignore_ascii_case("t") {
            Ok(r.dialect().options.t.clone())
        } else if literal.eq_ignore_ascii_case("nil") {
            Ok(r.dialect().options.nil.clone())
        } else {
            classify_atom(literal).at(pos)
        }
    }
}
