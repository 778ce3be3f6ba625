// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The recursive-descent reader. It owns the list structure
//! (matching `(` with `)` and `[` with `]`), while everything about
//! the shape of tokens and atoms is asked from the
//! [Dialect](../dialect/trait.Dialect.html).

use crate::chars::{CharSource, StrChars, buffered_chars, str_chars};
use crate::classify::parse_integer;
use crate::cursor::CharCursor;
use crate::dialect::Dialect;
use crate::pos::Pos;
use crate::value::{Value, Atom, Parenkind, Quote};
use kstring::KString;
use std::io::Read;
use thiserror::Error;
use tracing::debug;

/// What was being read when the input ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expecting {
    Value,
    Close(Parenkind),
    /// Closing delimiter of a string or `|symbol|`
    Delimiter(char),
    Iri,
    Character,
    Escape,
    Datatype,
}

impl std::fmt::Display for Expecting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Expecting::Value => f.write_str("a value"),
            Expecting::Close(pk) => f.write_fmt(format_args!(
                "closing character '{}' for '{}'", pk.closing(), pk.opening())),
            Expecting::Delimiter(c) => f.write_fmt(format_args!(
                "closing delimiter '{}'", c)),
            Expecting::Iri => f.write_str("'>' ending an IRI"),
            Expecting::Character => f.write_str("a character after '#\\'"),
            Expecting::Escape => f.write_str("the rest of an escape sequence"),
            Expecting::Datatype => f.write_str("a datatype after '^^'"),
        }
    }
}

fn expected_closing(expected: &Option<Parenkind>) -> String {
    match expected {
        Some(pk) => format!(", expecting '{}'", pk.closing()),
        None => String::from(" outside of any list"),
    }
}

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("IO error ({0})")]
    IOError(anyhow::Error),
    #[error("unexpected end of input while expecting {0}")]
    EndOfInput(Expecting),
    #[error("unexpected list terminator '{}'{}",
            .got.closing(), expected_closing(.expected))]
    UnexpectedListTerminator {
        expected: Option<Parenkind>,
        got: Parenkind,
    },
    #[error("illegal base-{radix} number syntax: {literal}")]
    MalformedNumber {
        radix: u32,
        literal: KString,
    },
    #[error("invalid sharp-sign read syntax: #{0}")]
    InvalidSharpSyntax(char),
    #[error("invalid symbol syntax: {0}")]
    InvalidSymbolSyntax(KString),
    #[error("not a hex digit: '{0}'")]
    NonHexDigit(char),
    #[error("invalid code point {0}")]
    InvalidCodePoint(u32),
    #[error("nesting too deep")]
    NestingTooDeep,
    #[error("expecting an IRI or prefixed name as datatype, got {0}")]
    InvalidDatatype(KString),
}

#[derive(Error, Debug)]
#[error("{err} {pos}")]
pub struct ReadErrorWithPos {
    pub err: ReadError,
    pub pos: Pos
}

impl ReadError {
    pub fn at(self, p: Pos) -> ReadErrorWithPos {
        ReadErrorWithPos {
            err: self,
            pos: p
        }
    }
}

pub trait At<T> {
    fn at(self, p: Pos) -> Result<T, ReadErrorWithPos>;
}

impl<T> At<T> for Result<T, ReadError> {
    fn at(self, p: Pos) -> Result<T, ReadErrorWithPos> {
        self.map_err(|e| e.at(p))
    }
}

/// What a dialect's `read_token` hands back to the reader.
#[derive(Debug)]
pub enum Token {
    Eof,
    Open(Parenkind),
    Close(Parenkind),
    Value(Value),
}

enum Item {
    Value(Value),
    Close(Parenkind, Pos),
    Eof(Pos),
}

/// The default limit on list nesting
pub const DEFAULT_DEPTH_FUEL: usize = 500;
// ^ the limit with default settings on Linux is around 1200

/// A reading session: the character source, plus the dialect with
/// whatever state it accumulates while parsing (like the prefix
/// table of the SPARQL dialect).
pub struct Reader<D, I> {
    cursor: CharCursor<I>,
    dialect: D,
    /// Currently open lists, innermost last
    open: Vec<Parenkind>,
    /// Prefixes like `'` or `#;` whose datum is being read
    prefixed: usize,
    depth_fuel: usize,
    failed: bool,
}

impl<D: Dialect> Reader<D, StrChars> {
    pub fn from_string(s: &str, dialect: D) -> Self {
        Reader::new(str_chars(s), dialect)
    }
}

impl<D: Dialect, I: CharSource> Reader<D, I> {
    pub fn new(chars: I, dialect: D) -> Self {
        Reader {
            cursor: CharCursor::new(chars),
            dialect,
            open: Vec::new(),
            prefixed: 0,
            depth_fuel: DEFAULT_DEPTH_FUEL,
            failed: false,
        }
    }

    pub fn with_depth_fuel(mut self, depth_fuel: usize) -> Self {
        self.depth_fuel = depth_fuel;
        self
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn dialect_mut(&mut self) -> &mut D {
        &mut self.dialect
    }

    pub fn into_dialect(self) -> D {
        self.dialect
    }

    /// Position of the next character
    pub fn pos(&self) -> Pos {
        self.cursor.pos()
    }

    pub fn peek(&mut self) -> Result<Option<char>, ReadErrorWithPos> {
        self.cursor.peek()
    }

    pub fn next_char(&mut self, expecting: Expecting) -> Result<char, ReadErrorWithPos> {
        self.cursor.next(expecting)
    }

    pub fn next_opt(&mut self) -> Result<Option<char>, ReadErrorWithPos> {
        self.cursor.next_opt()
    }

    pub fn push_back(&mut self, text: &str) {
        self.cursor.push_back(text)
    }

    // ---- Shared token machinery for dialects -------------------------

    pub fn skip_whitespace(&mut self) -> Result<(), ReadErrorWithPos> {
        while let Some(c) = self.cursor.peek()? {
            if !c.is_whitespace() {
                break
            }
            self.cursor.next_opt()?;
        }
        Ok(())
    }

    /// Skip up to and including the next newline.
    pub fn skip_line(&mut self) -> Result<(), ReadErrorWithPos> {
        while let Some(c) = self.cursor.next_opt()? {
            if c == '\n' {
                break
            }
        }
        Ok(())
    }

    /// Read characters while they are atom characters of the
    /// dialect.
    pub fn read_literal(&mut self) -> Result<String, ReadErrorWithPos> {
        let mut out = String::new();
        while let Some(c) = self.cursor.peek()? {
            if !D::is_atom_char(c) {
                break
            }
            out.push(c);
            self.cursor.next_opt()?;
        }
        Ok(out)
    }

    fn read_hex(&mut self, numdigits: u32) -> Result<char, ReadErrorWithPos> {
        let startpos = self.pos();
        let mut code: u32 = 0;
        for _ in 0..numdigits {
            let pos = self.pos();
            let c = self.cursor.next(Expecting::Escape)?;
            let d = c.to_digit(16).ok_or_else(|| ReadError::NonHexDigit(c).at(pos))?;
            code = code * 16 + d;
        }
        char::from_u32(code).ok_or_else(|| ReadError::InvalidCodePoint(code).at(startpos))
    }

    /// The character denoted by a backslash escape in a string, the
    /// backslash having been consumed already.
    pub fn read_escape(&mut self) -> Result<char, ReadErrorWithPos> {
        let c = self.cursor.next(Expecting::Escape)?;
        Ok(match c {
            'b' => '\x08',
            'f' => '\x0C',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => self.read_hex(4)?,
            'U' => self.read_hex(8)?,
            // '"', '\'', '\\' and anything else stand for themselves
            _ => c
        })
    }

    /// Read a string delimited by the next character (which must be
    /// a quote), processing escapes.
    pub fn read_string(&mut self) -> Result<(KString, Quote), ReadErrorWithPos> {
        let startpos = self.pos();
        let delimiter = self.cursor.next(Expecting::Value)?;
        let quote = Quote::from_char(delimiter).unwrap_or_default();
        let mut out = String::new();
        loop {
            match self.cursor.next_opt()? {
                None => return Err(ReadError::EndOfInput(
                    Expecting::Delimiter(delimiter)).at(startpos)),
                Some('\\') => out.push(self.read_escape()?),
                Some(c) if c == delimiter => return Ok((KString::from_string(out), quote)),
                Some(c) => out.push(c),
            }
        }
    }

    /// After `#\`: a named character (names from the dialect's
    /// format, any case), else the first character of the literal,
    /// pushing back the rest.
    pub fn read_char_literal(&mut self) -> Result<char, ReadErrorWithPos> {
        let lit = self.read_literal()?;
        let mut cs = lit.chars();
        if let Some(c0) = cs.next() {
            if let Some(c) = D::FORMAT.name2char(&lit) {
                return Ok(c)
            }
            self.cursor.push_back(cs.as_str());
            Ok(c0)
        } else {
            // `#\ `, `#\(` etc.
            self.cursor.next(Expecting::Character)
        }
    }

    /// After `#b`, `#x` etc.: an integer with the given radix.
    pub fn read_radix_integer(&mut self, radix: u32) -> Result<Value, ReadErrorWithPos> {
        let pos = self.pos();
        let lit = self.read_literal()?;
        match parse_integer(&lit, radix) {
            Some(n) => Ok(Value::Atom(Atom::Number(crate::number::Number::Integer(n)))),
            None => Err(ReadError::MalformedNumber {
                radix,
                literal: KString::from_string(lit)
            }.at(pos))
        }
    }

    /// Tokens common to all dialects: the dialect's parens, strings
    /// in either quote, and literals classified by the dialect.
    pub fn read_basic_token(&mut self) -> Result<Token, ReadErrorWithPos> {
        let pos = self.pos();
        let c = match self.cursor.peek()? {
            None => return Ok(Token::Eof),
            Some(c) => c
        };
        if let Some(t) = D::paren(c) {
            self.cursor.next_opt()?;
            return Ok(t)
        }
        if Quote::from_char(c).is_some() {
            let (s, quote) = self.read_string()?;
            return Ok(Token::Value(Value::Atom(Atom::String(s, quote))))
        }
        let mut lit = self.read_literal()?;
        if lit.is_empty() {
            // A character neither structural nor part of atoms in
            // this dialect; take it alone.
            lit.push(self.cursor.next(Expecting::Value)?);
        }
        Ok(Token::Value(D::read_atom(self, &lit, pos)?))
    }

    // ---- Structure ---------------------------------------------------

    fn read_item(&mut self) -> Result<Item, ReadErrorWithPos> {
        D::skip_trivia(self)?;
        let pos = self.pos();
        match D::read_token(self)? {
            Token::Eof => Ok(Item::Eof(pos)),
            Token::Open(pk) => Ok(Item::Value(Value::List(self.read_list(pk, pos)?))),
            Token::Close(pk) => Ok(Item::Close(pk, pos)),
            Token::Value(v) => Ok(Item::Value(v)),
        }
    }

    fn unexpected_close(&self, got: Parenkind, pos: Pos) -> ReadErrorWithPos {
        ReadError::UnexpectedListTerminator {
            expected: self.open.last().copied(),
            got
        }.at(pos)
    }

    /// Read one complete value, leaving the rest of the input
    /// untouched.
    pub fn read(&mut self) -> Result<Value, ReadErrorWithPos> {
        match self.read_item()? {
            Item::Value(v) => Ok(v),
            Item::Close(pk, pos) => Err(self.unexpected_close(pk, pos)),
            Item::Eof(pos) => Err(ReadError::EndOfInput(Expecting::Value).at(pos)),
        }
    }

    fn check_depth(&self, pos: Pos) -> Result<(), ReadErrorWithPos> {
        if self.open.len() + self.prefixed >= self.depth_fuel {
            Err(ReadError::NestingTooDeep.at(pos))
        } else {
            Ok(())
        }
    }

    /// Read the datum following a prefix such as `'` or `#;` that
    /// started at `startpos`. Counts as one level of nesting.
    pub fn read_nested(&mut self, startpos: Pos) -> Result<Value, ReadErrorWithPos> {
        self.check_depth(startpos)?;
        self.prefixed += 1;
        let result = self.read();
        self.prefixed -= 1;
        result
    }

    /// Read the elements of a list whose opening `pk` (at `startpos`)
    /// has been consumed, up to and including the matching closer.
    pub fn read_list(
        &mut self,
        pk: Parenkind,
        startpos: Pos,
    ) -> Result<Vec<Value>, ReadErrorWithPos> {
        self.check_depth(startpos)?;
        self.open.push(pk);
        let result = self.slurp(pk, startpos);
        self.open.pop();
        result
    }

    fn slurp(
        &mut self,
        pk: Parenkind,
        startpos: Pos,
    ) -> Result<Vec<Value>, ReadErrorWithPos> {
        let mut v = Vec::new();
        loop {
            match self.read_item()? {
                Item::Value(x) => v.push(x),
                Item::Close(got, pos) => {
                    return if got == pk {
                        Ok(v)
                    } else {
                        Err(self.unexpected_close(got, pos))
                    }
                }
                Item::Eof(_) => {
                    return Err(ReadError::EndOfInput(Expecting::Close(pk))
                               .at(startpos))
                }
            }
        }
    }

    /// Read all values up to the end of the input. The first error
    /// ends the whole call.
    pub fn read_all(&mut self) -> Result<Vec<Value>, ReadErrorWithPos> {
        let mut v = Vec::new();
        loop {
            match self.read_item()? {
                Item::Value(x) => v.push(x),
                Item::Close(pk, pos) => return Err(self.unexpected_close(pk, pos)),
                Item::Eof(_) => break,
            }
        }
        debug!(dialect = D::NAME, count = v.len(), "read_all");
        Ok(v)
    }

    /// Whether only trivia (whitespace, comments) is left.
    pub fn at_end(&mut self) -> Result<bool, ReadErrorWithPos> {
        D::skip_trivia(self)?;
        self.cursor.at_end()
    }
}

/// Iterates over the top-level values; stops after the first error.
impl<D: Dialect, I: CharSource> Iterator for Reader<D, I> {
    type Item = Result<Value, ReadErrorWithPos>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None
        }
        let r = match self.read_item() {
            Ok(Item::Value(v)) => Some(Ok(v)),
            Ok(Item::Eof(_)) => None,
            Ok(Item::Close(pk, pos)) => Some(Err(self.unexpected_close(pk, pos))),
            Err(e) => Some(Err(e)),
        };
        if let Some(Err(_)) = r {
            self.failed = true;
        }
        r
    }
}

/// A reader over a byte stream, decoded as UTF-8.
pub fn from_read<D: Dialect>(
    fh: impl Read,
    dialect: D
) -> Reader<D, impl CharSource> {
    Reader::new(buffered_chars(fh), dialect)
}

pub fn read_str<D: Dialect>(s: &str, dialect: D) -> Result<Value, ReadErrorWithPos> {
    Reader::from_string(s, dialect).read()
}

pub fn read_all_str<D: Dialect>(
    s: &str,
    dialect: D
) -> Result<Vec<Value>, ReadErrorWithPos> {
    Reader::from_string(s, dialect).read_all()
}

pub fn read_all<D: Dialect>(
    fh: impl Read,
    dialect: D,
) -> Result<Vec<Value>, ReadErrorWithPos> {
    from_read(fh, dialect).read_all()
}
