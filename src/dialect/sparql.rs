// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! SPARQL S-expressions (SSE): the extended grammar with RDF terms.
//!
//! The dialect value holds the session state: the prefix table and
//! base IRI recorded from `(prefix ...)` and `(base ...)` forms, and
//! the blank nodes and variables seen so far, so that every mention
//! of `_:b` or `?x` in one session yields the same object.

use crate::chars::CharSource;
use crate::classify::{is_bracket_atom_char, is_decimal, is_double};
use crate::dialect::Dialect;
use crate::dialect::basic::{bracket_paren, skip_line_comments};
use crate::pos::Pos;
use crate::rdf::{Iri, Literal, BlankNode, Variable, resolve, is_relative};
use crate::read::{Reader, ReadError, ReadErrorWithPos, Token, Expecting};
use crate::settings::{Format, SPARQL_FORMAT};
use crate::value::{Value, Atom, symbol};
use crate::write::RenderContext;
use kstring::KString;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

#[derive(Debug, Default)]
pub struct Sparql {
    prefixes: BTreeMap<KString, KString>,
    base: Option<KString>,
    bnodes: HashMap<KString, Value>,
    vars: HashMap<KString, Value>,
    list_depth: usize,
    /// List depth of the definitions of a `prefix` form being read
    prefix_depth: Option<usize>,
    /// Prefix name waiting for its IRI
    parsed_prefix: Option<KString>,
    /// `base` was seen, the next IRI is the new base
    parsed_base: bool,
    fresh: usize,
}

impl Sparql {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a base IRI in scope.
    pub fn with_base(base: &str) -> Self {
        Sparql { base: Some(KString::from_ref(base)), ..Self::default() }
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// The namespace bound to `name` (given without the colon).
    pub fn prefix(&self, name: &str) -> Option<&str> {
        self.prefixes.get(name).map(|ns| ns.as_str())
    }

    pub fn prefixes(&self) -> &BTreeMap<KString, KString> {
        &self.prefixes
    }

    pub fn define_prefix(&mut self, name: &str, namespace: &str) {
        self.prefixes.insert(KString::from_ref(name), KString::from_ref(namespace));
    }

    /// A context to write with that abbreviates IRIs the way they
    /// could be read in this session.
    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            prefixes: self.prefixes.clone(),
            base: self.base.clone(),
        }
    }

    fn blank_node(&mut self, id: &str) -> Value {
        if id.is_empty() {
            let id = loop {
                let id = format!("b{}", self.fresh);
                self.fresh += 1;
                if !self.bnodes.contains_key(id.as_str()) {
                    break id
                }
            };
            return Value::term(BlankNode { id: KString::from_string(id) })
        }
        self.bnodes.entry(KString::from_ref(id))
            .or_insert_with(|| Value::term(BlankNode { id: KString::from_ref(id) }))
            .clone()
    }

    fn variable(&mut self, name: &str, distinguished: bool, existential: bool) -> Value {
        if name.is_empty() {
            let name = loop {
                let name = format!("_g{}", self.fresh);
                self.fresh += 1;
                if !self.vars.contains_key(name.as_str()) {
                    break name
                }
            };
            return Value::term(Variable {
                name: KString::from_string(name),
                distinguished,
                existential,
            })
        }
        self.vars.entry(KString::from_ref(name))
            .or_insert_with(|| Value::term(Variable {
                name: KString::from_ref(name),
                distinguished,
                existential,
            }))
            .clone()
    }

    /// Track list depth to know when a prefix definition region
    /// ends.
    fn saw_paren(&mut self, tok: &Token) {
        match tok {
            Token::Open(_) => self.list_depth += 1,
            Token::Close(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.prefix_depth.map_or(false, |d| self.list_depth < d) {
                    self.prefix_depth = None;
                }
            }
            _ => {}
        }
    }

    /// Symbols can name a prefix being defined, start a prefix form,
    /// or be prefixed names to expand.
    fn classify_symbol(&mut self, s: &KString) -> Value {
        if self.prefix_depth.is_some() {
            if let Some(name) = s.strip_suffix(':') {
                self.parsed_prefix = Some(KString::from_ref(name));
                return Value::Atom(Atom::Symbol(s.clone()))
            }
        }
        if s.eq_ignore_ascii_case("prefix") {
            self.prefix_depth = Some(self.list_depth + 1);
        } else if let Some((name, suffix)) = s.split_once(':') {
            if let Some(ns) = self.prefixes.get(name) {
                let suffix = if ns.contains('#') {
                    suffix.strip_prefix('#').unwrap_or(suffix)
                } else {
                    suffix
                };
                return Value::term(Iri::with_lexical(&format!("{ns}{suffix}"), s))
            }
        }
        Value::Atom(Atom::Symbol(s.clone()))
    }

    fn iri(&mut self, raw: &str) -> Value {
        let iri = match &self.base {
            Some(base) if is_relative(raw) =>
                Iri::with_lexical(&resolve(base, raw), &format!("<{raw}>")),
            _ => Iri::new(raw)
        };
        if self.parsed_base {
            trace!(base = %iri.iri, "base");
            self.base = Some(iri.iri.clone());
            self.parsed_base = false;
        }
        if let Some(name) = self.parsed_prefix.take() {
            trace!(prefix = %name, namespace = %iri.iri, "prefix");
            self.prefixes.insert(name, iri.iri.clone());
        }
        Value::term(iri)
    }
}

fn read_iri<I: CharSource>(
    r: &mut Reader<Sparql, I>,
    pos: Pos,
) -> Result<Value, ReadErrorWithPos> {
    r.next_opt()?;
    match r.peek()? {
        None => return Ok(symbol("<")),
        Some(c) if !Sparql::is_atom_char(c) => return Ok(symbol("<")),
        Some('=') => {
            r.next_opt()?;
            return Ok(symbol("<="))
        }
        _ => {}
    }
    let mut raw = String::new();
    loop {
        match r.next_opt()? {
            None => return Err(ReadError::EndOfInput(Expecting::Iri).at(pos)),
            Some('>') => break,
            Some(c) => raw.push(c),
        }
    }
    Ok(r.dialect_mut().iri(&raw))
}

fn read_datatype<I: CharSource>(
    r: &mut Reader<Sparql, I>,
) -> Result<Iri, ReadErrorWithPos> {
    let pos = r.pos();
    match Sparql::read_token(r)? {
        Token::Value(v) => {
            if let Some(iri) = v.as_term::<Iri>() {
                Ok(iri.clone())
            } else if let Some(s) = v.as_symbol() {
                Ok(Iri::new(s))
            } else {
                Err(ReadError::InvalidDatatype(KString::from_string(v.to_string())).at(pos))
            }
        }
        Token::Eof => Err(ReadError::EndOfInput(Expecting::Datatype).at(pos)),
        Token::Open(pk) =>
            Err(ReadError::InvalidDatatype(KString::from_string(pk.opening().to_string())).at(pos)),
        Token::Close(pk) =>
            Err(ReadError::InvalidDatatype(KString::from_string(pk.closing().to_string())).at(pos)),
    }
}

fn read_rdf_literal<I: CharSource>(
    r: &mut Reader<Sparql, I>,
) -> Result<Value, ReadErrorWithPos> {
    let (value, quote) = r.read_string()?;
    let mut lit = Literal::plain(&value, quote);
    match r.peek()? {
        Some('@') => {
            r.next_opt()?;
            lit.language = Some(KString::from_string(r.read_literal()?.to_lowercase()));
        }
        Some('^') => {
            let pos = r.pos();
            r.next_opt()?;
            match r.next_char(Expecting::Datatype)? {
                '^' => lit.datatype = Some(read_datatype(r)?),
                c => return Err(ReadError::InvalidDatatype(
                    KString::from_string(format!("^{c}"))).at(pos))
            }
        }
        _ => {}
    }
    Ok(Value::term(lit))
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl Dialect for Sparql {
    const NAME: &'static str = "sparql";
    const FORMAT: &'static Format = &SPARQL_FORMAT;

    fn paren(c: char) -> Option<Token> {
        bracket_paren(c)
    }

    fn is_atom_char(c: char) -> bool {
        is_bracket_atom_char(c)
    }

    fn skip_trivia<I: CharSource>(
        r: &mut Reader<Self, I>
    ) -> Result<(), ReadErrorWithPos> {
        skip_line_comments(r, &[';', '#'])
    }

    fn read_token<I: CharSource>(
        r: &mut Reader<Self, I>
    ) -> Result<Token, ReadErrorWithPos> {
        let pos = r.pos();
        match r.peek()? {
            Some('"') | Some('\'') => Ok(Token::Value(read_rdf_literal(r)?)),
            Some('<') => Ok(Token::Value(read_iri(r, pos)?)),
            _ => {
                let tok = r.read_basic_token()?;
                let d = r.dialect_mut();
                d.saw_paren(&tok);
                Ok(match tok {
                    Token::Value(Value::Atom(Atom::Symbol(s))) => Token::Value(d.classify_symbol(&s)),
                    tok => tok
                })
            }
        }
    }

    fn read_atom<I: CharSource>(
        r: &mut Reader<Self, I>,
        literal: &str,
        _pos: Pos,
    ) -> Result<Value, ReadErrorWithPos> {
        let d = r.dialect_mut();
        let lower = literal.to_ascii_lowercase();
        Ok(match literal {
            "." => symbol(literal),
            "a" => Value::term(Iri::rdf_type()),
            _ if lower == "base" => {
                d.parsed_base = true;
                symbol(literal)
            }
            _ if lower == "nil" => Value::nil(),
            _ if lower == "true" => Value::term(Literal::boolean(true)),
            _ if lower == "false" => Value::term(Literal::boolean(false)),
            _ if is_double(literal) => Value::term(Literal::double(literal)),
            _ if is_decimal(literal) => Value::term(Literal::decimal(literal)),
            _ if is_integer(literal) => Value::term(Literal::integer(literal)),
            _ => {
                if let Some(id) = literal.strip_prefix("_:") {
                    d.blank_node(id)
                } else if let Some(rest) = literal.strip_prefix('?') {
                    match rest.strip_prefix(|c: char| c == '?' || c == '.') {
                        Some(name) => d.variable(name, false, false),
                        None => d.variable(rest, true, false),
                    }
                } else if let Some(rest) = literal.strip_prefix('$') {
                    match rest.strip_prefix(|c: char| c == '$' || c == '.') {
                        Some(name) => d.variable(name, false, true),
                        None => d.variable(rest, true, true),
                    }
                } else {
                    symbol(literal)
                }
            }
        })
    }
}
