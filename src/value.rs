// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runtime data types representing an S-expression value.

//! Whereas [Atom](Atom) does not include lists, [Value](Value) adds
//! lists and vectors implemented using Rust vectors, and terms
//! defined outside of this module (like the RDF terms of the SPARQL
//! dialect) via the [Term](Term) trait.

use crate::number::Number;
use crate::settings::SCHEME_FORMAT;
use crate::write::{to_sxp, RenderContext};
use kstring::KString;
use num::BigInt;
use std::any::Any;
use std::fmt::Debug;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parenkind {
    Round,
    Square,
}

impl Parenkind {
    pub fn opening(self) -> char {
        match self {
            Parenkind::Round => '(',
            Parenkind::Square => '[',
        }
    }
    pub fn closing(self) -> char {
        match self {
            Parenkind::Round => ')',
            Parenkind::Square => ']',
        }
    }
}

/// The quote character a string was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quote {
    #[default]
    Double,
    Single,
}

impl Quote {
    pub fn char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }
    pub fn from_char(c: char) -> Option<Quote> {
        match c {
            '"' => Some(Quote::Double),
            '\'' => Some(Quote::Single),
            _ => None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Nil,
    Bool(bool),
    Char(char),
    String(KString, Quote),
    Symbol(KString),
    Number(Number),
}

/// A value that is not one of the core atoms, e.g. an RDF term. It
/// must know how to render itself, possibly abbreviating with the
/// prefixes and base in `ctx`.
pub trait Term: Debug {
    fn to_sxp(&self, ctx: &RenderContext) -> String;
    fn as_any(&self) -> &dyn Any;
    /// Value equality (not identity, see `Value::same_term`).
    fn term_eq(&self, other: &dyn Term) -> bool;
}

/// Vec-based version of values.
#[derive(Debug, Clone)]
pub enum Value {
    Atom(Atom),
    List(Vec<Value>),
    /// `#(...)` in the Common Lisp dialect
    Vector(Vec<Value>),
    Term(Rc<dyn Term>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Atom(a), Value::Atom(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::Term(a), Value::Term(b)) => a.term_eq(b.as_ref()),
            _ => false
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_str(&to_sxp(self, &SCHEME_FORMAT, &RenderContext::default()))
    }
}

impl Value {
    pub fn nil() -> Value {
        Value::Atom(Atom::Nil)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Atom(Atom::Nil))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Atom(Atom::Symbol(s)) => Some(s),
            _ => None
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None
        }
    }

    pub fn as_term<T: Term + 'static>(&self) -> Option<&T> {
        match self {
            Value::Term(t) => t.as_any().downcast_ref::<T>(),
            _ => None
        }
    }

    /// Whether both values are the very same term object (not just
    /// equal ones).
    pub fn same_term(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Term(a), Value::Term(b)) => Rc::ptr_eq(a, b),
            _ => false
        }
    }

    pub fn term(t: impl Term + 'static) -> Value {
        Value::Term(Rc::new(t))
    }
}

impl From<Atom> for Value {
    fn from(a: Atom) -> Value {
        Value::Atom(a)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Value {
        Value::Atom(Atom::Number(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Atom(Atom::Bool(b))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Value {
        Value::List(v)
    }
}

/// Easily create a symbol
pub fn symbol(s: &str) -> Value {
    Value::Atom(Atom::Symbol(KString::from_ref(s)))
}

/// Easily create a double-quoted string
pub fn string(s: &str) -> Value {
    Value::Atom(Atom::String(KString::from_ref(s), Quote::Double))
}

pub fn integer(n: impl Into<BigInt>) -> Value {
    Value::Atom(Atom::Number(Number::integer(n)))
}

pub fn float(x: f64) -> Value {
    Value::Atom(Atom::Number(Number::Float(x)))
}

pub fn character(c: char) -> Value {
    Value::Atom(Atom::Char(c))
}
