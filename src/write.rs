// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Serializing values back to text, either on a single line or
//! pretty-printed in blocks.
//!
//! Pretty printing works in two passes: first each list longer than
//! `Layout::block_min_length` is broken up, one element per line,
//! with the closing parenthesis on its own line; then short lines are
//! folded back onto the previous line.

use crate::classify::classify_atom;
use crate::settings::{Format, Settings};
use crate::value::{Value, Atom, Quote};
use crate::rdf::Iri;
use kstring::KString;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::trace;

/// What IRIs may be abbreviated with: prefix name (without the
/// colon) to namespace, and the base IRI.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub prefixes: BTreeMap<KString, KString>,
    pub base: Option<KString>,
}

/// `s` in the given quotes, with escapes.
pub fn quote_string(s: &str, quote: Quote) -> String {
    let q = quote.char();
    let mut out = String::with_capacity(s.len() + 2);
    out.push(q);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            _ if c == q => {
                out.push('\\');
                out.push(c);
            }
            _ if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            _ => out.push(c)
        }
    }
    out.push(q);
    out
}

/// Whether `s` written bare would read back as something other than
/// this symbol: a number, a nil or boolean spelling, a comment, a
/// string or another prefixed syntax.
fn symbol_needs_pipes(s: &str, format: &Format) -> bool {
    s.is_empty()
        || s.chars().any(|c| c.is_whitespace() || "()[]|\\".contains(c))
        || s.starts_with(|c: char| "'#;\"".contains(c))
        || [format.nil, format.true_, format.false_].iter()
            .any(|spelling| s.eq_ignore_ascii_case(spelling))
        || !matches!(classify_atom(s), Ok(Value::Atom(Atom::Symbol(_))))
}

fn write_symbol(s: &str, format: &Format, out: &mut String) {
    if symbol_needs_pipes(s, format) {
        out.push('|');
        for c in s.chars() {
            if c == '|' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('|');
    } else {
        out.push_str(s);
    }
}

fn write_atom(a: &Atom, format: &Format, out: &mut String) {
    match a {
        Atom::Nil => out.push_str(format.nil),
        Atom::Bool(true) => out.push_str(format.true_),
        Atom::Bool(false) => out.push_str(format.false_),
        Atom::Char(c) => {
            out.push_str("#\\");
            match format.char2name(*c) {
                Some(name) => out.push_str(name),
                None => out.push(*c)
            }
        }
        Atom::String(s, quote) => out.push_str(&quote_string(s, *quote)),
        Atom::Symbol(s) => write_symbol(s, format, out),
        Atom::Number(n) => out.push_str(&n.to_string()),
    }
}

/// The `(base <iri> body...)` and `(prefix (defs) body...)` forms
/// change the context for their body.
enum Shape<'v> {
    Base(&'v Iri),
    Prefix(&'v [Value]),
    Plain,
}

fn shape(items: &[Value]) -> Shape<'_> {
    if items.len() < 3 {
        return Shape::Plain
    }
    match items[0].as_symbol() {
        Some("base") => match items[1].as_term::<Iri>() {
            Some(iri) => Shape::Base(iri),
            None => Shape::Plain,
        },
        Some("prefix") => match items[1].as_list() {
            Some(defs) => Shape::Prefix(defs),
            None => Shape::Plain,
        },
        _ => Shape::Plain
    }
}

impl RenderContext {
    fn with_base(&self, iri: &Iri) -> RenderContext {
        RenderContext {
            prefixes: self.prefixes.clone(),
            base: Some(iri.iri.clone()),
        }
    }

    fn with_prefixes(&self, defs: &[Value]) -> RenderContext {
        let mut ctx = self.clone();
        for def in defs {
            if let Some([name, ns]) = def.as_list() {
                if let (Some(name), Some(ns)) = (name.as_symbol(), ns.as_term::<Iri>()) {
                    let name = name.strip_suffix(':').unwrap_or(name);
                    ctx.prefixes.insert(KString::from_ref(name), ns.iri.clone());
                }
            }
        }
        ctx
    }

    /// The context in effect for the elements after the first two of
    /// a list, or `None` if the list does not change it.
    fn for_body(&self, items: &[Value]) -> Option<RenderContext> {
        match shape(items) {
            Shape::Base(iri) => Some(self.with_base(iri)),
            Shape::Prefix(defs) => Some(self.with_prefixes(defs)),
            Shape::Plain => None
        }
    }
}

fn write_items(items: &[Value], format: &Format, ctx: &RenderContext, out: &mut String) {
    let body_ctx = ctx.for_body(items);
    let empty = RenderContext::default();
    for (i, v) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let c = match (&body_ctx, i) {
            (None, _) => ctx,
            (Some(_), 0..=1) => &empty,
            (Some(b), _) => b,
        };
        write_compact(v, format, c, out);
    }
}

fn write_compact(v: &Value, format: &Format, ctx: &RenderContext, out: &mut String) {
    match v {
        Value::Atom(a) => write_atom(a, format, out),
        Value::List(items) => {
            out.push('(');
            write_items(items, format, ctx, out);
            out.push(')');
        }
        Value::Vector(items) => {
            out.push_str("#(");
            write_items(items, format, ctx, out);
            out.push(')');
        }
        Value::Term(t) => out.push_str(&t.to_sxp(ctx)),
    }
}

/// Single line rendering of `v`.
pub fn to_sxp(v: &Value, format: &Format, ctx: &RenderContext) -> String {
    let mut out = String::new();
    write_compact(v, format, ctx, &mut out);
    out
}


// ---- Block layout ------------------------------------------------------

enum Block {
    Atom(String),
    List(Vec<Block>),
}

impl Block {
    fn build(v: &Value, format: &Format, ctx: &RenderContext) -> Block {
        match v {
            Value::List(items) => {
                let body_ctx = ctx.for_body(items);
                let empty = RenderContext::default();
                Block::List(items.iter().enumerate().map(|(i, item)| {
                    let c = match (&body_ctx, i) {
                        (None, _) => ctx,
                        (Some(_), 0..=1) => &empty,
                        (Some(b), _) => b,
                    };
                    Block::build(item, format, c)
                }).collect())
            }
            _ => Block::Atom(to_sxp(v, format, ctx))
        }
    }

    /// Length of the compact rendering, in characters.
    fn length(&self) -> usize {
        match self {
            Block::Atom(s) => s.chars().count(),
            Block::List(bs) => {
                let inner: usize = bs.iter().map(Block::length).sum();
                inner + bs.len().saturating_sub(1) + 2
            }
        }
    }

    fn compact(&self, out: &mut String) {
        match self {
            Block::Atom(s) => out.push_str(s),
            Block::List(bs) => {
                out.push('(');
                for (i, b) in bs.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    b.compact(out);
                }
                out.push(')');
            }
        }
    }

    fn formatted(&self, indent: usize, layout_min: usize, lines: &mut Vec<String>) {
        let mut line = " ".repeat(indent);
        match self {
            Block::List(bs) if !bs.is_empty() && self.length() > layout_min => {
                trace!(indent, length = self.length(), "block layout");
                line.push('(');
                let rest = match &bs[0] {
                    Block::Atom(s) => {
                        line.push_str(s);
                        &bs[1..]
                    }
                    Block::List(_) => &bs[..]
                };
                lines.push(line);
                for b in rest {
                    b.formatted(indent + 1, layout_min, lines);
                }
                lines.push(format!("{})", " ".repeat(indent)));
            }
            _ => {
                self.compact(&mut line);
                lines.push(line);
            }
        }
    }
}

/// Join lines that don't start a list onto the previous line while
/// that stays shorter than `max`. Closing parens always join the
/// previous line, without a space.
fn fold(lines: &[String], max: usize) -> String {
    let mut out = String::new();
    let mut prev_length = 0;
    for line in lines {
        // Trailing whitespace belongs to a `#\` character atom.
        let stripped = line.trim_start();
        let len = stripped.chars().count();
        if out.is_empty() {
            out.push_str(line);
            prev_length = line.chars().count();
        } else if stripped.starts_with(')') {
            out.push_str(stripped);
            prev_length += len;
        } else if !stripped.starts_with('(') && prev_length + len + 1 < max {
            out.push(' ');
            out.push_str(stripped);
            prev_length += len + 1;
        } else {
            out.push('\n');
            out.push_str(line);
            prev_length = line.chars().count();
        }
    }
    out.push('\n');
    out
}

/// Renders values to a byte sink, one top-level form after another.
pub struct Writer<'t, W: Write> {
    out: W,
    settings: &'t Settings<'t>,
    ctx: RenderContext,
}

impl<'t, W: Write> Writer<'t, W> {
    pub fn new(out: W, settings: &'t Settings<'t>) -> Self {
        Writer { out, settings, ctx: RenderContext::default() }
    }

    /// Abbreviate IRIs with these prefixes and base from the start.
    pub fn with_context(mut self, ctx: RenderContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// The text for one top-level form, including the final newline.
    pub fn format(&self, v: &Value) -> String {
        let layout = self.settings.layout;
        let block = Block::build(v, self.settings.format, &self.ctx);
        if block.length() > layout.pretty_threshold {
            let mut lines = Vec::new();
            block.formatted(0, layout.block_min_length, &mut lines);
            fold(&lines, layout.block_min_length)
        } else {
            let mut s = String::new();
            block.compact(&mut s);
            s.push('\n');
            s
        }
    }

    pub fn render(&mut self, v: &Value) -> Result<(), std::io::Error> {
        let s = self.format(v);
        self.out.write_all(s.as_bytes())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn write_all<'v>(
    out: impl Write,
    vals: impl IntoIterator<Item = &'v Value>,
    settings: &Settings,
) -> Result<(), std::io::Error> {
    let mut w = Writer::new(out, settings);
    for v in vals {
        w.render(v)?;
    }
    Ok(())
}

pub fn to_string_pretty<'v>(
    vals: impl IntoIterator<Item = &'v Value>,
    settings: &Settings,
) -> String {
    let w = Writer::new(std::io::sink(), settings);
    vals.into_iter().map(|v| w.format(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{SCHEME_FORMAT, COMMON_LISP_FORMAT};
    use crate::value::{symbol, string, integer, float, character};
    use crate::number::Number;

    fn compact(v: &Value) -> String {
        to_sxp(v, &SCHEME_FORMAT, &RenderContext::default())
    }

    #[test]
    fn atoms() {
        assert_eq!(compact(&Value::nil()), "#n");
        assert_eq!(compact(&true.into()), "#t");
        assert_eq!(compact(&integer(-12)), "-12");
        assert_eq!(compact(&Number::rational(4, 2).into()), "2/1");
        assert_eq!(compact(&float(1.0)), "1.0");
        assert_eq!(compact(&float(f64::NEG_INFINITY)), "-inf.");
        assert_eq!(compact(&character(' ')), "#\\space");
        assert_eq!(compact(&character('x')), "#\\x");
        assert_eq!(compact(&symbol("a b")), "|a b|");
        assert_eq!(compact(&symbol("")), "||");
        assert_eq!(compact(&string("a\"\n")), "\"a\\\"\\n\"");
        assert_eq!(compact(&Value::Atom(Atom::String("it's".into(), Quote::Single))),
                   "'it\\'s'");
        assert_eq!(to_sxp(&Value::nil(), &COMMON_LISP_FORMAT, &RenderContext::default()),
                   "nil");
        assert_eq!(compact(&Value::Vector(vec![integer(1), symbol("a")])), "#(1 a)");
        assert_eq!(compact(&Value::List(vec![])), "()");
    }

    #[test]
    fn symbols_that_read_as_something_else() {
        let cl = |s: &str| to_sxp(&symbol(s), &COMMON_LISP_FORMAT, &RenderContext::default());
        for (s, written) in [("1", "|1|"), ("T", "|T|"), ("nil", "|nil|"), ("'a", "|'a|"),
                             (";a", "|;a|"), ("#x", "|#x|"), ("\"a", "|\"a|"),
                             ("a\\b", "|a\\\\b|"), ("-1/2", "|-1/2|")] {
            assert_eq!(cl(s), written);
        }
        for s in ["1+", "a'b", ".", "tea", "a#b"] {
            assert_eq!(cl(s), s);
        }
        assert_eq!(compact(&symbol("#n")), "|#n|");
    }

    #[test]
    fn control_chars_are_escaped() {
        assert_eq!(quote_string("\x01\t", Quote::Double), "\"\\u0001\\t\"");
    }

    #[test]
    fn folding() {
        let lines: Vec<String> = ["(a", " b", " (c", "  d", " )", ")"]
            .iter().map(|s| s.to_string()).collect();
        assert_eq!(fold(&lines, 80), "(a b\n (c d))\n");
    }
}
