// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The RDF terms produced by the SPARQL dialect. Just enough to
//! carry what was read and to write it back: no datatype semantics.

use crate::classify::{is_decimal, is_double, parse_integer};
use crate::value::{Term, Quote};
use crate::write::{RenderContext, quote_string};
use kstring::KString;
use std::any::Any;

pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

fn term_eq<T: Term + PartialEq + 'static>(this: &T, other: &dyn Term) -> bool {
    other.as_any().downcast_ref::<T>().map_or(false, |o| this == o)
}

/// An IRI reference. `lexical` is the text it was written as (a
/// prefixed name, `a`, or a relative reference); it is kept for
/// writing but does not take part in comparisons.
#[derive(Debug, Clone)]
pub struct Iri {
    pub iri: KString,
    pub lexical: Option<KString>,
}

impl PartialEq for Iri {
    fn eq(&self, other: &Iri) -> bool {
        self.iri == other.iri
    }
}

impl Iri {
    pub fn new(iri: &str) -> Iri {
        Iri { iri: KString::from_ref(iri), lexical: None }
    }

    pub fn with_lexical(iri: &str, lexical: &str) -> Iri {
        Iri { iri: KString::from_ref(iri), lexical: Some(KString::from_ref(lexical)) }
    }

    pub fn xsd(name: &str) -> Iri {
        Iri::new(&format!("{XSD}{name}"))
    }

    /// `rdf:type`, as written with the `a` shorthand.
    pub fn rdf_type() -> Iri {
        Iri::with_lexical(&format!("{RDF}type"), "a")
    }

    fn prefixed_name(&self, ctx: &RenderContext) -> Option<String> {
        ctx.prefixes.iter()
            .filter(|(_, ns)| {
                self.iri.len() > ns.len()
                    && self.iri.starts_with(ns.as_str())
                    && is_safe_local_name(&self.iri[ns.len()..])
            })
            .max_by_key(|(_, ns)| ns.len())
            .map(|(name, ns)| format!("{}:{}", name, &self.iri[ns.len()..]))
    }

    fn relative(&self, ctx: &RenderContext) -> Option<String> {
        let base = ctx.base.as_ref()?;
        if base.contains('#') {
            return None
        }
        let rest = self.iri.strip_prefix(base.as_str())?;
        let plain_segment = base.ends_with('/')
            && !rest.is_empty()
            && !rest.starts_with('.')
            && !rest.contains(|c: char| "/?#:<>".contains(c) || c.is_whitespace());
        if plain_segment || (rest.len() > 1 && rest.starts_with('#')) {
            Some(format!("<{rest}>"))
        } else {
            None
        }
    }
}

fn is_safe_local_name(s: &str) -> bool {
    match s.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => {}
        _ => return false
    }
    !s.ends_with('.')
        && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

impl Term for Iri {
    fn to_sxp(&self, ctx: &RenderContext) -> String {
        if let Some(lexical) = &self.lexical {
            return lexical.to_string()
        }
        self.prefixed_name(ctx)
            .or_else(|| self.relative(ctx))
            .unwrap_or_else(|| format!("<{}>", self.iri))
    }
    fn as_any(&self) -> &dyn Any { self }
    fn term_eq(&self, other: &dyn Term) -> bool { term_eq(self, other) }
}

/// An RDF literal: a string with an optional language tag or
/// datatype. Numbers and booleans keep their lexical form as value.
#[derive(Debug, Clone)]
pub struct Literal {
    pub value: KString,
    pub quote: Quote,
    pub language: Option<KString>,
    pub datatype: Option<Iri>,
}

impl PartialEq for Literal {
    fn eq(&self, other: &Literal) -> bool {
        self.value == other.value
            && self.language == other.language
            && self.datatype == other.datatype
    }
}

impl Literal {
    pub fn plain(value: &str, quote: Quote) -> Literal {
        Literal {
            value: KString::from_ref(value),
            quote,
            language: None,
            datatype: None,
        }
    }

    pub fn typed(value: &str, datatype: Iri) -> Literal {
        Literal { datatype: Some(datatype), ..Literal::plain(value, Quote::Double) }
    }

    pub fn boolean(b: bool) -> Literal {
        Literal::typed(if b { "true" } else { "false" }, Iri::xsd("boolean"))
    }

    pub fn integer(lexical: &str) -> Literal {
        Literal::typed(lexical, Iri::xsd("integer"))
    }

    pub fn decimal(lexical: &str) -> Literal {
        Literal::typed(lexical, Iri::xsd("decimal"))
    }

    pub fn double(lexical: &str) -> Literal {
        Literal::typed(lexical, Iri::xsd("double"))
    }

    /// Whether the value can be written bare and read back as the
    /// same literal.
    fn has_bare_form(&self) -> bool {
        let dt = match &self.datatype {
            Some(dt) => dt,
            None => return false
        };
        let v = self.value.as_str();
        match dt.iri.strip_prefix(XSD) {
            Some("boolean") => v == "true" || v == "false",
            Some("integer") => !v.contains('/') && parse_integer(v, 10).is_some(),
            Some("decimal") => is_decimal(v),
            Some("double") => is_double(v),
            _ => false
        }
    }
}

impl Term for Literal {
    fn to_sxp(&self, ctx: &RenderContext) -> String {
        if self.has_bare_form() {
            return self.value.to_string()
        }
        let mut s = quote_string(&self.value, self.quote);
        if let Some(lang) = &self.language {
            s.push('@');
            s.push_str(lang);
        } else if let Some(dt) = &self.datatype {
            s.push_str("^^");
            s.push_str(&dt.to_sxp(ctx));
        }
        s
    }
    fn as_any(&self) -> &dyn Any { self }
    fn term_eq(&self, other: &dyn Term) -> bool { term_eq(self, other) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlankNode {
    pub id: KString,
}

impl Term for BlankNode {
    fn to_sxp(&self, _ctx: &RenderContext) -> String {
        format!("_:{}", self.id)
    }
    fn as_any(&self) -> &dyn Any { self }
    fn term_eq(&self, other: &dyn Term) -> bool { term_eq(self, other) }
}

/// A query variable. Non-distinguished variables (`??x`) act like
/// blank nodes; existential ones are written with `$`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: KString,
    pub distinguished: bool,
    pub existential: bool,
}

impl Variable {
    pub fn is_distinguished(&self) -> bool {
        self.distinguished
    }

    pub fn is_existential(&self) -> bool {
        self.existential
    }
}

impl Term for Variable {
    fn to_sxp(&self, _ctx: &RenderContext) -> String {
        let sigil = match (self.distinguished, self.existential) {
            (true, false) => "?",
            (true, true) => "$",
            (false, false) => "??",
            (false, true) => "$$",
        };
        format!("{sigil}{}", self.name)
    }
    fn as_any(&self) -> &dyn Any { self }
    fn term_eq(&self, other: &dyn Term) -> bool { term_eq(self, other) }
}


// ---- Reference resolution (RFC 3986 section 5.2) ----------------------

struct Parts<'s> {
    scheme: Option<&'s str>,
    authority: Option<&'s str>,
    path: &'s str,
    query: Option<&'s str>,
    fragment: Option<&'s str>,
}

fn scheme_len(s: &str) -> Option<usize> {
    let end = s.find(':')?;
    let scheme = &s[..end];
    let mut cs = scheme.chars();
    match cs.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return None
    }
    if cs.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.') {
        Some(end)
    } else {
        None
    }
}

fn split(s: &str) -> Parts<'_> {
    let (s, fragment) = match s.split_once('#') {
        Some((a, f)) => (a, Some(f)),
        None => (s, None)
    };
    let (s, query) = match s.split_once('?') {
        Some((a, q)) => (a, Some(q)),
        None => (s, None)
    };
    let (scheme, s) = match scheme_len(s) {
        Some(n) => (Some(&s[..n]), &s[n + 1..]),
        None => (None, s)
    };
    let (authority, path) = match s.strip_prefix("//") {
        Some(rest) => {
            let end = rest.find('/').unwrap_or(rest.len());
            (Some(&rest[..end]), &rest[end..])
        }
        None => (None, s)
    };
    Parts { scheme, authority, path, query, fragment }
}

/// Whether `s` is a relative reference (has no scheme).
pub fn is_relative(s: &str) -> bool {
    let before = s.split(|c: char| c == '/' || c == '?' || c == '#').next().unwrap_or("");
    scheme_len(before).is_none()
}

fn pop_segment(out: &mut String) {
    match out.rfind('/') {
        Some(i) => out.truncate(i),
        None => out.clear()
    }
}

fn remove_dot_segments(path: &str) -> String {
    let mut input = path.to_string();
    let mut out = String::new();
    while !input.is_empty() {
        if input.starts_with("../") {
            input.drain(..3);
        } else if input.starts_with("./") {
            input.drain(..2);
        } else if input.starts_with("/./") {
            input.replace_range(..3, "/");
        } else if input == "/." {
            input = String::from("/");
        } else if input.starts_with("/../") {
            input.replace_range(..4, "/");
            pop_segment(&mut out);
        } else if input == "/.." {
            input = String::from("/");
            pop_segment(&mut out);
        } else if input == "." || input == ".." {
            input.clear();
        } else {
            let start = if input.starts_with('/') { 1 } else { 0 };
            let end = input[start..].find('/').map_or(input.len(), |i| i + start);
            out.push_str(&input[..end]);
            input.drain(..end);
        }
    }
    out
}

fn merge(base: &Parts, path: &str) -> String {
    if base.authority.is_some() && base.path.is_empty() {
        format!("/{path}")
    } else {
        match base.path.rfind('/') {
            Some(i) => format!("{}{}", &base.path[..=i], path),
            None => path.to_string()
        }
    }
}

/// Resolve `reference` against the absolute IRI `base`.
pub fn resolve(base: &str, reference: &str) -> String {
    let b = split(base);
    let r = split(reference);
    let (scheme, authority, path, query);
    if r.scheme.is_some() {
        scheme = r.scheme;
        authority = r.authority;
        path = remove_dot_segments(r.path);
        query = r.query;
    } else {
        scheme = b.scheme;
        if r.authority.is_some() {
            authority = r.authority;
            path = remove_dot_segments(r.path);
            query = r.query;
        } else {
            authority = b.authority;
            if r.path.is_empty() {
                path = b.path.to_string();
                query = r.query.or(b.query);
            } else {
                path = if r.path.starts_with('/') {
                    remove_dot_segments(r.path)
                } else {
                    remove_dot_segments(&merge(&b, r.path))
                };
                query = r.query;
            }
        }
    }
    let mut out = String::new();
    if let Some(s) = scheme {
        out.push_str(s);
        out.push(':');
    }
    if let Some(a) = authority {
        out.push_str("//");
        out.push_str(a);
    }
    out.push_str(&path);
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    if let Some(f) = r.fragment {
        out.push('#');
        out.push_str(f);
    }
    out
}
