// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settings for both reading (parsing) and writing (serializing)
//! data.

use crate::value::{Value, Atom};
use kstring::KString;

/// Textual conventions of a dialect that the reader and the writer
/// have to agree on.
#[derive(Debug)]
pub struct Format {
    pub nil: &'static str,
    pub true_: &'static str,
    pub false_: &'static str,
    /// Names accepted after `#\`, matched case-insensitively. When
    /// writing, the first name for a character wins.
    pub char_names: &'static [(&'static str, char)],
}

const SCHEME_CHAR_NAMES: &[(&str, char)] = &[
    ("newline", '\n'),
    ("space", ' '),
];

const COMMON_LISP_CHAR_NAMES: &[(&str, char)] = &[
    ("newline", '\n'),
    ("space", ' '),
    ("backspace", '\x08'),
    ("tab", '\t'),
    ("linefeed", '\n'),
    ("page", '\x0C'),
    ("return", '\r'),
    ("rubout", '\x7F'),
];

pub const BASIC_FORMAT : Format = Format {
    nil: "#n",
    true_: "#t",
    false_: "#f",
    char_names: &[],
};

pub const SCHEME_FORMAT : Format = Format {
    nil: "#n",
    true_: "#t",
    false_: "#f",
    char_names: SCHEME_CHAR_NAMES,
};

pub const COMMON_LISP_FORMAT : Format = Format {
    nil: "nil",
    true_: "t",
    false_: "nil",
    char_names: COMMON_LISP_CHAR_NAMES,
};

// `#` starts a comment in SSE, and booleans are literals there.
pub const SPARQL_FORMAT : Format = Format {
    nil: "nil",
    true_: "true",
    false_: "false",
    char_names: &[],
};

impl Format {
    pub fn name2char(&self, name: &str) -> Option<char> {
        self.char_names.iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, c)| *c)
    }

    pub fn char2name(&self, c: char) -> Option<&'static str> {
        self.char_names.iter()
            .find(|(_, c2)| *c2 == c)
            .map(|(n, _)| *n)
    }
}


#[derive(Debug)]
pub struct Layout {
    /// Top-level forms whose compact rendering is longer than this
    /// go through block layout and folding.
    pub pretty_threshold: usize,
    /// Lists longer than this are broken across lines; folding keeps
    /// lines shorter than this.
    pub block_min_length: usize,
}

pub const DEFAULT_LAYOUT : Layout = Layout {
    pretty_threshold: 40,
    block_min_length: 80,
};

#[derive(Debug)]
pub struct Settings<'t> {
    pub format: &'t Format,
    pub layout: &'t Layout,
}

impl<'t> Settings<'t> {
    pub const fn new(format: &'t Format) -> Settings<'t> {
        Settings {
            format,
            layout: &DEFAULT_LAYOUT,
        }
    }
}


/// Substitutes used by the Common Lisp reader.
#[derive(Debug, Clone)]
pub struct CommonLispOptions {
    /// What `nil` (any case) reads as
    pub nil: Value,
    /// What `t` (any case) reads as
    pub t: Value,
    /// Head symbol for `'x`
    pub quote: KString,
    /// Head symbol for `#'x`
    pub function: KString,
}

impl Default for CommonLispOptions {
    fn default() -> Self {
        CommonLispOptions {
            nil: Value::Atom(Atom::Nil),
            t: Value::Atom(Atom::Bool(true)),
            quote: KString::from_static("quote"),
            function: KString::from_static("function"),
        }
    }
}
