// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Readers and a writer for S-expressions in several dialects.
//!
//! * [`dialect::Basic`](dialect::Basic): round lists, strings,
//!   numbers and symbols.
//! * [`dialect::Extended`](dialect::Extended): adds `[...]` lists and
//!   `;` comments.
//! * [`dialect::Scheme`](dialect::Scheme): adds `#t`/`#f`/`#n`, radix
//!   integers, `#\` characters, `#;` and `#!` comments.
//! * [`dialect::CommonLisp`](dialect::CommonLisp): `|...|` symbols,
//!   `'x` and `#'x`, `#(...)` vectors, `t` and `nil`.
//! * [`dialect::Sparql`](dialect::Sparql): SPARQL S-expressions with
//!   IRIs, literals, blank nodes and variables (see [`rdf`](rdf)).
//!
//! Reading is done by a [`read::Reader`](read::Reader) holding a
//! dialect value, which also carries the state of the session (like
//! the prefixes seen by the SPARQL dialect). Values are written back
//! with [`write::Writer`](write::Writer), either on one line or
//! pretty-printed.
//!
//! ```
//! use sexpdialects::dialect::Scheme;
//! use sexpdialects::read::read_str;
//! use sexpdialects::value::{Value, integer};
//!
//! let v = read_str("(#x10 #b11)", Scheme).unwrap();
//! assert_eq!(v, Value::List(vec![integer(16), integer(3)]));
//! assert_eq!(v.to_string(), "(16 3)");
//! ```

pub mod chars;
pub mod classify;
pub mod cursor;
pub mod dialect;
pub mod list;
pub mod number;
pub mod pos;
pub mod rdf;
pub mod read;
pub mod settings;
pub mod value;
pub mod write;
