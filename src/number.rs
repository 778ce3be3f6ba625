// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use num::{BigInt, BigRational};

#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(BigInt),
    // Boxing since Ratio<BigInt> is two BigInts.
    Rational(Box<BigRational>),
    Float(f64),
}

impl Number {
    pub fn integer(n: impl Into<BigInt>) -> Number {
        Number::Integer(n.into())
    }

    /// Panics if `denom` is zero.
    pub fn rational(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> Number {
        Number::Rational(Box::new(BigRational::new(numer.into(), denom.into())))
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Number::Integer(n) => f.write_fmt(format_args!("{}", n)),
            // Always with the slash, even when the denominator is 1,
            // so that it reads back as a rational.
            Number::Rational(r) => f.write_fmt(format_args!("{}/{}", r.numer(), r.denom())),
            Number::Float(x) => {
                if x.is_nan() {
                    f.write_str("nan.")
                } else if x.is_infinite() {
                    f.write_str(if *x > 0. { "+inf." } else { "-inf." })
                } else {
                    // Display never uses exponent notation, and is
                    // the shortest text that reads back identically.
                    let s = x.to_string();
                    if s.contains('.') {
                        f.write_str(&s)
                    } else {
                        f.write_fmt(format_args!("{}.0", s))
                    }
                }
            }
        }
    }
}
