// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Character classes and the literal grammars used to turn the text
//! of an atom into a value.

use crate::number::Number;
use crate::read::ReadError;
use crate::value::{Value, Atom};
use kstring::KString;
use num::{BigInt, BigRational, Zero};

/// Atom characters of dialects with round parentheses only.
pub fn is_round_atom_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')'
}

/// Atom characters of dialects that also have `[...]` lists.
pub fn is_bracket_atom_char(c: char) -> bool {
    is_round_atom_char(c) && c != '[' && c != ']'
}

fn take_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `[+-]?digits` in the given radix (digits case-insensitive).
pub fn parse_integer(s: &str, radix: u32) -> Option<BigInt> {
    let (is_neg, digits) = take_sign(s);
    if digits.is_empty() {
        return None
    }
    let mut n: BigInt = 0.into();
    for c in digits.chars() {
        n = n * radix + c.to_digit(radix)?;
    }
    Some(if is_neg { -n } else { n })
}

/// `[+-]?\d+/\d+`, returning numerator and denominator as written.
pub fn parse_rational(s: &str) -> Option<(BigInt, BigInt)> {
    let (numer, denom) = s.split_once('/')?;
    if !is_digits(take_sign(numer).1) || !is_digits(denom) {
        return None
    }
    Some((parse_integer(numer, 10)?, parse_integer(denom, 10)?))
}

/// `[+-]?\d*\.\d*` with at least one digit.
pub fn is_decimal(s: &str) -> bool {
    let (_, s) = take_sign(s);
    if let Some((int, frac)) = s.split_once('.') {
        (int.is_empty() || is_digits(int))
            && (frac.is_empty() || is_digits(frac))
            && !(int.is_empty() && frac.is_empty())
    } else {
        false
    }
}

/// A decimal followed by a mandatory exponent, `[eE][+-]?\d+`.
pub fn is_double(s: &str) -> bool {
    if let Some(i) = s.find(|c: char| c == 'e' || c == 'E') {
        is_decimal(&s[..i]) && is_digits(take_sign(&s[i+1..]).1)
    } else {
        false
    }
}

/// The spellings the writer uses for non-finite floats.
pub fn parse_special_float(s: &str) -> Option<f64> {
    match s {
        "nan." => Some(f64::NAN),
        "+inf." => Some(f64::INFINITY),
        "-inf." => Some(f64::NEG_INFINITY),
        _ => None
    }
}

/// The numeric tower shared by the Lisp-like dialects: rationals,
/// decimals and base 10 integers.
pub fn parse_number(s: &str) -> Result<Option<Number>, ReadError> {
    if let Some((numer, denom)) = parse_rational(s) {
        if denom.is_zero() {
            return Err(ReadError::MalformedNumber {
                radix: 10,
                literal: KString::from_ref(s)
            })
        }
        return Ok(Some(Number::Rational(Box::new(BigRational::new(numer, denom)))))
    }
    if is_decimal(s) {
        if let Ok(x) = s.parse::<f64>() {
            return Ok(Some(Number::Float(x)))
        }
    }
    if let Some(x) = parse_special_float(s) {
        return Ok(Some(Number::Float(x)))
    }
    if is_digits(take_sign(s).1) {
        return Ok(parse_integer(s, 10).map(Number::Integer))
    }
    Ok(None)
}

/// `.` stays a symbol, numbers become numbers, everything else a
/// symbol.
pub fn classify_atom(s: &str) -> Result<Value, ReadError> {
    if s != "." {
        if let Some(n) = parse_number(s)? {
            return Ok(Value::Atom(Atom::Number(n)))
        }
    }
    Ok(Value::Atom(Atom::Symbol(KString::from_ref(s))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(parse_integer("1010", 2), Some(10.into()));
        assert_eq!(parse_integer("-755", 8), Some((-493).into()));
        assert_eq!(parse_integer("fF", 16), Some(255.into()));
        assert_eq!(parse_integer("+12", 10), Some(12.into()));
        assert_eq!(parse_integer("12", 2), None);
        assert_eq!(parse_integer("-", 10), None);
        assert_eq!(parse_integer("", 16), None);
    }

    #[test]
    fn decimals() {
        for s in ["1.5", "-1.5", "+.5", "1.", ".0"] {
            assert!(is_decimal(s), "{s}");
        }
        for s in [".", "+.", "1", "1.2.3", "1.e5", "a.b"] {
            assert!(!is_decimal(s), "{s}");
        }
        assert!(is_double("1.0e0"));
        assert!(is_double("1.0E+6"));
        assert!(is_double(".5e-3"));
        assert!(!is_double("1e5"));
        assert!(!is_double("1.0e"));
    }

    #[test]
    fn numbers() -> Result<(), ReadError> {
        assert_eq!(parse_number("1/2")?, Some(Number::rational(1, 2)));
        assert_eq!(parse_number("-2/4")?, Some(Number::rational(-1, 2)));
        assert_eq!(parse_number("3.25")?, Some(Number::Float(3.25)));
        assert_eq!(parse_number("-17")?, Some(Number::integer(-17)));
        assert_eq!(parse_number("+inf.")?, Some(Number::Float(f64::INFINITY)));
        assert_eq!(parse_number("1/x")?, None);
        assert_eq!(parse_number("12abc")?, None);
        assert!(matches!(parse_number("1/0"),
                         Err(ReadError::MalformedNumber { radix: 10, .. })));
        Ok(())
    }

    #[test]
    fn dot_is_a_symbol() -> Result<(), ReadError> {
        assert_eq!(classify_atom(".")?.as_symbol(), Some("."));
        assert_eq!(classify_atom("1.")?, Value::from(Number::Float(1.0)));
        Ok(())
    }
}
