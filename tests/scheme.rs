use anyhow::Result;
use rstest::rstest;
use sexpdialects::dialect::Scheme;
use sexpdialects::number::Number;
use sexpdialects::read::{Reader, ReadError, Expecting, read_str, read_all_str, from_read};
use sexpdialects::value::{Value, Atom, Parenkind, symbol, string, integer, float, character};

fn read(s: &str) -> Result<Value> {
    Ok(read_str(s, Scheme)?)
}

#[rstest]
#[case("#b1010", integer(10))]
#[case("#o755", integer(493))]
#[case("#xFF", integer(255))]
#[case("#Xff", integer(255))]
#[case("#d-12", integer(-12))]
#[case("#x-ff", integer(-255))]
#[case("#b+11", integer(3))]
#[case("1/2", Value::from(Number::rational(1, 2)))]
#[case("-6/4", Value::from(Number::rational(-3, 2)))]
#[case("3.1415", float(3.1415))]
#[case("-.5", float(-0.5))]
#[case("42", integer(42))]
#[case("#t", true.into())]
#[case("#true", true.into())]
#[case("#T", true.into())]
#[case("#f", false.into())]
#[case("#FALSE", false.into())]
#[case("#n", Value::nil())]
#[case("#\\newline", character('\n'))]
#[case("#\\SPACE", character(' '))]
#[case("#\\x", character('x'))]
#[case("#\\(", character('('))]
#[case("#\\ ", character(' '))]
#[case("#\\λ", character('λ'))]
#[case(".", symbol("."))]
#[case("a.b", symbol("a.b"))]
#[case("1+", symbol("1+"))]
#[case("\"\\u00e9\\U0001F600\\n\\\"\"", string("é😀\n\""))]
#[case("'single'", Value::Atom(Atom::String("single".into(), sexpdialects::value::Quote::Single)))]
fn atoms(#[case] input: &str, #[case] expected: Value) -> Result<()> {
    assert_eq!(read(input)?, expected);
    Ok(())
}

#[test]
fn character_names_push_back_the_rest() -> Result<()> {
    let mut r = Reader::from_string("#\\ab c", Scheme);
    assert_eq!(r.read()?, character('a'));
    assert_eq!(r.read()?, symbol("b"));
    assert_eq!(r.read()?, symbol("c"));
    assert!(r.at_end()?);
    Ok(())
}

#[test]
fn comments() -> Result<()> {
    assert_eq!(read_all_str("; line\n(1 #;(2 3) 4) #;5", Scheme)?,
               vec![Value::List(vec![integer(1), integer(4)])]);
    assert_eq!(read_all_str("#!/usr/bin/env run\n(1)", Scheme)?,
               vec![Value::List(vec![integer(1)])]);
    assert_eq!(read("#;#;a b c")?, symbol("c"));
    let e = read_str("#!/bin/x", Scheme).unwrap_err();
    assert!(matches!(e.err, ReadError::EndOfInput(Expecting::Value)));
    Ok(())
}

#[rstest]
#[case("#b102")]
#[case("#o8")]
#[case("#x")]
#[case("#dz")]
fn malformed_numbers(#[case] input: &str) {
    let e = read_str(input, Scheme).unwrap_err();
    assert!(matches!(e.err, ReadError::MalformedNumber { .. }), "{input}: {e}");
}

#[test]
fn malformed_number_reports_radix_and_text() {
    let e = read_str("#b102", Scheme).unwrap_err();
    match e.err {
        ReadError::MalformedNumber { radix, literal } => {
            assert_eq!(radix, 2);
            assert_eq!(literal.as_str(), "102");
        }
        _ => panic!("{e}")
    }
}

#[rstest]
#[case("#q", 'q')]
#[case("#tru", 't')]
#[case("#(1)", '(')]
#[case("#'x", '\'')]
fn invalid_sharp_syntax(#[case] input: &str, #[case] c: char) {
    let e = read_str(input, Scheme).unwrap_err();
    match e.err {
        ReadError::InvalidSharpSyntax(got) => assert_eq!(got, c),
        _ => panic!("{input}: {e}")
    }
}

#[test]
fn string_errors() {
    let e = read_str("\"abc", Scheme).unwrap_err();
    assert!(matches!(e.err, ReadError::EndOfInput(Expecting::Delimiter('"'))));
    let e = read_str("\"\\uZZZZ\"", Scheme).unwrap_err();
    assert!(matches!(e.err, ReadError::NonHexDigit('Z')));
    let e = read_str("\"\\uD800\"", Scheme).unwrap_err();
    assert!(matches!(e.err, ReadError::InvalidCodePoint(0xD800)));
    let e = read_str("\"\\u12", Scheme).unwrap_err();
    assert!(matches!(e.err, ReadError::EndOfInput(Expecting::Escape)));
}

#[test]
fn error_positions() {
    let e = read_all_str("(a\n  ]", Scheme).unwrap_err();
    assert_eq!((e.pos.line, e.pos.col), (1, 2));
    assert_eq!(e.to_string(), "unexpected list terminator ']', expecting ')' @2.2");
    let e = read_all_str("(a b) )", Scheme).unwrap_err();
    assert_eq!(e.to_string(), "unexpected list terminator ')' outside of any list @1.6");
}

#[test]
fn brackets_and_parens_nest() -> Result<()> {
    assert_eq!(read("[a (b [c])]")?,
               Value::List(vec![symbol("a"),
                                Value::List(vec![symbol("b"),
                                                 Value::List(vec![symbol("c")])])]));
    let e = read_str("[a (b])", Scheme).unwrap_err();
    assert!(matches!(e.err, ReadError::UnexpectedListTerminator {
        expected: Some(Parenkind::Round),
        got: Parenkind::Square
    }));
    Ok(())
}

#[test]
fn nesting_limit() -> Result<()> {
    let deep = format!("{}{}", "(".repeat(600), ")".repeat(600));
    let e = read_str(&deep, Scheme).unwrap_err();
    assert!(matches!(e.err, ReadError::NestingTooDeep));
    let ok = format!("{}{}", "(".repeat(10), ")".repeat(10));
    assert!(Reader::from_string(&ok, Scheme).with_depth_fuel(10).read().is_ok());
    let e = Reader::from_string(&ok, Scheme).with_depth_fuel(9).read().unwrap_err();
    assert!(matches!(e.err, ReadError::NestingTooDeep));
    Ok(())
}

#[test]
fn datum_comments_count_as_nesting() -> Result<()> {
    let chain = format!("{}x", "#;".repeat(200_000));
    let e = read_str(&chain, Scheme).unwrap_err();
    assert!(matches!(e.err, ReadError::NestingTooDeep));
    assert_eq!(Reader::from_string("#;#;a b c", Scheme).with_depth_fuel(2).read()?,
               symbol("c"));
    let e = Reader::from_string("#;#;a b c", Scheme).with_depth_fuel(1).read().unwrap_err();
    assert!(matches!(e.err, ReadError::NestingTooDeep));
    assert_eq!(e.pos.col, 2);
    Ok(())
}

#[test]
fn iterator_stops_after_the_first_error() -> Result<()> {
    let results: Vec<_> = Reader::from_string("1 2 ) 3", Scheme).collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().ok(), Some(&integer(1)));
    assert_eq!(results[1].as_ref().ok(), Some(&integer(2)));
    assert!(results[2].is_err());
    Ok(())
}

#[test]
fn from_bytes() -> Result<()> {
    let input: &[u8] = "(\"ü\" #\\space)\n[x]".as_bytes();
    let vals = from_read(input, Scheme).read_all()?;
    assert_eq!(vals, vec![Value::List(vec![string("ü"), character(' ')]),
                          Value::List(vec![symbol("x")])]);
    let bad: &[u8] = b"(a \xff)";
    let e = from_read(bad, Scheme).read_all().unwrap_err();
    assert!(matches!(e.err, ReadError::IOError(_)));
    Ok(())
}
