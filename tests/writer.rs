use anyhow::Result;
use rstest::rstest;
use sexpdialects::dialect::{Basic, CommonLisp, Scheme, Sparql};
use sexpdialects::read::{Reader, read_str, read_all_str};
use sexpdialects::settings::{Settings, BASIC_FORMAT, COMMON_LISP_FORMAT, SCHEME_FORMAT, SPARQL_FORMAT};
use sexpdialects::value::{Value, symbol, string, character};
use sexpdialects::write::{Writer, write_all, to_string_pretty};

fn pretty_basic(input: &str) -> Result<String> {
    let v = read_str(input, Basic)?;
    Ok(to_string_pretty([&v], &Settings::new(&BASIC_FORMAT)))
}

#[rstest]
#[case("(bgp (triple s p o))",
       "(bgp (triple s p o))\n")]
#[case("(thing (string \"abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ\"))",
       "(thing\n (string \"abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ\"))\n")]
#[case("(items alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu nu xi omicron pi rho sigma)",
       "(items alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu nu xi\n omicron pi rho sigma)\n")]
#[case("(prefix ((: <http://example/>)) (dataset (<data-g1.ttl> (named <data-g1.ttl>) (named <data-g2.ttl>) (named <data-g3.ttl>) (named <data-g4.ttl>)) (union (bgp (triple ?s ?p ?o)) (graph ?g (bgp (triple ?s ?p ?o))))))",
       "(prefix
 ((: <http://example/>))
 (dataset
  (<data-g1.ttl>
   (named <data-g1.ttl>)
   (named <data-g2.ttl>)
   (named <data-g3.ttl>)
   (named <data-g4.ttl>))
  (union (bgp (triple ?s ?p ?o)) (graph ?g (bgp (triple ?s ?p ?o))))))
")]
fn layout(#[case] input: &str, #[case] expected: &str) -> Result<()> {
    assert_eq!(pretty_basic(input)?, expected);
    Ok(())
}

#[test]
fn built_values() {
    let v = Value::List(vec![
        symbol("thing"),
        Value::List(vec![
            symbol("string"),
            string("abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ")])]);
    let settings = Settings::new(&BASIC_FORMAT);
    let mut out = Vec::new();
    write_all(&mut out, [&v, &symbol("x")], &settings).expect("writing to a Vec");
    assert_eq!(String::from_utf8(out).expect("utf-8"),
               "(thing\n (string \"abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ\"))\nx\n");
}

fn write_sparql(input: &str) -> Result<String> {
    let vals = read_all_str(input, Sparql::new())?;
    Ok(to_string_pretty(&vals, &Settings::new(&SPARQL_FORMAT)))
}

#[test]
fn prefix_forms_abbreviate_their_body() -> Result<()> {
    assert_eq!(
        write_sparql("(prefix ((ex: <http://example.org/>)) \
                      (triple <http://example.org/s> ex:p <http://example.org/o>))")?,
        "(prefix ((ex: <http://example.org/>)) (triple ex:s ex:p ex:o))\n");
    Ok(())
}

#[test]
fn base_forms_relativize_their_body() -> Result<()> {
    assert_eq!(
        write_sparql("(base <http://example.org/a/> \
                      (triple <http://example.org/a/s> <b> <http://other/x>))")?,
        "(base <http://example.org/a/> (triple <s> <b> <http://other/x>))\n");
    Ok(())
}

#[test]
fn sparql_atoms() -> Result<()> {
    assert_eq!(write_sparql("(true nil 1.5 -3 1.0e2 \"x\"@en ?v $w ??z _:b a)")?,
               "(true nil 1.5 -3 1.0e2 \"x\"@en ?v $w ??z _:b a)\n");
    Ok(())
}

#[test]
fn writer_with_session_context() -> Result<()> {
    let mut r = Reader::from_string(
        "(prefix ((ex: <http://example.org/>)) (bgp)) <http://example.org/thing>",
        Sparql::new());
    r.read()?;
    let v = r.read()?;
    let settings = Settings::new(&SPARQL_FORMAT);
    let mut w = Writer::new(Vec::new(), &settings)
        .with_context(r.dialect().render_context());
    assert_eq!(w.format(&v), "ex:thing\n");
    w.render(&v)?;
    w.render(&symbol("done"))?;
    assert_eq!(w.into_inner(), b"ex:thing\ndone\n");
    Ok(())
}

#[test]
fn common_lisp_format() -> Result<()> {
    let vals = read_all_str("(a T nil #\\Space #(1 2) |b c|)", CommonLisp::default())?;
    assert_eq!(to_string_pretty(&vals, &Settings::new(&COMMON_LISP_FORMAT)),
               "(a t nil #\\space #(1 2) |b c|)\n");
    Ok(())
}

#[test]
fn whitespace_characters_survive_folding() -> Result<()> {
    let mut items = vec![symbol("aa"), symbol("bb"), character('\t'), symbol("z"),
                         character('\r')];
    for c in 'a'..='g' {
        items.push(symbol(&c.to_string().repeat(10)));
    }
    items.push(character('\t'));
    let v = Value::List(items);
    let text = to_string_pretty([&v], &Settings::new(&SCHEME_FORMAT));
    assert!(text.contains("bb #\\\t z #\\\r aaaaaaaaaa"), "{text:?}");
    assert!(text.ends_with("#\\\t)\n"), "{text:?}");
    assert_eq!(read_all_str(&text, Scheme)?, vec![v]);
    Ok(())
}
