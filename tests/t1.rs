use anyhow::Result;
use sexpdialects::dialect::Scheme;
use sexpdialects::read::{read_all, read_all_str};
use sexpdialects::settings::{Settings, SCHEME_FORMAT};
use sexpdialects::write::write_all;

const INPUT: &[u8] = include_bytes!("t-input.scm");
const EXPECTED: &[u8] = include_bytes!("t-expected.scm");

#[test]
fn t1() -> Result<()> {
    let vals = read_all(INPUT, Scheme)?;
    let mut out = Vec::<u8>::new();
    write_all(&mut out, &vals, &Settings::new(&SCHEME_FORMAT))?;
    assert_eq!(std::str::from_utf8(&out)?, std::str::from_utf8(EXPECTED)?);
    Ok(())
}

#[test]
fn t1_reads_back() -> Result<()> {
    let vals = read_all(INPUT, Scheme)?;
    let again = read_all_str(std::str::from_utf8(EXPECTED)?, Scheme)?;
    assert_eq!(vals, again);
    Ok(())
}
