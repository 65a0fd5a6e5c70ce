//! Value display and coercion rules: boolean spelling, float formatting,
//! and numeric-string coercion ahead of arithmetic/relational operators.

mod support;

use support::run_capture;

#[test]
fn test_bool_displays_as_oo_or_dili() {
    let src = r#"SUGOD
MUGNA TINUOD t="OO", f="DILI"
IPAKITA: t & " " & f
KATAPUSAN"#;
    assert_eq!(run_capture(src).unwrap(), "OO DILI");
}

#[test]
fn test_integral_float_keeps_trailing_dot_zero() {
    let src = "SUGOD
MUGNA TIPIK x=4.0
IPAKITA:x
KATAPUSAN";
    assert_eq!(run_capture(src).unwrap(), "4.0");
}

#[test]
fn test_non_integral_float_uses_natural_decimal_form() {
    let src = "SUGOD
MUGNA TIPIK x=2.5
IPAKITA:x
KATAPUSAN";
    assert_eq!(run_capture(src).unwrap(), "2.5");
}

#[test]
fn test_numeric_string_coerces_before_arithmetic() {
    let src = r#"SUGOD
MUGNA PULONG s="5"
MUGNA NUMERO total=s+3
IPAKITA:total
KATAPUSAN"#;
    assert_eq!(run_capture(src).unwrap(), "8");
}

#[test]
fn test_int_promotes_to_float_when_mixed() {
    let src = "SUGOD
MUGNA NUMERO i=2
MUGNA TIPIK result=i+0.5
IPAKITA:result
KATAPUSAN";
    assert_eq!(run_capture(src).unwrap(), "2.5");
}

#[test]
fn test_char_and_string_equality_compares_directly() {
    let src = r#"SUGOD
MUGNA LETRA c='a'
MUGNA TINUOD matches=(c=='a')
IPAKITA: matches
KATAPUSAN"#;
    assert_eq!(run_capture(src).unwrap(), "OO");
}
