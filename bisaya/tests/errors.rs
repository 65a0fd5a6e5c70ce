//! Runtime error surface: the kinds in the diagnostic table each get an
//! exact-variant assertion, not just "an error happened".

mod support;

use bisaya::error::{Error, RuntimeErrorKind};
use support::{run_capture, run_with_input};

fn runtime_err(src: &str) -> RuntimeErrorKind {
    match run_capture(src) {
        Err(Error::Runtime(e)) => e.kind,
        other => panic!("expected a runtime error, got {:?}", other),
    }
}

#[test]
fn test_integer_overflow_on_add_is_reported() {
    let src = "SUGOD
MUGNA NUMERO x=2147483647
x=x+1
KATAPUSAN";
    assert!(matches!(runtime_err(src), RuntimeErrorKind::IntegerOverflow(op) if op == "+"));
}

#[test]
fn test_integer_overflow_on_increment_is_reported() {
    let src = "SUGOD
MUGNA NUMERO x=2147483647
x++
KATAPUSAN";
    assert!(matches!(runtime_err(src), RuntimeErrorKind::IntegerOverflow(op) if op == "++"));
}

#[test]
fn test_integer_division_by_zero_is_reported() {
    let src = "SUGOD
MUGNA NUMERO x=10, y=0
IPAKITA: x/y
KATAPUSAN";
    assert!(matches!(runtime_err(src), RuntimeErrorKind::DivisionByZero));
}

#[test]
fn test_integer_modulo_by_zero_is_reported() {
    let src = "SUGOD
MUGNA NUMERO x=10, y=0
IPAKITA: x%y
KATAPUSAN";
    assert!(matches!(runtime_err(src), RuntimeErrorKind::DivisionByZero));
}

#[test]
fn test_float_division_by_zero_is_reported() {
    let src = "SUGOD
MUGNA TIPIK x=10.0, y=0.0
IPAKITA: x/y
KATAPUSAN";
    assert!(matches!(runtime_err(src), RuntimeErrorKind::DivisionByZero));
}

#[test]
fn test_assigning_incompatible_value_is_type_mismatch() {
    let src = "SUGOD
MUGNA NUMERO x
MUGNA PULONG s=\"hello\"
x=s
KATAPUSAN";
    assert!(matches!(
        runtime_err(src),
        RuntimeErrorKind::TypeMismatchAssign { .. }
    ));
}

#[test]
fn test_logical_operator_on_non_booleans_is_type_mismatch() {
    let src = "SUGOD
MUGNA NUMERO x=1, y=2
IPAKITA: x UG y
KATAPUSAN";
    assert!(matches!(
        runtime_err(src),
        RuntimeErrorKind::TypeMismatchOp { op: "UG", .. }
    ));
}

#[test]
fn test_if_condition_must_be_boolean() {
    let src = "SUGOD
MUGNA NUMERO x=1
KUNG(x)PUNDOK{}
KATAPUSAN";
    assert!(matches!(
        runtime_err(src),
        RuntimeErrorKind::ConditionNotBoolean(_)
    ));
}

#[test]
fn test_dawat_on_empty_line_is_input_invalid() {
    let src = "SUGOD
MUGNA NUMERO x
DAWAT: x
KATAPUSAN";
    match run_with_input(src, "\n") {
        Err(Error::Runtime(e)) => assert!(matches!(e.kind, RuntimeErrorKind::InputInvalid(name) if name == "x")),
        other => panic!("expected InputInvalid, got {:?}", other),
    }
}

#[test]
fn test_diagnostic_codes_match_the_design_table() {
    use bisaya::error::DiagnosticCode;
    match run_capture("SUGOD\nMUGNA NUMERO x=1\nIPAKITA: x/0\nKATAPUSAN") {
        Err(Error::Runtime(e)) => assert_eq!(e.code(), "division-by-zero"),
        other => panic!("expected a runtime error, got {:?}", other),
    }
}
