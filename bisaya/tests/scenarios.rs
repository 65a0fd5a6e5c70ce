//! Table-driven end-to-end scenarios exercising the full
//! tokenize -> parse -> run pipeline through the public API.

mod support;

use support::run_capture;

#[test]
fn test_bracket_escape_and_unary_minus() {
    let src = "SUGOD
MUGNA NUMERO xyz, abc=100
xyz=((abc*5)/10+10)*-1
IPAKITA:[[]&xyz&[]]
KATAPUSAN";
    assert_eq!(run_capture(src).unwrap(), "[-60]");
}

#[test]
fn test_for_loop_counts_to_ten() {
    let src = "SUGOD
MUGNA NUMERO ctr
ALANG SA(ctr=1, ctr<=10, ctr++) PUNDOK{
    IPAKITA: ctr & ' '
}
KATAPUSAN";
    assert_eq!(run_capture(src).unwrap(), "1 2 3 4 5 6 7 8 9 10 ");
}

#[test]
fn test_else_if_chain_picks_matching_branch() {
    let src = r#"SUGOD
MUGNA NUMERO score=75
KUNG(score>=90)PUNDOK{IPAKITA:"A"}
KUNG DILI(score>=80)PUNDOK{IPAKITA:"B"}
KUNG DILI(score>=70)PUNDOK{IPAKITA:"C"}
KUNG WALA PUNDOK{IPAKITA:"F"}
KATAPUSAN"#;
    assert_eq!(run_capture(src).unwrap(), "C");
}

#[test]
fn test_fibonacci_sequence() {
    let src = r#"SUGOD
MUGNA NUMERO n=10, i=0, a=0, b=1, next
IPAKITA:"Fibonacci sequence:"
SAMTANG(i<n)PUNDOK{
    KUNG(i<=1)PUNDOK{
        next=1
    }
    KUNG WALA PUNDOK{
        next=a+b
    }
    a=b
    b=next
    IPAKITA:" " & next
    i++
}
KATAPUSAN"#;
    assert_eq!(
        run_capture(src).unwrap(),
        "Fibonacci sequence: 1 1 2 3 5 8 13 21 34 55"
    );
}

#[test]
fn test_dollar_newline_glues_away_ampersands() {
    let src = r#"SUGOD
IPAKITA:"Resulta:" & $ & "Katapusan sa Linya"
KATAPUSAN"#;
    assert_eq!(run_capture(src).unwrap(), "Resulta:\nKatapusan sa Linya");
}

#[test]
fn test_increment_statement_then_display() {
    let src = "SUGOD
MUGNA NUMERO i=0
i++
IPAKITA:i
KATAPUSAN";
    assert_eq!(run_capture(src).unwrap(), "1");
}

#[test]
fn test_postfix_increment_expression_does_not_commit_until_statement_form() {
    let src = r#"SUGOD
MUGNA NUMERO i=1
IPAKITA: i++ & " " & i
KATAPUSAN"#;
    assert_eq!(run_capture(src).unwrap(), "2 1");
}

#[test]
fn test_single_precision_float_arithmetic() {
    let src = "SUGOD
MUGNA TIPIK x=0.1, y=0.2
IPAKITA: x+y
KATAPUSAN";
    assert_eq!(run_capture(src).unwrap(), "0.3");
}

#[test]
fn test_single_precision_mixed_expression() {
    let src = "SUGOD
MUGNA TIPIK a=5.5, b=2.2
IPAKITA: (a*b)/(a-b)+100
KATAPUSAN";
    assert_eq!(run_capture(src).unwrap(), "103.666664");
}

#[test]
fn test_float_reassignment_keeps_trailing_dot_zero() {
    let src = "SUGOD
MUGNA TIPIK x=10.0
x=x*3
IPAKITA:x
KATAPUSAN";
    assert_eq!(run_capture(src).unwrap(), "30.0");
}

#[test]
fn test_dawat_reads_one_line_per_target_in_order() {
    let src = "SUGOD
MUGNA NUMERO a, b
DAWAT: a, b
IPAKITA: a & \"-\" & b
KATAPUSAN";
    assert_eq!(run_with_input(src), "3-7");
}

fn run_with_input(src: &str) -> String {
    support::run_with_input(src, "3\n7\n").unwrap()
}
