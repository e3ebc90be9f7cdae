mod common;

use common::{run_err, run_ok};
use ember_lang::error::EmberError;

#[test]
fn arithmetic_follows_standard_precedence() {
    assert_eq!(run_ok("print 2 + 3 * 4;"), "9\n");
    assert_eq!(run_ok("print (2 + 3) * 4;"), "20\n");
    assert_eq!(run_ok("print 10 - 4 - 3;"), "3\n");
}

#[test]
fn comparison_and_equality() {
    assert_eq!(run_ok("print 1 < 2;"), "true\n");
    assert_eq!(run_ok("print 1 >= 1;"), "true\n");
    assert_eq!(run_ok("print 1 == 1.0;"), "true\n");
    assert_eq!(run_ok("print \"a\" == \"a\";"), "true\n");
    assert_eq!(run_ok("print nil == false;"), "false\n");
}

#[test]
fn string_concatenation() {
    assert_eq!(run_ok("print \"foo\" + \"bar\";"), "foobar\n");
}

#[test]
fn logical_operators_short_circuit_and_return_an_operand() {
    assert_eq!(run_ok("print false or \"ok\";"), "ok\n");
    assert_eq!(run_ok("print nil and \"unreached\";"), "nil\n");
    assert_eq!(run_ok("print 1 and 2;"), "2\n");
}

#[test]
fn negating_a_non_number_is_a_runtime_error() {
    let err = run_err("print -\"x\";");
    assert!(matches!(err, EmberError::Runtime(ref e) if e.message == "Operand must be a number"));
}

#[test]
fn dividing_incompatible_types_is_a_runtime_error() {
    let err = run_err("print \"a\" / 2;");
    assert!(matches!(err, EmberError::Runtime(ref e) if e.message == "Operands must be numbers"));
}

#[test]
fn comparing_incompatible_types_is_a_runtime_error() {
    let err = run_err("print 1 < \"a\";");
    assert!(matches!(err, EmberError::Runtime(ref e) if e.message == "Operands must be numbers"));
}
