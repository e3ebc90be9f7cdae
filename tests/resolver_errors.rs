mod common;

use common::run_err;
use ember_lang::error::EmberError;

#[test]
fn redeclaring_a_local_variable_in_the_same_scope_is_a_resolve_error() {
    let err = run_err("{ var a = 1; var a = 2; }");
    assert!(matches!(err, EmberError::Resolve(ref e) if e.message.contains("Already a variable with this name")));
}

#[test]
fn reading_a_local_variable_in_its_own_initializer_is_a_resolve_error() {
    let err = run_err("{ var a = a; }");
    assert!(matches!(err, EmberError::Resolve(ref e) if e.message == "Can't read local variable in its own initializer"));
}

#[test]
fn returning_from_top_level_code_is_a_resolve_error() {
    let err = run_err("return 1;");
    assert!(matches!(err, EmberError::Resolve(ref e) if e.message == "Can't return from top-level code"));
}

#[test]
fn returning_a_value_from_an_initializer_is_a_resolve_error() {
    let err = run_err("class Box { init() { return 1; } }");
    assert!(matches!(err, EmberError::Resolve(ref e) if e.message == "Can't return a value from an initializer"));
}

#[test]
fn using_this_outside_a_class_is_a_resolve_error() {
    let err = run_err("print this;");
    assert!(matches!(err, EmberError::Resolve(ref e) if e.message == "Can't use 'this' outside of a class"));
}

#[test]
fn using_super_outside_a_class_is_a_resolve_error() {
    let err = run_err("print super.foo;");
    assert!(matches!(err, EmberError::Resolve(ref e) if e.message == "Can't use 'super' outside of a class"));
}

#[test]
fn using_super_in_a_class_with_no_superclass_is_a_resolve_error() {
    let err = run_err("class A { foo() { return super.foo(); } }");
    assert!(matches!(err, EmberError::Resolve(ref e) if e.message == "Can't use 'super' in a class with no superclass"));
}

#[test]
fn a_class_cannot_inherit_from_itself() {
    let err = run_err("class A < A {}");
    assert!(matches!(err, EmberError::Resolve(ref e) if e.message == "A class can't inherit from itself"));
}

#[test]
fn more_than_255_parameters_is_a_parse_error_but_keeps_the_rest_of_the_program() {
    let params = (0..300).map(|n| format!("p{n}")).collect::<Vec<_>>().join(", ");
    let source = format!("fun f({params}) {{ print \"ok\"; }}");
    let err = run_err(&source);
    assert!(matches!(err, EmberError::Parse(ref errs) if errs.iter().any(|e| e.message.contains("255"))));
}

#[test]
fn more_than_255_arguments_is_a_parse_error() {
    let args = (0..300).map(|n| n.to_string()).collect::<Vec<_>>().join(", ");
    let source = format!("print f({args});");
    let err = run_err(&source);
    assert!(matches!(err, EmberError::Parse(ref errs) if errs.iter().any(|e| e.message.contains("255"))));
}
