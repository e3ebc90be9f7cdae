mod common;

use common::{run_err, run_ok};
use ember_lang::error::EmberError;

#[test]
fn fields_can_be_set_and_read_back() {
    let source = "class Point {} var p = Point(); p.x = 1; p.y = 2; print p.x + p.y;";
    assert_eq!(run_ok(source), "3\n");
}

#[test]
fn methods_see_this() {
    let source = "\
        class Greeter {\
            init(name) { this.name = name; }\
            greet() { return \"hi \" + this.name; }\
        }\
        print Greeter(\"sam\").greet();";
    assert_eq!(run_ok(source), "hi sam\n");
}

#[test]
fn init_always_returns_the_instance_even_with_an_explicit_bare_return() {
    let source = "class Box { init(x) { this.x = x; return; } } print Box(9).x;";
    assert_eq!(run_ok(source), "9\n");
}

#[test]
fn instance_prints_as_name_instance() {
    assert_eq!(run_ok("class Bagel {} print Bagel();"), "Bagel instance\n");
}

#[test]
fn class_prints_as_bare_name() {
    assert_eq!(run_ok("class Bagel {} print Bagel;"), "Bagel\n");
}

#[test]
fn accessing_an_undefined_property_is_a_runtime_error() {
    let err = run_err("class Empty {} print Empty().missing;");
    assert!(matches!(err, EmberError::Runtime(ref e) if e.message == "Undefined property 'missing'"));
}

#[test]
fn properties_on_non_instances_are_a_runtime_error() {
    let err = run_err("var x = 1; print x.field;");
    assert!(matches!(err, EmberError::Runtime(ref e) if e.message == "Only instances have properties"));
}
