mod common;

use common::run_ok;

#[test]
fn if_else_selects_a_branch() {
    assert_eq!(run_ok("if (true) print \"yes\"; else print \"no\";"), "yes\n");
    assert_eq!(run_ok("if (false) print \"yes\"; else print \"no\";"), "no\n");
}

#[test]
fn while_loop_repeats_until_condition_is_false() {
    let source = "var i = 0; while (i < 3) { print i; i = i + 1; }";
    assert_eq!(run_ok(source), "0\n1\n2\n");
}

#[test]
fn for_loop_desugars_into_a_while_loop() {
    let source = "for (var i = 0; i < 3; i = i + 1) print i;";
    assert_eq!(run_ok(source), "0\n1\n2\n");
}

#[test]
fn for_loop_clauses_are_all_optional() {
    // `return` exits a function, so an unbounded `for(;;)` is driven through one.
    let source = "fun run() { var i = 0; for (;;) { if (i >= 2) return; print i; i = i + 1; } } run();";
    assert_eq!(run_ok(source), "0\n1\n");
}
