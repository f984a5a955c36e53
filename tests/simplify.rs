//! End-to-end runs of the full simplification pipeline.

use osier::ast::CoreDialect;
use osier::ast::builder::*;
use osier::simplify;

#[test]
fn folds_constants_through_nesting() {
    let dialect = CoreDialect::new();
    let mut program = block(vec![expr_stmt(call(
        "mstore",
        vec![
            call("add", vec![literal(1), literal(2)]),
            call("mul", vec![call("add", vec![literal(3), literal(4)]), literal(2)]),
        ],
    ))]);
    simplify(&mut program, &dialect).unwrap();
    assert_eq!(
        program,
        block(vec![expr_stmt(call("mstore", vec![literal(3), literal(14)]))])
    );
}

#[test]
fn strips_identity_operations_around_a_load() {
    let dialect = CoreDialect::new();
    let mut program = block(vec![expr_stmt(call(
        "sstore",
        vec![literal(0), call("add", vec![call("mload", vec![literal(0)]), literal(0)])],
    ))]);
    simplify(&mut program, &dialect).unwrap();
    assert_eq!(
        program,
        block(vec![expr_stmt(call(
            "sstore",
            vec![literal(0), call("mload", vec![literal(0)])],
        ))])
    );
}

#[test]
fn sees_through_single_assignment_variables() {
    let dialect = CoreDialect::new();
    let mut program = block(vec![
        var_decl("zero", literal(0)),
        var_decl("x", call("calldataload", vec![literal(4)])),
        expr_stmt(call(
            "sstore",
            vec![literal(0), call("mul", vec![ident("x"), ident("zero")])],
        )),
    ]);
    simplify(&mut program, &dialect).unwrap();
    assert_eq!(
        program,
        block(vec![
            var_decl("zero", literal(0)),
            var_decl("x", call("calldataload", vec![literal(4)])),
            expr_stmt(call("sstore", vec![literal(0), literal(0)])),
        ])
    );
}

#[test]
fn keeps_a_load_whose_product_folded_away() {
    // mul(mload(0), 0) folds to 0 once the load is broken out into a
    // temporary, but the load itself stays at its program point.
    let dialect = CoreDialect::new();
    let mut program = block(vec![expr_stmt(call(
        "sstore",
        vec![literal(0), call("mul", vec![call("mload", vec![literal(0)]), literal(0)])],
    ))]);
    simplify(&mut program, &dialect).unwrap();
    assert_eq!(
        program,
        block(vec![
            var_decl("t_1", call("mload", vec![literal(0)])),
            expr_stmt(call("sstore", vec![literal(0), literal(0)])),
        ])
    );
}

#[test]
fn zero_rewrites_is_a_successful_run() {
    let dialect = CoreDialect::new();
    let original = block(vec![
        var_decl("a", call("mload", vec![literal(2)])),
        var_decl("b", call("add", vec![ident("a"), ident("a")])),
        expr_stmt(call("sstore", vec![ident("b"), literal(3)])),
    ]);
    let mut program = original.clone();
    simplify(&mut program, &dialect).unwrap();
    assert_eq!(program, original);
}

#[test]
fn undeclared_names_abort_before_any_mutation() {
    let dialect = CoreDialect::new();
    let original = block(vec![expr_stmt(call(
        "sstore",
        vec![ident("ghost"), call("add", vec![literal(1), literal(2)])],
    ))]);
    let mut program = original.clone();
    assert!(simplify(&mut program, &dialect).is_err());
    assert_eq!(program, original);
}

#[test]
fn simplifies_inside_control_constructs() {
    let dialect = CoreDialect::new();
    let mut program = block(vec![if_stmt(
        call("lt", vec![literal(1), literal(2)]),
        block(vec![expr_stmt(call(
            "sstore",
            vec![literal(0), call("xor", vec![literal(5), literal(5)])],
        ))]),
    )]);
    simplify(&mut program, &dialect).unwrap();
    assert_eq!(
        program,
        block(vec![if_stmt(
            literal(1),
            block(vec![expr_stmt(call("sstore", vec![literal(0), literal(0)]))]),
        )])
    );
}
