//! Behavioral coverage for the Expression Checker: binary/assignment
//! operators, call arity, member visibility, and the fresh-object-literal
//! excess-property check.

mod common;

use stypec_ast::{BinaryOp, KeywordType, Literal, VarKind};
use stypec_common::diagnostics::ErrorKind;
use stypec_common::CheckerOptions;

use common::*;

#[test]
fn string_concatenation_widens_to_string() {
    let diags = check(
        CheckerOptions::default(),
        vec![var_decl(VarKind::Let, "s", None, Some(binary(BinaryOp::Add, string_lit("a"), string_lit("b"))))],
    );
    assert!(diags.is_empty());
}

#[test]
fn mixing_bigint_with_number_is_an_error() {
    let diags = check(
        CheckerOptions::default(),
        vec![
            var_decl(VarKind::Let, "a", None, Some(expr(stypec_ast::ExprKind::Literal(Literal::BigInt("1".into()))))),
            var_decl(VarKind::Let, "b", None, Some(binary(BinaryOp::Add, ident("a"), num(1.0)))),
        ],
    );
    assert!(has_kind(&diags, ErrorKind::MixedBigInt));
}

#[test]
fn unsupported_unsigned_shift_on_bigint_is_an_error() {
    let diags = check(
        CheckerOptions::default(),
        vec![
            var_decl(VarKind::Let, "a", None, Some(expr(stypec_ast::ExprKind::Literal(Literal::BigInt("1".into()))))),
            var_decl(VarKind::Let, "b", None, Some(binary(BinaryOp::UShr, ident("a"), num(1.0)))),
        ],
    );
    assert!(has_kind(&diags, ErrorKind::UnsupportedShift));
}

#[test]
fn calling_a_function_with_too_few_arguments_is_an_error() {
    let body = block(vec![return_stmt(Some(num(1.0)))]);
    let diags = check(
        CheckerOptions::default(),
        vec![
            function_decl("needsTwo", vec![param("a", Some(keyword_ty(KeywordType::Number))), param("b", Some(keyword_ty(KeywordType::Number)))], None, Some(body)),
            expr_stmt(call(ident("needsTwo"), vec![num(1.0)])),
        ],
    );
    assert!(has_kind(&diags, ErrorKind::ArityMismatch));
}

#[test]
fn calling_a_non_callable_value_is_an_error() {
    let diags = check(
        CheckerOptions::default(),
        vec![
            var_decl(VarKind::Let, "x", None, Some(num(1.0))),
            expr_stmt(call(ident("x"), vec![])),
        ],
    );
    assert!(has_kind(&diags, ErrorKind::NotCallable));
}

#[test]
fn referencing_an_unknown_name_is_an_error() {
    let diags = check(CheckerOptions::default(), vec![expr_stmt(ident("nowhere"))]);
    assert!(has_kind(&diags, ErrorKind::UnknownName));
}

#[test]
fn assigning_a_mismatched_type_to_a_declared_variable_is_an_error() {
    let diags = check(
        CheckerOptions::default(),
        vec![
            var_decl(VarKind::Let, "n", Some(keyword_ty(KeywordType::Number)), None),
            expr_stmt(assign(ident("n"), string_lit("oops"))),
        ],
    );
    assert!(has_kind(&diags, ErrorKind::TypeMismatch));
}

#[test]
fn fresh_object_literal_with_excess_property_is_flagged() {
    // const p: P = { x: 1, y: 2 }, where P only declares `x`.
    let diags = check(
        CheckerOptions::default(),
        vec![
            interface_decl("P", vec![("x", keyword_ty(KeywordType::Number), false)]),
            var_decl(VarKind::Const, "p", Some(reference_ty("P")), Some(object_literal(vec![("x", num(1.0)), ("y", num(2.0))]))),
        ],
    );
    assert!(has_kind(&diags, ErrorKind::TypeMismatch));
}

#[test]
fn object_literal_matching_the_expected_shape_is_clean() {
    let diags = check(
        CheckerOptions::default(),
        vec![
            interface_decl("P", vec![("x", keyword_ty(KeywordType::Number), false)]),
            var_decl(VarKind::Const, "p", Some(reference_ty("P")), Some(object_literal(vec![("x", num(1.0))]))),
        ],
    );
    assert!(diags.is_empty());
}

#[test]
fn object_literal_through_an_intermediate_variable_is_not_flagged_for_excess_properties() {
    // The literal is only "fresh" at its own syntactic position; once it
    // has flowed through an untyped binding it is compared structurally,
    // with no excess-property diagnostic at the later annotated use.
    let diags = check(
        CheckerOptions::default(),
        vec![
            interface_decl("P", vec![("x", keyword_ty(KeywordType::Number), false)]),
            var_decl(VarKind::Const, "tmp", None, Some(object_literal(vec![("x", num(1.0)), ("y", num(2.0))]))),
            var_decl(VarKind::Const, "p", Some(reference_ty("P")), Some(ident("tmp"))),
        ],
    );
    assert!(!has_kind(&diags, ErrorKind::TypeMismatch));
}
