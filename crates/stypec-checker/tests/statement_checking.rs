//! Behavioral coverage for the Statement Checker beyond return analysis and
//! switch exhaustiveness: loops, try/catch, labeled break/continue, and the
//! unreachable-code-after-terminator suggestion.

mod common;

use stypec_ast::{KeywordType, VarKind};
use stypec_common::diagnostics::ErrorKind;
use stypec_common::CheckerOptions;

use common::*;

#[test]
fn code_after_a_return_is_reported_as_a_suggestion() {
    let body = block(vec![return_stmt(Some(num(1.0))), expr_stmt(num(2.0))]);
    let diags = check(CheckerOptions::default(), vec![function_decl("f", vec![], None, Some(body))]);
    assert!(has_kind(&diags, ErrorKind::UnreachableCode));
}

#[test]
fn unreachable_code_is_not_reported_when_allowed_by_options() {
    let mut options = CheckerOptions::default();
    options.allow_unreachable_code = true;
    let body = block(vec![return_stmt(Some(num(1.0))), expr_stmt(num(2.0))]);
    let diags = check(options, vec![function_decl("f", vec![], None, Some(body))]);
    assert!(!has_kind(&diags, ErrorKind::UnreachableCode));
}

#[test]
fn code_with_no_preceding_terminator_is_not_flagged() {
    let body = block(vec![expr_stmt(num(1.0)), expr_stmt(num(2.0))]);
    let diags = check(CheckerOptions::default(), vec![function_decl("f", vec![], None, Some(body))]);
    assert!(!has_kind(&diags, ErrorKind::UnreachableCode));
}

#[test]
fn break_outside_a_loop_or_switch_is_an_error() {
    let diags = check(CheckerOptions::default(), vec![stmt(stypec_ast::StmtKind::Break(None))]);
    assert!(has_kind(&diags, ErrorKind::BreakOutsideLoop));
}

#[test]
fn break_with_an_undeclared_label_is_an_error() {
    let diags = check(CheckerOptions::default(), vec![stmt(stypec_ast::StmtKind::Break(Some("nowhere".into())))]);
    assert!(has_kind(&diags, ErrorKind::LabelNotFound));
}

#[test]
fn break_inside_a_labeled_loop_is_clean() {
    let loop_body = stmt(stypec_ast::StmtKind::While { test: boolean(true), body: Box::new(stmt(stypec_ast::StmtKind::Break(Some("outer".into())))) });
    let labeled = stmt(stypec_ast::StmtKind::Labeled { label: "outer".into(), body: Box::new(loop_body) });
    let diags = check(CheckerOptions::default(), vec![labeled]);
    assert!(!has_kind(&diags, ErrorKind::LabelNotFound));
}

#[test]
fn for_of_binds_the_array_element_type() {
    let body = stmt(stypec_ast::StmtKind::ExprStmt(binary(stypec_ast::BinaryOp::Add, ident("n"), ident("n"))));
    let for_of = stmt(stypec_ast::StmtKind::ForOf {
        kind: VarKind::Const,
        binding: "n".to_string(),
        ty: None,
        iterable: ident("arr"),
        body: Box::new(body),
        is_await: false,
    });
    let diags = check(
        CheckerOptions::default(),
        vec![
            var_decl(VarKind::Let, "arr", Some(array_ty(keyword_ty(KeywordType::Number))), None),
            for_of,
        ],
    );
    assert!(!has_kind(&diags, ErrorKind::UnknownName));
}

#[test]
fn for_in_binds_a_string_key() {
    let body = stmt(stypec_ast::StmtKind::ExprStmt(ident("key")));
    let for_in = stmt(stypec_ast::StmtKind::ForIn { kind: VarKind::Const, binding: "key".to_string(), object: ident("obj"), body: Box::new(body) });
    let diags = check(
        CheckerOptions::default(),
        vec![interface_decl("Obj", vec![]), var_decl(VarKind::Let, "obj", Some(reference_ty("Obj")), None), for_in],
    );
    assert!(!has_kind(&diags, ErrorKind::UnknownName));
}

#[test]
fn catch_variable_defaults_to_any_without_use_unknown_in_catch_variables() {
    let catch = stypec_ast::CatchClause { param: Some("e".to_string()), param_ty: None, body: block(vec![expr_stmt(member(ident("e"), "message"))]) };
    let try_catch = stmt(stypec_ast::StmtKind::TryCatch { block: block(vec![]), catch: Some(catch), finally: None });
    let diags = check(CheckerOptions::default(), vec![try_catch]);
    assert!(!has_kind(&diags, ErrorKind::UnknownName));
}

fn array_ty(elem: stypec_ast::TypeExpr) -> stypec_ast::TypeExpr {
    stypec_ast::TypeExpr { id: stypec_ast::NodeId::DUMMY, span: dummy_span(), kind: stypec_ast::TypeExprKind::Array(Box::new(elem)) }
}
