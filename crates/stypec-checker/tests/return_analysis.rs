//! Behavioral coverage for the definite-return analysis (§4.4): a
//! declared, non-void, non-generator function must return on every path.

mod common;

use stypec_ast::KeywordType;
use stypec_common::diagnostics::ErrorKind;
use stypec_common::CheckerOptions;

use common::*;

#[test]
fn declared_return_type_with_no_return_statement_is_flagged() {
    let body = block(vec![expr_stmt(num(1.0))]);
    let diags = check(
        CheckerOptions::default(),
        vec![function_decl("f", vec![], Some(keyword_ty(KeywordType::Number)), Some(body))],
    );
    assert!(has_kind(&diags, ErrorKind::NonExhaustiveReturn));
}

#[test]
fn declared_return_type_returning_on_every_branch_is_clean() {
    let body = block(vec![if_stmt(boolean(true), return_stmt(Some(num(1.0))), Some(return_stmt(Some(num(2.0)))))]);
    let diags = check(
        CheckerOptions::default(),
        vec![function_decl("f", vec![], Some(keyword_ty(KeywordType::Number)), Some(body))],
    );
    assert!(!has_kind(&diags, ErrorKind::NonExhaustiveReturn));
}

#[test]
fn declared_return_type_missing_a_return_on_the_else_branch_is_flagged() {
    let body = block(vec![if_stmt(boolean(true), return_stmt(Some(num(1.0))), None)]);
    let diags = check(
        CheckerOptions::default(),
        vec![function_decl("f", vec![], Some(keyword_ty(KeywordType::Number)), Some(body))],
    );
    assert!(has_kind(&diags, ErrorKind::NonExhaustiveReturn));
}

#[test]
fn declared_void_return_type_does_not_require_a_return_statement() {
    let body = block(vec![expr_stmt(num(1.0))]);
    let diags = check(
        CheckerOptions::default(),
        vec![function_decl("f", vec![], Some(keyword_ty(KeywordType::Void)), Some(body))],
    );
    assert!(!has_kind(&diags, ErrorKind::NonExhaustiveReturn));
}

#[test]
fn inferred_return_type_with_no_annotation_is_never_flagged() {
    let body = block(vec![expr_stmt(num(1.0))]);
    let diags = check(CheckerOptions::default(), vec![function_decl("f", vec![], None, Some(body))]);
    assert!(!has_kind(&diags, ErrorKind::NonExhaustiveReturn));
}

#[test]
fn throw_on_every_remaining_path_satisfies_the_definite_return_check() {
    let body = block(vec![if_stmt(boolean(true), return_stmt(Some(num(1.0))), Some(stmt_throw()))]);
    let diags = check(
        CheckerOptions::default(),
        vec![function_decl("f", vec![], Some(keyword_ty(KeywordType::Number)), Some(body))],
    );
    assert!(!has_kind(&diags, ErrorKind::NonExhaustiveReturn));
}

fn stmt_throw() -> stypec_ast::Stmt {
    stypec_ast::Stmt::new(stypec_ast::NodeId::DUMMY, dummy_span(), stypec_ast::StmtKind::Throw(string_lit("boom")))
}
