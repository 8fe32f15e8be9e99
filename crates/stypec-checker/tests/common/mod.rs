//! Shared fixture builders for the checker's behavioral test suites.
//!
//! There is no parser in this workspace to drive these tests from source
//! text, so every test builds its `Module` by hand, the same way
//! `classes.rs`'s own inline tests do. Kept under `tests/common/mod.rs`
//! (not `tests/common.rs`) so cargo doesn't register it as its own test
//! binary.

#![allow(dead_code)]

use stypec_ast::{
    Argument, AssignOp, BinaryOp, Block, Expr, ExprKind, FunctionDecl, InterfaceDecl, InterfaceMember, Literal,
    MemberKey, Module, NodeId, ObjectProperty, Param, PropertyAssignment, PropertyKey, Stmt, StmtKind, SwitchCase,
    TypeExpr, TypeExprKind, VarDeclarator, VarKind,
};
use stypec_binder::ModuleResolver;
use stypec_checker::CheckSession;
use stypec_common::{CheckerOptions, Span};
use stypec_common::diagnostics::{Diagnostic, ErrorKind};
use stypec_env::ModuleRecord;

pub struct NoResolver;
impl ModuleResolver for NoResolver {
    fn resolve(&self, _from_path: &str, _specifier: &str) -> Option<String> {
        None
    }
    fn cached_module(&self, _canonical_path: &str) -> Option<&ModuleRecord> {
        None
    }
}

pub fn dummy_span() -> Span {
    Span::dummy()
}

pub fn module_of(stmts: Vec<Stmt>) -> Module {
    Module { path: "test.ts".to_string(), body: stmts }
}

/// Runs a module through a fresh session with the given options and
/// returns its diagnostics for inspection.
pub fn check(options: CheckerOptions, stmts: Vec<Stmt>) -> Vec<Diagnostic> {
    let module = module_of(stmts);
    let mut session = CheckSession::new(options);
    session.check_module(&module, &NoResolver);
    session.diagnostics.into_vec()
}

pub fn has_kind(diagnostics: &[Diagnostic], kind: ErrorKind) -> bool {
    diagnostics.iter().any(|d| d.kind == kind)
}

pub fn expr(kind: ExprKind) -> Expr {
    Expr::new(NodeId::DUMMY, dummy_span(), kind)
}

pub fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(NodeId::DUMMY, dummy_span(), kind)
}

pub fn ident(name: &str) -> Expr {
    expr(ExprKind::Identifier(name.to_string()))
}

pub fn num(n: f64) -> Expr {
    expr(ExprKind::Literal(Literal::Number(n)))
}

pub fn string_lit(s: &str) -> Expr {
    expr(ExprKind::Literal(Literal::String(s.to_string())))
}

pub fn boolean(b: bool) -> Expr {
    expr(ExprKind::Literal(Literal::Boolean(b)))
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) })
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    expr(ExprKind::Call {
        callee: Box::new(callee),
        type_args: vec![],
        args: args.into_iter().map(Argument::Normal).collect(),
        optional: false,
    })
}

pub fn member(object: Expr, name: &str) -> Expr {
    expr(ExprKind::Member { object: Box::new(object), key: MemberKey::Name(name.to_string()), optional: false })
}

pub fn assign(target: Expr, value: Expr) -> Expr {
    expr(ExprKind::Assignment { op: AssignOp::Assign, target: Box::new(target), value: Box::new(value) })
}

pub fn keyword_ty(kind: stypec_ast::KeywordType) -> TypeExpr {
    TypeExpr { id: NodeId::DUMMY, span: dummy_span(), kind: TypeExprKind::Keyword(kind) }
}

pub fn reference_ty(name: &str) -> TypeExpr {
    TypeExpr { id: NodeId::DUMMY, span: dummy_span(), kind: TypeExprKind::Reference { name: name.to_string(), type_args: vec![] } }
}

pub fn union_ty(members: Vec<TypeExpr>) -> TypeExpr {
    TypeExpr { id: NodeId::DUMMY, span: dummy_span(), kind: TypeExprKind::Union(members) }
}

pub fn literal_string_ty(s: &str) -> TypeExpr {
    TypeExpr { id: NodeId::DUMMY, span: dummy_span(), kind: TypeExprKind::LiteralString(s.to_string()) }
}

pub fn block(stmts: Vec<Stmt>) -> Block {
    Block { stmts }
}

pub fn var_decl(kind: VarKind, name: &str, ty: Option<TypeExpr>, init: Option<Expr>) -> Stmt {
    stmt(StmtKind::VarDecl { kind, declarators: vec![VarDeclarator { name: name.to_string(), ty, init }] })
}

pub fn expr_stmt(e: Expr) -> Stmt {
    stmt(StmtKind::ExprStmt(e))
}

pub fn return_stmt(e: Option<Expr>) -> Stmt {
    stmt(StmtKind::Return(e))
}

pub fn if_stmt(test: Expr, consequent: Stmt, alternate: Option<Stmt>) -> Stmt {
    stmt(StmtKind::If { test, consequent: Box::new(consequent), alternate: alternate.map(Box::new) })
}

pub fn function_decl(name: &str, params: Vec<Param>, return_type: Option<TypeExpr>, body: Option<Block>) -> Stmt {
    stmt(StmtKind::FunctionDecl(FunctionDecl {
        name: name.to_string(),
        type_params: vec![],
        params,
        return_type,
        body,
        is_async: false,
        is_generator: false,
    }))
}

pub fn param(name: &str, ty: Option<TypeExpr>) -> Param {
    Param { name: name.to_string(), ty, optional: false, rest: false, default: None, property_modifier: None, decorators: vec![] }
}

pub fn interface_decl(name: &str, members: Vec<(&str, TypeExpr, bool)>) -> Stmt {
    stmt(StmtKind::InterfaceDecl(InterfaceDecl {
        name: name.to_string(),
        type_params: vec![],
        extends: vec![],
        members: members
            .into_iter()
            .map(|(n, ty, optional)| InterfaceMember { name: n.to_string(), ty, optional, readonly: false })
            .collect(),
        string_index: None,
        number_index: None,
    }))
}

pub fn object_literal(props: Vec<(&str, Expr)>) -> Expr {
    expr(ExprKind::Object(
        props
            .into_iter()
            .map(|(name, value)| ObjectProperty::KeyValue(PropertyAssignment { key: PropertyKey::Identifier(name.to_string()), value, computed: false }))
            .collect(),
    ))
}

pub fn switch_stmt(discriminant: Expr, cases: Vec<SwitchCase>) -> Stmt {
    stmt(StmtKind::Switch { discriminant, cases })
}

pub fn case(test: Option<Expr>, body: Vec<Stmt>) -> SwitchCase {
    SwitchCase { test, body }
}
