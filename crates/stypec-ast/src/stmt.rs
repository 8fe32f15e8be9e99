//! Statement and declaration AST nodes (§6 input interface).

use serde::{Deserialize, Serialize};
use stypec_common::Span;

use crate::expr::Expr;
use crate::node::NodeId;
use crate::ty::{TypeExpr, TypeParamExpr};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(id: NodeId, span: Span, kind: StmtKind) -> Self {
        Stmt { id, span, kind }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub optional: bool,
    pub rest: bool,
    pub default: Option<Expr>,
    /// A constructor-parameter-property access modifier, e.g.
    /// `constructor(private x: number)`, which both declares the parameter
    /// and a class field of the same name.
    pub property_modifier: Option<AccessModifier>,
    /// Parameter decorators (`method(@validate x: number)`); only legal
    /// under the legacy decorator proposal (§9 Open Question).
    pub decorators: Vec<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessModifier {
    Public,
    Private,
    Protected,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VarDeclarator {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub init: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub type_params: Vec<TypeParamExpr>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    /// `None` for an overload signature (body-less).
    pub body: Option<Block>,
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    Method,
    Getter,
    Setter,
    Constructor,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub decorators: Vec<Expr>,
    pub kind: MethodKind,
    pub type_params: Vec<TypeParamExpr>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub body: Option<Block>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_async: bool,
    pub is_generator: bool,
    pub is_override: bool,
    pub access: AccessModifier,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub decorators: Vec<Expr>,
    pub ty: Option<TypeExpr>,
    pub init: Option<Expr>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_readonly: bool,
    pub access: AccessModifier,
    /// An auto-accessor field (`accessor x: T`), which is checked like a
    /// field but synthesizes a getter/setter pair for override purposes.
    pub is_auto_accessor: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClassMember {
    Method(MethodDecl),
    Field(FieldDecl),
    StaticBlock(Block),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: Option<String>,
    pub decorators: Vec<Expr>,
    pub type_params: Vec<TypeParamExpr>,
    pub superclass: Option<TypeExpr>,
    pub implements: Vec<TypeExpr>,
    pub members: Vec<ClassMember>,
    pub is_abstract: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterfaceMember {
    pub name: String,
    pub ty: TypeExpr,
    pub optional: bool,
    pub readonly: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub name: String,
    pub type_params: Vec<TypeParamExpr>,
    pub extends: Vec<TypeExpr>,
    pub members: Vec<InterfaceMember>,
    pub string_index: Option<TypeExpr>,
    pub number_index: Option<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeAliasDecl {
    pub name: String,
    pub type_params: Vec<TypeParamExpr>,
    pub ty: TypeExpr,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub is_const: bool,
    pub members: Vec<EnumMember>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamespaceDecl {
    pub name: String,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportSpecifier {
    pub imported: String,
    pub local: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ImportClause {
    /// `import { a, b as c } from "path"`
    Named(Vec<ImportSpecifier>),
    /// `import * as ns from "path"`
    Namespace(String),
    /// `import Default from "path"`
    Default(String),
    /// `import Default, { a } from "path"`
    DefaultAndNamed { default: String, named: Vec<ImportSpecifier> },
    /// `import x = require("path")`
    EqualsRequire { local: String },
    /// `import "path"` (side-effect only)
    SideEffect,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub clause: ImportClause,
    pub module_specifier: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExportKind {
    /// `export { a, b as c }`
    Named(Vec<ImportSpecifier>),
    /// `export { a } from "path"`
    ReExportNamed { specifiers: Vec<ImportSpecifier>, module_specifier: String },
    /// `export * from "path"`
    ReExportAll { module_specifier: String, alias: Option<String> },
    /// `export default <expr>`
    Default(Expr),
    /// `export = value`
    ExportAssignment(Expr),
    /// `export` modifier applied directly to a following declaration.
    Declaration(Box<Stmt>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    Block(Block),
    VarDecl { kind: VarKind, declarators: Vec<VarDeclarator> },
    FunctionDecl(FunctionDecl),
    ClassDecl(ClassDecl),
    InterfaceDecl(InterfaceDecl),
    TypeAliasDecl(TypeAliasDecl),
    EnumDecl(EnumDecl),
    NamespaceDecl(NamespaceDecl),

    If { test: Expr, consequent: Box<Stmt>, alternate: Option<Box<Stmt>> },
    While { test: Expr, body: Box<Stmt> },
    DoWhile { body: Box<Stmt>, test: Expr },
    For { init: Option<Box<Stmt>>, test: Option<Expr>, update: Option<Expr>, body: Box<Stmt> },
    ForOf { kind: VarKind, binding: String, ty: Option<TypeExpr>, iterable: Expr, body: Box<Stmt>, is_await: bool },
    ForIn { kind: VarKind, binding: String, object: Expr, body: Box<Stmt> },
    Switch { discriminant: Expr, cases: Vec<SwitchCase> },
    Labeled { label: String, body: Box<Stmt> },

    Return(Option<Expr>),
    Break(Option<String>),
    Continue(Option<String>),
    Throw(Expr),
    TryCatch { block: Block, catch: Option<CatchClause>, finally: Option<Block> },

    ExprStmt(Expr),
    Directive(String),
    Empty,

    Import(ImportDecl),
    Export(ExportKind),

    DeclareModule { name: String, body: Vec<Stmt> },
    DeclareGlobal { body: Vec<Stmt> },
    Ambient(Box<Stmt>),

    Using { is_await: bool, declarators: Vec<VarDeclarator> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub param: Option<String>,
    pub param_ty: Option<TypeExpr>,
    pub body: Block,
}

/// A parsed source file: the unit the checker sees as one module (§4.6).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub path: String,
    pub body: Vec<Stmt>,
}
