//! AST node types the type checker consumes.
//!
//! The lexer and parser that produce these nodes are external collaborators
//! (§1 of the specification) — this crate defines only the *shape* of their
//! output, the interface the checker is written against. A real embedding
//! tool constructs these nodes from its own parser; the `tests` helpers in
//! `stypec-checker` build them by hand for fixture programs.

pub mod expr;
pub mod node;
pub mod stmt;
pub mod ty;

pub use expr::{
    ArrayElement, ArrowBody, Argument, AssignOp, BinaryOp, Expr, ExprKind, Literal, LogicalOp, MemberKey,
    ObjectProperty, PropertyAssignment, PropertyKey, TemplateLiteral, UnaryOp, UpdateOp,
};
pub use node::{NodeId, NodeIdGen};
pub use stmt::{
    AccessModifier, Block, CatchClause, ClassDecl, ClassMember, EnumDecl, EnumMember, ExportKind, FieldDecl,
    FunctionDecl, ImportClause, ImportDecl, ImportSpecifier, InterfaceDecl, InterfaceMember, MethodDecl, MethodKind,
    Module, NamespaceDecl, Param, Stmt, StmtKind, SwitchCase, TypeAliasDecl, VarDeclarator, VarKind,
};
pub use ty::{
    FunctionTypeExpr, KeywordType, ObjectTypeExpr, ObjectTypeMember, ParamTypeExpr, TupleElement, TypeExpr,
    TypeExprKind, TypeParamExpr,
};
