//! Syntactic type annotations — the type expressions as written in source,
//! before the checker resolves them into a semantic `TypeInfo` (§3).
//!
//! These are distinct from `stypec_types::TypeInfo`: a `TypeExpr` is what the
//! parser produced; a `TypeInfo` is what the checker concluded it *means*,
//! after resolving names, substituting type parameters, and canonicalizing
//! unions/intersections.

use serde::{Deserialize, Serialize};
use stypec_common::Span;

use crate::node::NodeId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeExpr {
    pub id: NodeId,
    pub span: Span,
    pub kind: TypeExprKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TypeExprKind {
    /// A bare keyword type: `string`, `number`, `boolean`, `void`, `null`,
    /// `undefined`, `symbol`, `bigint`, `any`, `unknown`, `never`, `object`.
    Keyword(KeywordType),
    /// A named reference, optionally with generic type arguments:
    /// `Foo`, `Array<string>`, `Map<string, number>`.
    Reference { name: String, type_args: Vec<TypeExpr> },
    /// A qualified reference through a namespace: `NS.Inner`.
    Qualified { path: Vec<String>, type_args: Vec<TypeExpr> },
    LiteralString(String),
    LiteralNumber(f64),
    LiteralBoolean(bool),
    Array(Box<TypeExpr>),
    Tuple(Vec<TupleElement>),
    Function(FunctionTypeExpr),
    /// `{ a: string; b?: number; [key: string]: unknown }`
    Object(ObjectTypeExpr),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Parenthesized(Box<TypeExpr>),
    /// `typeof someValue`
    TypeQuery(Vec<String>),
    /// `keyof T`
    KeyOf(Box<TypeExpr>),
    /// `T is U` — a user-defined type predicate return annotation.
    Predicate { param: String, asserted: Box<TypeExpr> },
    /// `this`
    ThisType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeywordType {
    String,
    Number,
    Boolean,
    Void,
    Null,
    Undefined,
    Symbol,
    BigInt,
    Any,
    Unknown,
    Never,
    Object,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TupleElement {
    pub ty: TypeExpr,
    pub optional: bool,
    pub rest: bool,
    pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionTypeExpr {
    pub type_params: Vec<TypeParamExpr>,
    pub params: Vec<ParamTypeExpr>,
    pub return_type: Box<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamTypeExpr {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeParamExpr {
    pub name: String,
    pub constraint: Option<TypeExpr>,
    pub default: Option<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeExpr {
    pub members: Vec<ObjectTypeMember>,
    pub string_index: Option<Box<TypeExpr>>,
    pub number_index: Option<Box<TypeExpr>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeMember {
    pub name: String,
    pub ty: TypeExpr,
    pub optional: bool,
    pub readonly: bool,
}
