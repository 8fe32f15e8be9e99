//! The Narrowing Engine (§4.2): flow-sensitive refinement of a binding's
//! type through `typeof`/`instanceof`/truthiness/equality guards, tracked
//! per lexical **path** (a variable name, optionally followed by property
//! accesses). Mirrors the teacher's `control_flow_narrowing.rs` /
//! `NarrowingContext`, simplified onto string paths since this workspace's
//! checker walks a boxed AST rather than resolving symbols through an
//! arena.

use rustc_hash::FxHashMap;
use stypec_types::{make_union, PrimitiveKind, Ty, TypeInfo};

use crate::assignability::Solver;

/// A path-indexed stack of refinements (§9 "Narrowing stack"). Each pushed
/// frame starts as a copy of the frame beneath it, so narrowing a path in a
/// nested scope doesn't leak into the parent once popped, but an
/// unmodified path still resolves through to whatever it was refined to
/// further out. `push`/`pop` are explicit rather than guard-based because
/// the checker's statement/expression visitors are themselves the natural
/// "drop points" (end of `if`-consequent, end of loop body, ...); the
/// checker crate wraps them with [`stypec_common::Scoped`] where an RAII
/// guard reads more clearly.
#[derive(Debug, Default)]
pub struct NarrowingContext {
    frames: Vec<FxHashMap<String, Ty>>,
}

impl NarrowingContext {
    pub fn new() -> Self {
        NarrowingContext { frames: vec![FxHashMap::default()] }
    }

    pub fn push(&mut self) {
        let top = self.frames.last().cloned().unwrap_or_default();
        self.frames.push(top);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
        if self.frames.is_empty() {
            self.frames.push(FxHashMap::default());
        }
    }

    pub fn narrow(&mut self, path: impl Into<String>, ty: Ty) {
        if let Some(top) = self.frames.last_mut() {
            top.insert(path.into(), ty);
        }
    }

    pub fn get(&self, path: &str) -> Option<&Ty> {
        self.frames.last().and_then(|top| top.get(path))
    }

    /// Drops refinements for `path` and anything nested under it (`path.foo`),
    /// since an assignment to `path` invalidates whatever was proven about
    /// its previous value, and a refinement of a sub-path no longer holds
    /// once its parent has been reassigned.
    pub fn invalidate(&mut self, path: &str) {
        if let Some(top) = self.frames.last_mut() {
            let prefix = format!("{path}.");
            top.retain(|key, _| key != path && !key.starts_with(&prefix));
        }
    }

    /// Joins two sibling branches' refinement sets (e.g. after an `if`/`else`
    /// with no terminating branch): only paths refined in both survive, as
    /// the union of the two refined types (§9: "Implement joins as type
    /// unions over the shared paths and drop unshared ones").
    pub fn join(then_frame: &FxHashMap<String, Ty>, else_frame: &FxHashMap<String, Ty>) -> FxHashMap<String, Ty> {
        let mut joined = FxHashMap::default();
        for (path, then_ty) in then_frame {
            if let Some(else_ty) = else_frame.get(path) {
                joined.insert(path.clone(), make_union(vec![then_ty.clone(), else_ty.clone()]));
            }
        }
        joined
    }

    pub fn snapshot(&self) -> FxHashMap<String, Ty> {
        self.frames.last().cloned().unwrap_or_default()
    }

    pub fn restore(&mut self, frame: FxHashMap<String, Ty>) {
        if let Some(top) = self.frames.last_mut() {
            *top = frame;
        }
    }
}

/// The typeof-operator's result for a given static type — note that
/// `typeof null === "object"` in source-language semantics, which is why
/// `Primitive(Null)` is *not* treated the same as `Undefined` here.
fn typeof_kind(ty: &Ty) -> &'static str {
    match ty.as_ref() {
        TypeInfo::Primitive(PrimitiveKind::String) | TypeInfo::LiteralString(_) => "string",
        TypeInfo::Primitive(PrimitiveKind::Number) | TypeInfo::LiteralNumber(_) => "number",
        TypeInfo::Primitive(PrimitiveKind::Boolean) | TypeInfo::LiteralBoolean(_) => "boolean",
        TypeInfo::Primitive(PrimitiveKind::BigInt) => "bigint",
        TypeInfo::Primitive(PrimitiveKind::Undefined) => "undefined",
        TypeInfo::Primitive(PrimitiveKind::Symbol) | TypeInfo::UniqueSymbol(_) => "symbol",
        TypeInfo::Function(_) | TypeInfo::OverloadedFunction(_) | TypeInfo::GenericFunction(_) => "function",
        _ => "object",
    }
}

/// Splits a (possibly union) type into the members that satisfy
/// `typeof x === kind` and the members that don't, for narrowing both
/// branches of the guard (§4.2).
pub fn narrow_typeof(ty: &Ty, kind: &str) -> (Ty, Ty) {
    let members = union_members(ty);
    let (matching, rest): (Vec<Ty>, Vec<Ty>) = members.into_iter().partition(|m| typeof_kind(m) == kind);
    (make_union(matching), make_union(rest))
}

/// `x === null` / `x === undefined` / `x == null` (nullish): splits into
/// the nullish members and everything else.
pub fn narrow_nullish(ty: &Ty, include_undefined: bool) -> (Ty, Ty) {
    let members = union_members(ty);
    let (nullish, rest): (Vec<Ty>, Vec<Ty>) = members.into_iter().partition(|m| {
        TypeInfo::is_null(m) || (include_undefined && matches!(m.as_ref(), TypeInfo::Primitive(PrimitiveKind::Undefined)))
    });
    (make_union(nullish), make_union(rest))
}

/// Truthiness narrowing (`if (x)`): the truthy branch drops
/// `null | undefined | 0 | "" | false` members; the falsy branch keeps only
/// those (plus any member that could be falsy at some value, conservatively
/// kept whole since literal-level falsiness of e.g. `string` can't be
/// decided statically).
pub fn narrow_truthy(ty: &Ty) -> (Ty, Ty) {
    let members = union_members(ty);
    let mut truthy = Vec::new();
    let mut falsy = Vec::new();
    for member in members {
        if is_definitely_falsy(&member) {
            falsy.push(member);
        } else if is_definitely_truthy(&member) {
            truthy.push(member);
        } else {
            truthy.push(member.clone());
            falsy.push(member);
        }
    }
    (make_union(truthy), make_union(falsy))
}

fn is_definitely_falsy(ty: &Ty) -> bool {
    match ty.as_ref() {
        TypeInfo::Primitive(PrimitiveKind::Null | PrimitiveKind::Undefined | PrimitiveKind::Void) => true,
        TypeInfo::LiteralString(s) => s.is_empty(),
        TypeInfo::LiteralNumber(n) => n.0 == 0.0,
        TypeInfo::LiteralBoolean(b) => !b,
        _ => false,
    }
}

fn is_definitely_truthy(ty: &Ty) -> bool {
    matches!(
        ty.as_ref(),
        TypeInfo::Array(_)
            | TypeInfo::Tuple(_)
            | TypeInfo::Record(_)
            | TypeInfo::Interface(_)
            | TypeInfo::Instance(_)
            | TypeInfo::Function(_)
            | TypeInfo::OverloadedFunction(_)
    )
}

/// `x === <literal>`: narrows a union of literals (or a single type) to the
/// branch matching the literal and the branch excluding it.
pub fn narrow_equality(ty: &Ty, literal: &Ty) -> (Ty, Ty) {
    let members = union_members(ty);
    let (matching, rest): (Vec<Ty>, Vec<Ty>) = members.into_iter().partition(|m| m == literal);
    let then_ty = if matching.is_empty() { literal.clone() } else { make_union(matching) };
    (then_ty, make_union(rest))
}

/// `"k" in x`: keeps union members that expose member `k`.
pub fn narrow_has_member(solver: &Solver, ty: &Ty, member: &str) -> (Ty, Ty) {
    let members = union_members(ty);
    let (has, rest): (Vec<Ty>, Vec<Ty>) = members.into_iter().partition(|m| solver.lookup_member(m, member).is_some());
    (make_union(has), make_union(rest))
}

/// `x.kind === "foo"` discriminated-union narrowing: keeps union members
/// whose `field` member type is exactly (or includes) the literal.
pub fn narrow_discriminant(solver: &Solver, ty: &Ty, field: &str, literal: &Ty) -> (Ty, Ty) {
    let members = union_members(ty);
    let (matching, rest): (Vec<Ty>, Vec<Ty>) = members.into_iter().partition(|m| match solver.lookup_member(m, field) {
        Some(field_ty) => solver.is_assignable(&field_ty, literal),
        None => false,
    });
    (make_union(matching), make_union(rest))
}

/// `x instanceof C`: keeps union members that are instances of `C` or a
/// subclass of it; the else branch keeps members that are provably not.
pub fn narrow_instance_of(ty: &Ty, class: &stypec_types::class::ClassHandle) -> (Ty, Ty) {
    use stypec_types::class::Class;

    let members = union_members(ty);
    let (matching, rest): (Vec<Ty>, Vec<Ty>) = members.into_iter().partition(|m| match m.as_ref() {
        TypeInfo::Instance(instance) => Class::is_subclass_of(&instance.class, class),
        _ => false,
    });
    (make_union(matching), make_union(rest))
}

/// `nonNullish(x)` for `??`'s left operand.
pub fn non_nullish(ty: &Ty) -> Ty {
    let members = union_members(ty);
    make_union(members.into_iter().filter(|m| !TypeInfo::is_nullish(m)).collect())
}

fn union_members(ty: &Ty) -> Vec<Ty> {
    match ty.as_ref() {
        TypeInfo::Union(members) => members.clone(),
        _ => vec![ty.clone()],
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn prim(kind: PrimitiveKind) -> Ty {
        TypeInfo::primitive(kind)
    }

    #[test]
    fn typeof_splits_union() {
        let union = make_union(vec![prim(PrimitiveKind::String), prim(PrimitiveKind::Number)]);
        let (then_ty, else_ty) = narrow_typeof(&union, "string");
        assert_eq!(then_ty, prim(PrimitiveKind::String));
        assert_eq!(else_ty, prim(PrimitiveKind::Number));
    }

    #[test]
    fn typeof_null_is_object() {
        assert_eq!(typeof_kind(&prim(PrimitiveKind::Null)), "object");
    }

    #[test]
    fn truthy_removes_nullish_and_falsy_literals() {
        let union = make_union(vec![
            prim(PrimitiveKind::Null),
            prim(PrimitiveKind::Undefined),
            Rc::new(TypeInfo::LiteralNumber(stypec_types::OrderedFloat(0.0))),
            Rc::new(TypeInfo::LiteralString(String::new())),
            Rc::new(TypeInfo::LiteralBoolean(false)),
            prim(PrimitiveKind::String),
        ]);
        let (truthy, _falsy) = narrow_truthy(&union);
        assert_eq!(truthy, prim(PrimitiveKind::String));
    }

    #[test]
    fn equality_narrows_literal_union() {
        let a = Rc::new(TypeInfo::LiteralString("a".into()));
        let b = Rc::new(TypeInfo::LiteralString("b".into()));
        let union = make_union(vec![a.clone(), b.clone()]);
        let (then_ty, else_ty) = narrow_equality(&union, &a);
        assert_eq!(then_ty, a);
        assert_eq!(else_ty, b);
    }

    #[test]
    fn push_pop_restores_parent_frame() {
        let mut ctx = NarrowingContext::new();
        ctx.narrow("x", prim(PrimitiveKind::String));
        ctx.push();
        ctx.narrow("x", prim(PrimitiveKind::Number));
        assert_eq!(ctx.get("x"), Some(&prim(PrimitiveKind::Number)));
        ctx.pop();
        assert_eq!(ctx.get("x"), Some(&prim(PrimitiveKind::String)));
    }

    #[test]
    fn invalidate_drops_nested_paths() {
        let mut ctx = NarrowingContext::new();
        ctx.narrow("x", prim(PrimitiveKind::String));
        ctx.narrow("x.y", prim(PrimitiveKind::Number));
        ctx.invalidate("x");
        assert_eq!(ctx.get("x"), None);
        assert_eq!(ctx.get("x.y"), None);
    }

    #[test]
    fn join_keeps_only_shared_paths_as_union() {
        let mut then_frame = FxHashMap::default();
        then_frame.insert("x".to_string(), prim(PrimitiveKind::String));
        then_frame.insert("y".to_string(), prim(PrimitiveKind::Number));
        let mut else_frame = FxHashMap::default();
        else_frame.insert("x".to_string(), prim(PrimitiveKind::Boolean));
        let joined = NarrowingContext::join(&then_frame, &else_frame);
        assert_eq!(joined.len(), 1);
        assert_eq!(
            joined.get("x"),
            Some(&make_union(vec![prim(PrimitiveKind::String), prim(PrimitiveKind::Boolean)]))
        );
    }
}
