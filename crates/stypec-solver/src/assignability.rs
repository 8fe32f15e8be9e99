//! The Compatibility Engine (§4.1): `assignable(expected, actual)`, the
//! single predicate underlying every assignment, return, argument-passing,
//! and narrowing decision in the checker. Mirrors the teacher's
//! `assignability_checker.rs`, collapsed onto this workspace's simpler
//! `Rc`-based type domain instead of an arena of interned `TypeId`s.
//!
//! Rules are tried in the exact priority order §4.1 specifies; the first
//! one that matches decides the call. Results are memoized per session
//! (`Solver::is_assignable`) keyed by the structural `(expected, actual)`
//! pair, since `Ty`'s `PartialEq`/`Hash` already compare by shape.

use std::cell::{Cell, RefCell};

use rustc_hash::{FxHashMap, FxHashSet};
use stypec_common::limits::MAX_ASSIGNABILITY_DEPTH;
use stypec_types::class::{Class, ClassHandle};
use stypec_types::{GenericRef, PrimitiveKind, Ty, TypeInfo};
use tracing::trace;

use crate::variance::{Variance, VarianceCache};

/// Registry of known generic class/interface definitions, keyed by name, so
/// `Instance<->Instance` comparisons (rule 20) can look up variance
/// information for the type arguments. Populated by the binder as classes
/// and interfaces are declared.
#[derive(Debug, Default)]
pub struct GenericRegistry {
    defs: FxHashMap<String, GenericRef>,
}

impl GenericRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: GenericRef) {
        self.defs.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<GenericRef> {
        self.defs.get(name).cloned()
    }
}

/// The compatibility engine: memoization cache plus a recursion-depth
/// backstop (§4.1 "Memoization", `limits::MAX_ASSIGNABILITY_DEPTH`).
///
/// One `Solver` lives for the duration of a checking session; its cache is
/// never shared across sessions (§5: "cleared between sessions").
pub struct Solver {
    cache: RefCell<FxHashMap<(Ty, Ty), bool>>,
    depth: Cell<usize>,
    pub variance: VarianceCache,
    pub generics: GenericRegistry,
}

impl Default for Solver {
    fn default() -> Self {
        Solver { cache: RefCell::new(FxHashMap::default()), depth: Cell::new(0), variance: VarianceCache::new(), generics: GenericRegistry::new() }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the memoization cache. Called at each top-level `check()` call
    /// per §4.1; does not touch the variance cache, which the spec says is
    /// reused across the whole session (§9 "Variance caching").
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    pub fn is_assignable(&self, expected: &Ty, actual: &Ty) -> bool {
        if let Some(result) = self.cache.borrow().get(&(expected.clone(), actual.clone())) {
            trace!(%expected, %actual, result, "assignability cache hit");
            return *result;
        }

        if self.depth.get() >= MAX_ASSIGNABILITY_DEPTH {
            // Pathological recursion (mutually recursive interfaces/generics
            // the memo cache hasn't broken the cycle on yet). Conservatively
            // reject rather than overflow the stack.
            return false;
        }
        self.depth.set(self.depth.get() + 1);
        let result = self.compute(expected, actual);
        self.depth.set(self.depth.get() - 1);

        self.cache.borrow_mut().insert((expected.clone(), actual.clone()), result);
        result
    }

    fn compute(&self, expected: &Ty, actual: &Ty) -> bool {
        use TypeInfo::*;

        // An `InstantiatedGeneric` is a lazy reference, not a shape any rule
        // below knows how to compare against; resolve it to the concrete
        // type it denotes first (§3 "substitution happens on demand").
        if let InstantiatedGeneric(inst) = expected.as_ref() {
            return self.is_assignable(&inst.resolve(), actual);
        }
        if let InstantiatedGeneric(inst) = actual.as_ref() {
            return self.is_assignable(expected, &inst.resolve());
        }

        // 1. `any` absorbs everything, on either side.
        if TypeInfo::is_any(expected) || TypeInfo::is_any(actual) {
            return true;
        }

        // 2-4. Type parameters.
        match (expected.as_ref(), actual.as_ref()) {
            (TypeParameter(e), TypeParameter(a)) => return e.id == a.id,
            _ => {}
        }
        if let TypeParameter(param) = expected.as_ref() {
            return match &param.constraint {
                Some(constraint) => self.is_assignable(constraint, actual),
                None => true,
            };
        }
        if let TypeParameter(_) = actual.as_ref() {
            // Rule 4 only reaches here because rule 1 (any-on-either-side)
            // already returned true for `expected == any`; anything else is
            // not assignable from a bare, unconstrained type parameter.
            return false;
        }

        // 5-6. `never`.
        if TypeInfo::is_never(actual) {
            return true;
        }
        if TypeInfo::is_never(expected) {
            return false; // actual already excluded being never above
        }

        // 7-8. `unknown`.
        if TypeInfo::is_unknown(expected) {
            return true;
        }
        if TypeInfo::is_unknown(actual) {
            return TypeInfo::is_unknown(expected) || TypeInfo::is_any(expected);
        }

        // 9. `null`.
        if TypeInfo::is_null(actual) {
            return TypeInfo::is_null(expected) || union_contains_null(expected);
        }

        // 10-11. Literals.
        match (expected.as_ref(), actual.as_ref()) {
            (LiteralString(e), LiteralString(a)) => return e == a,
            (LiteralNumber(e), LiteralNumber(a)) => return e == a,
            (LiteralBoolean(e), LiteralBoolean(a)) => return e == a,
            _ => {}
        }
        match (expected.as_ref(), actual.as_ref()) {
            (Primitive(PrimitiveKind::String), LiteralString(_)) => return true,
            (Primitive(PrimitiveKind::Number), LiteralNumber(_)) => return true,
            (Primitive(PrimitiveKind::Boolean), LiteralBoolean(_)) => return true,
            _ => {}
        }

        // 12-14. Unions.
        match (expected.as_ref(), actual.as_ref()) {
            (Union(e_members), Union(a_members)) => {
                return a_members.iter().all(|a| e_members.iter().any(|e| self.is_assignable(e, a)));
            }
            (Union(e_members), _) => {
                return e_members.iter().any(|e| self.is_assignable(e, actual));
            }
            (_, Union(a_members)) => {
                return a_members.iter().all(|a| self.is_assignable(expected, a));
            }
            _ => {}
        }

        // 15-16. Intersections.
        match (expected.as_ref(), actual.as_ref()) {
            (Intersection(e_members), _) => {
                return e_members.iter().all(|e| self.is_assignable(e, actual));
            }
            (_, Intersection(a_members)) => {
                return a_members.iter().any(|a| self.is_assignable(expected, a));
            }
            _ => {}
        }

        // 17. Enums.
        if let (Enum(e), Enum(a)) = (expected.as_ref(), actual.as_ref()) {
            return e.name == a.name;
        }
        if let Enum(e) = expected.as_ref() {
            return match e.kind {
                stypec_types::EnumKind::Numeric => matches!(actual.as_ref(), Primitive(PrimitiveKind::Number)),
                stypec_types::EnumKind::String => matches!(actual.as_ref(), Primitive(PrimitiveKind::String)),
                stypec_types::EnumKind::Heterogeneous => {
                    matches!(actual.as_ref(), Primitive(PrimitiveKind::Number) | Primitive(PrimitiveKind::String))
                }
            };
        }
        if let Enum(a) = actual.as_ref() {
            return match a.kind {
                stypec_types::EnumKind::Numeric => matches!(expected.as_ref(), Primitive(PrimitiveKind::Number)),
                stypec_types::EnumKind::String => matches!(expected.as_ref(), Primitive(PrimitiveKind::String)),
                stypec_types::EnumKind::Heterogeneous => {
                    matches!(expected.as_ref(), Primitive(PrimitiveKind::Number) | Primitive(PrimitiveKind::String))
                }
            };
        }

        // 18. Primitives.
        if let (Primitive(e), Primitive(a)) = (expected.as_ref(), actual.as_ref()) {
            return e == a;
        }

        // 19. Promise.
        if let (Promise(e), Promise(a)) = (expected.as_ref(), actual.as_ref()) {
            return self.is_assignable(e, a);
        }

        // 20. Instances.
        if let (Instance(e), Instance(a)) = (expected.as_ref(), actual.as_ref()) {
            return self.instance_assignable(e, a);
        }

        // 21-22. Interfaces (generic interfaces are substituted into a
        // concrete `Interface` by `InstantiatedGeneric::resolve` before
        // this is ever reached, so one rule covers both).
        if let Interface(e) = expected.as_ref() {
            return self.object_like_satisfies_interface(actual, e);
        }

        // 23. Arrays.
        if let (Array(e), Array(a)) = (expected.as_ref(), actual.as_ref()) {
            return self.is_assignable(e, a);
        }

        // 24. Records.
        if let (Record(e), Record(a)) = (expected.as_ref(), actual.as_ref()) {
            return e.fields.0.iter().all(|(name, e_ty)| match a.fields.0.get(name) {
                Some(a_ty) => self.is_assignable(e_ty, a_ty),
                None => false,
            });
        }

        // 25-27. Tuples and arrays.
        match (expected.as_ref(), actual.as_ref()) {
            (Tuple(e), Tuple(a)) => return self.tuple_assignable(e, a),
            (Tuple(e), Array(a_elem)) => {
                return (e.rest.is_some() || e.elements.iter().all(|el| el.optional))
                    && e.elements.iter().all(|el| self.is_assignable(&el.ty, a_elem))
                    && e.rest.as_ref().map_or(true, |r| self.is_assignable(r, a_elem));
            }
            (Array(e_elem), Tuple(a)) => {
                return a.elements.iter().all(|el| self.is_assignable(e_elem, &el.ty))
                    && a.rest.as_ref().map_or(true, |r| self.is_assignable(e_elem, r));
            }
            _ => {}
        }

        // 28. Functions.
        if let (Function(e), Function(a)) = (expected.as_ref(), actual.as_ref()) {
            return self.function_assignable(e, a);
        }
        if let (Function(e), OverloadedFunction(a)) = (expected.as_ref(), actual.as_ref()) {
            return self.function_assignable(e, &a.implementation);
        }
        if let (OverloadedFunction(e), Function(a)) = (expected.as_ref(), actual.as_ref()) {
            return e.signatures.iter().any(|sig| self.function_assignable(sig, a));
        }
        if let (OverloadedFunction(e), OverloadedFunction(a)) = (expected.as_ref(), actual.as_ref()) {
            return e.signatures.iter().any(|sig| self.function_assignable(sig, &a.implementation));
        }

        false
    }

    fn function_assignable(&self, expected: &stypec_types::FunctionSignature, actual: &stypec_types::FunctionSignature) -> bool {
        if actual.params.len() > expected.params.len() && !expected.has_rest {
            return false;
        }
        for (e_param, a_param) in expected.params.iter().zip(actual.params.iter()) {
            // Contravariant: the actual's parameter type must accept
            // whatever the expected signature can pass it.
            if !self.is_assignable(a_param, e_param) {
                return false;
            }
        }
        self.is_assignable(&expected.return_type, &actual.return_type)
    }

    fn tuple_assignable(&self, expected: &stypec_types::Tuple, actual: &stypec_types::Tuple) -> bool {
        if actual.elements.len() < expected.required_count {
            return false;
        }
        if expected.rest.is_none() && actual.elements.len() > expected.elements.len() {
            return false;
        }
        for (i, e_elem) in expected.elements.iter().enumerate() {
            match actual.elements.get(i) {
                Some(a_elem) => {
                    if !self.is_assignable(&e_elem.ty, &a_elem.ty) {
                        return false;
                    }
                }
                None => {
                    if !e_elem.optional {
                        return false;
                    }
                }
            }
        }
        if let Some(rest) = &expected.rest {
            for a_elem in actual.elements.iter().skip(expected.elements.len()) {
                if !self.is_assignable(rest, &a_elem.ty) {
                    return false;
                }
            }
            if let Some(a_rest) = &actual.rest {
                if !self.is_assignable(rest, a_rest) {
                    return false;
                }
            }
        }
        true
    }

    fn instance_assignable(&self, expected: &stypec_types::InstanceOf, actual: &stypec_types::InstanceOf) -> bool {
        if expected.class == actual.class {
            if expected.type_args.is_empty() {
                return true;
            }
            return self.type_args_assignable(&expected.class, &expected.type_args, &actual.type_args);
        }
        // Walk the actual's superclass chain looking for the expected class
        // (nominal subtyping, §4.1 rule 20).
        Class::is_subclass_of(&actual.class, &expected.class)
    }

    fn type_args_assignable(&self, class: &ClassHandle, expected_args: &[Ty], actual_args: &[Ty]) -> bool {
        if expected_args.len() != actual_args.len() {
            return false;
        }
        let def = self.generics.get(class.name());
        for (i, (e, a)) in expected_args.iter().zip(actual_args.iter()).enumerate() {
            let variance = def
                .as_ref()
                .and_then(|d| d.type_params.get(i).map(|p| self.variance.classify(d, p)))
                .unwrap_or(Variance::Invariant);
            let ok = match variance {
                Variance::Covariant => self.is_assignable(e, a),
                Variance::Contravariant => self.is_assignable(a, e),
                Variance::Invariant => self.is_assignable(e, a) && self.is_assignable(a, e),
                Variance::Bivariant => self.is_assignable(e, a) || self.is_assignable(a, e),
            };
            if !ok {
                return false;
            }
        }
        true
    }

    /// Structural satisfaction of an interface (rule 21) by any "object
    /// shaped" actual type: a record literal, another interface, or a class
    /// instance (walking its member/field chain).
    fn object_like_satisfies_interface(&self, actual: &Ty, expected: &stypec_types::Interface) -> bool {
        for (name, expected_ty) in expected.members.0.iter() {
            let optional = expected.optional.0.contains(name);
            match self.lookup_member(actual, name) {
                Some(actual_ty) => {
                    if !self.is_assignable(expected_ty, &actual_ty) {
                        return false;
                    }
                }
                None => {
                    if !optional {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Resolves a named member's type off any object-like `Ty`, used for
    /// both interface satisfaction and discriminant narrowing lookups.
    pub fn lookup_member(&self, ty: &Ty, name: &str) -> Option<Ty> {
        match ty.as_ref() {
            TypeInfo::Record(record) => record.fields.0.get(name).cloned(),
            TypeInfo::Interface(iface) => iface.members.0.get(name).cloned(),
            TypeInfo::Instance(instance) => Class::resolve_member(&instance.class, name).map(|m| m.ty),
            TypeInfo::Union(members) => {
                let mut result: Option<Ty> = None;
                for member in members {
                    let member_ty = self.lookup_member(member, name)?;
                    result = Some(match result {
                        Some(existing) => stypec_types::make_union(vec![existing, member_ty]),
                        None => member_ty,
                    });
                }
                result
            }
            TypeInfo::Intersection(members) => members.iter().find_map(|m| self.lookup_member(m, name)),
            TypeInfo::InstantiatedGeneric(inst) => self.lookup_member(&inst.resolve(), name),
            _ => None,
        }
    }
}

fn union_contains_null(ty: &Ty) -> bool {
    match ty.as_ref() {
        TypeInfo::Union(members) => members.iter().any(|m| TypeInfo::is_null(m)),
        _ => TypeInfo::is_null(ty),
    }
}

/// Excess-property check (§4.3, §4.4, glossary "Excess-property check"):
/// given a *fresh* object literal's inferred `Record` shape and the
/// context it's being assigned into, returns the field names present in
/// the literal but absent from the expected shape (and not covered by an
/// index signature).
pub fn excess_properties(expected: &Ty, literal: &stypec_types::Record) -> Vec<String> {
    let (known_names, string_index): (FxHashSet<&str>, bool) = match expected.as_ref() {
        TypeInfo::Record(r) => (r.fields.0.keys().map(String::as_str).collect(), r.string_index.is_some()),
        TypeInfo::Interface(i) => (i.members.0.keys().map(String::as_str).collect(), i.string_index.is_some()),
        _ => return Vec::new(),
    };
    if string_index {
        return Vec::new();
    }
    literal.fields.0.keys().filter(|name| !known_names.contains(name.as_str())).cloned().collect()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use stypec_types::{make_union, FunctionSignature, PrimitiveKind, Tuple, TupleElement};

    use super::*;

    fn prim(kind: PrimitiveKind) -> Ty {
        TypeInfo::primitive(kind)
    }

    fn lit_str(s: &str) -> Ty {
        Rc::new(TypeInfo::LiteralString(s.to_string()))
    }

    #[test]
    fn reflexivity() {
        let solver = Solver::new();
        let string = prim(PrimitiveKind::String);
        assert!(solver.is_assignable(&string, &string));
    }

    #[test]
    fn any_absorbs_both_directions() {
        let solver = Solver::new();
        let any = TypeInfo::any();
        let string = prim(PrimitiveKind::String);
        assert!(solver.is_assignable(&any, &string));
        assert!(solver.is_assignable(&string, &any));
    }

    #[test]
    fn never_is_bottom() {
        let solver = Solver::new();
        let never = TypeInfo::never();
        let string = prim(PrimitiveKind::String);
        assert!(solver.is_assignable(&string, &never));
        assert!(!solver.is_assignable(&never, &string));
    }

    #[test]
    fn unknown_is_top() {
        let solver = Solver::new();
        let unknown = TypeInfo::unknown();
        let string = prim(PrimitiveKind::String);
        assert!(solver.is_assignable(&unknown, &string));
        assert!(!solver.is_assignable(&string, &unknown));
    }

    #[test]
    fn literal_widening() {
        let solver = Solver::new();
        let string = prim(PrimitiveKind::String);
        let foo = lit_str("foo");
        assert!(solver.is_assignable(&string, &foo));
        assert!(solver.is_assignable(&foo, &foo));
        assert!(!solver.is_assignable(&foo, &string));
    }

    #[test]
    fn tuple_to_array_bridge() {
        let solver = Solver::new();
        let number = prim(PrimitiveKind::Number);
        let string = prim(PrimitiveKind::String);
        let union = make_union(vec![number.clone(), string.clone()]);
        let array = Rc::new(TypeInfo::Array(union));
        let tuple = Rc::new(TypeInfo::Tuple(Tuple {
            elements: vec![
                TupleElement { ty: number, optional: false },
                TupleElement { ty: string, optional: false },
            ],
            required_count: 2,
            rest: None,
        }));
        assert!(solver.is_assignable(&array, &tuple));
        assert!(!solver.is_assignable(&tuple, &array));
    }

    #[test]
    fn bigint_and_number_are_distinct() {
        let solver = Solver::new();
        let bigint = prim(PrimitiveKind::BigInt);
        let number = prim(PrimitiveKind::Number);
        assert!(!solver.is_assignable(&bigint, &number));
        assert!(!solver.is_assignable(&number, &bigint));
    }

    #[test]
    fn function_parameters_are_contravariant() {
        let solver = Solver::new();
        let number = prim(PrimitiveKind::Number);
        let string = prim(PrimitiveKind::String);
        let union = make_union(vec![number.clone(), string.clone()]);
        // (x: number | string) => void must accept (x: number) => void: the
        // narrower actual parameter is fine wherever a wider one is called for.
        let expected = Rc::new(TypeInfo::Function(FunctionSignature {
            params: vec![union],
            return_type: TypeInfo::primitive(PrimitiveKind::Void),
            min_arity: 1,
            has_rest: false,
            this_type: None,
        }));
        let actual = Rc::new(TypeInfo::Function(FunctionSignature {
            params: vec![number],
            return_type: TypeInfo::primitive(PrimitiveKind::Void),
            min_arity: 1,
            has_rest: false,
            this_type: None,
        }));
        assert!(solver.is_assignable(&expected, &actual));
    }

    #[test]
    fn memoization_is_idempotent() {
        let solver = Solver::new();
        let string = prim(PrimitiveKind::String);
        let foo = lit_str("foo");
        assert_eq!(solver.is_assignable(&string, &foo), solver.is_assignable(&string, &foo));
    }
}
