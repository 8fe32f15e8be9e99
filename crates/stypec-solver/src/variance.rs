//! Variance-position analysis for generic type parameters (§4.1 "Variance",
//! §9 "Variance caching").
//!
//! For a generic class or interface `G<T>`, classifies each occurrence of
//! `T` in its members as an *output* position (covariant: return types,
//! field types) or an *input* position (contravariant: function parameter
//! types). The result for a given `(definition, parameter)` pair is cached
//! for the lifetime of the session, since walking every member of a large
//! generic class on every `G<A>` vs. `G<B>` comparison would be wasteful —
//! the cache key is `(type-definition-name, parameter-name)`, per §9,
//! rather than anything connected to the specific instantiation being
//! compared.

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use stypec_types::class::Class;
use stypec_types::generics::{GenericDefKind, TypeParameter};
use stypec_types::{GenericRef, Ty, TypeInfo};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variance {
    Covariant,
    Contravariant,
    Invariant,
    Bivariant,
}

#[derive(Default)]
struct Occurrences {
    output: bool,
    input: bool,
}

pub struct VarianceCache {
    cache: RefCell<FxHashMap<(String, String), Variance>>,
}

impl VarianceCache {
    pub fn new() -> Self {
        VarianceCache { cache: RefCell::new(FxHashMap::default()) }
    }

    pub fn classify(&self, def: &GenericRef, param: &TypeParameter) -> Variance {
        let key = (def.name.clone(), param.name.clone());
        if let Some(variance) = self.cache.borrow().get(&key) {
            return *variance;
        }
        let variance = compute_variance(def, param.id);
        self.cache.borrow_mut().insert(key, variance);
        variance
    }
}

fn compute_variance(def: &GenericRef, param_id: u32) -> Variance {
    let mut occurrences = Occurrences::default();
    match &def.kind {
        GenericDefKind::Class(handle) => {
            if handle.is_frozen() {
                for member in handle.get().members.values() {
                    walk(&member.ty, param_id, false, &mut occurrences);
                }
            }
        }
        GenericDefKind::Interface(iface) => {
            for ty in iface.members.0.values() {
                walk(ty, param_id, false, &mut occurrences);
            }
        }
        GenericDefKind::Function(sig) => {
            walk(&Ty::from(TypeInfo::Function(sig.clone())), param_id, false, &mut occurrences);
        }
        GenericDefKind::TypeAlias(template) => {
            walk(template, param_id, false, &mut occurrences);
        }
    }

    match (occurrences.output, occurrences.input) {
        (true, true) => Variance::Invariant,
        (true, false) => Variance::Covariant,
        (false, true) => Variance::Contravariant,
        (false, false) => Variance::Bivariant,
    }
}

/// `flip` is true while walking a contravariant (function parameter)
/// position; a `TypeParameter` occurrence found with `flip == true` is an
/// input position, with `flip == false` an output position. Nested function
/// parameters flip again, restoring covariance for e.g. `(cb: (x: T) =>
/// void) => void`, where `T` is itself back in output position relative to
/// the outer generic.
fn walk(ty: &Ty, param_id: u32, flip: bool, out: &mut Occurrences) {
    match ty.as_ref() {
        TypeInfo::TypeParameter(p) if p.id == param_id => {
            if flip {
                out.input = true;
            } else {
                out.output = true;
            }
        }
        TypeInfo::Array(elem) => walk(elem, param_id, flip, out),
        TypeInfo::Tuple(tuple) => {
            for elem in &tuple.elements {
                walk(&elem.ty, param_id, flip, out);
            }
            if let Some(rest) = &tuple.rest {
                walk(rest, param_id, flip, out);
            }
        }
        TypeInfo::Record(record) => {
            for ty in record.fields.0.values() {
                walk(ty, param_id, flip, out);
            }
            for index in [&record.string_index, &record.number_index, &record.symbol_index].into_iter().flatten() {
                walk(index, param_id, flip, out);
            }
        }
        TypeInfo::Function(sig) => {
            for param in &sig.params {
                walk(param, param_id, !flip, out);
            }
            walk(&sig.return_type, param_id, flip, out);
        }
        TypeInfo::Union(members) | TypeInfo::Intersection(members) => {
            for member in members {
                walk(member, param_id, flip, out);
            }
        }
        TypeInfo::Promise(inner)
        | TypeInfo::SetType(inner)
        | TypeInfo::WeakSet(inner)
        | TypeInfo::IteratorType(inner)
        | TypeInfo::GeneratorType(inner)
        | TypeInfo::AsyncGeneratorType(inner) => walk(inner, param_id, flip, out),
        TypeInfo::MapType(k, v) | TypeInfo::WeakMap(k, v) => {
            walk(k, param_id, flip, out);
            walk(v, param_id, flip, out);
        }
        // A nested generic instantiation or class instance might use `T` in
        // either position internally; without re-running a full nested
        // analysis, treat any occurrence conservatively as both.
        TypeInfo::InstantiatedGeneric(inst) => {
            for arg in &inst.type_args {
                walk(arg, param_id, false, out);
                walk(arg, param_id, true, out);
            }
        }
        TypeInfo::Instance(instance) => {
            for arg in &instance.type_args {
                walk(arg, param_id, false, out);
                walk(arg, param_id, true, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use stypec_types::class::ClassHandle;
    use stypec_types::generics::GenericDef;
    use stypec_types::{FunctionSignature, PrimitiveKind};

    use super::*;

    fn type_param(name: &str) -> TypeParameter {
        TypeParameter::new(name, None, None)
    }

    #[test]
    fn output_only_is_covariant() {
        let t = type_param("T");
        let sig = FunctionSignature {
            params: vec![],
            return_type: Rc::new(TypeInfo::TypeParameter(t.clone())),
            min_arity: 0,
            has_rest: false,
            this_type: None,
        };
        let def: GenericRef = Rc::new(GenericDef { name: "Getter".into(), type_params: vec![t.clone()], kind: GenericDefKind::Function(sig) });
        let cache = VarianceCache::new();
        assert_eq!(cache.classify(&def, &t), Variance::Covariant);
    }

    #[test]
    fn input_only_is_contravariant() {
        let t = type_param("T");
        let sig = FunctionSignature {
            params: vec![Rc::new(TypeInfo::TypeParameter(t.clone()))],
            return_type: TypeInfo::primitive(PrimitiveKind::Void),
            min_arity: 1,
            has_rest: false,
            this_type: None,
        };
        let def: GenericRef = Rc::new(GenericDef { name: "Setter".into(), type_params: vec![t.clone()], kind: GenericDefKind::Function(sig) });
        let cache = VarianceCache::new();
        assert_eq!(cache.classify(&def, &t), Variance::Contravariant);
    }

    #[test]
    fn both_positions_is_invariant() {
        let t = type_param("T");
        let sig = FunctionSignature {
            params: vec![Rc::new(TypeInfo::TypeParameter(t.clone()))],
            return_type: Rc::new(TypeInfo::TypeParameter(t.clone())),
            min_arity: 1,
            has_rest: false,
            this_type: None,
        };
        let def: GenericRef = Rc::new(GenericDef { name: "Cell".into(), type_params: vec![t.clone()], kind: GenericDefKind::Function(sig) });
        let cache = VarianceCache::new();
        assert_eq!(cache.classify(&def, &t), Variance::Invariant);
    }

    #[test]
    fn unused_parameter_is_bivariant() {
        let t = type_param("T");
        let sig = FunctionSignature {
            params: vec![],
            return_type: TypeInfo::primitive(PrimitiveKind::Void),
            min_arity: 0,
            has_rest: false,
            this_type: None,
        };
        let def: GenericRef = Rc::new(GenericDef { name: "Noop".into(), type_params: vec![t.clone()], kind: GenericDefKind::Function(sig) });
        let cache = VarianceCache::new();
        assert_eq!(cache.classify(&def, &t), Variance::Bivariant);
    }

    #[test]
    fn class_kind_reads_frozen_members() {
        let t = type_param("T");
        let handle = ClassHandle::new("Box");
        let mut members = indexmap::IndexMap::new();
        members.insert(
            "value".to_string(),
            stypec_types::ClassMember { ty: Rc::new(TypeInfo::TypeParameter(t.clone())), is_static: false, is_readonly: true, is_private: false, is_protected: false },
        );
        handle.freeze(stypec_types::Class {
            name: "Box".into(),
            superclass: None,
            implements: vec![],
            members,
            optional: Default::default(),
            is_abstract: false,
            abstract_members: Default::default(),
        });
        let def: GenericRef = Rc::new(GenericDef { name: "Box".into(), type_params: vec![t.clone()], kind: GenericDefKind::Class(handle) });
        let cache = VarianceCache::new();
        assert_eq!(cache.classify(&def, &t), Variance::Covariant);
    }
}
