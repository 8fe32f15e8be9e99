//! Generic type-argument inference (§4.3 "Type argument inference"): given
//! a generic function's declared parameter types and the actual argument
//! types a call site supplies, infer a binding for each type parameter by
//! structural unification, joining multiple candidate bindings for the
//! same parameter with their union (least-upper-bound, per the spec's own
//! wording).

use rustc_hash::FxHashMap;
use stypec_types::generics::TypeParameter;
use stypec_types::{make_union, Ty, TypeInfo};

/// Unifies `param_tys` (the declared, still-generic parameter types)
/// against `arg_tys` (the actual argument types at the call site),
/// producing a substitution map from type-parameter id to inferred type.
/// Parameters that never occur in an output position relative to any
/// argument are left unbound; the caller resolves those against the
/// parameter's constraint (or `unknown`).
pub fn infer_type_args(type_params: &[TypeParameter], param_tys: &[Ty], arg_tys: &[Ty]) -> FxHashMap<u32, Ty> {
    let mut candidates: FxHashMap<u32, Vec<Ty>> = FxHashMap::default();
    for (param_ty, arg_ty) in param_tys.iter().zip(arg_tys.iter()) {
        collect(param_ty, arg_ty, &mut candidates);
    }

    let mut bindings = FxHashMap::default();
    for param in type_params {
        if let Some(candidates) = candidates.remove(&param.id) {
            bindings.insert(param.id, make_union(candidates));
        }
    }
    bindings
}

/// Resolves every declared type parameter to either its inferred binding,
/// its default, its constraint, or `unknown` if none apply — the fallback
/// order a call site with fewer explicit arguments than parameters needs.
pub fn complete_bindings(type_params: &[TypeParameter], mut bindings: FxHashMap<u32, Ty>) -> FxHashMap<u32, Ty> {
    for param in type_params {
        bindings.entry(param.id).or_insert_with(|| {
            param.default.clone().or_else(|| param.constraint.clone()).unwrap_or_else(TypeInfo::unknown)
        });
    }
    bindings
}

fn collect(param_ty: &Ty, arg_ty: &Ty, out: &mut FxHashMap<u32, Vec<Ty>>) {
    match param_ty.as_ref() {
        TypeInfo::TypeParameter(p) => {
            out.entry(p.id).or_default().push(arg_ty.clone());
        }
        TypeInfo::Array(elem) => {
            if let TypeInfo::Array(arg_elem) = arg_ty.as_ref() {
                collect(elem, arg_elem, out);
            }
        }
        TypeInfo::Tuple(tuple) => {
            if let TypeInfo::Tuple(arg_tuple) = arg_ty.as_ref() {
                for (p, a) in tuple.elements.iter().zip(arg_tuple.elements.iter()) {
                    collect(&p.ty, &a.ty, out);
                }
            }
        }
        TypeInfo::Record(record) => {
            if let TypeInfo::Record(arg_record) = arg_ty.as_ref() {
                for (name, field_ty) in record.fields.0.iter() {
                    if let Some(arg_field_ty) = arg_record.fields.0.get(name) {
                        collect(field_ty, arg_field_ty, out);
                    }
                }
            }
        }
        TypeInfo::Function(sig) => {
            if let TypeInfo::Function(arg_sig) = arg_ty.as_ref() {
                for (p, a) in sig.params.iter().zip(arg_sig.params.iter()) {
                    collect(p, a, out);
                }
                collect(&sig.return_type, &arg_sig.return_type, out);
            }
        }
        TypeInfo::Promise(inner) => {
            if let TypeInfo::Promise(arg_inner) = arg_ty.as_ref() {
                collect(inner, arg_inner, out);
            }
        }
        TypeInfo::SetType(inner) => {
            if let TypeInfo::SetType(arg_inner) = arg_ty.as_ref() {
                collect(inner, arg_inner, out);
            }
        }
        TypeInfo::MapType(k, v) => {
            if let TypeInfo::MapType(ak, av) = arg_ty.as_ref() {
                collect(k, ak, out);
                collect(v, av, out);
            }
        }
        TypeInfo::Union(members) => {
            // A bare `T` inside a larger union parameter position (e.g.
            // `T | undefined`) still unifies against the whole argument;
            // only recurse when exactly one member is a free parameter.
            for member in members {
                if matches!(member.as_ref(), TypeInfo::TypeParameter(_)) {
                    collect(member, arg_ty, out);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stypec_types::PrimitiveKind;

    #[test]
    fn infers_identity_parameter() {
        let t = TypeParameter::new("T", None, None);
        let param_ty = std::rc::Rc::new(TypeInfo::TypeParameter(t.clone()));
        let arg_ty = lit_number(42.0);
        let bindings = infer_type_args(&[t.clone()], std::slice::from_ref(&param_ty), std::slice::from_ref(&arg_ty));
        assert_eq!(bindings.get(&t.id), Some(&arg_ty));
    }

    #[test]
    fn unbound_parameter_falls_back_to_unknown() {
        let t = TypeParameter::new("T", None, None);
        let bindings = complete_bindings(&[t.clone()], FxHashMap::default());
        assert_eq!(bindings.get(&t.id), Some(&TypeInfo::unknown()));
    }

    #[test]
    fn multiple_occurrences_join_as_union() {
        let t = TypeParameter::new("T", None, None);
        let param_ty = std::rc::Rc::new(TypeInfo::TypeParameter(t.clone()));
        let a = TypeInfo::primitive(PrimitiveKind::String);
        let b = TypeInfo::primitive(PrimitiveKind::Number);
        let bindings = infer_type_args(&[t.clone()], &[param_ty.clone(), param_ty], &[a.clone(), b.clone()]);
        assert_eq!(bindings.get(&t.id), Some(&make_union(vec![a, b])));
    }

    fn lit_number(n: f64) -> Ty {
        std::rc::Rc::new(TypeInfo::LiteralNumber(stypec_types::OrderedFloat(n)))
    }
}
