//! Generic classes, interfaces and functions, and their instantiation
//! (§3 Data Model — Generics).
//!
//! A generic definition is checked once, against its own type parameters
//! treated as opaque types bounded by their constraints. Substituting
//! concrete type arguments happens lazily: [`InstantiatedGeneric`] holds
//! the definition and the arguments and only walks the template to produce
//! a concrete `Ty` the first time something asks for it, then caches the
//! result for the lifetime of the instantiation (§9 — "substitution on
//! demand").

use std::cell::OnceCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::class::ClassHandle;
use crate::info::{FunctionSignature, Record, Ty, Tuple, TupleElement, TypeInfo};
use crate::Interface;

static NEXT_TYPE_PARAM_ID: std::sync::atomic::AtomicU32 = std::sync::atomic::AtomicU32::new(0);

/// A type parameter is identified nominally by an id allocated when its
/// declaration is bound, not by name: two distinct `T`s in nested generic
/// scopes must never compare equal to each other.
#[derive(Clone, Debug)]
pub struct TypeParameter {
    pub id: u32,
    pub name: String,
    pub constraint: Option<Ty>,
    pub default: Option<Ty>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>, constraint: Option<Ty>, default: Option<Ty>) -> Self {
        let id = NEXT_TYPE_PARAM_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        TypeParameter { id, name: name.into(), constraint, default }
    }
}

impl PartialEq for TypeParameter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for TypeParameter {}
impl std::hash::Hash for TypeParameter {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug)]
pub enum GenericDefKind {
    Class(ClassHandle),
    Interface(Rc<Interface>),
    Function(FunctionSignature),
    /// A generic type alias's right-hand side, still containing free
    /// `TypeInfo::TypeParameter` occurrences. Unlike `Interface`/`Function`,
    /// the aliased shape isn't constrained to one AST form, so it's kept as
    /// a raw template and substituted wholesale by [`substitute`].
    TypeAlias(Ty),
}

/// The un-instantiated template: a class/interface/function body that still
/// contains bare `TypeInfo::TypeParameter` occurrences in place of concrete
/// types.
#[derive(Debug)]
pub struct GenericDef {
    pub name: String,
    pub type_params: Vec<TypeParameter>,
    pub kind: GenericDefKind,
}

pub type GenericRef = Rc<GenericDef>;

#[derive(Debug)]
pub struct InstantiatedGeneric {
    pub definition: GenericRef,
    pub type_args: Vec<Ty>,
    resolved: OnceCell<Ty>,
}

impl InstantiatedGeneric {
    pub fn new(definition: GenericRef, type_args: Vec<Ty>) -> Self {
        InstantiatedGeneric { definition, type_args, resolved: OnceCell::new() }
    }

    /// The concrete type this instantiation denotes, computing and caching
    /// it on first access.
    pub fn resolve(&self) -> Ty {
        self.resolved
            .get_or_init(|| {
                let map: FxHashMap<u32, Ty> = self
                    .definition
                    .type_params
                    .iter()
                    .zip(self.type_args.iter())
                    .map(|(param, arg)| (param.id, arg.clone()))
                    .collect();
                match &self.definition.kind {
                    GenericDefKind::Class(handle) => {
                        Rc::new(TypeInfo::Instance(crate::class::InstanceOf {
                            class: handle.clone(),
                            type_args: self.type_args.clone(),
                        }))
                    }
                    GenericDefKind::Interface(iface) => substitute_interface(iface, &map),
                    GenericDefKind::Function(sig) => substitute_function(sig, &map),
                    GenericDefKind::TypeAlias(template) => substitute(template, &map),
                }
            })
            .clone()
    }
}

impl PartialEq for InstantiatedGeneric {
    fn eq(&self, other: &Self) -> bool {
        self.definition.name == other.definition.name && self.type_args == other.type_args
    }
}
impl Eq for InstantiatedGeneric {}
impl std::hash::Hash for InstantiatedGeneric {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.definition.name.hash(state);
        self.type_args.hash(state);
    }
}

/// Recursively replaces every `TypeInfo::TypeParameter` occurrence found in
/// `map` with its bound argument, leaving unmapped type parameters (from an
/// enclosing, still-generic scope) untouched.
pub fn substitute(ty: &Ty, map: &FxHashMap<u32, Ty>) -> Ty {
    match ty.as_ref() {
        TypeInfo::TypeParameter(param) => map.get(&param.id).cloned().unwrap_or_else(|| ty.clone()),
        TypeInfo::Array(elem) => Rc::new(TypeInfo::Array(substitute(elem, map))),
        TypeInfo::Tuple(tuple) => Rc::new(TypeInfo::Tuple(Tuple {
            elements: tuple
                .elements
                .iter()
                .map(|e| TupleElement { ty: substitute(&e.ty, map), optional: e.optional })
                .collect(),
            required_count: tuple.required_count,
            rest: tuple.rest.as_ref().map(|r| substitute(r, map)),
        })),
        TypeInfo::Record(record) => Rc::new(TypeInfo::Record(Record {
            fields: crate::info::IndexMapWrapper(
                record.fields.0.iter().map(|(k, v)| (k.clone(), substitute(v, map))).collect(),
            ),
            string_index: record.string_index.as_ref().map(|t| substitute(t, map)),
            number_index: record.number_index.as_ref().map(|t| substitute(t, map)),
            symbol_index: record.symbol_index.as_ref().map(|t| substitute(t, map)),
        })),
        TypeInfo::Function(sig) => Rc::new(TypeInfo::Function(substitute_signature(sig, map))),
        TypeInfo::Union(members) => {
            crate::canonical::make_union(members.iter().map(|m| substitute(m, map)).collect())
        }
        TypeInfo::Intersection(members) => {
            crate::canonical::make_intersection(members.iter().map(|m| substitute(m, map)).collect())
        }
        TypeInfo::Promise(inner) => Rc::new(TypeInfo::Promise(substitute(inner, map))),
        TypeInfo::SetType(inner) => Rc::new(TypeInfo::SetType(substitute(inner, map))),
        TypeInfo::WeakSet(inner) => Rc::new(TypeInfo::WeakSet(substitute(inner, map))),
        TypeInfo::IteratorType(inner) => Rc::new(TypeInfo::IteratorType(substitute(inner, map))),
        TypeInfo::GeneratorType(inner) => Rc::new(TypeInfo::GeneratorType(substitute(inner, map))),
        TypeInfo::AsyncGeneratorType(inner) => Rc::new(TypeInfo::AsyncGeneratorType(substitute(inner, map))),
        TypeInfo::MapType(k, v) => Rc::new(TypeInfo::MapType(substitute(k, map), substitute(v, map))),
        TypeInfo::WeakMap(k, v) => Rc::new(TypeInfo::WeakMap(substitute(k, map), substitute(v, map))),
        TypeInfo::InstantiatedGeneric(inst) => {
            let new_args: Vec<Ty> = inst.type_args.iter().map(|a| substitute(a, map)).collect();
            Rc::new(TypeInfo::InstantiatedGeneric(Rc::new(InstantiatedGeneric::new(
                inst.definition.clone(),
                new_args,
            ))))
        }
        // Classes, interfaces and enums are nominal; a bare reference to one
        // in a generic template does not itself contain free type
        // parameters to substitute (its own generic slots, if any, are
        // handled via `InstantiatedGeneric`).
        _ => ty.clone(),
    }
}

fn substitute_signature(sig: &FunctionSignature, map: &FxHashMap<u32, Ty>) -> FunctionSignature {
    FunctionSignature {
        params: sig.params.iter().map(|p| substitute(p, map)).collect(),
        return_type: substitute(&sig.return_type, map),
        min_arity: sig.min_arity,
        has_rest: sig.has_rest,
        this_type: sig.this_type.as_ref().map(|t| substitute(t, map)),
    }
}

fn substitute_function(sig: &FunctionSignature, map: &FxHashMap<u32, Ty>) -> Ty {
    Rc::new(TypeInfo::Function(substitute_signature(sig, map)))
}

fn substitute_interface(iface: &Interface, map: &FxHashMap<u32, Ty>) -> Ty {
    Rc::new(TypeInfo::Interface(Rc::new(Interface {
        name: iface.name.clone(),
        members: crate::info::IndexMapWrapper(
            iface.members.0.iter().map(|(k, v)| (k.clone(), substitute(v, map))).collect(),
        ),
        optional: iface.optional.clone(),
        string_index: iface.string_index.as_ref().map(|t| substitute(t, map)),
        number_index: iface.number_index.as_ref().map(|t| substitute(t, map)),
    })))
}
