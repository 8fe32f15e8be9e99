//! Resolves the parser's syntactic `TypeExpr` into the checker's semantic
//! `TypeInfo` (§3), the same role the teacher's
//! `state_type_resolution_module.rs` plays for `CheckerState`: type
//! parameters shadow aliases, generic references are instantiated lazily,
//! and the handful of built-in generic containers (`Array<T>`,
//! `Promise<T>`, `Map<K, V>`, ...) are recognized by name before falling
//! back to a user declaration lookup.

use std::rc::Rc;

use stypec_ast::{FunctionTypeExpr, KeywordType, ObjectTypeExpr, TupleElement as AstTupleElement, TypeExpr, TypeExprKind};
use stypec_common::diagnostics::{Diagnostic, DiagnosticCollector, ErrorKind};
use stypec_common::Span;
use stypec_env::Env;
use stypec_solver::GenericRegistry;
use stypec_types::{
    make_intersection, make_union, FunctionSignature, IndexMapWrapper, InstantiatedGeneric, PrimitiveKind, Record,
    Ty, Tuple, TupleElement, TypeInfo,
};

/// Context threaded through a single type-expression resolution. Grouped
/// into a struct because `resolve` recurses through every `TypeExpr`
/// variant and each needs the same four pieces of ambient state.
pub struct TypeResolver<'a> {
    pub env: &'a Env,
    pub generics: &'a GenericRegistry,
    pub this_ty: Option<&'a Ty>,
    pub file: &'a str,
}

impl<'a> TypeResolver<'a> {
    pub fn new(env: &'a Env, generics: &'a GenericRegistry, this_ty: Option<&'a Ty>, file: &'a str) -> Self {
        TypeResolver { env, generics, this_ty, file }
    }

    pub fn resolve(&self, te: &TypeExpr, diagnostics: &mut DiagnosticCollector) -> Ty {
        match &te.kind {
            TypeExprKind::Keyword(kw) => self.resolve_keyword(*kw),
            TypeExprKind::Reference { name, type_args } => self.resolve_reference(name, type_args, te.span, diagnostics),
            TypeExprKind::Qualified { path, type_args } => self.resolve_qualified(path, type_args, te.span, diagnostics),
            TypeExprKind::LiteralString(s) => Rc::new(TypeInfo::LiteralString(s.clone())),
            TypeExprKind::LiteralNumber(n) => Rc::new(TypeInfo::LiteralNumber(stypec_types::OrderedFloat(*n))),
            TypeExprKind::LiteralBoolean(b) => Rc::new(TypeInfo::LiteralBoolean(*b)),
            TypeExprKind::Array(elem) => Rc::new(TypeInfo::Array(self.resolve(elem, diagnostics))),
            TypeExprKind::Tuple(elements) => self.resolve_tuple(elements, diagnostics),
            TypeExprKind::Function(f) => self.resolve_function(f, diagnostics),
            TypeExprKind::Object(o) => self.resolve_object(o, diagnostics),
            TypeExprKind::Union(members) => make_union(members.iter().map(|m| self.resolve(m, diagnostics)).collect()),
            TypeExprKind::Intersection(members) => {
                make_intersection(members.iter().map(|m| self.resolve(m, diagnostics)).collect())
            }
            TypeExprKind::Parenthesized(inner) => self.resolve(inner, diagnostics),
            TypeExprKind::TypeQuery(path) => self.resolve_type_query(path),
            TypeExprKind::KeyOf(inner) => self.resolve_keyof(inner, diagnostics),
            // A predicate return annotation (`arg is T`) is typed `boolean`
            // at every ordinary use; the narrowing it licenses at call sites
            // is tracked out-of-band by the declaration binder (see
            // `declarations::PredicateTable`), not encoded in `TypeInfo`.
            TypeExprKind::Predicate { .. } => TypeInfo::primitive(PrimitiveKind::Boolean),
            TypeExprKind::ThisType => self.this_ty.cloned().unwrap_or_else(TypeInfo::unknown),
        }
    }

    fn resolve_keyword(&self, kw: KeywordType) -> Ty {
        match kw {
            KeywordType::String => TypeInfo::primitive(PrimitiveKind::String),
            KeywordType::Number => TypeInfo::primitive(PrimitiveKind::Number),
            KeywordType::Boolean => TypeInfo::primitive(PrimitiveKind::Boolean),
            KeywordType::Void => TypeInfo::primitive(PrimitiveKind::Void),
            KeywordType::Null => TypeInfo::primitive(PrimitiveKind::Null),
            KeywordType::Undefined => TypeInfo::primitive(PrimitiveKind::Undefined),
            KeywordType::Symbol => TypeInfo::primitive(PrimitiveKind::Symbol),
            KeywordType::BigInt => TypeInfo::primitive(PrimitiveKind::BigInt),
            KeywordType::Any => TypeInfo::any(),
            KeywordType::Unknown => TypeInfo::unknown(),
            KeywordType::Never => TypeInfo::never(),
            // `object` accepts any non-primitive shape; approximated here as
            // an empty, open record rather than adding a dedicated variant
            // to the closed type domain for a keyword with no members of
            // its own to check.
            KeywordType::Object => {
                Rc::new(TypeInfo::Record(Record {
                    fields: IndexMapWrapper::default(),
                    string_index: None,
                    number_index: None,
                    symbol_index: None,
                }))
            }
        }
    }

    fn resolve_reference(
        &self,
        name: &str,
        type_args: &[TypeExpr],
        span: Span,
        diagnostics: &mut DiagnosticCollector,
    ) -> Ty {
        let args: Vec<Ty> = type_args.iter().map(|a| self.resolve(a, diagnostics)).collect();
        if let Some(builtin) = self.resolve_builtin_generic(name, &args) {
            return builtin;
        }

        match self.env.lookup_type(name) {
            Some(found) => self.instantiate_if_generic(&found, args),
            None => {
                diagnostics.push(Diagnostic::error(
                    ErrorKind::UnknownName,
                    format!("cannot find name '{name}'"),
                    self.file,
                    span,
                ));
                TypeInfo::any()
            }
        }
    }

    /// The handful of built-in generic containers the spec calls out by
    /// name (§4.3 "New expression", GLOSSARY): these are recognized
    /// structurally rather than requiring the host to pre-populate the
    /// environment with library declarations for them.
    fn resolve_builtin_generic(&self, name: &str, args: &[Ty]) -> Option<Ty> {
        let any = TypeInfo::any;
        Some(match name {
            "Array" | "ReadonlyArray" => Rc::new(TypeInfo::Array(args.first().cloned().unwrap_or_else(any))),
            "Promise" => Rc::new(TypeInfo::Promise(args.first().cloned().unwrap_or_else(any))),
            "Map" | "ReadonlyMap" => {
                Rc::new(TypeInfo::MapType(args.first().cloned().unwrap_or_else(any), args.get(1).cloned().unwrap_or_else(any)))
            }
            "Set" | "ReadonlySet" => Rc::new(TypeInfo::SetType(args.first().cloned().unwrap_or_else(any))),
            "WeakMap" => {
                Rc::new(TypeInfo::WeakMap(args.first().cloned().unwrap_or_else(any), args.get(1).cloned().unwrap_or_else(any)))
            }
            "WeakSet" => Rc::new(TypeInfo::WeakSet(args.first().cloned().unwrap_or_else(any))),
            "Date" => Rc::new(TypeInfo::Date),
            "RegExp" => Rc::new(TypeInfo::RegExp),
            "Error" | "TypeError" | "RangeError" | "SyntaxError" => Rc::new(TypeInfo::ErrorType),
            "Buffer" => Rc::new(TypeInfo::Buffer),
            "Iterator" | "IterableIterator" | "Iterable" => Rc::new(TypeInfo::IteratorType(args.first().cloned().unwrap_or_else(any))),
            "Generator" => Rc::new(TypeInfo::GeneratorType(args.first().cloned().unwrap_or_else(any))),
            "AsyncGenerator" => Rc::new(TypeInfo::AsyncGeneratorType(args.first().cloned().unwrap_or_else(any))),
            "Timeout" => Rc::new(TypeInfo::Timeout),
            _ => return None,
        })
    }

    /// If `found` names a generic definition, pairs it with `args` (filling
    /// missing trailing arguments from declared defaults) to build an
    /// `InstantiatedGeneric`; otherwise returns it unchanged — a reference
    /// to a non-generic declaration never carries type arguments to apply.
    fn instantiate_if_generic(&self, found: &Ty, mut args: Vec<Ty>) -> Ty {
        let def = match found.as_ref() {
            TypeInfo::GenericClass(def) | TypeInfo::GenericInterface(def) | TypeInfo::GenericFunction(def) => {
                def.clone()
            }
            _ => return found.clone(),
        };
        for param in def.type_params.iter().skip(args.len()) {
            match &param.default {
                Some(default) => args.push(default.clone()),
                None => args.push(param.constraint.clone().unwrap_or_else(TypeInfo::unknown)),
            }
        }
        Rc::new(TypeInfo::InstantiatedGeneric(Rc::new(InstantiatedGeneric::new(def, args))))
    }

    fn resolve_qualified(
        &self,
        path: &[String],
        type_args: &[TypeExpr],
        span: Span,
        diagnostics: &mut DiagnosticCollector,
    ) -> Ty {
        let Some((head, rest)) = path.split_first() else {
            return TypeInfo::any();
        };
        let Some(mut current) = self.env.lookup_type(head) else {
            diagnostics.push(Diagnostic::error(
                ErrorKind::UnknownName,
                format!("cannot find namespace '{head}'"),
                self.file,
                span,
            ));
            return TypeInfo::any();
        };
        for segment in rest.iter().take(rest.len().saturating_sub(1)) {
            current = match member_type(&current, segment) {
                Some(ty) => ty,
                None => return TypeInfo::any(),
            };
        }
        let final_name = rest.last().unwrap_or(head);
        let resolved = if rest.is_empty() { current } else { member_type(&current, final_name).unwrap_or_else(TypeInfo::any) };
        let args: Vec<Ty> = type_args.iter().map(|a| self.resolve(a, diagnostics)).collect();
        self.instantiate_if_generic(&resolved, args)
    }

    fn resolve_tuple(&self, elements: &[AstTupleElement], diagnostics: &mut DiagnosticCollector) -> Ty {
        let mut out = Vec::with_capacity(elements.len());
        let mut required_count = 0;
        let mut rest = None;
        let mut seen_optional = false;
        for element in elements {
            if element.rest {
                rest = Some(self.resolve(&element.ty, diagnostics));
                continue;
            }
            let ty = self.resolve(&element.ty, diagnostics);
            if element.optional {
                seen_optional = true;
            } else if !seen_optional {
                required_count += 1;
            }
            out.push(TupleElement { ty, optional: element.optional });
        }
        Rc::new(TypeInfo::Tuple(Tuple { elements: out, required_count, rest }))
    }

    fn resolve_function(&self, f: &FunctionTypeExpr, diagnostics: &mut DiagnosticCollector) -> Ty {
        let child = self.env.child();
        for tp in &f.type_params {
            let constraint = tp.constraint.as_ref().map(|c| self.resolve(c, diagnostics));
            let default = tp.default.as_ref().map(|d| self.resolve(d, diagnostics));
            let param = stypec_types::TypeParameter::new(tp.name.clone(), constraint, default);
            child.define_type_param(tp.name.clone(), Rc::new(TypeInfo::TypeParameter(param)));
        }
        let inner = TypeResolver::new(&child, self.generics, self.this_ty, self.file);
        let mut params = Vec::with_capacity(f.params.len());
        let mut min_arity = 0;
        let mut has_rest = false;
        let mut seen_optional = false;
        for p in &f.params {
            if p.rest {
                has_rest = true;
                continue;
            }
            let ty = match &p.ty {
                Some(t) => inner.resolve(t, diagnostics),
                None => TypeInfo::any(),
            };
            if p.optional {
                seen_optional = true;
            } else if !seen_optional {
                min_arity += 1;
            }
            params.push(ty);
        }
        let return_type = inner.resolve(&f.return_type, diagnostics);
        Rc::new(TypeInfo::Function(FunctionSignature { params, return_type, min_arity, has_rest, this_type: None }))
    }

    fn resolve_object(&self, o: &ObjectTypeExpr, diagnostics: &mut DiagnosticCollector) -> Ty {
        let mut fields = indexmap::IndexMap::new();
        for member in &o.members {
            fields.insert(member.name.clone(), self.resolve(&member.ty, diagnostics));
        }
        let string_index = o.string_index.as_ref().map(|t| self.resolve(t, diagnostics));
        let number_index = o.number_index.as_ref().map(|t| self.resolve(t, diagnostics));
        Rc::new(TypeInfo::Record(Record { fields: IndexMapWrapper(fields), string_index, number_index, symbol_index: None }))
    }

    /// `typeof expr`: resolves to the already-known type of a value path.
    /// Only the head identifier is consulted; deeper member chains would
    /// need the solver's member-lookup, which `type_resolution` deliberately
    /// does not depend on to avoid a cycle between the binder and solver
    /// crates (the solver itself depends on `stypec-types`, not the other
    /// way; `type_resolution` lives in `stypec-binder`, which already
    /// depends on `stypec-solver` for `GenericRegistry`, but keeping this
    /// lookup local avoids needing a live `Solver` instance here too).
    fn resolve_type_query(&self, path: &[String]) -> Ty {
        let Some(head) = path.first() else { return TypeInfo::any() };
        let mut current = self.env.lookup_value(head).unwrap_or_else(TypeInfo::any);
        for segment in &path[1..] {
            current = member_type(&current, segment).unwrap_or_else(TypeInfo::any);
        }
        current
    }

    /// `keyof T`: a union of the literal string types of `T`'s own member
    /// names, or plain `string` when `T` isn't an object-like shape with a
    /// statically known member set.
    fn resolve_keyof(&self, inner: &TypeExpr, diagnostics: &mut DiagnosticCollector) -> Ty {
        let resolved = self.resolve(inner, diagnostics);
        let names: Vec<&str> = match resolved.as_ref() {
            TypeInfo::Record(r) => r.fields.0.keys().map(String::as_str).collect(),
            TypeInfo::Interface(i) => i.members.0.keys().map(String::as_str).collect(),
            _ => return TypeInfo::primitive(PrimitiveKind::String),
        };
        if names.is_empty() {
            return TypeInfo::never();
        }
        make_union(names.into_iter().map(|n| Rc::new(TypeInfo::LiteralString(n.to_string())) as Ty).collect())
    }
}

/// Minimal object-like member lookup shared by `typeof` and qualified-name
/// resolution; deliberately simpler than `Solver::lookup_member` (no union
/// join, no class superclass walk) since type position resolves a single
/// known declaration, not an arbitrary runtime value.
fn member_type(ty: &Ty, name: &str) -> Option<Ty> {
    match ty.as_ref() {
        TypeInfo::Namespace(ns) => ns.members.0.get(name).cloned(),
        TypeInfo::Record(r) => r.fields.0.get(name).cloned(),
        TypeInfo::Interface(i) => i.members.0.get(name).cloned(),
        TypeInfo::Instance(instance) => stypec_types::Class::resolve_member(&instance.class, name).map(|m| m.ty),
        _ => None,
    }
}
