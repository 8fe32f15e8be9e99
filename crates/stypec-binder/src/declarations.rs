//! Phase-one declaration collection and phase-two structural validation
//! (§4.5), grounded on the teacher's `declarations.rs` /
//! `type_checking_declarations.rs` split: phase one builds a type shell for
//! every top-level declaration without checking any bodies (so mutually and
//! self-referential declarations resolve), phase two — run by the checker
//! once every body has been walked — validates interface implementation,
//! abstract-member satisfaction, and `override` markers.

use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use stypec_ast::{
    AccessModifier, ClassDecl, ClassMember as AstClassMember, EnumDecl, FieldDecl, FunctionDecl, InterfaceDecl,
    MethodDecl, MethodKind, NamespaceDecl, Stmt, StmtKind, TypeAliasDecl, TypeExpr, TypeExprKind,
};
use stypec_common::diagnostics::{Diagnostic, DiagnosticCollector, ErrorKind};
use stypec_common::Span;
use stypec_env::Env;
use stypec_solver::GenericRegistry;
use stypec_types::{
    Class, ClassHandle, ClassMember, FunctionSignature, GenericDef, GenericDefKind, GenericRef, Interface,
    IndexMapWrapper, InstanceOf, Namespace, Ty, TypeInfo, TypeParameter,
};

use crate::enums::bind_enum;
use crate::overloads::OverloadGroup;
use crate::type_resolution::TypeResolver;

/// A user-defined type-guard function's narrowing contribution (§4.2 "guard
/// types" / §4.3 "Calls"): `function isFoo(x: unknown): x is Foo` narrows
/// its first argument in the call site's true branch. Kept out-of-band from
/// `TypeInfo` (a plain `boolean` is what the function actually returns)
/// rather than adding a variant to the closed type domain for one use.
#[derive(Debug, Clone)]
pub struct PredicateInfo {
    pub param_index: usize,
    pub asserted: Ty,
}

#[derive(Debug, Default)]
pub struct PredicateTable(FxHashMap<String, PredicateInfo>);

impl PredicateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, function_name: impl Into<String>, info: PredicateInfo) {
        self.0.insert(function_name.into(), info);
    }

    pub fn get(&self, function_name: &str) -> Option<&PredicateInfo> {
        self.0.get(function_name)
    }
}

pub struct DeclarationBinder<'a> {
    pub env: &'a Env,
    pub generics: &'a mut GenericRegistry,
    pub predicates: &'a mut PredicateTable,
    pub diagnostics: &'a mut DiagnosticCollector,
    pub file: &'a str,
}

impl<'a> DeclarationBinder<'a> {
    /// Phase 1: walks `stmts` once, building every top-level declaration's
    /// type shell and defining it in `self.env`. Function overload groups
    /// are collected across the whole statement list (not just contiguous
    /// runs) since the spec's grouping rule is purely name-based.
    pub fn bind_top_level(&mut self, stmts: &[Stmt]) {
        tracing::debug!(file = self.file, declarations = stmts.len(), "declaration pass start");
        let mut function_groups: FxHashMap<String, (OverloadGroup, Span)> = FxHashMap::default();

        for stmt in stmts {
            match &stmt.kind {
                StmtKind::FunctionDecl(fd) => self.collect_function_signature(fd, stmt.span, &mut function_groups),
                StmtKind::ClassDecl(cd) => {
                    self.bind_class(cd, stmt.span);
                }
                StmtKind::InterfaceDecl(id) => self.bind_interface(id),
                StmtKind::TypeAliasDecl(td) => self.bind_type_alias(td),
                StmtKind::EnumDecl(ed) => self.bind_enum_decl(ed, stmt.span),
                StmtKind::NamespaceDecl(nd) => self.bind_namespace(nd),
                StmtKind::Export(stypec_ast::ExportKind::Declaration(inner)) => {
                    self.bind_top_level(std::slice::from_ref(inner))
                }
                StmtKind::Ambient(inner) => self.bind_top_level(std::slice::from_ref(inner)),
                _ => {}
            }
        }

        for (name, (group, span)) in function_groups {
            self.finish_function_group(name, group, span);
        }
        tracing::debug!(file = self.file, "declaration pass end");
    }

    fn collect_function_signature(
        &mut self,
        fd: &FunctionDecl,
        span: Span,
        groups: &mut FxHashMap<String, (OverloadGroup, Span)>,
    ) {
        let child = self.env.child();
        let type_params = bind_type_params(&fd.type_params, &child, self.generics, self.diagnostics, self.file);
        let inner = TypeResolver::new(&child, self.generics, None, self.file);
        let signature = build_signature(&fd.params, fd.return_type.as_ref(), &inner, self.diagnostics);

        if let Some(TypeExprKind::Predicate { param, asserted }) = fd.return_type.as_ref().map(|t| &t.kind) {
            if let Some(index) = fd.params.iter().position(|p| &p.name == param) {
                let asserted_ty = inner.resolve(asserted, self.diagnostics);
                self.predicates.register(fd.name.clone(), PredicateInfo { param_index: index, asserted: asserted_ty });
            }
        }

        if !type_params.is_empty() {
            // A generic function's signature is checked once, against its
            // own type parameters; each call site instantiates it via
            // `stypec_solver::infer` rather than the binder substituting
            // eagerly.
            let def: GenericRef =
                Rc::new(GenericDef { name: fd.name.clone(), type_params, kind: GenericDefKind::Function(signature) });
            self.generics.register(def.clone());
            self.env.define_value(fd.name.clone(), Rc::new(TypeInfo::GenericFunction(def)));
            return;
        }

        let entry = groups.entry(fd.name.clone()).or_insert_with(|| (OverloadGroup::default(), span));
        if let Err(err) = entry.0.push(signature, fd.body.is_some()) {
            self.report_overload_error(&fd.name, err, span);
        }
    }

    fn finish_function_group(&mut self, name: String, group: OverloadGroup, span: Span) {
        match group.finish(false) {
            Ok(shape) => self.env.define_value(name, shape.into_ty()),
            Err(err) => self.report_overload_error(&name, err, span),
        }
    }

    fn report_overload_error(&mut self, name: &str, err: crate::overloads::OverloadError, span: Span) {
        use crate::overloads::OverloadError;
        let message = match err {
            OverloadError::MultipleImplementations => {
                format!("duplicate function implementation for '{name}'")
            }
            OverloadError::NoImplementation => format!("'{name}' has no implementation"),
            OverloadError::ImplementationArityTooNarrow => {
                format!("implementation of '{name}' does not satisfy every overload signature")
            }
        };
        self.diagnostics.push(Diagnostic::error(ErrorKind::ArityMismatch, message, self.file, span));
    }

    fn bind_class(&mut self, cd: &ClassDecl, span: Span) -> Option<ClassHandle> {
        let name = cd.name.clone()?;
        let handle = ClassHandle::new(name.clone());

        let class_env = self.env.child();
        let type_params = bind_type_params(&cd.type_params, &class_env, self.generics, self.diagnostics, self.file);

        let self_ty = if type_params.is_empty() {
            Rc::new(TypeInfo::Instance(stypec_types::class::InstanceOf { class: handle.clone(), type_args: vec![] }))
        } else {
            let def: GenericRef = Rc::new(GenericDef {
                name: name.clone(),
                type_params: type_params.clone(),
                kind: GenericDefKind::Class(handle.clone()),
            });
            self.generics.register(def.clone());
            Rc::new(TypeInfo::GenericClass(def))
        };
        // Registered before members are resolved so a method returning the
        // enclosing class (`next(): Node`) or a field typed as `this`
        // resolves through the handle rather than failing to find the name.
        self.env.define_type_alias(name.clone(), self_ty.clone());

        let superclass = cd.superclass.as_ref().and_then(|te| resolve_class_handle(te, &class_env));
        let implements: Vec<Ty> = cd
            .implements
            .iter()
            .map(|te| TypeResolver::new(&class_env, self.generics, Some(&self_ty), self.file).resolve(te, self.diagnostics))
            .collect();

        let mut members: IndexMap<String, ClassMember> = IndexMap::new();
        let mut optional: FxHashSet<String> = FxHashSet::default();
        let mut abstract_members: FxHashSet<String> = FxHashSet::default();
        let mut method_groups: FxHashMap<String, (OverloadGroup, Span)> = FxHashMap::default();

        for member in &cd.members {
            match member {
                AstClassMember::Method(method) => {
                    self.bind_method(method, span, &class_env, &self_ty, &mut members, &mut abstract_members, &mut method_groups)
                }
                AstClassMember::Field(field) => self.bind_field(field, &class_env, &self_ty, &mut members, &mut optional),
                AstClassMember::StaticBlock(_) => {
                    // Checked like an ordinary statement block against the
                    // class's static scope; the checker's body pass visits
                    // it directly from the AST and contributes no shape.
                }
            }
        }

        for (name, (group, span)) in method_groups {
            match group.finish(cd.is_abstract) {
                Ok(shape) => {
                    members.insert(
                        name,
                        ClassMember { ty: shape.into_ty(), is_static: false, is_readonly: false, is_private: false, is_protected: false },
                    );
                }
                Err(err) => self.report_overload_error(&name, err, span),
            }
        }

        let class = Class {
            name: name.clone(),
            superclass,
            implements,
            members,
            optional,
            is_abstract: cd.is_abstract,
            abstract_members,
        };
        handle.freeze(class);
        Some(handle)
    }

    #[allow(clippy::too_many_arguments)]
    fn bind_method(
        &mut self,
        method: &MethodDecl,
        span: Span,
        class_env: &Env,
        self_ty: &Ty,
        members: &mut IndexMap<String, ClassMember>,
        abstract_members: &mut FxHashSet<String>,
        method_groups: &mut FxHashMap<String, (OverloadGroup, Span)>,
    ) {
        let method_env = class_env.child();
        let method_type_params = bind_type_params(&method.type_params, &method_env, self.generics, self.diagnostics, self.file);
        let inner = TypeResolver::new(&method_env, self.generics, Some(self_ty), self.file);

        match method.kind {
            MethodKind::Getter => {
                let ty = method.return_type.as_ref().map(|t| inner.resolve(t, self.diagnostics)).unwrap_or_else(TypeInfo::any);
                insert_member(members, method.name.clone(), ty, method);
            }
            MethodKind::Setter => {
                // A getter, if declared, already recorded the member's type;
                // a setter-only property is recorded here instead.
                if !members.contains_key(&method.name) {
                    let ty = method.params.first().and_then(|p| p.ty.as_ref()).map(|t| inner.resolve(t, self.diagnostics)).unwrap_or_else(TypeInfo::any);
                    insert_member(members, method.name.clone(), ty, method);
                }
            }
            MethodKind::Constructor | MethodKind::Method => {
                let signature = build_signature(&method.params, method.return_type.as_ref(), &inner, self.diagnostics);
                if method.is_abstract {
                    abstract_members.insert(method.name.clone());
                }
                if method_type_params.is_empty() {
                    let entry = method_groups.entry(method.name.clone()).or_insert_with(|| (OverloadGroup::default(), span));
                    if let Err(err) = entry.0.push(signature, method.body.is_some() || method.is_abstract) {
                        self.report_overload_error(&method.name, err, span);
                    }
                } else {
                    let def: GenericRef = Rc::new(GenericDef {
                        name: method.name.clone(),
                        type_params: method_type_params,
                        kind: GenericDefKind::Function(signature),
                    });
                    self.generics.register(def.clone());
                    insert_member(members, method.name.clone(), Rc::new(TypeInfo::GenericFunction(def)), method);
                }
            }
        }
    }

    fn bind_field(
        &mut self,
        field: &FieldDecl,
        class_env: &Env,
        self_ty: &Ty,
        members: &mut IndexMap<String, ClassMember>,
        optional: &mut FxHashSet<String>,
    ) {
        let resolver = TypeResolver::new(class_env, self.generics, Some(self_ty), self.file);
        // An untyped field's type is ordinarily inferred from its
        // initializer (a body-check concern, phase 2). Phase 1 only has a
        // placeholder available for it; the checker refines narrower typed
        // reads against the initializer expression directly rather than
        // trying to mutate an already-frozen `Class`.
        let ty = field.ty.as_ref().map(|t| resolver.resolve(t, self.diagnostics)).unwrap_or_else(TypeInfo::any);
        if field.ty.is_none() && field.init.is_none() {
            optional.insert(field.name.clone());
        }
        members.insert(
            field.name.clone(),
            ClassMember {
                ty,
                is_static: field.is_static,
                is_readonly: field.is_readonly,
                is_private: field.access == AccessModifier::Private,
                is_protected: field.access == AccessModifier::Protected,
            },
        );
    }

    fn bind_interface(&mut self, id: &InterfaceDecl) {
        let iface_env = self.env.child();
        let type_params = bind_type_params(&id.type_params, &iface_env, self.generics, self.diagnostics, self.file);
        let resolver = TypeResolver::new(&iface_env, self.generics, None, self.file);

        let mut fields = IndexMap::new();
        let mut optional = FxHashSet::default();
        for extend in &id.extends {
            let extended = resolver.resolve(extend, self.diagnostics);
            if let TypeInfo::Interface(iface) = extended.as_ref() {
                for (k, v) in iface.members.0.iter() {
                    fields.insert(k.clone(), v.clone());
                }
                optional.extend(iface.optional.0.iter().cloned());
            }
        }
        for member in &id.members {
            fields.insert(member.name.clone(), resolver.resolve(&member.ty, self.diagnostics));
            if member.optional {
                optional.insert(member.name.clone());
            }
        }
        let string_index = id.string_index.as_ref().map(|t| resolver.resolve(t, self.diagnostics));
        let number_index = id.number_index.as_ref().map(|t| resolver.resolve(t, self.diagnostics));

        let iface = Interface {
            name: id.name.clone(),
            members: IndexMapWrapper(fields),
            optional: stypec_types::OrderedNameSet(optional),
            string_index,
            number_index,
        };

        // Declaration merging: an interface declared again with the same
        // name in this scope merges member-wise rather than replacing the
        // first (§4.6 lists the same rule for `declare global` interface
        // augmentation; ordinary same-scope re-declaration follows suit).
        if let Some(existing) = self.env.lookup_type(&id.name) {
            if let TypeInfo::Interface(existing_iface) = existing.as_ref() {
                let merged = merge_interfaces(existing_iface, &iface);
                self.register_interface(id.name.clone(), merged, type_params);
                return;
            }
        }
        self.register_interface(id.name.clone(), iface, type_params);
    }

    fn register_interface(&mut self, name: String, iface: Interface, type_params: Vec<TypeParameter>) {
        if type_params.is_empty() {
            self.env.define_type_alias(name, Rc::new(TypeInfo::Interface(Rc::new(iface))));
        } else {
            let def: GenericRef =
                Rc::new(GenericDef { name: name.clone(), type_params, kind: GenericDefKind::Interface(Rc::new(iface)) });
            self.generics.register(def.clone());
            self.env.define_type_alias(name, Rc::new(TypeInfo::GenericInterface(def)));
        }
    }

    fn bind_type_alias(&mut self, td: &TypeAliasDecl) {
        let alias_env = self.env.child();
        let type_params = bind_type_params(&td.type_params, &alias_env, self.generics, self.diagnostics, self.file);
        let resolver = TypeResolver::new(&alias_env, self.generics, None, self.file);
        let resolved = resolver.resolve(&td.ty, self.diagnostics);

        if type_params.is_empty() {
            self.env.define_type_alias(td.name.clone(), resolved);
        } else {
            let def: GenericRef =
                Rc::new(GenericDef { name: td.name.clone(), type_params, kind: GenericDefKind::TypeAlias(resolved) });
            self.generics.register(def.clone());
            // A generic alias isn't itself one of the three kinds a bare
            // reference to a `GenericClass`/`GenericInterface`/
            // `GenericFunction` models; `InstantiatedGeneric::resolve`
            // still substitutes it correctly via `GenericDefKind::TypeAlias`,
            // so the alias name is bound to a `GenericInterface`-shaped
            // marker only so `instantiate_if_generic` recognizes and
            // instantiates it the same way.
            self.env.define_type_alias(td.name.clone(), Rc::new(TypeInfo::GenericInterface(def)));
        }
    }

    fn bind_enum_decl(&mut self, ed: &EnumDecl, span: Span) {
        let e = bind_enum(ed, span, self.file, self.diagnostics);
        let ty = Rc::new(TypeInfo::Enum(Rc::new(e)));
        self.env.define_type_alias(ed.name.clone(), ty.clone());
        self.env.define_value(ed.name.clone(), ty);
    }

    fn bind_namespace(&mut self, nd: &NamespaceDecl) {
        let ns_env = self.env.child();
        {
            let mut inner = DeclarationBinder {
                env: &ns_env,
                generics: self.generics,
                predicates: self.predicates,
                diagnostics: self.diagnostics,
                file: self.file,
            };
            inner.bind_top_level(&nd.body);
        }
        // Namespace members are whatever the body defined as values at its
        // own top level; type-only declarations are reachable through
        // `NS.Inner` via `type_resolution`'s qualified-name lookup, which
        // consults the same member table.
        let members: IndexMap<String, Ty> = ns_env_snapshot(&ns_env);
        let namespace = Namespace { name: nd.name.clone(), members: IndexMapWrapper(members) };

        if let Some(existing) = self.env.lookup_type(&nd.name) {
            if let TypeInfo::Namespace(existing_ns) = existing.as_ref() {
                let mut merged = existing_ns.members.0.clone();
                merged.extend(namespace.members.0.clone());
                let merged_ns = Rc::new(TypeInfo::Namespace(Rc::new(Namespace { name: nd.name.clone(), members: IndexMapWrapper(merged) })));
                self.env.define_type_alias(nd.name.clone(), merged_ns.clone());
                self.env.define_value(nd.name.clone(), merged_ns);
                return;
            }
        }
        let ty = Rc::new(TypeInfo::Namespace(Rc::new(namespace)));
        self.env.define_type_alias(nd.name.clone(), ty.clone());
        self.env.define_value(nd.name.clone(), ty);
    }
}

fn insert_member(members: &mut IndexMap<String, ClassMember>, name: String, ty: Ty, method: &MethodDecl) {
    members.insert(
        name,
        ClassMember {
            ty,
            is_static: method.is_static,
            is_readonly: false,
            is_private: method.access == AccessModifier::Private,
            is_protected: method.access == AccessModifier::Protected,
        },
    );
}

fn merge_interfaces(first: &Interface, second: &Interface) -> Interface {
    let mut fields = first.members.0.clone();
    fields.extend(second.members.0.clone());
    let mut optional = first.optional.0.clone();
    optional.extend(second.optional.0.iter().cloned());
    Interface {
        name: first.name.clone(),
        members: IndexMapWrapper(fields),
        optional: stypec_types::OrderedNameSet(optional),
        string_index: second.string_index.clone().or_else(|| first.string_index.clone()),
        number_index: second.number_index.clone().or_else(|| first.number_index.clone()),
    }
}

/// Binds a list of declared type parameters into `scope`, resolving
/// constraints and defaults in declaration order so a later parameter's
/// constraint may reference an earlier one (`class C<T, U extends T>`).
fn bind_type_params(
    params: &[stypec_ast::TypeParamExpr],
    scope: &Env,
    generics: &GenericRegistry,
    diagnostics: &mut DiagnosticCollector,
    file: &str,
) -> Vec<TypeParameter> {
    let mut out = Vec::with_capacity(params.len());
    for p in params {
        let resolver = TypeResolver::new(scope, generics, None, file);
        let constraint = p.constraint.as_ref().map(|c| resolver.resolve(c, diagnostics));
        let default = p.default.as_ref().map(|d| resolver.resolve(d, diagnostics));
        let param = TypeParameter::new(p.name.clone(), constraint, default);
        scope.define_type_param(p.name.clone(), Rc::new(TypeInfo::TypeParameter(param.clone())));
        out.push(param);
    }
    out
}

fn build_signature(
    params: &[stypec_ast::Param],
    return_type: Option<&TypeExpr>,
    resolver: &TypeResolver,
    diagnostics: &mut DiagnosticCollector,
) -> FunctionSignature {
    let mut tys = Vec::with_capacity(params.len());
    let mut min_arity = 0;
    let mut has_rest = false;
    let mut seen_optional = false;
    for p in params {
        if p.rest {
            has_rest = true;
            continue;
        }
        let ty = p.ty.as_ref().map(|t| resolver.resolve(t, diagnostics)).unwrap_or_else(TypeInfo::any);
        let optional = p.optional || p.default.is_some();
        if optional {
            seen_optional = true;
        } else if !seen_optional {
            min_arity += 1;
        }
        tys.push(ty);
    }
    let return_ty = match return_type {
        Some(t) => resolver.resolve(t, diagnostics),
        None => TypeInfo::any(),
    };
    FunctionSignature { params: tys, return_type: return_ty, min_arity, has_rest, this_type: None }
}

/// Resolves a superclass `extends` clause's `TypeExpr` to the `ClassHandle`
/// it names, looking through an intervening `GenericClass`/`Instance`
/// wrapper (an un-parameterized reference to a generic superclass still
/// names the same handle; its own type arguments are validated separately
/// by the compatibility engine, not by this lookup).
fn resolve_class_handle(te: &TypeExpr, env: &Env) -> Option<ClassHandle> {
    let name = match &te.kind {
        TypeExprKind::Reference { name, .. } => name,
        _ => return None,
    };
    match env.lookup_type(name)?.as_ref() {
        TypeInfo::Instance(instance) => Some(instance.class.clone()),
        TypeInfo::GenericClass(def) => match &def.kind {
            GenericDefKind::Class(handle) => Some(handle.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Snapshots every value binding `env` defines at its own level (not
/// walking outward) as a plain map, the shape a `Namespace`'s member table
/// needs. `Env` doesn't expose iteration directly since ordinary lookups
/// never need it; namespaces are the one place the whole table matters.
fn ns_env_snapshot(env: &Env) -> IndexMap<String, Ty> {
    env.own_values().into_iter().collect()
}
