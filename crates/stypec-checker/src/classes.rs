//! Class declaration and expression checking (§4.4 "class bodies"; the
//! declaration binder's `bind_class` is phase one of this, §4.5).
//!
//! A top-level `class` statement was already given a type shell by the
//! declaration binder before any body was walked, so [`check_class_decl`]
//! only needs to look that shell up, validate the obligations a shell alone
//! can't check (interface satisfaction, abstract members, `override`), and
//! walk every member body against it. A class nested inside a function body
//! or a `class` expression never went through the declaration binder at all
//! (phase one only visits a module's top level) — [`bind_class_shell`]
//! rebuilds the same shell the binder would have, grounded directly on its
//! `bind_class`/`bind_method`/`bind_field`, so both cases converge on the
//! same phase-two pass.

use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use stypec_ast::{
    AccessModifier, ClassDecl, ClassMember as AstClassMember, FieldDecl, MethodDecl, MethodKind, Param, TypeExpr,
    TypeExprKind, TypeParamExpr,
};
use stypec_binder::{overloads::OverloadGroup, TypeResolver};
use stypec_common::diagnostics::{Diagnostic, DiagnosticCollector, ErrorKind};
use stypec_common::{DecoratorMode, Span};
use stypec_env::Env;
use stypec_solver::GenericRegistry;
use stypec_types::class::{Class, ClassHandle, ClassMember, InstanceOf};
use stypec_types::{FunctionSignature, GenericDef, GenericDefKind, GenericRef, Ty, TypeInfo, TypeParameter};

use crate::context::{Checker, FunctionContext};

static NEXT_ANON_CLASS_ID: AtomicU32 = AtomicU32::new(0);

/// Entry point for a `class` statement (`StmtKind::ClassDecl`).
pub(crate) fn check_class_decl(checker: &mut Checker, cd: &ClassDecl, span: Span) {
    if let Some((handle, self_ty, type_params)) = ensure_shell(checker, cd, span) {
        check_class_body(checker, cd, &handle, &self_ty, &type_params);
    }
}

/// Entry point for a `class` expression (`ExprKind::ClassExpr`), returning
/// the instance type it evaluates to.
pub(crate) fn check_class_expr(checker: &mut Checker, cd: &ClassDecl, span: Span) -> Ty {
    match ensure_shell(checker, cd, span) {
        Some((_, self_ty, type_params)) => {
            let handle = match self_ty.as_ref() {
                TypeInfo::Instance(inst) => inst.class.clone(),
                TypeInfo::GenericClass(def) => match &def.kind {
                    GenericDefKind::Class(h) => h.clone(),
                    _ => return TypeInfo::any(),
                },
                _ => return TypeInfo::any(),
            };
            check_class_body(checker, cd, &handle, &self_ty, &type_params);
            self_ty
        }
        None => TypeInfo::any(),
    }
}

/// Resolves a class declaration's shell, building one on the fly for a
/// nested declaration or a class expression that the declaration binder
/// never visited (§4.5 is a single walk over the module's top level only).
fn ensure_shell(checker: &mut Checker, cd: &ClassDecl, span: Span) -> Option<(ClassHandle, Ty, Vec<TypeParameter>)> {
    let name = cd.name.clone().unwrap_or_else(|| {
        let id = NEXT_ANON_CLASS_ID.fetch_add(1, Ordering::Relaxed);
        format!("<anonymous class #{id}>")
    });
    if let Some(existing) = checker.env.lookup_type(&name) {
        if let Some(found) = decompose_self_ty(&existing) {
            return Some(found);
        }
    }
    let outer_env = checker.env.clone();
    let file = checker.file.clone();
    let (handle, self_ty, type_params) =
        bind_class_shell(&outer_env, &mut checker.solver.generics, checker.diagnostics, &file, cd, &name, span);
    outer_env.define_type_alias(name, self_ty.clone());
    Some((handle, self_ty, type_params))
}

fn decompose_self_ty(ty: &Ty) -> Option<(ClassHandle, Ty, Vec<TypeParameter>)> {
    match ty.as_ref() {
        TypeInfo::Instance(inst) => Some((inst.class.clone(), ty.clone(), Vec::new())),
        TypeInfo::GenericClass(def) => match &def.kind {
            GenericDefKind::Class(handle) => Some((handle.clone(), ty.clone(), def.type_params.clone())),
            _ => None,
        },
        _ => None,
    }
}

// --- Shell construction (mirrors `stypec_binder::declarations::bind_class`,
// duplicated rather than called since it's invoked outside the declaration
// binder's own pass and the private helpers it reuses aren't reachable from
// here) -----------------------------------------------------------------

fn bind_class_shell(
    outer_env: &Env,
    generics: &mut GenericRegistry,
    diagnostics: &mut DiagnosticCollector,
    file: &str,
    cd: &ClassDecl,
    name: &str,
    span: Span,
) -> (ClassHandle, Ty, Vec<TypeParameter>) {
    let handle = ClassHandle::new(name.to_string());
    let class_env = outer_env.child();
    let type_params = bind_type_params(&class_env, &cd.type_params, generics, diagnostics, file);

    let self_ty: Ty = if type_params.is_empty() {
        Rc::new(TypeInfo::Instance(InstanceOf { class: handle.clone(), type_args: vec![] }))
    } else {
        let def: GenericRef = Rc::new(GenericDef {
            name: name.to_string(),
            type_params: type_params.clone(),
            kind: GenericDefKind::Class(handle.clone()),
        });
        generics.register(def.clone());
        Rc::new(TypeInfo::GenericClass(def))
    };
    class_env.define_type_alias(name.to_string(), self_ty.clone());

    let superclass = cd.superclass.as_ref().and_then(|te| resolve_class_handle(te, &class_env));
    let implements: Vec<Ty> = cd
        .implements
        .iter()
        .map(|te| TypeResolver::new(&class_env, generics, Some(&self_ty), file).resolve(te, diagnostics))
        .collect();

    let mut members: IndexMap<String, ClassMember> = IndexMap::new();
    let mut optional: FxHashSet<String> = FxHashSet::default();
    let mut abstract_members: FxHashSet<String> = FxHashSet::default();
    let mut method_groups: FxHashMap<String, OverloadGroup> = FxHashMap::default();

    for member in &cd.members {
        match member {
            AstClassMember::Method(method) => bind_method_shell(
                generics,
                diagnostics,
                file,
                method,
                &class_env,
                &self_ty,
                &mut members,
                &mut abstract_members,
                &mut method_groups,
            ),
            AstClassMember::Field(field) => {
                bind_field_shell(generics, diagnostics, file, field, &class_env, &self_ty, &mut members, &mut optional)
            }
            AstClassMember::StaticBlock(_) => {
                // Contributes no shape; the checker's body pass visits it
                // directly from the AST (`check_static_block`).
            }
        }
    }

    for (method_name, group) in method_groups {
        match group.finish(cd.is_abstract) {
            Ok(shape) => {
                members.insert(
                    method_name,
                    ClassMember { ty: shape.into_ty(), is_static: false, is_readonly: false, is_private: false, is_protected: false },
                );
            }
            Err(_) => {
                diagnostics.push(Diagnostic::error(
                    ErrorKind::ArityMismatch,
                    format!("'{method_name}' has inconsistent overload signatures"),
                    file.to_string(),
                    span,
                ));
            }
        }
    }

    let class =
        Class { name: name.to_string(), superclass, implements, members, optional, is_abstract: cd.is_abstract, abstract_members };
    handle.freeze(class);
    (handle, self_ty, type_params)
}

#[allow(clippy::too_many_arguments)]
fn bind_method_shell(
    generics: &mut GenericRegistry,
    diagnostics: &mut DiagnosticCollector,
    file: &str,
    method: &MethodDecl,
    class_env: &Env,
    self_ty: &Ty,
    members: &mut IndexMap<String, ClassMember>,
    abstract_members: &mut FxHashSet<String>,
    method_groups: &mut FxHashMap<String, OverloadGroup>,
) {
    let method_env = class_env.child();
    let method_type_params = bind_type_params(&method_env, &method.type_params, generics, diagnostics, file);
    let inner = TypeResolver::new(&method_env, generics, Some(self_ty), file);

    match method.kind {
        MethodKind::Getter => {
            let ty = method.return_type.as_ref().map(|t| inner.resolve(t, diagnostics)).unwrap_or_else(TypeInfo::any);
            insert_member_shell(members, method.name.clone(), ty, method);
        }
        MethodKind::Setter => {
            if !members.contains_key(&method.name) {
                let ty = method
                    .params
                    .first()
                    .and_then(|p| p.ty.as_ref())
                    .map(|t| inner.resolve(t, diagnostics))
                    .unwrap_or_else(TypeInfo::any);
                insert_member_shell(members, method.name.clone(), ty, method);
            }
        }
        MethodKind::Constructor | MethodKind::Method => {
            let signature = build_signature_shell(&method.params, method.return_type.as_ref(), &inner, diagnostics);
            if method.is_abstract {
                abstract_members.insert(method.name.clone());
            }
            if method_type_params.is_empty() {
                let entry = method_groups.entry(method.name.clone()).or_default();
                if entry.push(signature, method.body.is_some() || method.is_abstract).is_err() {
                    diagnostics.push(Diagnostic::error(
                        ErrorKind::ArityMismatch,
                        format!("duplicate implementation for '{}'", method.name),
                        file.to_string(),
                        Span::dummy(),
                    ));
                }
            } else {
                let def: GenericRef = Rc::new(GenericDef {
                    name: method.name.clone(),
                    type_params: method_type_params,
                    kind: GenericDefKind::Function(signature),
                });
                generics.register(def.clone());
                insert_member_shell(members, method.name.clone(), Rc::new(TypeInfo::GenericFunction(def)), method);
            }
        }
    }
}

fn insert_member_shell(members: &mut IndexMap<String, ClassMember>, name: String, ty: Ty, method: &MethodDecl) {
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

#[allow(clippy::too_many_arguments)]
fn bind_field_shell(
    generics: &GenericRegistry,
    diagnostics: &mut DiagnosticCollector,
    file: &str,
    field: &FieldDecl,
    class_env: &Env,
    self_ty: &Ty,
    members: &mut IndexMap<String, ClassMember>,
    optional: &mut FxHashSet<String>,
) {
    let resolver = TypeResolver::new(class_env, generics, Some(self_ty), file);
    let ty = field.ty.as_ref().map(|t| resolver.resolve(t, diagnostics)).unwrap_or_else(TypeInfo::any);
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

fn build_signature_shell(
    params: &[Param],
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

fn bind_type_params(
    scope: &Env,
    params: &[TypeParamExpr],
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

// --- Phase two: body checking and the obligations only a full body walk
// can validate ------------------------------------------------------------

fn check_class_body(checker: &mut Checker, cd: &ClassDecl, handle: &ClassHandle, self_ty: &Ty, type_params: &[TypeParameter]) {
    let span = Span::dummy();
    check_implements(checker, handle, span);
    check_abstract_satisfied(checker, handle, span);
    check_overrides(checker, cd, handle, span);
    check_decorators(checker, cd, span);

    let body_env = checker.env.child();
    for tp in type_params {
        body_env.define_type_param(tp.name.clone(), Rc::new(TypeInfo::TypeParameter(tp.clone())));
    }
    body_env.define_type_alias(handle.name().to_string(), self_ty.clone());
    let previous_env = std::mem::replace(&mut checker.env, body_env);
    let previous_class = checker.current_class.replace(handle.clone());

    for member in &cd.members {
        match member {
            AstClassMember::Method(method) => check_method_body(checker, method, self_ty),
            AstClassMember::Field(field) => check_field_body(checker, field, handle, self_ty),
            AstClassMember::StaticBlock(block) => check_static_block(checker, block),
        }
    }

    checker.current_class = previous_class;
    checker.env = previous_env;
}

fn check_method_body(checker: &mut Checker, method: &MethodDecl, self_ty: &Ty) {
    let method_env = checker.env.child();
    for tp in bind_type_params(&method_env, &method.type_params, &checker.solver.generics, checker.diagnostics, &checker.file) {
        let _ = tp; // already defined into `method_env` by `bind_type_params` itself
    }
    let previous_env = std::mem::replace(&mut checker.env, method_env);
    // A static member's `this` isn't instance-shaped; leaving it untyped
    // here is more accurate than reusing the instance type.
    let this_ty = if method.is_static { None } else { Some(self_ty.clone()) };
    checker.check_function_like(&method.params, method.body.as_ref(), method.return_type.as_ref(), this_ty, method.is_async, method.is_generator);
    checker.env = previous_env;
}

fn check_field_body(checker: &mut Checker, field: &FieldDecl, handle: &ClassHandle, self_ty: &Ty) {
    let Some(init) = &field.init else { return };
    let declared_ty = Class::resolve_member(handle, &field.name).map(|m| m.ty);
    let frame = FunctionContext {
        return_type: TypeInfo::primitive(stypec_types::PrimitiveKind::Void),
        this_type: if field.is_static { None } else { Some(self_ty.clone()) },
        is_async: false,
        is_generator: false,
        declared: false,
        inferred_returns: Vec::new(),
    };
    checker.function_stack.push(frame);
    let init_ty = checker.check_expr_contextual(init, declared_ty.as_ref());
    checker.function_stack.pop();

    if let Some(declared) = &declared_ty {
        // An untyped field's frozen member type is `any` (the declaration
        // binder can't widen it back from the initializer once frozen); any
        // initializer is trivially assignable to `any`, so the check only
        // has teeth for explicitly typed fields.
        if !TypeInfo::is_any(declared.as_ref()) && !checker.solver.is_assignable(declared, &init_ty) {
            checker.error(
                ErrorKind::TypeMismatch,
                format!("initializer for '{}' is not assignable to its declared type", field.name),
                init.span,
            );
        }
    }
}

fn check_static_block(checker: &mut Checker, block: &stypec_ast::Block) {
    let frame = FunctionContext {
        return_type: TypeInfo::primitive(stypec_types::PrimitiveKind::Void),
        this_type: None,
        is_async: false,
        is_generator: false,
        declared: false,
        inferred_returns: Vec::new(),
    };
    checker.function_stack.push(frame);
    checker.narrowing.push();
    let child_env = checker.env.child();
    let previous_env = std::mem::replace(&mut checker.env, child_env);
    checker.check_block_stmts(&block.stmts);
    checker.env = previous_env;
    checker.narrowing.pop();
    checker.function_stack.pop();
}

/// §4.4: every member an implemented interface declares must exist on the
/// class with a compatible type, unless the interface itself marks it
/// optional.
fn check_implements(checker: &mut Checker, handle: &ClassHandle, span: Span) {
    let class = handle.get();
    for impl_ty in class.implements.clone() {
        let TypeInfo::Interface(iface) = impl_ty.as_ref() else { continue };
        for (member_name, member_ty) in iface.members.0.iter() {
            match Class::resolve_member(handle, member_name) {
                Some(class_member) => {
                    if !checker.solver.is_assignable(member_ty, &class_member.ty) {
                        checker.error(
                            ErrorKind::InterfaceNotSatisfied,
                            format!("property '{member_name}' is incompatible with the type required by its implemented interface"),
                            span,
                        );
                    }
                }
                None if !iface.optional.0.contains(member_name) => {
                    checker.error(
                        ErrorKind::InterfaceNotSatisfied,
                        format!("class '{}' is missing property '{member_name}' required by its implemented interface", class.name),
                        span,
                    );
                }
                None => {}
            }
        }
    }
}

/// §4.4: a concrete (non-`abstract`) class must provide a non-abstract
/// override for every abstract member declared anywhere in its superclass
/// chain, including its own `abstract` members if it isn't itself abstract.
fn check_abstract_satisfied(checker: &mut Checker, handle: &ClassHandle, span: Span) {
    if handle.get().is_abstract {
        return;
    }
    let mut ancestor = Some(handle.clone());
    while let Some(h) = ancestor {
        let class = h.get();
        for member_name in &class.abstract_members {
            if !concretely_overridden(handle, &h, member_name) {
                checker.error(
                    ErrorKind::AbstractNotImplemented,
                    format!("non-abstract class '{}' does not implement inherited abstract member '{member_name}'", handle.name()),
                    span,
                );
            }
        }
        ancestor = class.superclass.clone();
    }
}

fn concretely_overridden(start: &ClassHandle, declaring: &ClassHandle, name: &str) -> bool {
    let mut current = Some(start.clone());
    while let Some(h) = current {
        if &h == declaring {
            return false;
        }
        let class = h.get();
        if class.members.contains_key(name) && !class.abstract_members.contains(name) {
            return true;
        }
        current = class.superclass.clone();
    }
    false
}

/// §4.4: `override` only makes sense when a superclass actually declares
/// the member being overridden.
fn check_overrides(checker: &mut Checker, cd: &ClassDecl, handle: &ClassHandle, span: Span) {
    let superclass = handle.get().superclass.clone();
    for member in &cd.members {
        let AstClassMember::Method(method) = member else { continue };
        if !method.is_override {
            continue;
        }
        let found = superclass.as_ref().map(|sup| Class::resolve_member(sup, &method.name).is_some()).unwrap_or(false);
        if !found {
            checker.error(
                ErrorKind::OverrideNotFound,
                format!("'{}' is marked 'override' but no superclass member of that name exists", method.name),
                span,
            );
        }
    }
}

/// §9 Open Question: parameter decorators are only legal under the legacy
/// decorator proposal; under the standard proposal they're a misuse of the
/// decorator position rather than silently accepted.
fn check_decorators(checker: &mut Checker, cd: &ClassDecl, span: Span) {
    if checker.options.decorator_mode != DecoratorMode::Standard {
        return;
    }
    for member in &cd.members {
        if let AstClassMember::Method(method) = member {
            if method.params.iter().any(|p| !p.decorators.is_empty()) {
                checker.error(
                    ErrorKind::DecoratorMisuse,
                    "parameter decorators are not supported under the standard decorators proposal",
                    span,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use stypec_ast::{AccessModifier, Block, ClassDecl, ClassMember as AstClassMember, MethodDecl, MethodKind, Module, NodeId, Stmt, StmtKind, TypeExpr, TypeExprKind};
    use stypec_binder::ModuleResolver;
    use stypec_common::{CheckerOptions, DecoratorMode, Span};
    use stypec_env::ModuleRecord;

    use crate::session::CheckSession;

    struct NoResolver;
    impl ModuleResolver for NoResolver {
        fn resolve(&self, _from_path: &str, _specifier: &str) -> Option<String> {
            None
        }
        fn cached_module(&self, _canonical_path: &str) -> Option<&ModuleRecord> {
            None
        }
    }

    fn dummy_span() -> Span {
        Span::dummy()
    }

    fn reference(name: &str) -> TypeExpr {
        TypeExpr { id: NodeId::DUMMY, span: dummy_span(), kind: TypeExprKind::Reference { name: name.to_string(), type_args: vec![] } }
    }

    fn method(name: &str, kind: MethodKind, is_abstract: bool, is_override: bool, body: Option<Block>) -> AstClassMember {
        AstClassMember::Method(MethodDecl {
            name: name.to_string(),
            decorators: vec![],
            kind,
            type_params: vec![],
            params: vec![],
            return_type: None,
            body,
            is_static: false,
            is_abstract,
            is_async: false,
            is_generator: false,
            is_override,
            access: AccessModifier::Public,
        })
    }

    fn class_stmt(decl: ClassDecl) -> Stmt {
        Stmt::new(NodeId::DUMMY, dummy_span(), StmtKind::ClassDecl(decl))
    }

    fn module_of(stmts: Vec<Stmt>) -> Module {
        Module { path: "test.ts".to_string(), body: stmts }
    }

    #[test]
    fn abstract_class_with_no_concrete_subclass_reports_nothing() {
        let decl = ClassDecl {
            name: Some("Shape".into()),
            decorators: vec![],
            type_params: vec![],
            superclass: None,
            implements: vec![],
            members: vec![method("area", MethodKind::Method, true, false, None)],
            is_abstract: true,
        };
        let module = module_of(vec![class_stmt(decl)]);
        let mut session = CheckSession::new(CheckerOptions::default());
        session.check_module(&module, &NoResolver);
        assert!(!session.diagnostics.has_errors());
    }

    #[test]
    fn concrete_subclass_missing_abstract_override_is_an_error() {
        let base = ClassDecl {
            name: Some("Shape".into()),
            decorators: vec![],
            type_params: vec![],
            superclass: None,
            implements: vec![],
            members: vec![method("area", MethodKind::Method, true, false, None)],
            is_abstract: true,
        };
        let derived = ClassDecl {
            name: Some("Circle".into()),
            decorators: vec![],
            type_params: vec![],
            superclass: Some(reference("Shape")),
            implements: vec![],
            members: vec![],
            is_abstract: false,
        };
        let module = module_of(vec![class_stmt(base), class_stmt(derived)]);
        let mut session = CheckSession::new(CheckerOptions::default());
        session.check_module(&module, &NoResolver);
        assert!(session.diagnostics.has_errors());
    }

    #[test]
    fn concrete_subclass_implementing_abstract_member_is_clean() {
        let base = ClassDecl {
            name: Some("Shape".into()),
            decorators: vec![],
            type_params: vec![],
            superclass: None,
            implements: vec![],
            members: vec![method("area", MethodKind::Method, true, false, None)],
            is_abstract: true,
        };
        let derived = ClassDecl {
            name: Some("Circle".into()),
            decorators: vec![],
            type_params: vec![],
            superclass: Some(reference("Shape")),
            implements: vec![],
            members: vec![method("area", MethodKind::Method, false, true, Some(Block { stmts: vec![] }))],
            is_abstract: false,
        };
        let module = module_of(vec![class_stmt(base), class_stmt(derived)]);
        let mut session = CheckSession::new(CheckerOptions::default());
        session.check_module(&module, &NoResolver);
        assert!(!session.diagnostics.has_errors());
    }

    #[test]
    fn override_with_no_superclass_member_is_an_error() {
        let decl = ClassDecl {
            name: Some("Widget".into()),
            decorators: vec![],
            type_params: vec![],
            superclass: None,
            implements: vec![],
            members: vec![method("render", MethodKind::Method, false, true, Some(Block { stmts: vec![] }))],
            is_abstract: false,
        };
        let module = module_of(vec![class_stmt(decl)]);
        let mut session = CheckSession::new(CheckerOptions::default());
        session.check_module(&module, &NoResolver);
        assert!(session.diagnostics.has_errors());
    }
}
