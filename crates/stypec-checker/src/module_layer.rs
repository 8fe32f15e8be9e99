//! The module layer (§4.6): binding `import` clauses into a module's
//! environment before bodies are checked, and assembling the
//! [`ModuleRecord`] its `export`s produce afterward.
//!
//! A real embedding tool resolves specifiers against its own package
//! layout through [`ModuleResolver`]; this module only consumes that trait,
//! the same boundary the declaration binder draws around type resolution.
//!
//! Simplification: an imported name is defined in *both* the value table
//! and the type-alias table of the importing module's environment, since
//! nothing upstream of this crate distinguishes "this import was used as a
//! type" from "this import was used as a value" the way a full checker's
//! binder resolves per-reference. A name that the source module exports
//! only as a type (an interface, say) therefore also becomes spuriously
//! usable as a value locally; this over-approximation never produces a
//! false *error*, only a missed one, so it's an acceptable simplification
//! for this crate's scope (recorded in the design notes).

use rustc_hash::FxHashMap;
use stypec_ast::{ExportKind, ImportClause, ImportDecl, Stmt, StmtKind};
use stypec_binder::ModuleResolver;
use stypec_common::diagnostics::{Diagnostic, DiagnosticCollector, ErrorKind};
use stypec_env::{Env, ModuleAugmentation, ModuleRecord};
use stypec_types::{Ty, TypeInfo};

/// Binds every `import` at a module's top level into `env`, resolving each
/// specifier through `resolver` and pulling bindings from the already-bound
/// target module's exports. Unresolvable specifiers and missing names both
/// bind the unresolved name to `any` rather than failing the whole module,
/// mirroring how declaration binding degrades gracefully elsewhere.
pub fn bind_imports(env: &Env, body: &[Stmt], from_path: &str, resolver: &dyn ModuleResolver, diagnostics: &mut DiagnosticCollector) {
    for stmt in body {
        match &stmt.kind {
            StmtKind::Import(decl) => bind_import_decl(env, decl, from_path, resolver, diagnostics, stmt.span),
            StmtKind::Export(ExportKind::ReExportNamed { specifiers, module_specifier }) => {
                let target = target_record(from_path, module_specifier, resolver);
                for spec in specifiers {
                    let ty = target.as_ref().and_then(|m| m.resolve_export(&spec.imported)).unwrap_or_else(|| {
                        unresolved_import(diagnostics, from_path, &spec.imported, module_specifier, stmt.span)
                    });
                    define_imported(env, &spec.local, ty);
                }
            }
            _ => {}
        }
    }
}

fn bind_import_decl(
    env: &Env,
    decl: &ImportDecl,
    from_path: &str,
    resolver: &dyn ModuleResolver,
    diagnostics: &mut DiagnosticCollector,
    span: stypec_common::Span,
) {
    let target = target_record(from_path, &decl.module_specifier, resolver);
    match &decl.clause {
        ImportClause::SideEffect => {}
        ImportClause::EqualsRequire { local } => {
            define_imported(env, local, TypeInfo::any());
        }
        ImportClause::Namespace(local) => {
            let members = target.map(|m| m.exports.clone()).unwrap_or_default();
            let ns = stypec_types::Namespace { name: local.clone(), members: members_to_index_map(members) };
            define_imported(env, local, std::rc::Rc::new(TypeInfo::Namespace(std::rc::Rc::new(ns))));
        }
        ImportClause::Default(local) => {
            let ty = target.as_ref().and_then(|m| m.default_export.clone()).unwrap_or_else(|| {
                unresolved_import(diagnostics, from_path, "default", &decl.module_specifier, span)
            });
            define_imported(env, local, ty);
        }
        ImportClause::Named(specifiers) => {
            for spec in specifiers {
                let ty = target.as_ref().and_then(|m| m.resolve_export(&spec.imported)).unwrap_or_else(|| {
                    unresolved_import(diagnostics, from_path, &spec.imported, &decl.module_specifier, span)
                });
                define_imported(env, &spec.local, ty);
            }
        }
        ImportClause::DefaultAndNamed { default, named } => {
            let default_ty = target.as_ref().and_then(|m| m.default_export.clone()).unwrap_or_else(|| {
                unresolved_import(diagnostics, from_path, "default", &decl.module_specifier, span)
            });
            define_imported(env, default, default_ty);
            for spec in named {
                let ty = target.as_ref().and_then(|m| m.resolve_export(&spec.imported)).unwrap_or_else(|| {
                    unresolved_import(diagnostics, from_path, &spec.imported, &decl.module_specifier, span)
                });
                define_imported(env, &spec.local, ty);
            }
        }
    }
}

fn target_record<'a>(from_path: &str, specifier: &str, resolver: &'a dyn ModuleResolver) -> Option<&'a ModuleRecord> {
    let canonical = resolver.resolve(from_path, specifier)?;
    resolver.cached_module(&canonical)
}

fn unresolved_import(diagnostics: &mut DiagnosticCollector, file: &str, name: &str, specifier: &str, span: stypec_common::Span) -> Ty {
    diagnostics.push(Diagnostic::error(
        ErrorKind::UnknownName,
        format!("module '{specifier}' has no exported member '{name}'"),
        file.to_string(),
        span,
    ));
    TypeInfo::any()
}

fn define_imported(env: &Env, local: &str, ty: Ty) {
    env.define_value(local, ty.clone());
    env.define_type_alias(local, ty);
}

fn members_to_index_map(members: FxHashMap<String, Ty>) -> stypec_types::IndexMapWrapper {
    let mut map = indexmap::IndexMap::new();
    for (k, v) in members {
        map.insert(k, v);
    }
    stypec_types::IndexMapWrapper(map)
}

/// Assembles the [`ModuleRecord`] a module's `export`s produce, once every
/// top-level declaration has a type in `env` (phase 1 ran) and every
/// statement body has been checked (phase 2 ran) — the two don't need to
/// interleave because an `export`'s type is always just "whatever the
/// declared name already resolved to," never something only computable
/// mid-body.
pub fn build_module_record(env: &Env, body: &[Stmt], path: &str, diagnostics: &mut DiagnosticCollector) -> ModuleRecord {
    let mut record = ModuleRecord::new(path.to_string());
    for stmt in body {
        collect_export(env, stmt, &mut record, diagnostics);
    }
    record
}

fn collect_export(env: &Env, stmt: &Stmt, record: &mut ModuleRecord, diagnostics: &mut DiagnosticCollector) {
    match &stmt.kind {
        StmtKind::Export(export) => match export {
            ExportKind::Named(specifiers) => {
                for spec in specifiers {
                    if let Some(ty) = lookup_exported(env, &spec.imported) {
                        record.exports.insert(spec.local.clone(), ty);
                    }
                }
            }
            ExportKind::ReExportNamed { specifiers, .. } => {
                for spec in specifiers {
                    if let Some(ty) = lookup_exported(env, &spec.imported) {
                        record.exports.insert(spec.local.clone(), ty);
                    }
                }
            }
            ExportKind::ReExportAll { alias, .. } => {
                // Without the re-exported module's own record at this point
                // (only its path is known), a star re-export's members can't
                // be folded in here; the embedding tool is expected to
                // re-resolve `ReExportAll` against the target's own record
                // after both are bound, same as it drives `ModuleResolver`.
                let _ = alias;
            }
            ExportKind::Default(expr) => {
                record.default_export = expr_declared_type(env, expr);
            }
            ExportKind::ExportAssignment(expr) => {
                record.has_export_assignment = true;
                record.export_assignment = expr_declared_type(env, expr);
                if record.default_export.is_some() || !record.exports.is_empty() {
                    diagnostics.push(Diagnostic::error(
                        ErrorKind::ExportAssignmentConflict,
                        "an 'export =' assignment cannot be combined with other exports",
                        record.path.clone(),
                        stmt.span,
                    ));
                }
            }
            ExportKind::Declaration(inner) => {
                if let Some(name) = declared_name(inner) {
                    if let Some(ty) = lookup_exported(env, &name) {
                        record.exports.insert(name, ty);
                    }
                }
            }
        },
        StmtKind::DeclareModule { name, body: inner } => {
            record.module_augmentations.insert(name.clone(), ModuleAugmentation { members: augmentation_members(env, inner) });
        }
        StmtKind::DeclareGlobal { body: inner } => {
            record.global_augmentations.push(augmentation_members(env, inner));
        }
        _ => {}
    }
}

fn lookup_exported(env: &Env, name: &str) -> Option<Ty> {
    env.lookup_value(name).or_else(|| env.lookup_type(name))
}

fn declared_name(stmt: &Stmt) -> Option<String> {
    match &stmt.kind {
        StmtKind::FunctionDecl(fd) => Some(fd.name.clone()),
        StmtKind::ClassDecl(cd) => cd.name.clone(),
        StmtKind::InterfaceDecl(id) => Some(id.name.clone()),
        StmtKind::TypeAliasDecl(ta) => Some(ta.name.clone()),
        StmtKind::EnumDecl(ed) => Some(ed.name.clone()),
        StmtKind::NamespaceDecl(nd) => Some(nd.name.clone()),
        StmtKind::VarDecl { declarators, .. } => declarators.first().map(|d| d.name.clone()),
        _ => None,
    }
}

fn expr_declared_type(env: &Env, expr: &stypec_ast::Expr) -> Option<Ty> {
    match &expr.kind {
        stypec_ast::ExprKind::Identifier(name) => lookup_exported(env, name),
        _ => None,
    }
}

fn augmentation_members(env: &Env, body: &[Stmt]) -> FxHashMap<String, Ty> {
    let mut members = FxHashMap::default();
    for stmt in body {
        if let Some(name) = declared_name(stmt) {
            if let Some(ty) = lookup_exported(env, &name) {
                members.insert(name, ty);
            }
        }
    }
    members
}
