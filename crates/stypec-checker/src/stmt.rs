//! The Statement Checker (§4.4): recursive descent over [`Stmt`], threading
//! loop/switch/label depth, the enclosing function's return type, and the
//! narrowing frame an `if`/loop guard pushes for its body.
//!
//! Lexical scopes are pushed by swapping `self.env` directly (`mem::replace`
//! / restore) rather than through [`stypec_common::Scoped`]: the guard would
//! need to hold a live mutable borrow of the `env` field across the nested
//! `self.check_stmt(...)` calls that walk the scope's body, which conflicts
//! with those calls' own `&mut self` borrow. Every other piece of "current"
//! state (`loop_depth`, `narrowing`, `function_stack`) is restored the same
//! way: save, mutate, descend, restore, with no live guard spanning the
//! descent.

use std::rc::Rc;

use stypec_ast::{CatchClause, Stmt, StmtKind, SwitchCase, VarDeclarator, VarKind};
use stypec_common::diagnostics::ErrorKind;
use stypec_common::Span;
use stypec_solver::narrow_equality;
use stypec_types::{PrimitiveKind, Ty, Tuple, TupleElement, TypeInfo};

use crate::context::Checker;

impl<'a> Checker<'a> {
    pub fn check_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Block(block) => self.check_block(block),
            StmtKind::VarDecl { kind, declarators } => self.check_var_decl(*kind, declarators),
            StmtKind::FunctionDecl(fd) => {
                if let Some(body) = &fd.body {
                    let sig = self.check_function_like(&fd.params, Some(body), fd.return_type.as_ref(), None, fd.is_async, fd.is_generator);
                    self.record(stmt.id, Rc::new(TypeInfo::Function(sig)));
                }
            }
            StmtKind::ClassDecl(cd) => crate::classes::check_class_decl(self, cd, stmt.span),
            StmtKind::InterfaceDecl(_) | StmtKind::TypeAliasDecl(_) | StmtKind::EnumDecl(_) => {
                // Pure type-space declarations: their shells were already
                // built by the declaration binder and there is no body to
                // walk.
            }
            StmtKind::NamespaceDecl(nd) => self.check_namespace(nd),
            StmtKind::If { test, consequent, alternate } => self.check_if(test, consequent, alternate.as_deref()),
            StmtKind::While { test, body } => self.check_while(test, body),
            StmtKind::DoWhile { body, test } => self.check_do_while(body, test),
            StmtKind::For { init, test, update, body } => self.check_for(init.as_deref(), test.as_ref(), update.as_ref(), body),
            StmtKind::ForOf { kind, binding, ty, iterable, body, is_await } => {
                self.check_for_of(*kind, binding, ty.as_ref(), iterable, body, *is_await)
            }
            StmtKind::ForIn { kind, binding, object, body } => self.check_for_in(*kind, binding, object, body),
            StmtKind::Switch { discriminant, cases } => self.check_switch(discriminant, cases),
            StmtKind::Labeled { label, body } => self.check_labeled(label, body),
            StmtKind::Return(value) => self.check_return(value.as_ref(), stmt.span),
            StmtKind::Break(label) => self.check_break(label.as_deref(), stmt.span),
            StmtKind::Continue(label) => self.check_continue(label.as_deref(), stmt.span),
            StmtKind::Throw(expr) => {
                self.check_expr(expr);
            }
            StmtKind::TryCatch { block, catch, finally } => self.check_try_catch(block, catch.as_ref(), finally.as_ref()),
            StmtKind::ExprStmt(expr) => {
                self.check_expr(expr);
            }
            StmtKind::Empty => {}
            StmtKind::Directive(_) => {}
            StmtKind::Import(_) | StmtKind::Export(_) => {
                // Bound by the module layer; `export default <expr>` and
                // `export = value` still type-check their expression.
                self.check_export_expr(&stmt.kind);
            }
            StmtKind::DeclareModule { body, .. } | StmtKind::DeclareGlobal { body } => {
                self.check_block_stmts(body);
            }
            StmtKind::Ambient(inner) => self.check_stmt(inner),
            StmtKind::Using { declarators, .. } => self.check_var_decl(VarKind::Const, declarators),
        }
    }

    fn check_export_expr(&mut self, kind: &StmtKind) {
        match kind {
            StmtKind::Export(stypec_ast::ExportKind::Default(expr)) => {
                self.check_expr(expr);
            }
            StmtKind::Export(stypec_ast::ExportKind::ExportAssignment(expr)) => {
                self.check_expr(expr);
            }
            StmtKind::Export(stypec_ast::ExportKind::Declaration(inner)) => self.check_stmt(inner),
            _ => {}
        }
    }

    /// A standalone block statement (as opposed to a function body, which
    /// `check_function_like` already wraps in its own scope/frame): pushes
    /// both a lexical scope and a narrowing frame for the block's extent.
    fn check_block(&mut self, block: &stypec_ast::Block) {
        self.narrowing.push();
        let child_env = self.env.child();
        let previous_env = std::mem::replace(&mut self.env, child_env);
        self.check_block_stmts(&block.stmts);
        self.env = previous_env;
        self.narrowing.pop();
    }

    /// Checks a statement list in the current scope/narrowing frame,
    /// without pushing either — used for a function body (whose frame the
    /// caller already pushed) and for `declare module`/`declare global`
    /// bodies.
    pub(crate) fn check_block_stmts(&mut self, stmts: &[Stmt]) {
        let mut unreachable = false;
        for stmt in stmts {
            if unreachable && !self.options.allow_unreachable_code {
                self.suggest(ErrorKind::UnreachableCode, "unreachable code", stmt.span);
            }
            self.check_stmt(stmt);
            unreachable = unreachable || stmt_terminates(stmt);
        }
    }

    fn check_var_decl(&mut self, kind: VarKind, declarators: &[VarDeclarator]) {
        for d in declarators {
            let declared = d.ty.as_ref().map(|t| self.resolve_type(t));
            let init_ty = d.init.as_ref().map(|e| self.check_expr_contextual(e, declared.as_ref()));
            let final_ty = match (declared, init_ty) {
                (Some(declared), Some(init)) => {
                    if !self.solver.is_assignable(&declared, &init) {
                        self.error(
                            ErrorKind::TypeMismatch,
                            "initializer is not assignable to the declared type",
                            d.init.as_ref().map(|e| e.span).unwrap_or(Span::dummy()),
                        );
                    }
                    declared
                }
                (Some(declared), None) => declared,
                (None, Some(init)) => {
                    if matches!(kind, VarKind::Const) {
                        init
                    } else {
                        TypeInfo::widen_literal(&init)
                    }
                }
                (None, None) => TypeInfo::any(),
            };
            self.env.define_value(d.name.clone(), final_ty.clone());
            self.narrowing.narrow(d.name.clone(), final_ty);
        }
    }

    fn check_if(&mut self, test: &stypec_ast::Expr, consequent: &Stmt, alternate: Option<&Stmt>) {
        let (_, then_d, else_d) = self.guard_effects(test);

        self.narrowing.push();
        for (p, t) in &then_d {
            self.narrowing.narrow(p.clone(), t.clone());
        }
        self.check_stmt(consequent);
        let then_frame = self.narrowing.snapshot();
        self.narrowing.pop();

        self.narrowing.push();
        for (p, t) in &else_d {
            self.narrowing.narrow(p.clone(), t.clone());
        }
        if let Some(alt) = alternate {
            self.check_stmt(alt);
        }
        let else_frame = self.narrowing.snapshot();
        self.narrowing.pop();

        let then_terminates = stmt_terminates(consequent);
        let else_terminates = alternate.map(stmt_terminates).unwrap_or(false);
        if then_terminates && !else_terminates {
            self.narrowing.restore(else_frame);
        } else if else_terminates && !then_terminates {
            self.narrowing.restore(then_frame);
        } else if !then_terminates && !else_terminates {
            let joined = self.narrowing.join(then_frame, else_frame);
            self.narrowing.restore(joined);
        }
    }

    fn check_while(&mut self, test: &stypec_ast::Expr, body: &Stmt) {
        let (_, then_d, _) = self.guard_effects(test);
        self.narrowing.push();
        for (p, t) in &then_d {
            self.narrowing.narrow(p.clone(), t.clone());
        }
        self.loop_depth += 1;
        self.check_stmt(body);
        self.loop_depth -= 1;
        self.narrowing.pop();
    }

    fn check_do_while(&mut self, body: &Stmt, test: &stypec_ast::Expr) {
        self.loop_depth += 1;
        self.check_stmt(body);
        self.loop_depth -= 1;
        self.check_expr(test);
    }

    fn check_for(&mut self, init: Option<&Stmt>, test: Option<&stypec_ast::Expr>, update: Option<&stypec_ast::Expr>, body: &Stmt) {
        self.narrowing.push();
        let child_env = self.env.child();
        let previous_env = std::mem::replace(&mut self.env, child_env);
        if let Some(init) = init {
            self.check_stmt(init);
        }
        if let Some(test) = test {
            self.check_expr(test);
        }
        self.loop_depth += 1;
        self.check_stmt(body);
        self.loop_depth -= 1;
        if let Some(update) = update {
            self.check_expr(update);
        }
        self.env = previous_env;
        self.narrowing.pop();
    }

    fn check_for_of(&mut self, kind: VarKind, binding: &str, ty: Option<&stypec_ast::TypeExpr>, iterable: &stypec_ast::Expr, body: &Stmt, is_await: bool) {
        let iterable_ty = self.check_expr(iterable);
        let mut elem_ty = element_type_of_iterable(&iterable_ty);
        if is_await {
            elem_ty = crate::expr::unwrap_promise(&elem_ty);
        }
        let declared = ty.map(|t| self.resolve_type(t));
        let binding_ty = declared.unwrap_or(elem_ty);
        let _ = kind;

        self.narrowing.push();
        let child_env = self.env.child();
        child_env.define_value(binding.to_string(), binding_ty.clone());
        let previous_env = std::mem::replace(&mut self.env, child_env);
        self.narrowing.narrow(binding.to_string(), binding_ty);
        self.loop_depth += 1;
        self.check_stmt(body);
        self.loop_depth -= 1;
        self.env = previous_env;
        self.narrowing.pop();
    }

    fn check_for_in(&mut self, kind: VarKind, binding: &str, object: &stypec_ast::Expr, body: &Stmt) {
        self.check_expr(object);
        let _ = kind;
        self.narrowing.push();
        let child_env = self.env.child();
        child_env.define_value(binding.to_string(), TypeInfo::primitive(PrimitiveKind::String));
        let previous_env = std::mem::replace(&mut self.env, child_env);
        self.loop_depth += 1;
        self.check_stmt(body);
        self.loop_depth -= 1;
        self.env = previous_env;
        self.narrowing.pop();
    }

    fn check_switch(&mut self, discriminant: &stypec_ast::Expr, cases: &[SwitchCase]) {
        let disc_ty = self.check_expr(discriminant);
        let disc_path = crate::expr::expr_path(discriminant);
        self.switch_depth += 1;

        // Each case's test is checked once, up front, so the `default`
        // case's exhaustiveness check can see every other case's literal
        // regardless of where in the case list `default` itself sits.
        let case_tys: Vec<Option<Ty>> = cases.iter().map(|case| case.test.as_ref().map(|t| self.check_expr(t))).collect();

        let exhaustive = match disc_ty.as_ref() {
            TypeInfo::Union(members) if members.iter().all(|m| is_literal_unit(m)) => {
                members.iter().all(|m| case_tys.iter().flatten().any(|c| c == m))
            }
            _ => false,
        };

        for (case, lit_ty) in cases.iter().zip(case_tys.into_iter()) {
            self.narrowing.push();
            match (&disc_path, &lit_ty) {
                (Some(path), Some(lt)) if is_literal_unit(lt) => {
                    let (matching, _) = narrow_equality(&disc_ty, lt);
                    self.narrowing.narrow(path.clone(), matching);
                }
                (Some(path), None) if exhaustive => {
                    // Every union member is covered by some earlier case; a
                    // `default` reached after all of them is unreachable,
                    // so its scrutinee narrows to `never` (§4.4 "switch
                    // exhaustiveness").
                    self.narrowing.narrow(path.clone(), TypeInfo::never());
                }
                _ => {}
            }
            self.check_block_stmts(&case.body);
            self.narrowing.pop();
        }
        self.switch_depth -= 1;
    }

    fn check_labeled(&mut self, label: &str, body: &Stmt) {
        let is_loop = matches!(
            body.kind,
            StmtKind::For { .. } | StmtKind::ForOf { .. } | StmtKind::ForIn { .. } | StmtKind::While { .. } | StmtKind::DoWhile { .. }
        );
        self.labels.insert(label.to_string(), is_loop);
        self.check_stmt(body);
        self.labels.remove(label);
    }

    fn check_return(&mut self, value: Option<&stypec_ast::Expr>, span: Span) {
        let expected = self.current_function().return_type.clone();
        let declared = self.current_function().declared;
        let is_async = self.current_function().is_async;
        let expected_unwrapped = if is_async { crate::expr::unwrap_promise(&expected) } else { expected.clone() };
        let value_ty = match value {
            Some(e) => self.check_expr_contextual(e, Some(&expected_unwrapped)),
            None => TypeInfo::primitive(PrimitiveKind::Void),
        };
        if declared {
            if !self.solver.is_assignable(&expected_unwrapped, &value_ty) {
                self.error(ErrorKind::TypeMismatch, "returned value is not assignable to the function's return type", span);
            }
        } else {
            self.current_function_mut().inferred_returns.push(value_ty);
        }
    }

    fn check_break(&mut self, label: Option<&str>, span: Span) {
        match label {
            Some(l) => {
                if !self.labels.contains_key(l) {
                    self.error(ErrorKind::LabelNotFound, format!("no loop or switch found with label '{l}'"), span);
                }
            }
            None => {
                if self.loop_depth == 0 && self.switch_depth == 0 {
                    self.error(ErrorKind::BreakOutsideLoop, "'break' statement can only be used within an enclosing loop or switch", span);
                }
            }
        }
    }

    fn check_continue(&mut self, label: Option<&str>, span: Span) {
        match label {
            Some(l) => match self.labels.get(l) {
                Some(true) => {}
                Some(false) => {
                    self.error(ErrorKind::LabelNotFound, format!("'continue' can only reference a label of a loop, '{l}' labels a non-loop statement"), span);
                }
                None => {
                    self.error(ErrorKind::LabelNotFound, format!("no loop found with label '{l}'"), span);
                }
            },
            None => {
                if self.loop_depth == 0 {
                    self.error(ErrorKind::BreakOutsideLoop, "'continue' statement can only be used within an enclosing loop", span);
                }
            }
        }
    }

    fn check_try_catch(&mut self, block: &stypec_ast::Block, catch: Option<&CatchClause>, finally: Option<&stypec_ast::Block>) {
        self.check_block(block);
        if let Some(c) = catch {
            self.narrowing.push();
            let child_env = self.env.child();
            let previous_env = std::mem::replace(&mut self.env, child_env);
            if let Some(name) = &c.param {
                let catch_ty = match &c.param_ty {
                    Some(t) => self.resolve_type(t),
                    None if self.options.use_unknown_in_catch_variables => TypeInfo::unknown(),
                    None => TypeInfo::any(),
                };
                self.env.define_value(name.clone(), catch_ty);
            }
            self.check_block_stmts(&c.body.stmts);
            self.env = previous_env;
            self.narrowing.pop();
        }
        if let Some(f) = finally {
            self.check_block(f);
        }
    }

    /// Re-seeds a child scope with the namespace's own member table (already
    /// computed by the declaration binder and stored as a `Namespace` value
    /// under its name) before walking the body, since the binder's own
    /// internal scope used to build that table doesn't survive past phase 1.
    fn check_namespace(&mut self, nd: &stypec_ast::NamespaceDecl) {
        let child_env = self.env.child();
        if let Some(existing) = self.env.lookup_type(&nd.name) {
            if let TypeInfo::Namespace(ns) = existing.as_ref() {
                for (name, ty) in ns.members.0.iter() {
                    child_env.define_value(name.clone(), ty.clone());
                }
            }
        }
        let previous_env = std::mem::replace(&mut self.env, child_env);
        self.check_block_stmts(&nd.body);
        self.env = previous_env;
    }
}

fn element_type_of_iterable(ty: &Ty) -> Ty {
    match ty.as_ref() {
        TypeInfo::Array(elem) => elem.clone(),
        TypeInfo::IteratorType(elem) | TypeInfo::GeneratorType(elem) | TypeInfo::AsyncGeneratorType(elem) => elem.clone(),
        TypeInfo::SetType(elem) => elem.clone(),
        TypeInfo::MapType(k, v) => Rc::new(TypeInfo::Tuple(Tuple {
            elements: vec![
                TupleElement { ty: k.clone(), optional: false },
                TupleElement { ty: v.clone(), optional: false },
            ],
            required_count: 2,
            rest: None,
        })),
        TypeInfo::Primitive(PrimitiveKind::String) => TypeInfo::primitive(PrimitiveKind::String),
        _ => TypeInfo::any(),
    }
}

/// Whether `stmt` definitely transfers control away rather than falling
/// through (§4.4 "definite-return analysis"). Conservative: anything not
/// recognized is assumed to fall through, matching the teacher's
/// `control_flow_analyzer.rs` bias toward "under-report unreachable
/// coverage" over false positives.
pub(crate) fn stmt_terminates(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) | StmtKind::Throw(_) | StmtKind::Break(_) | StmtKind::Continue(_) => true,
        StmtKind::Block(b) => block_terminates(&b.stmts),
        StmtKind::If { consequent, alternate: Some(alt), .. } => stmt_terminates(consequent) && stmt_terminates(alt),
        StmtKind::TryCatch { block, catch, finally } => {
            if let Some(f) = finally {
                if block_terminates(&f.stmts) {
                    return true;
                }
            }
            let try_ok = block_terminates(&block.stmts);
            let catch_ok = catch.as_ref().map(|c| block_terminates(&c.body.stmts)).unwrap_or(true);
            try_ok && catch_ok
        }
        StmtKind::Switch { cases, .. } => {
            !cases.is_empty() && cases.iter().all(|c| block_terminates(&c.body)) && cases.iter().any(|c| c.test.is_none())
        }
        StmtKind::Labeled { body, .. } => stmt_terminates(body),
        StmtKind::While { test, body } => is_truthy_literal(test) && !contains_break(body),
        _ => false,
    }
}

pub(crate) fn block_terminates(stmts: &[Stmt]) -> bool {
    stmts.last().map(stmt_terminates).unwrap_or(false)
}

fn is_literal_unit(ty: &Ty) -> bool {
    matches!(ty.as_ref(), TypeInfo::LiteralString(_) | TypeInfo::LiteralNumber(_) | TypeInfo::LiteralBoolean(_))
}

fn is_truthy_literal(expr: &stypec_ast::Expr) -> bool {
    matches!(&expr.kind, stypec_ast::ExprKind::Literal(stypec_ast::Literal::Boolean(true)))
}

fn contains_break(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Break(None) => true,
        StmtKind::Block(b) => b.stmts.iter().any(contains_break),
        StmtKind::If { consequent, alternate, .. } => contains_break(consequent) || alternate.as_deref().map(contains_break).unwrap_or(false),
        _ => false,
    }
}
