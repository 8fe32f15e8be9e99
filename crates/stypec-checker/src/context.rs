//! [`Checker`]: the struct every expression- and statement-checking method
//! in this crate is implemented as a method on (§4.3, §4.4). Mirrors the
//! teacher's `CheckerState`, which spreads its methods across
//! `state_checking.rs`, `state_class_checking.rs`, `expr.rs`, and friends —
//! one big struct, many `impl` blocks in separate files by concern.
//!
//! Everything "current" that recursive descent threads through — the
//! lexical environment, the enclosing function's return type and `this`
//! type, loop/switch/label depth, the active narrowing frame, the class
//! being checked — lives here and is pushed/popped with
//! [`stypec_common::Scoped`] around the statement/expression visit that
//! owns the corresponding lexical region (§5 "Scoped-resource discipline").

use rustc_hash::FxHashMap;
use stypec_ast::{NodeId, TypeExpr};
use stypec_binder::{PredicateTable, TypeResolver};
use stypec_common::diagnostics::{Diagnostic, DiagnosticCollector, ErrorKind};
use stypec_common::{CheckerOptions, Span};
use stypec_env::{Env, TypeMap};
use stypec_solver::{NarrowingContext, Solver};
use stypec_types::class::ClassHandle;
use stypec_types::Ty;

/// Per-function state pushed when entering a function/method/accessor body
/// and popped on exit (§4.4): the body is isolated from the surrounding
/// loop/switch/label context, so none of this is shared with the enclosing
/// function's own `FunctionContext`.
#[derive(Clone)]
pub struct FunctionContext {
    /// The function's own declared return type (already unwrapped of
    /// `Promise`/`Generator` wrapping — see [`Checker::push_function`]).
    pub return_type: Ty,
    pub this_type: Option<Ty>,
    pub is_async: bool,
    pub is_generator: bool,
    /// Whether `return_type` came from an explicit annotation. A function
    /// with no annotation infers its return type from the union of its
    /// `return` statements instead of being held to one up front, and is
    /// never subject to the definite-return check (§4.4).
    pub declared: bool,
    /// Collected types of `return <expr>` statements, used to infer the
    /// function's return type when `declared` is false.
    pub inferred_returns: Vec<Ty>,
}

impl FunctionContext {
    pub fn top_level() -> Self {
        FunctionContext {
            return_type: Ty::from(stypec_types::TypeInfo::Primitive(stypec_types::PrimitiveKind::Void)),
            this_type: None,
            is_async: false,
            is_generator: false,
            declared: false,
            inferred_returns: Vec::new(),
        }
    }
}

/// Active labels (§4.4): maps a label name to whether it labels a loop
/// (bare `continue label;` is only valid on a loop label).
pub struct Checker<'a> {
    pub env: Env,
    /// `&mut` rather than `&` even though every query method takes `&self`
    /// internally (the memoization cache is a `RefCell`): nested block-scoped
    /// declarations discovered mid-body (§4.4, a `class`/`function` inside a
    /// function body) still need to register into `solver.generics`, which
    /// only a unique reference can reach without a second interior-mutability
    /// layer duplicating what `Solver` already has.
    pub solver: &'a mut Solver,
    pub diagnostics: &'a mut DiagnosticCollector,
    pub type_map: &'a mut TypeMap,
    pub predicates: &'a PredicateTable,
    pub options: &'a CheckerOptions,
    pub file: String,
    pub narrowing: NarrowingContext,

    pub(crate) function_stack: Vec<FunctionContext>,
    pub(crate) loop_depth: u32,
    pub(crate) switch_depth: u32,
    pub(crate) labels: FxHashMap<String, bool>,
    pub(crate) current_class: Option<ClassHandle>,
}

impl<'a> Checker<'a> {
    pub fn new(
        env: Env,
        solver: &'a mut Solver,
        diagnostics: &'a mut DiagnosticCollector,
        type_map: &'a mut TypeMap,
        predicates: &'a PredicateTable,
        options: &'a CheckerOptions,
        file: impl Into<String>,
    ) -> Self {
        Checker {
            env,
            solver,
            diagnostics,
            type_map,
            predicates,
            options,
            file: file.into(),
            narrowing: NarrowingContext::new(),
            function_stack: vec![FunctionContext::top_level()],
            loop_depth: 0,
            switch_depth: 0,
            labels: FxHashMap::default(),
            current_class: None,
        }
    }

    pub fn error(&mut self, kind: ErrorKind, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::error(kind, message, self.file.clone(), span));
    }

    pub fn suggest(&mut self, kind: ErrorKind, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::suggestion(kind, message, self.file.clone(), span));
    }

    pub fn record(&mut self, node: NodeId, ty: Ty) -> Ty {
        self.type_map.insert(node, ty.clone());
        ty
    }

    pub fn current_function(&self) -> &FunctionContext {
        self.function_stack.last().expect("function stack is never empty")
    }

    pub fn current_function_mut(&mut self) -> &mut FunctionContext {
        self.function_stack.last_mut().expect("function stack is never empty")
    }

    /// True if a binding named `name` is visible somewhere in the current
    /// class's superclass chain with `private` or `protected` access and
    /// we are outside that class's own body — used by member-access
    /// checking (§4.3 "respect access modifiers").
    pub fn in_class_context(&self, handle: &ClassHandle) -> bool {
        self.current_class.as_ref().map(|c| c == handle).unwrap_or(false)
    }

    /// Resolves a syntactic type annotation against the checker's current
    /// environment and enclosing `this` type. Every body-checking method
    /// that meets an inline annotation (a parameter's `ty`, a variable
    /// declarator's `ty`, a type assertion's target) goes through here
    /// rather than constructing a [`TypeResolver`] itself.
    pub fn resolve_type(&mut self, te: &TypeExpr) -> Ty {
        let this_ty = self.function_stack.last().and_then(|f| f.this_type.clone());
        let resolver = TypeResolver::new(&self.env, &self.solver.generics, this_ty.as_ref(), &self.file);
        resolver.resolve(te, self.diagnostics)
    }
}
