//! Session orchestration (§4.6): the entry point an embedding tool drives
//! one module at a time, owning the solver, diagnostics, and type map a
//! session accumulates across however many modules it checks.

use stypec_ast::Module;
use stypec_binder::{DeclarationBinder, ModuleResolver, PredicateTable};
use stypec_common::{CheckerOptions, diagnostics::DiagnosticCollector};
use stypec_env::{Env, TypeMap};
use stypec_solver::Solver;

use crate::context::Checker;
use crate::module_layer;

/// Owns everything that outlives a single module: the solver (and its
/// memoization cache, generic registry, variance cache), the accumulated
/// diagnostics, and the type map every checked expression is recorded into.
/// A module's own lexical environment is rooted as a child of `root_env` so
/// that `declare global` augmentations (bound into `root_env` directly) are
/// visible to every module in the session, matching how the teacher's
/// `Program` threads one global scope through per-file checking.
pub struct CheckSession {
    pub root_env: Env,
    pub solver: Solver,
    pub diagnostics: DiagnosticCollector,
    pub type_map: TypeMap,
    pub predicates: PredicateTable,
    pub options: CheckerOptions,
}

impl CheckSession {
    pub fn new(options: CheckerOptions) -> Self {
        CheckSession {
            root_env: Env::root(),
            solver: Solver::new(),
            diagnostics: DiagnosticCollector::new(),
            type_map: TypeMap::new(),
            predicates: PredicateTable::new(),
            options,
        }
    }

    /// Checks one module end to end: binds its declaration shell (phase 1),
    /// binds its imports against `resolver`, walks every statement body
    /// (phase 2), then assembles and returns the module's export record.
    /// The solver's assignability cache is cleared first since it's keyed
    /// by `Ty` identity within one module's lifetime, not safe to carry
    /// across modules whose types otherwise happen to be structurally equal
    /// (§4.1 "cache is module-scoped").
    pub fn check_module(&mut self, module: &Module, resolver: &dyn ModuleResolver) -> stypec_env::ModuleRecord {
        self.solver.clear_cache();
        let module_env = self.root_env.child();

        {
            let mut binder = DeclarationBinder {
                env: &module_env,
                generics: &mut self.solver.generics,
                predicates: &mut self.predicates,
                diagnostics: &mut self.diagnostics,
                file: &module.path,
            };
            binder.bind_top_level(&module.body);
        }

        module_layer::bind_imports(&module_env, &module.body, &module.path, resolver, &mut self.diagnostics);

        {
            let mut checker = Checker::new(
                module_env.clone(),
                &mut self.solver,
                &mut self.diagnostics,
                &mut self.type_map,
                &self.predicates,
                &self.options,
                module.path.clone(),
            );
            for stmt in &module.body {
                checker.check_stmt(stmt);
            }
        }

        module_layer::build_module_record(&module_env, &module.body, &module.path, &mut self.diagnostics)
    }
}
