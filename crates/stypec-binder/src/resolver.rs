//! The module resolver boundary (§6 External Interfaces): path resolution
//! and module lookup are supplied by the embedding tool, not performed here.
//! This mirrors how `tsz-checker` depends on `tsz-binder`'s resolution
//! machinery being wired up by the driver rather than reimplementing
//! filesystem/package-map logic inside the checker itself.

use stypec_env::ModuleRecord;

/// Resolves `import`/`export ... from` specifiers to canonical module paths
/// and hands back previously-bound modules by that path.
///
/// A real embedding tool implements this against its own package resolution
/// (node_modules, path mapping, `.d.ts` lookup); this crate only consumes
/// the trait.
pub trait ModuleResolver {
    /// Resolves `specifier` as written in `from_path` to a canonical path.
    /// Returns `None` if the specifier names a built-in module (handled
    /// separately by the checker's built-in catalog) or cannot be resolved.
    fn resolve(&self, from_path: &str, specifier: &str) -> Option<String>;

    /// The already-bound module record for a canonical path, if the
    /// resolver's host has checked (or is checking) it earlier in the
    /// session's topological order.
    fn cached_module(&self, canonical_path: &str) -> Option<&ModuleRecord>;
}
