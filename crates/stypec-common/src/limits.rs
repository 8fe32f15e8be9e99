//! Centralized thresholds guarding the checker against pathological input.
//!
//! Mirrors the teacher's `tsz-common::limits` module: a handful of named
//! constants rather than magic numbers scattered through the solver and
//! checker crates.

/// Maximum depth of recursive `assignable()` evaluation before it is treated
/// as non-terminating and conservatively resolved to `false`. Mutually
/// recursive interfaces and generics are the usual cause of deep recursion;
/// the memoization cache (§4.1) handles the common cycles, this is the
/// backstop for the ones it doesn't.
pub const MAX_ASSIGNABILITY_DEPTH: usize = 256;

/// Maximum number of generic instantiation substitutions performed while
/// resolving a single `InstantiatedGeneric` chain.
pub const MAX_INSTANTIATION_DEPTH: usize = 128;

/// Maximum nesting depth of narrowing scope guards before the narrowing
/// stack is no longer trusted to compose correctly.
pub const MAX_NARROWING_DEPTH: usize = 512;

/// Maximum number of constituent types kept in a canonicalized union or
/// intersection before it is collapsed towards `unknown`/`any` to bound
/// blow-up from combinatorial generic expansion.
pub const MAX_UNION_MEMBERS: usize = 512;
