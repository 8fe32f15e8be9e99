//! The Compatibility Engine and Narrowing Engine (§4.1, §4.2).
//!
//! [`assignability::Solver`] is the `assignable(expected, actual)`
//! predicate with its memoization cache and variance-aware generic
//! instantiation comparison; [`narrowing`] is the flow-sensitive guard
//! analysis that refines a path's type within the region a control-flow
//! guard proves it; [`infer`] is the structural unification generic calls
//! use to recover type arguments from argument types. [`variance`] backs
//! the generic-instantiation comparisons in `assignability` and is exposed
//! separately because the binder also consults it when validating a
//! generic class's declared variance annotations (if any).

pub mod assignability;
pub mod infer;
pub mod narrowing;
pub mod variance;

pub use assignability::{excess_properties, GenericRegistry, Solver};
pub use infer::{complete_bindings, infer_type_args};
pub use narrowing::{
    narrow_discriminant, narrow_equality, narrow_has_member, narrow_instance_of, narrow_nullish, narrow_truthy,
    narrow_typeof, non_nullish, NarrowingContext,
};
pub use variance::{Variance, VarianceCache};
