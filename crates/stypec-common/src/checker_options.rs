//! Compiler options for type checking.
//!
//! This lives in `stypec-common` so both `stypec-solver` and `stypec-checker`
//! can reference `CheckerOptions` without creating a circular dependency
//! between them.

/// Which decorator semantics the checker enforces (§9 Open Question).
///
/// Selection is driven by this external mode flag rather than by sniffing
/// syntax: the two modes have different arity and target rules, and a
/// decorator that is valid under one is not necessarily valid under the
/// other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecoratorMode {
    /// The older decorator proposal: decorators receive descriptors and
    /// parameter decorators are accepted.
    #[default]
    Legacy,
    /// The newer standardized form: parameter decorators are not part of the
    /// proposal and are flagged rather than silently accepted.
    Standard,
}

/// Compiler options affecting type-checking strictness and behavior.
#[derive(Debug, Clone, Default)]
pub struct CheckerOptions {
    pub strict_null_checks: bool,
    pub no_implicit_any: bool,
    pub strict_function_types: bool,
    pub strict_property_initialization: bool,
    pub no_implicit_this: bool,
    pub use_unknown_in_catch_variables: bool,
    /// When true, indexed access through an index signature adds
    /// `| undefined` to the result type.
    pub no_unchecked_indexed_access: bool,
    /// When true, optional properties are exactly `T | undefined`, not
    /// `T | undefined | missing`.
    pub exact_optional_property_types: bool,
    /// When true, unreachable code after a terminating statement is not
    /// reported even as a suggestion.
    pub allow_unreachable_code: bool,
    pub decorator_mode: DecoratorMode,
}

impl CheckerOptions {
    /// The options profile used by the end-to-end scenarios in §8: every
    /// strictness flag on, legacy decorators (matching the scenarios, which
    /// predate the newer decorator proposal).
    pub fn strict() -> Self {
        CheckerOptions {
            strict_null_checks: true,
            no_implicit_any: true,
            strict_function_types: true,
            strict_property_initialization: true,
            no_implicit_this: true,
            use_unknown_in_catch_variables: true,
            no_unchecked_indexed_access: false,
            exact_optional_property_types: false,
            allow_unreachable_code: false,
            decorator_mode: DecoratorMode::Legacy,
        }
    }
}
