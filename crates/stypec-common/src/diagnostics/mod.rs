//! Diagnostic types emitted by the type checker.
//!
//! Diagnostics are the checker's only output channel for problems (§7):
//! recoverable mismatches are collected here and checking continues; only
//! the error kinds in [`FatalErrorKind`] (see `super::fatal`) abort a
//! module's checking.

use serde::Serialize;

use crate::span::Span;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

/// The user-visible error codes a checking session can produce (§6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    TypeMismatch,
    UnknownName,
    NotCallable,
    ArityMismatch,
    AccessViolation,
    AbstractInstantiation,
    AbstractNotImplemented,
    OverrideNotFound,
    InterfaceNotSatisfied,
    DuplicateIndexSignature,
    MixedBigInt,
    NonExhaustiveReturn,
    LabelNotFound,
    BreakOutsideLoop,
    DecoratorMisuse,
    ExportAssignmentConflict,
    UnsupportedShift,
    UnreachableCode,
}

impl ErrorKind {
    /// A short machine-stable code, the way `tsz` diagnostics carry a `TSxxxx`
    /// code alongside the free-form message.
    pub const fn code(self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "type-mismatch",
            ErrorKind::UnknownName => "unknown-name",
            ErrorKind::NotCallable => "not-callable",
            ErrorKind::ArityMismatch => "arity-mismatch",
            ErrorKind::AccessViolation => "access-violation",
            ErrorKind::AbstractInstantiation => "abstract-instantiation",
            ErrorKind::AbstractNotImplemented => "abstract-not-implemented",
            ErrorKind::OverrideNotFound => "override-not-found",
            ErrorKind::InterfaceNotSatisfied => "interface-not-satisfied",
            ErrorKind::DuplicateIndexSignature => "duplicate-index-signature",
            ErrorKind::MixedBigInt => "mixed-bigint",
            ErrorKind::NonExhaustiveReturn => "non-exhaustive-return",
            ErrorKind::LabelNotFound => "label-not-found",
            ErrorKind::BreakOutsideLoop => "break-outside-loop",
            ErrorKind::DecoratorMisuse => "decorator-misuse",
            ErrorKind::ExportAssignmentConflict => "export-assignment-conflict",
            ErrorKind::UnsupportedShift => "unsupported-shift",
            ErrorKind::UnreachableCode => "unreachable-code",
        }
    }
}

/// A single type-checking diagnostic.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    pub file: String,
    pub span: Span,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    pub fn error(kind: ErrorKind, message: impl Into<String>, file: impl Into<String>, span: Span) -> Self {
        Diagnostic { kind, message: message.into(), file: file.into(), span, category: DiagnosticCategory::Error }
    }

    pub fn suggestion(kind: ErrorKind, message: impl Into<String>, file: impl Into<String>, span: Span) -> Self {
        Diagnostic { kind, message: message.into(), file: file.into(), span, category: DiagnosticCategory::Suggestion }
    }
}

/// Ordered collector for diagnostics raised during a checking session.
///
/// Diagnostics are appended in the order statements/expressions are visited;
/// callers needing a stable sort (e.g. by file then span) should sort the
/// drained `Vec` themselves — the collector intentionally does not reorder,
/// so that "first error wins" narratives in tests stay deterministic.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.category == DiagnosticCategory::Error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
