//! Common types and utilities shared across the stypec type checker crates.
//!
//! This crate provides the foundational, dependency-free types used by
//! every other crate in the workspace:
//! - Source spans (`Span`, `Spanned`) and line/column resolution (`LineMap`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCollector`, `ErrorKind`)
//! - Fatal-error signaling (`FatalError`)
//! - Checker configuration (`CheckerOptions`)
//! - Centralized limits/thresholds

pub mod checker_options;
pub mod diagnostics;
pub mod fatal;
pub mod limits;
pub mod position;
pub mod scope_guard;
pub mod span;

pub use checker_options::{CheckerOptions, DecoratorMode};
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticCollector, ErrorKind};
pub use fatal::FatalError;
pub use position::{LineMap, Position, Range, SourceLocation};
pub use scope_guard::Scoped;
pub use span::{Span, Spanned};
