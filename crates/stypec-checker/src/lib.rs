//! Expression and statement checking, and session orchestration (§4.3, §4.4,
//! §4.6).
//!
//! Phase one of checking a module (building a type shell for every top-level
//! declaration) lives in `stypec-binder`; this crate is phase two — walking
//! statement and expression bodies against that shell, threading the
//! narrowing and class-checking state [`Checker`] carries, and producing the
//! [`stypec_env::TypeMap`] and diagnostics that are a session's output.
//! [`CheckSession`] is the entry point an embedding tool drives one module at
//! a time.

pub mod classes;
pub mod context;
pub mod expr;
pub mod module_layer;
pub mod session;
pub mod stmt;

pub use context::{Checker, FunctionContext};
pub use session::CheckSession;
