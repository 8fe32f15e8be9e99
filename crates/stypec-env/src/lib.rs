//! Type Environment and Type Map (§3 Data Model).
//!
//! Two small, dependency-light structures everything else in the workspace
//! threads through: [`Env`], the nested lexical scope chain values, type
//! aliases and type parameters resolve against; and [`TypeMap`], the
//! write-mostly side table from AST node identity to resolved type that is
//! this checker's principal output alongside diagnostics. [`ModuleRecord`]
//! rounds out the data model with the per-file export bookkeeping §4.6
//! describes.

pub mod module;
pub mod scope;
pub mod type_map;

pub use module::{ModuleAugmentation, ModuleRecord};
pub use scope::Env;
pub use type_map::TypeMap;
