//! Declaration collection and the module layer (§4.5, §4.6).
//!
//! [`declarations`] is phase one of the declaration pass: a single walk over
//! a module's top-level statements that builds a type shell for every
//! class/interface/type-alias/enum/namespace/function group and defines it
//! in an [`stypec_env::Env`], without checking any statement or expression
//! body. [`type_resolution`] is the syntactic-to-semantic type resolver
//! phase one leans on throughout. [`enums`] and [`overloads`] are the two
//! declaration shapes involved enough to warrant their own module. The
//! checker crate runs phase one before walking any bodies, then consumes
//! [`declarations::PredicateTable`] and the environment phase one built.
//!
//! [`resolver`] defines the `ModuleResolver` trait the embedding tool
//! implements to hand this crate's module-layer support real filesystem
//! resolution (§6 External Interfaces).

pub mod declarations;
pub mod enums;
pub mod overloads;
pub mod resolver;
pub mod type_resolution;

pub use declarations::{DeclarationBinder, PredicateInfo, PredicateTable};
pub use enums::bind_enum;
pub use overloads::{CallableShape, OverloadError, OverloadGroup};
pub use resolver::ModuleResolver;
pub use type_resolution::TypeResolver;
