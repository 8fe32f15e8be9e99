//! The semantic type domain (§3 Data Model).
//!
//! `TypeInfo` is a closed algebraic sum covering every type the checker can
//! produce — primitives, literals, arrays, tuples, structural records,
//! functions and overload sets, classes and instances, interfaces, enums,
//! namespaces, unions and intersections, generics and their instantiations,
//! and the built-in polymorphic containers (`Promise`, `Map`, `Set`, ...).
//! Everything is immutable once constructed and reference-counted (`Ty =
//! Rc<TypeInfo>`), so structural equality is just `PartialEq` on the
//! pointee and two independently-built but shape-identical types compare
//! equal without an interning table.
//!
//! [`class`] carries the one exception to "immutable once constructed":
//! [`class::ClassHandle`], the builder/freeze indirection self-referential
//! class declarations need (§9 Design Notes). [`canonical`] holds the smart
//! constructors every union/intersection must go through to keep §3's
//! invariant 2 (flat, deduped, never-singleton) true. [`generics`] is the
//! generic-definition and lazy-instantiation machinery, and [`display`]
//! renders `TypeInfo` the way diagnostics quote it back to the user.

pub mod canonical;
pub mod class;
pub mod display;
pub mod generics;
pub mod info;

pub use canonical::{make_intersection, make_union};
pub use class::{Class, ClassHandle, ClassMember, InstanceOf};
pub use generics::{substitute, GenericDef, GenericDefKind, GenericRef, InstantiatedGeneric, TypeParameter};
pub use info::{
    Enum, EnumKind, EnumMember, EnumMemberValue, FunctionSignature, IndexMapWrapper, Interface, Namespace,
    OrderedFloat, OrderedNameSet, OverloadedFunction, PrimitiveKind, Record, Ty, Tuple, TupleElement, TypeInfo,
    WellKnownSymbol,
};
