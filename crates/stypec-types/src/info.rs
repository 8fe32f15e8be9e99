//! The semantic type domain (§3 Data Model).
//!
//! `TypeInfo` is a closed algebraic sum; every variant is immutable once
//! constructed and carries exactly the information needed for structural
//! comparison. Types are reference-counted (`Ty = Rc<TypeInfo>`) rather than
//! arena-indexed: `Rc`'s derived `PartialEq`/`Hash` delegate to the pointee,
//! so two independently constructed but structurally identical types compare
//! equal without needing a central interning table. The one place identity
//! genuinely matters — a class referencing itself before its own
//! declaration finishes — is handled by [`crate::class::ClassHandle`], a
//! single indirection cell frozen exactly once (§9 Design Notes).

use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::class::InstanceOf;
use crate::generics::{GenericRef, InstantiatedGeneric, TypeParameter};

pub type Ty = Rc<TypeInfo>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Void,
    Null,
    Undefined,
    Symbol,
    BigInt,
    Any,
    Unknown,
    Never,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub ty: Ty,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tuple {
    pub elements: Vec<TupleElement>,
    pub required_count: usize,
    pub rest: Option<Ty>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub fields: IndexMapWrapper,
    pub string_index: Option<Ty>,
    pub number_index: Option<Ty>,
    pub symbol_index: Option<Ty>,
}

/// `IndexMap<String, Ty>` wrapped so it can derive `Eq`/`Hash` (order
/// matters for display but not for equality; two records with the same
/// fields in a different order are still the same structural type).
#[derive(Clone, Debug, Default)]
pub struct IndexMapWrapper(pub IndexMap<String, Ty>);

impl PartialEq for IndexMapWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|(k, v)| other.0.get(k) == Some(v))
    }
}
impl Eq for IndexMapWrapper {}
impl std::hash::Hash for IndexMapWrapper {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Order-independent: hash the sum of per-entry hashes.
        let mut acc: u64 = 0;
        for (k, v) in self.0.iter() {
            let mut h = rustc_hash::FxHasher::default();
            (k, v).hash(&mut h);
            acc ^= std::hash::Hasher::finish(&h);
        }
        acc.hash(state);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    pub params: Vec<Ty>,
    pub return_type: Ty,
    pub min_arity: usize,
    pub has_rest: bool,
    pub this_type: Option<Ty>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OverloadedFunction {
    pub signatures: Vec<FunctionSignature>,
    pub implementation: FunctionSignature,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnumKind {
    Numeric,
    String,
    Heterogeneous,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnumMemberValue {
    Number(i64),
    String(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumMember {
    pub name: String,
    pub value: EnumMemberValue,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Enum {
    pub name: String,
    pub members: Vec<EnumMember>,
    pub kind: EnumKind,
    pub is_const: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Interface {
    pub name: String,
    pub members: IndexMapWrapper,
    pub optional: OrderedNameSet,
    pub string_index: Option<Ty>,
    pub number_index: Option<Ty>,
}

#[derive(Clone, Debug, Default)]
pub struct OrderedNameSet(pub FxHashSet<String>);
impl PartialEq for OrderedNameSet {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for OrderedNameSet {}
impl std::hash::Hash for OrderedNameSet {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        let mut acc: u64 = 0;
        for name in &self.0 {
            let mut h = rustc_hash::FxHasher::default();
            name.hash(&mut h);
            acc ^= std::hash::Hasher::finish(&h);
        }
        acc.hash(state);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub name: String,
    pub members: IndexMapWrapper,
}

/// The eight well-known symbols the spec enumerates (§9 Open Question);
/// anything else types as plain `symbol`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WellKnownSymbol {
    Iterator,
    AsyncIterator,
    ToStringTag,
    HasInstance,
    IsConcatSpreadable,
    ToPrimitive,
    Species,
    Unscopables,
}

/// The closed algebraic sum of every semantic type the checker can produce.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeInfo {
    Primitive(PrimitiveKind),
    LiteralString(String),
    LiteralNumber(OrderedFloat),
    LiteralBoolean(bool),

    Array(Ty),
    Tuple(Tuple),
    Record(Record),

    Function(FunctionSignature),
    OverloadedFunction(OverloadedFunction),

    Instance(InstanceOf),

    Interface(Rc<Interface>),
    Enum(Rc<Enum>),
    Namespace(Rc<Namespace>),

    Union(Vec<Ty>),
    Intersection(Vec<Ty>),

    TypeParameter(TypeParameter),
    GenericClass(GenericRef),
    GenericInterface(GenericRef),
    GenericFunction(GenericRef),
    InstantiatedGeneric(Rc<InstantiatedGeneric>),

    Promise(Ty),
    MapType(Ty, Ty),
    SetType(Ty),
    WeakMap(Ty, Ty),
    WeakSet(Ty),
    Date,
    RegExp,
    ErrorType,
    Buffer,
    IteratorType(Ty),
    GeneratorType(Ty),
    AsyncGeneratorType(Ty),
    Timeout,

    UniqueSymbol(WellKnownSymbol),
}

/// `f64` wrapper with a total order/hash, needed because numeric literal
/// types must be hashable to dedup inside unions.
#[derive(Clone, Copy, Debug)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
impl Eq for OrderedFloat {}
impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl TypeInfo {
    pub fn primitive(kind: PrimitiveKind) -> Ty {
        Rc::new(TypeInfo::Primitive(kind))
    }

    pub fn any() -> Ty {
        Self::primitive(PrimitiveKind::Any)
    }

    pub fn unknown() -> Ty {
        Self::primitive(PrimitiveKind::Unknown)
    }

    pub fn never() -> Ty {
        Self::primitive(PrimitiveKind::Never)
    }

    pub fn is_never(ty: &TypeInfo) -> bool {
        matches!(ty, TypeInfo::Primitive(PrimitiveKind::Never))
    }

    pub fn is_any(ty: &TypeInfo) -> bool {
        matches!(ty, TypeInfo::Primitive(PrimitiveKind::Any))
    }

    pub fn is_unknown(ty: &TypeInfo) -> bool {
        matches!(ty, TypeInfo::Primitive(PrimitiveKind::Unknown))
    }

    pub fn is_null(ty: &TypeInfo) -> bool {
        matches!(ty, TypeInfo::Primitive(PrimitiveKind::Null))
    }

    pub fn is_nullish(ty: &TypeInfo) -> bool {
        matches!(ty, TypeInfo::Primitive(PrimitiveKind::Null | PrimitiveKind::Undefined))
    }

    /// The primitive a literal type widens to on assignment without an
    /// explicit annotation (§4.3).
    pub fn widen_literal(ty: &Ty) -> Ty {
        match ty.as_ref() {
            TypeInfo::LiteralString(_) => Self::primitive(PrimitiveKind::String),
            TypeInfo::LiteralNumber(_) => Self::primitive(PrimitiveKind::Number),
            TypeInfo::LiteralBoolean(_) => Self::primitive(PrimitiveKind::Boolean),
            TypeInfo::Union(members) => {
                crate::canonical::make_union(members.iter().map(Self::widen_literal).collect())
            }
            _ => ty.clone(),
        }
    }
}
