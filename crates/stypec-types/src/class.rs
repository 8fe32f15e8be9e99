//! Classes (§3 Data Model, §9 Design Notes).
//!
//! A class can reference itself — through `this`, through a method
//! parameter typed as the enclosing class, or through a field initialized
//! with `new Self()` inside a static factory — before its own declaration
//! has finished being checked. [`ClassHandle`] is the single indirection
//! that makes this representable with a plain `Rc` type graph instead of an
//! arena: a handle is allocated up front with just a name, passed around
//! freely while the declaration binder (§4.5 phase one) builds up its
//! members, and frozen exactly once when the class body is fully known.
//! Reading an unfrozen handle is a binder bug, not a recoverable checking
//! error, so [`ClassHandle::get`] panics rather than returning `Option`.
//!
//! Two classes are compared *nominally*: by name, optionally walking the
//! superclass chain (§4.1 rule 20). `ClassHandle`'s `PartialEq`/`Hash`
//! reflect this directly — comparing by name sidesteps needing structural
//! equality through a builder that may still be mid-construction.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::info::Ty;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassMember {
    pub ty: Ty,
    pub is_static: bool,
    pub is_readonly: bool,
    pub is_private: bool,
    pub is_protected: bool,
}

#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub superclass: Option<ClassHandle>,
    pub implements: Vec<Ty>,
    pub members: IndexMap<String, ClassMember>,
    pub optional: FxHashSet<String>,
    pub is_abstract: bool,
    pub abstract_members: FxHashSet<String>,
}

impl Class {
    /// Walks the superclass chain looking up an own or inherited member.
    pub fn resolve_member(handle: &ClassHandle, name: &str) -> Option<ClassMember> {
        let mut current = handle.clone();
        loop {
            let class = current.get();
            if let Some(member) = class.members.get(name) {
                return Some(member.clone());
            }
            match class.superclass.clone() {
                Some(sup) => current = sup,
                None => return None,
            }
        }
    }

    /// True if `ancestor` is this class or one of its transitive superclasses.
    pub fn is_subclass_of(self_handle: &ClassHandle, ancestor: &ClassHandle) -> bool {
        let mut current = Some(self_handle.clone());
        while let Some(handle) = current {
            if handle == *ancestor {
                return true;
            }
            current = handle.get().superclass.clone();
        }
        false
    }
}

/// A stable, nominally-identified reference to a [`Class`], frozen once its
/// declaration finishes checking.
#[derive(Clone, Debug)]
pub struct ClassHandle(pub Rc<ClassHandleInner>);

#[derive(Debug)]
pub struct ClassHandleInner {
    pub name: String,
    class: RefCell<Option<Rc<Class>>>,
}

impl ClassHandle {
    pub fn new(name: impl Into<String>) -> Self {
        ClassHandle(Rc::new(ClassHandleInner { name: name.into(), class: RefCell::new(None) }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn is_frozen(&self) -> bool {
        self.0.class.borrow().is_some()
    }

    /// Commits the class body. Calling this a second time indicates the
    /// binder re-entered a declaration it had already finished, which is a
    /// binder invariant violation, not a user-facing error.
    pub fn freeze(&self, class: Class) {
        let mut slot = self.0.class.borrow_mut();
        assert!(slot.is_none(), "class handle `{}` frozen twice", self.0.name);
        *slot = Some(Rc::new(class));
    }

    /// Reads the frozen class. Panics if called before `freeze` — every
    /// codepath that can observe a `ClassHandle` does so after the
    /// declaration pass that created it has completed, since instance types
    /// referencing a class are not produced until its handle exists and
    /// handles are only read back out after phase one commits them.
    pub fn get(&self) -> Rc<Class> {
        self.0
            .class
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("class handle `{}` read before being frozen", self.0.name))
    }
}

impl PartialEq for ClassHandle {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}
impl Eq for ClassHandle {}
impl std::hash::Hash for ClassHandle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

/// An instance of a (possibly generic, already-instantiated) class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceOf {
    pub class: ClassHandle,
    /// Type arguments supplied when instantiating a generic class; empty
    /// for non-generic classes.
    pub type_args: Vec<Ty>,
}
