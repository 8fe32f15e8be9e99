//! Type Environment (§3 Data Model): nested lexical scopes mapping names to
//! types, with three separate tables per scope — value bindings, type
//! aliases, and type parameters — matching the teacher's split between
//! `tsz-binder`'s symbol table and `tsz-checker`'s type-parameter scope
//! stack, collapsed here into one structure per §3's description.
//!
//! Represented as a linked list of scopes, exactly as specified: each
//! [`Env`] is an `Rc` handle onto a node that holds a parent link and the
//! three tables. Lookups walk the chain from innermost to outermost scope.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use stypec_types::Ty;

#[derive(Debug, Default)]
struct ScopeTables {
    values: FxHashMap<String, Ty>,
    type_aliases: FxHashMap<String, Ty>,
    type_params: FxHashMap<String, Ty>,
}

#[derive(Debug)]
struct EnvNode {
    parent: Option<Env>,
    tables: std::cell::RefCell<ScopeTables>,
}

/// A scope in the lexical chain. Cheap to clone (an `Rc` bump); cloning an
/// `Env` does not create a new scope, it shares the same one — `child()` is
/// what pushes a new lexical level.
#[derive(Clone, Debug)]
pub struct Env(Rc<EnvNode>);

impl Env {
    /// The root (global) scope, with no parent.
    pub fn root() -> Self {
        Env(Rc::new(EnvNode { parent: None, tables: Default::default() }))
    }

    /// Push a new, empty scope whose parent is `self`.
    pub fn child(&self) -> Self {
        Env(Rc::new(EnvNode { parent: Some(self.clone()), tables: Default::default() }))
    }

    pub fn define_value(&self, name: impl Into<String>, ty: Ty) {
        self.0.tables.borrow_mut().values.insert(name.into(), ty);
    }

    pub fn define_type_alias(&self, name: impl Into<String>, ty: Ty) {
        self.0.tables.borrow_mut().type_aliases.insert(name.into(), ty);
    }

    pub fn define_type_param(&self, name: impl Into<String>, ty: Ty) {
        self.0.tables.borrow_mut().type_params.insert(name.into(), ty);
    }

    /// Resolve a value binding, walking outward. Unlike type-name
    /// resolution, this never consults the type-parameter or type-alias
    /// tables: values and types are distinct namespaces.
    pub fn lookup_value(&self, name: &str) -> Option<Ty> {
        let mut scope = Some(self);
        while let Some(env) = scope {
            if let Some(ty) = env.0.tables.borrow().values.get(name) {
                return Some(ty.clone());
            }
            scope = env.0.parent.as_ref();
        }
        None
    }

    /// Resolve a name used in type position. At each scope level the type
    /// parameter table is consulted before the type alias table, so a
    /// type parameter introduced by an enclosing generic declaration always
    /// shadows a same-named alias (or value) declared further out — the
    /// invariant §3 calls out explicitly.
    pub fn lookup_type(&self, name: &str) -> Option<Ty> {
        let mut scope = Some(self);
        while let Some(env) = scope {
            let tables = env.0.tables.borrow();
            if let Some(ty) = tables.type_params.get(name) {
                return Some(ty.clone());
            }
            if let Some(ty) = tables.type_aliases.get(name) {
                return Some(ty.clone());
            }
            drop(tables);
            scope = env.0.parent.as_ref();
        }
        None
    }

    /// True if `name` resolves to a type parameter in some enclosing scope
    /// (as opposed to a type alias or nothing) — used by the binder to
    /// decide whether a bare reference denotes an opaque parameter rather
    /// than a concrete alias.
    pub fn is_type_parameter(&self, name: &str) -> bool {
        let mut scope = Some(self);
        while let Some(env) = scope {
            let tables = env.0.tables.borrow();
            if tables.type_params.contains_key(name) {
                return true;
            }
            if tables.type_aliases.contains_key(name) {
                return false;
            }
            drop(tables);
            scope = env.0.parent.as_ref();
        }
        false
    }

    /// Only this scope's own value table, not walking outward — used by the
    /// declaration binder to detect redeclaration within one block.
    pub fn has_own_value(&self, name: &str) -> bool {
        self.0.tables.borrow().values.contains_key(name)
    }

    /// A snapshot of this scope's own value bindings, not walking outward —
    /// used to build a namespace's exported member table from the scope its
    /// body was bound into.
    pub fn own_values(&self) -> Vec<(String, Ty)> {
        self.0.tables.borrow().values.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stypec_types::TypeInfo;

    #[test]
    fn child_scope_sees_parent_values() {
        let root = Env::root();
        root.define_value("x", TypeInfo::primitive(stypec_types::PrimitiveKind::Number));
        let child = root.child();
        assert!(child.lookup_value("x").is_some());
    }

    #[test]
    fn inner_value_shadows_outer() {
        let root = Env::root();
        root.define_value("x", TypeInfo::primitive(stypec_types::PrimitiveKind::Number));
        let child = root.child();
        child.define_value("x", TypeInfo::primitive(stypec_types::PrimitiveKind::String));
        assert_eq!(child.lookup_value("x"), Some(TypeInfo::primitive(stypec_types::PrimitiveKind::String)));
        assert_eq!(root.lookup_value("x"), Some(TypeInfo::primitive(stypec_types::PrimitiveKind::Number)));
    }

    #[test]
    fn type_parameter_shadows_outer_alias() {
        let root = Env::root();
        root.define_type_alias("T", TypeInfo::primitive(stypec_types::PrimitiveKind::String));
        let child = root.child();
        child.define_type_param("T", TypeInfo::any());
        assert!(child.is_type_parameter("T"));
        assert_eq!(child.lookup_type("T"), Some(TypeInfo::any()));
    }

    #[test]
    fn unresolved_name_is_none() {
        let root = Env::root();
        assert!(root.lookup_value("missing").is_none());
        assert!(root.lookup_type("missing").is_none());
    }
}
