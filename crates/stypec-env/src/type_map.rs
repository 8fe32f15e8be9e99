//! Type Map (§3 Data Model): AST node identity → resolved [`Ty`].
//!
//! The checker's only structured output besides diagnostics. Downstream
//! consumers (the interpreter, the IL emitter — both external collaborators
//! per §1) read this table after a session finishes; nothing inside the
//! checker itself reads it back except the expression checker's own
//! "have I already typed this node" fast path for contextual re-typing.

use rustc_hash::FxHashMap;
use stypec_ast::NodeId;
use stypec_types::Ty;

/// AST node identity → resolved type.
///
/// Conceptually write-once: once the checker assigns a node's final type it
/// never revisits that node. `insert` does not assert this, though, because
/// a handful of legitimate paths re-type a node on purpose — contextual
/// typing fills in an arrow parameter's type once the expected type is
/// known, then the body is checked against the refined signature, which can
/// re-record the arrow expression's own node.
#[derive(Debug, Default)]
pub struct TypeMap {
    types: FxHashMap<NodeId, Ty>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, ty: Ty) {
        self.types.insert(node, ty);
    }

    pub fn get(&self, node: NodeId) -> Option<&Ty> {
        self.types.get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.types.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use stypec_types::TypeInfo;

    #[test]
    fn records_and_retrieves_a_node_type() {
        let mut map = TypeMap::new();
        let node = NodeId(0);
        map.insert(node, TypeInfo::any());
        assert_eq!(map.get(node), Some(&TypeInfo::any()));
    }

    #[test]
    fn missing_node_is_none() {
        let map = TypeMap::new();
        assert_eq!(map.get(NodeId(7)), None);
    }

    #[test]
    fn later_insert_overwrites() {
        let mut map = TypeMap::new();
        let node = NodeId(1);
        map.insert(node, TypeInfo::any());
        map.insert(node, Rc::new(TypeInfo::LiteralBoolean(true)));
        assert_eq!(map.get(node), Some(&Rc::new(TypeInfo::LiteralBoolean(true))));
    }
}
