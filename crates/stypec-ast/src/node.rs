//! Node identity.
//!
//! The parser (an external collaborator, §1) assigns every AST node a
//! unique `NodeId` at construction time. The checker never constructs
//! `NodeId`s itself — it only uses them as keys into the [`TypeMap`] it
//! produces (§3), so identity survives independent of how the AST is
//! represented in memory (boxed tree here; an arena in the real parser).
//!
//! [`TypeMap`]: stypec_env::TypeMap

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}

/// Monotonic id generator, used by test fixtures that build AST nodes by
/// hand instead of going through a real parser.
#[derive(Default)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}
