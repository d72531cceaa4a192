use std::fmt;

/// Stable handle for a node in a host tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

impl NodeKey {
    /// Reserved sentinel for "unassigned/invalid" identity.
    pub const INVALID: NodeKey = NodeKey(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
    Comment,
    /// Root of an encapsulated subtree. It has no parent; its host is
    /// reachable through `TreeWalk::shadow_host`.
    ShadowRoot,
}

/// One observed change, in the order the host applied it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationRecord {
    ChildList {
        target: NodeKey,
        added: Vec<NodeKey>,
        removed: Vec<NodeKey>,
    },
    Attributes {
        target: NodeKey,
        name: String,
    },
    CharacterData {
        target: NodeKey,
    },
}

impl MutationRecord {
    pub fn target(&self) -> NodeKey {
        match self {
            MutationRecord::ChildList { target, .. } => *target,
            MutationRecord::Attributes { target, .. } => *target,
            MutationRecord::CharacterData { target } => *target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    MissingNode(NodeKey),
    WrongNodeKind(NodeKey),
    InvalidParent(NodeKey),
    InvalidSibling { parent: NodeKey, before: NodeKey },
    CycleDetected { parent: NodeKey, child: NodeKey },
    ShadowRootExists(NodeKey),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::MissingNode(key) => write!(f, "node {} is not live", key.0),
            DomError::WrongNodeKind(key) => write!(f, "node {} has the wrong kind", key.0),
            DomError::InvalidParent(key) => write!(f, "node {} cannot take this child", key.0),
            DomError::InvalidSibling { parent, before } => {
                write!(f, "node {} is not a child of {}", before.0, parent.0)
            }
            DomError::CycleDetected { parent, child } => {
                write!(f, "inserting {} under {} would create a cycle", child.0, parent.0)
            }
            DomError::ShadowRootExists(key) => {
                write!(f, "node {} already hosts a shadow root", key.0)
            }
        }
    }
}

impl std::error::Error for DomError {}
