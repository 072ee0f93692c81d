//! Catalog nodes

use std::fmt;

use super::VersionSummary;

/// Store-assigned node identifier.
///
/// Remote ids are only unique within a parent, so the store issues its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Level of the hierarchy a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Hub,
    Project,
    Folder,
    Item,
    Version,
}

impl NodeKind {
    /// Every kind except `Version` can be expanded.
    pub fn is_expandable(self) -> bool {
        !matches!(self, Self::Version)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hub => "hub",
            Self::Project => "project",
            Self::Folder => "folder",
            Self::Item => "item",
            Self::Version => "version",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the store knows about a node's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children {
    /// Never fetched.
    Unloaded,
    /// Fetched; an empty list means the level is confirmed empty.
    Loaded(Vec<NodeId>),
    /// Versions have no children.
    Leaf,
}

impl Children {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// The loaded child ids, empty for `Unloaded` and `Leaf`.
    pub fn ids(&self) -> &[NodeId] {
        match self {
            Self::Loaded(ids) => ids,
            Self::Unloaded | Self::Leaf => &[],
        }
    }
}

/// Expansion state of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    Collapsed,
    Loading,
    Expanded,
    Error(String),
}

impl NodeState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, Self::Expanded)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// A node of the catalog discovered so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNode {
    pub id: NodeId,
    /// Identifier on the remote side, unique among siblings.
    pub remote_id: String,
    pub kind: NodeKind,
    pub display_name: String,
    /// Back-reference for path reconstruction. `None` for hubs.
    pub parent_id: Option<NodeId>,
    pub children: Children,
    pub state: NodeState,
    /// Full summary of a `Version` node, handed out on selection.
    pub version: Option<VersionSummary>,
}

impl ResourceNode {
    pub fn is_leaf(&self) -> bool {
        !self.kind.is_expandable()
    }

    /// Returns `true` if a re-expand would not need a fetch.
    pub fn has_cached_children(&self) -> bool {
        self.children.is_loaded()
    }
}
