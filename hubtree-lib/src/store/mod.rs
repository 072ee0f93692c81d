//! Tree store
//!
//! The only owner of the catalog. Nodes live in an arena indexed by
//! [`NodeId`]; parents hold child id lists and children hold a parent id.
//! Every mutation is synchronous and touches a single node's state. Each one
//! is announced on a broadcast channel so renderers can redraw.

mod rows;

pub use rows::VisibleRow;

use std::collections::HashMap;

use tokio::sync::broadcast;

use crate::error::TreeError;
use crate::model::Children;
use crate::model::HubSummary;
use crate::model::NodeId;
use crate::model::NodeKind;
use crate::model::NodeState;
use crate::model::ResourceNode;
use crate::model::Summary;
use crate::source::FetchRequest;

/// Capacity of the change-event channel.
const EVENT_CAPACITY: usize = 256;

/// Load state of the root hub list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootState {
    /// Not requested yet.
    Unloaded,
    Loading,
    Ready,
    /// The hub fetch failed; the whole tree is unavailable.
    Error(String),
}

/// Change notification emitted after each store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    RootsChanged,
    NodeChanged(NodeId),
}

/// Outstanding fetch for one node.
#[derive(Debug, Default)]
struct FetchTicket {
    /// Set when the node was collapsed while loading. The result is still
    /// cached but the node settles as `Collapsed`.
    collapse_requested: bool,
}

/// Owns the catalog and guards against duplicate fetches.
#[derive(Debug)]
pub struct TreeStore {
    nodes: Vec<ResourceNode>,
    roots: Vec<NodeId>,
    root_state: RootState,
    in_flight: HashMap<NodeId, FetchTicket>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeStore {
    /// Creates an empty store with no hubs loaded.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            root_state: RootState::Unloaded,
            in_flight: HashMap::new(),
            events,
        }
    }

    /// Subscribes to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Number of nodes materialized so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_state(&self) -> &RootState {
        &self.root_state
    }

    /// Hub node ids, in fetch order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get_node(&self, id: NodeId) -> Result<&ResourceNode, TreeError> {
        self.nodes.get(id.0).ok_or(TreeError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut ResourceNode, TreeError> {
        self.nodes.get_mut(id.0).ok_or(TreeError::NotFound(id))
    }

    /// Returns `true` if a fetch is outstanding for the node.
    pub fn is_in_flight(&self, id: NodeId) -> bool {
        self.in_flight.contains_key(&id)
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    // =========================================================================
    // Roots
    // =========================================================================

    /// Claims the hub fetch.
    ///
    /// Only an unloaded or failed hub list may be fetched. Returns `false`
    /// when a fetch is already running or hubs are loaded.
    pub fn begin_root_fetch(&mut self) -> bool {
        match self.root_state {
            RootState::Unloaded | RootState::Error(_) => {
                self.root_state = RootState::Loading;
                self.emit(StoreEvent::RootsChanged);
                true
            }
            RootState::Loading | RootState::Ready => false,
        }
    }

    /// Materializes the hub list.
    pub fn commit_roots(&mut self, hubs: Vec<HubSummary>) -> Vec<NodeId> {
        let ids: Vec<NodeId> = hubs
            .into_iter()
            .map(|hub| self.insert(Summary::Hub(hub), None))
            .collect();
        self.roots = ids.clone();
        self.root_state = RootState::Ready;
        self.emit(StoreEvent::RootsChanged);
        ids
    }

    /// Records a failed hub fetch.
    pub fn commit_roots_error(&mut self, message: impl Into<String>) {
        self.root_state = RootState::Error(message.into());
        self.emit(StoreEvent::RootsChanged);
    }

    // =========================================================================
    // Per-node operations
    // =========================================================================

    /// Claims the fetch for a node.
    ///
    /// Returns `true` and moves the node to `Loading` if no fetch is
    /// outstanding. Returns `false` for loading nodes and for leaves; the
    /// caller must not issue a fetch in that case.
    pub fn begin_fetch(&mut self, id: NodeId) -> Result<bool, TreeError> {
        let node = self.node_mut(id)?;
        if node.is_leaf() || node.state.is_loading() {
            return Ok(false);
        }
        node.state = NodeState::Loading;
        self.in_flight.insert(id, FetchTicket::default());
        self.emit(StoreEvent::NodeChanged(id));
        Ok(true)
    }

    /// Caches fetched children and settles the node.
    ///
    /// The node becomes `Expanded`, even for an empty list, unless it was
    /// collapsed while loading, in which case it becomes `Collapsed`.
    pub fn commit_children(
        &mut self,
        id: NodeId,
        children: Vec<Summary>,
    ) -> Result<Vec<NodeId>, TreeError> {
        self.get_node(id)?;
        let ids: Vec<NodeId> = children
            .into_iter()
            .map(|summary| self.insert(summary, Some(id)))
            .collect();

        let collapse_requested = self
            .in_flight
            .remove(&id)
            .is_some_and(|ticket| ticket.collapse_requested);

        let node = self.node_mut(id)?;
        node.children = Children::Loaded(ids.clone());
        node.state = if collapse_requested {
            NodeState::Collapsed
        } else {
            NodeState::Expanded
        };
        self.emit(StoreEvent::NodeChanged(id));
        Ok(ids)
    }

    /// Records a failed fetch. Children stay as they were, so a retry looks
    /// exactly like a first attempt.
    pub fn commit_error(&mut self, id: NodeId, message: impl Into<String>) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        node.state = NodeState::Error(message.into());
        self.in_flight.remove(&id);
        self.emit(StoreEvent::NodeChanged(id));
        Ok(())
    }

    /// Collapses a node, keeping its cached children.
    ///
    /// A loading node keeps loading; the request is remembered and applied
    /// when the fetch settles. Leaves are left alone.
    pub fn collapse(&mut self, id: NodeId) -> Result<(), TreeError> {
        if let Some(ticket) = self.in_flight.get_mut(&id) {
            ticket.collapse_requested = true;
            return Ok(());
        }
        let node = self.node_mut(id)?;
        if node.is_leaf() {
            return Ok(());
        }
        node.state = NodeState::Collapsed;
        self.emit(StoreEvent::NodeChanged(id));
        Ok(())
    }

    /// Re-expands a node from its cache.
    ///
    /// Returns `false` without changing anything when children were never
    /// loaded or a fetch is running.
    pub fn expand_cached(&mut self, id: NodeId) -> Result<bool, TreeError> {
        let node = self.node_mut(id)?;
        if !node.has_cached_children() || node.state.is_loading() {
            return Ok(false);
        }
        node.state = NodeState::Expanded;
        self.emit(StoreEvent::NodeChanged(id));
        Ok(true)
    }

    // =========================================================================
    // Paths
    // =========================================================================

    /// Ids from the hub down to the node, inclusive.
    pub fn path(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut path = vec![id];
        let mut current = self.get_node(id)?;
        while let Some(parent) = current.parent_id {
            path.push(parent);
            current = self.get_node(parent)?;
        }
        path.reverse();
        Ok(path)
    }

    /// Nearest ancestor of the given kind, including the node itself.
    fn ancestor_remote_id(&self, id: NodeId, kind: NodeKind) -> Result<Option<&str>, TreeError> {
        let mut current = Some(id);
        while let Some(cursor) = current {
            let node = self.get_node(cursor)?;
            if node.kind == kind {
                return Ok(Some(&node.remote_id));
            }
            current = node.parent_id;
        }
        Ok(None)
    }

    /// Builds the call that loads this node's children.
    ///
    /// Returns `None` for versions, and for nodes whose ancestry does not
    /// reach a hub and project (which the store never produces).
    pub fn fetch_request(&self, id: NodeId) -> Result<Option<FetchRequest>, TreeError> {
        let node = self.get_node(id)?;
        let hub_id = self.ancestor_remote_id(id, NodeKind::Hub)?.map(str::to_string);
        let project_id = self
            .ancestor_remote_id(id, NodeKind::Project)?
            .map(str::to_string);

        let request = match (node.kind, hub_id, project_id) {
            (NodeKind::Hub, Some(hub_id), _) => Some(FetchRequest::Projects { hub_id }),
            (NodeKind::Project, Some(hub_id), Some(project_id)) => {
                Some(FetchRequest::TopFolders { hub_id, project_id })
            }
            (NodeKind::Folder, Some(hub_id), Some(project_id)) => {
                Some(FetchRequest::FolderContents {
                    hub_id,
                    project_id,
                    folder_id: node.remote_id.clone(),
                })
            }
            (NodeKind::Item, Some(hub_id), Some(project_id)) => Some(FetchRequest::Versions {
                hub_id,
                project_id,
                item_id: node.remote_id.clone(),
            }),
            _ => None,
        };
        Ok(request)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn insert(&mut self, summary: Summary, parent_id: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let kind = summary.kind();
        let children = if kind.is_expandable() {
            Children::Unloaded
        } else {
            Children::Leaf
        };
        let display_name = summary.label();
        let remote_id = summary.remote_id().to_string();
        let version = match summary {
            Summary::Version(version) => Some(version),
            _ => None,
        };
        self.nodes.push(ResourceNode {
            id,
            remote_id,
            kind,
            display_name,
            parent_id,
            children,
            state: NodeState::Collapsed,
            version,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FolderEntry;
    use crate::model::FolderSummary;
    use crate::model::ItemSummary;
    use crate::model::NamedAttributes;
    use crate::model::ProjectSummary;
    use crate::model::VersionAttributes;
    use crate::model::VersionSummary;

    fn hub(id: &str) -> HubSummary {
        HubSummary {
            id: id.to_string(),
            attributes: NamedAttributes {
                name: format!("Hub {id}"),
            },
        }
    }

    fn project(id: &str) -> Summary {
        Summary::Project(ProjectSummary {
            id: id.to_string(),
            attributes: NamedAttributes {
                name: format!("Project {id}"),
            },
        })
    }

    fn folder(id: &str) -> Summary {
        Summary::Folder(FolderSummary {
            id: id.to_string(),
            attributes: Default::default(),
        })
    }

    fn item(id: &str) -> Summary {
        Summary::from(FolderEntry::Item(ItemSummary {
            id: id.to_string(),
            attributes: Default::default(),
        }))
    }

    /// Store with one hub, returning (store, hub id).
    fn store_with_hub() -> (TreeStore, NodeId) {
        let mut store = TreeStore::new();
        assert!(store.begin_root_fetch());
        let ids = store.commit_roots(vec![hub("h1")]);
        (store, ids[0])
    }

    #[test]
    fn test_roots_are_fetched_once() {
        let (mut store, _) = store_with_hub();
        assert_eq!(store.root_state(), &RootState::Ready);
        assert!(!store.begin_root_fetch());
    }

    #[test]
    fn test_failed_roots_can_be_retried() {
        let mut store = TreeStore::new();
        assert!(store.begin_root_fetch());
        assert!(!store.begin_root_fetch());
        store.commit_roots_error("HTTP 503");
        assert_eq!(store.root_state(), &RootState::Error("HTTP 503".to_string()));
        assert!(store.begin_root_fetch());
    }

    #[test]
    fn test_begin_fetch_guards_duplicates() {
        let (mut store, hub) = store_with_hub();
        assert!(store.begin_fetch(hub).unwrap());
        assert!(!store.begin_fetch(hub).unwrap());
        assert!(store.is_in_flight(hub));
        assert_eq!(store.get_node(hub).unwrap().state, NodeState::Loading);
    }

    #[test]
    fn test_commit_empty_children_is_expanded() {
        let (mut store, hub) = store_with_hub();
        store.begin_fetch(hub).unwrap();
        let ids = store.commit_children(hub, vec![]).unwrap();

        let node = store.get_node(hub).unwrap();
        assert!(ids.is_empty());
        assert_eq!(node.state, NodeState::Expanded);
        assert_eq!(node.children, Children::Loaded(vec![]));
        assert!(!store.is_in_flight(hub));
    }

    #[test]
    fn test_commit_error_keeps_children_unloaded() {
        let (mut store, hub) = store_with_hub();
        store.begin_fetch(hub).unwrap();
        store.commit_error(hub, "HTTP 500: boom").unwrap();

        let node = store.get_node(hub).unwrap();
        assert_eq!(node.state.error_message(), Some("HTTP 500: boom"));
        assert_eq!(node.children, Children::Unloaded);
        assert!(store.begin_fetch(hub).unwrap());
    }

    #[test]
    fn test_collapse_keeps_cache() {
        let (mut store, hub) = store_with_hub();
        store.begin_fetch(hub).unwrap();
        let ids = store.commit_children(hub, vec![project("p1")]).unwrap();

        store.collapse(hub).unwrap();
        let node = store.get_node(hub).unwrap();
        assert_eq!(node.state, NodeState::Collapsed);
        assert_eq!(node.children, Children::Loaded(ids));

        assert!(store.expand_cached(hub).unwrap());
        assert!(store.get_node(hub).unwrap().state.is_expanded());
    }

    #[test]
    fn test_expand_cached_needs_loaded_children() {
        let (mut store, hub) = store_with_hub();
        assert!(!store.expand_cached(hub).unwrap());
        assert_eq!(store.get_node(hub).unwrap().state, NodeState::Collapsed);
    }

    #[test]
    fn test_collapse_while_loading_caches_silently() {
        let (mut store, hub) = store_with_hub();
        store.begin_fetch(hub).unwrap();
        store.collapse(hub).unwrap();
        assert!(store.get_node(hub).unwrap().state.is_loading());

        store.commit_children(hub, vec![project("p1")]).unwrap();
        let node = store.get_node(hub).unwrap();
        assert_eq!(node.state, NodeState::Collapsed);
        assert!(node.has_cached_children());
    }

    #[test]
    fn test_version_nodes_are_leaves() {
        let (mut store, hub) = store_with_hub();
        store.begin_fetch(hub).unwrap();
        let version = Summary::Version(VersionSummary {
            id: "v1".to_string(),
            attributes: VersionAttributes {
                version_number: 1,
                name: Some("draft.rvt".to_string()),
                display_name: None,
            },
        });
        let ids = store.commit_children(hub, vec![version]).unwrap();

        let node = store.get_node(ids[0]).unwrap();
        assert_eq!(node.children, Children::Leaf);
        assert_eq!(node.display_name, "v1: draft.rvt");
        assert!(node.version.is_some());
        assert!(!store.begin_fetch(ids[0]).unwrap());
        store.collapse(ids[0]).unwrap();
        assert_eq!(store.get_node(ids[0]).unwrap().state, NodeState::Collapsed);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let store = TreeStore::new();
        assert_eq!(
            store.get_node(NodeId(42)).unwrap_err(),
            TreeError::NotFound(NodeId(42))
        );
    }

    #[test]
    fn test_fetch_request_walks_ancestors() {
        let (mut store, hub) = store_with_hub();
        store.begin_fetch(hub).unwrap();
        let project_id = store.commit_children(hub, vec![project("p1")]).unwrap()[0];
        store.begin_fetch(project_id).unwrap();
        let folder_id = store.commit_children(project_id, vec![folder("f1")]).unwrap()[0];
        store.begin_fetch(folder_id).unwrap();
        let nested = store
            .commit_children(folder_id, vec![folder("f2"), item("i1")])
            .unwrap();

        assert_eq!(
            store.fetch_request(hub).unwrap(),
            Some(FetchRequest::Projects {
                hub_id: "h1".to_string()
            })
        );
        assert_eq!(
            store.fetch_request(project_id).unwrap(),
            Some(FetchRequest::TopFolders {
                hub_id: "h1".to_string(),
                project_id: "p1".to_string(),
            })
        );
        assert_eq!(
            store.fetch_request(nested[0]).unwrap(),
            Some(FetchRequest::FolderContents {
                hub_id: "h1".to_string(),
                project_id: "p1".to_string(),
                folder_id: "f2".to_string(),
            })
        );
        assert_eq!(
            store.fetch_request(nested[1]).unwrap(),
            Some(FetchRequest::Versions {
                hub_id: "h1".to_string(),
                project_id: "p1".to_string(),
                item_id: "i1".to_string(),
            })
        );
        assert_eq!(
            store.path(nested[1]).unwrap(),
            vec![hub, project_id, folder_id, nested[1]]
        );
    }

    #[test]
    fn test_visible_rows_follow_expansion() {
        let (mut store, hub) = store_with_hub();
        store.begin_fetch(hub).unwrap();
        let projects = store
            .commit_children(hub, vec![project("p1"), project("p2")])
            .unwrap();

        let rows = store.visible_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], VisibleRow { id: projects[0], depth: 1 });

        store.collapse(hub).unwrap();
        assert_eq!(store.visible_rows(), vec![VisibleRow { id: hub, depth: 0 }]);
    }

    #[test]
    fn test_mutations_emit_events() {
        let (mut store, hub) = store_with_hub();
        let mut events = store.subscribe();
        store.begin_fetch(hub).unwrap();
        store.commit_children(hub, vec![]).unwrap();

        assert_eq!(events.try_recv().unwrap(), StoreEvent::NodeChanged(hub));
        assert_eq!(events.try_recv().unwrap(), StoreEvent::NodeChanged(hub));
        assert!(events.try_recv().is_err());
    }
}
