//! Per-node expansion state machine
//!
//! `transition` is pure: it looks at a node and an event and says what
//! should happen. The controller applies the effects through the store.

use crate::error::ApiError;
use crate::model::NodeState;
use crate::model::ResourceNode;
use crate::model::Summary;
use crate::model::VersionSummary;

/// Something that happened to a node.
#[derive(Debug)]
pub enum Event {
    /// The user clicked the node.
    Toggle,
    /// The UI asked for the node to be collapsed, loading or not.
    Collapse,
    FetchSucceeded(Vec<Summary>),
    FetchFailed(ApiError),
}

/// Work the controller must do in response to an event.
#[derive(Debug)]
pub enum Effect {
    /// Claim the fetch guard and, if granted, load the children.
    BeginFetch,
    /// Show cached children without fetching.
    ExpandCached,
    Collapse,
    /// Hand the version to the selection emitter.
    Select(VersionSummary),
    CommitChildren(Vec<Summary>),
    CommitError(ApiError),
}

/// Decides the effects of `event` on `node`.
///
/// | state      | cached | toggle effect |
/// |------------|--------|---------------|
/// | Collapsed  | no     | BeginFetch    |
/// | Collapsed  | yes    | ExpandCached  |
/// | Loading    | -      | none          |
/// | Expanded   | yes    | Collapse      |
/// | Error      | no     | BeginFetch    |
///
/// Versions always select on toggle.
pub fn transition(node: &ResourceNode, event: Event) -> Vec<Effect> {
    match event {
        Event::Toggle => toggle(node),
        Event::Collapse if node.is_leaf() => vec![],
        Event::Collapse => vec![Effect::Collapse],
        Event::FetchSucceeded(children) => vec![Effect::CommitChildren(children)],
        Event::FetchFailed(error) => vec![Effect::CommitError(error)],
    }
}

fn toggle(node: &ResourceNode) -> Vec<Effect> {
    if node.is_leaf() {
        return node
            .version
            .iter()
            .cloned()
            .map(Effect::Select)
            .collect();
    }
    match &node.state {
        NodeState::Loading => vec![],
        NodeState::Expanded => vec![Effect::Collapse],
        NodeState::Collapsed | NodeState::Error(_) if node.has_cached_children() => {
            vec![Effect::ExpandCached]
        }
        NodeState::Collapsed | NodeState::Error(_) => vec![Effect::BeginFetch],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Children;
    use crate::model::NodeId;
    use crate::model::NodeKind;
    use crate::model::VersionAttributes;

    fn node(kind: NodeKind, state: NodeState, children: Children) -> ResourceNode {
        ResourceNode {
            id: NodeId(0),
            remote_id: "r".to_string(),
            kind,
            display_name: "r".to_string(),
            parent_id: None,
            children,
            state,
            version: None,
        }
    }

    #[test]
    fn test_collapsed_without_cache_fetches() {
        let n = node(NodeKind::Folder, NodeState::Collapsed, Children::Unloaded);
        assert!(matches!(transition(&n, Event::Toggle)[..], [Effect::BeginFetch]));
    }

    #[test]
    fn test_collapsed_with_cache_reuses_it() {
        let n = node(NodeKind::Folder, NodeState::Collapsed, Children::Loaded(vec![]));
        assert!(matches!(transition(&n, Event::Toggle)[..], [Effect::ExpandCached]));
    }

    #[test]
    fn test_loading_ignores_toggle() {
        let n = node(NodeKind::Hub, NodeState::Loading, Children::Unloaded);
        assert!(transition(&n, Event::Toggle).is_empty());
    }

    #[test]
    fn test_expanded_collapses() {
        let n = node(NodeKind::Project, NodeState::Expanded, Children::Loaded(vec![]));
        assert!(matches!(transition(&n, Event::Toggle)[..], [Effect::Collapse]));
    }

    #[test]
    fn test_error_retries() {
        let n = node(
            NodeKind::Item,
            NodeState::Error("HTTP 503".to_string()),
            Children::Unloaded,
        );
        assert!(matches!(transition(&n, Event::Toggle)[..], [Effect::BeginFetch]));
    }

    #[test]
    fn test_version_toggle_selects() {
        let mut n = node(NodeKind::Version, NodeState::Collapsed, Children::Leaf);
        n.version = Some(VersionSummary {
            id: "v1".to_string(),
            attributes: VersionAttributes::default(),
        });
        let effects = transition(&n, Event::Toggle);
        assert!(matches!(&effects[..], [Effect::Select(v)] if v.id == "v1"));
        assert!(transition(&n, Event::Collapse).is_empty());
    }

    #[test]
    fn test_fetch_results_commit() {
        let n = node(NodeKind::Folder, NodeState::Loading, Children::Unloaded);
        assert!(matches!(
            transition(&n, Event::FetchSucceeded(vec![]))[..],
            [Effect::CommitChildren(_)]
        ));
        assert!(matches!(
            transition(&n, Event::FetchFailed(ApiError::http(500, "boom")))[..],
            [Effect::CommitError(_)]
        ));
    }
}
