//! Text rendering of the visible tree

use std::fmt::Write;

use hubtree_lib::ToggleOutcome;
use hubtree_lib::TreeStore;
use hubtree_lib::error::FailureKind;
use hubtree_lib::model::NodeId;
use hubtree_lib::model::NodeState;
use hubtree_lib::model::ResourceNode;
use hubtree_lib::store::RootState;

/// A rendered screen and the node behind each numbered row.
#[derive(Debug, Default)]
pub struct Screen {
    pub text: String,
    pub rows: Vec<NodeId>,
}

fn marker(node: &ResourceNode) -> &'static str {
    if node.is_leaf() {
        return "*";
    }
    match node.state {
        NodeState::Collapsed => "+",
        NodeState::Loading => "~",
        NodeState::Expanded => "-",
        NodeState::Error(_) => "!",
    }
}

pub fn render(store: &TreeStore) -> Screen {
    let mut screen = Screen::default();

    match store.root_state() {
        RootState::Unloaded | RootState::Loading => {
            screen.text.push_str("loading hubs...\n");
            return screen;
        }
        RootState::Error(msg) => {
            let _ = writeln!(screen.text, "could not load hubs: {} (r to retry)", msg);
            return screen;
        }
        RootState::Ready => {}
    }

    let rows = store.visible_rows();
    if rows.is_empty() {
        screen.text.push_str("no hubs\n");
    }

    for (index, row) in rows.iter().enumerate() {
        let Ok(node) = store.get_node(row.id) else { continue };
        let _ = write!(
            screen.text,
            "{:>3} {}{} {}",
            index,
            "  ".repeat(row.depth),
            marker(node),
            node.display_name
        );
        if let Some(msg) = node.state.error_message() {
            let _ = write!(screen.text, "  [{}]", msg);
        } else if node.state.is_expanded() && node.children.ids().is_empty() {
            screen.text.push_str("  (empty)");
        }
        screen.text.push('\n');
        screen.rows.push(row.id);
    }
    screen
}

/// One-line report of a toggle, or `None` when the redraw says it all.
pub fn outcome(outcome: &ToggleOutcome) -> Option<String> {
    match outcome {
        ToggleOutcome::Failed { message, kind } => {
            let hint = match kind {
                FailureKind::Transient => "toggle again to retry",
                FailureKind::Permanent => "retry unlikely to help",
            };
            Some(format!("failed: {} ({})", message, hint))
        }
        ToggleOutcome::CachedCollapsed => Some("loaded in the background".to_string()),
        _ => None,
    }
}
