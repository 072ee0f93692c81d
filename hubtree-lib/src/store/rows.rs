//! Flattening the tree into renderable rows

use super::TreeStore;
use crate::model::NodeId;

/// A node as it appears in a flat, top-to-bottom listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: NodeId,
    /// Zero for hubs.
    pub depth: usize,
}

impl TreeStore {
    /// Pre-order listing of every visible node.
    ///
    /// Children are included only under expanded nodes; cached children of
    /// collapsed nodes stay hidden.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        for &root in self.roots() {
            self.push_visible(root, 0, &mut rows);
        }
        rows
    }

    fn push_visible(&self, id: NodeId, depth: usize, rows: &mut Vec<VisibleRow>) {
        let Ok(node) = self.get_node(id) else { return };
        rows.push(VisibleRow { id, depth });
        if node.state.is_expanded() {
            for &child in node.children.ids() {
                self.push_visible(child, depth + 1, rows);
            }
        }
    }
}
