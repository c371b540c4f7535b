use serde::{Deserialize, Serialize};

use crate::hierarchy::{HierarchyTree, NodeId, NodeKind};

/// Displayed checkbox state for a segment or category, derived on demand
/// from descendant item selection. Never cached: recomputing from the leaf
/// flags removes the stale-aggregate class of bugs entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    Checked,
    Unchecked,
    Indeterminate,
}

impl HierarchyTree {
    /// Flips the node's selection and records that the user chose it
    /// directly. For segments and categories the new value cascades to every
    /// descendant that has not itself been toggled directly, so a broad
    /// select-all never clobbers a deliberate earlier deselection.
    pub fn toggle_selection(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else { return };
        let new_value = !node.selected;
        let kind = node.kind;

        {
            let node = self.node_mut(id).expect("node checked above");
            node.selected = new_value;
            node.selection_is_explicit = true;
        }

        if kind == NodeKind::Item {
            return;
        }

        let mut stack: Vec<NodeId> =
            self.node(id).map(|node| node.children.clone()).unwrap_or_default();
        while let Some(next) = stack.pop() {
            let Some(child) = self.node_mut(next) else { continue };
            if !child.selection_is_explicit {
                child.selected = new_value;
            }
            let grandchildren = child.children.clone();
            stack.extend(grandchildren);
        }
    }

    /// Tri-state aggregation over descendant items: all selected, none
    /// selected, or mixed. An item node reports its own flag; an ancestor
    /// with no items at all reads as unchecked.
    pub fn aggregate_check_state(&self, id: NodeId) -> CheckState {
        let Some(node) = self.node(id) else { return CheckState::Unchecked };
        if node.kind == NodeKind::Item {
            return if node.selected { CheckState::Checked } else { CheckState::Unchecked };
        }

        let items = self.descendant_items(id);
        if items.is_empty() {
            return CheckState::Unchecked;
        }
        let selected = items
            .iter()
            .filter(|item| self.node(**item).map(|node| node.selected).unwrap_or(false))
            .count();
        if selected == 0 {
            CheckState::Unchecked
        } else if selected == items.len() {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }
}
