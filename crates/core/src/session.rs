use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{CategoryRecord, ItemRecord, SegmentRecord};
use crate::domain::line_item::ContractLineItem;
use crate::domain::rates::{EffectiveRate, RateField};
use crate::errors::{RateInputError, ResolutionWarning};
use crate::hierarchy::{HierarchyTree, NodeId};
use crate::selection::CheckState;
use crate::waterfall::{self, PricingResult};

/// One priced row of the editing grid: the item, its resolved rate with
/// provenance, and the recomputed waterfall.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricedLine {
    pub target_id: String,
    pub name: String,
    pub selected: bool,
    pub effective: EffectiveRate,
    pub pricing: PricingResult,
}

/// An interactive contract-editing session: the override tree plus the
/// warnings surfaced while seeding it.
///
/// Single-writer and synchronous by design. The session owns its tree, is
/// never shared across threads, and persists nothing until the caller takes
/// the flattened payload to the external endpoint. Closing the session
/// without saving simply drops the tree.
#[derive(Clone, Debug)]
pub struct PricingSession {
    tree: HierarchyTree,
    warnings: Vec<ResolutionWarning>,
}

impl PricingSession {
    pub fn open(
        segments: &[SegmentRecord],
        categories: &[CategoryRecord],
        items: &[ItemRecord],
        existing_line_items: &[ContractLineItem],
    ) -> Self {
        let (tree, warnings) = HierarchyTree::build(segments, categories, items, existing_line_items);
        Self { tree, warnings }
    }

    pub fn tree(&self) -> &HierarchyTree {
        &self.tree
    }

    /// Seed entries that referenced ids no longer in the catalog, for
    /// display. The tree itself built normally without them.
    pub fn warnings(&self) -> &[ResolutionWarning] {
        &self.warnings
    }

    pub fn find(
        &self,
        level: crate::domain::line_item::PricingLevel,
        target_id: &str,
    ) -> Option<NodeId> {
        self.tree.find(level, target_id)
    }

    pub fn toggle_selection(&mut self, id: NodeId) {
        self.tree.toggle_selection(id);
    }

    pub fn check_state(&self, id: NodeId) -> CheckState {
        self.tree.aggregate_check_state(id)
    }

    pub fn set_rate(
        &mut self,
        id: NodeId,
        field: RateField,
        value: Option<Decimal>,
    ) -> Result<(), RateInputError> {
        self.tree.set_explicit_rate(id, field, value)
    }

    /// Resolves and prices every item in the tree, selected or not. This is
    /// what the editing grid renders after each keystroke; resolution and
    /// the waterfall are cheap enough to run without debouncing.
    pub fn priced_lines(&self) -> Vec<PricedLine> {
        self.tree
            .items()
            .filter_map(|id| {
                let node = self.tree.node(id)?;
                let facts = node.facts.as_ref()?;
                let effective = self.tree.resolve(id)?;
                let pricing = waterfall::compute(facts, &effective);
                Some(PricedLine {
                    target_id: node.target_id.clone(),
                    name: node.name.clone(),
                    selected: node.selected,
                    effective,
                    pricing,
                })
            })
            .collect()
    }

    /// The save payload: resolved line items for every selected item. The
    /// caller hands this to the persistence endpoint, which replaces the
    /// contract's prior line items wholesale.
    pub fn flatten(&self) -> Vec<ContractLineItem> {
        waterfall::flatten(&self.tree)
    }
}
