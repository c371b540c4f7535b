use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{CategoryRecord, ItemRecord, SegmentRecord};
use crate::domain::line_item::{ContractLineItem, PricingLevel};
use crate::domain::rates::{EffectiveRate, RateField, RateFlags, RateSet};
use crate::errors::{RateInputError, ResolutionWarning};

/// Index into the tree's node arena.
///
/// Nodes live in a flat `Vec` and refer to each other by index, never by
/// pointer. The three-level shape is fixed at build time, so an upward walk
/// is a bounded loop and cycles cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Segment,
    Category,
    Item,
}

impl NodeKind {
    pub fn pricing_level(self) -> PricingLevel {
        match self {
            NodeKind::Segment => PricingLevel::Segment,
            NodeKind::Category => PricingLevel::Category,
            NodeKind::Item => PricingLevel::Item,
        }
    }
}

/// Catalog attributes carried only by item nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemFacts {
    pub list_price: Decimal,
    pub cost: Decimal,
    pub eaches_per_unit_of_measure: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub kind: NodeKind,
    pub target_id: String,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Explicit overrides anchored at this node. Empty set means the node
    /// inherits everything.
    pub rates: RateSet,
    pub selected: bool,
    /// True once the user toggles this node directly. Cascades from an
    /// ancestor never overwrite an explicit choice.
    pub selection_is_explicit: bool,
    /// Present iff `kind == Item`.
    pub facts: Option<ItemFacts>,
    /// Display provenance for item fields edited in this session. Never
    /// consulted by `resolve`.
    pub dirty: RateFlags,
}

impl HierarchyNode {
    fn new(kind: NodeKind, target_id: String, name: String, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            target_id,
            name,
            parent,
            children: Vec::new(),
            rates: RateSet::default(),
            selected: false,
            selection_is_explicit: false,
            facts: None,
            dirty: RateFlags::default(),
        }
    }
}

/// The three-level rate override tree for one contract-editing session.
///
/// Built fresh from flat catalog lists when the session opens, mutated only
/// by user edits, and discarded after flatten-and-save. Nothing in here is
/// shared or persisted incrementally.
#[derive(Clone, Debug, Default)]
pub struct HierarchyTree {
    nodes: Vec<HierarchyNode>,
    roots: Vec<NodeId>,
    index: HashMap<(PricingLevel, String), NodeId>,
}

impl HierarchyTree {
    /// Builds the session tree from flat foreign-keyed catalog lists and
    /// re-seeds it from previously saved line items.
    ///
    /// Catalog rows with dangling foreign keys and saved entries whose
    /// referenced id is gone are skipped and reported; the rest of the tree
    /// still builds.
    pub fn build(
        segments: &[SegmentRecord],
        categories: &[CategoryRecord],
        items: &[ItemRecord],
        existing_line_items: &[ContractLineItem],
    ) -> (Self, Vec<ResolutionWarning>) {
        let mut tree = Self::default();
        let mut warnings = Vec::new();

        for segment in segments {
            let id = tree.push(HierarchyNode::new(
                NodeKind::Segment,
                segment.id.0.clone(),
                segment.name.clone(),
                None,
            ));
            tree.roots.push(id);
        }

        for category in categories {
            let Some(parent) = tree.find(PricingLevel::Segment, &category.segment_id.0) else {
                warnings.push(ResolutionWarning::new(
                    PricingLevel::Category,
                    category.id.0.clone(),
                    format!("category references missing segment {}", category.segment_id.0),
                ));
                continue;
            };
            let id = tree.push(HierarchyNode::new(
                NodeKind::Category,
                category.id.0.clone(),
                category.name.clone(),
                Some(parent),
            ));
            tree.nodes[parent.0].children.push(id);
        }

        for item in items {
            let Some(parent) = tree.find(PricingLevel::Category, &item.category_id.0) else {
                warnings.push(ResolutionWarning::new(
                    PricingLevel::Item,
                    item.id.0.clone(),
                    format!("item references missing category {}", item.category_id.0),
                ));
                continue;
            };
            let id = tree.push(HierarchyNode::new(
                NodeKind::Item,
                item.id.0.clone(),
                item.name.clone(),
                Some(parent),
            ));
            tree.nodes[id.0].facts = Some(ItemFacts {
                list_price: item.list_price,
                cost: item.cost,
                eaches_per_unit_of_measure: item.eaches_per_unit_of_measure,
            });
            tree.nodes[parent.0].children.push(id);
        }

        for line_item in existing_line_items {
            tree.seed_line_item(line_item, &mut warnings);
        }

        (tree, warnings)
    }

    fn push(&mut self, node: HierarchyNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.index.insert((node.kind.pricing_level(), node.target_id.clone()), id);
        self.nodes.push(node);
        id
    }

    fn seed_line_item(&mut self, line_item: &ContractLineItem, warnings: &mut Vec<ResolutionWarning>) {
        let Some(id) = self.find(line_item.pricing_level, &line_item.target_id) else {
            warnings.push(ResolutionWarning::new(
                line_item.pricing_level,
                line_item.target_id.clone(),
                "saved line item references an id no longer in the catalog",
            ));
            return;
        };

        for field in RateField::ALL {
            let Some(value) = line_item.rates.get(field) else { continue };
            if let Err(error) = self.set_explicit_rate(id, field, Some(value)) {
                warnings.push(ResolutionWarning::new(
                    line_item.pricing_level,
                    line_item.target_id.clone(),
                    format!("saved value dropped: {error}"),
                ));
            }
        }

        // Seeded selection reflects the stored contract, not an in-session
        // toggle, so the explicit flag stays clear and a later cascade may
        // still reach this node.
        self.nodes[id.0].selected = true;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut HierarchyNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn find(&self, level: PricingLevel, target_id: &str) -> Option<NodeId> {
        self.index.get(&(level, target_id.to_string())).copied()
    }

    /// All item nodes in build order.
    pub fn items(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.kind == NodeKind::Item)
            .map(|(index, _)| NodeId(index))
    }

    /// Item nodes at or below `id`, in build order.
    pub fn descendant_items(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.node(id) else { return Vec::new() };
        match node.kind {
            NodeKind::Item => vec![id],
            _ => {
                let mut items = Vec::new();
                let mut stack: Vec<NodeId> = node.children.iter().rev().copied().collect();
                while let Some(next) = stack.pop() {
                    let child = &self.nodes[next.0];
                    if child.kind == NodeKind::Item {
                        items.push(next);
                    } else {
                        stack.extend(child.children.iter().rev().copied());
                    }
                }
                items
            }
        }
    }

    /// Resolves the effective rate for an item by walking item → category →
    /// segment and taking the first explicit value per field. A field unset
    /// along the whole path resolves to zero and counts as inherited.
    ///
    /// Returns `None` for ids that are out of range or not item nodes.
    pub fn resolve(&self, item: NodeId) -> Option<EffectiveRate> {
        let node = self.node(item)?;
        if node.kind != NodeKind::Item {
            return None;
        }

        let mut path = vec![node];
        let mut cursor = node.parent;
        while let Some(parent) = cursor {
            let ancestor = &self.nodes[parent.0];
            path.push(ancestor);
            cursor = ancestor.parent;
        }

        let mut effective = EffectiveRate::default();
        for field in RateField::ALL {
            let winner = path
                .iter()
                .enumerate()
                .find_map(|(depth, node)| node.rates.get(field).map(|value| (depth, value)));
            match winner {
                Some((0, value)) => effective.set(field, value),
                Some((_, value)) => {
                    effective.set(field, value);
                    effective.inherited.set(field, true);
                }
                None => effective.inherited.set(field, true),
            }
        }

        Some(effective)
    }

    /// Sets or clears one explicit field on a node's own rate set.
    ///
    /// Out-of-range input is rejected and the prior value retained; the
    /// rejection is returned for display, never raised as a fatal error.
    /// Setting a field directly on an item marks it dirty for styling;
    /// clearing it returns the field to inherited display.
    pub fn set_explicit_rate(
        &mut self,
        id: NodeId,
        field: RateField,
        value: Option<Decimal>,
    ) -> Result<(), RateInputError> {
        if let Some(value) = value {
            if field.is_percentage() && !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&value) {
                return Err(RateInputError::PercentOutOfRange { field, value });
            }
            if !field.is_percentage() && value < Decimal::ZERO {
                return Err(RateInputError::NegativeQuantity { field, value });
            }
        }

        let node = self.node_mut(id).ok_or(RateInputError::UnknownNode)?;
        node.rates.set(field, value);
        if node.kind == NodeKind::Item {
            node.dirty.set(field, value.is_some());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{HierarchyTree, NodeKind};
    use crate::domain::line_item::{ContractLineItem, PricingLevel};
    use crate::domain::rates::{RateField, RateSet};
    use crate::errors::RateInputError;
    use crate::testing::{catalog_fixture, line_item};

    #[test]
    fn build_links_categories_and_items_to_their_parents() {
        let (segments, categories, items) = catalog_fixture();
        let (tree, warnings) = HierarchyTree::build(&segments, &categories, &items, &[]);

        assert!(warnings.is_empty());
        assert_eq!(tree.roots().len(), segments.len());

        let item = tree.find(PricingLevel::Item, "item-gauze-4x4").expect("item node");
        let node = tree.node(item).expect("node");
        assert_eq!(node.kind, NodeKind::Item);

        let category = node.parent.expect("category parent");
        assert_eq!(tree.node(category).expect("category").kind, NodeKind::Category);
        let segment = tree.node(category).expect("category").parent.expect("segment parent");
        assert_eq!(tree.node(segment).expect("segment").kind, NodeKind::Segment);
        assert!(tree.node(segment).expect("segment").parent.is_none());
    }

    #[test]
    fn dangling_saved_line_item_is_skipped_with_a_warning() {
        let (segments, categories, items) = catalog_fixture();
        let stale = line_item(PricingLevel::Category, "cat-deleted", |rates| {
            rates.discount_pct = Some(dec!(10));
        });

        let (tree, warnings) = HierarchyTree::build(&segments, &categories, &items, &[stale]);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].target_id, "cat-deleted");
        assert_eq!(warnings[0].level, PricingLevel::Category);
        // No node picked up the dropped override.
        for index in 0..tree.len() {
            let node = tree.node(super::NodeId(index)).expect("node");
            assert!(node.rates.is_empty());
            assert!(!node.selected);
        }
    }

    #[test]
    fn seeded_line_items_set_rates_and_selection() {
        let (segments, categories, items) = catalog_fixture();
        let saved = vec![
            line_item(PricingLevel::Segment, "seg-medical", |rates| {
                rates.rebate_pct = Some(dec!(8));
            }),
            line_item(PricingLevel::Item, "item-gauze-4x4", |rates| {
                rates.discount_pct = Some(dec!(12.5));
                rates.monthly_quantity_commitment = Some(dec!(500));
            }),
        ];

        let (tree, warnings) = HierarchyTree::build(&segments, &categories, &items, &saved);
        assert!(warnings.is_empty());

        let segment = tree.find(PricingLevel::Segment, "seg-medical").expect("segment");
        assert_eq!(tree.node(segment).expect("segment").rates.rebate_pct, Some(dec!(8)));
        assert!(tree.node(segment).expect("segment").selected);
        assert!(!tree.node(segment).expect("segment").selection_is_explicit);

        let item = tree.find(PricingLevel::Item, "item-gauze-4x4").expect("item");
        let node = tree.node(item).expect("item node");
        assert_eq!(node.rates.discount_pct, Some(dec!(12.5)));
        assert_eq!(node.rates.monthly_quantity_commitment, Some(dec!(500)));
        assert!(node.selected);
    }

    #[test]
    fn resolve_prefers_nearest_explicit_value_per_field() {
        let (segments, categories, items) = catalog_fixture();
        let saved = vec![
            line_item(PricingLevel::Segment, "seg-medical", |rates| {
                rates.rebate_pct = Some(dec!(8));
                rates.discount_pct = Some(dec!(5));
            }),
            line_item(PricingLevel::Category, "cat-wound-care", |rates| {
                rates.discount_pct = Some(dec!(15));
            }),
        ];
        let (tree, _) = HierarchyTree::build(&segments, &categories, &items, &saved);

        let item = tree.find(PricingLevel::Item, "item-gauze-4x4").expect("item");
        let effective = tree.resolve(item).expect("effective rate");

        // Category discount shadows the segment's; segment rebate wins for
        // the untouched field; everything else defaults to zero, inherited.
        assert_eq!(effective.discount_pct, dec!(15));
        assert_eq!(effective.rebate_pct, dec!(8));
        assert_eq!(effective.conditional_rebate_pct, Decimal::ZERO);
        assert_eq!(effective.growth_rebate_pct, Decimal::ZERO);
        assert_eq!(effective.monthly_quantity_commitment, Decimal::ZERO);
        assert!(effective.inherited.discount);
        assert!(effective.inherited.rebate);
        assert!(effective.inherited.conditional_rebate);
        assert!(effective.inherited.growth_rebate);
        assert!(effective.inherited.quantity_commitment);
    }

    #[test]
    fn resolve_marks_item_own_values_as_not_inherited() {
        let (segments, categories, items) = catalog_fixture();
        let (mut tree, _) = HierarchyTree::build(&segments, &categories, &items, &[]);

        let item = tree.find(PricingLevel::Item, "item-gauze-4x4").expect("item");
        tree.set_explicit_rate(item, RateField::Discount, Some(dec!(10))).expect("set discount");

        let effective = tree.resolve(item).expect("effective rate");
        assert_eq!(effective.discount_pct, dec!(10));
        assert!(!effective.inherited.discount);
        assert!(effective.inherited.rebate);
    }

    #[test]
    fn resolve_is_unaffected_by_sibling_edits() {
        let (segments, categories, items) = catalog_fixture();
        let (mut tree, _) = HierarchyTree::build(&segments, &categories, &items, &[]);

        let item = tree.find(PricingLevel::Item, "item-gauze-4x4").expect("item");
        let before = tree.resolve(item).expect("before");

        let sibling = tree.find(PricingLevel::Item, "item-gauze-2x2").expect("sibling");
        tree.set_explicit_rate(sibling, RateField::Discount, Some(dec!(50))).expect("set sibling");

        assert_eq!(tree.resolve(item).expect("after"), before);
    }

    #[test]
    fn out_of_range_input_is_rejected_and_prior_value_retained() {
        let (segments, categories, items) = catalog_fixture();
        let (mut tree, _) = HierarchyTree::build(&segments, &categories, &items, &[]);
        let item = tree.find(PricingLevel::Item, "item-gauze-4x4").expect("item");

        tree.set_explicit_rate(item, RateField::Discount, Some(dec!(20))).expect("valid set");

        let error = tree
            .set_explicit_rate(item, RateField::Discount, Some(dec!(120)))
            .expect_err("over 100 must be rejected");
        assert!(matches!(error, RateInputError::PercentOutOfRange { .. }));
        assert_eq!(tree.node(item).expect("item").rates.discount_pct, Some(dec!(20)));

        let error = tree
            .set_explicit_rate(item, RateField::QuantityCommitment, Some(dec!(-5)))
            .expect_err("negative quantity must be rejected");
        assert!(matches!(error, RateInputError::NegativeQuantity { .. }));
        assert_eq!(tree.node(item).expect("item").rates.monthly_quantity_commitment, None);
    }

    #[test]
    fn clearing_an_item_field_resets_its_dirty_flag() {
        let (segments, categories, items) = catalog_fixture();
        let (mut tree, _) = HierarchyTree::build(&segments, &categories, &items, &[]);
        let item = tree.find(PricingLevel::Item, "item-gauze-4x4").expect("item");

        tree.set_explicit_rate(item, RateField::Rebate, Some(dec!(3))).expect("set");
        assert!(tree.node(item).expect("item").dirty.rebate);

        tree.set_explicit_rate(item, RateField::Rebate, None).expect("clear");
        assert!(!tree.node(item).expect("item").dirty.rebate);
        assert_eq!(tree.node(item).expect("item").rates.rebate_pct, None);
    }

    #[test]
    fn seeding_with_invalid_saved_value_drops_only_that_field() {
        let (segments, categories, items) = catalog_fixture();
        let saved = vec![ContractLineItem::new(PricingLevel::Item, "item-gauze-4x4", RateSet {
            discount_pct: Some(dec!(150)),
            rebate_pct: Some(dec!(4)),
            ..RateSet::default()
        })];

        let (tree, warnings) = HierarchyTree::build(&segments, &categories, &items, &saved);

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].detail.contains("discount_pct"));

        let item = tree.find(PricingLevel::Item, "item-gauze-4x4").expect("item");
        let node = tree.node(item).expect("item node");
        assert_eq!(node.rates.discount_pct, None);
        assert_eq!(node.rates.rebate_pct, Some(dec!(4)));
        assert!(node.selected);
    }
}
