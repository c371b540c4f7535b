pub mod config;
pub mod domain;
pub mod errors;
pub mod hierarchy;
pub mod selection;
pub mod session;
pub mod waterfall;

#[cfg(test)]
pub(crate) mod testing;

pub use domain::catalog::{
    CategoryId, CategoryRecord, ItemId, ItemRecord, SegmentId, SegmentRecord,
};
pub use domain::line_item::{ContractLineItem, PricingLevel};
pub use domain::rates::{EffectiveRate, RateField, RateFlags, RateSet};
pub use errors::{RateInputError, ResolutionWarning};
pub use hierarchy::{HierarchyNode, HierarchyTree, ItemFacts, NodeId, NodeKind};
pub use selection::CheckState;
pub use session::{PricedLine, PricingSession};
pub use waterfall::{compute, flatten, PricingResult};
