// Analyzer module: ordering and disclosure policies applied to grouped offers.

pub mod disclosure;
pub mod group_order;
pub mod offer_order;

pub use disclosure::{split, Disclosure, DisclosureLimits};
pub use group_order::{Bucket, GroupOrder, GroupTier};
pub use offer_order::{OfferRanker, OfferTier};
