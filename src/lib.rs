//! Multi-supplier auto-parts offer aggregation.
//!
//! Offers fetched from several backends are decoded into one canonical shape,
//! grouped by (article, normalized brand), ranked, and split into visible and
//! hidden slices for progressive disclosure.

pub mod aggregator;
pub mod analyzer;
pub mod config;
pub mod model;
pub mod normalizer;
pub mod supplier;
pub mod utils;

pub use aggregator::{aggregate, Aggregator};
pub use model::{Offer, OfferGroup, SearchQuery, Source};
pub use normalizer::BrandAliases;
