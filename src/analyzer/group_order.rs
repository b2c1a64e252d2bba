use crate::model::Offer;
use std::cmp::Ordering;

/// Offers collected under one (article, normalized brand) key, before ranking.
#[derive(Debug, Clone)]
pub struct Bucket {
    pub article: String,
    pub brand_key: String,
    pub is_main: bool,
    pub offers: Vec<Offer>,
}

impl Bucket {
    pub fn new(article: String, brand_key: String, is_main: bool) -> Self {
        Self {
            article,
            brand_key,
            is_main,
            offers: Vec::new(),
        }
    }

    pub fn has_authoritative(&self) -> bool {
        self.offers.iter().any(|o| o.authoritative)
    }
}

/// One tie-break tier of the group ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupTier {
    /// The group of the searched brand first.
    MainBrand,
    /// Groups holding a vendor's own listing next.
    HasAuthoritative,
    /// Alphabetical by normalized brand.
    BrandName,
}

impl GroupTier {
    pub fn compare(self, a: &Bucket, b: &Bucket) -> Ordering {
        match self {
            GroupTier::MainBrand => b.is_main.cmp(&a.is_main),
            GroupTier::HasAuthoritative => b.has_authoritative().cmp(&a.has_authoritative()),
            GroupTier::BrandName => a.brand_key.cmp(&b.brand_key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOrder {
    tiers: Vec<GroupTier>,
}

impl GroupOrder {
    pub fn new(tiers: Vec<GroupTier>) -> Self {
        Self { tiers }
    }

    pub fn compare(&self, a: &Bucket, b: &Bucket) -> Ordering {
        self.tiers
            .iter()
            .map(|tier| tier.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Stable sort: groups equal under every tier keep first-seen order.
    pub fn sort(&self, buckets: &mut [Bucket]) {
        buckets.sort_by(|a, b| self.compare(a, b));
    }
}

impl Default for GroupOrder {
    fn default() -> Self {
        Self::new(vec![
            GroupTier::MainBrand,
            GroupTier::HasAuthoritative,
            GroupTier::BrandName,
        ])
    }
}
