//! Groups multi-supplier offers by (article, normalized brand) and ranks them
//! for display.

use crate::analyzer::{split, Bucket, DisclosureLimits, GroupOrder, OfferRanker};
use crate::config::AppConfig;
use crate::model::{KindCounts, Offer, OfferGroup};
use crate::normalizer::{normalize_all, BrandAliases};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Turns a flat offer list into ordered, display-ready groups.
///
/// Holds only read-only state, so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Aggregator {
    aliases: BrandAliases,
    ranker: OfferRanker,
    group_order: GroupOrder,
    limits: DisclosureLimits,
}

impl Aggregator {
    pub fn new(
        aliases: BrandAliases,
        ranker: OfferRanker,
        group_order: GroupOrder,
        limits: DisclosureLimits,
    ) -> Self {
        Self {
            aliases,
            ranker,
            group_order,
            limits,
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        let aliases = BrandAliases::with_extra(
            cfg.brand_aliases
                .iter()
                .map(|(variant, canonical)| (variant.as_str(), canonical.as_str())),
        );
        Self::new(
            aliases,
            OfferRanker::from_config(&cfg.ranking),
            GroupOrder::default(),
            DisclosureLimits::from_config(&cfg.ranking),
        )
    }

    pub fn aliases(&self) -> &BrandAliases {
        &self.aliases
    }

    /// Decodes raw supplier records and aggregates them.
    ///
    /// Records that are not JSON objects are skipped and logged.
    pub fn aggregate(&self, records: &[Value], search_brand: Option<&str>) -> Vec<OfferGroup> {
        let offers = normalize_all(records, &self.aliases);
        self.aggregate_offers(offers, search_brand)
    }

    /// Aggregates offers that are already in canonical form.
    ///
    /// Brand keys are recomputed with this aggregator's alias table so they
    /// agree with the normalized search brand.
    pub fn aggregate_offers(&self, offers: Vec<Offer>, search_brand: Option<&str>) -> Vec<OfferGroup> {
        let main_key = search_brand
            .map(|b| self.aliases.normalize(b))
            .filter(|k| !k.is_empty());

        let mut buckets: Vec<Bucket> = Vec::new();
        let mut index: HashMap<(String, String), usize> = HashMap::new();
        for mut offer in offers {
            offer.brand_key = self.aliases.normalize(&offer.brand);
            let key = (offer.article.clone(), offer.brand_key.clone());
            let slot = *index.entry(key).or_insert_with(|| {
                let is_main = main_key.as_deref() == Some(offer.brand_key.as_str());
                buckets.push(Bucket::new(
                    offer.article.clone(),
                    offer.brand_key.clone(),
                    is_main,
                ));
                buckets.len() - 1
            });
            buckets[slot].offers.push(offer);
        }

        self.group_order.sort(&mut buckets);

        let groups: Vec<OfferGroup> = buckets
            .into_iter()
            .map(|bucket| self.finish_group(bucket))
            .collect();
        debug!(
            "Aggregated {} groups (search brand: {:?})",
            groups.len(),
            main_key
        );
        groups
    }

    fn finish_group(&self, mut bucket: Bucket) -> OfferGroup {
        let display_brand = bucket
            .offers
            .first()
            .map(|o| o.brand.clone())
            .unwrap_or_default();
        let kind_counts = KindCounts::tally(&bucket.offers);
        self.ranker.sort(&mut bucket.offers);
        let disclosure = split(
            bucket.offers,
            self.limits.visible_for(bucket.is_main),
            self.limits.hidden,
        );
        OfferGroup {
            articul: bucket.article,
            brand: bucket.brand_key,
            display_brand,
            is_main: bucket.is_main,
            hidden_shown: disclosure.hidden.len(),
            hidden_total: disclosure.hidden_total,
            visible: disclosure.visible,
            hidden: disclosure.hidden,
            kind_counts,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(
            BrandAliases::default(),
            OfferRanker::default(),
            GroupOrder::default(),
            DisclosureLimits::default(),
        )
    }
}

/// Aggregates raw records with the built-in alias table and default limits.
pub fn aggregate(records: &[Value], search_brand: Option<&str>) -> Vec<OfferGroup> {
    Aggregator::default().aggregate(records, search_brand)
}
