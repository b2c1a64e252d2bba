use crate::config::RankingConfig;
use crate::model::{Offer, Source};
use std::cmp::Ordering;

/// One tie-break tier of the offer ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum OfferTier {
    /// Offers with stock before offers without.
    InStockFirst,
    /// Earlier sources in the list first; unlisted sources last.
    SourcePriority(Vec<Source>),
    /// Cheaper first; a missing price counts as zero.
    CheapestFirst,
}

impl OfferTier {
    pub fn compare(&self, a: &Offer, b: &Offer) -> Ordering {
        match self {
            OfferTier::InStockFirst => b.in_stock().cmp(&a.in_stock()),
            OfferTier::SourcePriority(order) => {
                source_rank(order, &a.source).cmp(&source_rank(order, &b.source))
            }
            OfferTier::CheapestFirst => a.sort_price().total_cmp(&b.sort_price()),
        }
    }
}

fn source_rank(order: &[Source], source: &Source) -> usize {
    order
        .iter()
        .position(|s| s == source)
        .unwrap_or(order.len())
}

/// Orders offers inside a group by applying its tiers in sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferRanker {
    tiers: Vec<OfferTier>,
}

impl OfferRanker {
    pub fn new(tiers: Vec<OfferTier>) -> Self {
        Self { tiers }
    }

    pub fn from_config(cfg: &RankingConfig) -> Self {
        Self::new(vec![
            OfferTier::InStockFirst,
            OfferTier::SourcePriority(cfg.sources()),
            OfferTier::CheapestFirst,
        ])
    }

    pub fn tiers(&self) -> &[OfferTier] {
        &self.tiers
    }

    pub fn compare(&self, a: &Offer, b: &Offer) -> Ordering {
        self.tiers
            .iter()
            .map(|tier| tier.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Stable sort: offers equal under every tier keep their input order.
    pub fn sort(&self, offers: &mut [Offer]) {
        offers.sort_by(|a, b| self.compare(a, b));
    }
}

impl Default for OfferRanker {
    fn default() -> Self {
        Self::from_config(&RankingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OfferKind;
    use serde_json::Map;

    fn offer(id: &str, availability: u32, source: Source, price: Option<f64>) -> Offer {
        Offer {
            article: "C15300".into(),
            brand: "Mann".into(),
            brand_key: "mann-filter".into(),
            price,
            availability,
            source,
            warehouse: id.into(),
            authoritative: false,
            kind: OfferKind::Main,
            name: None,
            delivery_time: None,
            delivery_date: None,
            unit: None,
            extra: Map::new(),
        }
    }

    fn warehouses(offers: &[Offer]) -> Vec<&str> {
        offers.iter().map(|o| o.warehouse.as_str()).collect()
    }

    #[test]
    fn stock_beats_source_and_price() {
        let mut offers = vec![
            offer("empty-best-source", 0, Source::AutokontinentDb, Some(1.0)),
            offer("stocked-unknown", 2, Source::Other("abcp".into()), Some(999.0)),
        ];
        OfferRanker::default().sort(&mut offers);
        assert_eq!(warehouses(&offers), ["stocked-unknown", "empty-best-source"]);
    }

    #[test]
    fn source_priority_then_price() {
        let mut offers = vec![
            offer("sputnik", 1, Source::Autosputnik, Some(10.0)),
            offer("unknown", 1, Source::Other("vinttop".into()), Some(1.0)),
            offer("mikado-analog", 1, Source::MikadoAnalog, Some(10.0)),
            offer("ak-analog", 1, Source::AutokontinentAnalog, Some(10.0)),
            offer("mikado", 1, Source::MikadoDb, Some(10.0)),
            offer("ak-expensive", 1, Source::AutokontinentDb, Some(20.0)),
            offer("ak-cheap", 1, Source::AutokontinentDb, Some(15.0)),
        ];
        OfferRanker::default().sort(&mut offers);
        assert_eq!(
            warehouses(&offers),
            [
                "ak-cheap",
                "ak-expensive",
                "mikado",
                "ak-analog",
                "mikado-analog",
                "sputnik",
                "unknown",
            ]
        );
    }

    #[test]
    fn missing_price_sorts_as_zero() {
        let mut offers = vec![
            offer("priced", 1, Source::MikadoDb, Some(0.5)),
            offer("unpriced", 1, Source::MikadoDb, None),
        ];
        OfferRanker::default().sort(&mut offers);
        assert_eq!(warehouses(&offers), ["unpriced", "priced"]);
    }

    #[test]
    fn full_ties_keep_insertion_order() {
        let mut offers = vec![
            offer("first", 3, Source::MikadoDb, Some(5.0)),
            offer("second", 7, Source::MikadoDb, Some(5.0)),
            offer("third", 1, Source::MikadoDb, Some(5.0)),
        ];
        OfferRanker::default().sort(&mut offers);
        assert_eq!(warehouses(&offers), ["first", "second", "third"]);
    }

    #[test]
    fn custom_tiers_compose() {
        let ranker = OfferRanker::new(vec![OfferTier::CheapestFirst]);
        let mut offers = vec![
            offer("in-stock", 5, Source::AutokontinentDb, Some(9.0)),
            offer("out-of-stock", 0, Source::Autosputnik, Some(3.0)),
        ];
        ranker.sort(&mut offers);
        assert_eq!(warehouses(&offers), ["out-of-stock", "in-stock"]);
    }
}
