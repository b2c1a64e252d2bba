use crate::config::RankingConfig;
use crate::model::Offer;

/// How many ranked offers a group shows up front and behind "show more".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisclosureLimits {
    pub main_visible: usize,
    pub analog_visible: usize,
    pub hidden: usize,
}

impl DisclosureLimits {
    pub fn from_config(cfg: &RankingConfig) -> Self {
        Self {
            main_visible: cfg.main_visible_limit,
            analog_visible: cfg.analog_visible_limit,
            hidden: cfg.hidden_limit,
        }
    }

    pub fn visible_for(&self, is_main: bool) -> usize {
        if is_main { self.main_visible } else { self.analog_visible }
    }
}

impl Default for DisclosureLimits {
    fn default() -> Self {
        Self::from_config(&RankingConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Disclosure {
    pub visible: Vec<Offer>,
    pub hidden: Vec<Offer>,
    /// Offers after the visible slice, including those not returned.
    pub hidden_total: usize,
}

/// Splits already ranked offers into visible and capped hidden slices.
pub fn split(ranked: Vec<Offer>, visible_limit: usize, hidden_limit: usize) -> Disclosure {
    let mut visible = ranked;
    let mut hidden = if visible.len() > visible_limit {
        visible.split_off(visible_limit)
    } else {
        Vec::new()
    };
    let hidden_total = hidden.len();
    hidden.truncate(hidden_limit);
    Disclosure {
        visible,
        hidden,
        hidden_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OfferKind, Source};
    use serde_json::Map;

    fn offers(n: usize) -> Vec<Offer> {
        (0..n)
            .map(|i| Offer {
                article: "OC47".into(),
                brand: "Knecht".into(),
                brand_key: "knecht/mahle".into(),
                price: Some(i as f64),
                availability: 1,
                source: Source::MikadoDb,
                warehouse: format!("wh-{i}"),
                authoritative: false,
                kind: OfferKind::Main,
                name: None,
                delivery_time: None,
                delivery_date: None,
                unit: None,
                extra: Map::new(),
            })
            .collect()
    }

    #[test]
    fn short_list_is_all_visible() {
        let d = split(offers(2), 3, 10);
        assert_eq!(d.visible.len(), 2);
        assert!(d.hidden.is_empty());
        assert_eq!(d.hidden_total, 0);
    }

    #[test]
    fn long_list_caps_hidden_but_counts_everything() {
        let d = split(offers(20), 5, 10);
        assert_eq!(d.visible.len(), 5);
        assert_eq!(d.hidden.len(), 10);
        assert_eq!(d.hidden_total, 15);
        assert_eq!(d.visible[4].warehouse, "wh-4");
        assert_eq!(d.hidden[0].warehouse, "wh-5");
    }

    #[test]
    fn limits_depend_on_main_flag() {
        let limits = DisclosureLimits::default();
        assert_eq!(limits.visible_for(true), 5);
        assert_eq!(limits.visible_for(false), 3);
        assert_eq!(limits.hidden, 10);
    }
}
