pub mod fetcher;
pub mod traits;

pub use fetcher::{decode_payload, UnifiedSearchSource};
pub use traits::{OfferSource, StaticSource};

use crate::config::SourceConfig;
use crate::model::{SearchQuery, SourceError};
use futures::future::join_all;
use serde_json::Value;
use tracing::{info, warn};

/// Builds one HTTP source per configured endpoint.
pub fn build_sources(configs: &[SourceConfig]) -> Result<Vec<Box<dyn OfferSource>>, SourceError> {
    configs
        .iter()
        .map(|cfg| UnifiedSearchSource::new(cfg).map(|s| Box::new(s) as Box<dyn OfferSource>))
        .collect()
}

/// Queries every source concurrently and concatenates their records in source order.
///
/// A failing source is logged and contributes nothing.
pub async fn fetch_all(sources: &[Box<dyn OfferSource>], query: &SearchQuery) -> Vec<Value> {
    let results = join_all(sources.iter().map(|s| s.fetch(query))).await;

    let mut records = Vec::new();
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(batch) => {
                info!("{}: {} records", source.name(), batch.len());
                records.extend(batch);
            }
            Err(e) => warn!("{} failed: {}", source.name(), e),
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingSource;

    #[async_trait::async_trait]
    impl OfferSource for FailingSource {
        fn name(&self) -> &str {
            "broken"
        }

        async fn fetch(&self, _query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
            Err(SourceError::Remote("maintenance".into()))
        }
    }

    fn query() -> SearchQuery {
        SearchQuery {
            article: "C15300".into(),
            brand: Some("MANN-FILTER".into()),
        }
    }

    #[tokio::test]
    async fn failing_source_is_skipped() {
        let sources: Vec<Box<dyn OfferSource>> = vec![
            Box::new(StaticSource::new("local", vec![json!({"article": "C15300"})])),
            Box::new(FailingSource),
            Box::new(StaticSource::new("remote", vec![json!({"article": "W7195"})])),
        ];
        let records = fetch_all(&sources, &query()).await;
        assert_eq!(
            records,
            vec![json!({"article": "C15300"}), json!({"article": "W7195"})]
        );
    }

    #[tokio::test]
    async fn no_sources_no_records() {
        let records = fetch_all(&[], &query()).await;
        assert!(records.is_empty());
    }

    #[test]
    fn build_sources_keeps_config_order() {
        let configs = vec![
            SourceConfig {
                name: "a".into(),
                url: "http://localhost:1/search".into(),
                tag: None,
                timeout_seconds: 1,
            },
            SourceConfig {
                name: "b".into(),
                url: "http://localhost:2/search".into(),
                tag: None,
                timeout_seconds: 1,
            },
        ];
        let sources = build_sources(&configs).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
