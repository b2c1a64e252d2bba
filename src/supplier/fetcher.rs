use crate::config::SourceConfig;
use crate::model::{SearchQuery, SourceError};
use crate::supplier::traits::OfferSource;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Queries a unified price-search endpoint: `GET <url>?article=..&brand=..`.
pub struct UnifiedSearchSource {
    client: Client,
    name: String,
    url: String,
    tag: Option<String>,
}

impl UnifiedSearchSource {
    pub fn new(cfg: &SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) PartsOffers/0.1")
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            name: cfg.name.clone(),
            url: cfg.url.clone(),
            tag: cfg.tag.clone(),
        })
    }
}

#[async_trait::async_trait]
impl OfferSource for UnifiedSearchSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
        let mut params = vec![("article", query.article.as_str())];
        if let Some(brand) = query.brand.as_deref() {
            params.push(("brand", brand));
        }

        info!("Querying {} for {}", self.name, query.article);
        let response = self.client.get(&self.url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let payload: Value = response.json().await?;
        let records = decode_payload(&self.name, payload, self.tag.as_deref())?;
        debug!("{} returned {} records", self.name, records.len());
        Ok(records)
    }
}

/// Extracts offer records from a search response.
///
/// Accepts `{"data": [...]}` or a bare array. Object records without a
/// `source` key get `tag` when one is given.
pub fn decode_payload(
    source_name: &str,
    payload: Value,
    tag: Option<&str>,
) -> Result<Vec<Value>, SourceError> {
    let mut records = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            if let Some(error) = map.get("error").filter(|e| !e.is_null()) {
                let message = match error {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                return Err(SourceError::Remote(message));
            }
            match map.remove("data") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) => Vec::new(),
                Some(other) => {
                    return Err(SourceError::InvalidPayload {
                        source_name: source_name.to_string(),
                        reason: format!("`data` is not an array: {other}"),
                    });
                }
                None => {
                    return Err(SourceError::InvalidPayload {
                        source_name: source_name.to_string(),
                        reason: "missing `data` field".into(),
                    });
                }
            }
        }
        other => {
            return Err(SourceError::InvalidPayload {
                source_name: source_name.to_string(),
                reason: format!("unexpected payload: {other}"),
            });
        }
    };

    if let Some(tag) = tag {
        for record in records.iter_mut() {
            if let Value::Object(map) = record {
                map.entry("source")
                    .or_insert_with(|| Value::String(tag.to_string()));
            }
        }
    }
    Ok(records)
}
