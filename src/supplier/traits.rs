use crate::model::{SearchQuery, SourceError};
use serde_json::Value;

/// A backend that returns raw offer records for an article search.
#[async_trait::async_trait]
pub trait OfferSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Value>, SourceError>;
}

/// Fixed in-memory records, returned for every query.
pub struct StaticSource {
    name: String,
    records: Vec<Value>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, records: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

#[async_trait::async_trait]
impl OfferSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _query: &SearchQuery) -> Result<Vec<Value>, SourceError> {
        Ok(self.records.clone())
    }
}
