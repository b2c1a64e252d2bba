// Core structs: Offer, Source, OfferGroup, SearchQuery and error types
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Backend that produced an offer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    AutokontinentDb,
    MikadoDb,
    AutokontinentAnalog,
    MikadoAnalog,
    Autosputnik,
    Other(String),
}

impl Source {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "autokontinent_db" => Source::AutokontinentDb,
            "mikado_db" => Source::MikadoDb,
            "autokontinent_analog" => Source::AutokontinentAnalog,
            "mikado_analog" => Source::MikadoAnalog,
            "autosputnik" => Source::Autosputnik,
            _ => Source::Other(tag.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Source::AutokontinentDb => "autokontinent_db",
            Source::MikadoDb => "mikado_db",
            Source::AutokontinentAnalog => "autokontinent_analog",
            Source::MikadoAnalog => "mikado_analog",
            Source::Autosputnik => "autosputnik",
            Source::Other(tag) => tag,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// How an offer relates to the searched part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferKind {
    /// The part itself.
    Main,
    /// A replacement part stocked in a regular warehouse.
    Analog,
    /// A replacement part shipped from a third-party or transit warehouse.
    Transit,
}

impl OfferKind {
    pub fn classify(is_analog: bool, warehouse: &str) -> Self {
        if !is_analog {
            return OfferKind::Main;
        }
        let warehouse = warehouse.to_lowercase();
        if warehouse.contains("сторон") || warehouse.contains("транзит") {
            OfferKind::Transit
        } else {
            OfferKind::Analog
        }
    }
}

/// One supplier's sellable line for a part, in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offer {
    pub article: String,
    pub brand: String,
    pub brand_key: String,
    pub price: Option<f64>,
    pub availability: u32,
    pub source: Source,
    pub warehouse: String,
    pub authoritative: bool,
    pub kind: OfferKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Offer {
    pub fn in_stock(&self) -> bool {
        self.availability > 0
    }

    /// Price used for ordering; a missing price counts as zero.
    pub fn sort_price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

/// Offers sharing one (article, normalized brand) pair, split for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferGroup {
    pub articul: String,
    pub brand: String,
    pub display_brand: String,
    pub is_main: bool,
    pub visible: Vec<Offer>,
    pub hidden: Vec<Offer>,
    pub hidden_total: usize,
    pub hidden_shown: usize,
    /// Offers of each kind across the whole group, returned or not.
    pub kind_counts: KindCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub main: usize,
    pub analog: usize,
    pub transit: usize,
}

impl KindCounts {
    pub fn tally<'a>(offers: impl IntoIterator<Item = &'a Offer>) -> Self {
        let mut counts = Self::default();
        for offer in offers {
            match offer.kind {
                OfferKind::Main => counts.main += 1,
                OfferKind::Analog => counts.analog += 1,
                OfferKind::Transit => counts.transit += 1,
            }
        }
        counts
    }
}

impl OfferGroup {
    pub fn total(&self) -> usize {
        self.visible.len() + self.hidden_total
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub article: String,
    pub brand: Option<String>,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("offer entry is not an object (got {0})")]
    NotAnObject(&'static str),

    #[error("offer entry could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("remote search error: {0}")]
    Remote(String),

    #[error("invalid payload from {source_name}: {reason}")]
    InvalidPayload { source_name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_tags_are_case_insensitive() {
        assert_eq!(Source::from_tag("AutoKontinent_DB"), Source::AutokontinentDb);
        assert_eq!(Source::from_tag(" mikado_db "), Source::MikadoDb);
        assert_eq!(Source::from_tag("abcp"), Source::Other("abcp".into()));
    }

    #[test]
    fn source_serializes_as_tag() {
        let json = serde_json::to_string(&Source::Autosputnik).unwrap();
        assert_eq!(json, "\"autosputnik\"");
        let other = serde_json::to_string(&Source::Other("vinttop".into())).unwrap();
        assert_eq!(other, "\"vinttop\"");
    }

    #[test]
    fn kind_depends_on_analog_flag_and_warehouse() {
        assert_eq!(OfferKind::classify(false, "Сторонний склад"), OfferKind::Main);
        assert_eq!(OfferKind::classify(true, "СПб Север"), OfferKind::Analog);
        assert_eq!(OfferKind::classify(true, "Сторонний склад"), OfferKind::Transit);
        assert_eq!(OfferKind::classify(true, "ТРАНЗИТ"), OfferKind::Transit);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&OfferKind::Transit).unwrap();
        assert_eq!(json, "\"transit\"");
    }
}
