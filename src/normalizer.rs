//! Ingestion boundary: loosely typed supplier records in, canonical [`Offer`]s out.
//!
//! Supplier backends disagree on field shapes (`brand` as a string or as an
//! object with a `name`, prices as numbers or strings, stock under
//! `availability` or `quantity`). Every accepted shape is decoded here once,
//! so the ranking code only ever sees [`Offer`].

use crate::model::{IngestError, Offer, OfferKind, Source};
use crate::utils::{compact_key, parse_delivery_date, parse_quantity};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Built-in spelling variants, `(variant, canonical)`.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("mann", "mann-filter"),
    ("mann filter", "mann-filter"),
    ("mahle", "knecht/mahle"),
    ("knecht", "knecht/mahle"),
    ("mahle original", "knecht/mahle"),
    ("mahle knecht", "knecht/mahle"),
    ("zimmermann", "otto zimmermann"),
    ("victor reinz", "reinz"),
    ("febi bilstein", "febi"),
    ("citroën", "citroen/peugeot"),
    ("citroen", "citroen/peugeot"),
    ("peugeot", "citroen/peugeot"),
    ("fiat", "fiat/alfa/lancia"),
    ("kia hyundai", "hyundai/kia"),
    ("hyundai", "hyundai/kia"),
    ("kia", "hyundai/kia"),
    ("zf russia", "zf parts"),
    ("1-56 maruichi", "1-56"),
    ("acdelco", "ac delco"),
    ("ava quality cooling", "ava"),
    ("basbug", "bsg"),
    ("chinaspare", "china"),
    ("delta", "delta autotechnik"),
    ("doctorwax", "doctor wax"),
    ("dpgroup", "dp group"),
    ("halla", "hcc"),
    ("hanon", "hanon systems"),
    ("japanparts", "japan parts"),
    ("kyb", "kayaba"),
    ("lemförder", "lemforder"),
    ("lesjöfors", "lesjofors"),
    ("magtechnic", "mag"),
    ("malò", "malo"),
    ("meat & doria", "meat doria"),
    ("mensan", "asp"),
    ("mercedes-benz", "mercedes"),
    ("mk kashiyama", "kashiyama"),
    ("nevsky filter", "невский фильтр"),
    ("phc valeo", "valeo phc"),
    ("pro parts sweden ab", "proparts"),
    ("r&a", "hwaseung r&a"),
    ("reach cooling", "reach"),
    ("rheinol", "swd rheinol"),
    ("roadhouse", "road house"),
    ("s.h", "sh auto parts"),
    ("sangsin brake", "sangsin"),
    ("sct germany", "sct"),
    ("startvolt", "стартвольт"),
    ("teikoku piston ring", "tp"),
    ("vmp", "vmpauto"),
];

/// Compact alias keys shorter than this only match exactly, so `"S.H"`
/// does not swallow a plain `"SH"`.
const MIN_COMPACT_ALIAS: usize = 3;

/// Read-only mapping from brand spelling variants to one canonical key.
///
/// Lookups ignore case, surrounding whitespace and punctuation, so
/// `"MANN-FILTER"`, `"mann filter"` and `"Mann"` all resolve to `"mann-filter"`.
/// Variants whose letters and digits are fewer than three characters
/// (`"S.H"`, `"R&A"`) match only their exact lowercase spelling.
///
/// Unknown brands resolve to their lowercase words joined by single spaces,
/// so `"Meyle-HD"` and `"meyle  hd"` both become `"meyle hd"`.
#[derive(Debug, Clone)]
pub struct BrandAliases {
    exact: HashMap<String, String>,
    by_compact: HashMap<String, String>,
}

impl BrandAliases {
    pub fn empty() -> Self {
        Self {
            exact: HashMap::new(),
            by_compact: HashMap::new(),
        }
    }

    /// The built-in table with `extra` variants merged on top.
    pub fn with_extra<'a, I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut aliases = Self::default();
        for (variant, canonical) in extra {
            aliases.insert(variant, canonical);
        }
        aliases
    }

    pub fn insert(&mut self, variant: &str, canonical: &str) {
        let canonical = canonical.trim().to_lowercase();
        let variant = variant.trim().to_lowercase();
        if variant.is_empty() || canonical.is_empty() {
            return;
        }
        for spelling in [canonical.clone(), variant] {
            let compact = compact_key(&spelling);
            if compact.chars().count() >= MIN_COMPACT_ALIAS {
                self.by_compact.insert(compact, canonical.clone());
            }
            self.exact.insert(spelling, canonical.clone());
        }
    }

    pub fn normalize(&self, brand: &str) -> String {
        let trimmed = brand.trim().to_lowercase();
        if trimmed.is_empty() {
            return trimmed;
        }
        if let Some(canonical) = self.exact.get(&trimmed) {
            return canonical.clone();
        }
        match self.by_compact.get(&compact_key(&trimmed)) {
            Some(canonical) => canonical.clone(),
            None => word_key(&trimmed),
        }
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

impl Default for BrandAliases {
    fn default() -> Self {
        let mut aliases = Self::empty();
        for (variant, canonical) in BUILTIN_ALIASES {
            aliases.insert(variant, canonical);
        }
        aliases
    }
}

fn word_key(brand: &str) -> String {
    let words: Vec<&str> = brand
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        brand.to_string()
    } else {
        words.join(" ")
    }
}

/// `brand` as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BrandField {
    Plain(String),
    Named(Map<String, Value>),
    Unknown(Value),
}

impl BrandField {
    fn into_name(self) -> String {
        match self {
            BrandField::Plain(name) => name.trim().to_string(),
            BrandField::Named(fields) => match fields.get("name") {
                Some(Value::String(name)) => name.trim().to_string(),
                Some(Value::Number(n)) => n.to_string(),
                _ => String::new(),
            },
            BrandField::Unknown(_) => String::new(),
        }
    }
}

/// A scalar that suppliers send either as a JSON number or as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text.trim().to_string(),
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
            Scalar::Number(n) => n.to_string(),
            Scalar::Other(_) => String::new(),
        }
    }

    fn as_price(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) if n.is_finite() => Some(*n),
            Scalar::Text(text) => text
                .trim()
                .replace(' ', "")
                .replace(',', ".")
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite()),
            _ => None,
        }
    }

    fn as_quantity(&self) -> Option<u32> {
        match self {
            Scalar::Number(n) if n.is_finite() => Some(n.max(0.0).min(u32::MAX as f64) as u32),
            Scalar::Text(text) => parse_quantity(text),
            _ => None,
        }
    }
}

/// A boolean flag; suppliers use `true`, `1` and `"yes"` interchangeably.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Number(f64),
    Text(String),
    Other(Value),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Number(n) => *n != 0.0,
            Flag::Text(text) => matches!(
                text.trim().to_lowercase().as_str(),
                "true" | "1" | "yes" | "да"
            ),
            Flag::Other(_) => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawOffer {
    articul: Option<Scalar>,
    article: Option<Scalar>,
    brand: Option<BrandField>,
    price: Option<Scalar>,
    availability: Option<Scalar>,
    quantity: Option<Scalar>,
    source: Option<Scalar>,
    warehouse: Option<Scalar>,
    price_name: Option<Scalar>,
    our: Option<Flag>,
    analog: Option<Flag>,
    name: Option<Scalar>,
    delivery_time: Option<Scalar>,
    delivery_day: Option<Scalar>,
    delivery_date: Option<Scalar>,
    unit: Option<Scalar>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decodes one wire record into a canonical [`Offer`].
///
/// # Errors
///
/// Returns [`IngestError::NotAnObject`] when `value` is not a JSON object.
pub fn normalize_offer(
    value: &Value,
    aliases: &BrandAliases,
    today: NaiveDate,
) -> Result<Offer, IngestError> {
    if !value.is_object() {
        return Err(IngestError::NotAnObject(json_kind(value)));
    }
    let raw = RawOffer::deserialize(value)?;

    // `articul` wins over `article` when both are present and non-empty.
    let article = raw
        .articul
        .map(Scalar::into_text)
        .filter(|a| !a.is_empty())
        .or_else(|| raw.article.map(Scalar::into_text))
        .unwrap_or_default();

    let brand = raw.brand.map(BrandField::into_name).unwrap_or_default();
    let brand_key = aliases.normalize(&brand);

    let availability = raw
        .availability
        .as_ref()
        .and_then(Scalar::as_quantity)
        .or_else(|| raw.quantity.as_ref().and_then(Scalar::as_quantity))
        .unwrap_or(0);

    // Sputnik records name the warehouse `price_name` and the delivery label `delivery_day`.
    let warehouse = raw
        .warehouse
        .map(Scalar::into_text)
        .and_then(non_empty)
        .or_else(|| raw.price_name.map(Scalar::into_text).and_then(non_empty))
        .unwrap_or_default();
    let delivery_time = raw
        .delivery_time
        .map(Scalar::into_text)
        .and_then(non_empty)
        .or_else(|| raw.delivery_day.map(Scalar::into_text).and_then(non_empty));
    let delivery_date = raw
        .delivery_date
        .map(Scalar::into_text)
        .and_then(|d| parse_delivery_date(&d, today))
        .or_else(|| {
            delivery_time
                .as_deref()
                .and_then(|t| parse_delivery_date(t, today))
        });

    Ok(Offer {
        article,
        brand,
        brand_key,
        price: raw.price.as_ref().and_then(Scalar::as_price),
        availability,
        source: Source::from_tag(&raw.source.map(Scalar::into_text).unwrap_or_default()),
        kind: OfferKind::classify(raw.analog.as_ref().is_some_and(Flag::is_set), &warehouse),
        warehouse,
        authoritative: raw.our.as_ref().is_some_and(Flag::is_set),
        name: raw.name.map(Scalar::into_text).and_then(non_empty),
        delivery_time,
        delivery_date,
        unit: raw.unit.map(Scalar::into_text).and_then(non_empty),
        extra: raw.extra,
    })
}

/// Decodes every record, skipping (and logging) the ones that are not offers.
pub fn normalize_all(values: &[Value], aliases: &BrandAliases) -> Vec<Offer> {
    let today = Local::now().date_naive();
    let mut offers = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        match normalize_offer(value, aliases, today) {
            Ok(offer) => offers.push(offer),
            Err(e) => warn!("Skipping offer #{}: {}", idx, e),
        }
    }
    debug!("Normalized {} of {} offer records", offers.len(), values.len());
    offers
}
