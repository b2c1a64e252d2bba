use crate::model::{ConfigError, Source};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

pub const DEFAULT_MAIN_VISIBLE: usize = 5;
pub const DEFAULT_ANALOG_VISIBLE: usize = 3;
pub const DEFAULT_HIDDEN: usize = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Offers shown up front for the group matching the searched brand.
    pub main_visible_limit: usize,
    /// Offers shown up front for every other group.
    pub analog_visible_limit: usize,
    /// Offers returned behind "show more".
    pub hidden_limit: usize,
    /// Source tags from most to least preferred; unlisted sources rank last.
    pub source_priority: Vec<String>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            main_visible_limit: DEFAULT_MAIN_VISIBLE,
            analog_visible_limit: DEFAULT_ANALOG_VISIBLE,
            hidden_limit: DEFAULT_HIDDEN,
            source_priority: [
                Source::AutokontinentDb,
                Source::MikadoDb,
                Source::AutokontinentAnalog,
                Source::MikadoAnalog,
                Source::Autosputnik,
            ]
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        }
    }
}

impl RankingConfig {
    pub fn sources(&self) -> Vec<Source> {
        self.source_priority
            .iter()
            .map(|tag| Source::from_tag(tag))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    /// Tag stamped on records that arrive without a `source` field.
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ranking: RankingConfig,
    /// Extra spelling variants, `variant -> canonical`, merged over the built-in table.
    pub brand_aliases: BTreeMap<String, String>,
    pub sources: Vec<SourceConfig>,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ranking.main_visible_limit == 0 || self.ranking.analog_visible_limit == 0 {
            return Err(ConfigError::Invalid(
                "visible limits must be greater than zero".into(),
            ));
        }
        for source in &self.sources {
            if source.url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "source '{}' has an empty url",
                    source.name
                )));
            }
            if source.timeout_seconds == 0 {
                return Err(ConfigError::Invalid(format!(
                    "source '{}' has a zero timeout",
                    source.name
                )));
            }
        }
        Ok(())
    }
}

pub fn parse_config(content: &str, path: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_config(&content, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = parse_config("{}", "inline").unwrap();
        assert_eq!(config.ranking.main_visible_limit, 5);
        assert_eq!(config.ranking.analog_visible_limit, 3);
        assert_eq!(config.ranking.hidden_limit, 10);
        assert_eq!(
            config.ranking.sources(),
            vec![
                Source::AutokontinentDb,
                Source::MikadoDb,
                Source::AutokontinentAnalog,
                Source::MikadoAnalog,
                Source::Autosputnik,
            ]
        );
        assert!(config.sources.is_empty());
    }

    #[test]
    fn partial_ranking_keeps_other_defaults() {
        let config = parse_config(
            r#"{
                "ranking": {"hidden_limit": 4},
                "brand_aliases": {"Sakura Filters": "sakura"},
                "sources": [{"name": "sputnik", "url": "http://localhost:8001/unified_search"}]
            }"#,
            "inline",
        )
        .unwrap();
        assert_eq!(config.ranking.hidden_limit, 4);
        assert_eq!(config.ranking.main_visible_limit, 5);
        assert_eq!(config.brand_aliases["Sakura Filters"], "sakura");
        assert_eq!(config.sources[0].timeout_seconds, 30);
        assert_eq!(config.sources[0].tag, None);
    }

    #[test]
    fn zero_visible_limit_is_rejected() {
        let err = parse_config(r#"{"ranking": {"analog_visible_limit": 0}}"#, "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn empty_source_url_is_rejected() {
        let err = parse_config(r#"{"sources": [{"name": "x", "url": " "}]}"#, "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_config("{", "broken.json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
