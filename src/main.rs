use parts_offers::config::{load_config, AppConfig};
use parts_offers::model::{ConfigError, SearchQuery};
use parts_offers::supplier::{build_sources, decode_payload, fetch_all};
use parts_offers::Aggregator;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};

const DEFAULT_CONFIG: &str = "config.json";
const USAGE: &str = "usage: parts-offers <article> [brand] [--input <offers.json>] [--config <config.json>]";

struct Args {
    query: SearchQuery,
    input: Option<String>,
    config: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut input = None;
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" => input = Some(args.next().ok_or("--input needs a file path")?),
            "--config" => config = Some(args.next().ok_or("--config needs a file path")?),
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let article = positional.next().ok_or("missing article")?;
    let brand = positional.next().filter(|b| !b.trim().is_empty());
    if positional.next().is_some() {
        return Err("too many arguments".into());
    }

    Ok(Args {
        query: SearchQuery { article, brand },
        input,
        config,
    })
}

fn resolve_config(path: Option<&str>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG).exists() => load_config(DEFAULT_CONFIG),
        None => {
            info!("No {} found, using defaults", DEFAULT_CONFIG);
            Ok(AppConfig::default())
        }
    }
}

fn read_input(path: &str) -> Result<Vec<Value>, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    let payload: Value = serde_json::from_str(&content).map_err(|e| format!("{path}: {e}"))?;
    decode_payload(path, payload, None).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // Parse command line
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    // Load configuration from file
    let config = match resolve_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Collect offers from the input file or the configured sources
    let records = match args.input.as_deref() {
        Some(path) => match read_input(path) {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to read offers: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            if config.sources.is_empty() {
                warn!("No sources configured and no --input given");
            }
            let sources = match build_sources(&config.sources) {
                Ok(sources) => sources,
                Err(e) => {
                    error!("Failed to build sources: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            fetch_all(&sources, &args.query).await
        }
    };
    info!("Collected {} offer records", records.len());

    // Group and rank offers
    let aggregator = Aggregator::from_config(&config);
    let groups = aggregator.aggregate(&records, args.query.brand.as_deref());
    info!(
        "Built {} groups for {} ({} brand aliases)",
        groups.len(),
        args.query.article,
        aggregator.aliases().len()
    );

    // Print groups as JSON
    match serde_json::to_string_pretty(&groups) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize groups: {}", e);
            ExitCode::FAILURE
        }
    }
}
