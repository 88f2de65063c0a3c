//! Facetype application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Open the file-backed calibration store under the data directory
//! 4. Build the vocabulary trie off the async runtime
//! 5. Run the requested subcommand

mod cli;
mod replay;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use facetype_core::config::FacetypeConfig;
use facetype_engine::{FaceTypeEngine, LogFeedback, LogSpeaker};
use facetype_gesture::store::{load_calibration, save_calibration, try_load_calibration};
use facetype_gesture::{Calibration, FileStore, KeyValueStore};
use facetype_vocab::Dictionary;

use cli::{CliArgs, Command};

/// Expand a leading `~` in a configured directory.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

/// Load the dictionary on a blocking thread; the trie build walks every word.
async fn load_dictionary(config: &FacetypeConfig) -> Result<Dictionary, tokio::task::JoinError> {
    let path = config.vocabulary.dictionary_path.as_deref().map(resolve_data_dir);
    tokio::task::spawn_blocking(move || Dictionary::load_or_fallback(path.as_deref())).await
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing so its log level can seed the filter.
    let config_file = args.resolve_config_path();
    let loaded = FacetypeConfig::load(&config_file);
    let log_level = args
        .resolve_log_level()
        .or_else(|| loaded.as_ref().ok().map(|c| c.general.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Facetype v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) if config_file.exists() => {
            tracing::warn!(path = %config_file.display(), error = %e, "Invalid config, using defaults");
            FacetypeConfig::default()
        }
        Err(_) => {
            tracing::info!(path = %config_file.display(), "No config file, using defaults");
            FacetypeConfig::default()
        }
    };
    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }

    let data_dir = resolve_data_dir(&config.general.data_dir);
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&data_dir));
    tracing::debug!(path = %data_dir.display(), "Calibration store ready");

    match args.command {
        Command::Replay { input } => run_replay(&config, store, &input).await?,
        Command::Suggest { prefix, limit } => {
            let dictionary = load_dictionary(&config).await?;
            let limit = limit.unwrap_or(config.vocabulary.max_suggestions);
            for word in dictionary.trie().top_completions(&prefix, limit) {
                println!("{}", word);
            }
        }
        Command::Calibrate { channel, value } => {
            let floor = config.calibration.min_valid_max;
            let defaults = Calibration::from_config(&config.calibration);
            let mut calibration = load_calibration(store.as_ref(), &defaults, floor);
            let applied = calibration.set_max(channel, value, floor);
            save_calibration(store.as_ref(), &calibration)?;
            tracing::info!(channel = %channel, requested = value, applied, "Calibration saved");
            print_json(&calibration)?;
        }
        Command::ShowCalibration => match try_load_calibration(store.as_ref())? {
            Some(calibration) => print_json(&calibration)?,
            None => {
                tracing::info!("No stored calibration, showing defaults");
                print_json(&Calibration::from_config(&config.calibration))?;
            }
        },
    }

    Ok(())
}

async fn run_replay(
    config: &FacetypeConfig,
    store: Arc<dyn KeyValueStore>,
    input: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let dictionary = load_dictionary(config).await?;
    let mut engine = FaceTypeEngine::new(
        config,
        dictionary.trie(),
        store,
        Box::new(LogSpeaker),
        Box::new(LogFeedback),
    );

    let mut stdout = std::io::stdout();
    if input == Path::new("-") {
        let reader = tokio::io::BufReader::new(tokio::io::stdin());
        replay::replay(&mut engine, reader, &mut stdout).await?;
    } else {
        let file = tokio::fs::File::open(input).await?;
        replay::replay(&mut engine, tokio::io::BufReader::new(file), &mut stdout).await?;
    }

    print_json(engine.snapshot())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_passes_plain_paths_through() {
        assert_eq!(resolve_data_dir("/var/lib/facetype"), PathBuf::from("/var/lib/facetype"));
        assert_eq!(resolve_data_dir("data"), PathBuf::from("data"));
    }

    #[test]
    fn test_resolve_data_dir_expands_home() {
        let resolved = resolve_data_dir("~/.facetype/data");
        assert!(resolved.ends_with(".facetype/data"));
        assert!(!resolved.to_string_lossy().starts_with('~'));
    }
}
