use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::ShotStatsError;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Shooting-habit statistics from photo EXIF metadata
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shot-stats",
    about = "Shooting-habit statistics from photo EXIF metadata",
    version
)]
pub struct Settings {
    /// Folder to scan recursively for photos (defaults to the last one used)
    pub folder: Option<PathBuf>,

    /// Directory that receives chart_data.json
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Report format printed to stdout
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Number of focal-length histogram bins (2-200)
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u32).range(2..=200))]
    pub bins: u32,

    /// Worker threads for reading metadata (0 = one per core)
    #[arg(long, default_value = "0")]
    pub jobs: usize,

    /// How many of the most common values to list per field
    #[arg(long, default_value = "5")]
    pub top: usize,

    /// Skip writing chart data to the output directory
    #[arg(long)]
    pub no_export: bool,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.shot-stats/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bins: Option<u32>,
}

impl LastUsedParams {
    /// Default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".shot-stats").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation: accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                warn!("Failed to clear {}: {}", config_path.display(), e);
            }
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if settings.folder.is_none() {
            settings.folder = last.folder;
        }
        if !is_arg_explicitly_set(&matches, "output_dir") {
            if let Some(v) = last.output_dir {
                settings.output_dir = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "bins") {
            if let Some(v) = last.bins {
                settings.bins = v;
            }
        }

        settings = Self::apply_debug_flag(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            warn!("Failed to save {}: {}", config_path.display(), e);
        }

        settings
    }

    /// The folder to analyse, either given on the command line or restored
    /// from the last run.
    pub fn require_folder(&self) -> crate::Result<&Path> {
        self.folder.as_deref().ok_or_else(|| {
            ShotStatsError::Config(
                "no photo folder given and none saved from a previous run".to_string(),
            )
        })
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            folder: s.folder.clone(),
            output_dir: Some(s.output_dir.clone()),
            format: Some(s.format.clone()),
            bins: Some(s.bins),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
