// Configuration loading and parsing (teamsynergy.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::synergy::recommend::RecommendationLimits;
use crate::synergy::strategy::StrategyKind;

/// File name of the single config file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "teamsynergy.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: String,
    pub catalog_path: String,
    pub limits: RecommendationLimits,
    /// Strategy key used by `suggest` when none is selected.
    pub default_strategy: String,
}

// ---------------------------------------------------------------------------
// teamsynergy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the whole file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    database: DatabaseSection,
    catalog: CatalogSection,
    #[serde(default)]
    recommendations: RecommendationLimits,
    #[serde(default)]
    strategy: StrategySection,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogSection {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StrategySection {
    #[serde(default = "default_strategy_key")]
    default: String,
}

impl Default for StrategySection {
    fn default() -> Self {
        StrategySection {
            default: default_strategy_key(),
        }
    }
}

fn default_strategy_key() -> String {
    "balanced".to_string()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate `config/teamsynergy.toml` under `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        db_path: file.database.path,
        catalog_path: file.catalog.path,
        limits: file.recommendations,
        default_strategy: file.strategy.default,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/teamsynergy.toml` from `defaults/` on first run.
///
/// Returns the created path, or `None` when the config file already exists.
/// An existing config file is never overwritten.
pub fn seed_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!(
            "no config/{CONFIG_FILE} and cannot read {}: {e}",
            source.display()
        ),
    })?;

    if let Some(config_dir) = target.parent() {
        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", config_dir.display()),
        })?;
    }

    // create_new so a file written concurrently is left alone.
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(Some(target))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Loads config relative to `base_dir`, seeding it from defaults first.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    seed_config_file(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Most reasons a single recommendation may carry.
const MAX_REASONS_CEILING: usize = 3;

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.db_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "database.path".into(),
            message: "must not be empty".into(),
        });
    }
    if config.catalog_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "catalog.path".into(),
            message: "must not be empty".into(),
        });
    }

    let limits = &config.limits;
    let limit_fields: &[(&str, usize)] = &[
        ("recommendations.reference_limit", limits.reference_limit),
        ("recommendations.strategy_limit", limits.strategy_limit),
        ("recommendations.max_reasons", limits.max_reasons),
        ("recommendations.max_tips", limits.max_tips),
        ("recommendations.max_warnings", limits.max_warnings),
    ];
    for (name, val) in limit_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be greater than 0".into(),
            });
        }
    }
    if limits.max_reasons > MAX_REASONS_CEILING {
        return Err(ConfigError::ValidationError {
            field: "recommendations.max_reasons".into(),
            message: format!(
                "must be at most {MAX_REASONS_CEILING}, got {}",
                limits.max_reasons
            ),
        });
    }

    if StrategyKind::from_key(&config.default_strategy).is_none() {
        return Err(ConfigError::ValidationError {
            field: "strategy.default".into(),
            message: format!(
                "unknown strategy '{}'; expected one of: {}",
                config.default_strategy,
                StrategyKind::KEYS.join(", ")
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
