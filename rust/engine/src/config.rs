//! Table configuration resolved from defaults, an optional TOML file and
//! environment overrides, in that order of precedence.
//!
//! | variable             | effect                          |
//! |----------------------|---------------------------------|
//! | `HOLDEM_CONFIG`      | path of a TOML file to read     |
//! | `HOLDEM_SMALL_BLIND` | overrides `small_blind`         |
//! | `HOLDEM_BIG_BLIND`   | overrides `big_blind`           |
//! | `HOLDEM_SEED`        | overrides `seed`                |

use std::fs;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub const CONFIG_ENV: &str = "HOLDEM_CONFIG";
pub const SMALL_BLIND_ENV: &str = "HOLDEM_SMALL_BLIND";
pub const BIG_BLIND_ENV: &str = "HOLDEM_BIG_BLIND";
pub const SEED_ENV: &str = "HOLDEM_SEED";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    pub small_blind: i64,
    pub big_blind: i64,
    /// Seed of the table's shuffling RNG
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: 20,
            big_blind: 50,
            seed: None,
        }
    }
}

impl TableConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let mut cfg = TableConfig::default();
        let file: FileConfig = toml::from_str(s)?;
        file.apply(&mut cfg, &mut ConfigSources::default());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Both blinds must be positive. A big blind below the small blind is
    /// unconventional but accepted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_blind <= 0 {
            return Err(ConfigError::Invalid("small_blind must be >0".into()));
        }
        if self.big_blind <= 0 {
            return Err(ConfigError::Invalid("big_blind must be >0".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub seed: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            seed: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: TableConfig,
    pub sources: ConfigSources,
}

pub fn load() -> Result<TableConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = TableConfig::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        f.apply(&mut cfg, &mut sources);
    }

    if let Some(v) = env_value(SMALL_BLIND_ENV)? {
        cfg.small_blind = v;
        sources.small_blind = ValueSource::Env;
    }
    if let Some(v) = env_value(BIG_BLIND_ENV)? {
        cfg.big_blind = v;
        sources.big_blind = ValueSource::Env;
    }
    if let Some(v) = env_value(SEED_ENV)? {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Env;
    }

    cfg.validate()?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_value<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) if !raw.is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{name} is not a valid number: {raw:?}"))),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    small_blind: Option<i64>,
    #[serde(default)]
    big_blind: Option<i64>,
    #[serde(default)]
    seed: Option<u64>,
}

impl FileConfig {
    fn apply(self, cfg: &mut TableConfig, sources: &mut ConfigSources) {
        if let Some(v) = self.small_blind {
            cfg.small_blind = v;
            sources.small_blind = ValueSource::File;
        }
        if let Some(v) = self.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = self.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
    }
}
