// Copyright 2025 Cowboy AI, LLC.

//! Case-file configuration.
//!
//! Settings are read from a YAML file and then overridden by environment
//! variables. Every field has a default, so a missing file yields a usable
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{DomainError, DomainResult};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "casefile.yaml";
/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "CASEFILE_CONFIG";
/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "CASEFILE_LOG";
/// Override for the SJP minimum defendant age.
pub const SJP_MIN_AGE_ENV_VAR: &str = "CASEFILE_SJP_MIN_AGE";
/// Override for the SJP offence cap.
pub const SJP_MAX_OFFENCES_ENV_VAR: &str = "CASEFILE_SJP_MAX_OFFENCES";
/// Override for the group size cap.
pub const GROUP_MAX_CASES_ENV_VAR: &str = "CASEFILE_GROUP_MAX_CASES";
/// Override for the reference data cache capacity.
pub const CACHE_CAPACITY_ENV_VAR: &str = "CASEFILE_CACHE_CAPACITY";
/// Override for the reference data JSON file.
pub const REFERENCE_DATA_PATH_ENV_VAR: &str = "CASEFILE_REFERENCE_DATA";

/// Thresholds the rule catalogue reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Youngest age an SJP defendant may be on the date the case was received
    pub sjp_minimum_age: u32,
    /// Most offences one SJP defendant may face
    pub sjp_max_offences: usize,
    /// Most cases a group prosecution may hold
    pub group_max_cases: usize,
    /// Months after the offence within which a summary-only offence should be laid
    pub summary_time_limit_months: u32,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            sjp_minimum_age: 18,
            sjp_max_offences: 20,
            group_max_cases: 250,
            summary_time_limit_months: 6,
        }
    }
}

/// Where reference data comes from and how it is cached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceDataSettings {
    /// JSON document loaded into the in-memory store
    pub path: Option<PathBuf>,
    /// Entries per lookup kind in the LRU cache; zero disables caching
    pub cache_capacity: usize,
}

impl Default for ReferenceDataSettings {
    fn default() -> Self {
        Self {
            path: None,
            cache_capacity: 1024,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseFileConfig {
    /// Rule thresholds
    pub validation: ValidationSettings,
    /// Reference data source
    pub reference_data: ReferenceDataSettings,
}

impl CaseFileConfig {
    /// Load configuration.
    ///
    /// Sources, later overriding earlier:
    /// 1. built-in defaults
    /// 2. the file named by `path`, else by `CASEFILE_CONFIG`, else `casefile.yaml`
    ///    when present in the working directory
    /// 3. `CASEFILE_*` environment variables
    pub fn load(path: Option<&Path>) -> DomainResult<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a YAML file
    pub fn from_file(path: &Path) -> DomainResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::ConfigError(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "Loaded case-file configuration");
        Self::from_yaml(&content)
    }

    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> DomainResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply `CASEFILE_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> DomainResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_var(&lookup, SJP_MIN_AGE_ENV_VAR)? {
            self.validation.sjp_minimum_age = value;
        }
        if let Some(value) = parse_var(&lookup, SJP_MAX_OFFENCES_ENV_VAR)? {
            self.validation.sjp_max_offences = value;
        }
        if let Some(value) = parse_var(&lookup, GROUP_MAX_CASES_ENV_VAR)? {
            self.validation.group_max_cases = value;
        }
        if let Some(value) = parse_var(&lookup, CACHE_CAPACITY_ENV_VAR)? {
            self.reference_data.cache_capacity = value;
        }
        if let Some(path) = lookup(REFERENCE_DATA_PATH_ENV_VAR).filter(|p| !p.trim().is_empty()) {
            self.reference_data.path = Some(PathBuf::from(path));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> DomainResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|e| {
            warn!(key, value = %raw, "Invalid configuration override");
            DomainError::ConfigError(format!("{key}={raw}: {e}"))
        }),
    }
}
