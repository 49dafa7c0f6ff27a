// src/config/mod.rs
use crate::aggregate::{Columns, YearTracking};
use serde::{Deserialize, Serialize};
use std::{env, fmt, fs, path::Path};

/// Which report to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Every permit, bars relative to the total.
    #[default]
    All,
    /// One permit type, bars relative to the busiest borough.
    ByType,
}

impl Variant {
    fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Variant::All),
            "by-type" | "bytype" | "type" => Some(Variant::ByType),
            _ => None,
        }
    }
}

fn tracking_from_str(s: &str) -> Option<YearTracking> {
    match s.trim().to_lowercase().as_str() {
        "sequential" => Some(YearTracking::Sequential),
        "corrected" => Some(YearTracking::Corrected),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
    File(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
            ConfigError::File(msg) => write!(f, "Config file error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Path or http(s) URL of the CSV
    pub source: String,
    /// Page destination; `-` writes plain text to stdout
    pub output: String,
    pub title: String,
    pub variant: Variant,
    /// Pin the permit type for `by-type`; random when unset
    pub permit_type: Option<String>,
    pub years: YearTracking,
    pub columns: Columns,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            source: "./data/Film_Permits.csv".into(),
            output: "index.html".into(),
            title: "NYC Film Permits".into(),
            variant: Variant::All,
            permit_type: None,
            years: YearTracking::Sequential,
            columns: Columns::default(),
        }
    }
}

impl ReportConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| ConfigError::File(format!("{}: {}", path.display(), e)))?;
        serde_yaml::from_str(&raw)
            .map_err(|e| ConfigError::File(format!("{}: {}", path.display(), e)))
    }

    /// Defaults, then the YAML file named by `FILM_PERMITS_CONFIG`, then the
    /// individual `FILM_PERMITS_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match env::var("FILM_PERMITS_CONFIG") {
            Ok(path) => Self::from_yaml_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("FILM_PERMITS_SOURCE") {
            self.source = v;
        }
        if let Some(v) = lookup("FILM_PERMITS_OUTPUT") {
            self.output = v;
        }
        if let Some(v) = lookup("FILM_PERMITS_VARIANT") {
            self.variant = Variant::from_str(&v).ok_or_else(|| {
                ConfigError::InvalidValue(format!("FILM_PERMITS_VARIANT={}", v))
            })?;
        }
        if let Some(v) = lookup("FILM_PERMITS_PERMIT_TYPE") {
            self.permit_type = Some(v);
        }
        if let Some(v) = lookup("FILM_PERMITS_YEARS") {
            self.years = tracking_from_str(&v)
                .ok_or_else(|| ConfigError::InvalidValue(format!("FILM_PERMITS_YEARS={}", v)))?;
        }
        Ok(self)
    }

    pub fn writes_to_stdout(&self) -> bool {
        self.output == "-"
    }
}
