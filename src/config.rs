use crate::errors::ConfigError;
use crate::reports::DEFAULT_TOP_K;
use crate::scoring::{validate_scoring, ScoringConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "insights.toml";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Data file; falls back to the loader's candidate paths when unset
    pub data: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub top_k: usize,
    pub preview_rows: usize,
    pub scoring: ScoringConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: None,
            out_dir: PathBuf::from("."),
            top_k: DEFAULT_TOP_K,
            preview_rows: 5,
            scoring: ScoringConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        validate_scoring(&self.scoring).map_err(ConfigError::InvalidScoring)
    }
}

/// Load configuration from a TOML file.
///
/// An explicit path must exist. Without one, `insights.toml` in the working
/// directory is used when present, otherwise the defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(AppConfig::default());
            }
            default
        }
    };

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Failed to parse config: invalid TOML in {}", config_path.display()))
}

pub fn parse_config(content: &str) -> Result<AppConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
data = "data/companies.csv"
out_dir = "reports"
top_k = 3
preview_rows = 8

[scoring]
email_weight = 10
recognized_keywords = ["freight"]
max_score = 50
"#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.data, Some(PathBuf::from("data/companies.csv")));
        assert_eq!(config.out_dir, PathBuf::from("reports"));
        assert_eq!(config.top_k, 3);
        assert_eq!(config.preview_rows, 8);
        assert_eq!(config.scoring.email_weight, 10);
        assert_eq!(config.scoring.phone_weight, 30);
        assert_eq!(config.scoring.max_score, 50);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(parse_config("theme = \"dark\"\n").is_err());
    }

    #[test]
    fn test_validate_reports_scoring_errors() {
        let config = parse_config("[scoring]\nmin_score = 90\nmax_score = 10\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidScoring(ref e)) if e.len() == 1));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let config = parse_config("top_k = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTopK)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "top_k = 4").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.top_k, 4);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
