use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the company table. Fatal for the session.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// No explicit path was given and none of the candidates exist
    #[error("could not find data file (searched: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV (bad header row, invalid UTF-8 in headers, ...)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{0}' not found in header")]
    MissingColumn(String),

    #[error("column '{0}' appears more than once in header")]
    DuplicateColumn(String),

    /// Header decoded but not a single data row did
    #[error("none of the {rows} data rows could be decoded")]
    NoReadableRows { rows: usize },
}

/// A filter component that could not be used. Recovered by dropping that
/// dimension of the filter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("{bound} score bound '{value}' is not a non-negative integer")]
    InvalidScoreBound { bound: &'static str, value: String },

    #[error("score range {min}..={max} is inverted")]
    InvertedRange { min: u32, max: u32 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid scoring configuration:\n  - {}", .0.join("\n  - "))]
    InvalidScoring(Vec<String>),

    #[error("top_k must be at least 1")]
    ZeroTopK,
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_lists_candidates() {
        let err = DataLoadError::NotFound {
            searched: vec![PathBuf::from("data/companies.csv"), PathBuf::from("companies.csv")],
        };
        let msg = err.to_string();
        assert!(msg.contains("data/companies.csv"));
        assert!(msg.contains(", companies.csv"));
    }

    #[test]
    fn test_invalid_scoring_lists_every_problem() {
        let err = ConfigError::InvalidScoring(vec!["first".to_string(), "second".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains("- first"));
        assert!(msg.contains("- second"));
    }
}
