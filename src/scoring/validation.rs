use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.min_score > config.max_score {
        errors.push(format!(
            "scoring.min_score ({}) must not exceed scoring.max_score ({})",
            config.min_score, config.max_score
        ));
    }

    if config.keyword_weight > 0 && config.keyword_cap == 0 {
        errors.push("scoring.keyword_cap: must be at least 1 when keyword_weight is set".to_string());
    }

    if let Some(ref keywords) = config.recognized_keywords {
        for (i, keyword) in keywords.iter().enumerate() {
            if keyword.trim().is_empty() {
                errors.push(format!("scoring.recognized_keywords[{}]: empty keyword", i));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_inverted_bounds() {
        let config = ScoringConfig {
            min_score: 50,
            max_score: 10,
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("min_score"));
    }

    #[test]
    fn test_zero_cap_with_weight() {
        let config = ScoringConfig {
            keyword_cap: 0,
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("keyword_cap"));

        let unused = ScoringConfig {
            keyword_weight: 0,
            keyword_cap: 0,
            ..ScoringConfig::default()
        };
        assert!(validate_scoring(&unused).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            min_score: 200,
            keyword_cap: 0,
            recognized_keywords: Some(vec!["freight".to_string(), "  ".to_string()]),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[2].contains("recognized_keywords[1]"));
    }
}
