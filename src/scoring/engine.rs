use super::config::{Factor, ScoringConfig};
use crate::types::{CompanyRecord, LeadScore};
use crate::util::fold_key;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub factor: Factor,
    pub detail: String, // e.g. "present", "3 matched (cap 10)"
    pub points: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: LeadScore,
    /// Sum of contributions before clamping.
    pub raw: u64,
    pub factors: Vec<FactorContribution>,
}

/// Lead score of a single record. Depends only on the record and the config.
pub fn compute_lead_score(record: &CompanyRecord, config: &ScoringConfig) -> LeadScore {
    calculate_score(record, config).score
}

pub fn calculate_score(record: &CompanyRecord, config: &ScoringConfig) -> ScoreResult {
    let mut factors = Vec::with_capacity(Factor::ALL.len());

    for factor in Factor::ALL {
        let weight = config.weight(factor) as u64;
        let contribution = match factor {
            Factor::Email => presence(record.has_email(), weight),
            Factor::Phone => presence(record.has_phone(), weight),
            Factor::Website => presence(record.has_website(), weight),
            Factor::Keywords => {
                let matched = matched_keywords(record, config);
                let counted = matched.min(config.keyword_cap as usize) as u64;
                (
                    format!("{} matched (cap {})", matched, config.keyword_cap),
                    counted * weight,
                )
            }
        };
        factors.push(FactorContribution {
            factor,
            detail: contribution.0,
            points: contribution.1,
        });
    }

    let raw: u64 = factors.iter().map(|f| f.points).sum();
    ScoreResult {
        score: clamp_score(raw, config),
        raw,
        factors,
    }
}

fn presence(present: bool, weight: u64) -> (String, u64) {
    if present {
        ("present".to_string(), weight)
    } else {
        ("missing".to_string(), 0)
    }
}

/// Number of distinct service tags of the record that count for scoring.
fn matched_keywords(record: &CompanyRecord, config: &ScoringConfig) -> usize {
    let tokens: HashSet<String> = record.keyword_tokens().into_iter().collect();
    match &config.recognized_keywords {
        None => tokens.len(),
        Some(recognized) => {
            let recognized: HashSet<String> = recognized.iter().map(|k| fold_key(k)).collect();
            tokens.iter().filter(|t| recognized.contains(*t)).count()
        }
    }
}

/// Saturate into `min_score..=max_score`. An inverted range collapses to
/// `min_score`; `validate_scoring` rejects such configs up front.
fn clamp_score(raw: u64, config: &ScoringConfig) -> LeadScore {
    let min = config.min_score as u64;
    let max = (config.max_score as u64).max(min);
    raw.clamp(min, max) as LeadScore
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> CompanyRecord {
        CompanyRecord {
            name: "Acme".to_string(),
            city: Some("Paris".to_string()),
            phone: Some("+33 1 23 45 67 89".to_string()),
            email: Some("a@x.com".to_string()),
            website: Some("acme.example".to_string()),
            keywords: Some("freight, customs, warehousing".to_string()),
            contact: Some("J. Doe".to_string()),
        }
    }

    #[test]
    fn test_all_channels_default_weights() {
        let result = calculate_score(&full_record(), &ScoringConfig::default());
        // 40 + 30 + 20 + 3 keywords
        assert_eq!(result.raw, 93);
        assert_eq!(result.score, 93);
        assert_eq!(result.factors.len(), 4);
    }

    #[test]
    fn test_empty_record_scores_floor() {
        let record = CompanyRecord::named("Ghost");
        assert_eq!(compute_lead_score(&record, &ScoringConfig::default()), 0);

        let config = ScoringConfig {
            min_score: 5,
            ..ScoringConfig::default()
        };
        assert_eq!(compute_lead_score(&record, &config), 5);
    }

    #[test]
    fn test_score_saturates_at_max() {
        let config = ScoringConfig {
            email_weight: 90,
            phone_weight: 90,
            ..ScoringConfig::default()
        };
        assert_eq!(compute_lead_score(&full_record(), &config), 100);
    }

    #[test]
    fn test_keyword_cap_limits_contribution() {
        let mut record = CompanyRecord::named("Acme");
        record.keywords = Some("a, b, c, d, e".to_string());
        let config = ScoringConfig {
            keyword_weight: 5,
            keyword_cap: 2,
            ..ScoringConfig::default()
        };
        assert_eq!(compute_lead_score(&record, &config), 10);
    }

    #[test]
    fn test_duplicate_keywords_count_once() {
        let mut record = CompanyRecord::named("Acme");
        record.keywords = Some("Freight, freight ,FREIGHT".to_string());
        assert_eq!(compute_lead_score(&record, &ScoringConfig::default()), 1);
    }

    #[test]
    fn test_recognized_keywords_only() {
        let mut record = CompanyRecord::named("Acme");
        record.keywords = Some("Freight, bakery, Customs  Clearance".to_string());
        let config = ScoringConfig {
            keyword_weight: 10,
            recognized_keywords: Some(vec!["freight".to_string(), "customs clearance".to_string()]),
            ..ScoringConfig::default()
        };
        assert_eq!(compute_lead_score(&record, &config), 20);
    }

    #[test]
    fn test_score_ignores_non_scoring_fields() {
        let mut a = full_record();
        let mut b = full_record();
        a.city = None;
        a.contact = None;
        b.name = "Other".to_string();
        let config = ScoringConfig::default();
        assert_eq!(compute_lead_score(&a, &config), compute_lead_score(&b, &config));
    }

    #[test]
    fn test_breakdown_labels_missing_channels() {
        let mut record = CompanyRecord::named("Acme");
        record.phone = Some("0123".to_string());
        let result = calculate_score(&record, &ScoringConfig::default());
        let email = &result.factors[0];
        assert_eq!(email.factor, Factor::Email);
        assert_eq!(email.detail, "missing");
        assert_eq!(email.points, 0);
        assert_eq!(result.factors[1].points, 30);
    }
}
