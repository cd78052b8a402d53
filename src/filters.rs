use crate::errors::FilterError;
use crate::scoring::{compute_lead_score, ScoringConfig};
use crate::types::{CompanyRecord, LeadScore};
use crate::util::tokenize_keywords;
use log::warn;
use serde::Serialize;

/// A record paired with its lead score, borrowing from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredRecord<'a> {
    pub record: &'a CompanyRecord,
    pub score: LeadScore,
}

/// Filter values as typed by the user, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawFilter {
    pub cities: Vec<String>,
    pub services: Vec<String>,
    pub min_score: Option<String>,
    pub max_score: Option<String>,
}

/// Validated filter. Empty lists and `None` bounds mean "no filter" for that
/// dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterConfig {
    /// Exact city labels; missing cities match "Unknown".
    pub cities: Vec<String>,
    /// Service tags; a record passes when it carries any of them.
    pub services: Vec<String>,
    pub min_score: Option<LeadScore>,
    pub max_score: Option<LeadScore>,
}

impl FilterConfig {
    /// Build a usable filter, dropping every component that cannot be
    /// interpreted. The dropped components are returned alongside.
    pub fn from_raw(raw: &RawFilter) -> (FilterConfig, Vec<FilterError>) {
        let mut errors = Vec::new();

        let cities = raw
            .cities
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        let mut services: Vec<String> = Vec::new();
        for token in raw.services.iter().flat_map(|s| tokenize_keywords(s)) {
            if !services.contains(&token) {
                services.push(token);
            }
        }

        let mut min_score = parse_bound("min", raw.min_score.as_deref(), &mut errors);
        let mut max_score = parse_bound("max", raw.max_score.as_deref(), &mut errors);
        if let (Some(min), Some(max)) = (min_score, max_score) {
            if min > max {
                errors.push(FilterError::InvertedRange { min, max });
                min_score = None;
                max_score = None;
            }
        }

        for e in &errors {
            warn!("Ignoring filter: {}", e);
        }

        let config = FilterConfig {
            cities,
            services,
            min_score,
            max_score,
        };
        (config, errors)
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
            && self.services.is_empty()
            && self.min_score.is_none()
            && self.max_score.is_none()
    }

    pub fn matches(&self, scored: &ScoredRecord<'_>) -> bool {
        self.matches_city(scored.record)
            && self.matches_service(scored.record)
            && self.matches_score(scored.score)
    }

    fn matches_city(&self, record: &CompanyRecord) -> bool {
        self.cities.is_empty() || self.cities.iter().any(|c| c == record.city_label())
    }

    fn matches_service(&self, record: &CompanyRecord) -> bool {
        if self.services.is_empty() {
            return true;
        }
        record
            .keyword_tokens()
            .iter()
            .any(|t| self.services.contains(t))
    }

    fn matches_score(&self, score: LeadScore) -> bool {
        self.min_score.map_or(true, |min| score >= min)
            && self.max_score.map_or(true, |max| score <= max)
    }
}

fn parse_bound(
    bound: &'static str,
    value: Option<&str>,
    errors: &mut Vec<FilterError>,
) -> Option<LeadScore> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<LeadScore>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(FilterError::InvalidScoreBound {
                bound,
                value: value.to_string(),
            });
            None
        }
    }
}

/// Pair every record with its lead score, keeping input order.
pub fn score_records<'a>(records: &'a [CompanyRecord], config: &ScoringConfig) -> Vec<ScoredRecord<'a>> {
    records
        .iter()
        .map(|record| ScoredRecord {
            record,
            score: compute_lead_score(record, config),
        })
        .collect()
}

/// Records that pass every active filter dimension, in input order.
pub fn apply_filters<'a>(records: &[ScoredRecord<'a>], filter: &FilterConfig) -> Vec<ScoredRecord<'a>> {
    records.iter().filter(|s| filter.matches(s)).copied().collect()
}
