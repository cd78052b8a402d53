use crate::types::LeadScore;
use serde::{Deserialize, Serialize};

/// The independent contributions to a lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    Email,
    Phone,
    Website,
    Keywords,
}

impl Factor {
    pub const ALL: [Factor; 4] = [Factor::Email, Factor::Phone, Factor::Website, Factor::Keywords];

    pub fn label(self) -> &'static str {
        match self {
            Factor::Email => "Email",
            Factor::Phone => "Phone",
            Factor::Website => "Website",
            Factor::Keywords => "Keywords",
        }
    }
}

/// Lead scoring weights.
///
/// Each contact channel adds its weight when present. Keywords add
/// `keyword_weight` per distinct recognized service tag, counting at most
/// `keyword_cap` tags. The sum saturates into `min_score..=max_score`.
///
/// Example TOML:
/// ```toml
/// [scoring]
/// email_weight = 40
/// phone_weight = 30
/// website_weight = 20
/// keyword_weight = 1
/// keyword_cap = 10
/// recognized_keywords = ["freight", "customs clearance"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub email_weight: u32,
    pub phone_weight: u32,
    pub website_weight: u32,
    pub keyword_weight: u32,
    pub keyword_cap: u32,

    /// Service tags that count towards the keyword factor. `None` means
    /// every tag counts. Matched case-insensitively against whole tokens.
    pub recognized_keywords: Option<Vec<String>>,

    pub min_score: LeadScore,
    pub max_score: LeadScore,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            email_weight: 40,
            phone_weight: 30,
            website_weight: 20,
            keyword_weight: 1,
            keyword_cap: 10,
            recognized_keywords: None,
            min_score: 0,
            max_score: 100,
        }
    }
}

impl ScoringConfig {
    pub fn weight(&self, factor: Factor) -> u32 {
        match factor {
            Factor::Email => self.email_weight,
            Factor::Phone => self.phone_weight,
            Factor::Website => self.website_weight,
            Factor::Keywords => self.keyword_weight,
        }
    }
}
