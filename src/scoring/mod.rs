pub mod config;
pub mod engine;
pub mod validation;

pub use config::{Factor, ScoringConfig};
pub use engine::{calculate_score, compute_lead_score, FactorContribution, ScoreResult};
pub use validation::validate_scoring;
