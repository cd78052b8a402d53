//! Lead scoring and analytics over a business-directory CSV.
//!
//! The pipeline is a set of pure steps over an immutable [`types::Snapshot`]:
//! load ([`loader`]), score and filter ([`scoring`], [`filters`]), aggregate
//! ([`reports`]) and export ([`output`]).

pub mod config;
pub mod errors;
pub mod filters;
pub mod loader;
pub mod logging;
pub mod output;
pub mod reports;
pub mod scoring;
pub mod types;
pub mod util;
