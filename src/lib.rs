pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::default_sources;
pub use config::SearchConfig;
pub use core::{aggregator::JobSearchService, cache::SearchCache};
pub use domain::model::{
    AggregateResult, CandidateProfile, Listing, Region, ResumeAnalysis, ResumeDocument,
    SearchRequest, SourceOutcome, SourceResult,
};
pub use domain::services::{analyze_resume, filter_jobs, generate_search_keywords};
pub use utils::error::{Result, SearchError};
