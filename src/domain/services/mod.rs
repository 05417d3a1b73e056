pub mod analyzer;
pub mod filter;
pub mod keywords;
pub mod regions;

pub use analyzer::{analyze_resume, analyze_resume_at};
pub use filter::{filter_jobs, filter_jobs_with, FilterPolicy};
pub use keywords::generate_search_keywords;
pub use regions::{default_region_buckets, default_regions, select_top_matches, RegionBucket};
