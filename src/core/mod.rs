pub mod aggregator;
pub mod cache;

pub use crate::domain::model::{AggregateResult, SearchRequest};
pub use crate::domain::ports::{JobSource, TimeProvider};
pub use crate::utils::error::Result;
