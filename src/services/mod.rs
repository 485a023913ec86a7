pub mod search;

pub use search::{CachedSearch, PipelineOutcome, SearchService, SkippedRecord};
