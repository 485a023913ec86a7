pub mod otlas;

pub use otlas::{FetchOutcome, OtlasClient, SearchFetcher};
