//! Search pipeline for the SALTO-YOUTH Otlas partner-finding platform.
//!
//! Classifies a free-text query into a search kind, builds the platform's
//! query parameters, issues a rate-limited fetch, extracts structured
//! records from the returned markup, validates them, and hands back a
//! uniform [`models::SearchResponse`] envelope. Callers (CLI, server,
//! agent layers) consume that envelope as-is.

pub mod cache;
pub mod clients;
pub mod config;
pub mod constants;
pub mod extract;
pub mod intent;
pub mod models;
pub mod query;
pub mod services;
pub mod state;
pub mod validate;

pub use config::Config;
pub use models::{
    PartnerOrganization, ProjectOpportunity, SearchFilters, SearchKind, SearchResponse,
};
pub use services::SearchService;
pub use state::Session;

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. `RUST_LOG` wins over the
/// configured level when set.
pub fn init_tracing(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();
}
