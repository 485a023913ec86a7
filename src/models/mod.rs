pub mod organization;
pub mod project;
pub mod raw;
pub mod response;

pub use organization::PartnerOrganization;
pub use project::ProjectOpportunity;
pub use raw::{RawRecord, RawValue};
pub use response::{SearchFilters, SearchKind, SearchRecords, SearchResponse};
