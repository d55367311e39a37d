//! Core domain logic for the apartment registry.
//! This crate is the single source of truth for record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod transfer;

pub use config::{BootstrapError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::apartment::{Apartment, ApartmentDraft, ApartmentId, ApartmentValidationError};
pub use model::rules::{normalize_resident, same_flag, VACANT_RESIDENT};
pub use repo::apartment_repo::{
    ApartmentRepository, RepoError, RepoResult, SqliteApartmentRepository,
};
pub use service::apartment_service::ApartmentService;
pub use transfer::{
    ExportSummary, ImportSummary, TransferError, TransferFormat, TransferResult, EXPORT_HEADER,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
