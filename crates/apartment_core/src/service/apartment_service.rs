//! Apartment use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for presentation layers: single-record
//!   edits, positional browsing and file import/export.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - The service holds no edit state; callers pass `ApartmentDraft` values.

use crate::model::apartment::{Apartment, ApartmentDraft};
use crate::repo::apartment_repo::{ApartmentRepository, RepoResult};
use crate::transfer::{bulk_export, bulk_load, ExportSummary, ImportSummary, TransferResult};
use log::warn;
use std::path::Path;

/// Use-case service wrapper over an apartment repository.
pub struct ApartmentService<R: ApartmentRepository> {
    repo: R,
}

impl<R: ApartmentRepository> ApartmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates a form draft and stores it.
    ///
    /// # Contract
    /// - Empty `id` fails with `RepoError::Validation`; nothing is written.
    /// - Returns the normalized record as stored.
    pub fn save(&self, draft: &ApartmentDraft) -> RepoResult<Apartment> {
        let apartment = draft.to_apartment().inspect_err(|err| {
            warn!(
                "event=apartment_save module=service status=rejected error_code={}",
                err.code()
            );
        })?;
        self.repo.upsert(&apartment)?;
        Ok(apartment)
    }

    pub fn upsert(&self, apartment: &Apartment) -> RepoResult<()> {
        self.repo.upsert(apartment)
    }

    /// Deletes by ID. A missing ID is not an error.
    pub fn delete(&self, id: &str) -> RepoResult<bool> {
        self.repo.delete(id)
    }

    pub fn count(&self) -> RepoResult<u32> {
        self.repo.count()
    }

    /// Record at `index` in ascending-`id` order, for list widgets.
    pub fn get_by_position(&self, index: u32) -> RepoResult<Option<Apartment>> {
        self.repo.get_by_position(index)
    }

    pub fn get_by_id(&self, id: &str) -> RepoResult<Option<Apartment>> {
        self.repo.get_by_id(id)
    }

    pub fn list(&self) -> RepoResult<Vec<Apartment>> {
        self.repo.list_apartments()
    }

    /// Imports a `.csv`/`.xlsx` file in one transaction.
    pub fn import_file(&self, path: &Path) -> TransferResult<ImportSummary> {
        bulk_load(&self.repo, path)
    }

    /// Exports all records to a `.csv`/`.xlsx` file.
    pub fn export_file(&self, path: &Path) -> TransferResult<ExportSummary> {
        bulk_export(&self.repo, path)
    }
}
