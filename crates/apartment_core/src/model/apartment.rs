//! Apartment domain model.
//!
//! # Responsibility
//! - Define the canonical apartment record and its editable draft form.
//! - Keep derived fields out of caller control.
//!
//! # Invariants
//! - `id` is never empty.
//! - `resident` is never empty; empty input is stored as `Vacant`.
//! - `same_flag` always equals `rules::same_flag(owner, resident)`.

use crate::model::rules::{normalize_resident, same_flag};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-chosen apartment identifier, e.g. `"A-101"`.
pub type ApartmentId = String;

/// Validation failures raised before any persistence work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApartmentValidationError {
    EmptyId,
}

impl ApartmentValidationError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyId => "empty_id",
        }
    }
}

impl Display for ApartmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "apartment ID cannot be empty"),
        }
    }
}

impl Error for ApartmentValidationError {}

/// Stored apartment record.
///
/// Fields are private so the derived flag can only come from [`Apartment::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Apartment {
    id: ApartmentId,
    owner: String,
    resident: String,
    same_flag: bool,
}

impl Apartment {
    /// Builds a normalized record.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is empty.
    pub fn new(
        id: impl Into<ApartmentId>,
        owner: impl Into<String>,
        resident: &str,
    ) -> Result<Self, ApartmentValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ApartmentValidationError::EmptyId);
        }

        let owner = owner.into();
        let resident = normalize_resident(resident);
        let same_flag = same_flag(&owner, &resident);

        Ok(Self {
            id,
            owner,
            resident,
            same_flag,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn resident(&self) -> &str {
        &self.resident
    }

    /// Whether the owner is also the resident.
    pub fn same_flag(&self) -> bool {
        self.same_flag
    }
}

/// Unsaved form state for one apartment.
///
/// Presentation layers keep this value between calls instead of the core
/// holding a "currently edited" record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApartmentDraft {
    pub id: String,
    pub owner: String,
    pub resident: String,
}

impl ApartmentDraft {
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        resident: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            resident: resident.into(),
        }
    }

    /// Loads a stored record into an editable draft.
    pub fn from_apartment(apartment: &Apartment) -> Self {
        Self::new(apartment.id(), apartment.owner(), apartment.resident())
    }

    /// Flag the record would get if saved now.
    pub fn preview_same_flag(&self) -> bool {
        same_flag(&self.owner, &normalize_resident(&self.resident))
    }

    /// Resets every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Validates and normalizes the draft into a storable record.
    pub fn to_apartment(&self) -> Result<Apartment, ApartmentValidationError> {
        Apartment::new(self.id.as_str(), self.owner.as_str(), &self.resident)
    }
}

impl From<&Apartment> for ApartmentDraft {
    fn from(value: &Apartment) -> Self {
        Self::from_apartment(value)
    }
}
