//! Apartment domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Host the derived-flag and resident normalization rules.
//!
//! # Invariants
//! - Every record is identified by a caller-chosen, non-empty ID.
//! - Derived fields are computed here and nowhere else.

pub mod apartment;
pub mod rules;
