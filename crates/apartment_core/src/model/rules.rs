//! Derived-field rules shared by every write path.
//!
//! # Responsibility
//! - Compute the "owner is resident" flag from its two source fields.
//! - Normalize empty residents to the vacancy sentinel.
//!
//! # Invariants
//! - Both functions are pure; callers never persist a flag they did not get
//!   from `same_flag`.

/// Stored resident value for a unit without a resident.
pub const VACANT_RESIDENT: &str = "Vacant";

/// Returns whether the owner also lives in the unit.
///
/// An empty owner never matches, even against an empty resident.
pub fn same_flag(owner: &str, resident: &str) -> bool {
    !owner.is_empty() && owner == resident
}

/// Maps an empty resident to [`VACANT_RESIDENT`]; any other value is kept
/// verbatim (no trimming).
pub fn normalize_resident(resident: &str) -> String {
    if resident.is_empty() {
        VACANT_RESIDENT.to_string()
    } else {
        resident.to_string()
    }
}
