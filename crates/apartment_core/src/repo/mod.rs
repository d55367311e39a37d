//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store contract used by services and bulk transfer.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`Validation`, `InvalidData`)
//!   in addition to DB transport errors.

pub mod apartment_repo;
