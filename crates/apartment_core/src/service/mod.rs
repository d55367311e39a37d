//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and transfer calls into use-case level APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod apartment_service;
