//! Core use-case services.
//!
//! # Responsibility
//! - Run validation before persistence so callers cannot skip it.
//! - Keep HTTP layers decoupled from repository details.

pub mod project_service;
