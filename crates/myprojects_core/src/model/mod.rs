//! Domain model for the project store.
//!
//! # Responsibility
//! - Define the `Project` document and its field-level validation rules.
//! - Define the validation error collector shared with callers.
//!
//! # Invariants
//! - A project is identified by a store-generated `ProjectId`.
//! - Projects are replaced and deleted whole; there are no partial updates.

pub mod project;
pub mod validation;
