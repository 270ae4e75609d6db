//! Repository layer over the document store.
//!
//! # Responsibility
//! - Translate project use-cases into document collection calls.
//! - Report every failure to an injected observer.
//!
//! # Invariants
//! - Repository calls never panic on store or decode failures.
//! - Typed APIs return semantic errors (`NotFound`, `InvalidId`) in addition
//!   to store transport errors; the boolean/`Option` APIs collapse them.

pub mod observer;
pub mod project_repo;
