//! Project use-case service.
//!
//! # Responsibility
//! - Provide "validate, then persist" entry points for callers.
//! - Stamp `date_created`/`date_modified` on writes.
//!
//! # Invariants
//! - Invalid projects never reach the repository.
//! - Saving keeps `id` and `date_created` as given by the caller.

use crate::model::project::{Project, ProjectId};
use crate::model::validation::ValidationSink;
use crate::repo::observer::{LogObserver, RepoObserver};
use crate::repo::project_repo::{ProjectRepository, ProjectScan, RepoResult};
use crate::store::DocumentCollection;
use chrono::Utc;
use log::info;

/// Use-case service wrapper around `ProjectRepository`.
pub struct ProjectService<C, O = LogObserver> {
    repo: ProjectRepository<C, O>,
}

impl<C: DocumentCollection, O: RepoObserver> ProjectService<C, O> {
    pub fn new(repo: ProjectRepository<C, O>) -> Self {
        Self { repo }
    }

    /// Validates `draft` and inserts it as a new project.
    ///
    /// # Contract
    /// - Returns `Ok(None)` when validation fails; violations are left in
    ///   `errors` and nothing is written.
    /// - On success both timestamps are set to now and the returned project
    ///   carries the store-assigned id.
    pub fn create_project<S>(&self, draft: &Project, errors: &mut S) -> RepoResult<Option<Project>>
    where
        S: ValidationSink + ?Sized,
    {
        if !draft.validate(errors) {
            return Ok(None);
        }

        let now = Utc::now();
        let mut project = draft.clone();
        project.date_created = now;
        project.date_modified = now;

        let stored = self.repo.insert_project(&project)?;
        info!(
            "event=project_create module=service status=ok id={}",
            stored.id
        );
        Ok(Some(stored))
    }

    /// Validates `project` and replaces the stored document.
    ///
    /// # Contract
    /// - Returns `Ok(None)` when validation fails.
    /// - Returns `RepoError::NotFound` when no document has `project.id`.
    /// - On success `date_modified` is set to now.
    pub fn save_project<S>(&self, project: &Project, errors: &mut S) -> RepoResult<Option<Project>>
    where
        S: ValidationSink + ?Sized,
    {
        if !project.validate(errors) {
            return Ok(None);
        }

        let mut updated = project.clone();
        updated.touch(Utc::now());
        self.repo.replace_project(&updated)?;
        Ok(Some(updated))
    }

    pub fn get_project(&self, id: &str) -> RepoResult<Project> {
        self.repo.find_project(id)
    }

    pub fn list_projects(&self) -> ProjectScan {
        self.repo.scan_projects()
    }

    pub fn delete_project(&self, id: &str) -> RepoResult<ProjectId> {
        let removed = self.repo.remove_project(id)?;
        info!("event=project_delete module=service status=ok id={removed}");
        Ok(removed)
    }
}
