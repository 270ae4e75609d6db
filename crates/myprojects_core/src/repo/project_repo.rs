//! Project repository over a document collection.
//!
//! # Responsibility
//! - Provide lookup, listing, insert, replace and delete for projects.
//! - Collapse failures to `Option`/`bool` for callers that only need a
//!   success signal, while keeping typed variants for callers that retry.
//!
//! # Invariants
//! - Malformed ids are rejected before the store is contacted.
//! - Replace never inserts: replacing an unknown id is `NotFound`.
//! - Listing skips undecodable documents and keeps scanning.
//! - Every failure is reported to the observer exactly once.

use crate::model::project::{Project, ProjectId};
use crate::repo::observer::{LogObserver, RepoObserver, RepoOperation};
use crate::store::{parse_document_id, DocumentCollection, RawDocument, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Collection name holding project documents.
pub const PROJECTS_COLLECTION: &str = "projects";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// Caller-supplied id text is not a store identifier.
    InvalidId(String),
    NotFound(ProjectId),
    Store(StoreError),
    /// A stored document does not decode as a `Project`.
    Decode {
        id: String,
        source: serde_json::Error,
    },
}

impl RepoError {
    /// Stable `status=` value used in log lines.
    pub fn status(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "invalid_id",
            Self::NotFound(_) => "not_found",
            Self::Store(_) => "store_error",
            Self::Decode { .. } => "decode_error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(input) => {
                write!(f, "invalid project id `{input}`: expected a hyphenated UUID")
            }
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Decode { id, source } => {
                write!(f, "failed to decode project document `{id}`: {source}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidId(_) => None,
            Self::NotFound(_) => None,
            Self::Store(err) => Some(err),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Result of a full-collection scan.
#[derive(Debug, Default)]
pub struct ProjectScan {
    /// Decoded projects in store iteration order.
    pub projects: Vec<Project>,
    /// Ids of documents that failed to decode and were skipped.
    pub skipped: Vec<String>,
    /// Error that cut the scan short, if any. `projects` still holds
    /// everything decoded before it.
    pub cursor_error: Option<RepoError>,
}

/// Project data access bound to one collection handle.
pub struct ProjectRepository<C, O = LogObserver> {
    collection: C,
    observer: O,
}

impl<C: DocumentCollection> ProjectRepository<C> {
    /// Creates a repository that reports failures through `log`.
    pub fn new(collection: C) -> Self {
        Self::with_observer(collection, LogObserver)
    }
}

impl<C: DocumentCollection, O: RepoObserver> ProjectRepository<C, O> {
    pub fn with_observer(collection: C, observer: O) -> Self {
        Self {
            collection,
            observer,
        }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Looks up one project by id text.
    ///
    /// Returns `None` for malformed ids, unknown ids and store failures
    /// alike; use [`Self::find_project`] to tell them apart.
    pub fn get_project(&self, id: &str) -> Option<Project> {
        self.find_project(id).ok()
    }

    /// Returns every project that decodes; never fails.
    pub fn get_projects(&self) -> Vec<Project> {
        self.scan_projects().projects
    }

    /// Replaces the stored document for `project.id`.
    ///
    /// Returns `true` only when a document matched and was replaced.
    pub fn update_project(&self, project: &Project) -> bool {
        self.replace_project(project).is_ok()
    }

    /// Deletes one project by id text; `true` iff a document was removed.
    pub fn delete_project(&self, id: &str) -> bool {
        self.remove_project(id).is_ok()
    }

    /// Typed lookup by id text.
    pub fn find_project(&self, id: &str) -> RepoResult<Project> {
        let result = parse_project_id(id).and_then(|id| self.load(id));
        self.observed(RepoOperation::GetProject, result)
    }

    /// Scans the whole collection, skipping documents that fail to decode.
    pub fn scan_projects(&self) -> ProjectScan {
        let mut scan = ProjectScan::default();

        let result = self.collection.scan(&mut |raw| match decode_project(&raw) {
            Ok(project) => scan.projects.push(project),
            Err(err) => {
                self.observer.report(RepoOperation::GetProjects, &err);
                scan.skipped.push(raw.id);
            }
        });

        if let Err(err) = result {
            let err = RepoError::from(err);
            self.observer.report(RepoOperation::GetProjects, &err);
            scan.cursor_error = Some(err);
        }

        scan
    }

    /// Inserts a new project and returns it with the store-assigned id.
    ///
    /// Any id already set on `project` is ignored.
    pub fn insert_project(&self, project: &Project) -> RepoResult<Project> {
        let result = self.insert(project);
        self.observed(RepoOperation::InsertProject, result)
    }

    /// Typed full-document replace keyed by `project.id`.
    pub fn replace_project(&self, project: &Project) -> RepoResult<()> {
        let result = self.replace(project);
        self.observed(RepoOperation::UpdateProject, result)
    }

    /// Typed delete by id text; returns the removed id.
    pub fn remove_project(&self, id: &str) -> RepoResult<ProjectId> {
        let result = parse_project_id(id).and_then(|id| self.remove(id));
        self.observed(RepoOperation::DeleteProject, result)
    }

    fn load(&self, id: ProjectId) -> RepoResult<Project> {
        match self.collection.find_one(id)? {
            Some(raw) => decode_project(&raw),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn insert(&self, project: &Project) -> RepoResult<Project> {
        let document = encode_project(project)?;
        let id = self.collection.insert_one(&document)?;

        let mut stored = project.clone();
        stored.id = id;
        Ok(stored)
    }

    fn replace(&self, project: &Project) -> RepoResult<()> {
        let document = encode_project(project)?;
        if !self.collection.replace_one(project.id, &document)? {
            return Err(RepoError::NotFound(project.id));
        }
        Ok(())
    }

    fn remove(&self, id: ProjectId) -> RepoResult<ProjectId> {
        if !self.collection.delete_one(id)? {
            return Err(RepoError::NotFound(id));
        }
        Ok(id)
    }

    fn observed<T>(&self, operation: RepoOperation, result: RepoResult<T>) -> RepoResult<T> {
        if let Err(err) = &result {
            self.observer.report(operation, err);
        }
        result
    }
}

/// Parses id text into a `ProjectId`.
pub fn parse_project_id(input: &str) -> RepoResult<ProjectId> {
    parse_document_id(input).ok_or_else(|| RepoError::InvalidId(input.to_string()))
}

fn decode_project(raw: &RawDocument) -> RepoResult<Project> {
    raw.decode().map_err(|source| RepoError::Decode {
        id: raw.id.clone(),
        source,
    })
}

fn encode_project(project: &Project) -> RepoResult<serde_json::Value> {
    serde_json::to_value(project).map_err(|err| RepoError::Store(StoreError::Encode(err)))
}
