//! Failure observers for repository calls.
//!
//! The repository does not reach for a process-wide sink on its own; it is
//! handed an observer. `LogObserver` forwards to the `log` facade.

use crate::repo::project_repo::RepoError;
use log::{error, warn};

/// Repository operation a failure was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepoOperation {
    GetProject,
    GetProjects,
    InsertProject,
    UpdateProject,
    DeleteProject,
}

impl RepoOperation {
    /// Stable `event=` name used in log lines.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::GetProject => "project_get",
            Self::GetProjects => "project_list",
            Self::InsertProject => "project_insert",
            Self::UpdateProject => "project_update",
            Self::DeleteProject => "project_delete",
        }
    }
}

/// Receives repository failures.
pub trait RepoObserver {
    fn report(&self, operation: RepoOperation, error: &RepoError);
}

impl<T: RepoObserver + ?Sized> RepoObserver for &T {
    fn report(&self, operation: RepoOperation, error: &RepoError) {
        (**self).report(operation, error);
    }
}

/// Default observer writing `event=... module=repo status=...` lines.
///
/// Malformed ids and missing documents are caller-side conditions and log
/// at `warn`; store and decode failures log at `error`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RepoObserver for LogObserver {
    fn report(&self, operation: RepoOperation, err: &RepoError) {
        match err {
            RepoError::InvalidId(_) | RepoError::NotFound(_) => warn!(
                "event={} module=repo status={} error={}",
                operation.event_name(),
                err.status(),
                err
            ),
            RepoError::Store(_) | RepoError::Decode { .. } => error!(
                "event={} module=repo status={} error={}",
                operation.event_name(),
                err.status(),
                err
            ),
        }
    }
}
