//! Project document model.
//!
//! # Responsibility
//! - Define the canonical `Project` document and its wire field names.
//! - Enforce field-level constraints before writes (`Project::validate`).
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `date_created` is set once; `date_modified` moves on every save.
//! - Length limits count characters, not bytes.

use crate::model::validation::ValidationSink;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Store-generated project identifier.
pub type ProjectId = Uuid;

pub const STATUS_IN_PROGRESS: &str = "In progress";
pub const STATUS_COMPLETED: &str = "Completed";

pub const TITLE_LENGTH: RangeInclusive<usize> = 5..=80;
pub const SUMMARY_LENGTH: RangeInclusive<usize> = 50..=350;
pub const CONTENT_LENGTH: RangeInclusive<usize> = 50..=10_000;
pub const MAX_TAGS: usize = 8;

/// A portfolio project as stored in the `projects` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Serialized under the store's reserved identifier key.
    #[serde(rename = "_id")]
    pub id: ProjectId,
    pub title: String,
    /// Free text; must mention `In progress` or `Completed`.
    pub status: String,
    /// A stored `null` reads back as no tags.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub summary: String,
    #[serde(rename = "projectLink", default)]
    pub project_link: String,
    /// Markdown body.
    pub content: String,
}

impl Project {
    /// Creates an unsaved project draft.
    ///
    /// The id is nil until the store assigns one; both timestamps start at
    /// the current time.
    pub fn new(
        title: impl Into<String>,
        status: impl Into<String>,
        summary: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::nil(),
            title: title.into(),
            status: status.into(),
            tags: Vec::new(),
            date_created: now,
            date_modified: now,
            summary: summary.into(),
            project_link: String::new(),
            content: content.into(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_project_link(mut self, link: impl Into<String>) -> Self {
        self.project_link = link.into();
        self
    }

    /// Returns whether the store has assigned an id yet.
    pub fn is_persisted(&self) -> bool {
        !self.id.is_nil()
    }

    /// Marks the project as modified at `at`.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.date_modified = at;
    }

    /// Checks every field constraint and records violations in `errors`.
    ///
    /// All rules run; a failing rule never hides the next one. Returns
    /// `true` only when `errors` holds no validation errors afterwards, so
    /// errors recorded before this call also make it return `false`.
    pub fn validate<S: ValidationSink + ?Sized>(&self, errors: &mut S) -> bool {
        if !TITLE_LENGTH.contains(&char_len(&self.title)) {
            errors.add_validation_error(
                "title",
                "Title should be between 5 and 80 characters long",
            );
        }

        if !has_known_status(&self.status) {
            errors.add_validation_error(
                "status",
                "The project status must be 'in progress' or 'completed'",
            );
        }

        if self.tags.len() > MAX_TAGS {
            errors.add_validation_error("tags", "You may only have 8 project tags");
        }

        if !SUMMARY_LENGTH.contains(&char_len(&self.summary)) {
            errors.add_validation_error(
                "summary",
                "Project summary should be between 50 and 350 characters long",
            );
        }

        if !CONTENT_LENGTH.contains(&char_len(&self.content)) {
            errors.add_validation_error(
                "content",
                "The project content should be between 50 and 10000 characters",
            );
        }

        !errors.has_validation_errors()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn has_known_status(status: &str) -> bool {
    status.contains(STATUS_IN_PROGRESS) || status.contains(STATUS_COMPLETED)
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}
