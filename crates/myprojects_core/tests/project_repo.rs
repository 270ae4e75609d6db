use myprojects_core::db::{open_db, open_db_in_memory};
use myprojects_core::store::StoreResult;
use myprojects_core::{
    DocumentCollection, DocumentId, Project, ProjectRepository, RawDocument, RepoError,
    RepoObserver, RepoOperation, SqliteCollection, PROJECTS_COLLECTION,
};
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use uuid::Uuid;

#[test]
fn insert_then_get_roundtrip_preserves_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = ProjectRepository::new(projects(&conn));

    let draft = sample_project("Portfolio site")
        .with_tags(["rust", "web"])
        .with_project_link("https://example.com/portfolio");
    let stored = repo.insert_project(&draft).unwrap();
    assert!(stored.is_persisted());

    let loaded = repo.get_project(&stored.id.to_string()).unwrap();
    assert_eq!(loaded, stored);
}

#[test]
fn update_then_get_roundtrip_returns_replaced_document() {
    let conn = open_db_in_memory().unwrap();
    let repo = ProjectRepository::new(projects(&conn));
    let mut project = repo.insert_project(&sample_project("Compiler")).unwrap();

    project.title = "Compiler rewrite".to_string();
    project.status = "Completed".to_string();
    project.tags = vec!["llvm".to_string()];
    project.touch(project.date_modified + chrono::Duration::minutes(5));
    assert!(repo.update_project(&project));

    let loaded = repo.get_project(&project.id.to_string()).unwrap();
    assert_eq!(loaded, project);
}

#[test]
fn get_project_with_unknown_id_is_absent() {
    let conn = open_db_in_memory().unwrap();
    let observer = RecordingObserver::default();
    let repo = ProjectRepository::with_observer(projects(&conn), &observer);

    let id = Uuid::new_v4();
    assert!(repo.get_project(&id.to_string()).is_none());
    assert!(matches!(
        repo.find_project(&id.to_string()),
        Err(RepoError::NotFound(missing)) if missing == id
    ));
    assert_eq!(
        observer.statuses(),
        [
            (RepoOperation::GetProject, "not_found"),
            (RepoOperation::GetProject, "not_found")
        ]
    );
}

#[test]
fn malformed_id_is_rejected_without_contacting_store() {
    let collection = UnreachableCollection::default();
    let observer = RecordingObserver::default();
    let repo = ProjectRepository::with_observer(&collection, &observer);

    assert!(repo.get_project("not-a-valid-id").is_none());
    assert!(!repo.delete_project("zzz"));
    assert!(matches!(
        repo.find_project(""),
        Err(RepoError::InvalidId(_))
    ));

    assert_eq!(collection.calls.get(), 0);
    assert_eq!(
        observer.statuses(),
        [
            (RepoOperation::GetProject, "invalid_id"),
            (RepoOperation::DeleteProject, "invalid_id"),
            (RepoOperation::GetProject, "invalid_id"),
        ]
    );
}

#[test]
fn get_projects_on_empty_collection_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = ProjectRepository::new(projects(&conn));

    assert!(repo.get_projects().is_empty());
}

#[test]
fn get_projects_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = ProjectRepository::new(projects(&conn));

    let titles = ["First project", "Second project", "Third project"];
    for title in titles {
        repo.insert_project(&sample_project(title)).unwrap();
    }

    let listed: Vec<_> = repo
        .get_projects()
        .into_iter()
        .map(|project| project.title)
        .collect();
    assert_eq!(listed, titles);
}

#[test]
fn get_projects_skips_undecodable_document_and_keeps_order() {
    let conn = open_db_in_memory().unwrap();
    let collection = projects(&conn);
    let observer = RecordingObserver::default();

    let first = {
        let repo = ProjectRepository::new(&collection);
        repo.insert_project(&sample_project("Before broken")).unwrap()
    };
    let broken_id = collection
        .insert_one(&json!({ "title": 42, "status": ["not", "text"] }))
        .unwrap();
    let repo = ProjectRepository::with_observer(&collection, &observer);
    let last = repo.insert_project(&sample_project("After broken")).unwrap();

    let scan = repo.scan_projects();
    assert_eq!(scan.projects, [first, last]);
    assert_eq!(scan.skipped, [broken_id.to_string()]);
    assert!(scan.cursor_error.is_none());
    assert_eq!(
        observer.statuses(),
        [(RepoOperation::GetProjects, "decode_error")]
    );
}

#[test]
fn cursor_error_keeps_already_collected_projects() {
    let valid = serde_json::to_string(&stored_sample("Survives the cursor")).unwrap();
    let collection = FailingScanCollection { body: valid };
    let observer = RecordingObserver::default();
    let repo = ProjectRepository::with_observer(&collection, &observer);

    let scan = repo.scan_projects();
    assert_eq!(scan.projects.len(), 1);
    assert_eq!(scan.projects[0].title, "Survives the cursor");
    assert!(matches!(scan.cursor_error, Some(RepoError::Store(_))));
    assert_eq!(
        observer.statuses(),
        [(RepoOperation::GetProjects, "store_error")]
    );

    assert_eq!(repo.get_projects().len(), 1);
}

#[test]
fn update_of_unknown_id_fails_and_does_not_insert() {
    let conn = open_db_in_memory().unwrap();
    let repo = ProjectRepository::new(projects(&conn));

    let ghost = stored_sample("Ghost project");
    assert!(!repo.update_project(&ghost));
    assert!(matches!(
        repo.replace_project(&ghost),
        Err(RepoError::NotFound(id)) if id == ghost.id
    ));
    assert!(repo.get_projects().is_empty());
}

#[test]
fn delete_removes_project_once() {
    let conn = open_db_in_memory().unwrap();
    let repo = ProjectRepository::new(projects(&conn));
    let project = repo.insert_project(&sample_project("Short lived")).unwrap();
    let id = project.id.to_string();

    assert!(repo.delete_project(&id));
    assert!(repo.get_project(&id).is_none());
    assert!(!repo.delete_project(&id));
}

#[test]
fn delete_of_unknown_id_returns_false() {
    let conn = open_db_in_memory().unwrap();
    let repo = ProjectRepository::new(projects(&conn));
    repo.insert_project(&sample_project("Bystander")).unwrap();

    assert!(!repo.delete_project(&Uuid::new_v4().to_string()));
    assert_eq!(repo.get_projects().len(), 1);
}

#[test]
fn store_failures_collapse_to_absent_and_false() {
    let collection = FailingScanCollection {
        body: String::new(),
    };
    let observer = RecordingObserver::default();
    let repo = ProjectRepository::with_observer(&collection, &observer);
    let id = Uuid::new_v4().to_string();

    assert!(repo.get_project(&id).is_none());
    assert!(!repo.delete_project(&id));
    assert!(!repo.update_project(&stored_sample("Unreachable store")));
    assert_eq!(
        observer.statuses(),
        [
            (RepoOperation::GetProject, "store_error"),
            (RepoOperation::DeleteProject, "store_error"),
            (RepoOperation::UpdateProject, "store_error"),
        ]
    );
}

#[test]
fn projects_collection_is_isolated_from_other_collections() {
    let conn = open_db_in_memory().unwrap();
    let other = SqliteCollection::try_new(&conn, "drafts").unwrap();
    other.insert_one(&json!({ "title": "not a project" })).unwrap();

    let repo = ProjectRepository::new(projects(&conn));
    assert!(repo.get_projects().is_empty());
}

#[test]
fn concurrent_connections_resolve_replace_as_last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");
    let conn_one = open_db(&path).unwrap();
    let conn_two = open_db(&path).unwrap();
    let repo_one = ProjectRepository::new(projects(&conn_one));
    let repo_two = ProjectRepository::new(projects(&conn_two));

    let project = repo_one.insert_project(&sample_project("Shared project")).unwrap();
    let id = project.id.to_string();

    let mut from_one = project.clone();
    from_one.title = "From conn one".to_string();
    assert!(repo_one.update_project(&from_one));

    let mut from_two = repo_two.get_project(&id).unwrap();
    assert_eq!(from_two.title, "From conn one");
    from_two.title = "From conn two".to_string();
    assert!(repo_two.update_project(&from_two));

    assert_eq!(repo_one.get_project(&id).unwrap().title, "From conn two");
    assert_eq!(repo_one.get_projects().len(), 1);
}

#[test]
fn only_hyphenated_id_spelling_finds_project() {
    let conn = open_db_in_memory().unwrap();
    let repo = ProjectRepository::new(projects(&conn));
    let project = repo.insert_project(&sample_project("Canonical id")).unwrap();

    assert!(repo.get_project(&project.id.to_string()).is_some());
    for text in [
        format!(" {} ", project.id),
        format!("{{{}}}", project.id),
        project.id.simple().to_string(),
        project.id.urn().to_string(),
    ] {
        assert!(repo.get_project(&text).is_none(), "found via `{text}`");
        assert!(!repo.delete_project(&text), "deleted via `{text}`");
    }
    assert!(repo.get_project(&project.id.to_string()).is_some());
}

#[test]
fn null_tags_decode_as_empty_list() {
    let conn = open_db_in_memory().unwrap();
    let collection = projects(&conn);
    let mut document = serde_json::to_value(sample_project("Legacy document")).unwrap();
    document["tags"] = Value::Null;
    let id = collection.insert_one(&document).unwrap();

    let repo = ProjectRepository::new(&collection);
    let loaded = repo.get_project(&id.to_string()).unwrap();
    assert!(loaded.tags.is_empty());

    let scan = repo.scan_projects();
    assert_eq!(scan.projects.len(), 1);
    assert!(scan.skipped.is_empty());
}

fn projects(conn: &rusqlite::Connection) -> SqliteCollection<'_> {
    SqliteCollection::try_new(conn, PROJECTS_COLLECTION).unwrap()
}

fn sample_project(title: &str) -> Project {
    Project::new(
        title,
        "In progress",
        "A summary that is long enough to satisfy the rules.",
        "Body text that is comfortably longer than fifty characters in total.",
    )
}

fn stored_sample(title: &str) -> Project {
    let mut project = sample_project(title);
    project.id = Uuid::new_v4();
    project
}

#[derive(Default)]
struct RecordingObserver {
    events: RefCell<Vec<(RepoOperation, &'static str)>>,
}

impl RecordingObserver {
    fn statuses(&self) -> Vec<(RepoOperation, &'static str)> {
        self.events.borrow().clone()
    }
}

impl RepoObserver for RecordingObserver {
    fn report(&self, operation: RepoOperation, error: &RepoError) {
        self.events.borrow_mut().push((operation, error.status()));
    }
}

/// Counts calls; every call is a test failure signal.
#[derive(Default)]
struct UnreachableCollection {
    calls: Cell<usize>,
}

impl UnreachableCollection {
    fn hit<T>(&self) -> StoreResult<T> {
        self.calls.set(self.calls.get() + 1);
        Err(rusqlite::Error::InvalidQuery.into())
    }
}

impl DocumentCollection for UnreachableCollection {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn insert_one(&self, _document: &Value) -> StoreResult<DocumentId> {
        self.hit()
    }

    fn find_one(&self, _id: DocumentId) -> StoreResult<Option<RawDocument>> {
        self.hit()
    }

    fn scan(&self, _visit: &mut dyn FnMut(RawDocument)) -> StoreResult<()> {
        self.hit()
    }

    fn replace_one(&self, _id: DocumentId, _document: &Value) -> StoreResult<bool> {
        self.hit()
    }

    fn delete_one(&self, _id: DocumentId) -> StoreResult<bool> {
        self.hit()
    }
}

/// Yields one document from `scan` and then fails; every other call fails.
struct FailingScanCollection {
    body: String,
}

impl DocumentCollection for FailingScanCollection {
    fn name(&self) -> &str {
        "failing"
    }

    fn insert_one(&self, _document: &Value) -> StoreResult<DocumentId> {
        Err(rusqlite::Error::InvalidQuery.into())
    }

    fn find_one(&self, _id: DocumentId) -> StoreResult<Option<RawDocument>> {
        Err(rusqlite::Error::InvalidQuery.into())
    }

    fn scan(&self, visit: &mut dyn FnMut(RawDocument)) -> StoreResult<()> {
        visit(RawDocument {
            id: "first".to_string(),
            body: self.body.clone(),
        });
        Err(rusqlite::Error::InvalidQuery.into())
    }

    fn replace_one(&self, _id: DocumentId, _document: &Value) -> StoreResult<bool> {
        Err(rusqlite::Error::InvalidQuery.into())
    }

    fn delete_one(&self, _id: DocumentId) -> StoreResult<bool> {
        Err(rusqlite::Error::InvalidQuery.into())
    }
}
