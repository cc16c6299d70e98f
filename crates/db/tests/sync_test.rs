// Integration tests for project reconciliation.
//
// Each test builds a throwaway project root with tempfile, optionally turns
// some of its subdirectories into git repositories, and syncs it into a
// store on disk or in memory.

use git2::Repository;
use pretty_assertions::assert_eq;
use proman_core::RepositoryUrlNormalizer;
use proman_db::{sync_projects, Database, SyncReport};
use proman_types::{Project, ProjectPatch};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn project_root(names: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for name in names {
        std::fs::create_dir(tmp.path().join(name)).unwrap();
    }
    tmp
}

fn add_remote(root: &TempDir, project: &str, name: &str, url: &str) {
    let dir = root.path().join(project);
    let repo = match Repository::open(&dir) {
        Ok(repo) => repo,
        Err(_) => Repository::init(&dir).unwrap(),
    };
    repo.remote(name, url).unwrap();
}

async fn sync(db: &Database, root: &TempDir) -> SyncReport {
    sync_projects(
        db,
        root.path().to_str().unwrap(),
        &RepositoryUrlNormalizer::default(),
    )
    .await
    .unwrap()
}

fn paths(projects: &[Project]) -> Vec<&str> {
    projects.iter().map(|p| p.path.as_str()).collect()
}

async fn stored_paths(db: &Database) -> Vec<String> {
    match db.get_all_projects().await {
        Ok(projects) => projects.into_iter().map(|p| p.path).collect(),
        Err(e) if e.is_no_records() => Vec::new(),
        Err(e) => panic!("unexpected store error: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn plain_directories_become_projects() {
    let root = project_root(&["one", "two", "three"]);
    let db = Database::new_in_memory().await.unwrap();

    let report = sync(&db, &root).await;

    assert_eq!(report.projects.len(), 3);
    assert_eq!(report.created, 3);
    assert!(report
        .projects
        .iter()
        .all(|p| p.remotes.is_empty() && p.repository_urls.is_empty()));
    assert_eq!(stored_paths(&db).await, vec!["one", "three", "two"]);
}

#[tokio::test]
async fn second_sync_changes_nothing() {
    let root = project_root(&["api", "web"]);
    add_remote(&root, "api", "origin", "git@github.com:acme/api.git");
    let db = Database::new_in_memory().await.unwrap();

    let first = sync(&db, &root).await;
    let second = sync(&db, &root).await;

    assert_eq!(first.projects, second.projects);
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 0);
    assert_eq!(second.deleted, 0);
    assert_eq!(second.unchanged, 2);
}

#[tokio::test]
async fn removed_directory_is_deleted() {
    let root = project_root(&["a", "b", "c"]);
    let db = Database::new_in_memory().await.unwrap();
    sync(&db, &root).await;

    std::fs::remove_dir(root.path().join("b")).unwrap();
    let report = sync(&db, &root).await;

    assert_eq!(report.deleted, 1);
    assert_eq!(paths(&report.projects), vec!["a", "c"]);
    assert_eq!(stored_paths(&db).await, vec!["a", "c"]);
}

#[tokio::test]
async fn github_remote_and_plain_directory() {
    let root = project_root(&["proj1", "proj2"]);
    add_remote(&root, "proj1", "origin", "git@github.com:u/proj1.git");
    let db = Database::new_in_memory().await.unwrap();

    let report = sync(&db, &root).await;

    assert_eq!(
        report.projects,
        vec![
            Project {
                path: "proj1".into(),
                remotes: vec!["git@github.com:u/proj1.git".into()],
                repository_urls: vec!["https://github.com/u/proj1/".into()],
                ..Project::default()
            },
            Project {
                path: "proj2".into(),
                ..Project::default()
            },
        ]
    );
}

#[tokio::test]
async fn unknown_host_has_no_repository_url() {
    let root = project_root(&["mirror"]);
    add_remote(&root, "mirror", "origin", "https://gitlab.com/x/y.git");
    add_remote(&root, "mirror", "github", "https://github.com/x/y.git");
    let db = Database::new_in_memory().await.unwrap();

    let report = sync(&db, &root).await;

    let project = &report.projects[0];
    assert_eq!(
        project.remotes,
        vec!["https://gitlab.com/x/y.git", "https://github.com/x/y.git"]
    );
    assert_eq!(project.repository_urls, vec!["https://github.com/x/y/"]);
}

#[tokio::test]
async fn user_fields_survive_sync() {
    let root = project_root(&["site"]);
    let db = Database::new_in_memory().await.unwrap();
    sync(&db, &root).await;

    db.upsert_project(&ProjectPatch {
        open_with: Some("code".into()),
        hide: Some(true),
        ..ProjectPatch::for_path("site")
    })
    .await
    .unwrap();
    add_remote(&root, "site", "origin", "git@github.com:acme/site.git");

    let report = sync(&db, &root).await;

    assert_eq!(report.updated, 1);
    assert_eq!(
        report.projects,
        vec![Project {
            path: "site".into(),
            open_with: Some("code".into()),
            hide: true,
            remotes: vec!["git@github.com:acme/site.git".into()],
            repository_urls: vec!["https://github.com/acme/site/".into()],
        }]
    );
}

#[tokio::test]
async fn removed_remotes_are_cleared() {
    let root = project_root(&["lib"]);
    add_remote(&root, "lib", "origin", "git@github.com:acme/lib.git");
    let db = Database::new_in_memory().await.unwrap();
    sync(&db, &root).await;

    Repository::open(root.path().join("lib"))
        .unwrap()
        .remote_delete("origin")
        .unwrap();
    let report = sync(&db, &root).await;

    assert_eq!(report.updated, 1);
    assert!(report.projects[0].remotes.is_empty());
    assert!(report.projects[0].repository_urls.is_empty());
}

#[tokio::test]
async fn empty_root_deletes_everything() {
    let root = project_root(&["x", "y"]);
    let db = Database::new_in_memory().await.unwrap();
    sync(&db, &root).await;

    let empty = project_root(&[]);
    let report = sync(&db, &empty).await;

    assert!(report.projects.is_empty());
    assert_eq!(report.deleted, 2);
    assert!(stored_paths(&db).await.is_empty());
}

#[tokio::test]
async fn editors_untouched_by_sync() {
    let root = project_root(&["p"]);
    let db = Database::new_in_memory().await.unwrap();
    db.upsert_editor(&proman_types::EditorPatch::new("vim", "/usr/bin/vim"))
        .await
        .unwrap();

    sync(&db, &project_root(&[])).await;
    sync(&db, &root).await;

    assert_eq!(db.get_all_editors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sync_persists_across_reopen() {
    let root = project_root(&["kept"]);
    let store = TempDir::new().unwrap();
    let db_path = store.path().join("store.db");

    let db = Database::new(&db_path).await.unwrap();
    sync(&db, &root).await;
    db.close().await;

    let db = Database::new(&db_path).await.unwrap();
    assert_eq!(stored_paths(&db).await, vec!["kept"]);
    let report = sync(&db, &root).await;
    assert_eq!(report.created, 0);
    db.close().await;
}

// ---------------------------------------------------------------------------
// Failure isolation
// ---------------------------------------------------------------------------

async fn plant_raw_project(db: &Database, key: &str, value: &str) {
    sqlx::query("INSERT INTO records (bucket, key, value) VALUES ('projects', ?, ?)")
        .bind(key)
        .bind(value)
        .execute(db.pool())
        .await
        .unwrap();
}

#[tokio::test]
async fn failed_upsert_does_not_stop_scan() {
    let root = project_root(&["a", "b", "c"]);
    let db = Database::new_in_memory().await.unwrap();
    plant_raw_project(&db, "b", "{").await;

    let report = sync(&db, &root).await;

    assert_eq!(report.upsert_failures, 1);
    assert_eq!(report.unreadable, 1);
    assert_eq!(report.created, 2);
    assert_eq!(paths(&report.projects), vec!["a", "c"]);
    assert!(db.get_project("a").await.unwrap().is_some());
    assert!(db.get_project("c").await.unwrap().is_some());
}

#[tokio::test]
async fn undecodable_records_do_not_block_deletion() {
    let root = project_root(&["a", "b"]);
    let db = Database::new_in_memory().await.unwrap();
    plant_raw_project(&db, "a", "{").await;
    plant_raw_project(&db, "broken", "{").await;
    db.upsert_project(&ProjectPatch::for_path("gone"))
        .await
        .unwrap();

    let report = sync(&db, &root).await;

    assert_eq!(report.deleted, 2);
    assert_eq!(report.delete_failures, 0);
    assert_eq!(paths(&report.projects), vec!["b"]);
    assert!(db.get_project("gone").await.unwrap().is_none());
    assert_eq!(db.keys::<Project>().await.unwrap(), vec!["a", "b"]);

    // Later syncs keep converging while the bad record stays in place.
    std::fs::remove_dir(root.path().join("a")).unwrap();
    let report = sync(&db, &root).await;
    assert_eq!(report.deleted, 1);
    assert_eq!(db.keys::<Project>().await.unwrap(), vec!["b"]);
}

#[tokio::test]
async fn failed_delete_does_not_stop_reconciliation() {
    let root = project_root(&["kept"]);
    let db = Database::new_in_memory().await.unwrap();
    for path in ["old1", "pinned", "old2"] {
        db.upsert_project(&ProjectPatch::for_path(path)).await.unwrap();
    }
    sqlx::query(
        r#"CREATE TRIGGER keep_pinned BEFORE DELETE ON records
           WHEN old.key = 'pinned'
           BEGIN SELECT RAISE(ABORT, 'pinned record'); END"#,
    )
    .execute(db.pool())
    .await
    .unwrap();

    let report = sync(&db, &root).await;

    assert_eq!(report.delete_failures, 1);
    assert_eq!(report.deleted, 2);
    assert_eq!(paths(&report.projects), vec!["kept"]);
    assert_eq!(stored_paths(&db).await, vec!["kept", "pinned"]);
}
