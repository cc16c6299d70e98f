//! Project records, keyed by their path relative to the project root.

use crate::store::{Bucket, Record, UpsertOutcome};
use crate::{Database, DbResult};
use proman_types::{Project, ProjectPatch};

impl Record for Project {
    const BUCKET: Bucket = Bucket::Projects;
    type Patch = ProjectPatch;

    fn key(&self) -> &str {
        &self.path
    }

    fn patch_key(patch: &ProjectPatch) -> Result<&str, &'static str> {
        patch.path.as_deref().ok_or("path")
    }

    fn from_patch(patch: &ProjectPatch) -> Self {
        patch.to_project()
    }

    fn merge(&mut self, patch: &ProjectPatch) {
        patch.apply(self);
    }
}

impl Database {
    pub async fn get_project(&self, path: &str) -> DbResult<Option<Project>> {
        self.get::<Project>(path).await
    }

    /// All projects ordered by path. Empty bucket is `DbError::NoRecords`.
    pub async fn get_all_projects(&self) -> DbResult<Vec<Project>> {
        self.get_all::<Project>().await
    }

    pub async fn upsert_project(&self, patch: &ProjectPatch) -> DbResult<UpsertOutcome> {
        self.upsert::<Project>(patch).await
    }

    pub async fn delete_project(&self, path: &str) -> DbResult<bool> {
        self.delete::<Project>(path).await
    }
}
