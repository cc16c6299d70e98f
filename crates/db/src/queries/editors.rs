//! Editor records, keyed by name.

use crate::store::{Bucket, Record, UpsertOutcome};
use crate::{Database, DbResult};
use proman_types::{Editor, EditorPatch};

impl Record for Editor {
    const BUCKET: Bucket = Bucket::Editors;
    type Patch = EditorPatch;

    fn key(&self) -> &str {
        &self.name
    }

    // Both fields are mandatory on every write, path checked first.
    fn patch_key(patch: &EditorPatch) -> Result<&str, &'static str> {
        if patch.path.is_none() {
            return Err("path");
        }
        patch.name.as_deref().ok_or("name")
    }

    fn from_patch(patch: &EditorPatch) -> Self {
        patch.to_editor()
    }

    fn merge(&mut self, patch: &EditorPatch) {
        patch.apply(self);
    }
}

impl Database {
    pub async fn get_editor(&self, name: &str) -> DbResult<Option<Editor>> {
        self.get::<Editor>(name).await
    }

    pub async fn get_all_editors(&self) -> DbResult<Vec<Editor>> {
        self.get_all::<Editor>().await
    }

    pub async fn upsert_editor(&self, patch: &EditorPatch) -> DbResult<UpsertOutcome> {
        self.upsert::<Editor>(patch).await
    }

    pub async fn delete_editor(&self, name: &str) -> DbResult<bool> {
        self.delete::<Editor>(name).await
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbError, UpsertOutcome};
    use proman_types::{Editor, EditorPatch};

    #[tokio::test]
    async fn test_upsert_editor_requires_path_then_name() {
        let db = Database::new_in_memory().await.unwrap();

        let err = db
            .upsert_editor(&EditorPatch {
                name: Some("code".into()),
                ..EditorPatch::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::MissingRequiredField {
                bucket: "editors",
                field: "path"
            }
        ));

        let err = db
            .upsert_editor(&EditorPatch {
                path: Some("/usr/bin/code".into()),
                ..EditorPatch::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::MissingRequiredField { field: "name", .. }
        ));

        assert!(db.keys::<Editor>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_editor_merge_keeps_icon() {
        let db = Database::new_in_memory().await.unwrap();
        let created = db
            .upsert_editor(&EditorPatch {
                icon: Some("code.png".into()),
                ..EditorPatch::new("code", "/usr/bin/code")
            })
            .await
            .unwrap();
        assert_eq!(created, UpsertOutcome::Created);

        let updated = db
            .upsert_editor(&EditorPatch {
                default: Some(true),
                ..EditorPatch::new("code", "/usr/local/bin/code")
            })
            .await
            .unwrap();
        assert_eq!(updated, UpsertOutcome::Updated);

        let editor = db.get_editor("code").await.unwrap().unwrap();
        assert_eq!(editor.icon.as_deref(), Some("code.png"));
        assert_eq!(editor.path, "/usr/local/bin/code");
        assert!(editor.default);
    }

    #[tokio::test]
    async fn test_editors_do_not_touch_projects() {
        let db = Database::new_in_memory().await.unwrap();
        db.upsert_editor(&EditorPatch::new("vim", "/usr/bin/vim"))
            .await
            .unwrap();

        assert!(db.get_all_projects().await.unwrap_err().is_no_records());
        assert_eq!(db.get_all_editors().await.unwrap().len(), 1);
        assert!(db.delete_editor("vim").await.unwrap());
        assert!(db.get_all_editors().await.unwrap_err().is_no_records());
    }
}
