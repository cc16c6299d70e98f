// crates/types/src/project.rs
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A project directory found under the configured project root.
///
/// `path` is relative to the project root and is the record's key.
/// `remotes` and `repository_urls` are derived from the working tree on every
/// scan; `open_with` and `hide` belong to the user and survive rescans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../bindings/"))]
pub struct Project {
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_with: Option<String>,
    #[serde(default)]
    pub hide: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remotes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repository_urls: Vec<String>,
}

/// Partial update for a [`Project`]. Unset fields leave the stored value alone.
///
/// Setting `open_with` to an empty string clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../bindings/"))]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remotes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_urls: Option<Vec<String>>,
}

impl ProjectPatch {
    /// Patch produced by a filesystem scan: replaces the derived fields and
    /// nothing else.
    pub fn scanned(
        path: impl Into<String>,
        remotes: Vec<String>,
        repository_urls: Vec<String>,
    ) -> Self {
        Self {
            path: Some(path.into()),
            remotes: Some(remotes),
            repository_urls: Some(repository_urls),
            ..Self::default()
        }
    }

    /// Patch that only names the target record.
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Build a full record from this patch, using defaults for unset fields.
    pub fn to_project(&self) -> Project {
        let mut project = Project::default();
        self.apply(&mut project);
        project
    }

    /// Shallow merge: every set field overwrites, every unset field is kept.
    pub fn apply(&self, project: &mut Project) {
        if let Some(path) = &self.path {
            project.path = path.clone();
        }
        if let Some(open_with) = &self.open_with {
            project.open_with = if open_with.is_empty() {
                None
            } else {
                Some(open_with.clone())
            };
        }
        if let Some(hide) = self.hide {
            project.hide = hide;
        }
        if let Some(remotes) = &self.remotes {
            project.remotes = remotes.clone();
        }
        if let Some(urls) = &self.repository_urls {
            project.repository_urls = urls.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scanned_patch_keeps_user_fields() {
        let mut project = Project {
            path: "proj".into(),
            open_with: Some("code".into()),
            hide: true,
            remotes: vec!["git@github.com:u/old.git".into()],
            repository_urls: vec!["https://github.com/u/old/".into()],
        };

        ProjectPatch::scanned("proj", vec![], vec![]).apply(&mut project);

        assert_eq!(
            project,
            Project {
                path: "proj".into(),
                open_with: Some("code".into()),
                hide: true,
                remotes: vec![],
                repository_urls: vec![],
            }
        );
    }

    #[test]
    fn test_patches_merge_field_by_field() {
        let mut project = ProjectPatch {
            hide: Some(true),
            ..ProjectPatch::for_path("a")
        }
        .to_project();

        ProjectPatch {
            open_with: Some("vim".into()),
            ..ProjectPatch::for_path("a")
        }
        .apply(&mut project);

        assert!(project.hide);
        assert_eq!(project.open_with.as_deref(), Some("vim"));
    }

    #[test]
    fn test_empty_open_with_clears() {
        let mut project = Project {
            path: "a".into(),
            open_with: Some("code".into()),
            ..Project::default()
        };
        ProjectPatch {
            open_with: Some(String::new()),
            ..ProjectPatch::default()
        }
        .apply(&mut project);
        assert_eq!(project.open_with, None);
    }

    #[test]
    fn test_project_json_field_names() {
        let project = Project {
            path: "proj1".into(),
            open_with: None,
            hide: false,
            remotes: vec!["git@github.com:u/proj1.git".into()],
            repository_urls: vec!["https://github.com/u/proj1/".into()],
        };
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["path"], "proj1");
        assert_eq!(json["hide"], false);
        assert_eq!(json["remotes"][0], "git@github.com:u/proj1.git");
        assert_eq!(json["repository_urls"][0], "https://github.com/u/proj1/");
        assert!(json.get("open_with").is_none());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let project: Project =
            serde_json::from_str(r#"{"path":"x","hide":true,"favourite":1}"#).unwrap();
        assert_eq!(project.path, "x");
        assert!(project.hide);
        assert!(project.remotes.is_empty());
    }
}
