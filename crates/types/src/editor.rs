// crates/types/src/editor.rs
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An external program a project can be opened with. Keyed by `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../bindings/"))]
pub struct Editor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub default: bool,
}

/// Partial update for an [`Editor`]. `path` and `name` must both be present
/// for the store to accept it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../bindings/"))]
pub struct EditorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

impl EditorPatch {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn to_editor(&self) -> Editor {
        let mut editor = Editor::default();
        self.apply(&mut editor);
        editor
    }

    pub fn apply(&self, editor: &mut Editor) {
        if let Some(icon) = &self.icon {
            editor.icon = if icon.is_empty() {
                None
            } else {
                Some(icon.clone())
            };
        }
        if let Some(path) = &self.path {
            editor.path = path.clone();
        }
        if let Some(name) = &self.name {
            editor.name = name.clone();
        }
        if let Some(default) = self.default {
            editor.default = default;
        }
    }
}
