use crate::Mode;
use serde::{Deserialize, Serialize};

/// Which backend the preference is persisted to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageKind {
    #[default]
    Local,
    Session,
    ExtensionLocal,
    ExtensionSession,
    None,
}

impl StorageKind {
    pub const fn is_page(self) -> bool {
        matches!(self, Self::Local | Self::Session)
    }

    pub const fn is_extension(self) -> bool {
        matches!(self, Self::ExtensionLocal | Self::ExtensionSession)
    }

    pub const fn extension_counterpart(self) -> Self {
        use StorageKind::*;
        match self {
            Local => ExtensionLocal,
            Session => ExtensionSession,
            other => other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub class_name: String,
    pub label: String,
    pub storage: StorageKind,
    pub storage_name: String,
    pub dark_by_default: bool,
    /// Queue overlapping deferred toggles instead of letting them race.
    pub serialize_toggles: bool,
}

impl Config {
    pub const DEFAULT_CLASS_NAME: &'static str = "dark-mode";
    pub const DEFAULT_LABEL: &'static str = "Toggle dark mode";
    pub const DEFAULT_STORAGE_NAME: &'static str = "dark-mode";

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn for_extension(&self) -> Self {
        Self {
            storage: self.storage.extension_counterpart(),
            ..self.clone()
        }
    }

    pub fn default_mode(&self) -> Mode {
        self.dark_by_default.into()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class_name: Self::DEFAULT_CLASS_NAME.to_string(),
            label: Self::DEFAULT_LABEL.to_string(),
            storage: StorageKind::default(),
            storage_name: Self::DEFAULT_STORAGE_NAME.to_string(),
            dark_by_default: true,
            serialize_toggles: false,
        }
    }
}
