// Folder domain model
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reserved ID of the built-in "General" folder
pub const GENERAL_FOLDER_ID: i64 = 0;
pub const GENERAL_FOLDER_TITLE: &str = "General";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    #[serde(default)]
    pub uid: String,
    pub title: String,
}

impl Folder {
    /// The default folder. It always exists and can never be created.
    pub fn general() -> Self {
        Self {
            id: GENERAL_FOLDER_ID,
            uid: String::new(),
            title: GENERAL_FOLDER_TITLE.to_string(),
        }
    }

    pub fn is_general_title(title: &str) -> bool {
        title == GENERAL_FOLDER_TITLE
    }

    /// Folder name for a dashboard file, taken from its parent directory
    /// relative to the restore root. Files at the root belong to "General".
    pub fn name_for_relative_path(relative: &Path) -> String {
        let components: Vec<String> = relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();

        if components.is_empty() {
            GENERAL_FOLDER_TITLE.to_string()
        } else {
            components.join("/")
        }
    }
}
