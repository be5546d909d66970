// Dashboard domain model
use super::folder::GENERAL_FOLDER_TITLE;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

/// A single entry returned by dashboard search
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardHit {
    pub uid: String,
    pub title: String,
    #[serde(default)]
    pub uri: String,
    #[serde(rename = "folderTitle", default)]
    pub folder_title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardMeta {
    #[serde(default)]
    pub slug: String,
    #[serde(rename = "folderTitle", default)]
    pub folder_title: String,
    #[serde(rename = "folderId", default)]
    pub folder_id: i64,
}

/// A dashboard definition together with its metadata.
/// The body is kept opaque; only `id` is ever touched.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub body: Value,
    pub meta: DashboardMeta,
}

impl Dashboard {
    pub fn new(body: Value, meta: DashboardMeta) -> Self {
        Self { body, meta }
    }

    /// Folder a backed-up dashboard belongs to. Search results omit the
    /// folder title for dashboards in the default folder, so fall back to
    /// the metadata and then to "General".
    pub fn folder_title<'a>(&'a self, hit: &'a DashboardHit) -> &'a str {
        if !hit.folder_title.is_empty() {
            &hit.folder_title
        } else if !self.meta.folder_title.is_empty() {
            &self.meta.folder_title
        } else {
            GENERAL_FOLDER_TITLE
        }
    }

    /// `<folder>/<slug>.json`, relative to the backup root. A folder title
    /// with `/` becomes nested directories; it never leaves the root.
    pub fn relative_path(&self, hit: &DashboardHit) -> PathBuf {
        let mut path: PathBuf = self
            .folder_title(hit)
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .map(|segment| if segment == ".." { "_".to_string() } else { segment.replace(':', "_") })
            .collect();
        if path.as_os_str().is_empty() {
            path.push(GENERAL_FOLDER_TITLE);
        }

        let slug = self.meta.slug.replace(['/', '\\'], "_");
        let stem = if matches!(slug.as_str(), "" | "." | "..") {
            hit.uid.replace(['/', '\\'], "_")
        } else {
            slug
        };
        path.push(format!("{}.json", stem));
        path
    }
}

/// Clear the instance-specific numeric ID so the receiving server matches
/// the dashboard by UID instead.
pub fn prepare_for_import(mut body: Value) -> Value {
    if let Some(object) = body.as_object_mut() {
        object.insert("id".to_string(), Value::Null);
    }
    body
}
