// In-memory GrafanaRepository for service tests
use crate::application::grafana_repository::{ApiError, GrafanaRepository, ImportStatus, StatusMessage};
use crate::domain::dashboard::{Dashboard, DashboardHit, DashboardMeta};
use crate::domain::datasource::Datasource;
use crate::domain::folder::{Folder, GENERAL_FOLDER_ID, GENERAL_FOLDER_TITLE};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
struct StoredDashboard {
    uid: String,
    folder_id: i64,
    body: Value,
}

#[derive(Default)]
struct State {
    next_id: i64,
    dashboards: Vec<StoredDashboard>,
    folders: Vec<Folder>,
    datasources: Vec<Datasource>,
    broken_dashboards: HashSet<String>,
    fail_listings: bool,
    fail_folder_listing: bool,
    folder_create_calls: usize,
    folder_list_calls: usize,
}

#[derive(Default)]
pub struct FakeGrafana {
    state: Mutex<State>,
}

/// Lowercase title with runs of non-alphanumerics collapsed to `-`
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Sorted `/`-separated paths of every JSON file below `root`
pub fn relative_json_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "json"))
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}

impl FakeGrafana {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(state: &mut State) -> i64 {
        state.next_id += 1;
        state.next_id
    }

    pub fn add_folder(&self, title: &str) -> Folder {
        let mut state = self.state.lock().unwrap();
        let id = Self::next_id(&mut state);
        let folder = Folder { id, uid: format!("folder-{}", id), title: title.to_string() };
        state.folders.push(folder.clone());
        folder
    }

    pub fn add_dashboard(&self, body: Value, folder_id: i64) {
        let mut state = self.state.lock().unwrap();
        Self::store_dashboard(&mut state, body, folder_id);
    }

    pub fn add_datasource(&self, raw: Value) {
        let datasource: Datasource = serde_json::from_value(raw).unwrap();
        self.state.lock().unwrap().datasources.push(datasource);
    }

    pub fn fail_dashboard_fetch(&self, uid: &str) {
        self.state.lock().unwrap().broken_dashboards.insert(uid.to_string());
    }

    pub fn fail_listings(&self) {
        self.state.lock().unwrap().fail_listings = true;
    }

    pub fn fail_folder_listing(&self) {
        self.state.lock().unwrap().fail_folder_listing = true;
    }

    pub fn folder_create_calls(&self) -> usize {
        self.state.lock().unwrap().folder_create_calls
    }

    pub fn folder_list_calls(&self) -> usize {
        self.state.lock().unwrap().folder_list_calls
    }

    pub fn folder_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self.state.lock().unwrap().folders.iter().map(|f| f.title.clone()).collect();
        titles.sort();
        titles
    }

    pub fn dashboard_count(&self) -> usize {
        self.state.lock().unwrap().dashboards.len()
    }

    pub fn dashboard_folder_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.state.lock().unwrap().dashboards.iter().map(|d| d.folder_id).collect();
        ids.sort();
        ids
    }

    pub fn dashboard_body(&self, uid: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state.dashboards.iter().find(|d| d.uid == uid).map(|d| d.body.clone())
    }

    pub fn datasource_count(&self) -> usize {
        self.state.lock().unwrap().datasources.len()
    }

    pub fn datasource(&self, id: i64) -> Option<Datasource> {
        let state = self.state.lock().unwrap();
        state.datasources.iter().find(|d| d.id == id).cloned()
    }

    fn store_dashboard(state: &mut State, body: Value, folder_id: i64) -> String {
        let uid = match body["uid"].as_str() {
            Some(uid) => uid.to_string(),
            None => format!("generated-{}", Self::next_id(state)),
        };
        state.dashboards.retain(|d| d.uid != uid);
        state.dashboards.push(StoredDashboard { uid: uid.clone(), folder_id, body });
        uid
    }

    fn folder_title(state: &State, folder_id: i64) -> String {
        if folder_id == GENERAL_FOLDER_ID {
            return GENERAL_FOLDER_TITLE.to_string();
        }
        state
            .folders
            .iter()
            .find(|f| f.id == folder_id)
            .map(|f| f.title.clone())
            .unwrap_or_default()
    }

    fn title_of(body: &Value) -> String {
        body["title"].as_str().unwrap_or_default().to_string()
    }
}

#[async_trait]
impl GrafanaRepository for FakeGrafana {
    async fn search_dashboards(&self) -> Result<Vec<DashboardHit>, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_listings {
            return Err(ApiError::Status { status: 500, body: "search failed".to_string() });
        }

        Ok(state
            .dashboards
            .iter()
            .map(|d| {
                let title = Self::title_of(&d.body);
                // the server leaves the folder title out for the default folder
                let folder_title = if d.folder_id == GENERAL_FOLDER_ID {
                    String::new()
                } else {
                    Self::folder_title(&state, d.folder_id)
                };
                DashboardHit {
                    uid: d.uid.clone(),
                    uri: format!("db/{}", slugify(&title)),
                    title,
                    folder_title,
                }
            })
            .collect())
    }

    async fn get_dashboard(&self, uid: &str) -> Result<Dashboard, ApiError> {
        let state = self.state.lock().unwrap();
        if state.broken_dashboards.contains(uid) {
            return Err(ApiError::Status { status: 500, body: "boom".to_string() });
        }

        let stored = state.dashboards.iter().find(|d| d.uid == uid).ok_or(ApiError::NotFound)?;
        Ok(Dashboard::new(
            stored.body.clone(),
            DashboardMeta {
                slug: slugify(&Self::title_of(&stored.body)),
                folder_title: Self::folder_title(&state, stored.folder_id),
                folder_id: stored.folder_id,
            },
        ))
    }

    async fn import_dashboard(
        &self,
        body: Value,
        folder_id: i64,
        overwrite: bool,
    ) -> Result<ImportStatus, ApiError> {
        let mut state = self.state.lock().unwrap();
        if folder_id != GENERAL_FOLDER_ID && !state.folders.iter().any(|f| f.id == folder_id) {
            return Err(ApiError::Status { status: 400, body: "folder not found".to_string() });
        }
        if let Some(uid) = body["uid"].as_str() {
            if !overwrite && state.dashboards.iter().any(|d| d.uid == uid) {
                return Err(ApiError::Status { status: 412, body: "version-mismatch".to_string() });
            }
        }

        let uid = Self::store_dashboard(&mut state, body, folder_id);
        Ok(ImportStatus { uid, status: "success".to_string(), version: 1 })
    }

    async fn list_folders(&self) -> Result<Vec<Folder>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.folder_list_calls += 1;
        if state.fail_listings || state.fail_folder_listing {
            return Err(ApiError::Status { status: 500, body: "folders failed".to_string() });
        }
        Ok(state.folders.clone())
    }

    async fn create_folder(&self, title: &str) -> Result<Folder, ApiError> {
        {
            let mut state = self.state.lock().unwrap();
            state.folder_create_calls += 1;
            if state.folders.iter().any(|f| f.title == title) {
                return Err(ApiError::AlreadyExists(title.to_string()));
            }
        }
        Ok(self.add_folder(title))
    }

    async fn list_datasources(&self) -> Result<Vec<Datasource>, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_listings {
            return Err(ApiError::Status { status: 500, body: "datasources failed".to_string() });
        }
        Ok(state.datasources.clone())
    }

    async fn get_datasource(&self, id: i64) -> Result<Datasource, ApiError> {
        self.datasource(id).ok_or(ApiError::NotFound)
    }

    async fn get_datasource_by_name(&self, name: &str) -> Result<Datasource, ApiError> {
        let state = self.state.lock().unwrap();
        state.datasources.iter().find(|d| d.name == name).cloned().ok_or(ApiError::NotFound)
    }

    async fn create_datasource(&self, datasource: &Datasource) -> Result<StatusMessage, ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.datasources.iter().any(|d| d.name == datasource.name) {
            return Err(ApiError::AlreadyExists("data source with the same name already exists".to_string()));
        }
        state.datasources.push(datasource.clone());
        Ok(StatusMessage { id: Some(datasource.id), message: "Datasource added".to_string() })
    }

    async fn update_datasource(&self, datasource: &Datasource) -> Result<StatusMessage, ApiError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .datasources
            .iter_mut()
            .find(|d| d.id == datasource.id)
            .ok_or(ApiError::NotFound)?;
        *existing = datasource.clone();
        Ok(StatusMessage { id: Some(datasource.id), message: "Datasource updated".to_string() })
    }
}
