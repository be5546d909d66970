// Datasource domain model
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A datasource as the server describes it. Only `id` and `name` are
/// interpreted; every other field is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Datasource {
    /// `<name>.json`, with path separators replaced so the file cannot
    /// escape the backup directory
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name.replace(['/', '\\'], "_"))
    }
}
