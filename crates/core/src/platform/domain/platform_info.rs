use serde::Deserialize;

/// Server-side record of a project.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProjectInfo {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub project_id: Option<u64>,
}

/// Server-side record of an uploaded image, including its decoded size.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub dataset_id: Option<u64>,
    #[serde(default)]
    pub hash: Option<String>,
    pub width: u32,
    pub height: u32,
}
