use serde_json::Value;

use crate::annotation::domain::project_meta::ProjectMeta;
use crate::platform::domain::platform_info::{DatasetInfo, ImageInfo, ProjectInfo};

/// Remote annotation-management service.
///
/// Annotations cross this boundary as wire JSON; callers convert with
/// `annotation::infrastructure::annotation_json`. Errors are whatever the
/// service or transport reports and are propagated unchanged.
pub trait AnnotationPlatform {
    fn list_projects(
        &self,
        workspace_id: u64,
    ) -> Result<Vec<ProjectInfo>, Box<dyn std::error::Error>>;

    fn create_project(
        &self,
        workspace_id: u64,
        name: &str,
    ) -> Result<ProjectInfo, Box<dyn std::error::Error>>;

    fn create_dataset(
        &self,
        project_id: u64,
        name: &str,
    ) -> Result<DatasetInfo, Box<dyn std::error::Error>>;

    fn update_project_meta(
        &self,
        project_id: u64,
        meta: &ProjectMeta,
    ) -> Result<(), Box<dyn std::error::Error>>;

    fn get_project_meta(&self, project_id: u64) -> Result<ProjectMeta, Box<dyn std::error::Error>>;

    fn upload_image(
        &self,
        dataset_id: u64,
        name: &str,
        content: &[u8],
    ) -> Result<ImageInfo, Box<dyn std::error::Error>>;

    fn get_image_info(&self, image_id: u64) -> Result<ImageInfo, Box<dyn std::error::Error>>;

    fn upload_annotation(
        &self,
        image_id: u64,
        annotation: &Value,
    ) -> Result<(), Box<dyn std::error::Error>>;

    fn download_annotation(&self, image_id: u64) -> Result<Value, Box<dyn std::error::Error>>;
}
