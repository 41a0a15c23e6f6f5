use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::annotation::domain::project_meta::ProjectMeta;
use crate::platform::domain::annotation_platform::AnnotationPlatform;
use crate::platform::domain::platform_info::{DatasetInfo, ImageInfo, ProjectInfo};

/// In-memory platform that records every call in order.
pub struct RecordingPlatform {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub existing_projects: Vec<ProjectInfo>,
    pub meta: ProjectMeta,
    pub stored_annotation: Arc<Mutex<Option<Value>>>,
    pub image: ImageInfo,
    pub fail_downloads: bool,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            existing_projects: Vec::new(),
            meta: ProjectMeta::default(),
            stored_annotation: Arc::new(Mutex::new(None)),
            image: ImageInfo {
                id: 3314153,
                name: "image.jpg".to_string(),
                dataset_id: Some(2),
                hash: None,
                width: 1067,
                height: 800,
            },
            fail_downloads: false,
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AnnotationPlatform for RecordingPlatform {
    fn list_projects(
        &self,
        workspace_id: u64,
    ) -> Result<Vec<ProjectInfo>, Box<dyn std::error::Error>> {
        self.record(format!("list_projects({workspace_id})"));
        Ok(self.existing_projects.clone())
    }

    fn create_project(
        &self,
        workspace_id: u64,
        name: &str,
    ) -> Result<ProjectInfo, Box<dyn std::error::Error>> {
        self.record(format!("create_project({workspace_id}, {name})"));
        Ok(ProjectInfo {
            id: 1,
            name: name.to_string(),
        })
    }

    fn create_dataset(
        &self,
        project_id: u64,
        name: &str,
    ) -> Result<DatasetInfo, Box<dyn std::error::Error>> {
        self.record(format!("create_dataset({project_id}, {name})"));
        Ok(DatasetInfo {
            id: 2,
            name: name.to_string(),
            project_id: Some(project_id),
        })
    }

    fn update_project_meta(
        &self,
        project_id: u64,
        meta: &ProjectMeta,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.record(format!(
            "update_project_meta({project_id}, {} classes)",
            meta.obj_classes().len()
        ));
        Ok(())
    }

    fn get_project_meta(&self, project_id: u64) -> Result<ProjectMeta, Box<dyn std::error::Error>> {
        self.record(format!("get_project_meta({project_id})"));
        Ok(self.meta.clone())
    }

    fn upload_image(
        &self,
        dataset_id: u64,
        name: &str,
        content: &[u8],
    ) -> Result<ImageInfo, Box<dyn std::error::Error>> {
        self.record(format!(
            "upload_image({dataset_id}, {name}, {} bytes)",
            content.len()
        ));
        Ok(ImageInfo {
            name: name.to_string(),
            dataset_id: Some(dataset_id),
            ..self.image.clone()
        })
    }

    fn get_image_info(&self, image_id: u64) -> Result<ImageInfo, Box<dyn std::error::Error>> {
        self.record(format!("get_image_info({image_id})"));
        Ok(self.image.clone())
    }

    fn upload_annotation(
        &self,
        image_id: u64,
        annotation: &Value,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.record(format!("upload_annotation({image_id})"));
        *self.stored_annotation.lock().unwrap() = Some(annotation.clone());
        Ok(())
    }

    fn download_annotation(&self, image_id: u64) -> Result<Value, Box<dyn std::error::Error>> {
        self.record(format!("download_annotation({image_id})"));
        if self.fail_downloads {
            return Err("connection reset".into());
        }
        self.stored_annotation
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| "no annotation stored".into())
    }
}
