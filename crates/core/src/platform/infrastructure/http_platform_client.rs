use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::annotation::domain::project_meta::ProjectMeta;
use crate::annotation::infrastructure::project_meta_json::{meta_from_json, meta_to_json};
use crate::platform::domain::annotation_platform::AnnotationPlatform;
use crate::platform::domain::platform_info::{DatasetInfo, ImageInfo, ProjectInfo};
use crate::platform::infrastructure::platform_config::PlatformConfig;
use crate::shared::constants::{API_PATH, API_TOKEN_HEADER, DEFAULT_REQUEST_TIMEOUT_SECS};

const PROJECTS_PER_PAGE: u32 = 500;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {method} failed: {source}")]
    Request {
        method: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} returned HTTP {status}: {body}")]
    Status {
        method: String,
        status: u16,
        body: String,
    },
    #[error("could not decode {method} response: {source}")]
    Decode {
        method: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected {method} response: {reason}")]
    UnexpectedResponse { method: String, reason: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    entities: Vec<T>,
    #[serde(default)]
    pages_count: u32,
}

#[derive(Deserialize)]
struct AnnotationInfo {
    annotation: Value,
}

/// Blocking client for the platform's public JSON API.
///
/// Every method is a `POST {server}/public/api/v3/<method>` authenticated by
/// the `x-api-key` header.
pub struct HttpPlatformClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl HttpPlatformClient {
    pub fn new(config: &PlatformConfig) -> Result<Self, PlatformError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(PlatformError::Client)?;
        Ok(Self {
            client,
            base_url: config.server_address.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    pub fn method_url(&self, method: &str) -> String {
        format!("{}/{API_PATH}/{method}", self.base_url)
    }

    fn request(&self, method: &str) -> RequestBuilder {
        self.client
            .post(self.method_url(method))
            .header(API_TOKEN_HEADER, &self.api_token)
    }

    fn send(&self, method: &str, request: RequestBuilder) -> Result<Response, PlatformError> {
        log::debug!("POST {method}");
        let response = request.send().map_err(|e| PlatformError::Request {
            method: method.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PlatformError::Status {
                method: method.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn post_json<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T, PlatformError> {
        self.send(method, self.request(method).json(body))?
            .json::<T>()
            .map_err(|e| PlatformError::Decode {
                method: method.to_string(),
                source: e,
            })
    }
}

/// Content address the platform uses for uploaded files: base64(sha256(bytes)).
pub fn content_hash(content: &[u8]) -> String {
    STANDARD.encode(Sha256::digest(content))
}

impl AnnotationPlatform for HttpPlatformClient {
    fn list_projects(
        &self,
        workspace_id: u64,
    ) -> Result<Vec<ProjectInfo>, Box<dyn std::error::Error>> {
        let mut projects = Vec::new();
        let mut page = 1;
        loop {
            let result: Page<ProjectInfo> = self.post_json(
                "projects.list",
                &json!({
                    "workspaceId": workspace_id,
                    "page": page,
                    "per_page": PROJECTS_PER_PAGE,
                }),
            )?;
            projects.extend(result.entities);
            if page >= result.pages_count {
                break;
            }
            page += 1;
        }
        Ok(projects)
    }

    fn create_project(
        &self,
        workspace_id: u64,
        name: &str,
    ) -> Result<ProjectInfo, Box<dyn std::error::Error>> {
        let info = self.post_json(
            "projects.add",
            &json!({
                "workspaceId": workspace_id,
                "name": name,
                "description": "",
                "type": "images",
            }),
        )?;
        Ok(info)
    }

    fn create_dataset(
        &self,
        project_id: u64,
        name: &str,
    ) -> Result<DatasetInfo, Box<dyn std::error::Error>> {
        let info = self.post_json(
            "datasets.add",
            &json!({"projectId": project_id, "name": name, "description": ""}),
        )?;
        Ok(info)
    }

    fn update_project_meta(
        &self,
        project_id: u64,
        meta: &ProjectMeta,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let _: Value = self.post_json(
            "projects.meta.update",
            &json!({"id": project_id, "meta": meta_to_json(meta)?}),
        )?;
        Ok(())
    }

    fn get_project_meta(&self, project_id: u64) -> Result<ProjectMeta, Box<dyn std::error::Error>> {
        let json: Value = self.post_json("projects.meta", &json!({"id": project_id}))?;
        Ok(meta_from_json(&json)?)
    }

    fn upload_image(
        &self,
        dataset_id: u64,
        name: &str,
        content: &[u8],
    ) -> Result<ImageInfo, Box<dyn std::error::Error>> {
        let hash = content_hash(content);
        let part = Part::bytes(content.to_vec()).file_name(name.to_string());
        // Part names are matched against the hash verbatim, '/' included.
        let form = Form::new().percent_encode_noop().part(hash.clone(), part);
        self.send(
            "images.bulk.upload",
            self.request("images.bulk.upload").multipart(form),
        )?;

        let mut infos: Vec<ImageInfo> = self.post_json(
            "images.bulk.add",
            &json!({
                "datasetId": dataset_id,
                "images": [{"title": name, "hash": hash}],
            }),
        )?;
        if infos.is_empty() {
            return Err(PlatformError::UnexpectedResponse {
                method: "images.bulk.add".to_string(),
                reason: "no image info returned".to_string(),
            }
            .into());
        }
        Ok(infos.swap_remove(0))
    }

    fn get_image_info(&self, image_id: u64) -> Result<ImageInfo, Box<dyn std::error::Error>> {
        let info = self.post_json("images.info", &json!({"id": image_id}))?;
        Ok(info)
    }

    fn upload_annotation(
        &self,
        image_id: u64,
        annotation: &Value,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let image = self.get_image_info(image_id)?;
        let dataset_id = image.dataset_id.ok_or_else(|| PlatformError::UnexpectedResponse {
            method: "images.info".to_string(),
            reason: format!("image {image_id} has no dataset id"),
        })?;
        let _: Value = self.post_json(
            "annotations.bulk.add",
            &json!({
                "datasetId": dataset_id,
                "annotations": [{"imageId": image_id, "annotation": annotation}],
            }),
        )?;
        Ok(())
    }

    fn download_annotation(&self, image_id: u64) -> Result<Value, Box<dyn std::error::Error>> {
        let info: AnnotationInfo = self.post_json(
            "annotations.info",
            &json!({"imageId": image_id, "withCustomData": true}),
        )?;
        Ok(info.annotation)
    }
}
