use crate::annotation::domain::annotation::Annotation;
use crate::annotation::domain::project_meta::ProjectMeta;
use crate::annotation::infrastructure::annotation_json::annotation_to_json;
use crate::pipeline::binding_report::BindingReport;
use crate::platform::domain::annotation_platform::AnnotationPlatform;
use crate::platform::domain::platform_info::{DatasetInfo, ImageInfo, ProjectInfo};
use crate::platform::infrastructure::unique_name::unique_name;
use crate::shared::image_size::ImageSize;

/// What to create on the platform.
pub struct UploadRequest<'a> {
    pub workspace_id: u64,
    pub project_name: &'a str,
    pub dataset_name: &'a str,
    pub image_name: &'a str,
    pub image_content: &'a [u8],
    pub meta: &'a ProjectMeta,
    pub annotation: Annotation,
}

#[derive(Debug)]
pub struct UploadOutcome {
    pub project: ProjectInfo,
    pub dataset: DatasetInfo,
    pub image: ImageInfo,
    pub report: BindingReport,
}

/// Creates a fresh project and dataset, registers the object classes,
/// uploads one image and its annotation (bindings included).
///
/// The project name is made unique within the workspace; the annotation's
/// size is taken from the uploaded image as the platform decoded it.
pub struct UploadAnnotationUseCase {
    platform: Box<dyn AnnotationPlatform>,
}

impl UploadAnnotationUseCase {
    pub fn new(platform: Box<dyn AnnotationPlatform>) -> Self {
        Self { platform }
    }

    pub fn execute(
        &self,
        request: UploadRequest<'_>,
    ) -> Result<UploadOutcome, Box<dyn std::error::Error>> {
        let existing = self.platform.list_projects(request.workspace_id)?;
        let name = unique_name(request.project_name, existing.iter().map(|p| p.name.as_str()));
        if name != request.project_name {
            log::info!(
                "Project '{}' exists, using '{name}' instead",
                request.project_name
            );
        }

        let project = self.platform.create_project(request.workspace_id, &name)?;
        let dataset = self
            .platform
            .create_dataset(project.id, request.dataset_name)?;
        self.platform.update_project_meta(project.id, request.meta)?;
        log::info!(
            "Created project '{}' (id={}) with dataset '{}' (id={})",
            project.name,
            project.id,
            dataset.name,
            dataset.id
        );

        let image = self.platform.upload_image(
            dataset.id,
            request.image_name,
            request.image_content,
        )?;
        log::info!("Image has been successfully uploaded: id={}", image.id);

        let mut annotation = request.annotation;
        annotation.img_size = ImageSize::new(image.height, image.width);
        self.platform
            .upload_annotation(image.id, &annotation_to_json(&annotation)?)?;

        let report = BindingReport::from_annotation(&annotation);
        log::info!(
            "Uploaded annotation with {} labels in {} binding groups",
            annotation.labels.len(),
            report.bound_group_count()
        );

        Ok(UploadOutcome {
            project,
            dataset,
            image,
            report,
        })
    }
}
