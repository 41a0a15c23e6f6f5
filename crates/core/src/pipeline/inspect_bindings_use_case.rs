use crate::annotation::domain::annotation::Annotation;
use crate::annotation::infrastructure::annotation_json::annotation_from_json;
use crate::pipeline::binding_report::BindingReport;
use crate::platform::domain::annotation_platform::AnnotationPlatform;

/// Downloads an image's annotation and reports its binding groups.
pub struct InspectBindingsUseCase {
    platform: Box<dyn AnnotationPlatform>,
}

impl InspectBindingsUseCase {
    pub fn new(platform: Box<dyn AnnotationPlatform>) -> Self {
        Self { platform }
    }

    pub fn execute(
        &self,
        project_id: u64,
        image_id: u64,
    ) -> Result<(Annotation, BindingReport), Box<dyn std::error::Error>> {
        let meta = self.platform.get_project_meta(project_id)?;
        let json = self.platform.download_annotation(image_id)?;
        let annotation = annotation_from_json(&json, &meta)?;

        let report = BindingReport::from_annotation(&annotation);
        log::debug!(
            "Image {image_id}: {} labels, {} binding groups",
            annotation.labels.len(),
            report.bound_group_count()
        );
        Ok((annotation, report))
    }
}
