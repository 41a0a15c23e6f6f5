use crate::annotation::domain::annotation::Annotation;
use crate::annotation::infrastructure::annotation_json::{annotation_from_json, annotation_to_json};
use crate::pipeline::binding_report::BindingReport;
use crate::platform::domain::annotation_platform::AnnotationPlatform;

/// Which labels lose their binding key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiscardScope {
    All,
    Class(String),
}

impl DiscardScope {
    pub fn apply(&self, annotation: &mut Annotation) -> usize {
        match self {
            DiscardScope::All => annotation.discard_bindings(),
            DiscardScope::Class(name) => annotation.discard_bindings_for_class(name),
        }
    }
}

#[derive(Debug)]
pub struct DiscardOutcome {
    pub cleared: usize,
    pub report: BindingReport,
}

/// Downloads an annotation, discards bindings in `scope`, uploads it back.
pub struct DiscardBindingsUseCase {
    platform: Box<dyn AnnotationPlatform>,
}

impl DiscardBindingsUseCase {
    pub fn new(platform: Box<dyn AnnotationPlatform>) -> Self {
        Self { platform }
    }

    pub fn execute(
        &self,
        project_id: u64,
        image_id: u64,
        scope: &DiscardScope,
    ) -> Result<DiscardOutcome, Box<dyn std::error::Error>> {
        let meta = self.platform.get_project_meta(project_id)?;
        let json = self.platform.download_annotation(image_id)?;
        let mut annotation = annotation_from_json(&json, &meta)?;

        let cleared = scope.apply(&mut annotation);
        if cleared == 0 {
            log::info!("No bindings to discard on image {image_id}");
        } else {
            self.platform
                .upload_annotation(image_id, &annotation_to_json(&annotation)?)?;
            log::info!("Discarded {cleared} bindings on image {image_id}");
        }

        Ok(DiscardOutcome {
            cleared,
            report: BindingReport::from_annotation(&annotation),
        })
    }
}
