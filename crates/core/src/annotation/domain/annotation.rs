use thiserror::Error;

use crate::annotation::domain::binding_grouper::{group_bindings, BindingGroups};
use crate::annotation::domain::label::Label;
use crate::shared::binding_key::BindingKey;
use crate::shared::image_size::ImageSize;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("label index {index} out of range for annotation with {len} labels")]
    LabelIndexOutOfRange { index: usize, len: usize },
}

/// All labels of one image together with its pixel dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub img_size: ImageSize,
    pub labels: Vec<Label>,
    pub description: String,
    pub tags: Vec<serde_json::Value>,
}

impl Annotation {
    pub fn new(img_size: ImageSize, labels: Vec<Label>) -> Self {
        Self {
            img_size,
            labels,
            description: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn add_label(&mut self, label: Label) {
        self.labels.push(label);
    }

    pub fn get_bindings(&self) -> BindingGroups<'_> {
        group_bindings(&self.labels)
    }

    /// Assigns `key` to the labels at `indices`.
    ///
    /// Indices are validated up front; on error no label is modified.
    pub fn bind(&mut self, indices: &[usize], key: &BindingKey) -> Result<(), AnnotationError> {
        let len = self.labels.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(AnnotationError::LabelIndexOutOfRange { index, len });
        }
        for &i in indices {
            self.labels[i].set_binding_key(Some(key.clone()));
        }
        Ok(())
    }

    /// Assigns `key` to every label of the named class. Returns how many were bound.
    pub fn bind_class(&mut self, class_name: &str, key: &BindingKey) -> usize {
        let mut bound = 0;
        for label in self
            .labels
            .iter_mut()
            .filter(|l| l.obj_class.name == class_name)
        {
            label.set_binding_key(Some(key.clone()));
            bound += 1;
        }
        bound
    }

    /// Clears the binding key of every label.
    pub fn discard_bindings(&mut self) -> usize {
        self.discard_bindings_where(|_| true)
    }

    /// Clears the binding key of labels matching `predicate`.
    ///
    /// Returns the number of labels that actually lost a key.
    pub fn discard_bindings_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Label) -> bool,
    {
        let mut cleared = 0;
        for label in self.labels.iter_mut() {
            if predicate(label) && label.clear_binding_key() {
                cleared += 1;
            }
        }
        cleared
    }

    pub fn discard_bindings_for_class(&mut self, class_name: &str) -> usize {
        self.discard_bindings_where(|l| l.obj_class.name == class_name)
    }
}
