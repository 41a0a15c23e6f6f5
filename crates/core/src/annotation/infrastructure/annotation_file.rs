use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::annotation::domain::annotation::Annotation;
use crate::annotation::domain::project_meta::ProjectMeta;
use crate::annotation::infrastructure::annotation_json::{
    annotation_from_str, annotation_to_json, AnnotationJsonError,
};
use crate::annotation::infrastructure::project_meta_json::{meta_from_str, ProjectMetaJsonError};

#[derive(Error, Debug)]
pub enum AnnotationFileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Meta {
        path: PathBuf,
        #[source]
        source: ProjectMetaJsonError,
    },
    #[error("{path}: {source}")]
    Annotation {
        path: PathBuf,
        #[source]
        source: AnnotationJsonError,
    },
}

pub fn read_meta(path: &Path) -> Result<ProjectMeta, AnnotationFileError> {
    let json = read_to_string(path)?;
    meta_from_str(&json).map_err(|e| AnnotationFileError::Meta {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn read_annotation(path: &Path, meta: &ProjectMeta) -> Result<Annotation, AnnotationFileError> {
    let json = read_to_string(path)?;
    annotation_from_str(&json, meta).map_err(|e| AnnotationFileError::Annotation {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn write_annotation(path: &Path, annotation: &Annotation) -> Result<(), AnnotationFileError> {
    let json = annotation_to_json(annotation)
        .and_then(|value| Ok(serde_json::to_string_pretty(&value)?))
        .map_err(|e| AnnotationFileError::Annotation {
            path: path.to_path_buf(),
            source: e,
        })?;
    fs::write(path, json).map_err(|e| AnnotationFileError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_to_string(path: &Path) -> Result<String, AnnotationFileError> {
    fs::read_to_string(path).map_err(|e| AnnotationFileError::Read {
        path: path.to_path_buf(),
        source: e,
    })
}
