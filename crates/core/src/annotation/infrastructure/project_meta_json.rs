use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::annotation::domain::geometry::GeometryType;
use crate::annotation::domain::obj_class::ObjClass;
use crate::annotation::domain::project_meta::ProjectMeta;

#[derive(Error, Debug)]
pub enum ProjectMetaJsonError {
    #[error("malformed project meta JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("class '{class}' has invalid color '{color}' (expected #RRGGBB)")]
    InvalidColor { class: String, color: String },
    #[error("class '{class}' has unknown shape '{shape}'")]
    UnknownShape { class: String, shape: String },
    #[error("class '{0}' is declared more than once")]
    DuplicateClass(String),
}

#[derive(Serialize, Deserialize)]
struct ProjectMetaDto {
    #[serde(default)]
    classes: Vec<ObjClassDto>,
    #[serde(default)]
    tags: Vec<Value>,
}

#[derive(Serialize, Deserialize)]
struct ObjClassDto {
    title: String,
    shape: String,
    color: String,
}

pub fn meta_from_str(json: &str) -> Result<ProjectMeta, ProjectMetaJsonError> {
    meta_from_dto(serde_json::from_str(json)?)
}

pub fn meta_from_json(value: &Value) -> Result<ProjectMeta, ProjectMetaJsonError> {
    meta_from_dto(ProjectMetaDto::deserialize(value)?)
}

pub fn meta_to_json(meta: &ProjectMeta) -> Result<Value, ProjectMetaJsonError> {
    let dto = ProjectMetaDto {
        classes: meta
            .obj_classes()
            .iter()
            .map(|c| ObjClassDto {
                title: c.name.clone(),
                shape: c.geometry_type.as_str().to_string(),
                color: format_color(c.color),
            })
            .collect(),
        tags: Vec::new(),
    };
    Ok(serde_json::to_value(dto)?)
}

fn meta_from_dto(dto: ProjectMetaDto) -> Result<ProjectMeta, ProjectMetaJsonError> {
    let mut meta = ProjectMeta::default();
    for class in dto.classes {
        let geometry_type: GeometryType =
            class
                .shape
                .parse()
                .map_err(|_| ProjectMetaJsonError::UnknownShape {
                    class: class.title.clone(),
                    shape: class.shape.clone(),
                })?;
        let color = parse_color(&class.color).ok_or_else(|| ProjectMetaJsonError::InvalidColor {
            class: class.title.clone(),
            color: class.color.clone(),
        })?;
        let title = class.title;
        if !meta.add_obj_class(ObjClass::new(title.clone(), geometry_type, color)) {
            return Err(ProjectMetaJsonError::DuplicateClass(title));
        }
    }
    Ok(meta)
}

/// Parses `#RRGGBB` (leading `#` optional, case-insensitive).
pub fn parse_color(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

pub fn format_color(color: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_parse_meta() {
        let meta = meta_from_json(&json!({
            "classes": [
                {"title": "car", "shape": "bitmap", "color": "#FF00FF", "id": 17},
                {"title": "person", "shape": "rectangle", "color": "#00ff00"}
            ],
            "tags": []
        }))
        .unwrap();

        assert_eq!(meta.obj_classes().len(), 2);
        let car = meta.get_obj_class("car").unwrap();
        assert_eq!(car.geometry_type, GeometryType::Bitmap);
        assert_eq!(car.color, [255, 0, 255]);
        assert_eq!(meta.get_obj_class("person").unwrap().color, [0, 255, 0]);
    }

    #[test]
    fn test_meta_without_classes_is_empty() {
        let meta = meta_from_str("{}").unwrap();
        assert!(meta.obj_classes().is_empty());
    }

    #[test]
    fn test_serialize_meta() {
        let meta = ProjectMeta::new(vec![ObjClass::new(
            "car",
            GeometryType::Bitmap,
            [255, 0, 255],
        )]);
        let json = meta_to_json(&meta).unwrap();
        assert_eq!(
            json,
            json!({
                "classes": [{"title": "car", "shape": "bitmap", "color": "#FF00FF"}],
                "tags": []
            })
        );
    }

    #[test]
    fn test_serialized_meta_parses_back() {
        let meta = ProjectMeta::new(vec![
            ObjClass::new("car", GeometryType::Bitmap, [255, 0, 255]),
            ObjClass::new("lane", GeometryType::Polyline, [1, 2, 3]),
        ]);
        assert_eq!(meta_from_json(&meta_to_json(&meta).unwrap()).unwrap(), meta);
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let err = meta_from_json(&json!({
            "classes": [
                {"title": "car", "shape": "bitmap", "color": "#FF00FF"},
                {"title": "car", "shape": "polygon", "color": "#FF00FF"}
            ]
        }))
        .unwrap_err();
        assert!(matches!(err, ProjectMetaJsonError::DuplicateClass(name) if name == "car"));
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let err = meta_from_json(&json!({
            "classes": [{"title": "box", "shape": "cuboid_3d", "color": "#000000"}]
        }))
        .unwrap_err();
        assert!(matches!(err, ProjectMetaJsonError::UnknownShape { .. }));
    }

    #[rstest]
    #[case::with_hash("#FF00FF", Some([255, 0, 255]))]
    #[case::without_hash("0a0B0c", Some([10, 11, 12]))]
    #[case::too_short("#FFF", None)]
    #[case::not_hex("#GG0000", None)]
    #[case::empty("", None)]
    fn test_parse_color(#[case] hex: &str, #[case] expected: Option<[u8; 3]>) {
        assert_eq!(parse_color(hex), expected);
    }

    #[test]
    fn test_invalid_color_rejected() {
        let err = meta_from_json(&json!({
            "classes": [{"title": "car", "shape": "bitmap", "color": "magenta"}]
        }))
        .unwrap_err();
        assert!(matches!(err, ProjectMetaJsonError::InvalidColor { .. }));
    }
}
