use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::annotation::domain::annotation::Annotation;
use crate::annotation::domain::geometry::{Coord, Geometry, GeometryType};
use crate::annotation::domain::label::Label;
use crate::annotation::domain::project_meta::ProjectMeta;
use crate::shared::binding_key::BindingKey;
use crate::shared::image_size::ImageSize;

#[derive(Error, Debug)]
pub enum AnnotationJsonError {
    #[error("malformed annotation JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("label references class '{0}' which is not in the project meta")]
    UnknownClass(String),
    #[error("label of class '{class}' has unknown geometry type '{geometry_type}'")]
    UnknownGeometryType {
        class: String,
        geometry_type: String,
    },
    #[error("label of class '{class}' is a {found} but the class expects {expected}")]
    GeometryMismatch {
        class: String,
        expected: GeometryType,
        found: GeometryType,
    },
    #[error("label of class '{class}' declares {geometry_type} but carries no geometry data")]
    MissingGeometry {
        class: String,
        geometry_type: GeometryType,
    },
    #[error("label of class '{class}' has invalid points: {reason}")]
    InvalidPoints { class: String, reason: String },
}

#[derive(Serialize, Deserialize)]
struct AnnotationDto {
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<Value>,
    size: ImageSize,
    #[serde(default)]
    objects: Vec<LabelDto>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelDto {
    class_title: String,
    geometry_type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<Value>,
    /// Binding key. `null` and a missing field both mean unbound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instance: Option<BindingKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bitmap: Option<BitmapDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    points: Option<PointsDto>,
}

#[derive(Serialize, Deserialize)]
struct BitmapDto {
    data: String,
    origin: [i32; 2],
}

#[derive(Serialize, Deserialize)]
struct PointsDto {
    exterior: Vec<[i32; 2]>,
    #[serde(default)]
    interior: Vec<Vec<[i32; 2]>>,
}

/// Parses an annotation, resolving each label's class against `meta`.
pub fn annotation_from_json(
    value: &Value,
    meta: &ProjectMeta,
) -> Result<Annotation, AnnotationJsonError> {
    annotation_from_dto(AnnotationDto::deserialize(value)?, meta)
}

pub fn annotation_from_str(json: &str, meta: &ProjectMeta) -> Result<Annotation, AnnotationJsonError> {
    annotation_from_dto(serde_json::from_str(json)?, meta)
}

pub fn annotation_to_json(annotation: &Annotation) -> Result<Value, AnnotationJsonError> {
    let dto = AnnotationDto {
        description: annotation.description.clone(),
        tags: annotation.tags.clone(),
        size: annotation.img_size,
        objects: annotation.labels.iter().map(label_to_dto).collect(),
    };
    Ok(serde_json::to_value(dto)?)
}

fn annotation_from_dto(
    dto: AnnotationDto,
    meta: &ProjectMeta,
) -> Result<Annotation, AnnotationJsonError> {
    let labels = dto
        .objects
        .into_iter()
        .map(|object| label_from_dto(object, meta))
        .collect::<Result<Vec<_>, _>>()?;

    let mut annotation = Annotation::new(dto.size, labels);
    annotation.description = dto.description;
    annotation.tags = dto.tags;
    Ok(annotation)
}

fn label_from_dto(dto: LabelDto, meta: &ProjectMeta) -> Result<Label, AnnotationJsonError> {
    let class = meta
        .get_obj_class(&dto.class_title)
        .ok_or_else(|| AnnotationJsonError::UnknownClass(dto.class_title.clone()))?;

    let geometry_type: GeometryType =
        dto.geometry_type
            .parse()
            .map_err(|_| AnnotationJsonError::UnknownGeometryType {
                class: dto.class_title.clone(),
                geometry_type: dto.geometry_type.clone(),
            })?;
    if !class.geometry_type.accepts(geometry_type) {
        return Err(AnnotationJsonError::GeometryMismatch {
            class: dto.class_title,
            expected: class.geometry_type,
            found: geometry_type,
        });
    }

    let geometry = geometry_from_dto(&dto, geometry_type)?;
    let mut label = Label::new(geometry, class.clone()).with_description(dto.description);
    label.tags = dto.tags;
    label.set_binding_key(dto.instance);
    Ok(label)
}

fn geometry_from_dto(
    dto: &LabelDto,
    geometry_type: GeometryType,
) -> Result<Geometry, AnnotationJsonError> {
    let missing = || AnnotationJsonError::MissingGeometry {
        class: dto.class_title.clone(),
        geometry_type,
    };
    let invalid = |reason: &str| AnnotationJsonError::InvalidPoints {
        class: dto.class_title.clone(),
        reason: reason.to_string(),
    };

    if geometry_type == GeometryType::Bitmap {
        let bitmap = dto.bitmap.as_ref().ok_or_else(missing)?;
        return Ok(Geometry::Bitmap {
            origin: to_coord(bitmap.origin),
            data: bitmap.data.clone(),
        });
    }

    let points = dto.points.as_ref().ok_or_else(missing)?;
    let exterior: Vec<Coord> = points.exterior.iter().copied().map(to_coord).collect();
    match geometry_type {
        GeometryType::Rectangle => match exterior.as_slice() {
            [a, b] => Ok(Geometry::Rectangle {
                top: a.y.min(b.y),
                left: a.x.min(b.x),
                bottom: a.y.max(b.y),
                right: a.x.max(b.x),
            }),
            _ => Err(invalid("rectangle needs exactly two corner points")),
        },
        GeometryType::Polygon => {
            if exterior.len() < 3 {
                return Err(invalid("polygon needs at least three points"));
            }
            let interior = points
                .interior
                .iter()
                .map(|ring| ring.iter().copied().map(to_coord).collect())
                .collect();
            Ok(Geometry::Polygon { exterior, interior })
        }
        GeometryType::Polyline => {
            if exterior.len() < 2 {
                return Err(invalid("line needs at least two points"));
            }
            Ok(Geometry::Polyline { points: exterior })
        }
        GeometryType::Point => match exterior.as_slice() {
            [p] => Ok(Geometry::Point(*p)),
            _ => Err(invalid("point needs exactly one coordinate")),
        },
        // A label always carries a concrete shape.
        GeometryType::Any | GeometryType::Bitmap => Err(invalid("label geometry cannot be 'any'")),
    }
}

fn label_to_dto(label: &Label) -> LabelDto {
    let (bitmap, points) = match &label.geometry {
        Geometry::Bitmap { origin, data } => (
            Some(BitmapDto {
                data: data.clone(),
                origin: from_coord(*origin),
            }),
            None,
        ),
        Geometry::Rectangle {
            top,
            left,
            bottom,
            right,
        } => (None, Some(points_dto(vec![[*left, *top], [*right, *bottom]], Vec::new()))),
        Geometry::Polygon { exterior, interior } => (
            None,
            Some(points_dto(
                exterior.iter().copied().map(from_coord).collect(),
                interior
                    .iter()
                    .map(|ring| ring.iter().copied().map(from_coord).collect())
                    .collect(),
            )),
        ),
        Geometry::Polyline { points } => (
            None,
            Some(points_dto(
                points.iter().copied().map(from_coord).collect(),
                Vec::new(),
            )),
        ),
        Geometry::Point(p) => (None, Some(points_dto(vec![from_coord(*p)], Vec::new()))),
    };

    LabelDto {
        class_title: label.obj_class.name.clone(),
        geometry_type: label.geometry.geometry_type().as_str().to_string(),
        description: label.description.clone(),
        tags: label.tags.clone(),
        instance: label.binding_key().cloned(),
        bitmap,
        points,
    }
}

fn points_dto(exterior: Vec<[i32; 2]>, interior: Vec<Vec<[i32; 2]>>) -> PointsDto {
    PointsDto { exterior, interior }
}

fn to_coord(point: [i32; 2]) -> Coord {
    Coord::new(point[0], point[1])
}

fn from_coord(coord: Coord) -> [i32; 2] {
    [coord.x, coord.y]
}
