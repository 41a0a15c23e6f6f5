use crate::annotation::domain::geometry::GeometryType;

/// An object class registered for a project: labels reference one by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjClass {
    pub name: String,
    pub geometry_type: GeometryType,
    pub color: [u8; 3],
}

impl ObjClass {
    pub fn new(name: impl Into<String>, geometry_type: GeometryType, color: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            geometry_type,
            color,
        }
    }
}
