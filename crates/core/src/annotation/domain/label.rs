use crate::annotation::domain::geometry::Geometry;
use crate::annotation::domain::obj_class::ObjClass;
use crate::shared::binding_key::{BindingKey, GroupKey};

/// A region of interest in an image: a shape of some object class,
/// optionally bound to other labels through a shared [`BindingKey`].
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub geometry: Geometry,
    pub obj_class: ObjClass,
    pub description: String,
    /// Tag payloads, carried through unchanged.
    pub tags: Vec<serde_json::Value>,
    binding_key: Option<BindingKey>,
}

impl Label {
    pub fn new(geometry: Geometry, obj_class: ObjClass) -> Self {
        Self {
            geometry,
            obj_class,
            description: String::new(),
            tags: Vec::new(),
            binding_key: None,
        }
    }

    pub fn with_binding_key(mut self, key: impl Into<BindingKey>) -> Self {
        self.binding_key = Some(key.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn binding_key(&self) -> Option<&BindingKey> {
        self.binding_key.as_ref()
    }

    pub fn set_binding_key(&mut self, key: Option<BindingKey>) {
        self.binding_key = key;
    }

    /// Moves the label into the unbound group. Returns whether a key was removed.
    pub fn clear_binding_key(&mut self) -> bool {
        self.binding_key.take().is_some()
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey::from(self.binding_key.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::domain::geometry::{Coord, GeometryType};

    fn car_label() -> Label {
        Label::new(
            Geometry::Point(Coord::new(1, 2)),
            ObjClass::new("car", GeometryType::Any, [255, 0, 255]),
        )
    }

    #[test]
    fn test_new_label_is_unbound() {
        let label = car_label();
        assert!(label.binding_key().is_none());
        assert_eq!(label.group_key(), GroupKey::Unbound);
    }

    #[test]
    fn test_with_binding_key() {
        let label = car_label().with_binding_key("g1");
        assert_eq!(label.binding_key(), Some(&BindingKey::new("g1")));
        assert_eq!(label.group_key(), GroupKey::Bound(BindingKey::new("g1")));
    }

    #[test]
    fn test_clear_binding_key_reports_removal() {
        let mut label = car_label().with_binding_key("g1");
        assert!(label.clear_binding_key());
        assert!(!label.clear_binding_key());
        assert_eq!(label.group_key(), GroupKey::Unbound);
    }

    #[test]
    fn test_set_binding_key_replaces_previous() {
        let mut label = car_label().with_binding_key("g1");
        label.set_binding_key(Some(BindingKey::new("g2")));
        assert_eq!(label.binding_key().map(BindingKey::as_str), Some("g2"));
    }
}
