use crate::annotation::domain::obj_class::ObjClass;

/// Object classes known to a project, in registration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectMeta {
    obj_classes: Vec<ObjClass>,
}

impl ProjectMeta {
    /// Builds a meta from classes, keeping the first class of each name.
    pub fn new(obj_classes: Vec<ObjClass>) -> Self {
        let mut meta = Self::default();
        for class in obj_classes {
            meta.add_obj_class(class);
        }
        meta
    }

    /// Adds a class unless one with the same name exists. Returns whether it was added.
    pub fn add_obj_class(&mut self, class: ObjClass) -> bool {
        if self.get_obj_class(&class.name).is_some() {
            return false;
        }
        self.obj_classes.push(class);
        true
    }

    pub fn get_obj_class(&self, name: &str) -> Option<&ObjClass> {
        self.obj_classes.iter().find(|c| c.name == name)
    }

    pub fn obj_classes(&self) -> &[ObjClass] {
        &self.obj_classes
    }
}
