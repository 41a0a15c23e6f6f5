pub mod annotation_file;
pub mod annotation_json;
pub mod project_meta_json;
