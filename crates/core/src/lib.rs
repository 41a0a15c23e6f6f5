pub mod shared {
    pub mod binding_key;
    pub mod constants;
    pub mod image_size;
}

pub mod annotation {
    pub mod domain {
        pub mod annotation;
        pub mod binding_grouper;
        pub mod geometry;
        pub mod label;
        pub mod obj_class;
        pub mod project_meta;
    }
    pub mod infrastructure;
}

pub mod platform {
    pub mod domain {
        pub mod annotation_platform;
        pub mod platform_info;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod binding_report;
    pub mod discard_bindings_use_case;
    pub mod inspect_bindings_use_case;
    pub mod upload_annotation_use_case;

    #[cfg(test)]
    mod test_support;
}
