pub mod http_platform_client;
pub mod platform_config;
pub mod unique_name;
