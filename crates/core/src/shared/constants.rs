pub const SERVER_ADDRESS_ENV: &str = "SERVER_ADDRESS";
pub const API_TOKEN_ENV: &str = "API_TOKEN";

pub const API_PATH: &str = "public/api/v3";
pub const API_TOKEN_HEADER: &str = "x-api-key";

/// Seconds before an API request is abandoned.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const CONFIG_DIR_NAME: &str = "labelbind";
pub const CONFIG_FILE_NAME: &str = "credentials.json";
/// Dotenv-style credentials file looked up in the home directory.
pub const ENV_FILE_NAME: &str = "supervisely.env";

/// Suffix width used when generating `name_001`-style free names.
pub const UNIQUE_NAME_SUFFIX_DIGITS: usize = 3;
