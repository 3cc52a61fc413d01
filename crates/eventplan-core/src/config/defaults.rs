/// Backend used when no base URL is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:3001";

/// Per-request timeout (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Primary environment variable for the backend base URL
pub const ENV_API_BASE: &str = "EVENTPLAN_API_BASE";

/// Secondary environment variable for the backend base URL
pub const ENV_BACKEND_URL: &str = "EVENTPLAN_BACKEND_URL";

/// Environment variable overriding where the session database lives
pub const ENV_DATA_DIR: &str = "EVENTPLAN_DATA_DIR";

/// Directory name under the platform data dir
pub const APP_DIR_NAME: &str = "eventplan";
