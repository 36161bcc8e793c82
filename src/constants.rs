/// Application constants

// Transaction family
pub const FAMILY_NAME: &str = "xo";
pub const FAMILY_VERSION: &str = "1.0";

// Payload actions
pub const ACTION_CREATE: &str = "create";
pub const ACTION_TAKE: &str = "take";
pub const NULL_ARGUMENT: &str = "null";

// Wire formats
pub const FIELD_SEPARATOR: char = ',';
pub const GAME_RECORD_FIELDS: usize = 5;
pub const BOARD_CELLS: usize = 9;
pub const NAMESPACE_PREFIX_LEN: usize = 6;
pub const RECORD_SUFFIX_LEN: usize = 64;
pub const ADDRESS_LEN: usize = NAMESPACE_PREFIX_LEN + RECORD_SUFFIX_LEN;

// REST API
pub const DEFAULT_REST_API_URL: &str = "http://localhost:8008";
pub const BATCH_CONTENT_TYPE: &str = "application/octet-stream";
pub const DEFAULT_BATCH_WAIT_SECS: u64 = 5;

// Gateway retries and status re-polls (single attempt unless configured otherwise)
pub const DEFAULT_GATEWAY_ATTEMPTS: usize = 1;
pub const DEFAULT_GATEWAY_RETRY_INTERVAL_MS: u64 = 1_500;

// Background refresh
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5;
