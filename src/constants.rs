// src/constants.rs
//
// Application-wide constants shared by the transcoder, the HTTP client and the
// file store.

/// Base URL of the DocBase REST API.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_BASE_URL: &str = "https://api.docbase.io";

/// Header carrying the static access token on every request.
///
/// Used in: `infrastructure/docbase.rs`
pub const TOKEN_HEADER: &str = "X-DocBaseToken";

/// Upper bound for a single request. A timeout surfaces as a network error.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Line that opens and closes the front-matter block.
pub const FRONT_MATTER_DELIMITER: &str = "---";

/// Front-matter key holding the DocBase post id.
pub const NOTE_ID_KEY: &str = "docbase_note_id";

/// Suffix of the lock file placed next to a document while it is synced.
///
/// Used in: `infrastructure/file_writer.rs`
pub const LOCK_SUFFIX: &str = ".docbase-sync.lock";

/// How often and how long to wait for a busy document lock.
pub const LOCK_MAX_ATTEMPTS: u32 = 20;
pub const LOCK_WAIT_MS: u64 = 100;

/// Age after which a lock file without a readable PID is treated as abandoned.
/// Well above the time one request may take.
///
/// Used in: `infrastructure/file_writer.rs`
pub const LOCK_STALE_SECS: u64 = DEFAULT_TIMEOUT_SECS * 4;

/// Environment overrides for the credentials stored in the config file.
pub const ENV_ACCESS_TOKEN: &str = "DOCBASE_ACCESS_TOKEN";
pub const ENV_TEAM_ID: &str = "DOCBASE_TEAM_ID";
