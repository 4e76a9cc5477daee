use std::time::Duration;

/// Relational pool bound (open connections).
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default bound on every store round-trip.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything a backend needs at construction.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Connection descriptor; its shape picks the backend.
    pub descriptor: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Deadline applied to each individual store call.
    pub op_timeout: Duration,
    /// Example posts to insert at start-up. `None` skips seeding.
    pub seed_posts: Option<i64>,
    /// Remove all posts before seeding.
    pub clear_storage: bool,
}

impl StorageConfig {
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: 1,
            op_timeout: DEFAULT_OP_TIMEOUT,
            seed_posts: None,
            clear_storage: false,
        }
    }
}
