use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

use blog_core::RepoError;

use crate::config::StorageConfig;
use crate::timeout::bounded;

/// Scheme assumed for bare `user:pass@host:port/db` descriptors.
const DEFAULT_SCHEME: &str = "postgres://";

/// Turn a connection descriptor into a URL SeaORM accepts.
///
/// Descriptors that already carry a scheme are kept as they are.
pub fn normalize_descriptor(descriptor: &str) -> String {
    let descriptor = descriptor.trim();
    if descriptor.contains("://") {
        descriptor.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{descriptor}")
    }
}

/// Map a SeaORM error onto the repository error kinds.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err {
        DbErr::RecordNotFound(what) => RepoError::not_found(what),
        DbErr::Type(msg) | DbErr::Json(msg) => RepoError::decode(msg),
        err @ DbErr::TryIntoErr { .. } => RepoError::decode(err.to_string()),
        err @ (DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) => RepoError::connection(err.to_string()),
        other => RepoError::connection(other.to_string()),
    }
}

/// Open the bounded pool and check the server answers.
pub async fn connect_relational(config: &StorageConfig) -> Result<DbConn, RepoError> {
    tracing::info!("Initializing relational database connection...");

    let opts = ConnectOptions::new(normalize_descriptor(&config.descriptor))
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .connect_timeout(config.op_timeout)
        .acquire_timeout(config.op_timeout)
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .to_owned();

    let db = bounded(config.op_timeout, "connect", async {
        Database::connect(opts).await.map_err(map_db_err)
    })
    .await?;

    bounded(config.op_timeout, "ping", async {
        db.ping().await.map_err(map_db_err)
    })
    .await?;

    tracing::info!(
        "Relational database connected (pool: {})",
        config.max_connections
    );
    Ok(db)
}
