use crate::domain::shared::errors::DomainError;
use tracing::{error, warn};

/// Maps a store failure onto the domain taxonomy.
///
/// Natural-key violations become `Conflict` so services can re-read and retry;
/// a vanished foreign key means the parent row is gone, which callers see as
/// `NotFound`. Everything else is treated as the store being unavailable.
pub fn map_sqlx_error(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::Conflict(db.constraint().unwrap_or("unique key").to_string())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            warn!(constraint = ?db.constraint(), "write referenced a missing row");
            DomainError::NotFound("Referenced entity no longer exists".into())
        }
        sqlx::Error::Database(db) if db.is_check_violation() => {
            DomainError::ValidationError(db.message().to_string())
        }
        sqlx::Error::PoolTimedOut => {
            warn!("Database connection pool exhausted, timing out");
            DomainError::InfrastructureError("connection pool exhausted".into())
        }
        _ => {
            error!(database_error = %err);
            DomainError::InfrastructureError(err.to_string())
        }
    }
}
