use crate::domain::{
    shared::errors::DomainError,
    user::{entity::UserRef, repository::UserRepository},
};
use crate::infrastructure::database::errors::map_sqlx_error;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxUserRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRef>, DomainError> {
        let row = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT id, display_name FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(|(id, name)| UserRef::new(id, name)))
    }
}
