use crate::domain::{
    like::{
        entity::{Like, NewLike},
        repository::LikeRepository,
        target::{Target, TargetType},
    },
    shared::errors::DomainError,
};
use crate::infrastructure::database::errors::map_sqlx_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::{HashMap, HashSet};
use tracing::info;
use uuid::Uuid;

#[derive(FromRow)]
struct LikeRow {
    id: i64,
    user_id: Uuid,
    target_type: String,
    target_id: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<LikeRow> for Like {
    type Error = DomainError;

    fn try_from(r: LikeRow) -> Result<Self, Self::Error> {
        Ok(Like {
            id: r.id,
            user_id: r.user_id,
            target: Target::new(r.target_type.parse()?, r.target_id),
            created_at: r.created_at,
        })
    }
}

/// Likes in Postgres. The `likes_natural_key` unique constraint on
/// `(user_id, target_type, target_id)` arbitrates concurrent toggles.
pub struct SqlxLikeRepository {
    pub pool: PgPool,
}

impl SqlxLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxLikeRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for SqlxLikeRepository {
    async fn find_by_key(
        &self,
        user_id: Uuid,
        target: Target,
    ) -> Result<Option<Like>, DomainError> {
        sqlx::query_as::<_, LikeRow>(
            "SELECT id, user_id, target_type, target_id, created_at FROM likes \
             WHERE user_id = $1 AND target_type = $2 AND target_id = $3",
        )
        .bind(user_id)
        .bind(target.kind.as_str())
        .bind(target.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .map(Like::try_from)
        .transpose()
    }

    async fn insert(&self, like: NewLike) -> Result<Like, DomainError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO likes (user_id, target_type, target_id, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(like.user_id)
        .bind(like.target.kind.as_str())
        .bind(like.target.id)
        .bind(like.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(Like {
            id,
            user_id: like.user_id,
            target: like.target,
            created_at: like.created_at,
        })
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() == 1)
    }

    async fn exists_by_key(&self, user_id: Uuid, target: Target) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND target_type = $2 AND target_id = $3)"#,
        )
        .bind(user_id)
        .bind(target.kind.as_str())
        .bind(target.id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn count_by_target(&self, target: Target) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::bigint FROM likes WHERE target_type = $1 AND target_id = $2",
        )
        .bind(target.kind.as_str())
        .bind(target.id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn count_by_targets(
        &self,
        kind: TargetType,
        target_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, DomainError> {
        let rows = sqlx::query_as::<_, (i64, i64)>(
            "SELECT target_id, COUNT(*)::bigint FROM likes \
             WHERE target_type = $1 AND target_id = ANY($2) \
             GROUP BY target_id",
        )
        .bind(kind.as_str())
        .bind(target_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().collect())
    }

    async fn find_liked_among(
        &self,
        user_id: Uuid,
        kind: TargetType,
        target_ids: &[i64],
    ) -> Result<HashSet<i64>, DomainError> {
        let rows = sqlx::query_scalar::<_, i64>(
            "SELECT target_id FROM likes \
             WHERE user_id = $1 AND target_type = $2 AND target_id = ANY($3)",
        )
        .bind(user_id)
        .bind(kind.as_str())
        .bind(target_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().collect())
    }
}
