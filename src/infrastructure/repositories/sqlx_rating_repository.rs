use crate::domain::{
    rating::{
        aggregate::StarDistribution, entity::Rating, repository::RatingRepository,
        value_objects::RatingValue,
    },
    shared::errors::DomainError,
};
use crate::infrastructure::database::errors::map_sqlx_error;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

#[derive(FromRow)]
struct RatingRow {
    id: i64,
    material_id: i64,
    user_id: Uuid,
    value: i32,
}

impl From<RatingRow> for Rating {
    fn from(r: RatingRow) -> Self {
        Rating {
            id: r.id,
            material_id: r.material_id,
            user_id: r.user_id,
            value: r.value,
        }
    }
}

pub struct SqlxRatingRepository {
    pub pool: PgPool,
}

impl SqlxRatingRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxRatingRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl RatingRepository for SqlxRatingRepository {
    async fn find_by_key(
        &self,
        material_id: i64,
        user_id: Uuid,
    ) -> Result<Option<Rating>, DomainError> {
        let row = sqlx::query_as::<_, RatingRow>(
            "SELECT id, material_id, user_id, value FROM ratings \
             WHERE material_id = $1 AND user_id = $2",
        )
        .bind(material_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Rating::from))
    }

    async fn insert(
        &self,
        material_id: i64,
        user_id: Uuid,
        value: RatingValue,
    ) -> Result<Rating, DomainError> {
        let row = sqlx::query_as::<_, RatingRow>(
            "INSERT INTO ratings (material_id, user_id, value) VALUES ($1, $2, $3) \
             RETURNING id, material_id, user_id, value",
        )
        .bind(material_id)
        .bind(user_id)
        .bind(value.get())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_value(&self, id: i64, value: RatingValue) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE ratings SET value = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(value.get())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() == 1)
    }

    async fn distribution_for(&self, material_id: i64) -> Result<StarDistribution, DomainError> {
        let rows = sqlx::query_as::<_, (i32, i64)>(
            "SELECT value, COUNT(*)::bigint FROM ratings WHERE material_id = $1 GROUP BY value",
        )
        .bind(material_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut distribution = StarDistribution::new();
        for (star, count) in rows {
            distribution.add(star, count);
        }
        Ok(distribution)
    }

    async fn distributions_for(
        &self,
        material_ids: &[i64],
    ) -> Result<HashMap<i64, StarDistribution>, DomainError> {
        let rows = sqlx::query_as::<_, (i64, i32, i64)>(
            "SELECT material_id, value, COUNT(*)::bigint FROM ratings \
             WHERE material_id = ANY($1) \
             GROUP BY material_id, value",
        )
        .bind(material_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut distributions: HashMap<i64, StarDistribution> = HashMap::new();
        for (material_id, star, count) in rows {
            distributions.entry(material_id).or_default().add(star, count);
        }
        Ok(distributions)
    }
}
