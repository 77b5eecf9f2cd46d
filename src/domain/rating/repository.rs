use super::aggregate::StarDistribution;
use super::entity::Rating;
use super::value_objects::RatingValue;
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn find_by_key(
        &self,
        material_id: i64,
        user_id: Uuid,
    ) -> Result<Option<Rating>, DomainError>;

    /// Fails with [`DomainError::Conflict`] when the user already rated the material.
    async fn insert(
        &self,
        material_id: i64,
        user_id: Uuid,
        value: RatingValue,
    ) -> Result<Rating, DomainError>;

    /// Overwrites the value in place. Returns `false` when the row no longer exists.
    async fn update_value(&self, id: i64, value: RatingValue) -> Result<bool, DomainError>;

    /// Per-star counts over every rating of one material.
    async fn distribution_for(&self, material_id: i64) -> Result<StarDistribution, DomainError>;

    /// Grouped per-star counts in one query. Materials without ratings are absent.
    async fn distributions_for(
        &self,
        material_ids: &[i64],
    ) -> Result<HashMap<i64, StarDistribution>, DomainError>;
}
