use super::entity::{Like, NewLike};
use super::target::{Target, TargetType};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Durable like rows keyed by `(user, target)`.
///
/// Implementations must enforce the natural key themselves: `insert` returns
/// [`DomainError::Conflict`] when a row for the same user and target already exists.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn find_by_key(&self, user_id: Uuid, target: Target)
    -> Result<Option<Like>, DomainError>;

    async fn insert(&self, like: NewLike) -> Result<Like, DomainError>;

    /// Returns `false` when the row was already gone.
    async fn delete_by_id(&self, id: i64) -> Result<bool, DomainError>;

    async fn exists_by_key(&self, user_id: Uuid, target: Target) -> Result<bool, DomainError>;

    async fn count_by_target(&self, target: Target) -> Result<i64, DomainError>;

    /// Grouped counts in one query. Targets without likes are absent from the map.
    async fn count_by_targets(
        &self,
        kind: TargetType,
        target_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, DomainError>;

    /// The subset of `target_ids` the user has liked.
    async fn find_liked_among(
        &self,
        user_id: Uuid,
        kind: TargetType,
        target_ids: &[i64],
    ) -> Result<HashSet<i64>, DomainError>;
}
