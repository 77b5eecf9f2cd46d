use crate::application::MAX_STORE_RETRIES;
use crate::domain::like::{
    entity::NewLike,
    repository::LikeRepository,
    target::{Target, TargetType},
};
use crate::domain::shared::errors::DomainError;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Flips and counts likes on any [`Target`].
///
/// Toggle correctness rests on the store's natural-key uniqueness, not on the
/// read that precedes the write. When a write loses a race (the insert hits the
/// unique key, or the row to delete is already gone) the service re-reads and
/// acts on whatever state the winner left behind. Every call therefore ends with
/// exactly one successful insert or delete, and N calls leave the row present
/// iff N is odd.
pub struct LikeService {
    repository: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(repository: Arc<dyn LikeRepository>) -> Self {
        Self { repository }
    }

    /// Flips the caller's like on `target` and returns the new state.
    #[instrument(skip(self, target), fields(target = %target))]
    pub async fn toggle_like(&self, user_id: Uuid, target: Target) -> Result<bool, DomainError> {
        for attempt in 0..MAX_STORE_RETRIES {
            match self.repository.find_by_key(user_id, target).await? {
                Some(existing) => {
                    if self.repository.delete_by_id(existing.id).await? {
                        debug!(attempt, "like removed");
                        return Ok(false);
                    }
                    debug!(attempt, like_id = existing.id, "like vanished before delete, re-reading");
                }
                None => {
                    let like = NewLike {
                        user_id,
                        target,
                        created_at: Utc::now(),
                    };
                    match self.repository.insert(like).await {
                        Ok(created) => {
                            debug!(attempt, like_id = created.id, "like recorded");
                            return Ok(true);
                        }
                        Err(DomainError::Conflict(reason)) => {
                            debug!(attempt, %reason, "lost insert race, re-reading");
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        warn!(attempts = MAX_STORE_RETRIES, "like toggle gave up under contention");
        Err(DomainError::Conflict(format!(
            "like on {} is changing too quickly, try again",
            target
        )))
    }

    pub async fn count_likes(&self, target: Target) -> Result<i64, DomainError> {
        self.repository.count_by_target(target).await
    }

    /// Like counts for many targets of one kind in a single store round-trip.
    /// Targets nobody liked are absent; look them up with `unwrap_or(0)`.
    #[instrument(skip(self, target_ids), fields(requested = target_ids.len()))]
    pub async fn count_likes_batch(
        &self,
        kind: TargetType,
        target_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, DomainError> {
        let ids = distinct(target_ids);
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.repository.count_by_targets(kind, &ids).await
    }

    pub async fn is_liked_by(&self, user_id: Uuid, target: Target) -> Result<bool, DomainError> {
        self.repository.exists_by_key(user_id, target).await
    }

    /// Which of `target_ids` the user has liked, in one store round-trip.
    pub async fn liked_among(
        &self,
        user_id: Uuid,
        kind: TargetType,
        target_ids: &[i64],
    ) -> Result<HashSet<i64>, DomainError> {
        let ids = distinct(target_ids);
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        self.repository.find_liked_among(user_id, kind, &ids).await
    }
}

fn distinct(ids: &[i64]) -> Vec<i64> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}
