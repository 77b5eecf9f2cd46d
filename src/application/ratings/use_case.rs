use crate::application::MAX_STORE_RETRIES;
use crate::domain::material::repository::MaterialRepository;
use crate::domain::rating::{
    aggregate::RatingAggregate, repository::RatingRepository, value_objects::RatingValue,
};
use crate::domain::shared::errors::DomainError;
use crate::domain::user::entity::UserRef;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Records star ratings and derives their aggregates.
///
/// Aggregates are recomputed from the stored rows after every write; no running
/// average is kept. An overwrite replaces the earlier vote in the counts, and the
/// returned aggregate reflects whatever the store committed last.
pub struct RatingService {
    ratings: Arc<dyn RatingRepository>,
    materials: Arc<dyn MaterialRepository>,
}

impl RatingService {
    pub fn new(ratings: Arc<dyn RatingRepository>, materials: Arc<dyn MaterialRepository>) -> Self {
        Self { ratings, materials }
    }

    /// Records `user`'s vote for the material, replacing any earlier vote, and
    /// returns the refreshed aggregate including the caller's rating.
    ///
    /// # Errors
    /// - `ValidationError` when `value` is outside 1..=5 (nothing is read or written)
    /// - `NotFound` when the material does not exist (nothing is written)
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn submit_rating(
        &self,
        material_id: i64,
        user: &UserRef,
        value: i32,
    ) -> Result<RatingAggregate, DomainError> {
        let value = RatingValue::new(value)?;

        if !self.materials.exists_by_id(material_id).await? {
            return Err(DomainError::not_found("Material", material_id));
        }

        self.upsert(material_id, user.id, value).await?;
        info!(value = value.get(), "rating recorded");

        self.get_rating_aggregate(material_id, Some(user.id)).await
    }

    /// Update-in-place when the user already voted, insert otherwise. Losing
    /// the insert race to a concurrent submission turns into an update of the
    /// winner's row, so the last committed write wins and no duplicate appears.
    async fn upsert(
        &self,
        material_id: i64,
        user_id: Uuid,
        value: RatingValue,
    ) -> Result<(), DomainError> {
        for attempt in 0..MAX_STORE_RETRIES {
            match self.ratings.find_by_key(material_id, user_id).await? {
                Some(existing) => {
                    if self.ratings.update_value(existing.id, value).await? {
                        debug!(attempt, rating_id = existing.id, "rating overwritten");
                        return Ok(());
                    }
                    debug!(attempt, rating_id = existing.id, "rating vanished before update");
                }
                None => match self.ratings.insert(material_id, user_id, value).await {
                    Ok(created) => {
                        debug!(attempt, rating_id = created.id, "rating inserted");
                        return Ok(());
                    }
                    Err(DomainError::Conflict(reason)) => {
                        debug!(attempt, %reason, "lost rating insert race, re-reading");
                    }
                    Err(e) => return Err(e),
                },
            }
        }

        warn!(attempts = MAX_STORE_RETRIES, "rating upsert gave up under contention");
        Err(DomainError::Conflict(format!(
            "rating on material {} is changing too quickly, try again",
            material_id
        )))
    }

    /// Aggregate over every rating of the material, with the caller's own
    /// rating attached when `user_id` is given and they have voted.
    pub async fn get_rating_aggregate(
        &self,
        material_id: i64,
        user_id: Option<Uuid>,
    ) -> Result<RatingAggregate, DomainError> {
        let distribution = self.ratings.distribution_for(material_id).await?;
        let user_rating = match user_id {
            Some(user_id) => self
                .ratings
                .find_by_key(material_id, user_id)
                .await?
                .map(|r| r.value),
            None => None,
        };
        Ok(RatingAggregate::from_distribution(&distribution).with_user_rating(user_rating))
    }

    /// Aggregates for a page of materials from one grouped query. Materials
    /// without ratings are absent; default them with [`RatingAggregate::empty`].
    #[instrument(skip(self, material_ids), fields(requested = material_ids.len()))]
    pub async fn get_rating_aggregates_batch(
        &self,
        material_ids: &[i64],
    ) -> Result<HashMap<i64, RatingAggregate>, DomainError> {
        let ids: Vec<i64> = material_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let distributions = self.ratings.distributions_for(&ids).await?;
        Ok(distributions
            .into_iter()
            .filter(|(_, distribution)| !distribution.is_empty())
            .map(|(id, distribution)| (id, RatingAggregate::from_distribution(&distribution)))
            .collect())
    }
}
