use async_trait::async_trait;
use engagement_api::domain::{
    like::{
        entity::{Like, NewLike},
        repository::LikeRepository,
        target::{Target, TargetType},
    },
    rating::{
        aggregate::StarDistribution, entity::Rating, repository::RatingRepository,
        value_objects::RatingValue,
    },
    shared::errors::DomainError,
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

mockall::mock! {
    pub Likes {}

    #[async_trait]
    impl LikeRepository for Likes {
        async fn find_by_key(&self, user_id: Uuid, target: Target) -> Result<Option<Like>, DomainError>;
        async fn insert(&self, like: NewLike) -> Result<Like, DomainError>;
        async fn delete_by_id(&self, id: i64) -> Result<bool, DomainError>;
        async fn exists_by_key(&self, user_id: Uuid, target: Target) -> Result<bool, DomainError>;
        async fn count_by_target(&self, target: Target) -> Result<i64, DomainError>;
        async fn count_by_targets(
            &self,
            kind: TargetType,
            target_ids: &[i64],
        ) -> Result<HashMap<i64, i64>, DomainError>;
        async fn find_liked_among(
            &self,
            user_id: Uuid,
            kind: TargetType,
            target_ids: &[i64],
        ) -> Result<HashSet<i64>, DomainError>;
    }
}

mockall::mock! {
    pub Ratings {}

    #[async_trait]
    impl RatingRepository for Ratings {
        async fn find_by_key(&self, material_id: i64, user_id: Uuid) -> Result<Option<Rating>, DomainError>;
        async fn insert(&self, material_id: i64, user_id: Uuid, value: RatingValue) -> Result<Rating, DomainError>;
        async fn update_value(&self, id: i64, value: RatingValue) -> Result<bool, DomainError>;
        async fn distribution_for(&self, material_id: i64) -> Result<StarDistribution, DomainError>;
        async fn distributions_for(
            &self,
            material_ids: &[i64],
        ) -> Result<HashMap<i64, StarDistribution>, DomainError>;
    }
}
