use super::dto::{DownloadResponse, MaterialView};
use crate::application::{
    comments::{dto::CommentView, use_case::CommentService},
    likes::use_case::LikeService,
    ratings::use_case::RatingService,
};
use crate::domain::like::target::{Target, TargetType};
use crate::domain::material::{
    entity::{MaterialFilters, MaterialSort},
    repository::MaterialRepository,
};
use crate::domain::rating::aggregate::RatingAggregate;
use crate::domain::shared::{
    errors::DomainError,
    pagination::{PaginatedResponse, PaginationRequest},
};
use crate::domain::user::entity::UserRef;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// How many keywords the trending-topics listing returns.
pub const TRENDING_TOPICS_LIMIT: i64 = 10;

/// Composes materials and comments with their like and rating data, and
/// exposes the write paths the HTTP layer calls.
///
/// List paths collect the page's ids and issue each engagement lookup once
/// per page, never once per row. Missing entries in the batched results mean
/// "no interactions" and default to zero.
pub struct EngagementAggregator {
    materials: Arc<dyn MaterialRepository>,
    likes: LikeService,
    ratings: RatingService,
    comments: CommentService,
}

impl EngagementAggregator {
    pub fn new(
        materials: Arc<dyn MaterialRepository>,
        likes: LikeService,
        ratings: RatingService,
        comments: CommentService,
    ) -> Self {
        Self {
            materials,
            likes,
            ratings,
            comments,
        }
    }

    /// Material detail with rating aggregate, like count and the caller's own
    /// like/rating. Counts exactly one view per successful call.
    #[instrument(skip(self, viewer), fields(viewer = ?viewer.map(|u| u.id)))]
    pub async fn get_material_detail(
        &self,
        material_id: i64,
        viewer: Option<&UserRef>,
    ) -> Result<MaterialView, DomainError> {
        if !self.materials.increment_view_count(material_id).await? {
            return Err(DomainError::not_found("Material", material_id));
        }
        let material = self
            .materials
            .find_by_id(material_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Material", material_id))?;

        let target = Target::material(material_id);
        let viewer_id = viewer.map(|u| u.id);
        let (rating, like_count, liked) = tokio::try_join!(
            self.ratings.get_rating_aggregate(material_id, viewer_id),
            self.likes.count_likes(target),
            async {
                match viewer_id {
                    Some(user_id) => self.likes.is_liked_by(user_id, target).await,
                    None => Ok(false),
                }
            },
        )?;

        Ok(MaterialView::compose(material, like_count, liked, rating))
    }

    #[instrument(skip(self, filters, viewer), fields(limit = page.limit, offset = page.offset))]
    pub async fn list_materials(
        &self,
        filters: &MaterialFilters,
        page: PaginationRequest,
        viewer: Option<&UserRef>,
    ) -> Result<PaginatedResponse<MaterialView>, DomainError> {
        let (materials, total) = self.materials.find_page(filters, page).await?;
        let ids: Vec<i64> = materials.iter().map(|m| m.id).collect();
        debug!(found = ids.len(), total, "materials page fetched");

        let (mut ratings, like_counts, liked) = tokio::try_join!(
            self.ratings.get_rating_aggregates_batch(&ids),
            self.likes.count_likes_batch(TargetType::Material, &ids),
            async {
                match viewer {
                    Some(user) => {
                        self.likes
                            .liked_among(user.id, TargetType::Material, &ids)
                            .await
                    }
                    None => Ok(HashSet::new()),
                }
            },
        )?;

        let items = materials
            .into_iter()
            .map(|material| {
                let id = material.id;
                let rating = ratings.remove(&id).unwrap_or_else(RatingAggregate::empty);
                let like_count = like_counts.get(&id).copied().unwrap_or(0);
                MaterialView::compose(material, like_count, liked.contains(&id), rating)
            })
            .collect();

        Ok(PaginatedResponse::new(items, total, page))
    }

    /// Most downloaded materials first, with the same batched enrichment as
    /// [`Self::list_materials`].
    pub async fn list_trending(
        &self,
        page: PaginationRequest,
        viewer: Option<&UserRef>,
    ) -> Result<PaginatedResponse<MaterialView>, DomainError> {
        let filters = MaterialFilters {
            sort: MaterialSort::Downloads,
            ..Default::default()
        };
        self.list_materials(&filters, page, viewer).await
    }

    /// The caller's own uploads, newest first.
    pub async fn list_own_materials(
        &self,
        user: &UserRef,
        page: PaginationRequest,
    ) -> Result<PaginatedResponse<MaterialView>, DomainError> {
        let filters = MaterialFilters {
            author_id: Some(user.id),
            ..Default::default()
        };
        self.list_materials(&filters, page, Some(user)).await
    }

    pub async fn trending_topics(&self) -> Result<Vec<String>, DomainError> {
        self.materials.top_keywords(TRENDING_TOPICS_LIMIT).await
    }

    /// Removes a material together with its comments, ratings and likes.
    /// Only the uploader may delete; anyone else gets `Forbidden`.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn delete_material(&self, material_id: i64, user: &UserRef) -> Result<(), DomainError> {
        if self.materials.delete_owned(material_id, user.id).await? {
            info!(material_id, "material deleted");
            return Ok(());
        }
        if self.materials.exists_by_id(material_id).await? {
            Err(DomainError::Forbidden(
                "Only the uploader may delete this material".into(),
            ))
        } else {
            Err(DomainError::not_found("Material", material_id))
        }
    }

    /// Newest-first comments with like counts from a single batched lookup.
    #[instrument(skip(self), fields(limit = page.limit, offset = page.offset))]
    pub async fn list_comments(
        &self,
        material_id: i64,
        page: PaginationRequest,
    ) -> Result<PaginatedResponse<CommentView>, DomainError> {
        self.ensure_material(material_id).await?;

        let mut comments = self.comments.list_comments(material_id, page).await?;
        let ids: Vec<i64> = comments.items.iter().map(|c| c.id).collect();
        let like_counts = self
            .likes
            .count_likes_batch(TargetType::Comment, &ids)
            .await?;

        for comment in &mut comments.items {
            comment.like_count = like_counts.get(&comment.id).copied().unwrap_or(0);
        }
        Ok(comments)
    }

    pub async fn toggle_like_on_material(
        &self,
        material_id: i64,
        user: &UserRef,
    ) -> Result<bool, DomainError> {
        self.ensure_material(material_id).await?;
        self.likes
            .toggle_like(user.id, Target::material(material_id))
            .await
    }

    /// The comment must exist under `material_id`; a comment id from another
    /// material is reported as not found.
    pub async fn toggle_like_on_comment(
        &self,
        material_id: i64,
        comment_id: i64,
        user: &UserRef,
    ) -> Result<bool, DomainError> {
        let belongs = self
            .comments
            .find_comment(comment_id)
            .await?
            .is_some_and(|c| c.material_id == material_id);
        if !belongs {
            return Err(DomainError::NotFound(format!(
                "Comment {} not found on material {}",
                comment_id, material_id
            )));
        }
        self.likes
            .toggle_like(user.id, Target::comment(comment_id))
            .await
    }

    pub async fn submit_rating(
        &self,
        material_id: i64,
        user: &UserRef,
        value: i32,
    ) -> Result<RatingAggregate, DomainError> {
        self.ratings.submit_rating(material_id, user, value).await
    }

    pub async fn get_rating(
        &self,
        material_id: i64,
        viewer: Option<&UserRef>,
    ) -> Result<RatingAggregate, DomainError> {
        self.ensure_material(material_id).await?;
        self.ratings
            .get_rating_aggregate(material_id, viewer.map(|u| u.id))
            .await
    }

    pub async fn add_comment(
        &self,
        material_id: i64,
        content: &str,
        user: &UserRef,
    ) -> Result<CommentView, DomainError> {
        self.comments.add_comment(material_id, content, user).await
    }

    /// Counts one download and hands back the stored file reference.
    pub async fn download_material(&self, material_id: i64) -> Result<DownloadResponse, DomainError> {
        let file_name = self
            .materials
            .record_download(material_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Material", material_id))?;
        Ok(DownloadResponse { file_name })
    }

    async fn ensure_material(&self, material_id: i64) -> Result<(), DomainError> {
        if self.materials.exists_by_id(material_id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Material", material_id))
        }
    }
}
