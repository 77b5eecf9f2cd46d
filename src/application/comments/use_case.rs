use super::dto::CommentView;
use crate::domain::comment::{
    entity::{Comment, NewComment},
    repository::CommentRepository,
};
use crate::domain::material::repository::MaterialRepository;
use crate::domain::shared::{
    errors::DomainError,
    pagination::{PaginatedResponse, PaginationRequest},
};
use crate::domain::user::entity::UserRef;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    materials: Arc<dyn MaterialRepository>,
    max_length: usize,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        materials: Arc<dyn MaterialRepository>,
        max_length: usize,
    ) -> Self {
        Self {
            comments,
            materials,
            max_length,
        }
    }

    #[instrument(skip(self, content, author), fields(author_id = %author.id))]
    pub async fn add_comment(
        &self,
        material_id: i64,
        content: &str,
        author: &UserRef,
    ) -> Result<CommentView, DomainError> {
        let content = self.validate_content(content)?;

        if !self.materials.exists_by_id(material_id).await? {
            return Err(DomainError::not_found("Material", material_id));
        }

        let comment = self
            .comments
            .insert(NewComment {
                material_id,
                author: author.clone(),
                content,
                created_at: Utc::now(),
            })
            .await?;
        info!(comment_id = comment.id, "comment added");

        Ok(CommentView::from(comment))
    }

    /// Newest-first page of comments with `like_count` left at zero.
    pub async fn list_comments(
        &self,
        material_id: i64,
        page: PaginationRequest,
    ) -> Result<PaginatedResponse<CommentView>, DomainError> {
        let (comments, total) = self
            .comments
            .find_page_by_material(material_id, page)
            .await?;
        Ok(PaginatedResponse::new(comments, total, page).map(CommentView::from))
    }

    pub async fn find_comment(&self, comment_id: i64) -> Result<Option<Comment>, DomainError> {
        self.comments.find_by_id(comment_id).await
    }

    fn validate_content(&self, content: &str) -> Result<String, DomainError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::ValidationError(
                "Comment cannot be empty".into(),
            ));
        }
        if trimmed.chars().count() > self.max_length {
            return Err(DomainError::ValidationError(format!(
                "Comment must be {} characters or less",
                self.max_length
            )));
        }
        Ok(trimmed.to_string())
    }
}
