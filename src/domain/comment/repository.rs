use super::entity::{Comment, NewComment};
use crate::domain::shared::{errors::DomainError, pagination::PaginationRequest};
use async_trait::async_trait;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: NewComment) -> Result<Comment, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DomainError>;

    /// Newest first, ties broken by id so pages never overlap or skip.
    /// Returns the page and the total number of comments on the material.
    async fn find_page_by_material(
        &self,
        material_id: i64,
        page: PaginationRequest,
    ) -> Result<(Vec<Comment>, i64), DomainError>;
}
