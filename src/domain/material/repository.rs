use super::entity::{Material, MaterialFilters};
use crate::domain::shared::{errors::DomainError, pagination::PaginationRequest};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait MaterialRepository: Send + Sync {
    async fn exists_by_id(&self, id: i64) -> Result<bool, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Material>, DomainError>;

    /// One page of materials matching `filters`, plus the total match count.
    async fn find_page(
        &self,
        filters: &MaterialFilters,
        page: PaginationRequest,
    ) -> Result<(Vec<Material>, i64), DomainError>;

    /// Atomically bumps the view counter. Returns `false` when the material does not exist.
    async fn increment_view_count(&self, id: i64) -> Result<bool, DomainError>;

    /// Atomically bumps the download counter and returns the stored file reference,
    /// or `None` when the material does not exist.
    async fn record_download(&self, id: i64) -> Result<Option<String>, DomainError>;

    /// The `limit` most used keywords, most frequent first, ties alphabetical.
    async fn top_keywords(&self, limit: i64) -> Result<Vec<String>, DomainError>;

    /// Deletes the material only if `author_id` uploaded it. Comments, ratings
    /// and likes on the material and its comments go with it. Returns `false`
    /// when no row matched, whether absent or owned by someone else.
    async fn delete_owned(&self, id: i64, author_id: Uuid) -> Result<bool, DomainError>;
}
