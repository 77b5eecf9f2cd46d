use crate::domain::{
    comment::{
        entity::{Comment, NewComment},
        repository::CommentRepository,
    },
    shared::{errors::DomainError, pagination::PaginationRequest},
    user::entity::UserRef,
};
use crate::infrastructure::database::errors::map_sqlx_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

#[derive(FromRow)]
struct CommentRow {
    id: i64,
    material_id: i64,
    author_id: Uuid,
    author_name: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(r: CommentRow) -> Self {
        Comment {
            id: r.id,
            material_id: r.material_id,
            author: UserRef::new(r.author_id, r.author_name),
            content: r.content,
            created_at: r.created_at,
        }
    }
}

pub struct SqlxCommentRepository {
    pub pool: PgPool,
}

impl SqlxCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxCommentRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn insert(&self, comment: NewComment) -> Result<Comment, DomainError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO comments (material_id, author_id, content, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(comment.material_id)
        .bind(comment.author.id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(Comment {
            id,
            material_id: comment.material_id,
            author: comment.author,
            content: comment.content,
            created_at: comment.created_at,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"SELECT c.id, c.material_id, c.author_id, u.display_name AS author_name,
                      c.content, c.created_at
               FROM comments c
               JOIN users u ON u.id = c.author_id
               WHERE c.id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Comment::from))
    }

    async fn find_page_by_material(
        &self,
        material_id: i64,
        page: PaginationRequest,
    ) -> Result<(Vec<Comment>, i64), DomainError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::bigint FROM comments WHERE material_id = $1",
        )
        .bind(material_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let rows = sqlx::query_as::<_, CommentRow>(
            r#"SELECT c.id, c.material_id, c.author_id, u.display_name AS author_name,
                      c.content, c.created_at
               FROM comments c
               JOIN users u ON u.id = c.author_id
               WHERE c.material_id = $1
               ORDER BY c.created_at DESC, c.id DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(material_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok((rows.into_iter().map(Comment::from).collect(), total))
    }
}
