use crate::domain::comment::entity::Comment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddCommentRequest {
    pub content: String,
}

/// Read-side shape of a comment. `like_count` is filled in by the aggregator
/// from one batched count per page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            author: comment.author.display_name,
            created_at: comment.created_at,
            like_count: 0,
        }
    }
}
