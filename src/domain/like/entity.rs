use super::target::Target;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single user's like on a target. The row's existence is the liked state;
/// there is no active/inactive flag and un-liking deletes the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: i64,
    pub user_id: Uuid,
    pub target: Target,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLike {
    pub user_id: Uuid,
    pub target: Target,
    pub created_at: DateTime<Utc>,
}
