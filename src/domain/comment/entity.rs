use crate::domain::user::entity::UserRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment under exactly one material. Immutable once stored; its likes live
/// in the like relation with a `COMMENT` target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub material_id: i64,
    pub author: UserRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub material_id: i64,
    pub author: UserRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
