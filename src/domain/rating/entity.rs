use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's vote on one material. At most one row exists per
/// `(material_id, user_id)`; resubmitting overwrites `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub material_id: i64,
    pub user_id: Uuid,
    pub value: i32,
}
