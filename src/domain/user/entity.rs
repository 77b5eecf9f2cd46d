use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// The slice of a user the engagement engine needs: identity plus the name
/// shown next to their comments and uploads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserRef {
    pub id: Uuid,
    pub display_name: String,
}

impl UserRef {
    pub fn new(id: Uuid, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}
