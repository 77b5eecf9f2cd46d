use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitRatingRequest {
    /// Star value, 1 through 5.
    pub value: i32,
}
