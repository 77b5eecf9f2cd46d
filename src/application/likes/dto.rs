use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ToggleLikeResponse {
    /// State after the toggle: `true` means the caller now likes the target.
    pub liked: bool,
}
