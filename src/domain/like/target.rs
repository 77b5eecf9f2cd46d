use crate::domain::shared::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// The kinds of entity a like can attach to.
///
/// Ids are only unique within one kind, so a `TargetType` must always travel
/// together with its id (see [`Target`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum TargetType {
    Material,
    Comment,
}

impl TargetType {
    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Material => "MATERIAL",
            Self::Comment => "COMMENT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Material => "Material",
            Self::Comment => "Comment",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MATERIAL" => Ok(Self::Material),
            "COMMENT" => Ok(Self::Comment),
            other => Err(DomainError::ValidationError(format!(
                "unknown like target type: {}",
                other
            ))),
        }
    }
}

/// Composite key of a likeable entity. Equality and hashing cover both parts,
/// so a material and a comment sharing a numeric id never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Target {
    pub kind: TargetType,
    pub id: i64,
}

impl Target {
    pub fn new(kind: TargetType, id: i64) -> Self {
        Self { kind, id }
    }

    pub fn material(id: i64) -> Self {
        Self::new(TargetType::Material, id)
    }

    pub fn comment(id: i64) -> Self {
        Self::new(TargetType::Comment, id)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
