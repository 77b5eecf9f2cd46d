use crate::domain::material::entity::{Area, Material, MaterialType};
use crate::domain::rating::aggregate::RatingAggregate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A material merged with its engagement data, as served by the detail and
/// listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaterialView {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub material_type: MaterialType,
    pub material_type_label: String,
    pub area: Area,
    pub area_label: String,
    pub keywords: Vec<String>,
    pub author: String,
    pub author_id: Uuid,
    pub file_name: String,
    pub file_size: Option<String>,
    pub file_type: Option<String>,
    pub total_download: i64,
    pub total_view: i64,
    pub comment_count: i64,
    pub like_count: i64,
    /// Whether the caller likes this material. Always `false` for anonymous callers.
    pub liked: bool,
    pub rating: RatingAggregate,
    pub created_at: DateTime<Utc>,
}

impl MaterialView {
    pub fn compose(material: Material, like_count: i64, liked: bool, rating: RatingAggregate) -> Self {
        Self {
            id: material.id,
            title: material.title,
            description: material.description,
            material_type: material.material_type,
            material_type_label: material.material_type.label().to_string(),
            area: material.area,
            area_label: material.area.label().to_string(),
            keywords: material.keywords,
            author: material.author.display_name,
            author_id: material.author.id,
            file_name: material.file_name,
            file_size: material.file_size,
            file_type: material.file_type,
            total_download: material.total_download,
            total_view: material.total_view,
            comment_count: material.comment_count,
            like_count,
            liked,
            rating,
            created_at: material.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DownloadResponse {
    /// Object-storage key of the material's file
    pub file_name: String,
}
