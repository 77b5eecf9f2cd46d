use crate::domain::shared::errors::DomainError;
use crate::domain::user::entity::UserRef;
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

/// An uploaded study material: the base entity every engagement view hangs off.
///
/// The engine treats the catalogue as an external collaborator. It reads
/// materials, checks their existence before any like/rating/comment write,
/// and bumps the two usage counters through atomic store statements.
///
/// # Invariants
/// - `id` is unique among materials (but may collide with comment ids)
/// - `total_view` and `total_download` only ever grow, one step per request
/// - `file_name` is the object-storage key of the uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Store-assigned identifier
    pub id: i64,

    /// Display title
    pub title: String,

    /// Free-form description provided by the uploader (optional)
    pub description: Option<String>,

    /// What kind of document this is
    pub material_type: MaterialType,

    /// Knowledge area the material belongs to
    pub area: Area,

    /// Uploader-provided tags
    pub keywords: Vec<String>,

    /// Object-storage key of the uploaded file
    pub file_name: String,

    /// Human readable size, e.g. "1.2 MB" (optional)
    pub file_size: Option<String>,

    /// MIME type reported at upload (optional)
    pub file_type: Option<String>,

    /// Uploader
    pub author: UserRef,

    /// Number of download-reference requests served
    pub total_download: i64,

    /// Number of detail page views served
    pub total_view: i64,

    /// Number of comments under this material
    pub comment_count: i64,

    /// Upload timestamp
    pub created_at: DateTime<Utc>,
}

macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($code:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        #[ts(export)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable storage and query-string code.
            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Human readable label for views.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_uppercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.code() == normalized)
                    .ok_or_else(|| {
                        DomainError::ValidationError(format!(
                            "unknown {}: {}",
                            stringify!($name),
                            s.trim()
                        ))
                    })
            }
        }
    };
}

labelled_enum!(
    /// Kind of document a material holds.
    MaterialType {
        Article => ("ARTICLE", "Article"),
        Image => ("IMAGE", "Image"),
        Tcc => ("TCC", "Final Paper"),
        Notes => ("NOTES", "Notes"),
        Presentation => ("PRESENTATION", "Presentation"),
        Exercise => ("EXERCISE", "Exercise List"),
        Other => ("OTHER", "Other"),
    }
);

labelled_enum!(
    /// Knowledge area used for browsing and filtering.
    Area {
        ComputerScience => ("COMPUTER_SCIENCE", "Computer Science"),
        Engineering => ("ENGINEERING", "Engineering"),
        Medicine => ("MEDICINE", "Medicine"),
        Business => ("BUSINESS", "Business"),
        Law => ("LAW", "Law"),
        Psychology => ("PSYCHOLOGY", "Psychology"),
        Education => ("EDUCATION", "Education"),
        Arts => ("ARTS", "Arts"),
        Other => ("OTHER", "Other"),
    }
);

/// Listing order. Every variant is made total with `id DESC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum MaterialSort {
    #[default]
    Recent,
    Downloads,
    Views,
}

impl FromStr for MaterialSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "recent" | "newest" => Ok(Self::Recent),
            "downloads" | "trending" => Ok(Self::Downloads),
            "views" => Ok(Self::Views),
            other => Err(DomainError::ValidationError(format!(
                "unknown sort order: {}",
                other
            ))),
        }
    }
}

/// Catalogue filters for the listing path. Empty vectors mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialFilters {
    /// Case-insensitive substring on title or description
    pub search: Option<String>,
    pub types: Vec<MaterialType>,
    pub areas: Vec<Area>,
    /// Keep materials created within the last N years
    pub date_range_years: Option<i32>,
    /// Keep materials downloaded at least this many times
    pub min_downloads: Option<i64>,
    /// Keep materials uploaded by this user
    pub author_id: Option<Uuid>,
    pub sort: MaterialSort,
}

impl MaterialFilters {
    /// Lower bound on `created_at` implied by `date_range_years`.
    ///
    /// `Some(0)` keeps only materials created from `now` on. A range reaching
    /// past the earliest representable date imposes no bound at all.
    pub fn created_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let years = u32::try_from(self.date_range_years?).ok()?;
        now.checked_sub_months(Months::new(years.checked_mul(12)?))
    }

    /// Trimmed search text, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Whether `material` passes every filter. Used by stores that cannot push
    /// filtering down into a query.
    pub fn matches(&self, material: &Material, now: DateTime<Utc>) -> bool {
        if let Some(term) = self.search_term() {
            let term = term.to_lowercase();
            let in_title = material.title.to_lowercase().contains(&term);
            let in_description = material
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term));
            if !in_title && !in_description {
                return false;
            }
        }
        if !self.types.is_empty() && !self.types.contains(&material.material_type) {
            return false;
        }
        if !self.areas.is_empty() && !self.areas.contains(&material.area) {
            return false;
        }
        if self
            .created_after(now)
            .is_some_and(|after| material.created_at < after)
        {
            return false;
        }
        if self
            .min_downloads
            .is_some_and(|min| material.total_download < min)
        {
            return false;
        }
        if self
            .author_id
            .is_some_and(|author| material.author.id != author)
        {
            return false;
        }
        true
    }
}
