use crate::{
    application::engagement::dto::{DownloadResponse, MaterialView},
    domain::{
        material::entity::{Area, MaterialFilters, MaterialSort, MaterialType},
        shared::pagination::{PaginatedResponse, PaginationRequest},
    },
    presentation::http::{
        errors::AppError,
        middleware::user::{optional_user, require_user},
        state::AppState,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, instrument, warn};

/// Plain `limit`/`offset` paging for listings without filters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    limit: Option<i64>,
    #[serde(default)]
    offset: i64,
}

impl PageQuery {
    pub fn page(&self, default_size: i64, max_size: i64) -> PaginationRequest {
        PaginationRequest::new(self.limit.unwrap_or(default_size), self.offset).normalized(max_size)
    }
}

/// Query parameters for the material listing.
///
/// `type` and `area` accept comma-separated codes, e.g. `?type=NOTES,TCC`.
#[derive(Debug, Default, Deserialize)]
pub struct MaterialListQuery {
    limit: Option<i64>,

    #[serde(default)]
    offset: i64,

    search: Option<String>,

    #[serde(rename = "type")]
    material_type: Option<String>,

    area: Option<String>,

    /// Keep materials created within the last N years
    date_range: Option<i32>,

    min_downloads: Option<i64>,

    /// "recent" (default), "downloads" or "views"
    sort: Option<String>,
}

fn parse_codes<T>(raw: Option<&str>) -> Result<Vec<T>, AppError>
where
    T: FromStr<Err = crate::domain::shared::errors::DomainError>,
{
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|code| code.parse::<T>().map_err(AppError::from))
        .collect()
}

impl MaterialListQuery {
    pub fn page(&self, default_size: i64, max_size: i64) -> PaginationRequest {
        let requested = PaginationRequest::new(self.limit.unwrap_or(default_size), self.offset);
        let page = requested.normalized(max_size);
        if page != requested {
            warn!(
                "Listing page clamped from {:?} to {:?}",
                requested, page
            );
        }
        page
    }

    pub fn filters(&self) -> Result<MaterialFilters, AppError> {
        if self.date_range.is_some_and(|years| years < 0) {
            return Err(AppError::BadRequest("date_range must not be negative".into()));
        }
        Ok(MaterialFilters {
            search: self.search.clone(),
            types: parse_codes::<MaterialType>(self.material_type.as_deref())?,
            areas: parse_codes::<Area>(self.area.as_deref())?,
            date_range_years: self.date_range,
            min_downloads: self.min_downloads,
            author_id: None,
            sort: self
                .sort
                .as_deref()
                .map(MaterialSort::from_str)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

#[instrument(skip(state, headers, params))]
pub async fn list_materials(
    State(state): State<AppState>,
    Query(params): Query<MaterialListQuery>,
    headers: HeaderMap,
) -> Result<Json<PaginatedResponse<MaterialView>>, AppError> {
    let filters = params.filters()?;
    let page = params.page(state.config.default_page_size, state.config.max_page_size);
    let viewer = optional_user(&state, &headers).await?;
    debug!(?filters, limit = page.limit, offset = page.offset, "listing materials");

    let response = state
        .engagement
        .list_materials(&filters, page, viewer.as_ref())
        .await?;
    Ok(Json(response))
}

pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<MaterialView>, AppError> {
    let viewer = optional_user(&state, &headers).await?;
    let view = state
        .engagement
        .get_material_detail(id, viewer.as_ref())
        .await?;
    Ok(Json(view))
}

pub async fn list_trending(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<Json<PaginatedResponse<MaterialView>>, AppError> {
    let page = params.page(state.config.default_page_size, state.config.max_page_size);
    let viewer = optional_user(&state, &headers).await?;
    Ok(Json(
        state.engagement.list_trending(page, viewer.as_ref()).await?,
    ))
}

pub async fn list_my_materials(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<Json<PaginatedResponse<MaterialView>>, AppError> {
    let user = require_user(&state, &headers).await?;
    let page = params.page(state.config.default_page_size, state.config.max_page_size);
    Ok(Json(state.engagement.list_own_materials(&user, page).await?))
}

pub async fn trending_topics(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.engagement.trending_topics().await?))
}

pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user = require_user(&state, &headers).await?;
    state.engagement.delete_material(id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DownloadResponse>, AppError> {
    Ok(Json(state.engagement.download_material(id).await?))
}
