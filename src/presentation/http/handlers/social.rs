use crate::application::{
    comments::dto::{AddCommentRequest, CommentView},
    likes::dto::ToggleLikeResponse,
    ratings::dto::SubmitRatingRequest,
};
use crate::domain::{
    rating::aggregate::RatingAggregate,
    shared::pagination::PaginatedResponse,
};
use crate::presentation::http::{
    errors::AppError,
    handlers::materials::PageQuery,
    middleware::user::{optional_user, require_user},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use tracing::info;

pub async fn like_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ToggleLikeResponse>, AppError> {
    let user = require_user(&state, &headers).await?;
    let liked = state.engagement.toggle_like_on_material(id, &user).await?;
    info!(material_id = id, user_id = %user.id, liked, "material like toggled");
    Ok(Json(ToggleLikeResponse { liked }))
}

pub async fn like_comment(
    State(state): State<AppState>,
    Path((material_id, comment_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<Json<ToggleLikeResponse>, AppError> {
    let user = require_user(&state, &headers).await?;
    let liked = state
        .engagement
        .toggle_like_on_comment(material_id, comment_id, &user)
        .await?;
    info!(material_id, comment_id, user_id = %user.id, liked, "comment like toggled");
    Ok(Json(ToggleLikeResponse { liked }))
}

pub async fn get_rating(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<RatingAggregate>, AppError> {
    let viewer = optional_user(&state, &headers).await?;
    Ok(Json(state.engagement.get_rating(id, viewer.as_ref()).await?))
}

pub async fn submit_rating(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<SubmitRatingRequest>,
) -> Result<Json<RatingAggregate>, AppError> {
    let user = require_user(&state, &headers).await?;
    let aggregate = state
        .engagement
        .submit_rating(id, &user, body.value)
        .await?;
    Ok(Json(aggregate))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    let user = require_user(&state, &headers).await?;
    let comment = state
        .engagement
        .add_comment(id, &body.content, &user)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<CommentView>>, AppError> {
    let page = params.page(state.config.default_page_size, state.config.max_page_size);
    Ok(Json(state.engagement.list_comments(id, page).await?))
}
