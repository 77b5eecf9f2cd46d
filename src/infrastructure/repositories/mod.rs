pub mod sqlx_comment_repository;
pub mod sqlx_like_repository;
pub mod sqlx_material_repository;
pub mod sqlx_rating_repository;
pub mod sqlx_user_repository;
