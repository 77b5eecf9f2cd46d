use crate::{
    application::engagement::use_case::EngagementAggregator, config::Config,
    domain::user::repository::UserRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub engagement: Arc<EngagementAggregator>,
    pub users: Arc<dyn UserRepository>,
}
