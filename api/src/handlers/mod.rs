use axum::extract::State;

use crate::{context::ApiContext, error::ApiError};

pub mod certificates;

pub async fn health_check(State(ctx): State<ApiContext>) -> Result<&'static str, ApiError> {
    ctx.db.ping().await?;
    Ok("Healthy")
}
