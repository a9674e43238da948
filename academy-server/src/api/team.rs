//! Team roster endpoints

use axum::extract::State;
use http::StatusCode;
use shared::error::{ApiResponse, AppResult};
use shared::models::{
    MoveStepRequest, MoveToRequest, NormalizeResult, ReorderResult, TeamMember, TeamMemberCreate,
};

use super::extract::{AppJson, AppPath};
use crate::state::AppState;
use crate::store::ContentStore;

/// GET /api/team
pub async fn list<S: ContentStore>(
    State(state): State<AppState<S>>,
) -> AppResult<ApiResponse<Vec<TeamMember>>> {
    Ok(ApiResponse::success(state.team.list().await?))
}

/// POST /api/team
pub async fn create<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppJson(payload): AppJson<TeamMemberCreate>,
) -> AppResult<(StatusCode, ApiResponse<TeamMember>)> {
    let member = state.team.create(payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(member)))
}

/// PUT /api/team/{id}/order
pub async fn move_to<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<MoveToRequest>,
) -> AppResult<ApiResponse<ReorderResult>> {
    Ok(ApiResponse::success(state.team.move_to(id, payload).await?))
}

/// POST /api/team/{id}/move
pub async fn move_step<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<MoveStepRequest>,
) -> AppResult<ApiResponse<ReorderResult>> {
    Ok(ApiResponse::success(
        state.team.move_step(id, payload.direction).await?,
    ))
}

/// DELETE /api/team/{id}
pub async fn delete<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppPath(id): AppPath<i64>,
) -> AppResult<ApiResponse<ReorderResult>> {
    Ok(ApiResponse::success(state.team.delete(id).await?))
}

/// POST /api/team/normalize
pub async fn normalize<S: ContentStore>(
    State(state): State<AppState<S>>,
) -> AppResult<ApiResponse<NormalizeResult>> {
    Ok(ApiResponse::success(state.team.normalize().await?))
}
