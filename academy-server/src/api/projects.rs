//! Student project endpoints

use axum::extract::State;
use http::StatusCode;
use shared::error::{ApiResponse, AppResult};
use shared::models::{
    MoveStepRequest, MoveToRequest, NormalizeResult, ReorderResult, StudentProject,
    StudentProjectCreate,
};

use super::extract::{AppJson, AppPath};
use crate::state::AppState;
use crate::store::ContentStore;

/// GET /api/student-projects
pub async fn list<S: ContentStore>(
    State(state): State<AppState<S>>,
) -> AppResult<ApiResponse<Vec<StudentProject>>> {
    Ok(ApiResponse::success(state.projects.list().await?))
}

/// POST /api/student-projects
pub async fn create<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppJson(payload): AppJson<StudentProjectCreate>,
) -> AppResult<(StatusCode, ApiResponse<StudentProject>)> {
    let project = state.projects.create(payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(project)))
}

/// PUT /api/student-projects/{id}/order
pub async fn move_to<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<MoveToRequest>,
) -> AppResult<ApiResponse<ReorderResult>> {
    Ok(ApiResponse::success(state.projects.move_to(id, payload).await?))
}

/// POST /api/student-projects/{id}/move
pub async fn move_step<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<MoveStepRequest>,
) -> AppResult<ApiResponse<ReorderResult>> {
    Ok(ApiResponse::success(
        state.projects.move_step(id, payload.direction).await?,
    ))
}

/// DELETE /api/student-projects/{id}
pub async fn delete<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppPath(id): AppPath<i64>,
) -> AppResult<ApiResponse<ReorderResult>> {
    Ok(ApiResponse::success(state.projects.delete(id).await?))
}

/// POST /api/student-projects/normalize
pub async fn normalize<S: ContentStore>(
    State(state): State<AppState<S>>,
) -> AppResult<ApiResponse<NormalizeResult>> {
    Ok(ApiResponse::success(state.projects.normalize().await?))
}
