//! Course catalog and module assignment endpoints

use axum::extract::State;
use http::StatusCode;
use shared::error::{ApiResponse, AppResult};
use shared::models::{
    AssignModuleRequest, Course, CourseCreate, CourseModuleDetail, Module, ModuleCreate,
    MoveStepRequest, MoveToRequest, NormalizeResult, ReorderResult,
};

use super::extract::{AppJson, AppPath};
use crate::state::AppState;
use crate::store::ContentStore;

/// POST /api/courses
pub async fn create_course<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppJson(payload): AppJson<CourseCreate>,
) -> AppResult<(StatusCode, ApiResponse<Course>)> {
    let course = state.courses.create_course(payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(course)))
}

/// POST /api/modules
pub async fn create_module<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppJson(payload): AppJson<ModuleCreate>,
) -> AppResult<(StatusCode, ApiResponse<Module>)> {
    let module = state.courses.create_module(payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(module)))
}

/// GET /api/courses/{course_id}/modules
pub async fn list<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppPath(course_id): AppPath<i64>,
) -> AppResult<ApiResponse<Vec<CourseModuleDetail>>> {
    Ok(ApiResponse::success(state.courses.list(course_id).await?))
}

/// POST /api/courses/{course_id}/modules
pub async fn assign<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppPath(course_id): AppPath<i64>,
    AppJson(payload): AppJson<AssignModuleRequest>,
) -> AppResult<(StatusCode, ApiResponse<CourseModuleDetail>)> {
    let detail = state.courses.assign_at(course_id, payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(detail)))
}

/// PUT /api/courses/{course_id}/modules/{module_id}/order
pub async fn reorder<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppPath((course_id, module_id)): AppPath<(i64, i64)>,
    AppJson(payload): AppJson<MoveToRequest>,
) -> AppResult<ApiResponse<ReorderResult>> {
    let result = state.courses.reorder(course_id, module_id, payload).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/courses/{course_id}/modules/{module_id}/move
pub async fn move_step<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppPath((course_id, module_id)): AppPath<(i64, i64)>,
    AppJson(payload): AppJson<MoveStepRequest>,
) -> AppResult<ApiResponse<ReorderResult>> {
    let result = state
        .courses
        .move_step(course_id, module_id, payload.direction)
        .await?;
    Ok(ApiResponse::success(result))
}

/// DELETE /api/courses/{course_id}/modules/{module_id}
pub async fn unassign<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppPath((course_id, module_id)): AppPath<(i64, i64)>,
) -> AppResult<ApiResponse<ReorderResult>> {
    let result = state.courses.unassign(course_id, module_id).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/courses/{course_id}/modules/normalize
pub async fn normalize<S: ContentStore>(
    State(state): State<AppState<S>>,
    AppPath(course_id): AppPath<i64>,
) -> AppResult<ApiResponse<NormalizeResult>> {
    Ok(ApiResponse::success(state.courses.normalize(course_id).await?))
}
