//! HTTP API
//!
//! Every handler answers with the [`ApiResponse`](shared::error::ApiResponse)
//! envelope; errors go through `AppError`'s `IntoResponse`.

pub mod courses;
pub mod extract;
pub mod health;
pub mod projects;
pub mod team;

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::store::ContentStore;

/// Create the combined router
pub fn create_router<S: ContentStore>(state: AppState<S>) -> Router {
    let team = Router::new()
        .route("/api/team", get(team::list::<S>).post(team::create::<S>))
        .route("/api/team/normalize", post(team::normalize::<S>))
        .route("/api/team/{id}", delete(team::delete::<S>))
        .route("/api/team/{id}/order", put(team::move_to::<S>))
        .route("/api/team/{id}/move", post(team::move_step::<S>));

    let projects = Router::new()
        .route(
            "/api/student-projects",
            get(projects::list::<S>).post(projects::create::<S>),
        )
        .route(
            "/api/student-projects/normalize",
            post(projects::normalize::<S>),
        )
        .route("/api/student-projects/{id}", delete(projects::delete::<S>))
        .route(
            "/api/student-projects/{id}/order",
            put(projects::move_to::<S>),
        )
        .route(
            "/api/student-projects/{id}/move",
            post(projects::move_step::<S>),
        );

    let courses = Router::new()
        .route("/api/courses", post(courses::create_course::<S>))
        .route("/api/modules", post(courses::create_module::<S>))
        .route(
            "/api/courses/{course_id}/modules",
            get(courses::list::<S>).post(courses::assign::<S>),
        )
        .route(
            "/api/courses/{course_id}/modules/normalize",
            post(courses::normalize::<S>),
        )
        .route(
            "/api/courses/{course_id}/modules/{module_id}",
            delete(courses::unassign::<S>),
        )
        .route(
            "/api/courses/{course_id}/modules/{module_id}/order",
            put(courses::reorder::<S>),
        )
        .route(
            "/api/courses/{course_id}/modules/{module_id}/move",
            post(courses::move_step::<S>),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .merge(team)
        .merge(projects)
        .merge(courses)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
