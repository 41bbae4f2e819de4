use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use service::domain::{Course, CourseCreate, CourseWithStudents};
use service::{course_service, Page};

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[utoipa::path(
    post, path = "/courses/", tag = "courses",
    request_body = crate::openapi::CourseCreateDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CourseDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CourseCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Course>), JsonApiError> {
    let Json(input) = payload?;
    let created = course_service::create_course(&state.db, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/courses/{id}", tag = "courses",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CourseWithStudentsDoc),
        (status = 404, description = "Course not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<CourseWithStudents>, JsonApiError> {
    let Path(id) = id?;
    Ok(Json(course_service::get_course(&state.db, id).await?))
}

#[utoipa::path(
    get, path = "/courses/", tag = "courses",
    params(
        ("skip" = Option<u64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<u64>, Query, description = "Page size, default 100")
    ),
    responses((status = 200, description = "OK", body = [crate::openapi::CourseDoc]))
)]
pub async fn list(
    State(state): State<ServerState>,
    page: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<Course>>, JsonApiError> {
    let Query(page) = page?;
    Ok(Json(course_service::list_courses(&state.db, page).await?))
}
