use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use service::domain::{Student, StudentCreate, StudentWithCourses};
use service::{student_service, Page};
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[utoipa::path(
    post, path = "/students/", tag = "students",
    request_body = crate::openapi::StudentCreateDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::StudentDoc),
        (status = 400, description = "Email already registered", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<StudentCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), JsonApiError> {
    let Json(input) = payload?;
    let created = student_service::create_student(&state.db, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/students/{id}", tag = "students",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::StudentWithCoursesDoc),
        (status = 404, description = "Student not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<StudentWithCourses>, JsonApiError> {
    let Path(id) = id?;
    Ok(Json(student_service::get_student(&state.db, id).await?))
}

#[utoipa::path(
    get, path = "/students/", tag = "students",
    params(
        ("skip" = Option<u64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<u64>, Query, description = "Page size, default 100")
    ),
    responses((status = 200, description = "OK", body = [crate::openapi::StudentDoc]))
)]
pub async fn list(
    State(state): State<ServerState>,
    page: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<Student>>, JsonApiError> {
    let Query(page) = page?;
    let rows = student_service::list_students(&state.db, page).await?;
    info!(count = rows.len(), skip = page.skip, "list students");
    Ok(Json(rows))
}
