use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use service::domain::{Enrollment, EnrollmentCreate};
use service::{enrollment_service, Page};

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[utoipa::path(
    post, path = "/enroll/", tag = "enrollments",
    request_body = crate::openapi::EnrollmentCreateDoc,
    responses(
        (status = 201, description = "Enrolled today", body = crate::openapi::EnrollmentDoc),
        (status = 400, description = "Student already enrolled in this course", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Student or course not found", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn enroll(
    State(state): State<ServerState>,
    payload: Result<Json<EnrollmentCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Enrollment>), JsonApiError> {
    let Json(input) = payload?;
    let created = enrollment_service::enroll(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/enrollments/", tag = "enrollments",
    params(
        ("skip" = Option<u64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<u64>, Query, description = "Page size, default 100")
    ),
    responses((status = 200, description = "OK", body = [crate::openapi::EnrollmentDoc]))
)]
pub async fn list(
    State(state): State<ServerState>,
    page: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<Enrollment>>, JsonApiError> {
    let Query(page) = page?;
    Ok(Json(enrollment_service::list_enrollments(&state.db, page).await?))
}
