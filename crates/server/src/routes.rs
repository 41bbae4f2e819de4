pub mod courses;
pub mod enrollments;
pub mod students;
pub mod system;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use crate::errors::catch_panic_layer;
use crate::state::ServerState;

/// Build the full application router. Collection routes answer with and
/// without the trailing slash; a panicking handler answers a generic 500.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let system = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/openapi.json", get(system::openapi_json));

    let students = Router::new()
        .route("/students/", get(students::list).post(students::create))
        .route("/students", get(students::list).post(students::create))
        .route("/students/:id", get(students::get));

    let courses = Router::new()
        .route("/courses/", get(courses::list).post(courses::create))
        .route("/courses", get(courses::list).post(courses::create))
        .route("/courses/:id", get(courses::get));

    let enrollments = Router::new()
        .route("/enroll/", post(enrollments::enroll))
        .route("/enroll", post(enrollments::enroll))
        .route("/enrollments/", get(enrollments::list))
        .route("/enrollments", get(enrollments::list));

    system
        .merge(students)
        .merge(courses)
        .merge(enrollments)
        .with_state(state)
        // panics become a JSON 500 inside the trace span
        .layer(catch_panic_layer())
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
