//! Service layer: business operations on students, courses and enrollments.
//! - Existence checks and error mapping live here; persistence in `models`.
//! - Results are returned as the wire contracts in `domain`.

pub mod errors;
pub mod pagination;
pub mod domain;
pub mod student_service;
pub mod course_service;
pub mod enrollment_service;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use pagination::Page;
