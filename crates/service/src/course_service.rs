use sea_orm::DatabaseConnection;
use tracing::{info, instrument};

use models::course;
use crate::domain::{Course, CourseCreate, CourseWithStudents};
use crate::errors::{ServiceError, COURSE_NOT_FOUND};
use crate::pagination::Page;

#[instrument(skip(db, input), fields(title = %input.title))]
pub async fn create_course(db: &DatabaseConnection, input: &CourseCreate) -> Result<Course, ServiceError> {
    let created = course::create(db, &input.title, input.description.as_deref()).await?;
    info!(course_id = created.id, "course_created");
    Ok(created.into())
}

/// Get a course together with its enrolled students.
#[instrument(skip(db))]
pub async fn get_course(db: &DatabaseConnection, id: i32) -> Result<CourseWithStudents, ServiceError> {
    let found = course::find(db, id).await?.ok_or(ServiceError::NotFound(COURSE_NOT_FOUND))?;
    let students = course::students_of(db, &found).await?;
    Ok(CourseWithStudents::new(found, students))
}

pub async fn list_courses(db: &DatabaseConnection, page: Page) -> Result<Vec<Course>, ServiceError> {
    let rows = course::page(db, page.skip, page.limit).await?;
    Ok(rows.into_iter().map(Course::from).collect())
}
