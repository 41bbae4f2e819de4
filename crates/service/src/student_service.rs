use sea_orm::DatabaseConnection;
use tracing::{info, instrument};

use models::student;
use crate::domain::{Student, StudentCreate, StudentWithCourses};
use crate::errors::{ServiceError, STUDENT_NOT_FOUND};
use crate::pagination::Page;

/// Register a student; the email must not be in use.
#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn create_student(db: &DatabaseConnection, input: &StudentCreate) -> Result<Student, ServiceError> {
    let created = student::create(db, &input.name, &input.email).await?;
    info!(student_id = created.id, "student_created");
    Ok(created.into())
}

/// Get a student together with the courses it is enrolled in.
#[instrument(skip(db))]
pub async fn get_student(db: &DatabaseConnection, id: i32) -> Result<StudentWithCourses, ServiceError> {
    let found = student::find(db, id).await?.ok_or(ServiceError::NotFound(STUDENT_NOT_FOUND))?;
    let courses = student::courses_of(db, &found).await?;
    Ok(StudentWithCourses::new(found, courses))
}

pub async fn list_students(db: &DatabaseConnection, page: Page) -> Result<Vec<Student>, ServiceError> {
    let rows = student::page(db, page.skip, page.limit).await?;
    Ok(rows.into_iter().map(Student::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn jane() -> StudentCreate {
        StudentCreate { name: "Jane Smith".into(), email: "jane@example.com".into() }
    }

    #[tokio::test]
    async fn student_lifecycle() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let s = create_student(&db, &jane()).await?;
        assert_eq!(s.id, 1);

        let got = get_student(&db, s.id).await?;
        assert_eq!(got.email, "jane@example.com");
        assert!(got.courses.is_empty());

        let all = list_students(&db, Page::default()).await?;
        assert_eq!(all, vec![s]);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_regardless_of_name() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_student(&db, &jane()).await?;

        let again = StudentCreate { name: "Someone Else".into(), ..jane() };
        match create_student(&db, &again).await {
            Err(ServiceError::Conflict(m)) => assert_eq!(m, "Email already registered"),
            other => panic!("expected conflict, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn unknown_student_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        assert!(matches!(get_student(&db, 42).await, Err(ServiceError::NotFound("Student not found"))));
        Ok(())
    }

    #[tokio::test]
    async fn bad_email_is_a_validation_error() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let bad = StudentCreate { name: "Jane".into(), email: "jane.example.com".into() };
        assert!(matches!(create_student(&db, &bad).await, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn paging_skips_and_limits() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        for i in 0..4 {
            create_student(&db, &StudentCreate { name: format!("S{i}"), email: format!("s{i}@example.com") }).await?;
        }
        let ids: Vec<_> = list_students(&db, Page::new(2, 5)).await?.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert!(list_students(&db, Page::new(4, 5)).await?.is_empty());
        assert!(list_students(&db, Page::new(u64::MAX, u64::MAX)).await?.is_empty());
        Ok(())
    }
}
