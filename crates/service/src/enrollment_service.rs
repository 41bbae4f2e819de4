use chrono::{Local, NaiveDate};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{info, instrument, warn};

use models::{course, enrollment, student};
use crate::domain::{Enrollment, EnrollmentCreate};
use crate::errors::{ServiceError, COURSE_NOT_FOUND, STUDENT_NOT_FOUND};
use crate::pagination::Page;

/// Server-local calendar day assigned to new enrollments.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Enroll a student in a course dated today.
pub async fn enroll(db: &DatabaseConnection, input: EnrollmentCreate) -> Result<Enrollment, ServiceError> {
    enroll_on(db, input, today()).await
}

/// Checks run student, course, then pair, inside one transaction; any error
/// rolls the transaction back.
#[instrument(skip(db), fields(student_id = input.student_id, course_id = input.course_id))]
pub async fn enroll_on(db: &DatabaseConnection, input: EnrollmentCreate, on: NaiveDate) -> Result<Enrollment, ServiceError> {
    let txn = db.begin().await?;
    match enroll_in(&txn, input, on).await {
        Ok(created) => {
            txn.commit().await?;
            info!("enrollment_created");
            Ok(created.into())
        }
        Err(err) => {
            if let Err(rb) = txn.rollback().await {
                warn!(error = %rb, "rollback failed");
            }
            Err(err)
        }
    }
}

async fn enroll_in(txn: &DatabaseTransaction, input: EnrollmentCreate, on: NaiveDate) -> Result<enrollment::Model, ServiceError> {
    student::find(txn, input.student_id).await?.ok_or(ServiceError::NotFound(STUDENT_NOT_FOUND))?;
    course::find(txn, input.course_id).await?.ok_or(ServiceError::NotFound(COURSE_NOT_FOUND))?;
    if enrollment::find_pair(txn, input.student_id, input.course_id).await?.is_some() {
        return Err(ServiceError::Conflict(enrollment::ALREADY_ENROLLED.to_string()));
    }
    // a concurrent insert of the same pair surfaces as the same conflict
    Ok(enrollment::create(txn, input.student_id, input.course_id, on).await?)
}

pub async fn list_enrollments(db: &DatabaseConnection, page: Page) -> Result<Vec<Enrollment>, ServiceError> {
    let rows = enrollment::page(db, page.skip, page.limit).await?;
    Ok(rows.into_iter().map(Enrollment::from).collect())
}
