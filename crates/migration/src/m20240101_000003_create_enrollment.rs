//! Create `enrollments` join table.
//!
//! The composite primary key on (student_id, course_id) keeps each pair unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(integer(Enrollments::StudentId))
                    .col(integer(Enrollments::CourseId))
                    .col(date(Enrollments::EnrolledOn))
                    .primary_key(
                        Index::create()
                            .name("pk_enrollments")
                            .col(Enrollments::StudentId)
                            .col(Enrollments::CourseId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_student")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_course")
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Enrollments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Enrollments { Table, StudentId, CourseId, EnrolledOn }

#[derive(DeriveIden)]
enum Students { Table, Id }

#[derive(DeriveIden)]
enum Courses { Table, Id }
