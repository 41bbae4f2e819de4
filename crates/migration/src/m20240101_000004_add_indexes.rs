use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Students: unique email
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_students_email")
                    .table(Students::Table)
                    .col(Students::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Enrollments: reverse lookup course -> students
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_course")
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_students_email").table(Students::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_enrollments_course").table(Enrollments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Students { Table, Email }

#[derive(DeriveIden)]
enum Enrollments { Table, CourseId }
