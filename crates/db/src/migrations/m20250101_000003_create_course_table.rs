//! Create course table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_user_table::User;
use super::m20250101_000002_create_subject_table::Subject;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Course::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Course::OwnerId).string_len(32).not_null())
                    .col(ColumnDef::new(Course::SubjectId).string_len(32).not_null())
                    .col(ColumnDef::new(Course::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Course::Slug).string_len(200).not_null())
                    .col(ColumnDef::new(Course::Overview).text().not_null())
                    .col(
                        ColumnDef::new(Course::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_owner")
                            .from(Course::Table, Course::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_subject")
                            .from(Course::Table, Course::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: slug
        manager
            .create_index(
                Index::create()
                    .name("idx_course_slug")
                    .table(Course::Table)
                    .col(Course::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: owner_id (for the owner's manage list)
        manager
            .create_index(
                Index::create()
                    .name("idx_course_owner_id")
                    .table(Course::Table)
                    .col(Course::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Index: subject_id (for browsing by subject)
        manager
            .create_index(
                Index::create()
                    .name("idx_course_subject_id")
                    .table(Course::Table)
                    .col(Course::SubjectId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (newest first)
        manager
            .create_index(
                Index::create()
                    .name("idx_course_created_at")
                    .table(Course::Table)
                    .col(Course::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Course {
    Table,
    Id,
    OwnerId,
    SubjectId,
    Title,
    Slug,
    Overview,
    CreatedAt,
}
