//! Create subject table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subject::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subject::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Subject::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Subject::Slug).string_len(200).not_null())
                    .to_owned(),
            )
            .await?;

        // Unique index: slug
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_slug")
                    .table(Subject::Table)
                    .col(Subject::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: title (default ordering)
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_title")
                    .table(Subject::Table)
                    .col(Subject::Title)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subject::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Subject {
    Table,
    Id,
    Title,
    Slug,
}
