//! Create module table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000003_create_course_table::Course;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Module::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Module::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Module::CourseId).string_len(32).not_null())
                    .col(ColumnDef::new(Module::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Module::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Module::Order).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_module_course")
                            .from(Module::Table, Module::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (course_id, order) - one module per position
        manager
            .create_index(
                Index::create()
                    .name("idx_module_course_order")
                    .table(Module::Table)
                    .col(Module::CourseId)
                    .col(Module::Order)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Module::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Module {
    Table,
    Id,
    CourseId,
    Title,
    Description,
    Order,
}
