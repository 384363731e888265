//! Create content table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000004_create_module_table::Module;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Content::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Content::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Content::ModuleId).string_len(32).not_null())
                    .col(ColumnDef::new(Content::ItemType).string_len(16).not_null())
                    .col(ColumnDef::new(Content::ItemId).string_len(32).not_null())
                    .col(ColumnDef::new(Content::Order).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_module")
                            .from(Content::Table, Content::ModuleId)
                            .to(Module::Table, Module::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .check(Expr::col(Content::ItemType).is_in(["text", "file", "image", "video"]))
                    .to_owned(),
            )
            .await?;

        // Unique index: (module_id, order) - one content per position
        manager
            .create_index(
                Index::create()
                    .name("idx_content_module_order")
                    .table(Content::Table)
                    .col(Content::ModuleId)
                    .col(Content::Order)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (item_type, item_id) - reverse lookup from an item
        manager
            .create_index(
                Index::create()
                    .name("idx_content_item")
                    .table(Content::Table)
                    .col(Content::ItemType)
                    .col(Content::ItemId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Content::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Content {
    Table,
    Id,
    ModuleId,
    ItemType,
    ItemId,
    Order,
}
