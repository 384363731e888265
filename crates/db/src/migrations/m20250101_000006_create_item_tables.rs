//! Create text, file, image and video item tables migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// One table per item kind, identical apart from the payload column.
const ITEM_TABLES: [(&str, &str); 4] = [
    ("text", "content"),
    ("file", "file"),
    ("image", "file"),
    ("video", "url"),
];

fn item_table(table: &'static str, payload: &'static str) -> TableCreateStatement {
    let payload_col = if payload == "content" {
        ColumnDef::new(Alias::new(payload)).text().not_null().to_owned()
    } else {
        ColumnDef::new(Alias::new(payload))
            .string_len(1024)
            .not_null()
            .to_owned()
    };

    Table::create()
        .table(Alias::new(table))
        .if_not_exists()
        .col(ColumnDef::new(Item::Id).string_len(32).not_null().primary_key())
        .col(ColumnDef::new(Item::OwnerId).string_len(32).not_null())
        .col(ColumnDef::new(Item::Title).string_len(250).not_null())
        .col(payload_col)
        .col(
            ColumnDef::new(Item::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Item::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_owner"))
                .from(Alias::new(table), Item::OwnerId)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, payload) in ITEM_TABLES {
            manager.create_table(item_table(table, payload)).await?;

            // Index: owner_id (for listing a user's items)
            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{table}_owner_id"))
                        .table(Alias::new(table))
                        .col(Item::OwnerId)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, _) in ITEM_TABLES.iter().rev() {
            manager
                .drop_table(Table::drop().table(Alias::new(*table)).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum Item {
    Id,
    OwnerId,
    Title,
    CreatedAt,
    UpdatedAt,
}
