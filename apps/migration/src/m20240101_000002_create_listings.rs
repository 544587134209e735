use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Listings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Listings::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Listings::Description).text())
                    .col(ColumnDef::new(Listings::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Listings::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Listings::OwnerId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listings_owner")
                            .from(Listings::Table, Listings::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listings_created_at")
                    .table(Listings::Table)
                    .col(Listings::CreatedAt)
                    .col(Listings::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listings_owner")
                    .table(Listings::Table)
                    .col(Listings::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Listings {
    Table,
    Id,
    Title,
    Description,
    Price,
    CreatedAt,
    IsPublished,
    OwnerId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
