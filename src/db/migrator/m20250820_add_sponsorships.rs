use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sponsorships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sponsorships::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sponsorships::Email).string().not_null())
                    .col(ColumnDef::new(Sponsorships::Level).string().not_null())
                    .col(
                        ColumnDef::new(Sponsorships::Requirement)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Sponsorships::FirstName).string().not_null())
                    .col(ColumnDef::new(Sponsorships::LastName).string().not_null())
                    .col(ColumnDef::new(Sponsorships::Company).string().not_null())
                    .col(ColumnDef::new(Sponsorships::Address).string().not_null())
                    .col(ColumnDef::new(Sponsorships::ContactNumber).string().not_null())
                    .col(
                        ColumnDef::new(Sponsorships::Confirmed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Sponsorships::Feedback)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Sponsorships::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Sponsorships::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sponsorships_email")
                    .table(Sponsorships::Table)
                    .col(Sponsorships::Email)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sponsorships::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Sponsorships {
    Table,
    Id,
    Email,
    Level,
    Requirement,
    FirstName,
    LastName,
    Company,
    Address,
    ContactNumber,
    Confirmed,
    Feedback,
    CreatedAt,
    UpdatedAt,
}
