use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Nomination::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Nomination::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Nomination::FirstName).string().not_null())
                    .col(ColumnDef::new(Nomination::LastName).string().not_null())
                    .col(ColumnDef::new(Nomination::NominatedEmail).string().null())
                    .col(ColumnDef::new(Nomination::NominatorEmail).string().not_null())
                    .col(ColumnDef::new(Nomination::Year).integer().not_null())
                    .col(ColumnDef::new(Nomination::Category).string().not_null())
                    .col(ColumnDef::new(Nomination::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Nomination::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // One nomination per nominator and category
        manager
            .create_index(
                Index::create()
                    .name("idx_nominator_category")
                    .table(Nomination::Table)
                    .col(Nomination::NominatorEmail)
                    .col(Nomination::Category)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Nomination::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Nomination {
    Table,
    Id,
    FirstName,
    LastName,
    NominatedEmail,
    NominatorEmail,
    Year,
    Category,
    CreatedAt,
    UpdatedAt,
}
