use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alumni::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alumni::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alumni::FirstName).string().not_null())
                    .col(ColumnDef::new(Alumni::LastName).string().not_null())
                    .col(ColumnDef::new(Alumni::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Alumni::Phone).string().not_null().default(""))
                    .col(ColumnDef::new(Alumni::Year).integer().null())
                    .col(ColumnDef::new(Alumni::Course).string().not_null().default(""))
                    .col(ColumnDef::new(Alumni::Company).string().not_null().default(""))
                    .col(ColumnDef::new(Alumni::Position).string().not_null().default(""))
                    .col(ColumnDef::new(Alumni::Country).string().not_null().default(""))
                    .col(ColumnDef::new(Alumni::City).string().not_null().default(""))
                    .col(ColumnDef::new(Alumni::Latitude).double().null())
                    .col(ColumnDef::new(Alumni::Longitude).double().null())
                    .col(
                        ColumnDef::new(Alumni::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Alumni::Paid).boolean().not_null().default(false))
                    .col(ColumnDef::new(Alumni::PaymentProof).string().null())
                    .col(ColumnDef::new(Alumni::PaymentProofData).blob().null())
                    .col(ColumnDef::new(Alumni::PaymentProofType).string().null())
                    .col(ColumnDef::new(Alumni::PaymentProofSize).big_integer().null())
                    .col(ColumnDef::new(Alumni::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Alumni::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Otp::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Otp::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Otp::Email).string().not_null())
                    .col(ColumnDef::new(Otp::Code).string().not_null())
                    .col(ColumnDef::new(Otp::Purpose).string().not_null())
                    .col(ColumnDef::new(Otp::ExpiresAt).string().not_null())
                    .col(ColumnDef::new(Otp::Used).boolean().not_null().default(false))
                    .col(ColumnDef::new(Otp::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_otp_email")
                    .table(Otp::Table)
                    .col(Otp::Email)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // The sweep deletes by expiry
        manager
            .create_index(
                Index::create()
                    .name("idx_otp_expires_at")
                    .table(Otp::Table)
                    .col(Otp::ExpiresAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Admins::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Admins::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Admins::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Admins::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Admins::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Otp::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alumni::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Alumni {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Year,
    Course,
    Company,
    Position,
    Country,
    City,
    Latitude,
    Longitude,
    IsVerified,
    Paid,
    PaymentProof,
    PaymentProofData,
    PaymentProofType,
    PaymentProofSize,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Otp {
    Table,
    Id,
    Email,
    Code,
    Purpose,
    ExpiresAt,
    Used,
    CreatedAt,
}

#[derive(Iden)]
enum Admins {
    Table,
    Id,
    Username,
    PasswordHash,
    IsSuperuser,
    CreatedAt,
    UpdatedAt,
}
