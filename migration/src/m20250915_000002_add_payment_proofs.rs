use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

/// Receipt metadata uploaded by drivers, one or more rows per driver per local day
#[derive(DeriveIden)]
enum PaymentProofs {
    Table,
    Id,
    DriverId,
    ProofDate,
    FileRef,
    Comment,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentProofs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentProofs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentProofs::DriverId).integer().not_null())
                    .col(ColumnDef::new(PaymentProofs::ProofDate).date().not_null())
                    .col(ColumnDef::new(PaymentProofs::FileRef).string().not_null())
                    .col(ColumnDef::new(PaymentProofs::Comment).text().null())
                    .col(
                        ColumnDef::new(PaymentProofs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_proofs_driver")
                            .from(PaymentProofs::Table, PaymentProofs::DriverId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payment_proofs_driver_date")
                    .table(PaymentProofs::Table)
                    .col(PaymentProofs::DriverId)
                    .col(PaymentProofs::ProofDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentProofs::Table).to_owned())
            .await?;
        Ok(())
    }
}
