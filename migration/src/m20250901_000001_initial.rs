use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    TelegramId,
    FirstName,
    LastName,
    Username,
    NoShowCount,
    CarMake,
    CarColor,
    CarPlate,
    IsBlocked,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Trips {
    Table,
    Id,
    DriverId,
    Origin,
    Destination,
    DepartureAt,
    SeatsTotal,
    SeatsAvailable,
    PricePerSeat,
    Note,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    TripId,
    PassengerId,
    SeatsBooked,
    TotalAmount,
    DriverAmount,
    PlatformFee,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PassengerPlans {
    Table,
    Id,
    PassengerId,
    Origin,
    Destination,
    DesiredAt,
    SeatsNeeded,
    Note,
    Status,
    DriverId,
    CreatedAt,
    UpdatedAt,
}

/// Single-row global settings (id is always 1)
#[derive(DeriveIden)]
enum AppSettings {
    Table,
    Id,
    MonetizationEnabled,
    PaymentInstructions,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::TelegramId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::FirstName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Users::LastName).string().null())
                    .col(ColumnDef::new(Users::Username).string().null())
                    .col(
                        ColumnDef::new(Users::NoShowCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::CarMake).string().null())
                    .col(ColumnDef::new(Users::CarColor).string().null())
                    .col(ColumnDef::new(Users::CarPlate).string().null())
                    .col(
                        ColumnDef::new(Users::IsBlocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 0 <= seats_available <= seats_total is enforced by the store as well
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trips::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Trips::DriverId).integer().not_null())
                    .col(ColumnDef::new(Trips::Origin).string().not_null())
                    .col(ColumnDef::new(Trips::Destination).string().not_null())
                    .col(
                        ColumnDef::new(Trips::DepartureAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::SeatsTotal)
                            .integer()
                            .not_null()
                            .check(Expr::col(Trips::SeatsTotal).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Trips::SeatsAvailable)
                            .integer()
                            .not_null()
                            .check(Expr::col(Trips::SeatsAvailable).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Trips::PricePerSeat)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Trips::Note).text().null())
                    .col(
                        ColumnDef::new(Trips::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(Expr::col(Trips::SeatsAvailable).lte(Expr::col(Trips::SeatsTotal)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trips_driver")
                            .from(Trips::Table, Trips::DriverId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_trips_driver")
                    .table(Trips::Table)
                    .col(Trips::DriverId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_trips_departure")
                    .table(Trips::Table)
                    .col(Trips::DepartureAt)
                    .to_owned(),
            )
            .await?;

        // Bookings keep a RESTRICT reference to their trip: a trip with any booking
        // row (even a cancelled one) stays in the store
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::TripId).integer().not_null())
                    .col(ColumnDef::new(Bookings::PassengerId).integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::SeatsBooked)
                            .integer()
                            .not_null()
                            .check(Expr::col(Bookings::SeatsBooked).gt(0)),
                    )
                    .col(ColumnDef::new(Bookings::TotalAmount).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::DriverAmount).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::PlatformFee).big_integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(16)
                            .not_null()
                            .default("booked"),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_trip")
                            .from(Bookings::Table, Bookings::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_passenger")
                            .from(Bookings::Table, Bookings::PassengerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bookings_trip")
                    .table(Bookings::Table)
                    .col(Bookings::TripId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bookings_passenger")
                    .table(Bookings::Table)
                    .col(Bookings::PassengerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PassengerPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PassengerPlans::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PassengerPlans::PassengerId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PassengerPlans::Origin).string().not_null())
                    .col(
                        ColumnDef::new(PassengerPlans::Destination)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PassengerPlans::DesiredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PassengerPlans::SeatsNeeded)
                            .integer()
                            .not_null()
                            .check(Expr::col(PassengerPlans::SeatsNeeded).gt(0)),
                    )
                    .col(ColumnDef::new(PassengerPlans::Note).text().null())
                    .col(
                        ColumnDef::new(PassengerPlans::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(PassengerPlans::DriverId).integer().null())
                    .col(
                        ColumnDef::new(PassengerPlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PassengerPlans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plans_passenger")
                            .from(PassengerPlans::Table, PassengerPlans::PassengerId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plans_driver")
                            .from(PassengerPlans::Table, PassengerPlans::DriverId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_plans_status_desired")
                    .table(PassengerPlans::Table)
                    .col(PassengerPlans::Status)
                    .col(PassengerPlans::DesiredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AppSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AppSettings::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AppSettings::MonetizationEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AppSettings::PaymentInstructions)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(AppSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(AppSettings::Table)
            .columns([
                AppSettings::Id,
                AppSettings::MonetizationEnabled,
                AppSettings::PaymentInstructions,
            ])
            .values_panic([1.into(), false.into(), "".into()])
            .to_owned();
        manager.exec_stmt(seed).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AppSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PassengerPlans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
