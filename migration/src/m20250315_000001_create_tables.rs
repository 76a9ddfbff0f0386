use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250315_000001_create_tables" // Make sure this matches with the file name
    }
}

#[derive(Iden)]
enum Venues {
    Table,
    Id,
    Name,
    Genres,
    Address,
    City,
    State,
    Phone,
    Website,
    FacebookLink,
    ImageLink,
    SeekingTalent,
    SeekingTalentDescription,
    PostingDate,
}

#[derive(Iden)]
enum Artists {
    Table,
    Id,
    Name,
    Genres,
    City,
    State,
    Phone,
    ImageLink,
    Website,
    FacebookLink,
    SeekingVenue,
    SeekingVenueDescription,
    PostingDate,
    Albums,
    Songs,
}

#[derive(Iden)]
enum Shows {
    Table,
    Id,
    ArtistId,
    VenueId,
    StartTime,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Venues::Table)
                    .col(
                        ColumnDef::new(Venues::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Venues::Name).string().not_null())
                    .col(ColumnDef::new(Venues::Genres).json().not_null())
                    .col(ColumnDef::new(Venues::Address).string())
                    .col(ColumnDef::new(Venues::City).string().not_null())
                    .col(ColumnDef::new(Venues::State).string().not_null())
                    .col(ColumnDef::new(Venues::Phone).string())
                    .col(ColumnDef::new(Venues::Website).string())
                    .col(ColumnDef::new(Venues::FacebookLink).string())
                    .col(ColumnDef::new(Venues::ImageLink).string())
                    .col(
                        ColumnDef::new(Venues::SeekingTalent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Venues::SeekingTalentDescription)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Venues::PostingDate).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Artists::Table)
                    .col(
                        ColumnDef::new(Artists::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Artists::Name).string().not_null())
                    .col(ColumnDef::new(Artists::Genres).json().not_null())
                    .col(ColumnDef::new(Artists::City).string().not_null())
                    .col(ColumnDef::new(Artists::State).string().not_null())
                    .col(ColumnDef::new(Artists::Phone).string())
                    .col(ColumnDef::new(Artists::ImageLink).string())
                    .col(ColumnDef::new(Artists::Website).string())
                    .col(ColumnDef::new(Artists::FacebookLink).string())
                    .col(
                        ColumnDef::new(Artists::SeekingVenue)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Artists::SeekingVenueDescription)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Artists::PostingDate).date_time().not_null())
                    .col(ColumnDef::new(Artists::Albums).json().not_null())
                    .col(ColumnDef::new(Artists::Songs).json().not_null())
                    .to_owned(),
            )
            .await?;

        // A show cannot outlive its artist or its venue
        manager
            .create_table(
                Table::create()
                    .table(Shows::Table)
                    .col(
                        ColumnDef::new(Shows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Shows::ArtistId).integer().not_null())
                    .col(ColumnDef::new(Shows::VenueId).integer().not_null())
                    .col(ColumnDef::new(Shows::StartTime).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-shows-artist_id")
                            .from(Shows::Table, Shows::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-shows-venue_id")
                            .from(Shows::Table, Shows::VenueId)
                            .to(Venues::Table, Venues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Same artist, same venue, same instant: one row only
        manager
            .create_index(
                Index::create()
                    .name("uq-shows-artist_id-venue_id-start_time")
                    .table(Shows::Table)
                    .col(Shows::ArtistId)
                    .col(Shows::VenueId)
                    .col(Shows::StartTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Shows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Artists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Venues::Table).to_owned())
            .await?;
        Ok(())
    }
}
