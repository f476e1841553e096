use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(string(Movie::Id).primary_key())
                    .col(string(Movie::Title))
                    .col(integer_null(Movie::Year))
                    .col(double_null(Movie::Minutes))
                    .col(string(Movie::Director))
                    .col(string(Movie::Genre))
                    .col(string(Movie::Country))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(string(Rating::RatingId).primary_key())
                    .col(string(Rating::RaterId))
                    .col(string(Rating::MovieId))
                    .col(double_null(Rating::Rating))
                    .col(big_integer_null(Rating::Time))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_movie")
                            .from(Rating::Table, Rating::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rating_movie_id")
                    .table(Rating::Table)
                    .col(Rating::MovieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rating_rater_id")
                    .table(Rating::Table)
                    .col(Rating::RaterId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Rating::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    Title,
    Year,
    Minutes,
    Director,
    Genre,
    Country,
}

#[derive(DeriveIden)]
enum Rating {
    Table,
    RatingId,
    RaterId,
    MovieId,
    Rating,
    Time,
}
