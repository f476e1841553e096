use std::{collections::HashSet, path::Path};

use sea_orm::{
    DatabaseConnection, EntityTrait, PaginatorTrait, QuerySelect, Set, sea_query::OnConflict,
};
use tracing::{debug, info, warn};

use crate::{
    entities::{movie, rating},
    error::{AppError, AppResult},
    models::{LoadSummary, MovieRecord, RatingRecord},
    parser,
};

/// Rows per INSERT statement; keeps the bound parameter count under SQLite's limit.
const INSERT_BATCH: usize = 500;

#[derive(Clone)]
pub struct Loader {
    db: DatabaseConnection,
}

impl Loader {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn load_movies(&self, path: &Path) -> AppResult<LoadSummary> {
        let text = read_source(path).await?;
        self.clear_movies().await?;
        self.import_movies(&text).await
    }

    pub async fn load_ratings(&self, path: &Path) -> AppResult<LoadSummary> {
        let text = read_source(path).await?;
        self.clear_ratings().await?;
        self.import_ratings(&text).await
    }

    /// Removing movies cascades to their ratings.
    pub async fn clear_movies(&self) -> AppResult<()> {
        let res = movie::Entity::delete_many().exec(&self.db).await?;
        info!(rows = res.rows_affected, "old movie records deleted");
        Ok(())
    }

    pub async fn clear_ratings(&self) -> AppResult<()> {
        let res = rating::Entity::delete_many().exec(&self.db).await?;
        info!(rows = res.rows_affected, "old rating records deleted");
        Ok(())
    }

    /// Inserts parsed movies, silently skipping ids that already exist,
    /// including repeats within the same file.
    pub async fn import_movies(&self, text: &str) -> AppResult<LoadSummary> {
        let records = parser::parse_movies(text)?;
        debug!(parsed = records.len(), "parsed movie records");
        let before = self.movie_count().await?;

        for chunk in records.chunks(INSERT_BATCH) {
            let models = chunk.iter().cloned().map(movie_model);
            movie::Entity::insert_many(models)
                .on_conflict(OnConflict::column(movie::Column::Id).do_nothing().to_owned())
                .do_nothing()
                .exec(&self.db)
                .await?;
        }

        let stored = self.movie_count().await?;
        let inserted = stored.saturating_sub(before) as usize;
        info!(stored, inserted, "movie records created");

        Ok(LoadSummary {
            parsed: records.len(),
            skipped: records.len().saturating_sub(inserted),
            stored,
        })
    }

    /// Inserts parsed ratings whose movie exists; the rest are dropped.
    ///
    /// The existence check runs against the full set of stored movie ids,
    /// fetched once, rather than one lookup per row.
    pub async fn import_ratings(&self, text: &str) -> AppResult<LoadSummary> {
        let records = parser::parse_ratings(text)?;
        debug!(parsed = records.len(), "parsed rating records");

        let known: HashSet<String> = movie::Entity::find()
            .select_only()
            .column(movie::Column::Id)
            .into_tuple::<String>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        let parsed = records.len();
        let linked: Vec<RatingRecord> =
            records.into_iter().filter(|r| known.contains(&r.movie_id)).collect();
        let skipped = parsed - linked.len();
        if skipped > 0 {
            warn!(skipped, "ratings without a matching movie dropped");
        }

        for chunk in linked.chunks(INSERT_BATCH) {
            let models = chunk.iter().cloned().map(rating_model);
            rating::Entity::insert_many(models).exec(&self.db).await?;
        }

        let stored = self.rating_count().await?;
        info!(stored, "rating records created");

        Ok(LoadSummary { parsed, skipped, stored })
    }

    pub async fn movie_count(&self) -> AppResult<u64> {
        Ok(movie::Entity::find().count(&self.db).await?)
    }

    pub async fn rating_count(&self) -> AppResult<u64> {
        Ok(rating::Entity::find().count(&self.db).await?)
    }
}

async fn read_source(path: &Path) -> AppResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AppError::Io { path: path.to_path_buf(), source })
}

fn movie_model(m: MovieRecord) -> movie::ActiveModel {
    movie::ActiveModel {
        id: Set(m.id),
        title: Set(m.title),
        year: Set(m.year),
        minutes: Set(m.minutes),
        director: Set(m.director),
        genre: Set(m.genre),
        country: Set(m.country),
    }
}

fn rating_model(r: RatingRecord) -> rating::ActiveModel {
    rating::ActiveModel {
        rating_id: Set(r.rating_id),
        rater_id: Set(r.rater_id),
        movie_id: Set(r.movie_id),
        rating: Set(r.rating),
        time: Set(r.time),
    }
}
