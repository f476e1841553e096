//! Read-only aggregations over the loaded movie and rating tables.
//!
//! Filtering, grouping and ordering that the store can express directly is
//! pushed into SQL; per-movie and per-genre means are folded in memory over
//! the rows the store returns.

use std::collections::BTreeMap;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
    sea_query::{Expr, Func, Query, SelectStatement, SimpleExpr},
};

use crate::{
    entities::{movie, rating},
    error::AppResult,
    models::{
        GenreAverage, GenreCount, MovieAverage, MovieCount, RaterAverage, RaterCount, YearCount,
    },
};

pub const DEFAULT_DIRECTOR: &str = "Michael Bay";
pub const DEFAULT_GENRE: &str = "Comedy";
pub const DEFAULT_YEAR: i32 = 2013;
pub const DEFAULT_COUNTRY: &str = "India";
pub const DEFAULT_RATER: &str = "1040";
pub const DEFAULT_MIN_RATINGS: usize = 5;

const ACTION_GENRE: &str = "Action";
const ACTION_COUNTRY: &str = "USA";
const ACTION_MAX_MINUTES: f64 = 120.0;
const ACTION_MIN_RATING: f64 = 6.5;

#[derive(Clone)]
pub struct Stats {
    db: DatabaseConnection,
}

impl Stats {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn top_by_duration(&self, limit: u64) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find()
            .filter(movie::Column::Minutes.is_not_null())
            .order_by_desc(movie::Column::Minutes)
            .order_by_asc(movie::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    pub async fn top_by_year(&self, limit: u64) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find()
            .filter(movie::Column::Year.is_not_null())
            .order_by_desc(movie::Column::Year)
            .order_by_asc(movie::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    pub async fn top_by_rating(
        &self,
        limit: u64,
        min_ratings: usize,
    ) -> AppResult<Vec<MovieAverage>> {
        let mut movies: Vec<MovieAverage> = self
            .movies_with_ratings(None)
            .await?
            .into_iter()
            .filter(|m| m.ratings >= min_ratings)
            .collect();

        movies.sort_by(|a, b| b.average.total_cmp(&a.average));
        movies.truncate(limit as usize);
        Ok(movies)
    }

    pub async fn top_by_rating_count(&self, limit: u64) -> AppResult<Vec<MovieCount>> {
        let mut movies: Vec<MovieCount> = movie::Entity::find()
            .find_with_related(rating::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(m, ratings)| MovieCount {
                id: m.id,
                title: m.title,
                ratings: ratings.len() as u64,
            })
            .collect();

        movies.sort_by(|a, b| b.ratings.cmp(&a.ratings));
        movies.truncate(limit as usize);
        Ok(movies)
    }

    pub async fn unique_raters(&self) -> AppResult<u64> {
        Ok(rating::Entity::find()
            .select_only()
            .column(rating::Column::RaterId)
            .distinct()
            .count(&self.db)
            .await?)
    }

    pub async fn top_raters_by_count(&self, limit: u64) -> AppResult<Vec<RaterCount>> {
        let ratings = count_of(rating::Column::RatingId);

        let rows = rating::Entity::find()
            .select_only()
            .column(rating::Column::RaterId)
            .column_as(ratings.clone(), "ratings")
            .group_by(rating::Column::RaterId)
            .order_by_desc(ratings)
            .order_by_asc(rating::Column::RaterId)
            .limit(limit)
            .into_tuple::<(String, i64)>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|(rater_id, ratings)| RaterCount { rater_id, ratings }).collect())
    }

    pub async fn top_raters_by_average(
        &self,
        limit: u64,
        min_ratings: usize,
    ) -> AppResult<Vec<RaterAverage>> {
        let average: SimpleExpr =
            Func::avg(Expr::col((rating::Entity, rating::Column::Rating))).into();

        let rows = rating::Entity::find()
            .select_only()
            .column(rating::Column::RaterId)
            .column_as(average.clone(), "average")
            .group_by(rating::Column::RaterId)
            // a rater needs at least one present score for AVG to be defined
            .having(Expr::expr(count_of(rating::Column::Rating)).gte(min_ratings.max(1) as i64))
            .order_by_desc(average)
            .order_by_asc(rating::Column::RaterId)
            .limit(limit)
            .into_tuple::<(String, f64)>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|(rater_id, average)| RaterAverage { rater_id, average }).collect())
    }

    pub async fn best_by_director(&self, director: &str) -> AppResult<Option<MovieAverage>> {
        let movies = self.movies_with_ratings(Some(movie::Column::Director.eq(director))).await?;
        Ok(highest_average(movies))
    }

    pub async fn best_by_genre(&self, genre: &str) -> AppResult<Option<MovieAverage>> {
        let movies = self.movies_with_ratings(Some(movie::Column::Genre.eq(genre))).await?;
        Ok(highest_average(movies))
    }

    pub async fn best_in_year(&self, year: i32) -> AppResult<Option<MovieAverage>> {
        let movies = self.movies_with_ratings(Some(movie::Column::Year.eq(year))).await?;
        Ok(highest_average(movies))
    }

    /// Movies below `min_ratings` are never candidates, whatever their
    /// average. Only positive means qualify.
    pub async fn best_in_country(
        &self,
        country: &str,
        min_ratings: usize,
    ) -> AppResult<Option<MovieAverage>> {
        let movies = self.movies_with_ratings(Some(movie::Column::Country.eq(country))).await?;
        Ok(highest_average(
            movies.into_iter().filter(|m| m.ratings >= min_ratings && m.average > 0.0),
        ))
    }

    /// Most-rated genre for one rater; equal counts go to the alphabetically
    /// first genre.
    pub async fn favorite_genre(&self, rater_id: &str) -> AppResult<Option<GenreCount>> {
        let rows = rating::Entity::find()
            .filter(rating::Column::RaterId.eq(rater_id))
            .find_also_related(movie::Entity)
            .all(&self.db)
            .await?;

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for (_, movie) in rows {
            if let Some(movie) = movie.filter(|m| !m.genre.is_empty()) {
                *counts.entry(movie.genre).or_default() += 1;
            }
        }

        Ok(counts
            .into_iter()
            .map(|(genre, ratings)| GenreCount { genre, ratings })
            .reduce(|best, next| if next.ratings > best.ratings { next } else { best }))
    }

    /// Genre with the highest mean rating from one rater, among genres the
    /// rater scored at least `min_ratings` times. Only positive means qualify.
    pub async fn best_genre_for_rater(
        &self,
        rater_id: &str,
        min_ratings: usize,
    ) -> AppResult<Option<GenreAverage>> {
        let rows = rating::Entity::find()
            .filter(rating::Column::RaterId.eq(rater_id))
            .filter(rating::Column::Rating.is_not_null())
            .find_also_related(movie::Entity)
            .all(&self.db)
            .await?;

        let mut totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for (r, movie) in rows {
            let (Some(score), Some(movie)) = (r.rating, movie) else {
                continue;
            };
            if movie.genre.is_empty() {
                continue;
            }
            let entry = totals.entry(movie.genre).or_default();
            entry.0 += score;
            entry.1 += 1;
        }

        Ok(totals
            .into_iter()
            .map(|(genre, (sum, n))| GenreAverage { genre, average: sum / n as f64, ratings: n })
            .filter(|g| g.ratings >= min_ratings && g.average > 0.0)
            .reduce(|best, next| if next.average > best.average { next } else { best }))
    }

    /// Among short USA action movies with at least one rating of 6.5 or more,
    /// the year with the second-highest number of such movies. Years are
    /// ranked by count, then by year ascending.
    pub async fn second_action_year(&self) -> AppResult<Option<YearCount>> {
        let years = movie::Entity::find()
            .select_only()
            .column(movie::Column::Year)
            .filter(movie::Column::Genre.eq(ACTION_GENRE))
            .filter(movie::Column::Country.eq(ACTION_COUNTRY))
            .filter(movie::Column::Minutes.lt(ACTION_MAX_MINUTES))
            .filter(movie::Column::Id.in_subquery(rated_at_least(ACTION_MIN_RATING)))
            .into_tuple::<Option<i32>>()
            .all(&self.db)
            .await?;

        Ok(second_by_count(years.into_iter().flatten()))
    }

    /// Movies with a rating of at least 7 and a rating of at least 5; a
    /// single rating may satisfy both.
    pub async fn high_rating_count(&self) -> AppResult<u64> {
        Ok(movie::Entity::find()
            .filter(movie::Column::Id.in_subquery(rated_at_least(7.0)))
            .filter(movie::Column::Id.in_subquery(rated_at_least(5.0)))
            .count(&self.db)
            .await?)
    }

    async fn movies_with_ratings(
        &self,
        filter: Option<SimpleExpr>,
    ) -> AppResult<Vec<MovieAverage>> {
        let mut query = movie::Entity::find();
        if let Some(filter) = filter {
            query = query.filter(filter);
        }

        let rows = query.find_with_related(rating::Entity).all(&self.db).await?;
        Ok(rows.into_iter().map(|(m, ratings)| movie_average(m, &ratings)).collect())
    }
}

/// Mean over present rating values; a movie with none averages 0.
fn movie_average(m: movie::Model, ratings: &[rating::Model]) -> MovieAverage {
    let scores: Vec<f64> = ratings.iter().filter_map(|r| r.rating).collect();
    let average =
        if scores.is_empty() { 0.0 } else { scores.iter().sum::<f64>() / scores.len() as f64 };
    MovieAverage { id: m.id, title: m.title, average, ratings: scores.len() }
}

/// Ties keep the earliest candidate.
fn highest_average(movies: impl IntoIterator<Item = MovieAverage>) -> Option<MovieAverage> {
    movies.into_iter().reduce(|best, next| if next.average > best.average { next } else { best })
}

fn second_by_count(years: impl IntoIterator<Item = i32>) -> Option<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for year in years {
        *counts.entry(year).or_default() += 1;
    }

    let mut ranked: Vec<YearCount> =
        counts.into_iter().map(|(year, movies)| YearCount { year, movies }).collect();
    ranked.sort_by(|a, b| b.movies.cmp(&a.movies));
    ranked.into_iter().nth(1)
}

fn count_of(col: rating::Column) -> SimpleExpr {
    Func::count(Expr::col((rating::Entity, col))).into()
}

fn rated_at_least(threshold: f64) -> SelectStatement {
    Query::select()
        .column(rating::Column::MovieId)
        .from(rating::Entity)
        .and_where(rating::Column::Rating.gte(threshold))
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avg(id: &str, average: f64) -> MovieAverage {
        MovieAverage { id: id.to_string(), title: id.to_uppercase(), average, ratings: 1 }
    }

    #[test]
    fn highest_average_keeps_first_on_ties() {
        let best = highest_average([avg("a", 7.0), avg("b", 7.0), avg("c", 6.0)]).unwrap();
        assert_eq!(best.id, "a");
        assert!(highest_average(Vec::new()).is_none());
    }

    #[test]
    fn second_year_breaks_ties_by_year() {
        let years = std::iter::repeat_n(2011, 5)
            .chain(std::iter::repeat_n(2010, 5))
            .chain(std::iter::repeat_n(2012, 3));
        assert_eq!(second_by_count(years), Some(YearCount { year: 2011, movies: 5 }));
    }

    #[test]
    fn second_year_needs_two_years() {
        assert_eq!(second_by_count([1999, 1999]), None);
        assert_eq!(second_by_count([]), None);
    }

    #[test]
    fn average_ignores_absent_scores() {
        let m = movie::Model {
            id: "m".into(),
            title: "M".into(),
            year: None,
            minutes: None,
            director: String::new(),
            genre: String::new(),
            country: String::new(),
        };
        let score = |value| rating::Model {
            rating_id: String::new(),
            rater_id: "r".into(),
            movie_id: "m".into(),
            rating: value,
            time: None,
        };

        let a = movie_average(m.clone(), &[score(Some(6.0)), score(None), score(Some(8.0))]);
        assert_eq!(a.average, 7.0);
        assert_eq!(a.ratings, 2);

        assert_eq!(movie_average(m, &[]).average, 0.0);
    }
}
