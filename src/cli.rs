use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sea_orm::DatabaseConnection;

use crate::{
    config::Config,
    error::AppResult,
    loader::Loader,
    queries::{
        DEFAULT_COUNTRY, DEFAULT_DIRECTOR, DEFAULT_GENRE, DEFAULT_MIN_RATINGS, DEFAULT_RATER,
        DEFAULT_YEAR, Stats,
    },
    report,
};

/// Load movie and rating CSV files into a database and report on them
#[derive(Parser)]
#[command(name = "moviestats")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Table {
    Movies,
    Ratings,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replace stored movies and/or ratings with the contents of the CSV files
    Load {
        /// Movie CSV (defaults to MOVIES_CSV)
        #[arg(long)]
        movies: Option<PathBuf>,
        /// Rating CSV (defaults to RATINGS_CSV)
        #[arg(long)]
        ratings: Option<PathBuf>,
        /// Load a single table instead of both
        #[arg(long, value_enum)]
        only: Option<Table>,
    },

    /// Print stored row counts
    Counts,

    /// Longest movies
    TopByDuration,
    /// Most recent movies
    TopByYear,
    /// Highest mean rating among movies with enough ratings
    TopByRating,
    /// Most-rated movies
    TopByRatingCount,
    /// Number of distinct raters
    UniqueRaters,
    /// Raters with the most ratings
    TopRatersByCount,
    /// Raters with the highest mean rating
    TopRatersByAverage,

    /// Best-rated movie by a director
    BestByDirector {
        #[arg(default_value = DEFAULT_DIRECTOR)]
        director: String,
    },

    /// Best-rated movie in a genre
    BestByGenre {
        #[arg(default_value = DEFAULT_GENRE)]
        genre: String,
    },

    /// Best-rated movie released in a year
    BestInYear {
        #[arg(default_value_t = DEFAULT_YEAR)]
        year: i32,
    },

    /// Best-rated movie from a country with enough ratings
    BestInCountry {
        #[arg(default_value = DEFAULT_COUNTRY)]
        country: String,
        #[arg(long, default_value_t = DEFAULT_MIN_RATINGS)]
        min_ratings: usize,
    },

    /// Genre a rater rated most often
    FavoriteGenre {
        #[arg(default_value = DEFAULT_RATER)]
        rater: String,
    },

    /// Genre with a rater's highest mean rating
    BestGenreForRater {
        #[arg(default_value = DEFAULT_RATER)]
        rater: String,
        #[arg(long, default_value_t = DEFAULT_MIN_RATINGS)]
        min_ratings: usize,
    },

    /// Year with the second-most short, well-rated USA action movies
    SecondActionYear,

    /// Count movies rated both 7+ and 5+
    HighRatingCount,

    /// Run every report with its default parameters
    Report,
}

pub async fn run(command: Command, config: &Config, db: DatabaseConnection) -> AppResult<String> {
    let n = config.top_n;
    let stats = Stats::new(db.clone());

    let out = match command {
        Command::Load { movies, ratings, only } => {
            let loader = Loader::new(db);
            let mut out = String::new();
            if !matches!(only, Some(Table::Ratings)) {
                let path = movies.unwrap_or_else(|| config.movies_csv.clone());
                out += &report::load_summary("movies", &loader.load_movies(&path).await?);
            }
            if !matches!(only, Some(Table::Movies)) {
                let path = ratings.unwrap_or_else(|| config.ratings_csv.clone());
                out += &report::load_summary("ratings", &loader.load_ratings(&path).await?);
            }
            out
        },
        Command::Counts => {
            let loader = Loader::new(db);
            report::counts(loader.movie_count().await?, loader.rating_count().await?)
        },
        Command::TopByDuration => report::top_by_duration(n, &stats.top_by_duration(n).await?),
        Command::TopByYear => report::top_by_year(n, &stats.top_by_year(n).await?),
        Command::TopByRating => {
            report::top_by_rating(n, &stats.top_by_rating(n, DEFAULT_MIN_RATINGS).await?)
        },
        Command::TopByRatingCount => {
            report::top_by_rating_count(n, &stats.top_by_rating_count(n).await?)
        },
        Command::UniqueRaters => report::unique_raters(stats.unique_raters().await?),
        Command::TopRatersByCount => {
            report::top_raters_by_count(n, &stats.top_raters_by_count(n).await?)
        },
        Command::TopRatersByAverage => report::top_raters_by_average(
            n,
            DEFAULT_MIN_RATINGS,
            &stats.top_raters_by_average(n, DEFAULT_MIN_RATINGS).await?,
        ),
        Command::BestByDirector { director } => {
            report::best_by_director(&director, stats.best_by_director(&director).await?.as_ref())
        },
        Command::BestByGenre { genre } => {
            report::best_by_genre(&genre, stats.best_by_genre(&genre).await?.as_ref())
        },
        Command::BestInYear { year } => {
            report::best_in_year(year, stats.best_in_year(year).await?.as_ref())
        },
        Command::BestInCountry { country, min_ratings } => report::best_in_country(
            &country,
            min_ratings,
            stats.best_in_country(&country, min_ratings).await?.as_ref(),
        ),
        Command::FavoriteGenre { rater } => {
            report::favorite_genre(&rater, stats.favorite_genre(&rater).await?.as_ref())
        },
        Command::BestGenreForRater { rater, min_ratings } => report::best_genre_for_rater(
            &rater,
            min_ratings,
            stats.best_genre_for_rater(&rater, min_ratings).await?.as_ref(),
        ),
        Command::SecondActionYear => {
            report::second_action_year(stats.second_action_year().await?.as_ref())
        },
        Command::HighRatingCount => report::high_rating_count(stats.high_rating_count().await?),
        Command::Report => full_report(&stats, n).await?,
    };

    Ok(out)
}

async fn full_report(stats: &Stats, n: u64) -> AppResult<String> {
    let min = DEFAULT_MIN_RATINGS;
    let sections = [
        report::top_by_duration(n, &stats.top_by_duration(n).await?),
        report::top_by_year(n, &stats.top_by_year(n).await?),
        report::top_by_rating(n, &stats.top_by_rating(n, min).await?),
        report::top_by_rating_count(n, &stats.top_by_rating_count(n).await?),
        report::unique_raters(stats.unique_raters().await?),
        report::top_raters_by_count(n, &stats.top_raters_by_count(n).await?),
        report::top_raters_by_average(n, min, &stats.top_raters_by_average(n, min).await?),
        report::best_by_director(
            DEFAULT_DIRECTOR,
            stats.best_by_director(DEFAULT_DIRECTOR).await?.as_ref(),
        ),
        report::best_by_genre(DEFAULT_GENRE, stats.best_by_genre(DEFAULT_GENRE).await?.as_ref()),
        report::best_in_year(DEFAULT_YEAR, stats.best_in_year(DEFAULT_YEAR).await?.as_ref()),
        report::best_in_country(
            DEFAULT_COUNTRY,
            min,
            stats.best_in_country(DEFAULT_COUNTRY, min).await?.as_ref(),
        ),
        report::favorite_genre(DEFAULT_RATER, stats.favorite_genre(DEFAULT_RATER).await?.as_ref()),
        report::best_genre_for_rater(
            DEFAULT_RATER,
            min,
            stats.best_genre_for_rater(DEFAULT_RATER, min).await?.as_ref(),
        ),
        report::second_action_year(stats.second_action_year().await?.as_ref()),
        report::high_rating_count(stats.high_rating_count().await?),
    ];

    Ok(sections.join("\n"))
}
