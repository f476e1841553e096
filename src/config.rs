use std::path::PathBuf;

pub const DEFAULT_TOP_N: u64 = 5;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub movies_csv: PathBuf,
    pub ratings_csv: PathBuf,
    pub top_n: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://moviestats.db?mode=rwc".to_string());

        let movies_csv = std::env::var("MOVIES_CSV")
            .unwrap_or_else(|_| "./data/movies.csv".to_string())
            .into();
        let ratings_csv = std::env::var("RATINGS_CSV")
            .unwrap_or_else(|_| "./data/ratings.csv".to_string())
            .into();

        let top_n: u64 = std::env::var("TOP_N")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_TOP_N);

        Ok(Self { database_url, movies_csv, ratings_csv, top_n })
    }
}
