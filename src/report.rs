use std::fmt::Write;

use crate::{
    entities::movie,
    models::{
        GenreAverage, GenreCount, LoadSummary, MovieAverage, MovieCount, RaterAverage, RaterCount,
        YearCount,
    },
};

fn numbered<T>(heading: &str, items: &[T], line: impl Fn(&T) -> String) -> String {
    let mut out = format!("{heading}:\n");
    if items.is_empty() {
        out.push_str("  (no results)\n");
    }
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, line(item));
    }
    out
}

pub fn load_summary(table: &str, summary: &LoadSummary) -> String {
    format!(
        "{table}: {} parsed, {} skipped, {} stored\n",
        summary.parsed, summary.skipped, summary.stored
    )
}

pub fn counts(movies: u64, ratings: u64) -> String {
    format!("Movies: {movies}\nRatings: {ratings}\n")
}

pub fn top_by_duration(n: u64, movies: &[movie::Model]) -> String {
    numbered(&format!("Top {n} Movie Titles by Duration"), movies, |m| match m.minutes {
        Some(min) => format!("{} ({min} min)", m.title),
        None => m.title.clone(),
    })
}

pub fn top_by_year(n: u64, movies: &[movie::Model]) -> String {
    numbered(&format!("Top {n} Movie Titles by Year"), movies, |m| match m.year {
        Some(year) => format!("{} ({year})", m.title),
        None => m.title.clone(),
    })
}

pub fn top_by_rating(n: u64, movies: &[MovieAverage]) -> String {
    numbered(&format!("Top {n} Movie Titles by Rating"), movies, |m| {
        format!("{} - Average Rating: {:.2}", m.title, m.average)
    })
}

pub fn top_by_rating_count(n: u64, movies: &[MovieCount]) -> String {
    numbered(&format!("Top {n} Movie Titles by Number of Ratings"), movies, |m| {
        format!("{} - Number of Ratings: {}", m.title, m.ratings)
    })
}

pub fn unique_raters(count: u64) -> String {
    format!("Number of Unique Raters: {count}\n")
}

pub fn top_raters_by_count(n: u64, raters: &[RaterCount]) -> String {
    numbered(&format!("Top {n} Rater IDs by Movies Rated"), raters, |r| {
        format!("Rater ID: {} - Movies Rated: {}", r.rater_id, r.ratings)
    })
}

pub fn top_raters_by_average(n: u64, min_ratings: usize, raters: &[RaterAverage]) -> String {
    numbered(
        &format!("Top {n} Rater IDs by Average Rating (min {min_ratings} ratings)"),
        raters,
        |r| format!("Rater ID: {} - Average Rating: {:.2}", r.rater_id, r.average),
    )
}

pub fn best_by_director(director: &str, best: Option<&MovieAverage>) -> String {
    match best {
        Some(m) => format!("Top Rated Movie by {director}: {}\n", m.title),
        None => format!("No movies found for director {director}\n"),
    }
}

pub fn best_by_genre(genre: &str, best: Option<&MovieAverage>) -> String {
    match best {
        Some(m) => format!("Top Rated {genre} Movie: {}\n", m.title),
        None => format!("No movies found for genre {genre}\n"),
    }
}

pub fn best_in_year(year: i32, best: Option<&MovieAverage>) -> String {
    match best {
        Some(m) => format!("Top Rated Movie in {year}: {}\n", m.title),
        None => format!("No movies found for the year {year}\n"),
    }
}

pub fn best_in_country(country: &str, min_ratings: usize, best: Option<&MovieAverage>) -> String {
    match best {
        Some(m) => format!(
            "Top Rated Movie in {country} with at least {min_ratings} ratings: {}\n",
            m.title
        ),
        None => format!("No movies in {country} with at least {min_ratings} ratings\n"),
    }
}

pub fn favorite_genre(rater_id: &str, favorite: Option<&GenreCount>) -> String {
    match favorite {
        Some(g) => format!(
            "Favorite Movie Genre for Rater ID {rater_id}: {} ({} ratings)\n",
            g.genre, g.ratings
        ),
        None => format!("No rated genres found for Rater ID {rater_id}\n"),
    }
}

pub fn best_genre_for_rater(
    rater_id: &str,
    min_ratings: usize,
    best: Option<&GenreAverage>,
) -> String {
    match best {
        Some(g) => format!(
            "Highest Average Rating for a Movie Genre by Rater ID {rater_id} is {} with {:.2} average rating\n",
            g.genre, g.average
        ),
        None => format!("No genres with at least {min_ratings} ratings for Rater ID {rater_id}\n"),
    }
}

pub fn second_action_year(year: Option<&YearCount>) -> String {
    match year {
        Some(y) => format!(
            "Second-Highest Year with Action Movies: {} ({} movies)\n",
            y.year, y.movies
        ),
        None => "Fewer than two years have qualifying Action movies\n".to_string(),
    }
}

pub fn high_rating_count(count: u64) -> String {
    format!("Number of Movies with High Ratings: {count}\n")
}
