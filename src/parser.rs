use csv::{ReaderBuilder, StringRecord};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{MovieRecord, RatingRecord},
};

/// Positions of the named columns in a header row. Columns the file lacks
/// read as empty text, as do trailing fields missing from a short row.
struct Columns<const N: usize>([Option<usize>; N]);

impl<const N: usize> Columns<N> {
    fn locate(headers: &StringRecord, names: [&str; N]) -> Self {
        Self(names.map(|name| headers.iter().position(|h| h.trim() == name)))
    }

    fn get<'r>(&self, record: &'r StringRecord, col: usize) -> &'r str {
        self.0[col].and_then(|idx| record.get(idx)).unwrap_or("")
    }
}

const MOVIE_COLUMNS: [&str; 7] = ["id", "title", "year", "minutes", "director", "genre", "country"];
const RATING_COLUMNS: [&str; 4] = ["rater_id", "movie_id", "rating", "time"];

pub fn parse_movies(text: &str) -> AppResult<Vec<MovieRecord>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());
    let cols = Columns::locate(reader.headers()?, MOVIE_COLUMNS);

    let mut movies = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |col| cols.get(&record, col).to_string();

        let id = field(0);
        movies.push(MovieRecord {
            id: if id.is_empty() { Uuid::new_v4().to_string() } else { id },
            title: field(1),
            year: leading_int(cols.get(&record, 2)).and_then(|y| i32::try_from(y).ok()),
            minutes: leading_float(cols.get(&record, 3)),
            director: field(4),
            genre: field(5),
            country: field(6),
        });
    }

    Ok(movies)
}

/// Every rating gets a fresh id. A blank `movie_id` is replaced with a random
/// one so the row can never resolve to a movie and is dropped on load.
pub fn parse_ratings(text: &str) -> AppResult<Vec<RatingRecord>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());
    let cols = Columns::locate(reader.headers()?, RATING_COLUMNS);

    let mut ratings = Vec::new();
    for record in reader.records() {
        let record = record?;
        let movie_id = cols.get(&record, 1);

        ratings.push(RatingRecord {
            rating_id: Uuid::new_v4().to_string(),
            rater_id: cols.get(&record, 0).to_string(),
            movie_id: if movie_id.is_empty() {
                Uuid::new_v4().to_string()
            } else {
                movie_id.to_string()
            },
            rating: leading_float(cols.get(&record, 2)),
            time: leading_int(cols.get(&record, 3)),
        });
    }

    Ok(ratings)
}

/// Parses the longest integer prefix, so `"1994 (re-release)"` is 1994 and
/// `"N/A"` is `None`.
fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let sign = usize::from(s.starts_with(['-', '+']));
    let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    s[..sign + digits].parse().ok()
}

fn leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(s.starts_with(['-', '+']));
    let mut digits = 0;
    let mut seen_dot = false;

    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if digits == 0 {
        return None;
    }

    // optional exponent, only taken when it carries digits
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end..].iter().take_while(|b| b.is_ascii_digit()).count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIES: &str = "\
id,title,year,minutes,director,genre,country
0111161,The Shawshank Redemption,1994,142,Frank Darabont,Crime,USA
,Untitled,N/A,N/A,Nobody,Drama,UK
0068646,The Godfather,1972 (re-release),175.5min,Francis Ford Coppola,Crime,USA
";

    #[test]
    fn movies_coerce_numbers_and_fill_missing_ids() {
        let movies = parse_movies(MOVIES).unwrap();
        assert_eq!(movies.len(), 3);

        assert_eq!(movies[0].id, "0111161");
        assert_eq!(movies[0].year, Some(1994));
        assert_eq!(movies[0].minutes, Some(142.0));
        assert_eq!(movies[0].country, "USA");

        assert!(Uuid::parse_str(&movies[1].id).is_ok());
        assert_eq!(movies[1].year, None);
        assert_eq!(movies[1].minutes, None);

        assert_eq!(movies[2].year, Some(1972));
        assert_eq!(movies[2].minutes, Some(175.5));
    }

    #[test]
    fn header_only_input_is_empty() {
        assert!(parse_movies("id,title,year,minutes,director,genre,country\n").unwrap().is_empty());
        assert!(parse_ratings("rater_id,movie_id,rating,time\n").unwrap().is_empty());
        assert!(parse_movies("").unwrap().is_empty());
    }

    #[test]
    fn extra_and_missing_columns_are_tolerated() {
        let movies =
            parse_movies("id,title,year,minutes,director,genre,country,poster\nm1,Short,2001\n")
                .unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Short");
        assert_eq!(movies[0].year, Some(2001));
        assert_eq!(movies[0].minutes, None);
        assert_eq!(movies[0].genre, "");
    }

    #[test]
    fn short_rating_rows_keep_their_leading_fields() {
        let ratings = parse_ratings("rater_id,movie_id,rating,time\n7,m1\n8,m2,6.5\n").unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0].movie_id, "m1");
        assert_eq!(ratings[0].rating, None);
        assert_eq!(ratings[1].rating, Some(6.5));
        assert_eq!(ratings[1].time, None);
    }

    #[test]
    fn ratings_always_get_fresh_ids() {
        let text = "\
rater_id,movie_id,rating,time
1040,0111161,8,1381006850
1040,,seven,never
";
        let ratings = parse_ratings(text).unwrap();
        assert_eq!(ratings.len(), 2);
        assert_ne!(ratings[0].rating_id, ratings[1].rating_id);
        assert!(Uuid::parse_str(&ratings[0].rating_id).is_ok());

        assert_eq!(ratings[0].movie_id, "0111161");
        assert_eq!(ratings[0].rating, Some(8.0));
        assert_eq!(ratings[0].time, Some(1_381_006_850));

        assert!(Uuid::parse_str(&ratings[1].movie_id).is_ok());
        assert_eq!(ratings[1].rating, None);
        assert_eq!(ratings[1].time, None);
    }

    #[test]
    fn numeric_prefixes() {
        assert_eq!(leading_int("  42abc"), Some(42));
        assert_eq!(leading_int("-7"), Some(-7));
        assert_eq!(leading_int("12.9"), Some(12));
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int(""), None);

        assert_eq!(leading_float("6.5"), Some(6.5));
        assert_eq!(leading_float(".5"), Some(0.5));
        assert_eq!(leading_float("1e2x"), Some(100.0));
        assert_eq!(leading_float("3e"), Some(3.0));
        assert_eq!(leading_float("NaN"), None);
        assert_eq!(leading_float("."), None);
    }
}
