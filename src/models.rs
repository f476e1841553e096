#[derive(Clone, Debug, PartialEq)]
pub struct MovieRecord {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    pub minutes: Option<f64>,
    pub director: String,
    pub genre: String,
    pub country: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RatingRecord {
    pub rating_id: String,
    pub rater_id: String,
    pub movie_id: String,
    pub rating: Option<f64>,
    pub time: Option<i64>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoadSummary {
    pub parsed: usize,
    pub skipped: usize,
    pub stored: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MovieAverage {
    pub id: String,
    pub title: String,
    pub average: f64,
    pub ratings: usize,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MovieCount {
    pub id: String,
    pub title: String,
    pub ratings: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RaterCount {
    pub rater_id: String,
    pub ratings: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RaterAverage {
    pub rater_id: String,
    pub average: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenreAverage {
    pub genre: String,
    pub average: f64,
    pub ratings: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct YearCount {
    pub year: i32,
    pub movies: usize,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenreCount {
    pub genre: String,
    pub ratings: usize,
}
