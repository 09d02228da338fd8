//! Book-Crossing CSV export
//!
//! Expects `Users.csv` (User-ID, Location, Age), `Books.csv`
//! (ISBN, Title, Author, Year, Publisher, ...) and `Ratings.csv`
//! (User-ID, ISBN, Rating) in one directory. Zero ratings are implicit
//! interactions in this dataset and are dropped.

use std::path::{Path, PathBuf};

use crate::{
    error::AppResult,
    models::{Dataset, Item, ItemDetails, RatingTriple, User},
    services::sources::{field, rating_value, read_rows, run_blocking, RatingSource},
};

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct BookCrossingSource {
    dir: PathBuf,
    delimiter: u8,
}

impl BookCrossingSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            delimiter: b',',
        }
    }

    /// The original export is `;`-separated
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn parse(dir: &Path, delimiter: u8) -> AppResult<Dataset> {
        let users = read_rows(&dir.join("Users.csv"), delimiter, false)?
            .iter()
            .enumerate()
            .filter_map(|(line, record)| {
                let user = parse_user(record);
                if user.is_none() {
                    tracing::warn!(line = line + 2, "Ignoring invalid user row");
                }
                user
            })
            .collect();

        let items = read_rows(&dir.join("Books.csv"), delimiter, false)?
            .iter()
            .enumerate()
            .filter_map(|(line, record)| {
                let book = parse_book(record);
                if book.is_none() {
                    tracing::warn!(line = line + 2, "Ignoring invalid book row");
                }
                book
            })
            .collect();

        let mut ratings = Vec::new();
        for (line, record) in read_rows(&dir.join("Ratings.csv"), delimiter, false)?
            .iter()
            .enumerate()
        {
            match parse_rating(record) {
                Some(rating) if rating.rating != 0.0 => ratings.push(rating),
                Some(_) => {}
                None => tracing::warn!(line = line + 2, "Ignoring invalid rating row"),
            }
        }

        Ok(Dataset {
            users,
            items,
            ratings,
        })
    }
}

fn parse_user(record: &csv::StringRecord) -> Option<User> {
    if record.len() < 3 {
        return None;
    }
    let id = field(record, 0)?.parse().ok()?;
    let age = match field(record, 2) {
        None => None,
        Some(raw) if raw.eq_ignore_ascii_case("null") => None,
        Some(raw) => Some(raw.parse::<f32>().ok()?),
    };

    Some(User {
        id,
        location: field(record, 1).map(str::to_string),
        age,
    })
}

fn parse_book(record: &csv::StringRecord) -> Option<Item> {
    if record.len() < 4 {
        return None;
    }
    let isbn = field(record, 0)?;
    let title = field(record, 1).unwrap_or_default();
    let author = field(record, 2).unwrap_or(UNKNOWN);

    // Titles containing the delimiter shift the year one column right
    let year_column = match field(record, 3) {
        Some(raw) if is_year(raw) => Some(3),
        _ if field(record, 4).is_some_and(is_year) => Some(4),
        _ => None,
    };
    let year = year_column
        .and_then(|col| field(record, col))
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0);
    let publisher = year_column
        .and_then(|col| field(record, col + 1))
        .unwrap_or(UNKNOWN);

    Some(Item::new(
        isbn,
        title,
        ItemDetails::Book {
            author: author.to_string(),
            year,
            publisher: publisher.to_string(),
        },
    ))
}

fn is_year(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit())
}

fn parse_rating(record: &csv::StringRecord) -> Option<RatingTriple> {
    let user_id = field(record, 0)?.parse().ok()?;
    let isbn = field(record, 1)?;
    let rating = rating_value(field(record, 2)?)?;
    Some(RatingTriple::new(user_id, isbn, rating))
}

#[async_trait::async_trait]
impl RatingSource for BookCrossingSource {
    async fn load(&self) -> AppResult<Dataset> {
        let dir = self.dir.clone();
        let delimiter = self.delimiter;
        run_blocking(move || Self::parse(&dir, delimiter)).await
    }

    fn name(&self) -> &'static str {
        "book-crossing"
    }
}
