//! MovieLens CSV export
//!
//! Users are not listed separately: they are the distinct `userId`s of
//! `ratings.csv`, in order of first appearance. `links.csv` and `tags.csv`
//! are optional and only enrich the movie records.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::{
    error::AppResult,
    models::{Dataset, Item, ItemDetails, RatingTriple, User},
    services::sources::{field, rating_value, read_rows, run_blocking, RatingSource},
};

#[derive(Debug, Clone)]
pub struct MovieLensSource {
    dir: PathBuf,
}

/// External ids from `links.csv`
#[derive(Debug, Clone, Copy, Default)]
struct Links {
    imdb_id: Option<u64>,
    tmdb_id: Option<u64>,
}

impl MovieLensSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn parse(dir: &Path) -> AppResult<Dataset> {
        let rating_rows = read_rows(&dir.join("ratings.csv"), b',', false)?;

        let mut seen = HashSet::new();
        let mut users = Vec::new();
        let mut ratings = Vec::with_capacity(rating_rows.len());
        for (line, record) in rating_rows.iter().enumerate() {
            let Some(user_id) = field(record, 0).and_then(|raw| raw.parse::<i64>().ok()) else {
                tracing::warn!(line = line + 2, "Ignoring rating row with invalid user id");
                continue;
            };
            if seen.insert(user_id) {
                users.push(User::new(user_id));
            }
            match parse_rating(record) {
                Some(rating) if rating.rating != 0.0 => ratings.push(rating),
                Some(_) => {}
                None => tracing::warn!(line = line + 2, "Ignoring invalid rating row"),
            }
        }

        let links = read_links(dir)?;
        let tags = read_tags(dir)?;

        let items = read_rows(&dir.join("movies.csv"), b',', false)?
            .iter()
            .enumerate()
            .filter_map(|(line, record)| {
                let movie = parse_movie(record, &links, &tags);
                if movie.is_none() {
                    tracing::warn!(line = line + 2, "Ignoring invalid movie row");
                }
                movie
            })
            .collect();

        Ok(Dataset {
            users,
            items,
            ratings,
        })
    }
}

fn parse_rating(record: &csv::StringRecord) -> Option<RatingTriple> {
    if record.len() < 3 {
        return None;
    }
    let user_id = field(record, 0)?.parse().ok()?;
    let movie_id = field(record, 1)?.parse::<i64>().ok()?;
    let rating = rating_value(field(record, 2)?)?;
    Some(RatingTriple::new(user_id, movie_id, rating))
}

fn parse_movie(
    record: &csv::StringRecord,
    links: &HashMap<i64, Links>,
    tags: &HashMap<i64, Vec<String>>,
) -> Option<Item> {
    if record.len() < 3 {
        return None;
    }
    let movie_id: i64 = field(record, 0)?.parse().ok()?;
    let title = field(record, 1).unwrap_or_default();
    let genre = field(record, 2)
        .and_then(|genres| genres.split('|').next())
        .map(str::trim)
        .unwrap_or_default();
    let link = links.get(&movie_id).copied().unwrap_or_default();

    Some(Item::new(
        movie_id,
        title,
        ItemDetails::Movie {
            genre: genre.to_string(),
            imdb_id: link.imdb_id,
            tmdb_id: link.tmdb_id,
            tags: tags.get(&movie_id).cloned().unwrap_or_default(),
        },
    ))
}

fn read_links(dir: &Path) -> AppResult<HashMap<i64, Links>> {
    let links = read_rows(&dir.join("links.csv"), b',', true)?
        .iter()
        .enumerate()
        .filter_map(|(line, record)| {
            let Some(movie_id) = field(record, 0).and_then(|raw| raw.parse().ok()) else {
                tracing::warn!(line = line + 2, "Ignoring link row with invalid movie id");
                return None;
            };
            let links = Links {
                imdb_id: field(record, 1).and_then(|raw| raw.parse().ok()),
                tmdb_id: field(record, 2).and_then(|raw| raw.parse().ok()),
            };
            Some((movie_id, links))
        })
        .collect();
    Ok(links)
}

fn read_tags(dir: &Path) -> AppResult<HashMap<i64, Vec<String>>> {
    let mut tags: HashMap<i64, Vec<String>> = HashMap::new();
    for (line, record) in read_rows(&dir.join("tags.csv"), b',', true)?.iter().enumerate() {
        let (Some(movie_id), Some(tag)) = (
            field(record, 1).and_then(|raw| raw.parse::<i64>().ok()),
            field(record, 2),
        ) else {
            tracing::warn!(line = line + 2, "Ignoring invalid tag row");
            continue;
        };
        let entry = tags.entry(movie_id).or_default();
        if !entry.iter().any(|existing| existing == tag) {
            entry.push(tag.to_string());
        }
    }
    Ok(tags)
}

#[async_trait::async_trait]
impl RatingSource for MovieLensSource {
    async fn load(&self) -> AppResult<Dataset> {
        let dir = self.dir.clone();
        run_blocking(move || Self::parse(&dir)).await
    }

    fn name(&self) -> &'static str {
        "movielens"
    }
}
