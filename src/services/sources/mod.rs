//! Rating data sources
//!
//! This module provides a pluggable architecture for the data behind the rating
//! store (Book-Crossing CSV exports, MovieLens CSV exports, in-memory fixtures).
//! Each source produces a finalized [`Dataset`]; the store is built from it once.

use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::Dataset,
    store::RatingStore,
};

pub mod book_crossing;
pub mod memory;
pub mod movielens;

pub use book_crossing::BookCrossingSource;
pub use memory::InMemorySource;
pub use movielens::MovieLensSource;

/// Trait for rating data sources
///
/// Sources hand over users, items and rating triples. Malformed rows are the
/// source's concern: whatever reaches the store is assumed well formed.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingSource: Send + Sync {
    /// Load the complete dataset
    async fn load(&self) -> AppResult<Dataset>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Loads a dataset from `source` and builds the rating store from it
pub async fn load_store(source: &dyn RatingSource) -> AppResult<RatingStore> {
    tracing::info!(source = source.name(), "Loading dataset");

    let dataset = source.load().await?;

    if dataset.items.is_empty() {
        return Err(AppError::Ingest(format!(
            "Source '{}' produced no items",
            source.name()
        )));
    }

    tracing::info!(
        source = source.name(),
        users = dataset.users.len(),
        items = dataset.items.len(),
        ratings = dataset.ratings.len(),
        "Dataset loaded"
    );

    Ok(RatingStore::build(dataset))
}

/// Reads every data row of a CSV file (the header row is skipped)
///
/// Rows the CSV reader cannot decode are logged and skipped. With
/// `optional`, a missing file yields no rows instead of an error.
pub(crate) fn read_rows(
    path: &Path,
    delimiter: u8,
    optional: bool,
) -> AppResult<Vec<csv::StringRecord>> {
    let mut reader = match csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(e) if optional && is_missing_file(&e) => {
            tracing::debug!(path = %path.display(), "Optional file not present");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        match record {
            Ok(record) => rows.push(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), line = line + 2, error = %e, "Skipping unreadable row");
            }
        }
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "CSV file read");
    Ok(rows)
}

fn is_missing_file(error: &csv::Error) -> bool {
    matches!(error.kind(), csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound)
}

/// Trimmed field `idx`, `None` when absent or blank
pub(crate) fn field(record: &csv::StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a rating cell
///
/// Zero passes through so callers can drop it as an implicit interaction.
/// Values that are not finite or are negative are rejected.
pub(crate) fn rating_value(raw: &str) -> Option<f32> {
    raw.parse::<f32>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Runs a blocking parse off the async runtime
pub(crate) async fn run_blocking<T, F>(parse: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> AppResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(parse)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, ItemDetails, RatingTriple, User};
    use std::io::Write;

    #[tokio::test]
    async fn test_load_store_from_mock_source() {
        let mut source = MockRatingSource::new();
        source.expect_name().return_const("mock");
        source.expect_load().times(1).returning(|| {
            Ok(Dataset {
                users: vec![User::new(1), User::new(2)],
                items: vec![Item::new(10, "Item 10", ItemDetails::Generic)],
                ratings: vec![RatingTriple::new(1, 10, 4.0), RatingTriple::new(2, 10, 2.0)],
            })
        });

        let store = load_store(&source).await.unwrap();
        assert_eq!(store.num_users(), 2);
        assert_eq!(store.num_ratings(), 2);
    }

    #[tokio::test]
    async fn test_load_store_rejects_empty_catalog() {
        let mut source = MockRatingSource::new();
        source.expect_name().return_const("mock");
        source
            .expect_load()
            .returning(|| Ok(Dataset::default()));

        let result = load_store(&source).await;
        assert!(matches!(result, Err(AppError::Ingest(_))));
    }

    #[tokio::test]
    async fn test_load_store_propagates_source_errors() {
        let mut source = MockRatingSource::new();
        source.expect_name().return_const("mock");
        source
            .expect_load()
            .returning(|| Err(AppError::Ingest("broken export".to_string())));

        assert!(load_store(&source).await.is_err());
    }

    #[test]
    fn test_read_rows_skips_header_and_handles_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "a,b\n1,2\n3,4,5").unwrap();

        let rows = read_rows(&path, b',', false).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), 3);

        let missing = dir.path().join("missing.csv");
        assert!(read_rows(&missing, b',', true).unwrap().is_empty());
        assert!(matches!(read_rows(&missing, b',', false), Err(AppError::Csv(_))));
    }

    #[test]
    fn test_rating_value_rejects_unusable_numbers() {
        assert_eq!(rating_value("4.5"), Some(4.5));
        assert_eq!(rating_value("0"), Some(0.0));
        assert_eq!(rating_value("NaN"), None);
        assert_eq!(rating_value("inf"), None);
        assert_eq!(rating_value("-7"), None);
        assert_eq!(rating_value("five"), None);
    }

    #[test]
    fn test_field_trims_and_drops_blanks() {
        let record = csv::StringRecord::from(vec![" 12 ", "   ", "x"]);
        assert_eq!(field(&record, 0), Some("12"));
        assert_eq!(field(&record, 1), None);
        assert_eq!(field(&record, 5), None);
    }
}
