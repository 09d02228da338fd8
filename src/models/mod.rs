use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// External user identifier as it appears in the source data
pub type UserId = i64;

/// Identifier for an item, which can be either numeric (MovieLens) or textual (ISBN)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Numeric(i64),
    Text(String),
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Numeric(id) => write!(f, "{}", id),
            ItemId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Numeric(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Text(id.to_string())
    }
}

/// A user of the rating dataset
///
/// Demographic attributes are carried through for presentation and never
/// take part in scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f32>,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            location: None,
            age: None,
        }
    }
}

/// A rateable item (book, movie, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub category: Category,
    pub details: ItemDetails,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>, details: ItemDetails) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: details.category(),
            details,
        }
    }

    /// One-line description of the category-specific attributes
    pub fn info(&self) -> String {
        match &self.details {
            ItemDetails::Book {
                author,
                year,
                publisher,
            } => format!("Author: {}, Year: {}, Publisher: {}", author, year, publisher),
            ItemDetails::Movie { genre, imdb_id, .. } => {
                format!("Genre: {}, IMDb: {}", genre, imdb_id.unwrap_or(0))
            }
            ItemDetails::Generic => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Book,
    Movie,
    Other,
}

/// Category-specific attributes, passed through untouched by the scorers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemDetails {
    Book {
        author: String,
        year: i32,
        publisher: String,
    },
    Movie {
        genre: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        imdb_id: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tmdb_id: Option<u64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
    },
    Generic,
}

impl ItemDetails {
    pub fn category(&self) -> Category {
        match self {
            ItemDetails::Book { .. } => Category::Book,
            ItemDetails::Movie { .. } => Category::Movie,
            ItemDetails::Generic => Category::Other,
        }
    }
}

/// A single explicit rating as produced by ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingTriple {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rating: f32,
}

impl RatingTriple {
    pub fn new(user_id: UserId, item_id: impl Into<ItemId>, rating: f32) -> Self {
        Self {
            user_id,
            item_id: item_id.into(),
            rating,
        }
    }
}

/// Finalized ingestion output: the build-time input of the rating store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub users: Vec<User>,
    pub items: Vec<Item>,
    pub ratings: Vec<RatingTriple>,
}

/// A scored item returned by a recommendation strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation<'a> {
    pub item: &'a Item,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_display() {
        assert_eq!(format!("{}", ItemId::Numeric(318)), "318");
        assert_eq!(format!("{}", ItemId::Text("0195153448".to_string())), "0195153448");
    }

    #[test]
    fn test_item_id_serde_untagged() {
        let json = serde_json::to_string(&ItemId::Numeric(42)).unwrap();
        assert_eq!(json, "42");

        let id: ItemId = serde_json::from_str(r#""0002005018""#).unwrap();
        assert_eq!(id, ItemId::Text("0002005018".to_string()));
    }

    #[test]
    fn test_item_category_follows_details() {
        let book = Item::new(
            "0002005018",
            "Clara Callan",
            ItemDetails::Book {
                author: "Richard Bruce Wright".to_string(),
                year: 2001,
                publisher: "HarperFlamingo Canada".to_string(),
            },
        );
        assert_eq!(book.category, Category::Book);
        assert_eq!(
            book.info(),
            "Author: Richard Bruce Wright, Year: 2001, Publisher: HarperFlamingo Canada"
        );

        let movie = Item::new(
            1,
            "Toy Story (1995)",
            ItemDetails::Movie {
                genre: "Adventure".to_string(),
                imdb_id: Some(114709),
                tmdb_id: Some(862),
                tags: vec![],
            },
        );
        assert_eq!(movie.category, Category::Movie);
        assert_eq!(movie.info(), "Genre: Adventure, IMDb: 114709");
    }

    #[test]
    fn test_item_details_serialization() {
        let details = ItemDetails::Movie {
            genre: "Comedy".to_string(),
            imdb_id: None,
            tmdb_id: None,
            tags: vec![],
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "movie", "genre": "Comedy" }));
    }
}
