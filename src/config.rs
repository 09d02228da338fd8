use serde::Deserialize;
use std::path::PathBuf;

/// Which on-disk dataset layout to ingest
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Book-Crossing layout (Users.csv, Books.csv, Ratings.csv)
    Books,
    /// MovieLens layout (ratings.csv, movies.csv, links.csv, tags.csv)
    Movies,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Dataset layout to load at startup
    #[serde(default = "default_dataset")]
    pub dataset: DatasetKind,

    /// Directory holding the dataset CSV files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Minimum vote count for the damped-mean strategy
    #[serde(default = "default_min_votes")]
    pub min_votes: usize,

    /// Neighborhood size for the collaborative strategy
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,

    /// Number of recommendations returned when the request does not say
    #[serde(default = "default_n")]
    pub default_n: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_dataset() -> DatasetKind {
    DatasetKind::Movies
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_min_votes() -> usize {
    3
}

fn default_neighbors() -> usize {
    10
}

fn default_n() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            dataset: default_dataset(),
            data_dir: default_data_dir(),
            min_votes: default_min_votes(),
            neighbors: default_neighbors(),
            default_n: default_n(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let vars: Vec<(String, String)> = Vec::new();
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.dataset, DatasetKind::Movies);
        assert_eq!(config.min_votes, 3);
        assert_eq!(config.neighbors, 10);
        assert_eq!(config.default_n, 5);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides_from_environment() {
        let vars = vec![
            ("DATASET".to_string(), "books".to_string()),
            ("DATA_DIR".to_string(), "/srv/books".to_string()),
            ("MIN_VOTES".to_string(), "5".to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.dataset, DatasetKind::Books);
        assert_eq!(config.data_dir, PathBuf::from("/srv/books"));
        assert_eq!(config.min_votes, 5);
        assert_eq!(config.port, 8080);
    }
}
