//! Rating-based recommendation engine.
//!
//! A [`store::RatingStore`] is built once from a [`models::Dataset`] produced by a
//! [`services::sources::RatingSource`]. Two interchangeable
//! [`services::Strategy`] implementations score a user's unseen items:
//!
//! - [`services::DampedMeanScorer`]: item means shrunk toward the global mean
//! - [`services::NeighborWeightedPredictor`]: mean-centered user-based kNN
//!   over cosine similarity of co-rated items
//!
//! The `api` module serves both over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

pub use error::{AppError, AppResult};
