use crate::{
    error::{AppError, AppResult},
    models::{Recommendation, UserId},
    store::RatingStore,
};

use super::strategy::{rank, Strategy};

/// Default evidence threshold for an item to be scored
pub const DEFAULT_MIN_VOTES: usize = 3;

/// Popularity scorer that shrinks each item's mean toward the global mean
///
/// `score = v/(v+m) * item_mean + m/(v+m) * global_mean`, where `v` is the
/// item's vote count and `m` the configured minimum. Items with fewer than
/// `m` votes are not scored.
pub struct DampedMeanScorer<'a> {
    store: &'a RatingStore,
    min_votes: usize,
}

impl<'a> DampedMeanScorer<'a> {
    pub fn new(store: &'a RatingStore, min_votes: usize) -> Self {
        Self { store, min_votes }
    }

    pub fn with_default_threshold(store: &'a RatingStore) -> Self {
        Self::new(store, DEFAULT_MIN_VOTES)
    }

    pub fn min_votes(&self) -> usize {
        self.min_votes
    }

    /// Shrinkage score of one item given its ratings and the global mean
    ///
    /// Returns `None` when the item has no votes or fewer than the threshold.
    pub fn item_score(&self, ratings: &[f32], global_mean: f64) -> Option<f64> {
        let votes = ratings.len();
        if votes == 0 || votes < self.min_votes {
            return None;
        }

        let item_mean = ratings.iter().map(|&r| r as f64).sum::<f64>() / votes as f64;
        let total = (votes + self.min_votes) as f64;
        Some((votes as f64 / total) * item_mean + (self.min_votes as f64 / total) * global_mean)
    }
}

impl<'a> Strategy<'a> for DampedMeanScorer<'a> {
    fn name(&self) -> &'static str {
        "popular"
    }

    fn recommend(&self, user_id: UserId, n: usize) -> AppResult<Vec<Recommendation<'a>>> {
        let store = self.store;
        if self.store.get_user(user_id).is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let Some(user_idx) = self.store.user_index(user_id) else {
            return Ok(Vec::new());
        };

        if n == 0 {
            return Ok(Vec::new());
        }

        let rated = self.store.ratings_of_user(user_idx);
        let global_mean = self.store.global_mean();

        let scored: Vec<Recommendation<'a>> = store
            .items()
            .iter()
            .enumerate()
            .filter(|(item_idx, _)| rated.get(*item_idx).is_none())
            .filter_map(|(item_idx, item)| {
                self.item_score(store.ratings_of_item(item_idx), global_mean)
                    .map(|score| Recommendation { item, score })
            })
            .collect();

        tracing::debug!(
            user_id,
            min_votes = self.min_votes,
            global_mean,
            candidates = scored.len(),
            "Damped-mean scores computed"
        );

        Ok(rank(scored, n))
    }
}
