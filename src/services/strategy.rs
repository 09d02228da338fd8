use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{Recommendation, UserId},
};

/// A recommendation strategy over a borrowed rating store
///
/// Implementations are interchangeable: the caller picks one and asks for the
/// top `n` unseen items of a user. An unknown user is `NotFound`; a user with
/// nothing to recommend gets an empty list. Results borrow from the store,
/// not from the strategy, so they outlive a short-lived scorer.
pub trait Strategy<'a> {
    /// Strategy name for logging and responses
    fn name(&self) -> &'static str;

    /// Top `n` items the user has not rated, best first
    fn recommend(&self, user_id: UserId, n: usize) -> AppResult<Vec<Recommendation<'a>>>;
}

/// Selector for the available strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Damped-mean popularity scorer
    #[default]
    Popular,
    /// Neighbor-weighted collaborative predictor
    Collaborative,
}

impl FromStr for StrategyKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "popular" | "simple" | "damped" => Ok(StrategyKind::Popular),
            "collaborative" | "neighbors" | "knn" => Ok(StrategyKind::Collaborative),
            other => Err(AppError::InvalidInput(format!("Unknown strategy: {}", other))),
        }
    }
}

/// Sorts by score descending, keeping the input order on ties, and keeps `n`
pub(crate) fn rank(mut scored: Vec<Recommendation<'_>>, n: usize) -> Vec<Recommendation<'_>> {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(n);
    scored
}
