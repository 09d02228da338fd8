use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{Item, UserId},
    services::{DampedMeanScorer, NeighborWeightedPredictor, Strategy, StrategyKind},
    store::RatingStore,
};

/// Knobs for one recommendation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationParams {
    pub strategy: StrategyKind,
    pub n: usize,
    pub k: usize,
    pub min_votes: usize,
}

impl RecommendationParams {
    /// `n`, `k` and `min_votes` must all be positive
    pub fn validate(&self) -> AppResult<()> {
        for (name, value) in [("n", self.n), ("k", self.k), ("min_votes", self.min_votes)] {
            if value == 0 {
                return Err(AppError::InvalidInput(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }
}

/// One entry of a recommendation list, as returned to clients
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedItem {
    pub rank: usize,
    pub item: Item,
    pub info: String,
    pub score: f64,
}

/// Builds the requested strategy over the store
pub fn build_strategy<'a>(
    store: &'a RatingStore,
    params: &RecommendationParams,
) -> Box<dyn Strategy<'a> + 'a> {
    match params.strategy {
        StrategyKind::Popular => Box::new(DampedMeanScorer::new(store, params.min_votes)),
        StrategyKind::Collaborative => Box::new(NeighborWeightedPredictor::new(store, params.k)),
    }
}

/// Generates the top-`n` unseen items for a user
///
/// Unknown users are `NotFound`; a zero `n`, `k` or `min_votes` is rejected
/// as invalid input rather than answered with an empty list.
pub fn get_recommendations(
    store: &RatingStore,
    user_id: UserId,
    params: &RecommendationParams,
) -> AppResult<Vec<RankedItem>> {
    params.validate()?;

    let strategy = build_strategy(store, params);
    let recommendations = strategy.recommend(user_id, params.n)?;

    tracing::info!(
        user_id,
        strategy = strategy.name(),
        n = params.n,
        returned = recommendations.len(),
        "Recommendations generated"
    );

    Ok(recommendations
        .into_iter()
        .enumerate()
        .map(|(idx, rec)| RankedItem {
            rank: idx + 1,
            item: rec.item.clone(),
            info: rec.item.info(),
            score: rec.score,
        })
        .collect())
}
