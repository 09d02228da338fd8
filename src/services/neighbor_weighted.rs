use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    models::{Recommendation, UserId},
    store::RatingStore,
};

use super::{
    neighbors::{top_k, Neighbor},
    similarity::user_similarities,
    strategy::{rank, Strategy},
};

/// Default neighborhood size
pub const DEFAULT_NEIGHBORS: usize = 10;

/// User-based collaborative filter with mean-centered neighbor weighting
///
/// For an unrated item `i`:
/// `pred = mu_u + sum(sim(u,v) * (r_v,i - mu_v)) / sum(|sim(u,v)|)`
/// over the top-`k` neighbors `v` that rated `i`. Items no neighbor rated
/// fall back to `mu_u`.
pub struct NeighborWeightedPredictor<'a> {
    store: &'a RatingStore,
    k: usize,
    item_universe: Option<&'a BTreeSet<usize>>,
}

impl<'a> NeighborWeightedPredictor<'a> {
    pub fn new(store: &'a RatingStore, k: usize) -> Self {
        Self {
            store,
            k,
            item_universe: None,
        }
    }

    /// Restricts the similarity computation to the given item indices
    pub fn with_item_universe(mut self, universe: &'a BTreeSet<usize>) -> Self {
        self.item_universe = Some(universe);
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Top-`k` neighbors of a user index
    pub fn neighbors_of(&self, user_idx: usize) -> Vec<Neighbor> {
        let similarities = user_similarities(self.store, user_idx, self.item_universe);
        top_k(&similarities, self.k)
    }

    /// Predicted rating for every item index the user has not rated
    ///
    /// The result is indexed by item; rated items are `None`.
    pub fn predictions(&self, user_idx: usize, neighbors: &[Neighbor]) -> Vec<Option<f64>> {
        let n_items = self.store.num_items();
        let mut numerator = vec![0f64; n_items];
        let mut denominator = vec![0f64; n_items];

        for neighbor in neighbors {
            let mu_neighbor = self.store.user_mean(neighbor.user_idx);
            for (item, rating) in self.store.ratings_of_user(neighbor.user_idx).iter() {
                numerator[item] += neighbor.similarity * (rating as f64 - mu_neighbor);
                denominator[item] += neighbor.similarity.abs();
            }
        }

        let mu = self.store.user_mean(user_idx);
        let own = self.store.ratings_of_user(user_idx);

        (0..n_items)
            .map(|item| {
                if own.get(item).is_some() {
                    return None;
                }
                let offset = if denominator[item] != 0.0 {
                    numerator[item] / denominator[item]
                } else {
                    0.0
                };
                Some(mu + offset)
            })
            .collect()
    }
}

impl<'a> Strategy<'a> for NeighborWeightedPredictor<'a> {
    fn name(&self) -> &'static str {
        "collaborative"
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

        let neighbors = self.neighbors_of(user_idx);

        tracing::debug!(
            user_id,
            k = self.k,
            neighbors = neighbors.len(),
            restricted = self.item_universe.is_some(),
            "Neighborhood selected"
        );

        let scored: Vec<Recommendation<'a>> = self
            .predictions(user_idx, &neighbors)
            .into_iter()
            .zip(store.items())
            .filter_map(|(prediction, item)| prediction.map(|score| Recommendation { item, score }))
            .collect();

        Ok(rank(scored, n))
    }
}
