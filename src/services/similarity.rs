use std::collections::BTreeSet;

use crate::store::RatingStore;

/// Cosine similarity between two users over their co-rated items only
///
/// `universe` restricts the comparison to a subset of item indices. Users
/// with no co-rated item have similarity 0, as does a zero denominator.
pub fn cosine_similarity(
    store: &RatingStore,
    u: usize,
    v: usize,
    universe: Option<&BTreeSet<usize>>,
) -> f64 {
    let row_u = store.ratings_of_user(u);
    let row_v = store.ratings_of_user(v);

    let mut acc = CoRated::default();
    let (mut a, mut b) = (0, 0);

    // Both rows are sorted by item index: merge walk
    while a < row_u.len() && b < row_v.len() {
        let (item_a, item_b) = (row_u.indices[a], row_v.indices[b]);
        if item_a < item_b {
            a += 1;
        } else if item_b < item_a {
            b += 1;
        } else {
            if universe.is_none_or(|set| set.contains(&item_a)) {
                acc.add(row_u.values[a] as f64, row_v.values[b] as f64);
            }
            a += 1;
            b += 1;
        }
    }

    acc.cosine()
}

/// Similarity of `target` against every other user, in user index order
///
/// Scores are accumulated by walking the columns of the target's rated items,
/// so the work is proportional to the number of co-rated entries. Users that
/// share nothing with the target appear with similarity 0.
pub fn user_similarities(
    store: &RatingStore,
    target: usize,
    universe: Option<&BTreeSet<usize>>,
) -> Vec<(usize, f64)> {
    let mut accumulators = vec![CoRated::default(); store.num_users()];

    for (item, r_target) in store.ratings_of_user(target).iter() {
        if universe.is_some_and(|set| !set.contains(&item)) {
            continue;
        }
        for (other, r_other) in store.raters_of_item(item).iter() {
            if other != target {
                accumulators[other].add(r_target as f64, r_other as f64);
            }
        }
    }

    let similarities: Vec<(usize, f64)> = accumulators
        .iter()
        .enumerate()
        .filter(|(other, _)| *other != target)
        .map(|(other, acc)| (other, acc.cosine()))
        .collect();

    tracing::debug!(
        user_idx = target,
        candidates = similarities.len(),
        overlapping = similarities.iter().filter(|(_, s)| *s != 0.0).count(),
        "User similarities computed"
    );

    similarities
}

/// Running sums over a co-rated item set
#[derive(Debug, Clone, Copy, Default)]
struct CoRated {
    dot: f64,
    norm_u: f64,
    norm_v: f64,
}

impl CoRated {
    fn add(&mut self, r_u: f64, r_v: f64) {
        self.dot += r_u * r_v;
        self.norm_u += r_u * r_u;
        self.norm_v += r_v * r_v;
    }

    fn cosine(&self) -> f64 {
        let denominator = self.norm_u.sqrt() * self.norm_v.sqrt();
        if denominator == 0.0 {
            return 0.0;
        }
        self.dot / denominator
    }
}
