/// A neighbor of the target user and its similarity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub user_idx: usize,
    pub similarity: f64,
}

/// Keeps the `k` most similar users, most similar first
///
/// Users with zero similarity are never neighbors. Ties keep the order in
/// which the users appear in `similarities`. Fewer than `k` candidates yields
/// all of them; `k == 0` yields nothing.
pub fn top_k(similarities: &[(usize, f64)], k: usize) -> Vec<Neighbor> {
    if k == 0 {
        return Vec::new();
    }

    let mut neighbors: Vec<Neighbor> = similarities
        .iter()
        .filter(|(_, sim)| *sim != 0.0 && !sim.is_nan())
        .map(|&(user_idx, similarity)| Neighbor {
            user_idx,
            similarity,
        })
        .collect();

    // sort_by is stable
    neighbors.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    neighbors.truncate(k);
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(neighbors: &[Neighbor]) -> Vec<usize> {
        neighbors.iter().map(|n| n.user_idx).collect()
    }

    #[test]
    fn test_keeps_highest_k() {
        let sims = vec![(0, 0.2), (1, 0.9), (2, 0.5), (3, 0.7)];
        let neighbors = top_k(&sims, 2);
        assert_eq!(ids(&neighbors), vec![1, 3]);
        assert_eq!(neighbors[0].similarity, 0.9);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let sims = vec![(4, 0.5), (1, 0.8), (2, 0.5), (0, 0.5)];
        assert_eq!(ids(&top_k(&sims, 3)), vec![1, 4, 2]);
    }

    #[test]
    fn test_fewer_candidates_than_k() {
        let sims = vec![(0, 0.0), (1, 0.3), (2, 0.0)];
        assert_eq!(ids(&top_k(&sims, 5)), vec![1]);
    }

    #[test]
    fn test_zero_k_is_empty() {
        let sims = vec![(0, 0.4)];
        assert!(top_k(&sims, 0).is_empty());
    }

    #[test]
    fn test_order_is_non_increasing() {
        let sims: Vec<(usize, f64)> = (0..20).map(|i| (i, ((i * 7) % 11) as f64 / 10.0)).collect();
        let neighbors = top_k(&sims, 8);
        assert!(neighbors.len() <= 8);
        assert!(neighbors
            .windows(2)
            .all(|w| w[0].similarity >= w[1].similarity));
    }
}
