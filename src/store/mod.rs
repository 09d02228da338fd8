//! Immutable rating store: users, items and the sparse rating matrix.
//!
//! The store is assembled once from a [`Dataset`] and only read afterwards.
//! Strategies borrow it and never mutate it, so it can be shared across
//! request handlers behind an `Arc` without locking.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Dataset, Item, ItemId, User, UserId};

pub mod sparse;

pub use sparse::{CompressedMatrix, SparseVec};

/// Summary counters for a loaded store
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoreStats {
    pub users: usize,
    pub items: usize,
    pub ratings: usize,
    pub global_mean: f64,
    pub density: f64,
    pub built_at: DateTime<Utc>,
}

/// Users, items and their ratings, indexed densely
#[derive(Debug, Clone)]
pub struct RatingStore {
    users: Vec<User>,
    items: Vec<Item>,
    user_ids: HashMap<UserId, usize>,
    item_ids: HashMap<ItemId, usize>,
    /// user x item
    by_user: CompressedMatrix,
    /// item x user
    by_item: CompressedMatrix,
    built_at: DateTime<Utc>,
}

impl RatingStore {
    /// Assembles the id/index tables and the sparse matrix
    ///
    /// Duplicate user or item ids keep their first record. Ratings that are not
    /// positive finite values or that name an unknown user or item are dropped; a repeated
    /// (user, item) pair keeps the last rating.
    pub fn build(dataset: Dataset) -> Self {
        let Dataset {
            users: raw_users,
            items: raw_items,
            ratings,
        } = dataset;

        let mut users = Vec::with_capacity(raw_users.len());
        let mut user_ids = HashMap::with_capacity(raw_users.len());
        for user in raw_users {
            if user_ids.contains_key(&user.id) {
                tracing::debug!(user_id = user.id, "Duplicate user record ignored");
                continue;
            }
            user_ids.insert(user.id, users.len());
            users.push(user);
        }

        let mut items = Vec::with_capacity(raw_items.len());
        let mut item_ids = HashMap::with_capacity(raw_items.len());
        for item in raw_items {
            if item_ids.contains_key(&item.id) {
                tracing::debug!(item_id = %item.id, "Duplicate item record ignored");
                continue;
            }
            item_ids.insert(item.id.clone(), items.len());
            items.push(item);
        }

        let mut dropped = 0usize;
        let triplets: Vec<(usize, usize, f32)> = ratings
            .iter()
            .filter_map(|r| {
                let entry = match (user_ids.get(&r.user_id), item_ids.get(&r.item_id)) {
                    (Some(&u), Some(&i)) if r.rating > 0.0 && r.rating.is_finite() => {
                        Some((u, i, r.rating))
                    }
                    _ => None,
                };
                if entry.is_none() {
                    dropped += 1;
                }
                entry
            })
            .collect();

        let by_user = CompressedMatrix::from_triplets(users.len(), items.len(), &triplets);
        let by_item = by_user.transpose();

        tracing::info!(
            users = users.len(),
            items = items.len(),
            ratings = by_user.nnz(),
            dropped,
            "Rating store built"
        );

        Self {
            users,
            items,
            user_ids,
            item_ids,
            by_user,
            by_item,
            built_at: Utc::now(),
        }
    }

    pub fn get_user(&self, id: UserId) -> Option<&User> {
        self.user_index(id).map(|idx| &self.users[idx])
    }

    pub fn get_item(&self, id: &ItemId) -> Option<&Item> {
        self.item_index(id).map(|idx| &self.items[idx])
    }

    /// Looks up an item from its textual form
    ///
    /// Tries the raw text first (ISBNs may look numeric but keep leading zeros),
    /// then the integer form.
    pub fn find_item(&self, raw: &str) -> Option<&Item> {
        self.get_item(&ItemId::Text(raw.to_string())).or_else(|| {
            raw.parse::<i64>()
                .ok()
                .and_then(|id| self.get_item(&ItemId::Numeric(id)))
        })
    }

    pub fn user_index(&self, id: UserId) -> Option<usize> {
        self.user_ids.get(&id).copied()
    }

    pub fn item_index(&self, id: &ItemId) -> Option<usize> {
        self.item_ids.get(id).copied()
    }

    pub fn user_at(&self, idx: usize) -> Option<&User> {
        self.users.get(idx)
    }

    pub fn item_at(&self, idx: usize) -> Option<&Item> {
        self.items.get(idx)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    pub fn num_ratings(&self) -> usize {
        self.by_user.nnz()
    }

    /// Item indices the user has a stored rating for
    pub fn rated_items_of(&self, user_idx: usize) -> BTreeSet<usize> {
        self.by_user.slot(user_idx).indices.iter().copied().collect()
    }

    /// The user's row: item indices (sorted) with their ratings
    pub fn ratings_of_user(&self, user_idx: usize) -> SparseVec<'_> {
        self.by_user.slot(user_idx)
    }

    /// Stored ratings of an item, in user index order
    pub fn ratings_of_item(&self, item_idx: usize) -> &[f32] {
        self.by_item.slot(item_idx).values
    }

    /// The item's column: user indices (sorted) with their ratings
    pub fn raters_of_item(&self, item_idx: usize) -> SparseVec<'_> {
        self.by_item.slot(item_idx)
    }

    /// Every stored rating, user-major order
    pub fn all_rating_values(&self) -> &[f32] {
        self.by_user.values()
    }

    pub fn rating(&self, user_idx: usize, item_idx: usize) -> Option<f32> {
        self.by_user.get(user_idx, item_idx)
    }

    /// Mean of the user's own ratings, 0 when the user rated nothing
    pub fn user_mean(&self, user_idx: usize) -> f64 {
        self.by_user.slot(user_idx).mean()
    }

    /// Mean of all stored ratings, 0 for an empty matrix
    pub fn global_mean(&self) -> f64 {
        sparse::mean(self.all_rating_values())
    }

    pub fn stats(&self) -> StoreStats {
        let cells = self.num_users() * self.num_items();
        StoreStats {
            users: self.num_users(),
            items: self.num_items(),
            ratings: self.num_ratings(),
            global_mean: self.global_mean(),
            density: if cells == 0 {
                0.0
            } else {
                self.num_ratings() as f64 / cells as f64
            },
            built_at: self.built_at,
        }
    }
}
