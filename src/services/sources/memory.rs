use crate::{
    error::AppResult,
    models::{Dataset, Item, RatingTriple, User},
    services::sources::RatingSource,
};

/// Source over records that are already in memory
///
/// Used when an embedding application produces the records itself, and by tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    dataset: Dataset,
}

impl InMemorySource {
    pub fn new(users: Vec<User>, items: Vec<Item>, ratings: Vec<RatingTriple>) -> Self {
        Self {
            dataset: Dataset {
                users,
                items,
                ratings,
            },
        }
    }
}

impl From<Dataset> for InMemorySource {
    fn from(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

#[async_trait::async_trait]
impl RatingSource for InMemorySource {
    async fn load(&self) -> AppResult<Dataset> {
        Ok(self.dataset.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
