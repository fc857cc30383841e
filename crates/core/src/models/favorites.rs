use serde::{Deserialize, Serialize};

/// Ordered set of favourite coin ids, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    pub coin_ids: Vec<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, coin_id: &str) -> bool {
        self.coin_ids.iter().any(|id| id == coin_id)
    }

    pub fn len(&self) -> usize {
        self.coin_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coin_ids.is_empty()
    }
}
