use crate::models::favorites::Favorites;

/// Toggles coin ids in the favourites list.
///
/// Each operation reports whether the list actually changed so the caller
/// only persists real transitions.
pub struct FavoritesService;

impl FavoritesService {
    pub fn new() -> Self {
        Self
    }

    /// Append `coin_id` unless it is already a favourite.
    pub fn add(&self, favorites: &mut Favorites, coin_id: &str) -> bool {
        if favorites.contains(coin_id) {
            return false;
        }
        favorites.coin_ids.push(coin_id.to_string());
        true
    }

    /// Remove `coin_id`; removing an id that is not there is a no-op.
    pub fn remove(&self, favorites: &mut Favorites, coin_id: &str) -> bool {
        let before = favorites.coin_ids.len();
        favorites.coin_ids.retain(|id| id != coin_id);
        favorites.coin_ids.len() != before
    }

    /// Flip membership of `coin_id`. Returns whether it is a favourite afterwards.
    pub fn toggle(&self, favorites: &mut Favorites, coin_id: &str) -> bool {
        if favorites.contains(coin_id) {
            self.remove(favorites, coin_id);
            false
        } else {
            self.add(favorites, coin_id);
            true
        }
    }
}

impl Default for FavoritesService {
    fn default() -> Self {
        Self::new()
    }
}
