//! Unified API for accessing the drinks menu.

use std::fmt::Debug;

use log::trace;

use crate::{
    db_types::{Drink, NewDrink, UpdateDrink},
    traits::{DrinkApiError, DrinkManagement},
};

/// The `MenuApi` provides a unified API for accessing the drinks menu, independent of the storage
/// backend in use.
pub struct MenuApi<B> {
    db: B,
}

impl<B: Debug> Debug for MenuApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MenuApi ({:?})", self.db)
    }
}

impl<B> MenuApi<B>
where B: DrinkManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches all drinks on the menu, ordered by id.
    pub async fn fetch_all_drinks(&self) -> Result<Vec<Drink>, DrinkApiError> {
        self.db.fetch_drinks().await
    }

    /// Fetches the drink with the given id. If no drink exists, `None` is returned.
    pub async fn drink_by_id(&self, id: i64) -> Result<Option<Drink>, DrinkApiError> {
        self.db.fetch_drink(id).await
    }

    /// Creates a new drink and returns the persisted record with its assigned id.
    pub async fn create_drink(&self, drink: NewDrink) -> Result<Drink, DrinkApiError> {
        trace!("🍸️ Creating drink '{}'", drink.title);
        self.db.insert_drink(drink).await
    }

    /// Applies a partial update to the given drink and returns the updated record.
    pub async fn update_drink(&self, id: i64, update: UpdateDrink) -> Result<Drink, DrinkApiError> {
        trace!("🍸️ Updating drink {id}");
        self.db.update_drink(id, update).await
    }

    /// Permanently removes the drink with the given id.
    pub async fn delete_drink(&self, id: i64) -> Result<(), DrinkApiError> {
        trace!("🍸️ Deleting drink {id}");
        self.db.delete_drink(id).await
    }
}
