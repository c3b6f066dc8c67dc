use thiserror::Error;

use crate::db_types::{Drink, NewDrink, RecipeFormatError, UpdateDrink};

#[derive(Debug, Clone, Error)]
pub enum DrinkApiError {
    #[error("Could not complete the request. {0}")]
    DatabaseError(String),
    #[error("A drink with the title '{0}' already exists.")]
    TitleExists(String),
    #[error("No drink with id {0} exists.")]
    DrinkNotFound(i64),
    #[error(transparent)]
    MalformedRecipe(#[from] RecipeFormatError),
}

impl From<sqlx::Error> for DrinkApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// The contract for drink storage backends.
///
/// All operations act on single rows; no operation spans multiple records. Backends must enforce
/// title uniqueness and report a violation as [`DrinkApiError::TitleExists`].
#[allow(async_fn_in_trait)]
pub trait DrinkManagement {
    /// Fetches every drink in the store, ordered by id.
    async fn fetch_drinks(&self) -> Result<Vec<Drink>, DrinkApiError>;

    /// Fetches the drink with the given id, or `None` if no such drink exists.
    async fn fetch_drink(&self, id: i64) -> Result<Option<Drink>, DrinkApiError>;

    /// Inserts a new drink and returns the persisted record, including its assigned id.
    async fn insert_drink(&self, drink: NewDrink) -> Result<Drink, DrinkApiError>;

    /// Applies a partial update to the drink with the given id and returns the updated record.
    /// Fails with [`DrinkApiError::DrinkNotFound`] if the id is absent.
    async fn update_drink(&self, id: i64, update: UpdateDrink) -> Result<Drink, DrinkApiError>;

    /// Permanently removes the drink with the given id.
    /// Fails with [`DrinkApiError::DrinkNotFound`] if the id is absent.
    async fn delete_drink(&self, id: i64) -> Result<(), DrinkApiError>;
}
