use espresso_engine::db_types::Ingredient;
use serde::{Deserialize, Serialize};

/// The success envelope for every drink endpoint: `{success: true, drinks: [...]}`. The element
/// type decides whether the short or long drink representation is returned.
#[derive(Debug, Clone, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self { success: true, drinks }
    }
}

/// The success envelope for DELETE: `{success: true, delete: <id>}`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i64,
}

/// Body of `POST /drinks`. Both fields are required and must be non-empty; the handler rejects
/// anything less with a 422 before touching the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDrinkParams {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Vec<Ingredient>>,
}

/// Body of `PATCH /drinks/{id}`. Only the supplied fields are changed.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDrinkParams {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Vec<Ingredient>>,
}
