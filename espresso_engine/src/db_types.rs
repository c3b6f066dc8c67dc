use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

//--------------------------------------     Ingredient      ---------------------------------------------------------

/// A single entry in a drink recipe. `parts` is the relative share of this ingredient in the drink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

/// The public view of an ingredient. The ingredient name is part of the house recipe and is only
/// exposed to staff via the long drink representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSummary {
    pub color: String,
    pub parts: i64,
}

impl From<&Ingredient> for IngredientSummary {
    fn from(ingredient: &Ingredient) -> Self {
        Self { color: ingredient.color.clone(), parts: ingredient.parts }
    }
}

//--------------------------------------     Drink           ---------------------------------------------------------

/// A drink record. Serializing a `Drink` directly yields the long representation,
/// `{id, title, recipe: [{name, color, parts}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    /// The short representation of the drink, `{id, title, recipe: [{color, parts}]}`, suitable for
    /// the public menu.
    pub fn short(&self) -> DrinkSummary {
        DrinkSummary {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.iter().map(IngredientSummary::from).collect(),
        }
    }
}

/// The short (public) representation of a [`Drink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkSummary {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<IngredientSummary>,
}

/// A drink that has not been persisted yet. The id is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// A partial update to a drink. Only fields that are `Some` are written; the others keep their
/// current values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDrink {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

impl UpdateDrink {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}

//--------------------------------------     DrinkRow        ---------------------------------------------------------

/// The raw database row for a drink. The recipe is persisted as serialized JSON text and must
/// deserialize back into a list of [`Ingredient`]s.
#[derive(Debug, Clone, FromRow)]
pub struct DrinkRow {
    pub id: i64,
    pub title: String,
    pub recipe: String,
}

#[derive(Debug, Clone, Error)]
#[error("The stored recipe is not a valid ingredient list. {0}")]
pub struct RecipeFormatError(pub String);

impl TryFrom<DrinkRow> for Drink {
    type Error = RecipeFormatError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        let recipe = serde_json::from_str::<Vec<Ingredient>>(&row.recipe)
            .map_err(|e| RecipeFormatError(e.to_string()))?;
        Ok(Self { id: row.id, title: row.title, recipe })
    }
}

/// Serializes a recipe to the text form it is persisted in.
pub fn serialize_recipe(recipe: &[Ingredient]) -> Result<String, RecipeFormatError> {
    serde_json::to_string(recipe).map_err(|e| RecipeFormatError(e.to_string()))
}
