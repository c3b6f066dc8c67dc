//! SQLite database operations for the drinks menu.
//!
//! Generally clients should never call these methods directly, and prefer to use the
//! [`DrinkManagement`](crate::traits::DrinkManagement) trait methods that are implemented on the
//! [`SqliteDatabase`](crate::SqliteDatabase) struct instead.

use sqlx::{error::ErrorKind, SqliteConnection};

use crate::{
    db_types::{serialize_recipe, Drink, DrinkRow, NewDrink, UpdateDrink},
    traits::DrinkApiError,
};

pub async fn fetch_drinks(conn: &mut SqliteConnection) -> Result<Vec<Drink>, DrinkApiError> {
    let rows = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks ORDER BY id")
        .fetch_all(conn)
        .await?;
    rows.into_iter().map(|row| Drink::try_from(row).map_err(DrinkApiError::from)).collect()
}

pub async fn fetch_drink_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Drink>, DrinkApiError> {
    let row = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    row.map(Drink::try_from).transpose().map_err(DrinkApiError::from)
}

/// Inserts a new drink and returns the id assigned by the store.
pub async fn insert_drink(drink: &NewDrink, conn: &mut SqliteConnection) -> Result<i64, DrinkApiError> {
    let recipe = serialize_recipe(&drink.recipe)?;
    let result = sqlx::query("INSERT INTO drinks (title, recipe) VALUES ($1, $2)")
        .bind(&drink.title)
        .bind(recipe)
        .execute(conn)
        .await;
    match result {
        Ok(res) => Ok(res.last_insert_rowid()),
        Err(sqlx::Error::Database(de)) if matches!(de.kind(), ErrorKind::UniqueViolation) => {
            Err(DrinkApiError::TitleExists(drink.title.clone()))
        },
        Err(e) => Err(e.into()),
    }
}

/// Applies a partial update. Fields that are `None` keep their current values.
pub async fn update_drink(id: i64, update: &UpdateDrink, conn: &mut SqliteConnection) -> Result<(), DrinkApiError> {
    let recipe = update.recipe.as_deref().map(serialize_recipe).transpose()?;
    let result = sqlx::query(
        "UPDATE drinks SET title = COALESCE($2, title), recipe = COALESCE($3, recipe) WHERE id = $1",
    )
    .bind(id)
    .bind(update.title.as_deref())
    .bind(recipe)
    .execute(conn)
    .await;
    match result {
        Ok(res) if res.rows_affected() == 0 => Err(DrinkApiError::DrinkNotFound(id)),
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(de)) if matches!(de.kind(), ErrorKind::UniqueViolation) => {
            Err(DrinkApiError::TitleExists(update.title.clone().unwrap_or_default()))
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_drink(id: i64, conn: &mut SqliteConnection) -> Result<(), DrinkApiError> {
    let res = sqlx::query("DELETE FROM drinks WHERE id = $1").bind(id).execute(conn).await?;
    if res.rows_affected() == 0 {
        return Err(DrinkApiError::DrinkNotFound(id));
    }
    Ok(())
}
