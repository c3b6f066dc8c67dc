//! `SqliteDatabase` is a concrete implementation of the menu storage backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the traits defined in the
//! [`traits`](crate::traits) module.
use std::fmt::Debug;

use log::warn;
use sqlx::SqlitePool;

use super::db::{drinks, new_pool};
use crate::{
    db_types::{Drink, NewDrink, UpdateDrink},
    traits::{DrinkApiError, DrinkManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object with a connection pool attached to the given database URL.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Provisions the schema by running any outstanding embedded migrations. Safe to call on every
    /// startup.
    pub async fn create_schema(&self) -> Result<(), DrinkApiError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DrinkApiError::DatabaseError(e.to_string()))
    }

    /// Drops all menu data and re-provisions the schema from scratch.
    ///
    /// This is a destructive administrative operation. It is only ever invoked through an explicit
    /// CLI flag on the server binary, never as part of normal startup.
    pub async fn drop_and_recreate_all(&self) -> Result<(), DrinkApiError> {
        warn!("🚨️ Dropping all drink records from {}", self.url);
        sqlx::query("DROP TABLE IF EXISTS drinks")
            .execute(&self.pool)
            .await
            .map_err(DrinkApiError::from)?;
        sqlx::query("DROP TABLE IF EXISTS _sqlx_migrations")
            .execute(&self.pool)
            .await
            .map_err(DrinkApiError::from)?;
        self.create_schema().await
    }
}

impl DrinkManagement for SqliteDatabase {
    async fn fetch_drinks(&self) -> Result<Vec<Drink>, DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        drinks::fetch_drinks(&mut conn).await
    }

    async fn fetch_drink(&self, id: i64) -> Result<Option<Drink>, DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        drinks::fetch_drink_by_id(id, &mut conn).await
    }

    async fn insert_drink(&self, drink: NewDrink) -> Result<Drink, DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        let id = drinks::insert_drink(&drink, &mut conn).await?;
        drinks::fetch_drink_by_id(id, &mut conn).await?.ok_or(DrinkApiError::DrinkNotFound(id))
    }

    async fn update_drink(&self, id: i64, update: UpdateDrink) -> Result<Drink, DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        drinks::update_drink(id, &update, &mut conn).await?;
        drinks::fetch_drink_by_id(id, &mut conn).await?.ok_or(DrinkApiError::DrinkNotFound(id))
    }

    async fn delete_drink(&self, id: i64) -> Result<(), DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        drinks::delete_drink(id, &mut conn).await
    }
}
