//! # Espresso engine
//! This crate is the storage backend for the espresso menu server. It is responsible for:
//! Defining the drink data types and their public (short) and staff-only (long) representations.
//! Defining the [`traits::DrinkManagement`] contract that storage backends must implement.
//! Providing a SQLite implementation of that contract, [`SqliteDatabase`].
//!
//! ## Traits
//! The [`traits`] module defines the behavior that database backends need to expose in order to be
//! supported by the menu server. Server code should not talk to a backend directly, but go through
//! the [`MenuApi`] facade instead.

pub mod db_types;
mod menu_api;
pub mod sqlite;
pub mod traits;

pub use menu_api::MenuApi;
pub use sqlite::SqliteDatabase;
pub use traits::{DrinkApiError, DrinkManagement};
