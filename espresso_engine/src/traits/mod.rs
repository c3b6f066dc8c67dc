//! # Storage backend contracts.
//!
//! This module defines the interface contract that menu storage *backends* must implement.
//!
//! [`DrinkManagement`] covers the full lifecycle of a drink record: listing, lookup by id,
//! insertion (where the store assigns the id), partial in-place updates, and permanent deletion.
//! A backend must be able to distinguish a unique-title violation from a missing record, since the
//! server maps these to different HTTP responses.

mod drink_management;

pub use drink_management::{DrinkApiError, DrinkManagement};
