//! # Espresso server
//! This crate hosts the HTTP server for the coffee-shop drinks menu. It is responsible for:
//! Serving the public menu and the permission-gated detailed menu.
//! Letting authorized staff create, update and delete drinks.
//! Verifying bearer tokens against the issuer's published key set and checking permission claims.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `GET /drinks`: The public menu, short drink representation. No token required.
//! * `GET /drinks-detail`: The detailed menu. Requires the `get:drinks-detail` permission.
//! * `POST /drinks`: Creates a drink. Requires the `post:drinks` permission.
//! * `PATCH /drinks/{id}`: Partially updates a drink. Requires the `patch:drinks` permission.
//! * `DELETE /drinks/{id}`: Deletes a drink. Requires the `delete:drinks` permission.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;
