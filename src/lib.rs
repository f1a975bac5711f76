//! Bakery API: REST service over bakeries and baked goods backed by SQLite.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError, Entity};
pub use model::{BakedGood, Bakery, NewBakedGood};
pub use routes::{api_routes, app, common_routes};
pub use state::AppState;
pub use store::{connect, ensure_tables, seed_bakeries, BakeryStore, SqliteStore};
