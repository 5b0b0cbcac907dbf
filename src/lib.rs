pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod resource;
pub mod sanitize;
pub mod store;
pub mod validation;

pub use app::{app, AppState};
pub use resource::{BookmarkError, BookmarkResource};
pub use store::{BookmarkStore, MemoryStore, PostgresStore, StoreError};
