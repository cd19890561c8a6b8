//! SQLite persistence for the support assistant's chat log.

pub mod connection;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_config, connect_with_settings, DbPool};
pub use repositories::{
    HistoryRepository, InMemoryHistoryRepository, RepositoryError, SqlHistoryRepository,
    StoredMessage,
};
