mod events;
mod interactions;
mod schema;
mod sessions;
mod store;

pub use schema::run_migrations;
pub use store::SqliteStore;
