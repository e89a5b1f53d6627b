//! Postgres-backed price reader and event store

pub mod postgres;

pub use postgres::PostgresDatabase;
