//! # kindred-store
//!
//! Durable local storage for the Kindred client, backed by SQLite.
//!
//! Everything lives in one namespaced key/value table holding JSON records.
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection` and provides typed helpers for chat threads,
//! conversation summaries, and the cached fallback copies of remote state.

pub mod cache;
pub mod database;
pub mod migrations;
pub mod threads;

mod error;

pub use database::Database;
pub use error::StoreError;
