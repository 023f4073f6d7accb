// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence for Keepsake.
//!
//! A SQLite-backed [`PersistenceGateway`](keepsake_core::PersistenceGateway)
//! with embedded table migrations, a per-key serialized writer with a read
//! cache, and the entity [`Store`] that loads, repairs, quarantines and
//! saves typed records. [`accountant`] computes storage usage over what the
//! store holds.

pub mod accountant;
pub mod codec;
pub mod database;
pub mod gateway;
pub mod keys;
pub mod load;
pub mod migrations;
pub mod report;
pub mod store;
pub mod upgrade;
pub mod writer;

pub use database::Database;
pub use gateway::SqliteGateway;
pub use load::LoadOptions;
pub use report::{LoadReport, MigrationReport, Quarantined, RecordWarning, Repair};
pub use store::{Collections, Store};
pub use upgrade::migrate_all;
pub use writer::{SerializedGateway, Ticket};
