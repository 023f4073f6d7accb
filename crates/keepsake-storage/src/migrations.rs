// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded SQL migrations for the record table.
//!
//! These version the database layout, not the JSON records inside it;
//! record upgrades are `keepsake_schema::migrate`.

use keepsake_core::KeepsakeError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply every pending table migration. Refinery keeps its own history
/// table, so this is safe to call on every open.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), KeepsakeError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(KeepsakeError::persistence)?;
    Ok(())
}
