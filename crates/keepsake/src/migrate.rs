// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keepsake migrate` command implementation.

use keepsake_config::KeepsakeConfig;
use keepsake_core::{CURRENT_SCHEMA_VERSION, KeepsakeError};
use keepsake_storage::{SqliteGateway, migrate_all};

pub async fn run_migrate(config: &KeepsakeConfig, json: bool) -> Result<(), KeepsakeError> {
    let gateway = SqliteGateway::open(&config.storage).await?;
    let report = migrate_all(&gateway).await?;
    gateway.close().await?;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| KeepsakeError::Internal(format!("failed to serialize report: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "scanned {} record(s), upgraded {} to schema version {CURRENT_SCHEMA_VERSION}",
        report.scanned,
        report.upgraded.len()
    );
    for key in &report.upgraded {
        println!("  upgraded {key}");
    }
    for warning in &report.warnings {
        println!("  {}: {} {}", warning.key, warning.field, warning.message);
    }
    for failed in &report.failed {
        println!("  left {} unchanged: {}", failed.key, failed.reason);
    }
    Ok(())
}
