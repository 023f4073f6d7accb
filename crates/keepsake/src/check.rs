// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keepsake check` command implementation.

use std::fmt::Write;

use keepsake_config::KeepsakeConfig;
use keepsake_core::KeepsakeError;
use keepsake_storage::{LoadOptions, LoadReport, SqliteGateway, Store};

/// Load the whole store and print what the load had to do.
///
/// The store writes only when `load.move_quarantined` or
/// `load.rewrite_migrated` is enabled.
pub async fn run_check(config: &KeepsakeConfig, json: bool) -> Result<(), KeepsakeError> {
    let gateway = SqliteGateway::open(&config.storage).await?;
    let (store, report) = Store::open(gateway, LoadOptions::from(&config.load)).await?;
    store.gateway().inner().close().await?;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| KeepsakeError::Internal(format!("failed to serialize report: {e}")))?;
        println!("{out}");
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

pub fn render_report(report: &LoadReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "loaded {} record(s), {} stored at an older schema version",
        report.loaded, report.migrated
    );
    if let Some(version) = report.stored_version {
        let _ = writeln!(out, "store marked at schema version {version}");
    }
    for q in &report.quarantined {
        match &q.moved_to {
            Some(target) => {
                let _ = writeln!(out, "quarantined {} (moved to {}): {}", q.key, target, q.reason);
            }
            None => {
                let _ = writeln!(out, "quarantined {}: {}", q.key, q.reason);
            }
        }
    }
    for r in &report.repairs {
        let _ = writeln!(out, "repaired {}: {}", r.key, r.action);
    }
    for w in &report.warnings {
        let _ = writeln!(out, "warning {} `{}`: {}", w.key, w.field, w.message);
    }
    if report.is_clean() {
        out.push_str("all records loaded cleanly\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_storage::{Quarantined, RecordWarning};

    #[test]
    fn clean_report() {
        let report = LoadReport {
            loaded: 3,
            ..LoadReport::default()
        };
        let out = render_report(&report);
        assert!(out.starts_with("loaded 3 record(s), 0 stored"));
        assert!(out.ends_with("all records loaded cleanly\n"));
    }

    #[test]
    fn lists_every_problem() {
        let mut report = LoadReport {
            loaded: 1,
            migrated: 1,
            ..LoadReport::default()
        };
        report.quarantined.push(Quarantined {
            key: "gem/bad".into(),
            reason: "malformed gem record".into(),
            moved_to: Some("quarantine/gem/bad".into()),
        });
        report.repair("session/s1", "message list is missing; using an empty message list");
        report.warnings.push(RecordWarning {
            key: "settings".into(),
            field: "backgroundBlur".into(),
            message: "clamped 999 to 20".into(),
        });

        let out = render_report(&report);
        assert!(out.contains("quarantined gem/bad (moved to quarantine/gem/bad): malformed gem record"));
        assert!(out.contains("repaired session/s1: message list is missing"));
        assert!(out.contains("warning settings `backgroundBlur`: clamped 999 to 20"));
        assert!(!out.contains("cleanly"));
    }
}
