// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keepsake stats` command implementation.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use keepsake_config::KeepsakeConfig;
use keepsake_core::KeepsakeError;
use keepsake_core::model::{StorageInfo, StorageStats};
use keepsake_storage::{Collections, LoadOptions, SqliteGateway, Store, accountant};

/// Structured output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub info: StorageInfo,
    pub stats: StorageStats,
}

/// Load the store and print usage against the configured quota.
/// Ctrl-C interrupts the accounting walk.
pub async fn run_stats(config: &KeepsakeConfig, json: bool) -> Result<(), KeepsakeError> {
    let gateway = SqliteGateway::open(&config.storage).await?;
    let (store, _) = Store::open(gateway, LoadOptions::from(&config.load)).await?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, cancelling accounting");
            on_interrupt.cancel();
        }
    });
    let computed = account(
        store.collections().clone(),
        config.storage.quota_bytes,
        cancel,
    )
    .await;
    watcher.abort();
    store.gateway().inner().close().await?;
    let (info, stats) = computed?;

    if json {
        let out = serde_json::to_string_pretty(&StatsResponse { info, stats })
            .map_err(|e| KeepsakeError::Internal(format!("failed to serialize stats: {e}")))?;
        println!("{out}");
    } else {
        print!("{}", render_stats(&info, &stats));
    }
    Ok(())
}

/// Run the accounting walk on the blocking pool, leaving the runtime free
/// to deliver the interrupt that cancels it.
async fn account(
    collections: Collections,
    quota: u64,
    cancel: CancellationToken,
) -> Result<(StorageInfo, StorageStats), KeepsakeError> {
    tokio::task::spawn_blocking(move || accountant::compute(&collections, quota, &cancel))
        .await
        .map_err(|e| KeepsakeError::Internal(format!("accounting task failed: {e}")))?
}

/// Format a byte count with a binary unit.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn render_stats(info: &StorageInfo, stats: &StorageStats) -> String {
    let b = &info.breakdown;
    let mut out = format!(
        "usage: {} of {} ({:.1}%)\n",
        format_bytes(info.usage),
        format_bytes(info.quota),
        info.utilization() * 100.0
    );
    for (label, bytes) in [
        ("sessions", b.sessions),
        ("profiles and memories", b.profiles_and_memories),
        ("images", b.images),
        ("snippets and workflows", b.snippets_and_workflows),
        ("other", b.other),
    ] {
        out.push_str(&format!("  {:<24}{}\n", format!("{label}:"), format_bytes(bytes)));
    }
    out.push_str(&format!(
        "sessions: {}  personas: {}  images: {}  snippets: {}  workflows: {}\n",
        stats.sessions, stats.gems, stats.images, stats.snippets, stats.workflows
    ));
    out
}
