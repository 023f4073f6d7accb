// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derived storage accounting. Never persisted.

use serde::Serialize;

/// Serialized bytes per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageBreakdown {
    pub sessions: u64,
    pub profiles_and_memories: u64,
    /// Image payloads wherever they are stored.
    pub images: u64,
    pub snippets_and_workflows: u64,
    pub other: u64,
}

impl StorageBreakdown {
    pub fn total(&self) -> u64 {
        self.sessions + self.profiles_and_memories + self.images + self.snippets_and_workflows + self.other
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    pub usage: u64,
    pub quota: u64,
    pub breakdown: StorageBreakdown,
}

impl StorageInfo {
    /// Fraction of the quota in use, `0.0` when there is no quota.
    pub fn utilization(&self) -> f64 {
        if self.quota == 0 {
            return 0.0;
        }
        self.usage as f64 / self.quota as f64
    }
}

/// Entity counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    pub sessions: u64,
    pub gems: u64,
    pub images: u64,
    pub snippets: u64,
    pub workflows: u64,
}
