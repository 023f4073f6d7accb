// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traits implemented by persistence backends.

pub mod gateway;

pub use gateway::PersistenceGateway;
