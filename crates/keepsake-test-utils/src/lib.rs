// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Keepsake integration tests.
//!
//! # Components
//!
//! - [`MemoryGateway`] - in-memory persistence gateway with failure injection
//! - [`fixtures`] - minimal and maximal instances of every entity kind

pub mod fixtures;
pub mod memory_gateway;

pub use memory_gateway::MemoryGateway;
