// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test tooling for the Introspect crates.

pub mod memory;
pub mod util;

pub use memory::{MemoryCatalog, MemoryRoutine, MemoryTable, MemoryView, Query};
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber honouring `RUST_LOG`. Safe to call from
/// every test.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}
