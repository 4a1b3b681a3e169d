// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Polling waits for tests.
//!
//! Lets a test wait until a load has reached the catalog source instead of
//! sleeping for a fixed time.

use std::time::{Duration, Instant};

use tokio::time::sleep;

use crate::{MemoryCatalog, Query};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Poll `condition` until it holds.
///
/// # Panics
/// Panics if the condition doesn't become true within `timeout`.
pub async fn wait_for_condition<F>(condition: F, timeout: Duration, poll_interval: Duration, timeout_message: &str)
where
	F: Fn() -> bool,
{
	let start = Instant::now();
	while !condition() {
		if start.elapsed() > timeout {
			panic!("Timeout after {:?}: {}", timeout, timeout_message);
		}
		sleep(poll_interval).await;
	}
}

pub async fn wait_for<F>(condition: F, timeout_message: &str)
where
	F: Fn() -> bool,
{
	wait_for_condition(condition, DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL, timeout_message).await
}

/// Wait until `catalog` has been asked `query` about `name` at least `count`
/// times. A call counts as soon as it arrives, before any configured latency.
pub async fn wait_for_calls(catalog: &MemoryCatalog, query: Query, name: &str, count: usize) {
	let message = format!("{query:?} on {name} never reached {count} calls");
	wait_for(|| catalog.calls(query, name) >= count, &message).await
}
