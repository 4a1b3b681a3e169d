// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod wait;

pub use wait::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, wait_for, wait_for_calls, wait_for_condition};
