// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod cancel;
mod memoize;

pub use cancel::cancellable;
pub use memoize::Memoize;
pub use tokio_util::sync::CancellationToken;
