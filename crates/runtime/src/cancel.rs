// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::future::Future;

use introspect_type::{Error, Result};
use tokio::select;
use tokio_util::sync::CancellationToken;

/// Run `future` until it completes or `token` fires, whichever comes first.
///
/// On cancellation `future` is dropped, which releases every shared load it
/// was waiting on. Loads that other callers still wait on keep running.
pub async fn cancellable<T>(token: &CancellationToken, future: impl Future<Output = Result<T>>) -> Result<T> {
	select! {
		biased;
		_ = token.cancelled() => Err(Error::Cancelled),
		result = future => result,
	}
}
