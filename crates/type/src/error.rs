// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Error types shared by every Introspect crate.

/// Errors raised while resolving identifiers or loading catalog metadata.
///
/// `Clone` so that one failed shared load can be handed to every caller that
/// was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("invalid identifier: {reason}")]
	InvalidIdentifier {
		reason: String,
	},

	#[error("invalid key: {reason}")]
	InvalidKey {
		reason: String,
	},

	#[error("catalog query failed: {message}")]
	Query {
		message: String,
	},

	#[error("operation cancelled")]
	Cancelled,

	#[error("catalog load aborted: {reason}")]
	LoadAborted {
		reason: String,
	},
}

impl Error {
	pub fn invalid_identifier(reason: impl Into<String>) -> Self {
		Error::InvalidIdentifier {
			reason: reason.into(),
		}
	}

	pub fn invalid_key(reason: impl Into<String>) -> Self {
		Error::InvalidKey {
			reason: reason.into(),
		}
	}

	pub fn query(message: impl Into<String>) -> Self {
		Error::Query {
			message: message.into(),
		}
	}

	/// True for failures that may succeed when the same load is retried.
	pub fn is_transient(&self) -> bool {
		matches!(self, Error::Query { .. } | Error::Cancelled | Error::LoadAborted { .. })
	}
}

pub type Result<T> = std::result::Result<T, Error>;
