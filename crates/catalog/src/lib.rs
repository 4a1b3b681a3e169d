// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

//! Memoized catalog introspection.
//!
//! [`QueryContext`] loads one unit of work's worth of catalog metadata, each
//! lookup at most once. [`Catalog`] sits in front of it for the lifetime of a
//! connection and keeps every resolved name and loaded object.

mod catalog;
mod config;
mod context;

pub use catalog::Catalog;
pub use config::CatalogConfig;
pub use context::QueryContext;
pub use introspect_core::{Error, Identifier, IdentifierComparer, IdentifierDefaults, IdentifierKey, Result};
pub use introspect_runtime::CancellationToken;
