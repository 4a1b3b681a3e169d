// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use introspect_core::resolve::ResolutionKind;
use introspect_type::{IdentifierDefaults, StringComparison};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CONCURRENT_LOADS: usize = 16;

/// Configuration for a [`Catalog`](crate::Catalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
	/// How name components are compared.
	pub comparison: StringComparison,
	/// Overrides the defaults reported by the catalog source.
	pub defaults: Option<IdentifierDefaults>,
	pub resolution: ResolutionKind,
	/// Upper bound on objects loaded at once while enumerating.
	pub max_concurrent_loads: usize,
}

impl CatalogConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_comparison(mut self, comparison: StringComparison) -> Self {
		self.comparison = comparison;
		self
	}

	pub fn with_defaults(mut self, defaults: IdentifierDefaults) -> Self {
		self.defaults = Some(defaults);
		self
	}

	pub fn with_resolution(mut self, resolution: ResolutionKind) -> Self {
		self.resolution = resolution;
		self
	}

	pub fn with_max_concurrent_loads(mut self, max_concurrent_loads: usize) -> Self {
		self.max_concurrent_loads = max_concurrent_loads.max(1);
		self
	}
}

impl Default for CatalogConfig {
	fn default() -> Self {
		Self {
			comparison: StringComparison::OrdinalIgnoreCase,
			defaults: None,
			resolution: ResolutionKind::Verbatim,
			max_concurrent_loads: DEFAULT_MAX_CONCURRENT_LOADS,
		}
	}
}
