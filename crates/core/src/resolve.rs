// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Name resolution strategies.
//!
//! A strategy expands a possibly partial identifier into the ordered list of
//! candidates the catalog tries against the database. The first candidate
//! that resolves wins.

use std::{fmt::Debug, sync::Arc};

use introspect_type::Identifier;
use serde::{Deserialize, Serialize};

pub trait ResolutionStrategy: Debug + Send + Sync {
	/// Candidates to try, in order. Never empty.
	fn resolution_order(&self, identifier: &Identifier) -> Vec<Identifier>;
}

/// Tries the identifier exactly as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimResolution;

impl ResolutionStrategy for VerbatimResolution {
	fn resolution_order(&self, identifier: &Identifier) -> Vec<Identifier> {
		vec![identifier.clone()]
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
	Upper,
	Lower,
}

/// Tries the identifier as given, then case folded, for databases that fold
/// unquoted names (upper on Oracle, lower on PostgreSQL).
#[derive(Debug, Clone, Copy)]
pub struct FoldingResolution {
	fold: Fold,
}

impl FoldingResolution {
	pub fn new(fold: Fold) -> Self {
		Self {
			fold,
		}
	}
}

impl ResolutionStrategy for FoldingResolution {
	fn resolution_order(&self, identifier: &Identifier) -> Vec<Identifier> {
		let folded = match self.fold {
			Fold::Upper => identifier.map_parts(str::to_uppercase),
			Fold::Lower => identifier.map_parts(str::to_lowercase),
		};

		let mut order = vec![identifier.clone()];
		if let Ok(folded) = folded {
			if folded.to_string() != identifier.to_string() {
				order.push(folded);
			}
		}
		order
	}
}

/// Configurable choice of strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionKind {
	#[default]
	Verbatim,
	FoldUpper,
	FoldLower,
}

impl ResolutionKind {
	pub fn strategy(&self) -> Arc<dyn ResolutionStrategy> {
		match self {
			ResolutionKind::Verbatim => Arc::new(VerbatimResolution),
			ResolutionKind::FoldUpper => Arc::new(FoldingResolution::new(Fold::Upper)),
			ResolutionKind::FoldLower => Arc::new(FoldingResolution::new(Fold::Lower)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rendered(order: Vec<Identifier>) -> Vec<String> {
		order.iter().map(|i| i.to_string()).collect()
	}

	#[test]
	fn test_verbatim_returns_input() {
		let id = Identifier::qualified("dbo", "Orders").unwrap();
		assert_eq!(rendered(VerbatimResolution.resolution_order(&id)), vec!["dbo.Orders"]);
	}

	#[test]
	fn test_folding_appends_folded_candidate() {
		let id = Identifier::qualified("dbo", "Orders").unwrap();
		let order = FoldingResolution::new(Fold::Upper).resolution_order(&id);
		assert_eq!(rendered(order), vec!["dbo.Orders", "DBO.ORDERS"]);
	}

	#[test]
	fn test_folding_skips_identical_candidate() {
		let id = Identifier::new("orders").unwrap();
		let order = FoldingResolution::new(Fold::Lower).resolution_order(&id);
		assert_eq!(rendered(order), vec!["orders"]);
	}

	#[test]
	fn test_kind_deserialize() {
		let kind: ResolutionKind = serde_json::from_str(r#""fold_lower""#).unwrap();
		assert_eq!(kind, ResolutionKind::FoldLower);
		let id = Identifier::new("Orders").unwrap();
		assert_eq!(kind.strategy().resolution_order(&id).len(), 2);
	}
}
