// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use introspect_type::Identifier;
use serde::Serialize;

use crate::model::{Column, Key, RelationalKey};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexColumn {
	pub column: Column,
	pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Index {
	pub name: String,
	pub columns: Vec<IndexColumn>,
	pub unique: bool,
	pub clustered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
	pub name: String,
	pub definition: String,
	pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TriggerTiming {
	Before,
	After,
	InsteadOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TriggerEvent {
	Insert,
	Update,
	Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trigger {
	pub name: String,
	pub definition: Option<String>,
	pub timing: TriggerTiming,
	pub events: Vec<TriggerEvent>,
	pub enabled: bool,
}

/// A table as seen by one snapshot pass.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
	pub name: Identifier,
	/// Ordered by catalog ordinal.
	pub columns: Arc<[Column]>,
	pub primary_key: Option<Arc<Key>>,
	pub unique_keys: Arc<[Arc<Key>]>,
	/// Keys where this table is the child.
	pub foreign_keys: Arc<[RelationalKey]>,
	/// Keys of other tables (or this one) that reference this table.
	pub child_keys: Vec<RelationalKey>,
	pub indexes: Vec<Index>,
	pub checks: Vec<Check>,
	pub triggers: Vec<Trigger>,
}

/// Lookups by name on a loaded table.
///
/// These match the name exactly, as the catalog spelled it, regardless of the
/// comparison the table was loaded under. Use the loaded names, or compare
/// with a `StringComparison` yourself, for case-insensitive matching.
impl Table {
	pub fn column(&self, name: &str) -> Option<&Column> {
		self.columns.iter().find(|c| c.name == name)
	}

	pub fn unique_key(&self, name: &str) -> Option<&Arc<Key>> {
		self.unique_keys.iter().find(|k| k.name() == Some(name))
	}

	pub fn foreign_key(&self, name: &str) -> Option<&RelationalKey> {
		self.foreign_keys.iter().find(|k| k.name() == Some(name))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		model::KeyType,
		types::{ColumnTypeMetadata, GenericTypeProvider, TypeProvider},
	};

	fn customers() -> Table {
		let email = Column {
			name: "Email".to_string(),
			ordinal: 1,
			column_type: GenericTypeProvider.resolve_column_type(&ColumnTypeMetadata::new("varchar")),
			nullable: false,
			default: None,
			computed: None,
			auto_increment: false,
		};
		let unique = Key::new(Some("UQ_Customers_Email".to_string()), KeyType::Unique, vec![email.clone()], true)
			.unwrap();

		Table {
			name: Identifier::qualified("dbo", "Customers").unwrap(),
			columns: Arc::from(vec![email]),
			primary_key: None,
			unique_keys: Arc::from(vec![Arc::new(unique)]),
			foreign_keys: Arc::from(vec![]),
			child_keys: vec![],
			indexes: vec![],
			checks: vec![],
			triggers: vec![],
		}
	}

	#[test]
	fn test_lookups_match_exact_name() {
		let table = customers();

		assert!(table.column("Email").is_some());
		assert!(table.column("EMAIL").is_none());
		assert!(table.unique_key("UQ_Customers_Email").is_some());
		assert!(table.unique_key("uq_customers_email").is_none());
		assert!(table.foreign_key("UQ_Customers_Email").is_none());
	}
}
