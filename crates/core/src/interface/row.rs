// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Raw rows returned by a [`CatalogSource`](crate::interface::CatalogSource).
//!
//! Rows are flat: a composite key arrives as one row per key column, and the
//! loaders group and order them.

use introspect_type::Identifier;

use crate::{
	model::{KeyType, ParameterDirection, ReferentialAction, RoutineKind, TriggerEvent, TriggerTiming},
	types::ColumnTypeMetadata,
};

#[derive(Debug, Clone)]
pub struct ColumnRow {
	pub name: String,
	pub ordinal: u32,
	pub type_metadata: ColumnTypeMetadata,
	pub nullable: bool,
	pub default: Option<String>,
	pub computed: Option<String>,
	pub auto_increment: bool,
}

impl ColumnRow {
	pub fn new(name: impl Into<String>, ordinal: u32, type_metadata: ColumnTypeMetadata) -> Self {
		Self {
			name: name.into(),
			ordinal,
			type_metadata,
			nullable: true,
			default: None,
			computed: None,
			auto_increment: false,
		}
	}

	pub fn not_null(mut self) -> Self {
		self.nullable = false;
		self
	}

	pub fn auto_increment(mut self) -> Self {
		self.auto_increment = true;
		self
	}

	pub fn with_default(mut self, default: impl Into<String>) -> Self {
		self.default = Some(default.into());
		self
	}
}

/// One column of a primary or unique key.
#[derive(Debug, Clone)]
pub struct KeyColumnRow {
	pub constraint_name: Option<String>,
	pub column_name: String,
	pub ordinal: u32,
	pub enabled: bool,
}

/// One column of a foreign key, with the parent it points at.
#[derive(Debug, Clone)]
pub struct ForeignKeyRow {
	pub constraint_name: String,
	pub column_name: String,
	pub ordinal: u32,
	pub parent_table: Identifier,
	/// Name of the referenced key; `None` when the catalog only records that
	/// the primary key is referenced.
	pub parent_key_name: Option<String>,
	pub parent_key_type: KeyType,
	pub on_delete: ReferentialAction,
	pub on_update: ReferentialAction,
	pub enabled: bool,
}

/// A foreign key on some other table that references the queried table.
#[derive(Debug, Clone)]
pub struct ChildKeyRow {
	pub child_table: Identifier,
	pub constraint_name: String,
}

#[derive(Debug, Clone)]
pub struct IndexColumnRow {
	pub index_name: String,
	pub column_name: String,
	pub ordinal: u32,
	pub descending: bool,
	pub unique: bool,
	pub clustered: bool,
}

#[derive(Debug, Clone)]
pub struct CheckRow {
	pub name: String,
	pub definition: String,
	pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct TriggerRow {
	pub name: String,
	pub definition: Option<String>,
	pub timing: TriggerTiming,
	pub events: Vec<TriggerEvent>,
	pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct ViewRow {
	pub name: Identifier,
	pub definition: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SequenceRow {
	pub name: Identifier,
	pub start: i64,
	pub increment: i64,
	pub min: Option<i64>,
	pub max: Option<i64>,
	pub cycle: bool,
	pub cache: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct SynonymRow {
	pub name: Identifier,
	pub target: Identifier,
}

#[derive(Debug, Clone)]
pub struct ParameterRow {
	pub name: Option<String>,
	pub ordinal: u32,
	pub type_metadata: ColumnTypeMetadata,
	pub direction: ParameterDirection,
}

#[derive(Debug, Clone)]
pub struct RoutineRow {
	pub name: Identifier,
	pub kind: RoutineKind,
	pub definition: Option<String>,
	pub return_type: Option<ColumnTypeMetadata>,
	pub parameters: Vec<ParameterRow>,
}
