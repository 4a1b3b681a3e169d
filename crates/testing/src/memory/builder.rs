// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use introspect_core::{
	interface::{
		CheckRow, ColumnRow, ForeignKeyRow, IndexColumnRow, KeyColumnRow, ParameterRow, RoutineRow, TriggerRow,
	},
	model::{KeyType, ParameterDirection, ReferentialAction, RoutineKind, TriggerEvent, TriggerTiming},
	types::ColumnTypeMetadata,
};
use introspect_type::Identifier;

pub(crate) fn parse(name: &str) -> Identifier {
	name.parse().unwrap_or_else(|err| panic!("invalid test identifier '{name}': {err}"))
}

fn key_rows(name: &str, columns: &[&str]) -> Vec<KeyColumnRow> {
	columns.iter()
		.enumerate()
		.map(|(i, column)| KeyColumnRow {
			constraint_name: Some(name.to_string()),
			column_name: column.to_string(),
			ordinal: i as u32 + 1,
			enabled: true,
		})
		.collect()
}

/// A table definition served by [`MemoryCatalog`](crate::MemoryCatalog).
#[derive(Debug, Clone)]
pub struct MemoryTable {
	pub(crate) name: Identifier,
	pub(crate) columns: Vec<ColumnRow>,
	pub(crate) primary_key: Vec<KeyColumnRow>,
	pub(crate) unique_keys: Vec<KeyColumnRow>,
	pub(crate) foreign_keys: Vec<ForeignKeyRow>,
	pub(crate) indexes: Vec<IndexColumnRow>,
	pub(crate) checks: Vec<CheckRow>,
	pub(crate) triggers: Vec<TriggerRow>,
}

impl MemoryTable {
	pub fn new(name: &str) -> Self {
		Self {
			name: parse(name),
			columns: vec![],
			primary_key: vec![],
			unique_keys: vec![],
			foreign_keys: vec![],
			indexes: vec![],
			checks: vec![],
			triggers: vec![],
		}
	}

	/// Append a nullable column; its ordinal follows the columns added so far.
	pub fn column(self, name: &str, type_name: &str) -> Self {
		let ordinal = self.columns.len() as u32 + 1;
		self.column_row(ColumnRow::new(name, ordinal, ColumnTypeMetadata::new(type_name)))
	}

	/// Append a column with an explicit ordinal, regardless of the order rows
	/// were added in.
	pub fn column_at(self, ordinal: u32, name: &str, type_name: &str) -> Self {
		self.column_row(ColumnRow::new(name, ordinal, ColumnTypeMetadata::new(type_name)))
	}

	pub fn column_row(mut self, row: ColumnRow) -> Self {
		self.columns.push(row);
		self
	}

	pub fn primary_key(mut self, name: &str, columns: &[&str]) -> Self {
		self.primary_key = key_rows(name, columns);
		self
	}

	pub fn unique_key(mut self, name: &str, columns: &[&str]) -> Self {
		self.unique_keys.extend(key_rows(name, columns));
		self
	}

	/// A foreign key referencing the primary key of `parent`.
	pub fn foreign_key(self, name: &str, columns: &[&str], parent: &str) -> Self {
		self.push_foreign_key(name, columns, parent, KeyType::Primary, None)
	}

	/// A foreign key referencing the unique key `parent_key` of `parent`.
	pub fn foreign_key_to_unique(self, name: &str, columns: &[&str], parent: &str, parent_key: &str) -> Self {
		self.push_foreign_key(name, columns, parent, KeyType::Unique, Some(parent_key))
	}

	/// Set the delete and update actions of the most recently added foreign key.
	pub fn actions(mut self, on_delete: ReferentialAction, on_update: ReferentialAction) -> Self {
		if let Some(last) = self.foreign_keys.last().map(|row| row.constraint_name.clone()) {
			for row in self.foreign_keys.iter_mut().filter(|row| row.constraint_name == last) {
				row.on_delete = on_delete;
				row.on_update = on_update;
			}
		}
		self
	}

	fn push_foreign_key(
		mut self,
		name: &str,
		columns: &[&str],
		parent: &str,
		parent_key_type: KeyType,
		parent_key_name: Option<&str>,
	) -> Self {
		let parent = parse(parent);
		// deliver rows in reverse to exercise ordinal ordering
		for (i, column) in columns.iter().enumerate().rev() {
			self.foreign_keys.push(ForeignKeyRow {
				constraint_name: name.to_string(),
				column_name: column.to_string(),
				ordinal: i as u32 + 1,
				parent_table: parent.clone(),
				parent_key_name: parent_key_name.map(str::to_string),
				parent_key_type,
				on_delete: ReferentialAction::NoAction,
				on_update: ReferentialAction::NoAction,
				enabled: true,
			});
		}
		self
	}

	pub fn index(mut self, name: &str, columns: &[&str], unique: bool) -> Self {
		for (i, column) in columns.iter().enumerate() {
			self.indexes.push(IndexColumnRow {
				index_name: name.to_string(),
				column_name: column.to_string(),
				ordinal: i as u32 + 1,
				descending: false,
				unique,
				clustered: false,
			});
		}
		self
	}

	pub fn check(mut self, name: &str, definition: &str) -> Self {
		self.checks.push(CheckRow {
			name: name.to_string(),
			definition: definition.to_string(),
			enabled: true,
		});
		self
	}

	pub fn trigger(mut self, name: &str, timing: TriggerTiming, events: &[TriggerEvent]) -> Self {
		self.triggers.push(TriggerRow {
			name: name.to_string(),
			definition: None,
			timing,
			events: events.to_vec(),
			enabled: true,
		});
		self
	}
}

#[derive(Debug, Clone)]
pub struct MemoryView {
	pub(crate) name: Identifier,
	pub(crate) definition: Option<String>,
	pub(crate) columns: Vec<ColumnRow>,
}

impl MemoryView {
	pub fn new(name: &str, definition: &str) -> Self {
		Self {
			name: parse(name),
			definition: Some(definition.to_string()),
			columns: vec![],
		}
	}

	pub fn column(mut self, name: &str, type_name: &str) -> Self {
		let ordinal = self.columns.len() as u32 + 1;
		self.columns.push(ColumnRow::new(name, ordinal, ColumnTypeMetadata::new(type_name)));
		self
	}
}

#[derive(Debug, Clone)]
pub struct MemoryRoutine {
	pub(crate) row: RoutineRow,
}

impl MemoryRoutine {
	pub fn procedure(name: &str) -> Self {
		Self::new(name, RoutineKind::Procedure)
	}

	pub fn function(name: &str, returns: &str) -> Self {
		let mut routine = Self::new(name, RoutineKind::Function);
		routine.row.return_type = Some(ColumnTypeMetadata::new(returns));
		routine
	}

	fn new(name: &str, kind: RoutineKind) -> Self {
		Self {
			row: RoutineRow {
				name: parse(name),
				kind,
				definition: None,
				return_type: None,
				parameters: vec![],
			},
		}
	}

	pub fn parameter(mut self, name: &str, type_name: &str, direction: ParameterDirection) -> Self {
		let ordinal = self.row.parameters.len() as u32 + 1;
		self.row.parameters.push(ParameterRow {
			name: Some(name.to_string()),
			ordinal,
			type_metadata: ColumnTypeMetadata::new(type_name),
			direction,
		});
		self
	}

	pub fn definition(mut self, definition: &str) -> Self {
		self.row.definition = Some(definition.to_string());
		self
	}
}
