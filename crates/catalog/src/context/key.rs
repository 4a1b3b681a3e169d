// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use introspect_core::{
	interface::KeyColumnRow,
	model::{Column, Key, KeyType},
};
use introspect_type::{Identifier, Result};
use tracing::warn;

use super::QueryContext;

/// The rows of one key constraint, gathered from the flat row list.
pub(super) struct KeyColumns {
	name: Option<String>,
	enabled: bool,
	columns: Vec<(u32, String)>,
}

impl KeyColumns {
	/// All rows form one key, as for a primary key.
	pub(super) fn single(rows: Vec<KeyColumnRow>) -> Self {
		let name = rows.iter().find_map(|row| row.constraint_name.clone());
		let enabled = rows.iter().all(|row| row.enabled);
		Self {
			name,
			enabled,
			columns: rows.into_iter().map(|row| (row.ordinal, row.column_name)).collect(),
		}
	}

	/// One key per constraint name, in order of first appearance.
	pub(super) fn grouped(rows: Vec<KeyColumnRow>) -> Vec<Self> {
		let mut groups: IndexMap<Option<String>, Self> = IndexMap::new();
		for row in rows {
			let group = groups.entry(row.constraint_name.clone()).or_insert_with(|| Self {
				name: row.constraint_name.clone(),
				enabled: true,
				columns: Vec::new(),
			});
			group.enabled &= row.enabled;
			group.columns.push((row.ordinal, row.column_name));
		}
		groups.into_values().collect()
	}
}

impl QueryContext {
	/// Build a key from its rows, or `None` when a row names a column the table
	/// does not have.
	pub(super) fn build_key(
		&self,
		table: &Identifier,
		key_type: KeyType,
		mut group: KeyColumns,
		columns: &[Column],
	) -> Result<Option<Key>> {
		group.columns.sort_by_key(|(ordinal, _)| *ordinal);
		let names = group.columns.iter().map(|(_, name)| name.as_str());
		let Some(key_columns) = self.key_columns(table, group.name.as_deref(), names, columns) else {
			return Ok(None);
		};
		Key::new(group.name, key_type, key_columns, group.enabled).map(Some)
	}

	/// Look up key columns by name among the table's columns.
	pub(super) fn key_columns<'a>(
		&self,
		table: &Identifier,
		key: Option<&str>,
		names: impl Iterator<Item = &'a str>,
		columns: &[Column],
	) -> Option<Vec<Column>> {
		let comparison = self.comparer.comparison();
		let mut result = Vec::new();
		for name in names {
			match columns.iter().find(|column| comparison.equals(&column.name, name)) {
				Some(column) => result.push(column.clone()),
				None => {
					warn!(%table, key = key.unwrap_or("<unnamed>"), column = name, "key refers to unknown column, skipped");
					return None;
				}
			}
		}
		Some(result)
	}
}
