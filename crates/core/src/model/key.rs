// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fmt, sync::Arc};

use introspect_type::{Error, Identifier, Result};
use serde::Serialize;

use crate::model::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KeyType {
	Primary,
	Unique,
	Foreign,
}

impl fmt::Display for KeyType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			KeyType::Primary => f.write_str("PRIMARY KEY"),
			KeyType::Unique => f.write_str("UNIQUE"),
			KeyType::Foreign => f.write_str("FOREIGN KEY"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ReferentialAction {
	#[default]
	NoAction,
	Restrict,
	Cascade,
	SetNull,
	SetDefault,
}

/// A primary, unique or foreign key over an ordered, non-empty column list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Key {
	name: Option<String>,
	key_type: KeyType,
	columns: Vec<Column>,
	enabled: bool,
}

impl Key {
	pub fn new(name: Option<String>, key_type: KeyType, columns: Vec<Column>, enabled: bool) -> Result<Self> {
		if columns.is_empty() {
			return Err(Error::invalid_key(format!(
				"{} {} has no columns",
				key_type,
				name.as_deref().unwrap_or("<unnamed>")
			)));
		}
		Ok(Self {
			name,
			key_type,
			columns,
			enabled,
		})
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn key_type(&self) -> KeyType {
		self.key_type
	}

	pub fn columns(&self) -> &[Column] {
		&self.columns
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}
}

/// A foreign key linking a child table to a primary or unique key of its
/// parent table.
#[derive(Debug, Clone, Serialize)]
pub struct RelationalKey {
	child_table: Identifier,
	child_key: Arc<Key>,
	parent_table: Identifier,
	parent_key: Arc<Key>,
	on_delete: ReferentialAction,
	on_update: ReferentialAction,
}

impl RelationalKey {
	pub fn new(
		child_table: Identifier,
		child_key: Arc<Key>,
		parent_table: Identifier,
		parent_key: Arc<Key>,
		on_delete: ReferentialAction,
		on_update: ReferentialAction,
	) -> Result<Self> {
		if child_key.key_type() != KeyType::Foreign {
			return Err(Error::invalid_key(format!(
				"child key of {} must be a FOREIGN KEY, got {}",
				child_table,
				child_key.key_type()
			)));
		}
		if parent_key.key_type() == KeyType::Foreign {
			return Err(Error::invalid_key(format!(
				"parent key on {} must be a PRIMARY KEY or UNIQUE, got {}",
				parent_table,
				parent_key.key_type()
			)));
		}
		Ok(Self {
			child_table,
			child_key,
			parent_table,
			parent_key,
			on_delete,
			on_update,
		})
	}

	pub fn child_table(&self) -> &Identifier {
		&self.child_table
	}

	pub fn child_key(&self) -> &Arc<Key> {
		&self.child_key
	}

	pub fn parent_table(&self) -> &Identifier {
		&self.parent_table
	}

	pub fn parent_key(&self) -> &Arc<Key> {
		&self.parent_key
	}

	pub fn on_delete(&self) -> ReferentialAction {
		self.on_delete
	}

	pub fn on_update(&self) -> ReferentialAction {
		self.on_update
	}

	pub fn name(&self) -> Option<&str> {
		self.child_key.name()
	}
}
