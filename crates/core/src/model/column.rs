// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::Serialize;

use crate::types::ColumnType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
	pub name: String,
	/// Position reported by the catalog, 1-based on most databases.
	pub ordinal: u32,
	pub column_type: ColumnType,
	pub nullable: bool,
	pub default: Option<String>,
	pub computed: Option<String>,
	pub auto_increment: bool,
}
