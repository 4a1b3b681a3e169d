// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The boundary to a concrete database product.
//!
//! A [`CatalogSource`] runs the dialect's catalog queries over a live
//! connection and hands back flat rows. It does no caching of its own; the
//! catalog crate decides how often each query runs.

mod row;

use std::fmt;

use async_trait::async_trait;
use introspect_type::{Identifier, IdentifierDefaults, Result};
pub use row::{
	CheckRow, ChildKeyRow, ColumnRow, ForeignKeyRow, IndexColumnRow, KeyColumnRow, ParameterRow, RoutineRow,
	SequenceRow, SynonymRow, TriggerRow, ViewRow,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ObjectKind {
	Table,
	View,
	Sequence,
	Synonym,
	Routine,
}

impl fmt::Display for ObjectKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ObjectKind::Table => f.write_str("table"),
			ObjectKind::View => f.write_str("view"),
			ObjectKind::Sequence => f.write_str("sequence"),
			ObjectKind::Synonym => f.write_str("synonym"),
			ObjectKind::Routine => f.write_str("routine"),
		}
	}
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
	/// The server, database and schema the connection resolves unqualified
	/// names against.
	async fn identifier_defaults(&self) -> Result<IdentifierDefaults>;

	/// Canonical names of every object of `kind`.
	async fn object_names(&self, kind: ObjectKind) -> Result<Vec<Identifier>>;

	/// The canonical name of the object of `kind` matching `candidate`, or
	/// `None` when no such object exists.
	async fn resolve_name(&self, kind: ObjectKind, candidate: &Identifier) -> Result<Option<Identifier>>;

	/// Columns of a table or view, in any order.
	async fn columns(&self, object: &Identifier) -> Result<Vec<ColumnRow>>;

	/// Primary key columns; empty when the table has none.
	async fn primary_key(&self, table: &Identifier) -> Result<Vec<KeyColumnRow>>;

	async fn unique_keys(&self, table: &Identifier) -> Result<Vec<KeyColumnRow>>;

	async fn foreign_keys(&self, table: &Identifier) -> Result<Vec<ForeignKeyRow>>;

	async fn child_keys(&self, table: &Identifier) -> Result<Vec<ChildKeyRow>>;

	async fn indexes(&self, _table: &Identifier) -> Result<Vec<IndexColumnRow>> {
		Ok(vec![])
	}

	async fn checks(&self, _table: &Identifier) -> Result<Vec<CheckRow>> {
		Ok(vec![])
	}

	async fn triggers(&self, _table: &Identifier) -> Result<Vec<TriggerRow>> {
		Ok(vec![])
	}

	async fn view(&self, _name: &Identifier) -> Result<Option<ViewRow>> {
		Ok(None)
	}

	async fn sequence(&self, _name: &Identifier) -> Result<Option<SequenceRow>> {
		Ok(None)
	}

	async fn synonym(&self, _name: &Identifier) -> Result<Option<SynonymRow>> {
		Ok(None)
	}

	async fn routine(&self, _name: &Identifier) -> Result<Option<RoutineRow>> {
		Ok(None)
	}
}
