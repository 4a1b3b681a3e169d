// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Per-unit-of-work metadata loading.
//!
//! A [`QueryContext`] owns one memo per loader kind. Whatever a loader fetches
//! is fetched at most once for the context's lifetime, including metadata of
//! other tables pulled in while assembling foreign keys. Drop the context to
//! start over with a fresh snapshot.

mod key;
mod relational;
mod table;

use std::{
	ops::Deref,
	sync::{Arc, Weak},
};

use introspect_core::{
	interface::{CatalogSource, ColumnRow, ObjectKind},
	model::{Column, Key, KeyType, RelationalKey},
	types::TypeProvider,
};
use introspect_runtime::Memoize;
use introspect_type::{Identifier, IdentifierComparer, IdentifierKey, Result};
use tracing::instrument;

#[derive(Clone)]
pub struct QueryContext(Arc<QueryContextInner>);

pub struct QueryContextInner {
	source: Arc<dyn CatalogSource>,
	types: Arc<dyn TypeProvider>,
	comparer: IdentifierComparer,
	memo: Memos,
}

struct Memos {
	table_names: Memoize<IdentifierKey, Option<Identifier>>,
	columns: Memoize<IdentifierKey, Arc<[Column]>>,
	primary_keys: Memoize<IdentifierKey, Option<Arc<Key>>>,
	unique_keys: Memoize<IdentifierKey, Arc<[Arc<Key>]>>,
	foreign_keys: Memoize<IdentifierKey, Arc<[RelationalKey]>>,
}

impl Deref for QueryContext {
	type Target = QueryContextInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl QueryContext {
	pub fn new(source: Arc<dyn CatalogSource>, types: Arc<dyn TypeProvider>, comparer: IdentifierComparer) -> Self {
		Self(Arc::new(QueryContextInner {
			source,
			types,
			comparer,
			memo: Memos {
				table_names: Memoize::new(),
				columns: Memoize::new(),
				primary_keys: Memoize::new(),
				unique_keys: Memoize::new(),
				foreign_keys: Memoize::new(),
			},
		}))
	}

	pub fn comparer(&self) -> &IdentifierComparer {
		&self.comparer
	}

	pub(crate) fn downgrade(&self) -> Weak<QueryContextInner> {
		Arc::downgrade(&self.0)
	}

	pub(crate) fn upgrade(weak: &Weak<QueryContextInner>) -> Option<Self> {
		weak.upgrade().map(Self)
	}

	/// Record that `name` is the canonical name of an existing table, so later
	/// lookups of any spelling that compares equal skip the catalog query.
	pub fn remember_table_name(&self, name: &Identifier) {
		self.memo.table_names.insert(self.comparer.key(name), Some(name.clone()));
	}

	/// The canonical name of the table `candidate` refers to.
	#[instrument(name = "catalog::context::resolve_table_name", level = "trace", skip(self))]
	pub async fn resolve_table_name(&self, candidate: &Identifier) -> Result<Option<Identifier>> {
		let key = self.comparer.key(candidate);
		let context = self.clone();
		let candidate = candidate.clone();
		self.memo
			.table_names
			.get_or_load(key, move || async move {
				context.source.resolve_name(ObjectKind::Table, &candidate).await
			})
			.await
	}

	/// Columns of `table` in ascending ordinal order.
	#[instrument(name = "catalog::context::columns", level = "trace", skip(self))]
	pub async fn columns(&self, table: &Identifier) -> Result<Arc<[Column]>> {
		let key = self.comparer.key(table);
		let context = self.clone();
		let table = table.clone();
		self.memo
			.columns
			.get_or_load(key, move || async move {
				let mut rows = context.source.columns(&table).await?;
				rows.sort_by_key(|row| row.ordinal);
				Ok(rows.into_iter().map(|row| context.column(row)).collect())
			})
			.await
	}

	#[instrument(name = "catalog::context::primary_key", level = "trace", skip(self))]
	pub async fn primary_key(&self, table: &Identifier) -> Result<Option<Arc<Key>>> {
		let key = self.comparer.key(table);
		let context = self.clone();
		let table = table.clone();
		self.memo
			.primary_keys
			.get_or_load(key, move || async move {
				let rows = context.source.primary_key(&table).await?;
				if rows.is_empty() {
					return Ok(None);
				}
				let columns = context.columns(&table).await?;
				let group = key::KeyColumns::single(rows);
				Ok(context.build_key(&table, KeyType::Primary, group, &columns)?.map(Arc::new))
			})
			.await
	}

	#[instrument(name = "catalog::context::unique_keys", level = "trace", skip(self))]
	pub async fn unique_keys(&self, table: &Identifier) -> Result<Arc<[Arc<Key>]>> {
		let key = self.comparer.key(table);
		let context = self.clone();
		let table = table.clone();
		self.memo
			.unique_keys
			.get_or_load(key, move || async move {
				let rows = context.source.unique_keys(&table).await?;
				if rows.is_empty() {
					return Ok(Arc::from([]));
				}
				let columns = context.columns(&table).await?;
				let mut keys = Vec::new();
				for group in key::KeyColumns::grouped(rows) {
					if let Some(key) = context.build_key(&table, KeyType::Unique, group, &columns)? {
						keys.push(Arc::new(key));
					}
				}
				Ok(keys.into())
			})
			.await
	}

	/// Foreign keys of `table` whose parent table and parent key resolve.
	#[instrument(name = "catalog::context::foreign_keys", level = "trace", skip(self))]
	pub async fn foreign_keys(&self, table: &Identifier) -> Result<Arc<[RelationalKey]>> {
		let key = self.comparer.key(table);
		let context = self.clone();
		let table = table.clone();
		self.memo
			.foreign_keys
			.get_or_load(key, move || async move {
				let rows = context.source.foreign_keys(&table).await?;
				context.assemble_foreign_keys(&table, rows).await
			})
			.await
	}

	fn column(&self, row: ColumnRow) -> Column {
		Column {
			column_type: self.types.resolve_column_type(&row.type_metadata),
			name: row.name,
			ordinal: row.ordinal,
			nullable: row.nullable,
			default: row.default,
			computed: row.computed,
			auto_increment: row.auto_increment,
		}
	}
}
