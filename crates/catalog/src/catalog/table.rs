// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use introspect_core::{interface::ObjectKind, model::Table};
use introspect_runtime::{CancellationToken, cancellable};
use introspect_type::{Identifier, Result};
use tracing::{debug, instrument};

use super::{Catalog, EnumerationScope};

impl Catalog {
	#[instrument(name = "catalog::table::find", level = "trace", skip(self))]
	pub async fn table(&self, name: &Identifier) -> Result<Option<Arc<Table>>> {
		match self.resolve(ObjectKind::Table, name).await? {
			Some(resolved) => self.load_table(resolved).await.map(Some),
			None => Ok(None),
		}
	}

	pub async fn table_cancellable(&self, token: &CancellationToken, name: &Identifier) -> Result<Option<Arc<Table>>> {
		cancellable(token, self.table(name)).await
	}

	#[instrument(name = "catalog::table::exists", level = "trace", skip(self))]
	pub async fn table_exists(&self, name: &Identifier) -> Result<bool> {
		Ok(self.resolve(ObjectKind::Table, name).await?.is_some())
	}

	/// Every table, sorted by name.
	///
	/// All tables load through one shared context, so metadata of a table
	/// referenced by many others is fetched once.
	#[instrument(name = "catalog::table::list", level = "debug", skip(self))]
	pub async fn tables(&self) -> Result<Vec<Arc<Table>>> {
		let names = self.source.object_names(ObjectKind::Table).await?;
		debug!(count = names.len(), "enumerating tables");

		let context = self.query_context();
		for name in &names {
			context.remember_table_name(name);
		}

		let _scope = EnumerationScope::enter(self, &context);
		self.enumerate(
			ObjectKind::Table,
			names,
			|catalog, name| async move { catalog.load_table(name).await.map(Some) },
		)
		.await
	}

	pub async fn tables_cancellable(&self, token: &CancellationToken) -> Result<Vec<Arc<Table>>> {
		cancellable(token, self.tables()).await
	}

	async fn load_table(&self, name: Identifier) -> Result<Arc<Table>> {
		let key = self.comparer.key(&name);
		if let Some(table) = self.tables.get(&key) {
			return Ok(table);
		}

		let context = self.context();
		self.tables.get_or_load(key, move || async move { context.load_table(&name).await.map(Arc::new) }).await
	}
}
