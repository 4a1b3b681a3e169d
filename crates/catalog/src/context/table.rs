// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use introspect_core::{
	interface::IndexColumnRow,
	model::{Check, Index, IndexColumn, Table, Trigger},
};
use introspect_runtime::{CancellationToken, cancellable};
use introspect_type::{Identifier, Result};
use tracing::{instrument, warn};

use super::QueryContext;

impl QueryContext {
	/// Resolve `candidate` and load the table it names.
	#[instrument(name = "catalog::context::table", level = "trace", skip(self))]
	pub async fn table(&self, candidate: &Identifier) -> Result<Option<Table>> {
		match self.resolve_table_name(candidate).await? {
			Some(name) => self.load_table(&name).await.map(Some),
			None => Ok(None),
		}
	}

	/// Load the table whose canonical name is `name`.
	#[instrument(name = "catalog::context::load_table", level = "trace", skip(self))]
	pub async fn load_table(&self, name: &Identifier) -> Result<Table> {
		let (columns, primary_key, unique_keys, foreign_keys, child_keys, indexes, checks, triggers) = tokio::try_join!(
			self.columns(name),
			self.primary_key(name),
			self.unique_keys(name),
			self.foreign_keys(name),
			self.child_keys(name),
			self.indexes(name),
			self.checks(name),
			self.triggers(name),
		)?;

		Ok(Table {
			name: name.clone(),
			columns,
			primary_key,
			unique_keys,
			foreign_keys,
			child_keys,
			indexes,
			checks,
			triggers,
		})
	}

	pub async fn load_table_cancellable(&self, token: &CancellationToken, name: &Identifier) -> Result<Table> {
		cancellable(token, self.load_table(name)).await
	}

	#[instrument(name = "catalog::context::indexes", level = "trace", skip(self))]
	pub async fn indexes(&self, table: &Identifier) -> Result<Vec<Index>> {
		let rows = self.source.indexes(table).await?;
		if rows.is_empty() {
			return Ok(vec![]);
		}

		let mut groups: IndexMap<String, Vec<IndexColumnRow>> = IndexMap::new();
		for row in rows {
			groups.entry(row.index_name.clone()).or_default().push(row);
		}

		let columns = self.columns(table).await?;
		let comparison = self.comparer.comparison();
		let mut indexes = Vec::with_capacity(groups.len());

		'index: for (name, mut rows) in groups {
			rows.sort_by_key(|row| row.ordinal);
			let mut index_columns = Vec::with_capacity(rows.len());
			for row in &rows {
				let Some(column) = columns.iter().find(|c| comparison.equals(&c.name, &row.column_name)) else {
					warn!(%table, index = %name, column = %row.column_name, "index refers to unknown column, skipped");
					continue 'index;
				};
				index_columns.push(IndexColumn {
					column: column.clone(),
					descending: row.descending,
				});
			}

			indexes.push(Index {
				unique: rows.iter().any(|row| row.unique),
				clustered: rows.iter().any(|row| row.clustered),
				name,
				columns: index_columns,
			});
		}

		Ok(indexes)
	}

	#[instrument(name = "catalog::context::checks", level = "trace", skip(self))]
	pub async fn checks(&self, table: &Identifier) -> Result<Vec<Check>> {
		let rows = self.source.checks(table).await?;
		Ok(rows.into_iter()
			.map(|row| Check {
				name: row.name,
				definition: row.definition,
				enabled: row.enabled,
			})
			.collect())
	}

	#[instrument(name = "catalog::context::triggers", level = "trace", skip(self))]
	pub async fn triggers(&self, table: &Identifier) -> Result<Vec<Trigger>> {
		let rows = self.source.triggers(table).await?;
		Ok(rows.into_iter()
			.map(|row| Trigger {
				name: row.name,
				definition: row.definition,
				timing: row.timing,
				events: row.events,
				enabled: row.enabled,
			})
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use introspect_core::model::{TriggerEvent, TriggerTiming};
	use introspect_testing::{MemoryCatalog, MemoryTable, Query};
	use introspect_type::Error;

	use super::{
		super::tests::{context, id},
		*,
	};

	fn shop() -> MemoryCatalog {
		MemoryCatalog::new()
			.with_table(
				MemoryTable::new("dbo.Customers")
					.column("Id", "int")
					.column("Name", "varchar")
					.primary_key("PK_Customers", &["Id"]),
			)
			.with_table(
				MemoryTable::new("dbo.Orders")
					.column("Id", "int")
					.column("CustomerId", "int")
					.primary_key("PK_Orders", &["Id"])
					.foreign_key("FK_Orders_Customers", &["CustomerId"], "Customers")
					.foreign_key("FK_Orders_Ghosts", &["CustomerId"], "Ghosts")
					.index("IX_Orders_Customer", &["CustomerId"], false)
					.index("IX_Orders_Broken", &["Missing"], false)
					.check("CK_Orders_Id", "Id > 0")
					.trigger("TR_Orders_Audit", TriggerTiming::After, &[TriggerEvent::Insert, TriggerEvent::Update]),
			)
	}

	#[tokio::test]
	async fn test_load_table() {
		let (_, context) = context(shop());
		let orders = context.table(&id("orders")).await.unwrap().unwrap();

		assert_eq!(orders.name.to_string(), "dbo.Orders");
		assert_eq!(orders.columns.len(), 2);
		assert_eq!(orders.primary_key.as_ref().unwrap().name(), Some("PK_Orders"));
		assert_eq!(orders.indexes.len(), 1);
		assert_eq!(orders.indexes[0].name, "IX_Orders_Customer");
		assert_eq!(orders.checks[0].definition, "Id > 0");
		assert_eq!(orders.triggers[0].events, vec![TriggerEvent::Insert, TriggerEvent::Update]);
	}

	#[tokio::test]
	async fn test_broken_foreign_key_omitted() {
		let (_, context) = context(shop());
		let orders = context.table(&id("Orders")).await.unwrap().unwrap();

		assert_eq!(orders.foreign_keys.len(), 1);
		assert!(orders.foreign_key("FK_Orders_Customers").is_some());
		assert!(orders.foreign_key("FK_Orders_Ghosts").is_none());
		assert_eq!(orders.columns.len(), 2);
		assert!(orders.primary_key.is_some());
	}

	#[tokio::test]
	async fn test_unknown_table() {
		let (_, context) = context(shop());
		assert!(context.table(&id("Nope")).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_cross_table_sharing() {
		let (catalog, context) = context(shop());

		let orders = context.table(&id("Orders")).await.unwrap().unwrap();
		let customers = context.table(&id("Customers")).await.unwrap().unwrap();

		assert_eq!(catalog.calls(Query::Columns, "dbo.Customers"), 1);
		assert_eq!(catalog.calls(Query::PrimaryKey, "dbo.Customers"), 1);
		assert_eq!(catalog.calls(Query::ResolveName, "dbo.Customers"), 1);
		assert_eq!(customers.child_keys.len(), 1);
		assert_eq!(customers.child_keys[0].name(), orders.foreign_keys[0].name());
		assert_eq!(catalog.calls(Query::ForeignKeys, "dbo.Orders"), 1);
	}

	#[tokio::test]
	async fn test_self_referencing_table() {
		let (_, context) = context(
			MemoryCatalog::new().with_table(
				MemoryTable::new("dbo.Employee")
					.column("Id", "int")
					.column("ManagerId", "int")
					.primary_key("PK_Employee", &["Id"])
					.foreign_key("FK_Employee_Manager", &["ManagerId"], "Employee"),
			),
		);

		let employee = context.table(&id("Employee")).await.unwrap().unwrap();
		assert_eq!(employee.foreign_keys.len(), 1);
		assert_eq!(employee.child_keys.len(), 1);
		let fk = &employee.foreign_keys[0];
		assert!(context.comparer().equals(fk.parent_table(), fk.child_table()));
	}

	#[tokio::test]
	async fn test_cancelled_load() {
		let (_, context) = context(shop().with_latency(Duration::from_millis(200)));
		let token = CancellationToken::new();
		let trigger = token.clone();
		tokio::spawn(async move {
			tokio::time::sleep(Duration::from_millis(20)).await;
			trigger.cancel();
		});

		let result = context.load_table_cancellable(&token, &id("dbo.Orders")).await;
		assert_eq!(result.err(), Some(Error::Cancelled));
	}
}
