// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Foreign key assembly.
//!
//! Parents are resolved through the same context's name, primary key and
//! unique key loaders, never through `load_table` or `foreign_keys` of the
//! parent. A cycle of references therefore never waits on itself, and a table
//! referencing itself only needs its own primary key.

use std::sync::Arc;

use futures_util::future::try_join_all;
use indexmap::IndexMap;
use introspect_core::{
	interface::ForeignKeyRow,
	model::{Column, Key, KeyType, RelationalKey},
};
use introspect_type::{Identifier, IdentifierKey, Result};
use tracing::{debug, instrument};

use super::QueryContext;

impl QueryContext {
	pub(super) async fn assemble_foreign_keys(
		&self,
		table: &Identifier,
		rows: Vec<ForeignKeyRow>,
	) -> Result<Arc<[RelationalKey]>> {
		if rows.is_empty() {
			return Ok(Arc::from([]));
		}

		let mut groups: IndexMap<String, Vec<ForeignKeyRow>> = IndexMap::new();
		for row in rows {
			groups.entry(row.constraint_name.clone()).or_default().push(row);
		}

		let columns = self.columns(table).await?;
		let keys = try_join_all(
			groups.into_iter().map(|(name, rows)| self.assemble_foreign_key(table, &columns, name, rows)),
		)
		.await?;

		Ok(keys.into_iter().flatten().collect())
	}

	async fn assemble_foreign_key(
		&self,
		table: &Identifier,
		columns: &[Column],
		name: String,
		mut rows: Vec<ForeignKeyRow>,
	) -> Result<Option<RelationalKey>> {
		rows.sort_by_key(|row| row.ordinal);
		let Some(first) = rows.first() else {
			return Ok(None);
		};

		let Some(parent_table) = self.resolve_table_name(&first.parent_table).await? else {
			debug!(%table, key = %name, parent = %first.parent_table, "parent table not found, foreign key dropped");
			return Ok(None);
		};

		let Some(parent_key) = self.parent_key(&parent_table, first).await? else {
			debug!(%table, key = %name, parent = %parent_table, "parent key not found, foreign key dropped");
			return Ok(None);
		};

		let names = rows.iter().map(|row| row.column_name.as_str());
		let Some(key_columns) = self.key_columns(table, Some(&name), names, columns) else {
			return Ok(None);
		};

		let enabled = rows.iter().all(|row| row.enabled);
		let child_key = Key::new(Some(name), KeyType::Foreign, key_columns, enabled)?;
		RelationalKey::new(
			table.clone(),
			Arc::new(child_key),
			parent_table,
			parent_key,
			first.on_delete,
			first.on_update,
		)
		.map(Some)
	}

	async fn parent_key(&self, parent_table: &Identifier, row: &ForeignKeyRow) -> Result<Option<Arc<Key>>> {
		if row.parent_key_type == KeyType::Primary {
			return self.primary_key(parent_table).await;
		}

		let Some(name) = row.parent_key_name.as_deref() else {
			return Ok(None);
		};
		let comparison = self.comparer.comparison();
		let unique_keys = self.unique_keys(parent_table).await?;
		Ok(unique_keys.iter().find(|key| key.name().is_some_and(|n| comparison.equals(n, name))).cloned())
	}

	/// Foreign keys on other tables that reference `table`.
	///
	/// Each child's keys come from this context's `foreign_keys` loader, so
	/// children already assembled cost nothing.
	#[instrument(name = "catalog::context::child_keys", level = "trace", skip(self))]
	pub async fn child_keys(&self, table: &Identifier) -> Result<Vec<RelationalKey>> {
		let rows = self.source.child_keys(table).await?;

		let mut children: IndexMap<IdentifierKey, (Identifier, Vec<String>)> = IndexMap::new();
		for row in rows {
			let (_, constraints) = children
				.entry(self.comparer.key(&row.child_table))
				.or_insert_with(|| (row.child_table.clone(), Vec::new()));
			if !constraints.contains(&row.constraint_name) {
				constraints.push(row.constraint_name);
			}
		}

		let comparison = self.comparer.comparison();
		let loaded = try_join_all(children.into_values().map(|(child, constraints)| async move {
			let keys = self.foreign_keys(&child).await?;
			Ok::<_, introspect_type::Error>(
				keys.iter()
					.filter(|key| self.comparer.equals(key.parent_table(), table))
					.filter(|key| {
						key.name().is_some_and(|name| {
							constraints.iter().any(|c| comparison.equals(c, name))
						})
					})
					.cloned()
					.collect::<Vec<_>>(),
			)
		}))
		.await?;

		Ok(loaded.into_iter().flatten().collect())
	}
}

#[cfg(test)]
mod tests {
	use introspect_core::model::ReferentialAction;
	use introspect_testing::{MemoryCatalog, MemoryTable, Query};

	use super::{
		super::tests::{context, id},
		*,
	};

	fn customers() -> MemoryTable {
		MemoryTable::new("dbo.Customers")
			.column("Id", "int")
			.column("Email", "varchar")
			.primary_key("PK_Customers", &["Id"])
			.unique_key("UQ_Customers_Email", &["Email"])
	}

	#[tokio::test]
	async fn test_foreign_key_to_primary_key() {
		let (_, context) = context(
			MemoryCatalog::new().with_table(customers()).with_table(
				MemoryTable::new("dbo.Orders")
					.column("Id", "int")
					.column("CustomerId", "int")
					.foreign_key("FK_Orders_Customers", &["CustomerId"], "Customers")
					.actions(ReferentialAction::Cascade, ReferentialAction::NoAction),
			),
		);

		let keys = context.foreign_keys(&id("dbo.Orders")).await.unwrap();
		assert_eq!(keys.len(), 1);
		let fk = &keys[0];
		assert_eq!(fk.name(), Some("FK_Orders_Customers"));
		assert_eq!(fk.parent_table().to_string(), "dbo.Customers");
		assert_eq!(fk.parent_key().name(), Some("PK_Customers"));
		assert_eq!(fk.child_key().key_type(), KeyType::Foreign);
		assert_eq!(fk.on_delete(), ReferentialAction::Cascade);
	}

	#[tokio::test]
	async fn test_foreign_key_to_unique_key() {
		let (_, context) = context(
			MemoryCatalog::new().with_table(customers()).with_table(
				MemoryTable::new("dbo.Invites").column("Email", "varchar").foreign_key_to_unique(
					"FK_Invites_Email",
					&["Email"],
					"dbo.Customers",
					"UQ_Customers_Email",
				),
			),
		);

		let keys = context.foreign_keys(&id("Invites")).await.unwrap();
		assert_eq!(keys.len(), 1);
		assert_eq!(keys[0].parent_key().key_type(), KeyType::Unique);
		assert_eq!(keys[0].parent_key().name(), Some("UQ_Customers_Email"));
	}

	#[tokio::test]
	async fn test_composite_key_ordered_by_ordinal() {
		let (_, context) = context(
			MemoryCatalog::new()
				.with_table(
					MemoryTable::new("dbo.Parts")
						.column("Vendor", "int")
						.column("Code", "int")
						.primary_key("PK_Parts", &["Vendor", "Code"]),
				)
				.with_table(
					MemoryTable::new("dbo.Stock")
						.column("PartCode", "int")
						.column("PartVendor", "int")
						.foreign_key("FK_Stock_Parts", &["PartVendor", "PartCode"], "Parts"),
				),
		);

		let keys = context.foreign_keys(&id("Stock")).await.unwrap();
		let names: Vec<&str> = keys[0].child_key().columns().iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, vec!["PartVendor", "PartCode"]);
	}

	#[tokio::test]
	async fn test_missing_parent_dropped() {
		let (_, context) = context(
			MemoryCatalog::new().with_table(customers()).with_table(
				MemoryTable::new("dbo.Orders")
					.column("CustomerId", "int")
					.column("GhostId", "int")
					.foreign_key("FK_Orders_Ghosts", &["GhostId"], "Ghosts")
					.foreign_key("FK_Orders_Customers", &["CustomerId"], "Customers"),
			),
		);

		let keys = context.foreign_keys(&id("Orders")).await.unwrap();
		assert_eq!(keys.len(), 1);
		assert_eq!(keys[0].name(), Some("FK_Orders_Customers"));
	}

	#[tokio::test]
	async fn test_missing_parent_key_dropped() {
		let (_, context) = context(
			MemoryCatalog::new().with_table(MemoryTable::new("dbo.Keyless").column("Id", "int")).with_table(
				MemoryTable::new("dbo.Orders")
					.column("KeylessId", "int")
					.foreign_key("FK_Orders_Keyless", &["KeylessId"], "Keyless"),
			),
		);

		assert!(context.foreign_keys(&id("Orders")).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_self_reference() {
		let (_, context) = context(
			MemoryCatalog::new().with_table(
				MemoryTable::new("dbo.Employee")
					.column("Id", "int")
					.column("ManagerId", "int")
					.primary_key("PK_Employee", &["Id"])
					.foreign_key("FK_Employee_Manager", &["ManagerId"], "Employee"),
			),
		);

		let keys = context.foreign_keys(&id("Employee")).await.unwrap();
		assert_eq!(keys.len(), 1);
		assert!(context.comparer().equals(keys[0].parent_table(), keys[0].child_table()));
	}

	#[tokio::test]
	async fn test_cycle_between_tables() {
		let (catalog, context) = context(
			MemoryCatalog::new()
				.with_table(
					MemoryTable::new("dbo.A")
						.column("Id", "int")
						.column("BId", "int")
						.primary_key("PK_A", &["Id"])
						.foreign_key("FK_A_B", &["BId"], "B"),
				)
				.with_table(
					MemoryTable::new("dbo.B")
						.column("Id", "int")
						.column("AId", "int")
						.primary_key("PK_B", &["Id"])
						.foreign_key("FK_B_A", &["AId"], "A"),
				),
		);

		let (a_id, b_id) = (id("A"), id("B"));
		let (a, b) = tokio::join!(context.foreign_keys(&a_id), context.foreign_keys(&b_id));
		assert_eq!(a.unwrap().len(), 1);
		assert_eq!(b.unwrap().len(), 1);
		assert_eq!(catalog.calls(Query::Columns, "dbo.A"), 1);
		assert_eq!(catalog.calls(Query::Columns, "dbo.B"), 1);
	}

	#[tokio::test]
	async fn test_child_keys() {
		let (catalog, context) = context(
			MemoryCatalog::new()
				.with_table(customers())
				.with_table(
					MemoryTable::new("dbo.Orders")
						.column("CustomerId", "int")
						.foreign_key("FK_Orders_Customers", &["CustomerId"], "Customers"),
				)
				.with_table(
					MemoryTable::new("dbo.Invoices")
						.column("CustomerId", "int")
						.column("CustomerEmail", "varchar")
						.foreign_key("FK_Invoices_Customers", &["CustomerId"], "Customers")
						.foreign_key_to_unique(
							"FK_Invoices_Email",
							&["CustomerEmail"],
							"Customers",
							"UQ_Customers_Email",
						),
				),
		);

		let children = context.child_keys(&id("Customers")).await.unwrap();
		let mut names: Vec<&str> = children.iter().filter_map(|k| k.name()).collect();
		names.sort();
		assert_eq!(names, vec!["FK_Invoices_Customers", "FK_Invoices_Email", "FK_Orders_Customers"]);

		// the children's keys are now memoized
		context.foreign_keys(&id("Orders")).await.unwrap();
		assert_eq!(catalog.calls(Query::ForeignKeys, "dbo.Orders"), 1);
	}
}
