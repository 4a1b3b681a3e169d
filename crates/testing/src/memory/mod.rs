// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! An in-memory [`CatalogSource`] for tests.
//!
//! [`MemoryCatalog`] serves rows from table, view and routine definitions
//! built in the test, counts every query it answers, and can be told to fail
//! a query or to answer slowly.

mod builder;

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
pub use builder::{MemoryRoutine, MemoryTable, MemoryView};
use builder::parse;
use introspect_core::interface::{
	CatalogSource, CheckRow, ChildKeyRow, ColumnRow, ForeignKeyRow, IndexColumnRow, KeyColumnRow, ObjectKind,
	RoutineRow, SequenceRow, SynonymRow, TriggerRow, ViewRow,
};
use introspect_type::{Error, Identifier, IdentifierComparer, IdentifierDefaults, Result, StringComparison};
use parking_lot::Mutex;
use tokio::time::sleep;

/// The query a [`MemoryCatalog`] answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
	IdentifierDefaults,
	ObjectNames,
	ResolveName,
	Columns,
	PrimaryKey,
	UniqueKeys,
	ForeignKeys,
	ChildKeys,
	Indexes,
	Checks,
	Triggers,
	View,
	Sequence,
	Synonym,
	Routine,
}

pub struct MemoryCatalog {
	comparer: IdentifierComparer,
	tables: Vec<MemoryTable>,
	views: Vec<MemoryView>,
	sequences: Vec<SequenceRow>,
	synonyms: Vec<SynonymRow>,
	routines: Vec<RoutineRow>,
	latency: Option<Duration>,
	calls: Mutex<HashMap<(Query, String), usize>>,
	failures: Mutex<HashMap<(Query, String), usize>>,
}

impl Default for MemoryCatalog {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryCatalog {
	/// An empty catalog with default schema `dbo`, compared case-insensitively.
	pub fn new() -> Self {
		Self {
			comparer: IdentifierComparer::new(
				StringComparison::OrdinalIgnoreCase,
				IdentifierDefaults::new().with_schema("dbo"),
			),
			tables: vec![],
			views: vec![],
			sequences: vec![],
			synonyms: vec![],
			routines: vec![],
			latency: None,
			calls: Mutex::new(HashMap::new()),
			failures: Mutex::new(HashMap::new()),
		}
	}

	pub fn with_defaults(mut self, defaults: IdentifierDefaults) -> Self {
		self.comparer = IdentifierComparer::new(self.comparer.comparison(), defaults);
		self
	}

	pub fn with_comparison(mut self, comparison: StringComparison) -> Self {
		self.comparer = IdentifierComparer::new(comparison, self.comparer.defaults().clone());
		self
	}

	/// Delay every answer by `latency`.
	pub fn with_latency(mut self, latency: Duration) -> Self {
		self.latency = Some(latency);
		self
	}

	pub fn with_table(mut self, table: MemoryTable) -> Self {
		self.tables.push(table);
		self
	}

	pub fn with_view(mut self, view: MemoryView) -> Self {
		self.views.push(view);
		self
	}

	pub fn with_routine(mut self, routine: MemoryRoutine) -> Self {
		self.routines.push(routine.row);
		self
	}

	pub fn with_sequence(mut self, name: &str, start: i64, increment: i64) -> Self {
		self.sequences.push(SequenceRow {
			name: parse(name),
			start,
			increment,
			min: None,
			max: None,
			cycle: false,
			cache: None,
		});
		self
	}

	pub fn with_synonym(mut self, name: &str, target: &str) -> Self {
		self.synonyms.push(SynonymRow {
			name: parse(name),
			target: parse(target),
		});
		self
	}

	/// Fail the next `query` about `name` with a query error. Calls stack.
	pub fn fail_once(&self, query: Query, name: &str) {
		let label = self.label(&parse(name));
		*self.failures.lock().entry((query, label)).or_default() += 1;
	}

	/// How often `query` was answered for `name`.
	pub fn calls(&self, query: Query, name: &str) -> usize {
		let label = self.label(&parse(name));
		self.calls.lock().get(&(query, label)).copied().unwrap_or(0)
	}

	/// How often `query` was answered for any object.
	pub fn total_calls(&self, query: Query) -> usize {
		self.calls.lock().iter().filter(|((q, _), _)| *q == query).map(|(_, count)| count).sum()
	}

	/// Counters are keyed by the canonical name when the object exists, so
	/// differently spelled lookups of one table count together.
	fn label(&self, name: &Identifier) -> String {
		self.names()
			.find(|candidate| self.comparer.equals(candidate, name))
			.map(|canonical| canonical.to_string())
			.unwrap_or_else(|| name.to_string())
	}

	fn names(&self) -> impl Iterator<Item = &Identifier> {
		self.tables
			.iter()
			.map(|t| &t.name)
			.chain(self.views.iter().map(|v| &v.name))
			.chain(self.sequences.iter().map(|s| &s.name))
			.chain(self.synonyms.iter().map(|s| &s.name))
			.chain(self.routines.iter().map(|r| &r.name))
	}

	fn names_of(&self, kind: ObjectKind) -> Vec<&Identifier> {
		match kind {
			ObjectKind::Table => self.tables.iter().map(|t| &t.name).collect(),
			ObjectKind::View => self.views.iter().map(|v| &v.name).collect(),
			ObjectKind::Sequence => self.sequences.iter().map(|s| &s.name).collect(),
			ObjectKind::Synonym => self.synonyms.iter().map(|s| &s.name).collect(),
			ObjectKind::Routine => self.routines.iter().map(|r| &r.name).collect(),
		}
	}

	async fn answer(&self, query: Query, label: String) -> Result<()> {
		*self.calls.lock().entry((query, label.clone())).or_default() += 1;

		if let Some(latency) = self.latency {
			sleep(latency).await;
		}

		let mut failures = self.failures.lock();
		if let Some(remaining) = failures.get_mut(&(query, label.clone())) {
			*remaining -= 1;
			if *remaining == 0 {
				failures.remove(&(query, label.clone()));
			}
			return Err(Error::query(format!("injected failure: {query:?} {label}")));
		}
		Ok(())
	}

	async fn answer_for(&self, query: Query, name: &Identifier) -> Result<()> {
		self.answer(query, self.label(name)).await
	}

	fn table(&self, name: &Identifier) -> Option<&MemoryTable> {
		self.tables.iter().find(|t| self.comparer.equals(&t.name, name))
	}

	fn table_rows<T: Clone>(&self, name: &Identifier, rows: impl Fn(&MemoryTable) -> &Vec<T>) -> Vec<T> {
		self.table(name).map(|t| rows(t).clone()).unwrap_or_default()
	}
}

#[async_trait]
impl CatalogSource for MemoryCatalog {
	async fn identifier_defaults(&self) -> Result<IdentifierDefaults> {
		self.answer(Query::IdentifierDefaults, String::new()).await?;
		Ok(self.comparer.defaults().clone())
	}

	async fn object_names(&self, kind: ObjectKind) -> Result<Vec<Identifier>> {
		self.answer(Query::ObjectNames, kind.to_string()).await?;
		Ok(self.names_of(kind).into_iter().cloned().collect())
	}

	async fn resolve_name(&self, kind: ObjectKind, candidate: &Identifier) -> Result<Option<Identifier>> {
		self.answer_for(Query::ResolveName, candidate).await?;
		Ok(self.names_of(kind).into_iter().find(|name| self.comparer.equals(name, candidate)).cloned())
	}

	async fn columns(&self, object: &Identifier) -> Result<Vec<ColumnRow>> {
		self.answer_for(Query::Columns, object).await?;
		if let Some(table) = self.table(object) {
			return Ok(table.columns.clone());
		}
		Ok(self.views
			.iter()
			.find(|v| self.comparer.equals(&v.name, object))
			.map(|v| v.columns.clone())
			.unwrap_or_default())
	}

	async fn primary_key(&self, table: &Identifier) -> Result<Vec<KeyColumnRow>> {
		self.answer_for(Query::PrimaryKey, table).await?;
		Ok(self.table_rows(table, |t| &t.primary_key))
	}

	async fn unique_keys(&self, table: &Identifier) -> Result<Vec<KeyColumnRow>> {
		self.answer_for(Query::UniqueKeys, table).await?;
		Ok(self.table_rows(table, |t| &t.unique_keys))
	}

	async fn foreign_keys(&self, table: &Identifier) -> Result<Vec<ForeignKeyRow>> {
		self.answer_for(Query::ForeignKeys, table).await?;
		Ok(self.table_rows(table, |t| &t.foreign_keys))
	}

	async fn child_keys(&self, table: &Identifier) -> Result<Vec<ChildKeyRow>> {
		self.answer_for(Query::ChildKeys, table).await?;
		let mut rows = vec![];
		for child in &self.tables {
			for fk in child.foreign_keys.iter().filter(|fk| self.comparer.equals(&fk.parent_table, table)) {
				rows.push(ChildKeyRow {
					child_table: child.name.clone(),
					constraint_name: fk.constraint_name.clone(),
				});
			}
		}
		Ok(rows)
	}

	async fn indexes(&self, table: &Identifier) -> Result<Vec<IndexColumnRow>> {
		self.answer_for(Query::Indexes, table).await?;
		Ok(self.table_rows(table, |t| &t.indexes))
	}

	async fn checks(&self, table: &Identifier) -> Result<Vec<CheckRow>> {
		self.answer_for(Query::Checks, table).await?;
		Ok(self.table_rows(table, |t| &t.checks))
	}

	async fn triggers(&self, table: &Identifier) -> Result<Vec<TriggerRow>> {
		self.answer_for(Query::Triggers, table).await?;
		Ok(self.table_rows(table, |t| &t.triggers))
	}

	async fn view(&self, name: &Identifier) -> Result<Option<ViewRow>> {
		self.answer_for(Query::View, name).await?;
		Ok(self.views.iter().find(|v| self.comparer.equals(&v.name, name)).map(|v| ViewRow {
			name: v.name.clone(),
			definition: v.definition.clone(),
		}))
	}

	async fn sequence(&self, name: &Identifier) -> Result<Option<SequenceRow>> {
		self.answer_for(Query::Sequence, name).await?;
		Ok(self.sequences.iter().find(|s| self.comparer.equals(&s.name, name)).cloned())
	}

	async fn synonym(&self, name: &Identifier) -> Result<Option<SynonymRow>> {
		self.answer_for(Query::Synonym, name).await?;
		Ok(self.synonyms.iter().find(|s| self.comparer.equals(&s.name, name)).cloned())
	}

	async fn routine(&self, name: &Identifier) -> Result<Option<RoutineRow>> {
		self.answer_for(Query::Routine, name).await?;
		Ok(self.routines.iter().find(|r| self.comparer.equals(&r.name, name)).cloned())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn catalog() -> MemoryCatalog {
		MemoryCatalog::new()
			.with_table(MemoryTable::new("dbo.Customers").column("Id", "int").primary_key("PK_Customers", &["Id"]))
			.with_table(
				MemoryTable::new("dbo.Orders")
					.column("Id", "int")
					.column("CustomerId", "int")
					.foreign_key("FK_Orders_Customers", &["CustomerId"], "Customers"),
			)
	}

	#[tokio::test]
	async fn test_calls_counted_by_canonical_name() {
		let catalog = catalog();
		let name: Identifier = "CUSTOMERS".parse().unwrap();
		catalog.columns(&name).await.unwrap();
		catalog.columns(&"dbo.customers".parse().unwrap()).await.unwrap();

		assert_eq!(catalog.calls(Query::Columns, "dbo.Customers"), 2);
		assert_eq!(catalog.total_calls(Query::Columns), 2);
		assert_eq!(catalog.total_calls(Query::PrimaryKey), 0);
	}

	#[tokio::test]
	async fn test_fail_once() {
		let catalog = catalog();
		catalog.fail_once(Query::PrimaryKey, "Customers");

		let name: Identifier = "dbo.Customers".parse().unwrap();
		assert!(catalog.primary_key(&name).await.is_err());
		assert_eq!(catalog.primary_key(&name).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_child_keys_scan_referencing_tables() {
		let catalog = catalog();
		let rows = catalog.child_keys(&"dbo.Customers".parse().unwrap()).await.unwrap();
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].child_table.to_string(), "dbo.Orders");
		assert_eq!(rows[0].constraint_name, "FK_Orders_Customers");
	}

	#[tokio::test]
	async fn test_resolve_name_by_kind() {
		let catalog = catalog().with_view(MemoryView::new("dbo.ActiveOrders", "select 1"));
		let candidate: Identifier = "activeorders".parse().unwrap();

		assert!(catalog.resolve_name(ObjectKind::Table, &candidate).await.unwrap().is_none());
		let resolved = catalog.resolve_name(ObjectKind::View, &candidate).await.unwrap().unwrap();
		assert_eq!(resolved.to_string(), "dbo.ActiveOrders");
	}
}
