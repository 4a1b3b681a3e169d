// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The long-lived, cached catalog facade.
//!
//! [`Catalog`] remembers every name it resolved and every object it loaded
//! for as long as it lives. Nothing is evicted; build a new `Catalog` to see
//! changes made to the database since.

mod routine;
mod sequence;
mod synonym;
mod table;
mod view;

use std::{
	future::Future,
	ops::Deref,
	sync::{Arc, Weak},
};

use futures_util::{StreamExt, TryStreamExt, stream};
use introspect_core::{
	interface::{CatalogSource, ObjectKind},
	model::{Routine, Sequence, Synonym, Table, View},
	resolve::ResolutionStrategy,
	types::TypeProvider,
};
use introspect_runtime::Memoize;
use introspect_type::{Error, Identifier, IdentifierComparer, IdentifierDefaults, IdentifierKey, Result};
use parking_lot::Mutex;
use tracing::{debug, instrument};

use crate::{
	CatalogConfig,
	context::{QueryContext, QueryContextInner},
};

#[derive(Clone)]
pub struct Catalog(Arc<CatalogInner>);

pub struct CatalogInner {
	source: Arc<dyn CatalogSource>,
	types: Arc<dyn TypeProvider>,
	comparer: IdentifierComparer,
	strategy: Arc<dyn ResolutionStrategy>,
	config: CatalogConfig,
	names: Memoize<(ObjectKind, IdentifierKey), Option<Identifier>>,
	tables: Memoize<IdentifierKey, Arc<Table>>,
	views: Memoize<IdentifierKey, Option<Arc<View>>>,
	sequences: Memoize<IdentifierKey, Option<Arc<Sequence>>>,
	synonyms: Memoize<IdentifierKey, Option<Arc<Synonym>>>,
	routines: Memoize<IdentifierKey, Option<Arc<Routine>>>,
	/// Context of the table enumeration in progress, if any.
	enumeration: Mutex<Weak<QueryContextInner>>,
}

impl Deref for Catalog {
	type Target = CatalogInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Catalog {
	/// Connect to `source`, reading its identifier defaults unless `config`
	/// overrides them.
	#[instrument(name = "catalog::connect", level = "debug", skip_all)]
	pub async fn connect(
		source: Arc<dyn CatalogSource>,
		types: Arc<dyn TypeProvider>,
		config: CatalogConfig,
	) -> Result<Self> {
		let defaults = match &config.defaults {
			Some(defaults) => defaults.clone(),
			None => source.identifier_defaults().await?,
		};
		debug!(?defaults, comparison = ?config.comparison, resolution = ?config.resolution, "catalog connected");
		Ok(Self::new(source, types, defaults, config))
	}

	pub fn new(
		source: Arc<dyn CatalogSource>,
		types: Arc<dyn TypeProvider>,
		defaults: IdentifierDefaults,
		config: CatalogConfig,
	) -> Self {
		Self(Arc::new(CatalogInner {
			source,
			types,
			comparer: IdentifierComparer::new(config.comparison, defaults),
			strategy: config.resolution.strategy(),
			config,
			names: Memoize::new(),
			tables: Memoize::new(),
			views: Memoize::new(),
			sequences: Memoize::new(),
			synonyms: Memoize::new(),
			routines: Memoize::new(),
			enumeration: Mutex::new(Weak::new()),
		}))
	}

	pub fn comparer(&self) -> &IdentifierComparer {
		&self.comparer
	}

	pub fn config(&self) -> &CatalogConfig {
		&self.config
	}

	/// A fresh context sharing this catalog's source, type provider and
	/// comparer.
	pub fn query_context(&self) -> QueryContext {
		QueryContext::new(self.source.clone(), self.types.clone(), self.comparer.clone())
	}

	/// The canonical name of the object of `kind` that `name` refers to.
	///
	/// Candidates from the resolution strategy are tried in order, each
	/// qualified with the connection's defaults first.
	#[instrument(name = "catalog::resolve", level = "trace", skip(self))]
	pub async fn resolve(&self, kind: ObjectKind, name: &Identifier) -> Result<Option<Identifier>> {
		for candidate in self.strategy.resolution_order(name) {
			let candidate = self.comparer.qualify(&candidate);
			let key = (kind, self.comparer.key(&candidate));
			let source = self.source.clone();
			let resolved = self
				.names
				.get_or_load(key, move || async move { source.resolve_name(kind, &candidate).await })
				.await?;
			if resolved.is_some() {
				return Ok(resolved);
			}
		}
		Ok(None)
	}

	/// The active enumeration's context, or a fresh one.
	fn context(&self) -> QueryContext {
		QueryContext::upgrade(&self.enumeration.lock()).unwrap_or_else(|| self.query_context())
	}

	/// Load every object named in `names` through `load`, at most
	/// `max_concurrent_loads` at a time, sorted by name.
	async fn enumerate<T, F, Fut>(
		&self,
		kind: ObjectKind,
		names: Vec<Identifier>,
		load: F,
	) -> Result<Vec<Arc<T>>>
	where
		T: Named,
		F: Fn(Catalog, Identifier) -> Fut,
		Fut: Future<Output = Result<Option<Arc<T>>>>,
	{
		for name in &names {
			self.names.insert((kind, self.comparer.key(name)), Some(name.clone()));
		}

		let mut objects: Vec<Arc<T>> = stream::iter(names)
			.map(|name| load(self.clone(), name))
			.buffer_unordered(self.config.max_concurrent_loads.max(1))
			.try_filter_map(|object| async move { Ok::<_, Error>(object) })
			.try_collect()
			.await?;

		objects.sort_by(|l, r| self.comparer.compare(l.name(), r.name()));
		Ok(objects)
	}
}

/// Objects listed by [`Catalog`] enumerations.
trait Named {
	fn name(&self) -> &Identifier;
}

macro_rules! impl_named {
	($($ty:ty),*) => {
		$(impl Named for $ty {
			fn name(&self) -> &Identifier {
				&self.name
			}
		})*
	};
}

impl_named!(Table, View, Sequence, Synonym, Routine);

/// Makes a context the active enumeration context until dropped.
struct EnumerationScope {
	catalog: Catalog,
	context: Weak<QueryContextInner>,
	previous: Weak<QueryContextInner>,
}

impl EnumerationScope {
	fn enter(catalog: &Catalog, context: &QueryContext) -> Self {
		let context = context.downgrade();
		let previous = std::mem::replace(&mut *catalog.enumeration.lock(), context.clone());
		Self {
			catalog: catalog.clone(),
			context,
			previous,
		}
	}
}

impl Drop for EnumerationScope {
	fn drop(&mut self) {
		let mut active = self.catalog.enumeration.lock();
		// an enumeration started after this one owns the slot now
		if Weak::ptr_eq(&active, &self.context) {
			*active = std::mem::take(&mut self.previous);
		}
	}
}
