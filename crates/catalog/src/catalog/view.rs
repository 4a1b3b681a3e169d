// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use introspect_core::{interface::ObjectKind, model::View};
use introspect_type::{Identifier, Result};
use tracing::instrument;

use super::Catalog;

impl Catalog {
	#[instrument(name = "catalog::view::find", level = "trace", skip(self))]
	pub async fn view(&self, name: &Identifier) -> Result<Option<Arc<View>>> {
		match self.resolve(ObjectKind::View, name).await? {
			Some(resolved) => self.load_view(resolved).await,
			None => Ok(None),
		}
	}

	#[instrument(name = "catalog::view::list", level = "debug", skip(self))]
	pub async fn views(&self) -> Result<Vec<Arc<View>>> {
		let names = self.source.object_names(ObjectKind::View).await?;
		self.enumerate(ObjectKind::View, names, |catalog, name| async move { catalog.load_view(name).await })
			.await
	}

	async fn load_view(&self, name: Identifier) -> Result<Option<Arc<View>>> {
		let key = self.comparer.key(&name);
		let source = self.source.clone();
		let context = self.context();
		self.views
			.get_or_load(key, move || async move {
				let Some(row) = source.view(&name).await? else {
					return Ok(None);
				};
				let columns = context.columns(&name).await?;
				Ok(Some(Arc::new(View {
					name: row.name,
					definition: row.definition,
					columns,
				})))
			})
			.await
	}
}
