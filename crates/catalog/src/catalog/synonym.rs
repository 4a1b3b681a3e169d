// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use introspect_core::{interface::ObjectKind, model::Synonym};
use introspect_type::{Identifier, Result};
use tracing::instrument;

use super::Catalog;

impl Catalog {
	#[instrument(name = "catalog::synonym::find", level = "trace", skip(self))]
	pub async fn synonym(&self, name: &Identifier) -> Result<Option<Arc<Synonym>>> {
		match self.resolve(ObjectKind::Synonym, name).await? {
			Some(resolved) => self.load_synonym(resolved).await,
			None => Ok(None),
		}
	}

	#[instrument(name = "catalog::synonym::list", level = "debug", skip(self))]
	pub async fn synonyms(&self) -> Result<Vec<Arc<Synonym>>> {
		let names = self.source.object_names(ObjectKind::Synonym).await?;
		self.enumerate(ObjectKind::Synonym, names, |catalog, name| async move {
			catalog.load_synonym(name).await
		})
		.await
	}

	async fn load_synonym(&self, name: Identifier) -> Result<Option<Arc<Synonym>>> {
		let key = self.comparer.key(&name);
		let source = self.source.clone();
		self.synonyms
			.get_or_load(key, move || async move {
				Ok(source.synonym(&name).await?.map(|row| {
					Arc::new(Synonym {
						name: row.name,
						target: row.target,
					})
				}))
			})
			.await
	}
}
