// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use introspect_core::{interface::ObjectKind, model::Sequence};
use introspect_type::{Identifier, Result};
use tracing::instrument;

use super::Catalog;

impl Catalog {
	#[instrument(name = "catalog::sequence::find", level = "trace", skip(self))]
	pub async fn sequence(&self, name: &Identifier) -> Result<Option<Arc<Sequence>>> {
		match self.resolve(ObjectKind::Sequence, name).await? {
			Some(resolved) => self.load_sequence(resolved).await,
			None => Ok(None),
		}
	}

	#[instrument(name = "catalog::sequence::list", level = "debug", skip(self))]
	pub async fn sequences(&self) -> Result<Vec<Arc<Sequence>>> {
		let names = self.source.object_names(ObjectKind::Sequence).await?;
		self.enumerate(ObjectKind::Sequence, names, |catalog, name| async move {
			catalog.load_sequence(name).await
		})
		.await
	}

	async fn load_sequence(&self, name: Identifier) -> Result<Option<Arc<Sequence>>> {
		let key = self.comparer.key(&name);
		let source = self.source.clone();
		self.sequences
			.get_or_load(key, move || async move {
				Ok(source.sequence(&name).await?.map(|row| {
					Arc::new(Sequence {
						name: row.name,
						start: row.start,
						increment: row.increment,
						min: row.min,
						max: row.max,
						cycle: row.cycle,
						cache: row.cache,
					})
				}))
			})
			.await
	}
}

#[cfg(test)]
mod tests {
	use introspect_testing::{MemoryCatalog, Query};

	use super::super::tests::{connect, id};
	use crate::CatalogConfig;

	#[tokio::test]
	async fn test_sequence() {
		let source = MemoryCatalog::new().with_sequence("dbo.OrderNumbers", 1000, 10).with_sequence("dbo.Alpha", 1, 1);
		let (source, catalog) = connect(source, CatalogConfig::default()).await;

		let sequence = catalog.sequence(&id("ordernumbers")).await.unwrap().unwrap();
		assert_eq!(sequence.start, 1000);
		assert_eq!(sequence.increment, 10);
		catalog.sequence(&id("dbo.OrderNumbers")).await.unwrap();
		assert_eq!(source.calls(Query::Sequence, "dbo.OrderNumbers"), 1);

		assert!(catalog.sequence(&id("Missing")).await.unwrap().is_none());

		let names: Vec<String> = catalog.sequences().await.unwrap().iter().map(|s| s.name.to_string()).collect();
		assert_eq!(names, vec!["dbo.Alpha", "dbo.OrderNumbers"]);
		// already loaded by the lookup above
		assert_eq!(source.calls(Query::Sequence, "dbo.OrderNumbers"), 1);
	}
}
