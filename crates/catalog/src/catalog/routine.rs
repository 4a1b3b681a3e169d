// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use introspect_core::{
	interface::ObjectKind,
	model::{Parameter, Routine},
};
use introspect_type::{Identifier, Result};
use tracing::instrument;

use super::Catalog;

impl Catalog {
	#[instrument(name = "catalog::routine::find", level = "trace", skip(self))]
	pub async fn routine(&self, name: &Identifier) -> Result<Option<Arc<Routine>>> {
		match self.resolve(ObjectKind::Routine, name).await? {
			Some(resolved) => self.load_routine(resolved).await,
			None => Ok(None),
		}
	}

	#[instrument(name = "catalog::routine::list", level = "debug", skip(self))]
	pub async fn routines(&self) -> Result<Vec<Arc<Routine>>> {
		let names = self.source.object_names(ObjectKind::Routine).await?;
		self.enumerate(ObjectKind::Routine, names, |catalog, name| async move {
			catalog.load_routine(name).await
		})
		.await
	}

	async fn load_routine(&self, name: Identifier) -> Result<Option<Arc<Routine>>> {
		let key = self.comparer.key(&name);
		let source = self.source.clone();
		let types = self.types.clone();
		self.routines
			.get_or_load(key, move || async move {
				let Some(row) = source.routine(&name).await? else {
					return Ok(None);
				};

				let mut parameters: Vec<Parameter> = row
					.parameters
					.into_iter()
					.map(|parameter| Parameter {
						name: parameter.name,
						ordinal: parameter.ordinal,
						column_type: types.resolve_column_type(&parameter.type_metadata),
						direction: parameter.direction,
					})
					.collect();
				parameters.sort_by_key(|parameter| parameter.ordinal);

				Ok(Some(Arc::new(Routine {
					name: row.name,
					kind: row.kind,
					definition: row.definition,
					parameters,
					return_type: row.return_type.map(|metadata| types.resolve_column_type(&metadata)),
				})))
			})
			.await
	}
}
