// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

use crate::Identifier;

/// How two name components are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringComparison {
	/// Byte-wise, case sensitive.
	Ordinal,
	/// Char-wise after simple upper-casing both sides. A char whose upper
	/// case expands to several chars (`ß`) is kept as is.
	#[default]
	OrdinalIgnoreCase,
}

impl StringComparison {
	/// The canonical form of `value` under this comparison.
	pub fn fold(&self, value: &str) -> String {
		match self {
			StringComparison::Ordinal => value.to_string(),
			StringComparison::OrdinalIgnoreCase => value.chars().map(simple_uppercase).collect(),
		}
	}

	pub fn compare(&self, l: &str, r: &str) -> Ordering {
		match self {
			StringComparison::Ordinal => l.cmp(r),
			StringComparison::OrdinalIgnoreCase => self.fold(l).cmp(&self.fold(r)),
		}
	}

	pub fn equals(&self, l: &str, r: &str) -> bool {
		self.compare(l, r) == Ordering::Equal
	}
}

fn simple_uppercase(c: char) -> char {
	let mut upper = c.to_uppercase();
	match (upper.next(), upper.next()) {
		(Some(single), None) => single,
		_ => c,
	}
}

/// The server, database and schema a connection falls back to when a name
/// omits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierDefaults {
	#[serde(default)]
	pub server: Option<String>,
	#[serde(default)]
	pub database: Option<String>,
	#[serde(default)]
	pub schema: Option<String>,
}

impl IdentifierDefaults {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_server(mut self, server: impl Into<String>) -> Self {
		self.server = Some(server.into());
		self
	}

	pub fn with_database(mut self, database: impl Into<String>) -> Self {
		self.database = Some(database.into());
		self
	}

	pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
		self.schema = Some(schema.into());
		self
	}
}

/// An identifier with defaults substituted and case folded.
///
/// Two identifiers produce equal keys exactly when the comparer that produced
/// the keys considers them equal, which makes the key usable in hash maps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentifierKey {
	server: Option<String>,
	database: Option<String>,
	schema: Option<String>,
	local: String,
}

#[derive(Debug, Clone, Default)]
pub struct IdentifierComparer {
	comparison: StringComparison,
	defaults: IdentifierDefaults,
}

impl IdentifierComparer {
	pub fn new(comparison: StringComparison, defaults: IdentifierDefaults) -> Self {
		Self {
			comparison,
			defaults,
		}
	}

	pub fn ordinal() -> Self {
		Self::new(StringComparison::Ordinal, IdentifierDefaults::default())
	}

	pub fn ordinal_ignore_case() -> Self {
		Self::new(StringComparison::OrdinalIgnoreCase, IdentifierDefaults::default())
	}

	pub fn comparison(&self) -> StringComparison {
		self.comparison
	}

	pub fn defaults(&self) -> &IdentifierDefaults {
		&self.defaults
	}

	pub fn key(&self, id: &Identifier) -> IdentifierKey {
		let fold = |value: Option<&str>, default: &Option<String>| {
			value.or(default.as_deref()).map(|v| self.comparison.fold(v))
		};
		IdentifierKey {
			server: fold(id.server(), &self.defaults.server),
			database: fold(id.database(), &self.defaults.database),
			schema: fold(id.schema(), &self.defaults.schema),
			local: self.comparison.fold(id.local()),
		}
	}

	pub fn equals(&self, l: &Identifier, r: &Identifier) -> bool {
		self.key(l) == self.key(r)
	}

	/// Orders by server, database, schema, then local name. An absent
	/// component without a default sorts before any present one.
	pub fn compare(&self, l: &Identifier, r: &Identifier) -> Ordering {
		self.key(l).cmp(&self.key(r))
	}

	/// xxHash3 of the identifier's key.
	pub fn hash(&self, id: &Identifier) -> u64 {
		let mut hasher = Xxh3::new();
		self.key(id).hash(&mut hasher);
		hasher.finish()
	}

	/// Fill absent components from the defaults, innermost first, stopping
	/// at the first component without a default.
	pub fn qualify(&self, id: &Identifier) -> Identifier {
		let schema = id.schema().map(str::to_string).or_else(|| self.defaults.schema.clone());
		let database = match (id.database(), &schema) {
			(Some(database), _) => Some(database.to_string()),
			(None, Some(_)) => self.defaults.database.clone(),
			(None, None) => None,
		};
		let server = match (id.server(), &database) {
			(Some(server), _) => Some(server.to_string()),
			(None, Some(_)) => self.defaults.server.clone(),
			(None, None) => None,
		};

		Identifier::from_parts(server, database, schema, id.local()).unwrap_or_else(|_| id.clone())
	}
}
