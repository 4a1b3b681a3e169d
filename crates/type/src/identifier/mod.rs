// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Qualified object names.
//!
//! An [`Identifier`] names a catalog object with one to four parts:
//! `server.database.schema.local`. Qualifiers are optional, but a qualifier is
//! only valid when every qualifier below it is present as well, so a server
//! name always comes with a database and a schema name.
//!
//! Identifiers deliberately do not implement `PartialEq`: two identifiers that
//! differ only by omitted components can still name the same object once the
//! database defaults are taken into account. Compare them through an
//! [`IdentifierComparer`].

mod comparer;

use std::{fmt, str::FromStr};

pub use comparer::{IdentifierComparer, IdentifierDefaults, IdentifierKey, StringComparison};

use serde::{Serialize, Serializer};

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Identifier {
	server: Option<String>,
	database: Option<String>,
	schema: Option<String>,
	local: String,
}

impl Identifier {
	/// An unqualified identifier.
	pub fn new(local: impl Into<String>) -> Result<Self> {
		Self::from_parts(None, None, None, local)
	}

	/// A schema-qualified identifier.
	pub fn qualified(schema: impl Into<String>, local: impl Into<String>) -> Result<Self> {
		Self::from_parts(None, None, Some(schema.into()), local)
	}

	pub fn from_parts(
		server: Option<String>,
		database: Option<String>,
		schema: Option<String>,
		local: impl Into<String>,
	) -> Result<Self> {
		let local = local.into();
		if local.trim().is_empty() {
			return Err(Error::invalid_identifier("local name must not be blank"));
		}

		for (part, value) in [("server", &server), ("database", &database), ("schema", &schema)] {
			if let Some(value) = value {
				if value.trim().is_empty() {
					return Err(Error::invalid_identifier(format!(
						"{part} name must not be blank when present"
					)));
				}
			}
		}

		if server.is_some() && database.is_none() {
			return Err(Error::invalid_identifier(format!(
				"server qualifier on '{local}' requires a database name"
			)));
		}
		if database.is_some() && schema.is_none() {
			return Err(Error::invalid_identifier(format!(
				"database qualifier on '{local}' requires a schema name"
			)));
		}

		Ok(Self {
			server,
			database,
			schema,
			local,
		})
	}

	pub fn server(&self) -> Option<&str> {
		self.server.as_deref()
	}

	pub fn database(&self) -> Option<&str> {
		self.database.as_deref()
	}

	pub fn schema(&self) -> Option<&str> {
		self.schema.as_deref()
	}

	pub fn local(&self) -> &str {
		&self.local
	}

	/// Number of parts present, between 1 and 4.
	pub fn depth(&self) -> usize {
		1 + [&self.server, &self.database, &self.schema].iter().filter(|p| p.is_some()).count()
	}

	/// Present parts, outermost first.
	pub fn parts(&self) -> impl Iterator<Item = &str> {
		[self.server.as_deref(), self.database.as_deref(), self.schema.as_deref(), Some(self.local.as_str())]
			.into_iter()
			.flatten()
	}

	/// Apply `f` to every present part. Blank results are rejected.
	pub fn map_parts(&self, f: impl Fn(&str) -> String) -> Result<Self> {
		Self::from_parts(
			self.server.as_deref().map(&f),
			self.database.as_deref().map(&f),
			self.schema.as_deref().map(&f),
			f(&self.local),
		)
	}
}

impl fmt::Display for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, part) in self.parts().enumerate() {
			if i > 0 {
				f.write_str(".")?;
			}
			f.write_str(part)?;
		}
		Ok(())
	}
}

impl Serialize for Identifier {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl FromStr for Identifier {
	type Err = Error;

	/// Parse a dotted name, `local` up to `server.database.schema.local`.
	fn from_str(s: &str) -> Result<Self> {
		let parts: Vec<String> = s.split('.').map(|p| p.trim().to_string()).collect();
		let mut parts = parts.into_iter();
		match parts.len() {
			1 => Self::new(parts.next().unwrap_or_default()),
			2 => {
				let schema = parts.next();
				Self::from_parts(None, None, schema, parts.next().unwrap_or_default())
			}
			3 => {
				let database = parts.next();
				let schema = parts.next();
				Self::from_parts(None, database, schema, parts.next().unwrap_or_default())
			}
			4 => {
				let server = parts.next();
				let database = parts.next();
				let schema = parts.next();
				Self::from_parts(server, database, schema, parts.next().unwrap_or_default())
			}
			n => Err(Error::invalid_identifier(format!("'{s}' has {n} parts, at most 4 are allowed"))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_blank_local_rejected() {
		assert!(matches!(Identifier::new(""), Err(Error::InvalidIdentifier { .. })));
		assert!(matches!(Identifier::new("   "), Err(Error::InvalidIdentifier { .. })));
	}

	#[test]
	fn test_qualifier_requires_lower_parts() {
		let err = Identifier::from_parts(Some("srv".into()), None, Some("dbo".into()), "T");
		assert!(matches!(err, Err(Error::InvalidIdentifier { .. })));

		let err = Identifier::from_parts(None, Some("db".into()), None, "T");
		assert!(matches!(err, Err(Error::InvalidIdentifier { .. })));

		let ok = Identifier::from_parts(Some("srv".into()), Some("db".into()), Some("dbo".into()), "T").unwrap();
		assert_eq!(ok.depth(), 4);
	}

	#[test]
	fn test_blank_qualifier_rejected() {
		let err = Identifier::from_parts(None, None, Some(" ".into()), "T");
		assert!(matches!(err, Err(Error::InvalidIdentifier { .. })));
	}

	#[test]
	fn test_parse_and_display() {
		let id: Identifier = "sales.dbo.Orders".parse().unwrap();
		assert_eq!(id.database(), Some("sales"));
		assert_eq!(id.schema(), Some("dbo"));
		assert_eq!(id.local(), "Orders");
		assert_eq!(id.server(), None);
		assert_eq!(id.to_string(), "sales.dbo.Orders");

		let id: Identifier = "Orders".parse().unwrap();
		assert_eq!(id.depth(), 1);
		assert_eq!(id.to_string(), "Orders");
	}

	#[test]
	fn test_parse_rejects_malformed() {
		assert!("a.b.c.d.e".parse::<Identifier>().is_err());
		assert!("dbo..Orders".parse::<Identifier>().is_err());
		assert!("dbo.".parse::<Identifier>().is_err());
	}

	#[test]
	fn test_map_parts() {
		let id = Identifier::qualified("dbo", "Orders").unwrap();
		let upper = id.map_parts(|p| p.to_uppercase()).unwrap();
		assert_eq!(upper.to_string(), "DBO.ORDERS");
	}
}
