// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Column type mapping.
//!
//! Catalog queries report types the way the database spells them. A
//! [`TypeProvider`] turns that raw metadata into a [`ColumnType`]; dialects
//! plug in their own provider, [`GenericTypeProvider`] covers the ANSI names.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataType {
	Boolean,
	SmallInt,
	Integer,
	BigInt,
	Decimal,
	Real,
	Double,
	Char,
	VarChar,
	Text,
	Binary,
	VarBinary,
	Date,
	Time,
	Timestamp,
	TimestampTz,
	Interval,
	Uuid,
	Json,
	Xml,
	Other,
}

/// Type information exactly as the catalog reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTypeMetadata {
	pub type_name: String,
	pub max_length: Option<u32>,
	pub precision: Option<u8>,
	pub scale: Option<u8>,
}

impl ColumnTypeMetadata {
	pub fn new(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			..Self::default()
		}
	}

	pub fn with_max_length(mut self, max_length: u32) -> Self {
		self.max_length = Some(max_length);
		self
	}

	pub fn with_precision(mut self, precision: u8, scale: u8) -> Self {
		self.precision = Some(precision);
		self.scale = Some(scale);
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnType {
	pub data_type: DataType,
	pub type_name: String,
	pub max_length: Option<u32>,
	pub precision: Option<u8>,
	pub scale: Option<u8>,
}

pub trait TypeProvider: Send + Sync {
	fn resolve_column_type(&self, metadata: &ColumnTypeMetadata) -> ColumnType;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericTypeProvider;

impl GenericTypeProvider {
	fn data_type(type_name: &str) -> DataType {
		let base = type_name.split('(').next().unwrap_or(type_name).trim().to_ascii_lowercase();
		match base.as_str() {
			"bool" | "boolean" | "bit" => DataType::Boolean,
			"smallint" | "int2" | "tinyint" => DataType::SmallInt,
			"int" | "integer" | "int4" | "mediumint" => DataType::Integer,
			"bigint" | "int8" => DataType::BigInt,
			"decimal" | "numeric" | "number" | "money" => DataType::Decimal,
			"real" | "float4" => DataType::Real,
			"float" | "double" | "double precision" | "float8" => DataType::Double,
			"char" | "character" | "nchar" | "bpchar" => DataType::Char,
			"varchar" | "character varying" | "nvarchar" | "varchar2" | "nvarchar2" => DataType::VarChar,
			"text" | "ntext" | "clob" | "nclob" | "longtext" => DataType::Text,
			"binary" | "blob" | "bytea" | "image" | "longblob" => DataType::Binary,
			"varbinary" | "raw" => DataType::VarBinary,
			"date" => DataType::Date,
			"time" | "time without time zone" => DataType::Time,
			"timestamp" | "datetime" | "datetime2" | "smalldatetime" | "timestamp without time zone" => {
				DataType::Timestamp
			}
			"timestamptz" | "datetimeoffset" | "timestamp with time zone" => DataType::TimestampTz,
			"interval" => DataType::Interval,
			"uuid" | "uniqueidentifier" => DataType::Uuid,
			"json" | "jsonb" => DataType::Json,
			"xml" => DataType::Xml,
			_ => DataType::Other,
		}
	}
}

impl TypeProvider for GenericTypeProvider {
	fn resolve_column_type(&self, metadata: &ColumnTypeMetadata) -> ColumnType {
		ColumnType {
			data_type: Self::data_type(&metadata.type_name),
			type_name: metadata.type_name.clone(),
			max_length: metadata.max_length,
			precision: metadata.precision,
			scale: metadata.scale,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generic_names() {
		let provider = GenericTypeProvider;
		let resolve = |name: &str| provider.resolve_column_type(&ColumnTypeMetadata::new(name)).data_type;

		assert_eq!(resolve("INT"), DataType::Integer);
		assert_eq!(resolve("nvarchar(50)"), DataType::VarChar);
		assert_eq!(resolve("timestamp with time zone"), DataType::TimestampTz);
		assert_eq!(resolve("geography"), DataType::Other);
	}

	#[test]
	fn test_metadata_carried_over() {
		let metadata = ColumnTypeMetadata::new("decimal").with_precision(18, 2);
		let ty = GenericTypeProvider.resolve_column_type(&metadata);
		assert_eq!(ty.data_type, DataType::Decimal);
		assert_eq!(ty.type_name, "decimal");
		assert_eq!(ty.precision, Some(18));
		assert_eq!(ty.scale, Some(2));
	}
}
