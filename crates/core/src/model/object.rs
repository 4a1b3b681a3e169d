// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use introspect_type::Identifier;
use serde::Serialize;

use crate::{model::Column, types::ColumnType};

#[derive(Debug, Clone, Serialize)]
pub struct View {
	pub name: Identifier,
	pub definition: Option<String>,
	pub columns: Arc<[Column]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sequence {
	pub name: Identifier,
	pub start: i64,
	pub increment: i64,
	pub min: Option<i64>,
	pub max: Option<i64>,
	pub cycle: bool,
	pub cache: Option<u32>,
}

/// An alias for another object, possibly on another database or server.
#[derive(Debug, Clone, Serialize)]
pub struct Synonym {
	pub name: Identifier,
	pub target: Identifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoutineKind {
	Procedure,
	Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ParameterDirection {
	#[default]
	In,
	Out,
	InOut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
	/// Unnamed for positional parameters.
	pub name: Option<String>,
	pub ordinal: u32,
	pub column_type: ColumnType,
	pub direction: ParameterDirection,
}

#[derive(Debug, Clone, Serialize)]
pub struct Routine {
	pub name: Identifier,
	pub kind: RoutineKind,
	pub definition: Option<String>,
	/// Ordered by ordinal.
	pub parameters: Vec<Parameter>,
	pub return_type: Option<ColumnType>,
}
