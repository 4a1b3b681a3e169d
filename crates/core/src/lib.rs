// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod interface;
pub mod model;
pub mod resolve;
pub mod types;

pub use introspect_type::{Error, Identifier, IdentifierComparer, IdentifierDefaults, IdentifierKey, Result};
