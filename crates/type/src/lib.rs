// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod error;
pub mod identifier;

pub use error::{Error, Result};
pub use identifier::{Identifier, IdentifierComparer, IdentifierDefaults, IdentifierKey, StringComparison};
