// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The catalog object model.
//!
//! Objects are built once by the catalog loaders and shared as `Arc`s; they
//! are never mutated afterwards.

mod column;
mod key;
mod object;
mod table;

pub use column::Column;
pub use key::{Key, KeyType, ReferentialAction, RelationalKey};
pub use object::{Parameter, ParameterDirection, Routine, RoutineKind, Sequence, Synonym, View};
pub use table::{Check, Index, IndexColumn, Table, Trigger, TriggerEvent, TriggerTiming};
