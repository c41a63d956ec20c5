//! Purpose: Embedded in-process columnar tables with composable query filters.
//! Exports: `core` (columns, tables, queries, operators, errors) plus root re-exports.
//! Role: Library crate consumed directly by host programs; no binary or wire surface.
//! Invariants: Tables and columns are single-owner, single-threaded value containers.
//! Invariants: Query execution is lazy, re-derived per call, and never mutates a table.
pub mod core;

pub use crate::core::column::{Column, NO_VALUE};
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::operator::{Operator, Predicate, and, not, or};
pub use crate::core::query::Query;
pub use crate::core::table::{Row, Table};
