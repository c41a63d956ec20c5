// Row-aligned tables: an ordered set of columns with insertion, sentinel
// backfill for late-added columns, projection, and lazy row enumeration.
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::core::column::Column;
use crate::core::error::{Error, ErrorKind};
use crate::core::operator::Operator;
use crate::core::query::Query;

/// A row record: an ordered association from column names to JSON values.
pub type Row = Map<String, Value>;

#[derive(Debug)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Deep copy: every column of `source` is value-copied, so the new table
    /// and the source are independently mutable from here on.
    pub fn copy_of(name: impl Into<String>, source: &Table) -> Self {
        let columns = source
            .columns
            .iter()
            .map(|column| {
                let copied = Column::copy_of(column.name(), column);
                copied.mark_bound();
                copied
            })
            .collect();
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The table's columns in add order, which is also the default
    /// projection order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The number of rows inserted so far.
    pub fn rows(&self) -> usize {
        self.columns.first().map(Column::rows).unwrap_or(0)
    }

    /// Attaches columns, in order. Each new column is first backfilled with
    /// sentinels across every existing row so the row-count invariant holds
    /// before it becomes visible. Rejects a name already present on the table
    /// and storage already attached to a table (including via an alias).
    pub fn add(&mut self, columns: impl IntoIterator<Item = Column>) -> Result<(), Error> {
        for column in columns {
            if self.columns.iter().any(|existing| existing.name() == column.name()) {
                return Err(Error::new(ErrorKind::AlreadyExists)
                    .with_message("column name is already present")
                    .with_table(self.name.as_str())
                    .with_column(column.name()));
            }
            if column.is_bound() {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("column storage is already attached to a table")
                    .with_table(self.name.as_str())
                    .with_column(column.name()));
            }
            let rows = self.rows();
            column.insert(None, 0..rows);
            column.mark_bound();
            trace!(table = %self.name, column = %column.name(), backfilled = rows, "add column");
            self.columns.push(column);
        }
        Ok(())
    }

    /// Appends one row and returns its index. Every column receives the value
    /// under its name; keys with no matching column are ignored, and columns
    /// with no matching key record no value.
    pub fn insert(&mut self, row: &Row) -> usize {
        let at = self.rows();
        for column in &self.columns {
            column.insert(row.get(column.name()), [at]);
        }
        trace!(table = %self.name, row = at, "insert row");
        at
    }

    /// Serde bridge: serializes `record` to a JSON object and inserts it.
    pub fn insert_from<T: Serialize>(&mut self, record: &T) -> Result<usize, Error> {
        match serde_json::to_value(record) {
            Ok(Value::Object(row)) => Ok(self.insert(&row)),
            Ok(_) => Err(Error::new(ErrorKind::Usage)
                .with_message("record must serialize to a JSON object")
                .with_table(self.name.as_str())),
            Err(err) => Err(Error::new(ErrorKind::Usage)
                .with_message("record failed to serialize")
                .with_table(self.name.as_str())
                .with_source(err)),
        }
    }

    /// Projects one row through the given columns (all table columns when the
    /// slice is empty). Cells with no recorded value are omitted from the row.
    pub fn row(&self, index: usize, columns: &[Column]) -> Row {
        project(&resolve(&self.columns, columns), index)
    }

    /// A lazy, restartable pass over every row in insertion order. Each call
    /// returns an independent cursor.
    pub fn select<'t>(&'t self, columns: &[Column]) -> impl Iterator<Item = Row> + use<'t> {
        let columns = resolve(&self.columns, columns);
        self.indexes().map(move |index| project(&columns, index))
    }

    /// Row positions `0..rows()`, unfiltered. The filtered form lives on
    /// `Query::indexes`.
    pub fn indexes(&self) -> impl Iterator<Item = usize> + use<> {
        0..self.rows()
    }

    /// A new query scoped to this table with `operator` as its filter.
    pub fn filter(&self, operator: Operator) -> Query<'_> {
        Query::new(self, operator)
    }
}

pub(crate) fn resolve(defaults: &[Column], requested: &[Column]) -> Vec<Column> {
    if requested.is_empty() {
        defaults.to_vec()
    } else {
        requested.to_vec()
    }
}

pub(crate) fn project(columns: &[Column], index: usize) -> Row {
    let mut row = Row::new();
    for column in columns {
        if let Some(value) = column.value(index) {
            row.insert(column.name().to_string(), value);
        }
    }
    row
}
