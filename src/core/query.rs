// Immutable, chainable filter scopes over a table it does not own.
// Refinement composes operators by logical AND; results are re-derived per call.
use tracing::debug;

use crate::core::column::Column;
use crate::core::operator::{Operator, and};
use crate::core::table::{Row, Table, project, resolve};

#[derive(Clone, Debug)]
pub struct Query<'t> {
    table: &'t Table,
    operator: Operator,
}

impl<'t> Query<'t> {
    pub(crate) fn new(table: &'t Table, operator: Operator) -> Self {
        Self { table, operator }
    }

    /// A new, tighter query: its filter is the conjunction of this query's
    /// filter and `operator`. This query is left as it was.
    pub fn filter(&self, operator: Operator) -> Query<'t> {
        Query {
            table: self.table,
            operator: and([self.operator.clone(), operator]),
        }
    }

    /// Matching row positions in ascending order. The composed operator's
    /// predicate is built fresh on every call; nothing is cached.
    pub fn indexes(&self) -> impl Iterator<Item = usize> + use<'t> {
        let predicate = self.operator.build();
        debug!(table = %self.table.name(), rows = self.table.rows(), "query scan");
        (0..self.table.rows()).filter(move |&index| predicate(index))
    }

    /// Matching rows projected through the given columns (all table columns
    /// when the slice is empty), in ascending row order.
    pub fn select(&self, columns: &[Column]) -> impl Iterator<Item = Row> + use<'t> {
        let columns = resolve(self.table.columns(), columns);
        self.indexes().map(move |index| project(&columns, index))
    }
}
