// Dictionary-encoded column storage: a deduplicated value pool, a per-row index
// array, and cheap handles that share or copy the backing state.
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::core::operator::{Operator, Predicate};

/// Reserved index-array entry meaning "no value recorded for this row".
pub const NO_VALUE: u32 = u32::MAX;

type Convert = Rc<dyn Fn(&Value) -> Value>;

#[derive(Default)]
struct ColumnData {
    distinct: Vec<Value>,
    index: Vec<u32>,
    convert: Option<Convert>,
    bound: bool,
}

impl ColumnData {
    fn position_of(&self, value: &Value) -> Option<u32> {
        self.distinct
            .iter()
            .position(|seen| seen == value)
            .map(|position| position as u32)
    }

    fn position_or_insert(&mut self, value: &Value) -> u32 {
        match self.position_of(value) {
            Some(position) => position,
            None => {
                self.distinct.push(value.clone());
                (self.distinct.len() - 1) as u32
            }
        }
    }
}

/// A named handle over shared column storage.
///
/// `clone` shares the storage under the same name, `alias` shares it under a
/// different name, and `copy_of` duplicates it into an independent column.
#[derive(Clone)]
pub struct Column {
    name: String,
    data: Rc<RefCell<ColumnData>>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Rc::new(RefCell::new(ColumnData::default())),
        }
    }

    /// Deep copy: the new column owns value-copied storage and is free to be
    /// attached to a table regardless of where `source` is attached.
    pub fn copy_of(name: impl Into<String>, source: &Column) -> Self {
        let source = source.data.borrow();
        Self {
            name: name.into(),
            data: Rc::new(RefCell::new(ColumnData {
                distinct: source.distinct.clone(),
                index: source.index.clone(),
                convert: source.convert.clone(),
                bound: false,
            })),
        }
    }

    /// A live view: same pool, index array, and converter, different name.
    pub fn alias(&self, name: impl Into<String>) -> Column {
        Column {
            name: name.into(),
            data: Rc::clone(&self.data),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Installs (or replaces) the read-time converter and returns the handle
    /// for fluent chaining. Aliases share the converter.
    pub fn to(self, convert: impl Fn(&Value) -> Value + 'static) -> Self {
        self.data.borrow_mut().convert = Some(Rc::new(convert));
        self
    }

    /// The deduplicated pool of raw values, in first-occurrence order.
    pub fn distinct(&self) -> Vec<Value> {
        self.data.borrow().distinct.clone()
    }

    pub(crate) fn rows(&self) -> usize {
        self.data.borrow().index.len()
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.data.borrow().bound
    }

    pub(crate) fn mark_bound(&self) {
        self.data.borrow_mut().bound = true;
    }

    /// Writes `value`'s pool position (resolved once per call, appending if
    /// unseen) at each given row slot; `None` writes the sentinel. Slots past
    /// the current end of the index array are padded with the sentinel.
    pub(crate) fn insert(&self, value: Option<&Value>, rows: impl IntoIterator<Item = usize>) {
        let mut data = self.data.borrow_mut();
        let position = match value {
            Some(value) => data.position_or_insert(value),
            None => NO_VALUE,
        };
        for row in rows {
            if data.index.len() <= row {
                data.index.resize(row + 1, NO_VALUE);
            }
            data.index[row] = position;
        }
    }

    /// The value recorded at `row`, passed through the converter when one is
    /// installed. `None` for sentinel or out-of-range rows, converter or not.
    pub fn value(&self, row: usize) -> Option<Value> {
        let (raw, convert) = {
            let data = self.data.borrow();
            let position = data.index.get(row).copied()?;
            if position == NO_VALUE {
                return None;
            }
            (data.distinct[position as usize].clone(), data.convert.clone())
        };
        match convert {
            Some(convert) => Some(convert(&raw)),
            None => Some(raw),
        }
    }

    /// Equality test against the raw stored value. The pool position is
    /// resolved once per query execution; a value absent from the pool builds
    /// the constant-false predicate without scanning any row.
    pub fn equals(&self, value: impl Into<Value>) -> Operator {
        let data = Rc::clone(&self.data);
        let value = value.into();
        Operator::new(move || {
            let position = data.borrow().position_of(&value);
            let data = Rc::clone(&data);
            let predicate: Predicate = match position {
                Some(position) => Box::new(move |row| {
                    data.borrow().index.get(row).copied() == Some(position)
                }),
                None => Box::new(|_| false),
            };
            predicate
        })
    }

    /// Membership test against the raw stored values. The set of pool
    /// positions is resolved once per query execution; values absent from the
    /// pool contribute nothing and are never appended.
    pub fn is_in(&self, values: impl IntoIterator<Item = impl Into<Value>>) -> Operator {
        let data = Rc::clone(&self.data);
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Operator::new(move || {
            let positions: HashSet<u32> = {
                let seen = data.borrow();
                values
                    .iter()
                    .filter_map(|value| seen.position_of(value))
                    .collect()
            };
            let data = Rc::clone(&data);
            Box::new(move |row| match data.borrow().index.get(row) {
                Some(position) => positions.contains(position),
                None => false,
            })
        })
    }

    /// Ad-hoc test over the converted cell value, for range and other checks
    /// the dictionary cannot answer positionally. The test sees `None` for
    /// rows with no recorded value.
    pub fn evaluate(&self, test: impl Fn(Option<&Value>) -> bool + 'static) -> Operator {
        let column = self.clone();
        let test: Rc<dyn Fn(Option<&Value>) -> bool> = Rc::new(test);
        Operator::new(move || {
            let column = column.clone();
            let test = Rc::clone(&test);
            Box::new(move |row| test(column.value(row).as_ref()))
        })
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("rows", &data.index.len())
            .field("distinct", &data.distinct.len())
            .finish()
    }
}
