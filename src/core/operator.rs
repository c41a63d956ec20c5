//! Purpose: Deferred predicate construction for row filtering.
//! Exports: `Operator`, `Predicate`, `and`, `or`, `not`.
//! Role: The contract between columns, queries, and row scans; knows nothing of Column or Table.
//! Invariants: An operator's build step runs once per query execution, never cached across runs.
//! Invariants: `and` of no operators is constant true; `or` of no operators is constant false.

use std::fmt;
use std::rc::Rc;

/// A test over a row position, built fresh for each query execution.
pub type Predicate = Box<dyn Fn(usize) -> bool>;

/// A zero-argument factory of predicates. Cloning shares the factory.
#[derive(Clone)]
pub struct Operator {
    build: Rc<dyn Fn() -> Predicate>,
}

impl Operator {
    pub fn new(build: impl Fn() -> Predicate + 'static) -> Self {
        Self {
            build: Rc::new(build),
        }
    }

    pub fn build(&self) -> Predicate {
        (self.build)()
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator").finish_non_exhaustive()
    }
}

pub fn and(operators: impl IntoIterator<Item = Operator>) -> Operator {
    let operators: Vec<Operator> = operators.into_iter().collect();
    Operator::new(move || {
        let predicates: Vec<Predicate> = operators.iter().map(Operator::build).collect();
        Box::new(move |index| predicates.iter().all(|predicate| predicate(index)))
    })
}

pub fn or(operators: impl IntoIterator<Item = Operator>) -> Operator {
    let operators: Vec<Operator> = operators.into_iter().collect();
    Operator::new(move || {
        let predicates: Vec<Predicate> = operators.iter().map(Operator::build).collect();
        Box::new(move |index| predicates.iter().any(|predicate| predicate(index)))
    })
}

pub fn not(operator: Operator) -> Operator {
    Operator::new(move || {
        let predicate = operator.build();
        Box::new(move |index| !predicate(index))
    })
}
