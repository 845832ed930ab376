//! Accumulated query state and per-call overrides.

use super::clause::{Columns, FilterClause, HavingClause, OrderKey, OrderSpec, SortDirection};

/// Everything a query builder has collected so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub select: Option<Columns>,
    /// Insertion order is kept; it is the order tokens appear in the filter string.
    pub filters: Vec<FilterClause>,
    pub group_by: Option<Columns>,
    pub having: Vec<HavingClause>,
    pub order: Option<OrderSpec>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// First clause that failed validation, reported by the next terminal call
    pub(crate) invalid: Option<String>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error message of the first rejected clause, if any
    pub fn invalid(&self) -> Option<&str> {
        self.invalid.as_deref()
    }

    pub(crate) fn reject(&mut self, message: String) {
        if self.invalid.is_none() {
            self.invalid = Some(message);
        }
    }

    /// Copy of this state with the overrides layered on top
    pub fn with_overrides(&self, overrides: &QueryOverrides) -> QueryState {
        let mut state = self.clone();
        if let Some(limit) = overrides.limit {
            state.limit = Some(limit);
        }
        if let Some(offset) = overrides.offset {
            state.offset = Some(offset);
        }
        if let Some(order) = &overrides.order {
            state.order = Some(order.clone());
        }
        state
    }
}

/// Transient options for a single `get`, never stored on the builder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOverrides {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub order: Option<OrderSpec>,
}

impl QueryOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    pub fn order(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some(OrderSpec::Single(OrderKey::new(column, direction)));
        self
    }
}
