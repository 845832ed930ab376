//! Wire compiler: turns a [`QueryState`] into query-string parameters or a JSON body.
//!
//! The flat `filter` string (`column.operator.value,...`) cannot carry value lists,
//! OR-joined predicates, grouping or multi-key ordering. Any of those moves the whole
//! query to the JSON body sent to `POST /{table}/query`.

use serde::Serialize;
use serde_json::Value;

use super::clause::{FilterClause, HavingClause, LogicalOp, OrderKey, OrderSpec, SortDirection};
use super::state::QueryState;
use crate::error::{Error, Result};

/// Which encoding a query needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireKind {
    /// `GET /{table}` with query parameters
    Simple,
    /// `POST /{table}/query` with a JSON body
    Advanced,
}

/// A compiled query
#[derive(Debug, Clone, PartialEq)]
pub enum WireForm {
    Simple(SimpleParams),
    Advanced(AdvancedBody),
}

impl WireForm {
    pub fn kind(&self) -> WireKind {
        match self {
            WireForm::Simple(_) => WireKind::Simple,
            WireForm::Advanced(_) => WireKind::Advanced,
        }
    }
}

/// Query-string encoding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleParams {
    pub select: Option<String>,
    pub filter: Option<String>,
    pub order: Option<String>,
    pub order_direction: Option<SortDirection>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SimpleParams {
    /// Parameters in the order they are sent
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        if let Some(filter) = &self.filter {
            params.push(("filter".to_string(), filter.clone()));
        }
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        if let Some(direction) = self.order_direction {
            params.push(("order_direction".to_string(), direction.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        params
    }
}

/// `order_by` is a bare column next to `order_direction`, or a list of keys
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OrderBy {
    Column(String),
    Keys(Vec<OrderKey>),
}

/// JSON body encoding. Field names are part of the server contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdvancedBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub having: Vec<HavingClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// Decide the encoding a query needs, from the features it uses.
pub fn classify(state: &QueryState) -> WireKind {
    let grouped = state.group_by.as_ref().is_some_and(|g| !g.is_empty());
    let multi_order = matches!(state.order, Some(OrderSpec::Multi(_)));
    let structured_filter = state
        .filters
        .iter()
        .any(|f| !matches!(f.value, super::clause::FilterValue::Scalar(_)));
    let or_joined = state.filters.iter().any(|f| f.logical_op == LogicalOp::Or);

    if grouped || !state.having.is_empty() || multi_order || structured_filter || or_joined {
        WireKind::Advanced
    } else {
        WireKind::Simple
    }
}

/// Compile a query, failing if any clause was rejected while building it.
pub fn compile(state: &QueryState) -> Result<WireForm> {
    if let Some(message) = state.invalid() {
        return Err(Error::invalid_query(message));
    }

    if classify(state) == WireKind::Advanced {
        return Ok(WireForm::Advanced(advanced_body(state)));
    }

    // A scalar that is itself a JSON array has no flat encoding either.
    if state.filters.iter().any(|f| f.value.is_array()) {
        tracing::debug!("array-valued filter found, using JSON query body");
        return Ok(WireForm::Advanced(advanced_body(state)));
    }

    Ok(WireForm::Simple(simple_params(state)))
}

/// Query-string parameters for the state, regardless of whether they can express it.
pub fn simple_params(state: &QueryState) -> SimpleParams {
    let select = state
        .select
        .as_ref()
        .filter(|cols| !cols.is_empty())
        .map(|cols| cols.joined());

    let filter = if state.filters.is_empty() {
        None
    } else {
        Some(
            state
                .filters
                .iter()
                .map(filter_token)
                .collect::<Vec<_>>()
                .join(","),
        )
    };

    let (order, order_direction) = match &state.order {
        Some(OrderSpec::Single(key)) => (Some(key.column.clone()), Some(key.direction)),
        // Only the leading key fits; classify() never lets this reach the wire.
        Some(OrderSpec::Multi(keys)) => match keys.first() {
            Some(key) => (Some(key.column.clone()), Some(key.direction)),
            None => (None, None),
        },
        None => (None, None),
    };

    SimpleParams {
        select,
        filter,
        order,
        order_direction,
        limit: state.limit,
        offset: state.offset,
    }
}

/// JSON body for the state
pub fn advanced_body(state: &QueryState) -> AdvancedBody {
    let (order_by, order_direction) = match &state.order {
        Some(OrderSpec::Single(key)) => {
            (Some(OrderBy::Column(key.column.clone())), Some(key.direction))
        }
        Some(OrderSpec::Multi(keys)) => (Some(OrderBy::Keys(keys.clone())), None),
        None => (None, None),
    };

    AdvancedBody {
        select: state
            .select
            .as_ref()
            .filter(|cols| !cols.is_empty())
            .map(|cols| cols.normalized()),
        filters: state.filters.clone(),
        group_by: state
            .group_by
            .as_ref()
            .filter(|cols| !cols.is_empty())
            .map(|cols| cols.normalized()),
        having: state.having.clone(),
        order_by,
        order_direction,
        limit: state.limit,
        offset: state.offset,
    }
}

fn filter_token(clause: &FilterClause) -> String {
    let value = clause.value.to_json();
    format!("{}.{}.{}", clause.column, clause.operator, scalar_text(&value))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
