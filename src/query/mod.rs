//! Query builder for WOWSQL
//!
//! Filters, grouping and ordering are collected on a [`QueryBuilder`] and compiled
//! either to `GET /{table}` query parameters or to a `POST /{table}/query` JSON body.

mod builder;
pub mod clause;
pub mod compile;
mod state;

pub use builder::QueryBuilder;
pub use clause::{
    Columns, FilterClause, FilterValue, HavingClause, HavingOperator, LogicalOp, OrderKey,
    OrderSpec, Operator, SortDirection,
};
pub use compile::{classify, compile, AdvancedBody, OrderBy, SimpleParams, WireForm, WireKind};
pub use state::{QueryOverrides, QueryState};
