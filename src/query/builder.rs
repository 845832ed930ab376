//! Chainable query builder bound to one table.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::clause::{
    Columns, FilterClause, FilterValue, HavingClause, HavingOperator, LogicalOp, OrderKey,
    OrderSpec, Operator, SortDirection,
};
use super::compile::{compile, WireForm};
use super::state::{QueryOverrides, QueryState};
use crate::error::{Error, Result};
use crate::transport::{segment, Request, Transport};
use crate::types::QueryResponse;

/// Query builder for one table
///
/// Chain methods consume and return the builder; terminal methods borrow it, so
/// a built query can be sent any number of times.
///
/// # Example
/// ```no_run
/// # async fn run(client: wowsql::WowSQL) -> wowsql::Result<()> {
/// use serde_json::Value;
/// use wowsql::SortDirection;
///
/// let adults: wowsql::QueryResponse<Value> = client
///     .table("users")
///     .select(["id", "name"])
///     .gte("age", 18)
///     .order("created_at", SortDirection::Desc)
///     .limit(10)
///     .get()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct QueryBuilder {
    transport: Arc<dyn Transport>,
    table: String,
    state: QueryState,
}

impl QueryBuilder {
    pub fn new(transport: Arc<dyn Transport>, table: impl Into<String>) -> Self {
        Self {
            transport,
            table: table.into(),
            state: QueryState::new(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Set the projection, replacing any earlier one
    pub fn select(mut self, columns: impl Into<Columns>) -> Self {
        self.state.select = Some(columns.into());
        self
    }

    /// Add a filter joined with AND
    pub fn filter(
        self,
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.push(column, operator, value.into(), LogicalOp::And)
    }

    /// Add a filter joined with OR
    pub fn or(
        self,
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.push(column, operator, value.into(), LogicalOp::Or)
    }

    /// Add an already-built clause
    pub fn clause(mut self, clause: FilterClause) -> Self {
        self.state.filters.push(clause);
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Operator::Eq, FilterValue::Scalar(value.into()))
    }

    pub fn neq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Operator::Neq, FilterValue::Scalar(value.into()))
    }

    pub fn gt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Operator::Gt, FilterValue::Scalar(value.into()))
    }

    pub fn gte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Operator::Gte, FilterValue::Scalar(value.into()))
    }

    pub fn lt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Operator::Lt, FilterValue::Scalar(value.into()))
    }

    pub fn lte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Operator::Lte, FilterValue::Scalar(value.into()))
    }

    /// Pattern match, e.g. `%@example.com`
    pub fn like(self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.filter(column, Operator::Like, FilterValue::Scalar(Value::String(pattern.into())))
    }

    pub fn is_null(self, column: impl Into<String>) -> Self {
        self.filter(column, Operator::Is, FilterValue::Scalar(Value::Null))
    }

    pub fn is_not_null(self, column: impl Into<String>) -> Self {
        self.filter(column, Operator::IsNot, FilterValue::Scalar(Value::Null))
    }

    pub fn is_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter(column, Operator::In, FilterValue::list(values))
    }

    pub fn not_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter(column, Operator::NotIn, FilterValue::list(values))
    }

    /// Inclusive range `min..=max`
    pub fn between(
        self,
        column: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        self.filter(column, Operator::Between, FilterValue::pair(min, max))
    }

    pub fn not_between(
        self,
        column: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        self.filter(column, Operator::NotBetween, FilterValue::pair(min, max))
    }

    /// Set the GROUP BY columns, replacing any earlier ones
    pub fn group_by(mut self, columns: impl Into<Columns>) -> Self {
        self.state.group_by = Some(columns.into());
        self
    }

    /// Add a HAVING predicate on an aggregated column or expression
    pub fn having(
        mut self,
        column: impl Into<String>,
        operator: HavingOperator,
        value: impl Into<Value>,
    ) -> Self {
        self.state.having.push(HavingClause::new(column, operator, value));
        self
    }

    /// Sort by one column, replacing any earlier ordering
    pub fn order(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.state.order = Some(OrderSpec::Single(OrderKey::new(column, direction)));
        self
    }

    pub fn order_by(self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order(column, direction)
    }

    /// Sort by several columns in priority order, replacing any earlier ordering
    pub fn order_by_many<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<OrderKey>,
    {
        self.state.order = Some(OrderSpec::Multi(keys.into_iter().map(Into::into).collect()));
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.state.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.state.offset = Some(n);
        self
    }

    fn push(
        mut self,
        column: impl Into<String>,
        operator: Operator,
        value: FilterValue,
        logical_op: LogicalOp,
    ) -> Self {
        match FilterClause::new(column, operator, value, logical_op) {
            Ok(clause) => self.state.filters.push(clause),
            Err(Error::InvalidQuery(message)) => self.state.reject(message),
            Err(e) => self.state.reject(e.to_string()),
        }
        self
    }

    /// Compile the current state without sending anything
    pub fn compile(&self) -> Result<WireForm> {
        compile(&self.state)
    }

    /// The request `get_with(overrides)` would send
    pub fn to_request(&self, overrides: &QueryOverrides) -> Result<Request> {
        let state = self.state.with_overrides(overrides);
        build_request(&self.table, compile(&state)?)
    }

    pub async fn get<T: DeserializeOwned>(&self) -> Result<QueryResponse<T>> {
        self.get_with(QueryOverrides::default()).await
    }

    /// Run the query with transient overrides; the builder itself is unchanged
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        overrides: QueryOverrides,
    ) -> Result<QueryResponse<T>> {
        let request = self.to_request(&overrides)?;
        tracing::debug!(
            table = %self.table,
            method = %request.method,
            path = %request.path,
            "dispatching query"
        );
        self.transport.send(request).await?.json()
    }

    pub async fn execute<T: DeserializeOwned>(&self) -> Result<QueryResponse<T>> {
        self.get().await
    }

    pub async fn execute_with<T: DeserializeOwned>(
        &self,
        overrides: QueryOverrides,
    ) -> Result<QueryResponse<T>> {
        self.get_with(overrides).await
    }

    /// First matching row, or `None` when nothing matches. Always sends `limit=1`.
    pub async fn first<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let page = self.get_with::<T>(QueryOverrides::new().limit(1)).await?;
        Ok(page.into_first())
    }
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("table", &self.table)
            .field("state", &self.state)
            .finish()
    }
}

/// Route a compiled query: query parameters go to `GET /{table}`, bodies to
/// `POST /{table}/query`.
pub(crate) fn build_request(table: &str, form: WireForm) -> Result<Request> {
    match form {
        WireForm::Simple(params) => {
            Ok(Request::get(format!("/{}", segment(table))).query(params.to_query()))
        }
        WireForm::Advanced(body) => Request::post(format!("/{}/query", segment(table))).json(&body),
    }
}
