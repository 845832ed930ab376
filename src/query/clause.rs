//! Clause model: filters, having-clauses, ordering keys and column lists.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{Error, Result};

/// Filter operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Is,
    IsNot,
    In,
    NotIn,
    Between,
    NotBetween,
}

impl Operator {
    /// Wire name, as used in both the filter string and the JSON body
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Like => "like",
            Operator::Is => "is",
            Operator::IsNot => "is_not",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Between => "between",
            Operator::NotBetween => "not_between",
        }
    }

    /// Operators taking a (min, max) pair
    pub fn is_range(&self) -> bool {
        matches!(self, Operator::Between | Operator::NotBetween)
    }

    /// Operators taking a list of values
    pub fn is_set(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HavingOperator> for Operator {
    fn from(op: HavingOperator) -> Self {
        match op {
            HavingOperator::Eq => Operator::Eq,
            HavingOperator::Neq => Operator::Neq,
            HavingOperator::Gt => Operator::Gt,
            HavingOperator::Gte => Operator::Gte,
            HavingOperator::Lt => Operator::Lt,
            HavingOperator::Lte => Operator::Lte,
        }
    }
}

/// Comparison operators allowed in a HAVING clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HavingOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// How a filter joins the clauses before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Value side of a filter.
///
/// Range operators take a `Pair` (a two-element `List` is accepted), set operators take
/// a `List` (a `Pair` is widened). Every other operator takes a `Scalar`; a `Pair` or
/// `List` given to one of them is kept as a single JSON array value, whichever builder
/// method it came through, and the query is then sent as a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Scalar(Value),
    Pair(Value, Value),
    List(Vec<Value>),
}

impl FilterValue {
    pub fn scalar(value: impl Into<Value>) -> Self {
        FilterValue::Scalar(value.into())
    }

    pub fn pair(min: impl Into<Value>, max: impl Into<Value>) -> Self {
        FilterValue::Pair(min.into(), max.into())
    }

    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }

    /// True for values that need a structured (JSON) encoding
    pub fn is_array(&self) -> bool {
        match self {
            FilterValue::Scalar(v) => v.is_array(),
            FilterValue::Pair(..) | FilterValue::List(_) => true,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::Scalar(v) => v.clone(),
            FilterValue::Pair(min, max) => Value::Array(vec![min.clone(), max.clone()]),
            FilterValue::List(values) => Value::Array(values.clone()),
        }
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => FilterValue::List(values),
            other => FilterValue::Scalar(other),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    FilterValue::Scalar(Value::from(value))
                }
            }
        )*
    };
}

scalar_from!(bool, i32, i64, u32, u64, f64, &str, String);

impl<V: Into<Value>> From<Vec<V>> for FilterValue {
    fn from(values: Vec<V>) -> Self {
        FilterValue::list(values)
    }
}

impl<V: Into<Value>, const N: usize> From<[V; N]> for FilterValue {
    fn from(values: [V; N]) -> Self {
        FilterValue::list(values)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for FilterValue {
    fn from((min, max): (A, B)) -> Self {
        FilterValue::pair(min, max)
    }
}

/// One filter predicate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterClause {
    pub column: String,
    pub operator: Operator,
    #[serde(serialize_with = "serialize_filter_value")]
    pub value: FilterValue,
    pub logical_op: LogicalOp,
}

fn serialize_filter_value<S: serde::Serializer>(
    value: &FilterValue,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    value.to_json().serialize(serializer)
}

impl FilterClause {
    /// Build a clause, checking that the value shape fits the operator.
    ///
    /// Range operators need exactly two values, set operators a list, and every
    /// other operator a single scalar.
    pub fn new(
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<FilterValue>,
        logical_op: LogicalOp,
    ) -> Result<Self> {
        let column = column.into();
        let value = normalize_value(&column, operator, value.into())?;
        Ok(Self {
            column,
            operator,
            value,
            logical_op,
        })
    }
}

fn normalize_value(column: &str, operator: Operator, value: FilterValue) -> Result<FilterValue> {
    if operator.is_range() {
        return match value {
            FilterValue::Pair(..) => Ok(value),
            FilterValue::List(mut values) if values.len() == 2 => {
                let max = values.remove(1);
                let min = values.remove(0);
                Ok(FilterValue::Pair(min, max))
            }
            FilterValue::List(values) => Err(Error::invalid_query(format!(
                "`{}` on column `{}` needs exactly 2 values (min, max), got {}",
                operator,
                column,
                values.len()
            ))),
            FilterValue::Scalar(_) => Err(Error::invalid_query(format!(
                "`{}` on column `{}` needs a (min, max) pair",
                operator, column
            ))),
        };
    }

    if operator.is_set() {
        return match value {
            FilterValue::List(_) => Ok(value),
            FilterValue::Pair(a, b) => Ok(FilterValue::List(vec![a, b])),
            FilterValue::Scalar(_) => Err(Error::invalid_query(format!(
                "`{}` on column `{}` needs a list of values",
                operator, column
            ))),
        };
    }

    match value {
        FilterValue::Scalar(_) => Ok(value),
        FilterValue::Pair(a, b) => Ok(FilterValue::Scalar(Value::Array(vec![a, b]))),
        FilterValue::List(values) => Ok(FilterValue::Scalar(Value::Array(values))),
    }
}

/// One HAVING predicate, applied after aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HavingClause {
    pub column: String,
    pub operator: HavingOperator,
    pub value: Value,
}

impl HavingClause {
    pub fn new(
        column: impl Into<String>,
        operator: HavingOperator,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderKey {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderKey {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Desc)
    }
}

impl<S: Into<String>> From<(S, SortDirection)> for OrderKey {
    fn from((column, direction): (S, SortDirection)) -> Self {
        Self::new(column, direction)
    }
}

/// Ordering: one column, or several in priority order
#[derive(Debug, Clone, PartialEq)]
pub enum OrderSpec {
    Single(OrderKey),
    Multi(Vec<OrderKey>),
}

/// Column list for projections and grouping.
///
/// Entries may be plain columns or expressions such as `COUNT(*)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Columns(pub Vec<String>);

impl Columns {
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|c| c.trim().is_empty())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Normalized entries joined with commas, as sent in the `select` query parameter
    pub fn joined(&self) -> String {
        self.normalized().join(",")
    }

    /// Entries with comma-separated strings split out and whitespace trimmed
    pub fn normalized(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|entry| entry.split(','))
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl From<&str> for Columns {
    fn from(column: &str) -> Self {
        Columns(vec![column.to_string()])
    }
}

impl From<String> for Columns {
    fn from(column: String) -> Self {
        Columns(vec![column])
    }
}

impl<S: Into<String>> From<Vec<S>> for Columns {
    fn from(columns: Vec<S>) -> Self {
        Columns(columns.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Columns {
    fn from(columns: [S; N]) -> Self {
        Columns(columns.into_iter().map(Into::into).collect())
    }
}

impl From<&[&str]> for Columns {
    fn from(columns: &[&str]) -> Self {
        Columns(columns.iter().map(|c| c.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_wire_names() {
        assert_eq!(Operator::IsNot.as_str(), "is_not");
        assert_eq!(Operator::NotBetween.as_str(), "not_between");
        assert_eq!(serde_json::to_value(Operator::NotIn).unwrap(), json!("not_in"));
        assert_eq!(serde_json::to_value(HavingOperator::Gte).unwrap(), json!("gte"));
    }

    #[test]
    fn test_logical_op_serializes_uppercase() {
        assert_eq!(serde_json::to_value(LogicalOp::And).unwrap(), json!("AND"));
        assert_eq!(serde_json::to_value(LogicalOp::Or).unwrap(), json!("OR"));
    }

    #[test]
    fn test_json_array_becomes_list() {
        let value = FilterValue::from(json!(["a", "b"]));
        assert_eq!(value, FilterValue::List(vec![json!("a"), json!("b")]));
    }

    #[test]
    fn test_between_accepts_pair() {
        let clause = FilterClause::new("age", Operator::Between, (18, 65), LogicalOp::And).unwrap();
        assert_eq!(clause.value, FilterValue::Pair(json!(18), json!(65)));
    }

    #[test]
    fn test_between_two_element_list_becomes_pair() {
        let clause =
            FilterClause::new("price", Operator::NotBetween, vec![10, 20], LogicalOp::And).unwrap();
        assert_eq!(clause.value, FilterValue::Pair(json!(10), json!(20)));
    }

    #[test]
    fn test_between_wrong_arity_rejected() {
        let err = FilterClause::new("age", Operator::Between, vec![1, 2, 3], LogicalOp::And)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(msg) if msg.contains("exactly 2 values")));

        let err = FilterClause::new("age", Operator::Between, 5, LogicalOp::And).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn test_in_requires_list() {
        let err = FilterClause::new("role", Operator::In, "admin", LogicalOp::And).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));

        let clause =
            FilterClause::new("role", Operator::In, ("admin", "mod"), LogicalOp::And).unwrap();
        assert_eq!(clause.value, FilterValue::List(vec![json!("admin"), json!("mod")]));
    }

    #[test]
    fn test_comparison_keeps_list_as_json_array() {
        let clause =
            FilterClause::new("tags", Operator::Eq, json!(["x", "y"]), LogicalOp::And).unwrap();
        assert_eq!(clause.value, FilterValue::Scalar(json!(["x", "y"])));

        let clause = FilterClause::new("point", Operator::Eq, (1, 2), LogicalOp::And).unwrap();
        assert_eq!(clause.value, FilterValue::Scalar(json!([1, 2])));
    }

    #[test]
    fn test_filter_clause_serialization() {
        let clause = FilterClause::new("age", Operator::Between, (18, 30), LogicalOp::Or).unwrap();
        assert_eq!(
            serde_json::to_value(&clause).unwrap(),
            json!({"column": "age", "operator": "between", "value": [18, 30], "logical_op": "OR"})
        );
    }

    #[test]
    fn test_is_array() {
        assert!(!FilterValue::scalar(1).is_array());
        assert!(FilterValue::Scalar(json!([1])).is_array());
        assert!(FilterValue::pair(1, 2).is_array());
        assert!(FilterValue::list(["x"]).is_array());
    }

    #[test]
    fn test_columns_normalization() {
        let cols = Columns::from(vec!["id, name", " email ", "COUNT(*)"]);
        assert_eq!(cols.normalized(), vec!["id", "name", "email", "COUNT(*)"]);
        assert_eq!(Columns::from("id,name").normalized(), vec!["id", "name"]);
        assert_eq!(Columns::from(["id", "name"]).joined(), "id,name");
        assert_eq!(Columns::from(["id", " ", "name , "]).joined(), "id,name");
    }

    #[test]
    fn test_columns_empty() {
        assert!(Columns::default().is_empty());
        assert!(Columns::from(" ").is_empty());
        assert!(!Columns::from("id").is_empty());
    }
}
