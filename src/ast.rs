//! Query model for parsed BrainrotSQL statements.
//!
//! A [`Query`] is created by the parser when it recognises the statement
//! keyword, filled in token by token, and handed out read-only once the
//! parser reaches a terminal state.

use std::fmt;

use serde::Serialize;

use crate::keywords::Operation;

/// The statement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryKind {
    Select,
    Insert,
    Update,
    Delete,
    BeginTransaction,
    Commit,
    Rollback,
}

impl QueryKind {
    /// The statement kind introduced by a keyword, if it starts one.
    pub fn from_operation(op: Operation) -> Option<Self> {
        match op {
            Operation::Select => Some(QueryKind::Select),
            Operation::Insert => Some(QueryKind::Insert),
            Operation::Update => Some(QueryKind::Update),
            Operation::Delete => Some(QueryKind::Delete),
            Operation::BeginTransaction => Some(QueryKind::BeginTransaction),
            Operation::Commit => Some(QueryKind::Commit),
            Operation::Rollback => Some(QueryKind::Rollback),
            _ => None,
        }
    }

    /// The keyword that introduces this kind.
    pub fn operation(self) -> Operation {
        match self {
            QueryKind::Select => Operation::Select,
            QueryKind::Insert => Operation::Insert,
            QueryKind::Update => Operation::Update,
            QueryKind::Delete => Operation::Delete,
            QueryKind::BeginTransaction => Operation::BeginTransaction,
            QueryKind::Commit => Operation::Commit,
            QueryKind::Rollback => Operation::Rollback,
        }
    }

    /// Transaction control statements carry no table.
    pub fn is_transaction_control(self) -> bool {
        matches!(
            self,
            QueryKind::BeginTransaction | QueryKind::Commit | QueryKind::Rollback
        )
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::Select => write!(f, "SELECT"),
            QueryKind::Insert => write!(f, "INSERT"),
            QueryKind::Update => write!(f, "UPDATE"),
            QueryKind::Delete => write!(f, "DELETE"),
            QueryKind::BeginTransaction => write!(f, "BEGIN TRANSACTION"),
            QueryKind::Commit => write!(f, "COMMIT"),
            QueryKind::Rollback => write!(f, "ROLLBACK"),
        }
    }
}

/// Comparison operators in a WHERE condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<>`, kept apart from `!=` so output matches input
    LtGt,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `IS`
    Is,
    /// `IS NOT`
    IsNot,
}

impl CompareOp {
    /// Symbolic operators, in the order they are listed in error messages.
    pub const SYMBOLS: [&'static str; 7] = ["=", "!=", "<>", "<", ">", "<=", ">="];

    /// Parse a symbolic operator token.
    pub fn from_symbol(token: &str) -> Option<Self> {
        match token {
            "=" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            "<>" => Some(CompareOp::LtGt),
            "<" => Some(CompareOp::Lt),
            ">" => Some(CompareOp::Gt),
            "<=" => Some(CompareOp::Lte),
            ">=" => Some(CompareOp::Gte),
            _ => None,
        }
    }

    /// `IS` and `IS NOT`, the operators under which a NULL alias means NULL.
    pub fn is_null_test(self) -> bool {
        matches!(self, CompareOp::Is | CompareOp::IsNot)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::LtGt => "<>",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Lte => "<=",
            CompareOp::Gte => ">=",
            CompareOp::Is => "IS",
            CompareOp::IsNot => "IS NOT",
        };
        f.write_str(s)
    }
}

/// Connector between two WHERE conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOp {
    And,
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "AND"),
            LogicalOp::Or => write!(f, "OR"),
        }
    }
}

/// The right-hand side of a WHERE condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL, rendered unquoted.
    Null,
    /// A token passed through verbatim.
    Literal(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Literal(s) => write!(f, "{}", s),
        }
    }
}

/// One `field operator value` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }
}

/// A parsed statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    kind: QueryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<String>,
    columns: Vec<String>,
    values: Vec<String>,
    joined_tables: Vec<String>,
    where_conditions: Vec<Condition>,
    where_join_operators: Vec<LogicalOp>,
}

impl Query {
    pub(crate) fn new(kind: QueryKind) -> Self {
        Self {
            kind,
            table: None,
            columns: Vec::new(),
            values: Vec::new(),
            joined_tables: Vec::new(),
            where_conditions: Vec::new(),
            where_join_operators: Vec::new(),
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// Target table; `None` only for transaction control.
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Column list. For SELECT this may be the single entry `*`.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values, positionally matched with `columns` for INSERT and UPDATE.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Tables appended as inner joins (SELECT only).
    pub fn joined_tables(&self) -> &[String] {
        &self.joined_tables
    }

    pub fn where_conditions(&self) -> &[Condition] {
        &self.where_conditions
    }

    /// `where_join_operators()[i]` joins condition `i` to condition `i + 1`.
    pub fn where_join_operators(&self) -> &[LogicalOp] {
        &self.where_join_operators
    }

    /// Column/value pairs of an UPDATE.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .zip(self.values.iter())
            .map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub(crate) fn set_table(&mut self, table: &str) {
        self.table = Some(table.to_string());
    }

    pub(crate) fn push_column(&mut self, column: &str) {
        self.columns.push(column.to_string());
    }

    pub(crate) fn push_value(&mut self, value: &str) {
        self.values.push(value.to_string());
    }

    pub(crate) fn push_joined_table(&mut self, table: &str) {
        self.joined_tables.push(table.to_string());
    }

    pub(crate) fn push_condition(&mut self, condition: Condition) {
        self.where_conditions.push(condition);
    }

    pub(crate) fn push_join_operator(&mut self, op: LogicalOp) {
        self.where_join_operators.push(op);
    }

    /// Whether another INSERT value would overflow the column list.
    pub(crate) fn values_full(&self) -> bool {
        !self.columns.is_empty() && self.values.len() >= self.columns.len()
    }

    /// The first column still waiting for its value, if any.
    pub(crate) fn pending_column(&self) -> Option<&str> {
        self.columns.get(self.values.len()).map(String::as_str)
    }
}
