//! SQL Transpiler for the BrainrotSQL query model.
//!
//! Converts parsed queries into SQL text. Output is deterministic: the same
//! query always renders to the same bytes.
//!
//! Values are emitted exactly as the user typed them. Nothing is quoted or
//! escaped, so a caller that splices untrusted input into dialect text gets
//! that input verbatim in the SQL.

use crate::ast::{Condition, LogicalOp, Query, QueryKind, Value};

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string.
    fn to_sql(&self) -> String;
}

impl ToSql for Query {
    fn to_sql(&self) -> String {
        match self.kind() {
            QueryKind::Select => self.to_select_sql(),
            QueryKind::Insert => self.to_insert_sql(),
            QueryKind::Update => self.to_update_sql(),
            QueryKind::Delete => self.to_delete_sql(),
            QueryKind::BeginTransaction => "START TRANSACTION".to_string(),
            QueryKind::Commit => "COMMIT".to_string(),
            QueryKind::Rollback => "ROLLBACK".to_string(),
        }
    }
}

impl Query {
    /// Generate SELECT SQL.
    fn to_select_sql(&self) -> String {
        let mut sql = String::from("SELECT ");

        if self.columns().is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.columns().join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(self.table().unwrap_or_default());

        // Each joined table carries its own keyword.
        for joined in self.joined_tables() {
            sql.push_str(" INNER JOIN ");
            sql.push_str(joined);
        }

        self.push_where(&mut sql);
        sql
    }

    /// Generate INSERT SQL.
    fn to_insert_sql(&self) -> String {
        let mut sql = String::from("INSERT INTO ");
        sql.push_str(self.table().unwrap_or_default());

        if !self.columns().is_empty() {
            sql.push_str(" (");
            sql.push_str(&self.columns().join(", "));
            sql.push(')');
        }

        sql.push_str(" VALUES (");
        sql.push_str(&self.values().join(", "));
        sql.push(')');
        sql
    }

    /// Generate UPDATE SQL.
    fn to_update_sql(&self) -> String {
        let mut sql = String::from("UPDATE ");
        sql.push_str(self.table().unwrap_or_default());

        let set_clauses: Vec<String> = self
            .assignments()
            .map(|(column, value)| format!("{} = {}", column, value))
            .collect();
        sql.push_str(" SET ");
        sql.push_str(&set_clauses.join(", "));

        self.push_where(&mut sql);
        sql
    }

    /// Generate DELETE SQL.
    fn to_delete_sql(&self) -> String {
        let mut sql = String::from("DELETE FROM ");
        sql.push_str(self.table().unwrap_or_default());
        self.push_where(&mut sql);
        sql
    }

    /// Append ` WHERE ...` when there is at least one condition.
    fn push_where(&self, sql: &mut String) {
        let mut conditions = self.where_conditions().iter();
        let Some(first) = conditions.next() else {
            return;
        };

        sql.push_str(" WHERE ");
        sql.push_str(&first.to_sql());
        for (joiner, cond) in self.where_join_operators().iter().zip(conditions) {
            sql.push_str(match joiner {
                LogicalOp::And => " AND ",
                LogicalOp::Or => " OR ",
            });
            sql.push_str(&cond.to_sql());
        }
    }
}

impl ToSql for Condition {
    fn to_sql(&self) -> String {
        match &self.value {
            Value::Null => format!("{} {} NULL", self.field, self.op),
            Value::Literal(v) => format!("{} {} {}", self.field, self.op, v),
        }
    }
}
