//! The fluent statement builder.
//!
//! Clause calls append SQL fragments to an owned text buffer and register
//! their bind values as ordered parameter groups; terminal calls (in
//! `terminal.rs`) flatten the groups and dispatch through the driver
//! adapter. Exactly one builder drives one logical query construction;
//! every method takes `&mut self`, so two constructions can never interleave
//! on the same instance.

mod binder;
mod condition;
mod statement;
mod terminal;

pub use binder::{ParameterBinder, ParameterGroup};
pub use condition::{Condition, LikePosition, Prefix};
pub use statement::{StatementBuilder, StatementKind};

use std::time::Duration;

use condition::flatten;

use crate::pool::DriverConnection;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Fluent SQL statement builder bound to one driver connection.
///
/// ```no_run
/// # use sql_fluent::prelude::*;
/// # async fn demo(connector: &Connector) -> Result<(), SqlFluentError> {
/// let mut db = connector.builder().await?;
/// let adults = db
///     .select(&["*"])
///     .from("users")
///     .where_clause(Condition::flat("age", ">", 18))
///     .get()
///     .await?;
/// # let _ = adults;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct QueryBuilder {
    pub(crate) conn: DriverConnection,
    pub(crate) statement: StatementBuilder,
    pub(crate) binder: ParameterBinder,
    pub(crate) data: ResultSet,
    pub(crate) rows_affected: usize,
    pub(crate) cursor_live: bool,
    pub(crate) timeout: Option<Duration>,
}

impl QueryBuilder {
    /// Bind a fresh builder to a checked-out connection.
    #[must_use]
    pub fn new(conn: DriverConnection) -> Self {
        Self {
            conn,
            statement: StatementBuilder::default(),
            binder: ParameterBinder::default(),
            data: ResultSet::default(),
            rows_affected: 0,
            cursor_live: false,
            timeout: None,
        }
    }

    /// Bound every driver call by `timeout`. Off by default; nothing is
    /// retried on expiry, the timeout surfaces as an execution error.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The accumulated statement state.
    #[must_use]
    pub fn statement(&self) -> &StatementBuilder {
        &self.statement
    }

    /// The accumulated SQL text.
    #[must_use]
    pub fn statement_text(&self) -> &str {
        self.statement.text()
    }

    /// The registered parameter groups.
    #[must_use]
    pub fn parameter_groups(&self) -> &[ParameterGroup] {
        self.binder.groups()
    }

    /// The flattened bind values, in placeholder order.
    #[must_use]
    pub fn parameters(&self) -> Vec<RowValues> {
        self.binder.flatten()
    }

    /// Begin a read query. Resets any previous construction, then appends
    /// `SELECT <columns>`. Must be the first call of a SELECT chain.
    pub fn select(&mut self, columns: &[&str]) -> &mut Self {
        self.flush();
        self.statement.set_kind(StatementKind::Select);
        self.statement.push(&format!("SELECT {}", columns.join(", ")));
        self
    }

    /// Append ` FROM <table> `.
    pub fn from(&mut self, table: &str) -> &mut Self {
        self.statement.push(&format!(" FROM {table} "));
        self
    }

    /// Append a predicate, joining with `AND` where a joiner is needed.
    ///
    /// Flat and list conditions emit the `WHERE` keyword (unless inside a
    /// group) followed by the flattened comparison text, and register one
    /// parameter group. Group conditions open ` AND (`, render their
    /// children joined by the group's own prefix, and close the
    /// parenthesis; use [`QueryBuilder::where_with`] to pick the joiner in
    /// front of the group.
    pub fn where_clause(&mut self, condition: Condition) -> &mut Self {
        self.where_with(condition, Prefix::And)
    }

    /// [`QueryBuilder::where_clause`] with an explicit prefix. The same
    /// prefix joins the triples of a list condition and sits in front of a
    /// group.
    pub fn where_with(&mut self, condition: Condition, prefix: Prefix) -> &mut Self {
        match &condition {
            Condition::Group(..) => {
                self.statement.push(&format!(" {prefix} "));
                let was_in_group = self.statement.set_in_group(true);
                let (fragment, values) = flatten(&condition, prefix);
                self.statement.push(&fragment);
                self.statement.set_in_group(was_in_group);
                if !values.is_empty() {
                    self.binder.push_group(values);
                }
            }
            _ => {
                if !self.statement.in_group() {
                    self.statement.push(" WHERE ");
                }
                let (fragment, values) = flatten(&condition, prefix);
                self.statement.push(&fragment);
                if !values.is_empty() {
                    self.binder.push_group(values);
                }
            }
        }
        self
    }

    /// Append ` AND ` followed by the flattened condition. The joiner is
    /// emitted unconditionally; ordering relative to an opening
    /// `where_clause` is the caller's responsibility.
    pub fn and_where(&mut self, condition: Condition) -> &mut Self {
        self.joined_where(condition, Prefix::And)
    }

    /// Append ` OR ` followed by the flattened condition. Same ordering
    /// contract as [`QueryBuilder::and_where`].
    pub fn or_where(&mut self, condition: Condition) -> &mut Self {
        self.joined_where(condition, Prefix::Or)
    }

    fn joined_where(&mut self, condition: Condition, prefix: Prefix) -> &mut Self {
        self.statement.push(&format!(" {prefix} "));
        let (fragment, values) = flatten(&condition, prefix);
        self.statement.push(&fragment);
        if !values.is_empty() {
            self.binder.push_group(values);
        }
        self
    }

    /// Append ` WHERE <column> IN ( ?,..,? )` with one marker and one bound
    /// value per element.
    pub fn where_in<I, V>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        self.in_list(column, values, false)
    }

    /// Append ` WHERE <column> NOT IN ( ?,..,? )`.
    pub fn where_not_in<I, V>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        self.in_list(column, values, true)
    }

    fn in_list<I, V>(&mut self, column: &str, values: I, negated: bool) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        let values: Vec<RowValues> = values.into_iter().map(Into::into).collect();
        let markers = vec!["?"; values.len()].join(",");
        let not = if negated { "NOT " } else { "" };
        self.statement
            .push(&format!(" WHERE {column} {not}IN ( {markers} )"));
        self.binder.push_group(values);
        self
    }

    /// Append ` WHERE <column> IN ( <list> )` with caller-supplied literal
    /// list text. Nothing is bound; the caller owns the safety of `list`.
    pub fn where_in_raw(&mut self, column: &str, list: &str) -> &mut Self {
        self.statement.push(&format!(" WHERE {column} IN ( {list} )"));
        self
    }

    /// Append ` WHERE <column> NOT IN ( <list> )` with caller-supplied
    /// literal list text. Same contract as [`QueryBuilder::where_in_raw`].
    pub fn where_not_in_raw(&mut self, column: &str, list: &str) -> &mut Self {
        self.statement
            .push(&format!(" WHERE {column} NOT IN ( {list} )"));
        self
    }

    /// Append ` WHERE <column> BETWEEN <bounds..>` with the bounds inlined
    /// as literal space-joined text.
    ///
    /// Unlike the other predicates, nothing here is parameterized: the
    /// bounds land in the statement verbatim, so they must never come from
    /// untrusted input. Prefer two [`QueryBuilder::where_clause`]
    /// comparisons for anything user-supplied.
    pub fn where_between(&mut self, column: &str, bounds: &[&str]) -> &mut Self {
        self.statement
            .push(&format!(" WHERE {column} BETWEEN {}", bounds.join(" ")));
        self
    }

    /// Append ` WHERE <column> NOT BETWEEN <bounds..>`; same literal-text
    /// contract as [`QueryBuilder::where_between`].
    pub fn where_not_between(&mut self, column: &str, bounds: &[&str]) -> &mut Self {
        self.statement
            .push(&format!(" WHERE {column} NOT BETWEEN {}", bounds.join(" ")));
        self
    }

    /// Append a ` JOIN <table> ON .. ` clause. Join predicates are
    /// structural text; nothing is bound.
    pub fn join(&mut self, table: &str, on: &[(&str, &str)], separator: Prefix) -> &mut Self {
        self.join_clause("", table, on, separator)
    }

    /// Append an ` INNER JOIN .. ` clause.
    pub fn inner_join(&mut self, table: &str, on: &[(&str, &str)], separator: Prefix) -> &mut Self {
        self.join_clause("INNER", table, on, separator)
    }

    /// Append a ` LEFT JOIN .. ` clause.
    pub fn left_join(&mut self, table: &str, on: &[(&str, &str)], separator: Prefix) -> &mut Self {
        self.join_clause("LEFT", table, on, separator)
    }

    /// Append a ` RIGHT JOIN .. ` clause.
    pub fn right_join(&mut self, table: &str, on: &[(&str, &str)], separator: Prefix) -> &mut Self {
        self.join_clause("RIGHT", table, on, separator)
    }

    /// Append a ` FULL OUTER JOIN .. ` clause.
    pub fn full_outer_join(
        &mut self,
        table: &str,
        on: &[(&str, &str)],
        separator: Prefix,
    ) -> &mut Self {
        self.join_clause("FULL OUTER", table, on, separator)
    }

    fn join_clause(
        &mut self,
        join_type: &str,
        table: &str,
        on: &[(&str, &str)],
        separator: Prefix,
    ) -> &mut Self {
        let conditions: Vec<String> = on
            .iter()
            .map(|(left, right)| format!("{left} = {right}"))
            .collect();
        let on_text = conditions.join(&format!(" {separator} "));
        if join_type.is_empty() {
            self.statement.push(&format!(" JOIN {table} ON {on_text} "));
        } else {
            self.statement
                .push(&format!(" {join_type} JOIN {table} ON {on_text} "));
        }
        self
    }

    /// Append ` GROUP BY <column>`.
    pub fn group_by(&mut self, column: &str) -> &mut Self {
        self.statement.push(&format!(" GROUP BY {column}"));
        self
    }

    /// Append ` HAVING <expr>`. The expression is structural text.
    pub fn having(&mut self, expr: &str) -> &mut Self {
        self.statement.push(&format!(" HAVING {expr}"));
        self
    }

    /// Append ` ORDER BY <column> <direction>`.
    pub fn order_by(&mut self, column: &str, direction: &str) -> &mut Self {
        self.statement
            .push(&format!(" ORDER BY {column} {direction}"));
        self
    }

    /// Append a LIMIT clause: ` LIMIT <start> ` when `end` is zero,
    /// ` LIMIT <start> , <end>` otherwise.
    pub fn limit_by(&mut self, start: u64, end: u64) -> &mut Self {
        if end == 0 {
            self.statement.push(&format!(" LIMIT {start} "));
        } else {
            self.statement.push(&format!(" LIMIT {start} , {end}"));
        }
        self
    }
}
