use crate::error::SqlFluentError;
use crate::executor::{dispatch_dml, dispatch_last_insert_id, dispatch_raw, dispatch_select};
use crate::results::ResultSet;
use crate::types::RowValues;

use super::QueryBuilder;
use super::condition::{LikePosition, Prefix, wrap_needle};
use super::statement::StatementKind;

impl QueryBuilder {
    /// Reset to the freshly-constructed state: empty statement text, empty
    /// parameter groups, no cached result. Runs automatically before every
    /// new top-level construction; calling it twice is the same as calling
    /// it once.
    pub fn flush(&mut self) {
        self.statement.reset();
        self.binder.reset();
        self.data = ResultSet::default();
        self.rows_affected = 0;
        self.cursor_live = false;
    }

    /// Whether the most recent terminal call left an executed statement
    /// behind. This is the success signal the boolean-returning helpers
    /// report; it says nothing about how many rows were touched.
    #[must_use]
    pub fn has_cursor(&self) -> bool {
        self.cursor_live
    }

    /// Rows affected by the most recent DML terminal call.
    #[must_use]
    pub fn affected_rows(&self) -> usize {
        self.rows_affected
    }

    /// Fetch the rows of the current construction.
    ///
    /// With a SELECT chain accumulated, flattens the parameter groups,
    /// executes, and returns the fresh result set. Otherwise returns the
    /// rows cached by the last executed statement (`query`, `find`, `like`,
    /// `query_raw`).
    ///
    /// # Errors
    ///
    /// Prepare, bind, or execution errors from the driver.
    pub async fn get(&mut self) -> Result<ResultSet, SqlFluentError> {
        if self.statement.kind() == StatementKind::Select {
            let sql = self.statement.text().to_string();
            let params = self.binder.flatten();
            self.run_query(&sql, &params).await?;
        }
        Ok(self.data.clone())
    }

    /// Execute caller-supplied statement text with positional parameters.
    ///
    /// Any in-progress construction is flushed first; the produced rows stay
    /// cached for [`QueryBuilder::get`].
    ///
    /// # Errors
    ///
    /// Prepare, bind, or execution errors from the driver.
    pub async fn query(
        &mut self,
        sql: &str,
        params: Vec<RowValues>,
    ) -> Result<&mut Self, SqlFluentError> {
        self.run_query(sql, &params).await?;
        Ok(self)
    }

    /// Execute statement text verbatim, with no preparation and no binding.
    ///
    /// This is an injection-unsafe escape hatch; anything interpolated into
    /// `sql` reaches the backend as-is. Use [`QueryBuilder::query`] wherever
    /// values are involved. On Postgres the simple-query protocol returns
    /// rows (as text); on `SQLite` the raw path is batch execution and
    /// yields none.
    ///
    /// # Errors
    ///
    /// Execution errors from the driver.
    pub async fn query_raw(&mut self, sql: &str) -> Result<&mut Self, SqlFluentError> {
        self.flush();
        let result = dispatch_raw(&mut self.conn, sql, self.timeout).await?;
        self.data = result;
        self.cursor_live = true;
        Ok(self)
    }

    /// `SELECT * FROM <table> WHERE <column> = ?` convenience lookup.
    ///
    /// # Errors
    ///
    /// Prepare, bind, or execution errors from the driver.
    pub async fn find(
        &mut self,
        table: &str,
        column: &str,
        value: impl Into<RowValues>,
    ) -> Result<&mut Self, SqlFluentError> {
        let sql = format!("SELECT * FROM {table} WHERE {column} = ?");
        self.run_query(&sql, &[value.into()]).await?;
        Ok(self)
    }

    /// Fetch every row of a table.
    ///
    /// # Errors
    ///
    /// Prepare, bind, or execution errors from the driver.
    pub async fn all(&mut self, table: &str) -> Result<ResultSet, SqlFluentError> {
        self.select(&["*"]).from(table);
        self.get().await
    }

    /// Insert one row from ordered column/value pairs.
    ///
    /// Returns the weak success signal: true when the statement executed,
    /// regardless of row counts.
    ///
    /// # Errors
    ///
    /// Prepare, bind, or execution errors from the driver.
    pub async fn insert(
        &mut self,
        table: &str,
        columns: &[(&str, RowValues)],
    ) -> Result<bool, SqlFluentError> {
        let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        let markers = vec![" ? "; columns.len()].join(",");
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({markers})",
            names.join(",")
        );
        let values: Vec<RowValues> = columns.iter().map(|(_, value)| value.clone()).collect();
        self.run_dml(&sql, &values).await?;
        Ok(self.cursor_live)
    }

    /// Update rows from ordered column/value pairs, constrained by any
    /// accumulated where-text (`where_clause` and friends called before
    /// this). Set values bind ahead of the where-values.
    ///
    /// Returns the weak success signal; an update matching zero rows still
    /// reports true.
    ///
    /// # Errors
    ///
    /// Prepare, bind, or execution errors from the driver.
    pub async fn update(
        &mut self,
        table: &str,
        columns: &[(&str, RowValues)],
    ) -> Result<bool, SqlFluentError> {
        let assignments: Vec<String> = columns
            .iter()
            .map(|(name, _)| format!("{name} = ?"))
            .collect();
        let set_clause = assignments.join(" , ");
        let mut values: Vec<RowValues> = columns.iter().map(|(_, value)| value.clone()).collect();
        values.extend(self.binder.flatten());
        let sql = format!("UPDATE {table} SET {set_clause}{}", self.statement.text());
        self.run_dml(&sql, &values).await?;
        Ok(self.cursor_live)
    }

    /// Delete the rows selected by the accumulated from/where-text.
    ///
    /// Returns the weak success signal.
    ///
    /// # Errors
    ///
    /// Prepare, bind, or execution errors from the driver.
    pub async fn delete(&mut self) -> Result<bool, SqlFluentError> {
        let sql = format!("DELETE{}", self.statement.text());
        let values = self.binder.flatten();
        self.run_dml(&sql, &values).await?;
        Ok(self.cursor_live)
    }

    /// Append a parenthesized group of LIKE comparisons, then execute the
    /// accumulated statement.
    ///
    /// Unlike its sibling clause calls this one builds AND executes; the
    /// search runs as soon as the patterns are known. One parameter group is
    /// registered per column/needle pair, the needle wrapped per `position`;
    /// pairs are joined by AND or OR per `use_and`; the whole group is
    /// prefixed with ` WHERE `, or with `joiner` when the accumulated text
    /// already carries a WHERE. Rows are cached for [`QueryBuilder::get`].
    ///
    /// # Errors
    ///
    /// Prepare, bind, or execution errors from the driver.
    pub async fn like(
        &mut self,
        search: &[(&str, &str)],
        use_and: bool,
        position: LikePosition,
        joiner: Prefix,
    ) -> Result<&mut Self, SqlFluentError> {
        let has_where = self.statement.contains_where();

        let mut comparisons = Vec::with_capacity(search.len());
        for (column, needle) in search {
            self.binder
                .push_group(vec![RowValues::Text(wrap_needle(needle, position))]);
            comparisons.push(format!("{column} LIKE ?"));
        }

        let operator = if use_and { " AND " } else { " OR " };
        let lead = if has_where {
            format!(" {joiner} ")
        } else {
            " WHERE ".to_string()
        };
        self.statement
            .push(&format!("{lead}({})", comparisons.join(operator)));

        let sql = self.statement.text().to_string();
        let params = self.binder.flatten();
        self.run_query(&sql, &params).await?;
        Ok(self)
    }

    /// `TRUNCATE TABLE <table>`; weak success signal.
    ///
    /// # Errors
    ///
    /// Prepare or execution errors; `SQLite` has no TRUNCATE and rejects
    /// the statement at prepare time.
    pub async fn truncate(&mut self, table: &str) -> Result<bool, SqlFluentError> {
        self.run_query(&format!("TRUNCATE TABLE {table}"), &[]).await?;
        Ok(self.cursor_live)
    }

    /// `DROP TABLE <table>`; weak success signal.
    ///
    /// # Errors
    ///
    /// Prepare or execution errors from the driver.
    pub async fn drop_table(&mut self, table: &str) -> Result<bool, SqlFluentError> {
        self.run_query(&format!("DROP TABLE {table}"), &[]).await?;
        Ok(self.cursor_live)
    }

    /// Identifier assigned by the most recent INSERT on this connection.
    ///
    /// # Errors
    ///
    /// Driver errors, including Postgres reporting that no sequence value
    /// has been generated yet in this session.
    pub async fn last_id(&mut self) -> Result<i64, SqlFluentError> {
        dispatch_last_insert_id(&mut self.conn, self.timeout).await
    }

    async fn run_query(&mut self, sql: &str, params: &[RowValues]) -> Result<(), SqlFluentError> {
        self.flush();
        let result = dispatch_select(&mut self.conn, sql, params, self.timeout).await?;
        self.data = result;
        self.cursor_live = true;
        Ok(())
    }

    async fn run_dml(&mut self, sql: &str, params: &[RowValues]) -> Result<(), SqlFluentError> {
        self.flush();
        self.statement.set_kind(StatementKind::Mutation);
        let affected = dispatch_dml(&mut self.conn, sql, params, self.timeout).await?;
        self.rows_affected = affected;
        self.cursor_live = true;
        Ok(())
    }
}
