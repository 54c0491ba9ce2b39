#![cfg(feature = "sqlite")]
use sql_fluent::prelude::*;
use sql_fluent::{ParameterBinder, StatementBuilder};
use tokio::runtime::Runtime;

async fn memory_builder() -> QueryBuilder {
    let connector = Connector::sqlite(":memory:").await.unwrap();
    connector.builder().await.unwrap()
}

#[test]
fn flat_where_text_and_params() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = memory_builder().await;
        db.select(&["*"])
            .from("users")
            .where_clause(Condition::flat("age", ">", 18));

        assert!(db.statement_text().starts_with("SELECT *"));
        assert!(db.statement_text().contains(" FROM users "));
        assert!(db.statement_text().contains("WHERE age > ?"));
        assert_eq!(db.parameters(), vec![RowValues::Int(18)]);
    });
}

#[test]
fn list_where_joins_triples_with_prefix() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = memory_builder().await;
        db.select(&["*"]).from("users").where_clause(Condition::all([
            ("age", ">", RowValues::Int(18)),
            ("status", "=", RowValues::Text("active".into())),
        ]));

        assert!(db.statement_text().contains("age > ? AND status = ?"));
        assert_eq!(
            db.parameters(),
            vec![RowValues::Int(18), RowValues::Text("active".into())]
        );

        let mut db = memory_builder().await;
        db.select(&["*"]).from("users").where_with(
            Condition::all([("age", ">", 18), ("age", "<", 65)]),
            Prefix::Or,
        );
        assert!(db.statement_text().contains("age > ? OR age < ?"));
    });
}

#[test]
fn and_or_where_append_their_joiner_unconditionally() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = memory_builder().await;
        db.select(&["*"])
            .from("t")
            .where_clause(Condition::flat("a", "=", 1))
            .and_where(Condition::flat("b", "=", 2))
            .or_where(Condition::flat("c", "=", 3));

        let text = db.statement_text();
        assert!(text.contains("WHERE a = ? AND b = ? OR c = ?"));
        assert_eq!(
            db.parameters(),
            vec![RowValues::Int(1), RowValues::Int(2), RowValues::Int(3)]
        );
        // three clause calls, three groups
        assert_eq!(db.parameter_groups().len(), 3);
    });
}

#[test]
fn grouped_predicate_keeps_where_outside_the_group() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = memory_builder().await;
        db.select(&["*"])
            .from("users")
            .where_clause(Condition::flat("age", ">", 18))
            .where_with(
                Condition::group(
                    vec![
                        Condition::flat("status", "=", "active"),
                        Condition::flat("status", "=", "pending"),
                    ],
                    Prefix::Or,
                ),
                Prefix::And,
            );

        let text = db.statement_text();
        assert_eq!(text.matches("WHERE").count(), 1);
        assert!(text.contains(" AND (status = ? OR status = ?)"));
        assert_eq!(
            db.parameters(),
            vec![
                RowValues::Int(18),
                RowValues::Text("active".into()),
                RowValues::Text("pending".into()),
            ]
        );
    });
}

#[test]
fn nested_groups_enter_and_exit_cleanly() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = memory_builder().await;
        db.select(&["*"])
            .from("t")
            .where_clause(Condition::flat("a", "=", 1))
            .where_with(
                Condition::group(
                    vec![
                        Condition::flat("b", "=", 2),
                        Condition::group(
                            vec![Condition::flat("c", "=", 3), Condition::flat("d", "=", 4)],
                            Prefix::And,
                        ),
                    ],
                    Prefix::Or,
                ),
                Prefix::And,
            );

        let text = db.statement_text();
        assert_eq!(text.matches("WHERE").count(), 1);
        assert!(text.contains(" AND (b = ? OR (c = ? AND d = ?))"));
        assert_eq!(text.matches('(').count(), text.matches(')').count());
        assert!(!db.statement().in_group());
        // placeholder i lines up with parameter i across the whole chain
        assert_eq!(text.matches('?').count(), db.parameters().len());
        assert_eq!(
            db.parameters(),
            vec![
                RowValues::Int(1),
                RowValues::Int(2),
                RowValues::Int(3),
                RowValues::Int(4),
            ]
        );
    });
}

#[test]
fn where_in_registers_one_marker_per_value() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = memory_builder().await;
        db.select(&["*"]).from("users").where_in("id", [1, 2, 3]);

        let text = db.statement_text();
        assert!(text.contains("WHERE id IN ( ?,?,? )"));
        assert_eq!(text.matches('?').count(), 3);
        assert_eq!(db.parameter_groups().len(), 1);
        assert_eq!(
            db.parameters(),
            vec![RowValues::Int(1), RowValues::Int(2), RowValues::Int(3)]
        );

        let mut db = memory_builder().await;
        db.select(&["*"]).from("users").where_not_in("id", [7]);
        assert!(db.statement_text().contains("WHERE id NOT IN ( ? )"));
    });
}

#[test]
fn raw_in_list_binds_nothing() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = memory_builder().await;
        db.select(&["*"])
            .from("users")
            .where_in_raw("id", "SELECT id FROM banned");

        assert!(
            db.statement_text()
                .contains("WHERE id IN ( SELECT id FROM banned )")
        );
        assert!(db.parameters().is_empty());
    });
}

#[test]
fn between_bounds_are_inlined_literal_text() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = memory_builder().await;
        db.select(&["*"])
            .from("users")
            .where_between("age", &["18", "30"]);

        assert!(db.statement_text().contains("WHERE age BETWEEN 18 30"));
        assert!(db.parameters().is_empty());

        let mut db = memory_builder().await;
        db.select(&["*"])
            .from("users")
            .where_not_between("age", &["18", "30"]);
        assert!(db.statement_text().contains("WHERE age NOT BETWEEN 18 30"));
    });
}

#[test]
fn join_clauses_are_structural() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = memory_builder().await;
        db.select(&["*"])
            .from("users")
            .inner_join("roles", &[("users.role_id", "roles.id")], Prefix::And)
            .left_join(
                "teams",
                &[("users.team_id", "teams.id"), ("teams.active", "1")],
                Prefix::And,
            );

        let text = db.statement_text();
        assert!(text.contains(" INNER JOIN roles ON users.role_id = roles.id "));
        assert!(
            text.contains(" LEFT JOIN teams ON users.team_id = teams.id AND teams.active = 1 ")
        );
        assert!(db.parameters().is_empty());

        let mut db = memory_builder().await;
        db.select(&["*"])
            .from("a")
            .join("b", &[("a.id", "b.a_id")], Prefix::Or);
        assert!(db.statement_text().contains(" JOIN b ON a.id = b.a_id "));
    });
}

#[test]
fn trailing_clauses_append_literal_text() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = memory_builder().await;
        db.select(&["status", "count(*) as cnt"])
            .from("users")
            .group_by("status")
            .having("count(*) > 1")
            .order_by("status", "DESC")
            .limit_by(0, 10);

        let text = db.statement_text();
        assert!(text.contains(" GROUP BY status"));
        assert!(text.contains(" HAVING count(*) > 1"));
        assert!(text.contains(" ORDER BY status DESC"));
        assert!(text.contains(" LIMIT 0 , 10"));

        let mut db = memory_builder().await;
        db.select(&["*"]).from("users").limit_by(5, 0);
        assert!(db.statement_text().contains(" LIMIT 5 "));
    });
}

#[test]
fn flush_twice_equals_fresh_builder() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = memory_builder().await;
        db.select(&["*"])
            .from("users")
            .where_clause(Condition::flat("age", ">", 18))
            .where_in("id", [1, 2]);

        db.flush();
        db.flush();

        assert_eq!(db.statement(), &StatementBuilder::default());
        assert_eq!(db.parameter_groups(), ParameterBinder::default().groups());
        assert!(db.statement_text().is_empty());
        assert!(!db.statement().in_group());
        assert!(db.parameters().is_empty());
        assert!(!db.has_cursor());
        assert_eq!(db.affected_rows(), 0);
    });
}

#[test]
fn select_resets_the_previous_construction() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = memory_builder().await;
        db.select(&["*"])
            .from("users")
            .where_clause(Condition::flat("age", ">", 18));

        db.select(&["id"]).from("orders");

        assert!(db.statement_text().starts_with("SELECT id"));
        assert!(!db.statement_text().contains("users"));
        // no parameter groups bleed over from the abandoned construction
        assert!(db.parameters().is_empty());
    });
}
