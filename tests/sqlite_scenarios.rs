#![cfg(feature = "sqlite")]
use sql_fluent::prelude::*;
use tokio::runtime::Runtime;

const USERS_DDL: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        age INT,
        status TEXT
    );
";

async fn users_builder() -> QueryBuilder {
    let connector = Connector::sqlite(":memory:").await.unwrap();
    let mut db = connector.builder().await.unwrap();
    db.query_raw(USERS_DDL).await.unwrap();
    db
}

#[test]
fn filtered_select_returns_matching_rows_only() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = users_builder().await;
        db.insert("users", &[("name", "a".into()), ("age", RowValues::Int(20))])
            .await?;
        db.insert("users", &[("name", "b".into()), ("age", RowValues::Int(15))])
            .await?;

        let rows = db
            .select(&["*"])
            .from("users")
            .where_clause(Condition::flat("age", ">", 18))
            .get()
            .await?;

        assert_eq!(rows.results.len(), 1);
        assert_eq!(*rows.results[0].get("id").unwrap().as_int().unwrap(), 1);
        assert_eq!(*rows.results[0].get("age").unwrap().as_int().unwrap(), 20);

        // a second get() without a new chain replays the cached result
        let again = db.get().await?;
        assert_eq!(again.results.len(), 1);

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn insert_then_last_id_then_find() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = users_builder().await;

        let ok = db
            .insert("users", &[("name", "a".into()), ("age", RowValues::Int(30))])
            .await?;
        assert!(ok);

        let id = db.last_id().await?;
        assert_eq!(id, 1);

        let rows = db.find("users", "name", "a").await?.get().await?;
        assert_eq!(rows.results.len(), 1);
        assert_eq!(*rows.results[0].get("age").unwrap().as_int().unwrap(), 30);
        assert_eq!(*rows.results[0].get("id").unwrap().as_int().unwrap(), id);

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn zero_row_update_still_reports_success() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = users_builder().await;
        db.insert("users", &[("name", "a".into()), ("age", RowValues::Int(31))])
            .await?;

        // matches one row
        db.flush();
        db.where_clause(Condition::flat("id", "=", 1));
        let ok = db.update("users", &[("age", RowValues::Int(31))]).await?;
        assert!(ok);
        assert_eq!(db.affected_rows(), 1);

        // matches no rows: still success, zero affected
        db.where_clause(Condition::flat("id", "=", 999));
        let ok = db.update("users", &[("age", RowValues::Int(50))]).await?;
        assert!(ok);
        assert_eq!(db.affected_rows(), 0);

        let rows = db.find("users", "id", 1).await?.get().await?;
        assert_eq!(*rows.results[0].get("age").unwrap().as_int().unwrap(), 31);

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn where_in_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = users_builder().await;
        for (name, age) in [("a", 10), ("b", 20), ("c", 30)] {
            db.insert("users", &[("name", name.into()), ("age", RowValues::Int(age))])
                .await?;
        }

        let rows = db
            .select(&["name"])
            .from("users")
            .where_in("id", [1, 3])
            .get()
            .await?;

        assert_eq!(rows.results.len(), 2);
        assert_eq!(rows.results[0].get("name").unwrap().as_text().unwrap(), "a");
        assert_eq!(rows.results[1].get("name").unwrap().as_text().unwrap(), "c");

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn like_wildcards_follow_the_match_position() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = users_builder().await;
        for name in ["bob", "bobby", "jimbob", "alice"] {
            db.insert("users", &[("name", name.into())]).await?;
        }

        // %bob% matches anywhere
        db.select(&["name"]).from("users");
        let rows = db
            .like(&[("name", "bob")], true, LikePosition::Any, Prefix::And)
            .await?
            .get()
            .await?;
        assert_eq!(rows.results.len(), 3);

        // %bob anchors the needle to the end
        db.select(&["name"]).from("users");
        let rows = db
            .like(&[("name", "bob")], true, LikePosition::Prefix, Prefix::And)
            .await?
            .get()
            .await?;
        assert_eq!(rows.results.len(), 2);
        assert_eq!(rows.results[0].get("name").unwrap().as_text().unwrap(), "bob");
        assert_eq!(
            rows.results[1].get("name").unwrap().as_text().unwrap(),
            "jimbob"
        );

        // bob% anchors the needle to the start
        db.select(&["name"]).from("users");
        let rows = db
            .like(&[("name", "bob")], true, LikePosition::Suffix, Prefix::And)
            .await?
            .get()
            .await?;
        assert_eq!(rows.results.len(), 2);
        assert_eq!(
            rows.results[1].get("name").unwrap().as_text().unwrap(),
            "bobby"
        );

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn like_joins_onto_an_existing_where() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = users_builder().await;
        for (name, status) in [("bob", "active"), ("bobby", "banned"), ("rob", "active")] {
            db.insert(
                "users",
                &[("name", name.into()), ("status", status.into())],
            )
            .await?;
        }

        db.select(&["name"])
            .from("users")
            .where_clause(Condition::flat("status", "=", "active"));
        let rows = db
            .like(&[("name", "bob")], true, LikePosition::Any, Prefix::And)
            .await?
            .get()
            .await?;

        assert_eq!(rows.results.len(), 1);
        assert_eq!(rows.results[0].get("name").unwrap().as_text().unwrap(), "bob");

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn delete_removes_selected_rows() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = users_builder().await;
        for name in ["a", "b"] {
            db.insert("users", &[("name", name.into())]).await?;
        }

        db.flush();
        db.from("users").where_clause(Condition::flat("name", "=", "a"));
        let ok = db.delete().await?;
        assert!(ok);
        assert_eq!(db.affected_rows(), 1);

        let rows = db.all("users").await?;
        assert_eq!(rows.results.len(), 1);
        assert_eq!(rows.results[0].get("name").unwrap().as_text().unwrap(), "b");

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn malformed_sql_surfaces_a_prepare_error() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = users_builder().await;
        let err = db.query("SELEC 1", vec![]).await.err().unwrap();
        assert!(matches!(err, SqlFluentError::PrepareError(_)), "{err:?}");
    });
}

#[test]
fn parameter_count_mismatch_surfaces_a_bind_error() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = users_builder().await;
        let err = db
            .query("SELECT * FROM users WHERE id = ?", vec![])
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SqlFluentError::BindError(_)), "{err:?}");

        let err = db
            .query(
                "SELECT * FROM users WHERE id = ?",
                vec![RowValues::Int(1), RowValues::Int(2)],
            )
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SqlFluentError::BindError(_)), "{err:?}");
    });
}

#[test]
fn truncate_is_rejected_by_sqlite_and_drop_succeeds() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut db = users_builder().await;

        // SQLite has no TRUNCATE; the prepare failure surfaces untouched
        let err = db.truncate("users").await.err().unwrap();
        assert!(matches!(err, SqlFluentError::PrepareError(_)), "{err:?}");

        let ok = db.drop_table("users").await.unwrap();
        assert!(ok);
        assert!(db.query("SELECT * FROM users", vec![]).await.is_err());
    });
}

#[test]
fn query_raw_runs_batches_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = users_builder().await;
        db.query_raw(
            "INSERT INTO users (name, age) VALUES ('x', 1);
             INSERT INTO users (name, age) VALUES ('y', 2);",
        )
        .await?;

        let rows = db.all("users").await?;
        assert_eq!(rows.results.len(), 2);

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn unknown_driver_is_rejected_at_config_time() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let mut config = DbConfig::sqlite(":memory:");
        config.driver = "mysql".to_string();
        let err = Connector::new(&config).await.err().unwrap();
        assert!(matches!(err, SqlFluentError::UnsupportedDriver(_)), "{err:?}");
    });
}

#[test]
fn file_backed_database_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("scenarios.db");
    let db_path = db_path.to_str().unwrap().to_string();

    rt.block_on(async {
        let connector = Connector::sqlite(&db_path).await?;
        assert_eq!(connector.driver(), DatabaseType::Sqlite);

        let mut db = connector.builder().await?;
        db.query_raw(USERS_DDL).await?;
        db.insert("users", &[("name", "a".into()), ("age", RowValues::Int(42))])
            .await?;

        // a second builder from the same connector sees the committed row
        let mut other = connector.builder().await?;
        let rows = other
            .select(&["*"])
            .from("users")
            .where_clause(Condition::flat("name", "=", "a"))
            .get()
            .await?;
        assert_eq!(rows.results.len(), 1);
        assert_eq!(*rows.results[0].get("age").unwrap().as_int().unwrap(), 42);

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}
