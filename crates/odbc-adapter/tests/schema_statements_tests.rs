//! Integration tests for schema statements over a scripted connection.
//!
//! These tests drive the public API end to end: SQL is captured by the
//! scripted connection and catalog rows are supplied up front.

use odbc_adapter::{
    AdapterError, AdapterSettings, ColumnOptions, CreateTableOptions, DatabaseMetadata,
    DialectImpl, IdentifierCase, IndexNameSource, Quoting, SchemaStatements, ScriptedConnection,
    SequenceDropPolicy, SqlValue, StorageMode,
};

fn metadata() -> DatabaseMetadata {
    DatabaseMetadata {
        dbms_name: "HDB".to_string(),
        database_name: "  HXE  ".to_string(),
        max_identifier_len: None,
        identifier_case: IdentifierCase::Upper,
    }
}

fn hana_with(conn: ScriptedConnection, settings: AdapterSettings) -> SchemaStatements<ScriptedConnection> {
    SchemaStatements::new(conn, DialectImpl::from_db_type("hana").unwrap(), settings).unwrap()
}

fn hana(conn: ScriptedConnection) -> SchemaStatements<ScriptedConnection> {
    hana_with(conn, AdapterSettings::default())
}

fn scoped_settings() -> AdapterSettings {
    AdapterSettings {
        database: Some("APP".to_string()),
        ..Default::default()
    }
}

/// Row shaped like `SELECT COLUMN_NAME, DEFAULT_VALUE, DATA_TYPE_NAME,
/// IS_NULLABLE, CS_DATA_TYPE_NAME, LENGTH, SCALE FROM SYS.COLUMNS`.
fn sys_column(name: &str, default: Option<&str>, type_name: &str, nullable: &str, native: &str, length: i64, scale: Option<i64>) -> Vec<SqlValue> {
    vec![
        SqlValue::from(name),
        SqlValue::from(default),
        SqlValue::from(type_name),
        SqlValue::from(nullable),
        SqlValue::from(native),
        SqlValue::Int(length),
        SqlValue::from(scale),
    ]
}

fn table_row(schema: &str, name: &str, kind: &str) -> Vec<SqlValue> {
    vec![
        SqlValue::Null,
        SqlValue::from(schema),
        SqlValue::from(name),
        SqlValue::from(kind),
    ]
}

// =============================================================================
// Quoting
// =============================================================================

#[test]
fn test_quoting_strings_and_identifiers() {
    let q = Quoting::default();
    assert_eq!(q.quote_string("O'Brien"), "O''Brien");
    assert_eq!(q.quote_column_name("my\"col"), "\"my\"\"col\"");
    assert_eq!(q.quote(&SqlValue::Bool(false)), "0");
}

// =============================================================================
// Session scoping
// =============================================================================

#[test]
fn test_hana_scopes_session_to_database() {
    let adapter = hana_with(ScriptedConnection::new(metadata()), scoped_settings());

    assert_eq!(adapter.connection().statements(), vec!["SET SCHEMA \"APP\""]);
    assert_eq!(adapter.current_schema(), "APP");
    assert_eq!(adapter.current_database(), "HXE");
    assert!(!adapter.prepared_statements());
    assert!(adapter.prefetch_primary_key());
}

#[test]
fn test_generic_does_not_scope_session() {
    let adapter = SchemaStatements::new(
        ScriptedConnection::new(metadata()),
        DialectImpl::from_db_type("generic").unwrap(),
        scoped_settings(),
    )
    .unwrap();
    assert!(adapter.connection().statements().is_empty());
}

// =============================================================================
// Introspection
// =============================================================================

#[test]
fn test_tables_filters_and_formats_case() {
    let conn = ScriptedConnection::new(metadata()).with_tables(vec![
        table_row("APP", "USERS", "TABLE"),
        table_row("APP", "MixedCase", "TABLE"),
        table_row("SYS", "TABLES", "TABLE"),
        table_row("APP", "USER_VIEW", "VIEW"),
    ]);
    let adapter = hana(conn);

    assert_eq!(adapter.tables().unwrap(), vec!["users", "MixedCase"]);
    assert!(adapter.table_exists("USERS").unwrap());
    assert!(!adapter.table_exists("orders").unwrap());
    assert_eq!(adapter.connection().open_cursors(), 0);
}

#[test]
fn test_hana_columns_from_sys_columns() {
    let conn = ScriptedConnection::new(metadata()).respond(
        "FROM SYS.COLUMNS",
        vec![
            sys_column("ID", None, "INTEGER", "FALSE", "INT", 10, Some(0)),
            sys_column("PRICE", Some("0"), "DECIMAL", "TRUE", "FIXED", 12, None),
            sys_column("ACTIVE", None, "BOOLEAN", "TRUE", "BOOLEAN", 1, None),
        ],
    );
    let adapter = hana_with(conn, scoped_settings());
    let columns = adapter.columns("ITEMS").unwrap();

    let query = &adapter.connection().statements()[1];
    assert!(query.contains("WHERE SCHEMA_NAME='APP' AND TABLE_NAME='ITEMS'"));

    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].name, "id");
    assert!(!columns[0].null);
    assert_eq!(columns[0].sql_type_metadata.precision, None);

    let price = &columns[1];
    assert_eq!(price.default.as_deref(), Some("0"));
    assert_eq!(price.sql_type_metadata.precision, Some(12));
    assert_eq!(price.sql_type_metadata.scale, Some(0));

    assert_eq!(columns[2].sql_type(), "boolean");
    assert!(columns.iter().all(|c| c.table_name == "ITEMS"));
}

#[test]
fn test_indexes_grouped_from_statistics() {
    let stat = |non_unique: i64, name: &str, kind: i64, ordinal: i64, column: &str| {
        vec![
            SqlValue::Null,
            SqlValue::from("APP"),
            SqlValue::from("T"),
            SqlValue::Int(non_unique),
            SqlValue::Null,
            SqlValue::from(name),
            SqlValue::Int(kind),
            SqlValue::Int(ordinal),
            SqlValue::from(column),
        ]
    };
    let conn = ScriptedConnection::new(metadata()).respond(
        "SYS.INDEX_COLUMNS",
        vec![
            stat(0, "IDX1", 3, 1, "A"),
            stat(0, "IDX1", 3, 2, "B"),
            stat(1, "IDX2", 3, 1, "C"),
        ],
    );
    let adapter = hana_with(conn, scoped_settings());
    let indexes = adapter.indexes("t").unwrap();

    // table name goes to the catalog in native case
    assert!(adapter.connection().statements()[1].contains("C.TABLE_NAME='T'"));
    assert_eq!(indexes.len(), 2);
    assert_eq!(indexes[0].name, "idx1");
    assert_eq!(indexes[0].columns, vec!["a", "b"]);
    assert!(indexes[0].unique);
    assert_eq!(indexes[1].columns, vec!["c"]);
    assert!(!indexes[1].unique);
}

#[test]
fn test_foreign_keys_positional_mapping() {
    let row = vec![
        SqlValue::Null,
        SqlValue::from("APP"),
        SqlValue::from("USERS"),
        SqlValue::from("ID"),
        SqlValue::Null,
        SqlValue::from("APP"),
        SqlValue::from("ORDERS"),
        SqlValue::from("USER_ID"),
        SqlValue::Int(1),
        SqlValue::Int(3),
        SqlValue::Int(0),
        SqlValue::from("FK_ORDERS_USERS"),
    ];
    let conn = ScriptedConnection::new(metadata()).with_foreign_keys("ORDERS", vec![row]);
    let adapter = hana(conn);
    let fks = adapter.foreign_keys("orders").unwrap();

    assert_eq!(fks.len(), 1);
    let fk = &fks[0];
    assert_eq!(fk.parent_table, "USERS");
    assert_eq!(fk.child_table, "ORDERS");
    assert_eq!(fk.parent_column, "ID");
    assert_eq!(fk.child_column, "USER_ID");
    assert_eq!(fk.name.as_deref(), Some("FK_ORDERS_USERS"));
    assert_eq!(fk.on_update, Some(odbc_adapter::ReferentialAction::NoAction));
    assert_eq!(fk.on_delete, Some(odbc_adapter::ReferentialAction::Cascade));
}

#[test]
fn test_primary_key_and_schemas() {
    let conn = ScriptedConnection::new(metadata())
        .respond("IS_PRIMARY_KEY", vec![vec![SqlValue::from("USER_ID")]])
        .respond("FROM schemas", vec![vec![SqlValue::from("APP")], vec![SqlValue::from("SYS")]]);
    let adapter = hana_with(conn, scoped_settings());

    assert_eq!(adapter.primary_key("users").unwrap(), "USER_ID");
    assert_eq!(adapter.schemas().unwrap(), vec!["APP", "SYS"]);
}

#[test]
fn test_listed_table_names_resolve_in_catalog_queries() {
    let conn = ScriptedConnection::new(metadata())
        .with_tables(vec![table_row("APP", "USERS", "TABLE")])
        .respond(
            "TABLE_NAME='USERS' ORDER BY POSITION",
            vec![sys_column("EMAIL", None, "NVARCHAR", "FALSE", "STRING", 100, None)],
        )
        .respond(
            "TABLE_NAME='USERS' AND IS_PRIMARY_KEY",
            vec![vec![SqlValue::from("USER_ID")]],
        );
    let adapter = hana_with(conn, scoped_settings());

    let tables = adapter.tables().unwrap();
    assert_eq!(tables, vec!["users"]);

    let columns = adapter.columns(&tables[0]).unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].name, "email");
    assert_eq!(adapter.primary_key(&tables[0]).unwrap(), "USER_ID");

    let statements = adapter.connection().statements();
    assert!(statements.iter().all(|s| !s.contains("TABLE_NAME='users'")));
}

#[test]
fn test_primary_key_falls_back_to_id() {
    let adapter = hana(ScriptedConnection::new(metadata()));
    assert_eq!(adapter.primary_key("users").unwrap(), "id");
}

// =============================================================================
// Handle release
// =============================================================================

#[test]
fn test_catalog_handle_released_when_fetch_fails() {
    let conn = ScriptedConnection::new(metadata())
        .with_tables(vec![table_row("APP", "USERS", "TABLE")])
        .fail_fetch("SQLTables", "connection reset");
    let adapter = hana(conn);

    let err = adapter.tables().unwrap_err();
    assert!(err.to_string().contains("connection reset"));
    assert_eq!(adapter.connection().open_cursors(), 0);
    assert_eq!(adapter.connection().released_cursors(), 1);
}

#[test]
fn test_foreign_key_handle_released_when_fetch_fails() {
    let conn = ScriptedConnection::new(metadata()).fail_fetch("SQLForeignKeys", "timeout");
    let adapter = hana(conn);

    assert!(adapter.foreign_keys("orders").is_err());
    assert_eq!(adapter.connection().open_cursors(), 0);
}

// =============================================================================
// Table DDL
// =============================================================================

#[test]
fn test_storage_mode_keyword_for_every_mode() {
    let cases = [
        (StorageMode::Row, "CREATE ROW TABLE"),
        (StorageMode::Column, "CREATE COLUMN TABLE"),
        (StorageMode::History, "CREATE HISTORY COLUMN TABLE"),
        (StorageMode::GlobalTemporary, "CREATE GLOBAL TEMPORARY TABLE"),
        (StorageMode::LocalTemporary, "CREATE LOCAL TEMPORARY TABLE"),
    ];

    for (storage, prefix) in cases {
        let adapter = hana(ScriptedConnection::new(metadata()));
        let options = CreateTableOptions {
            storage,
            ..Default::default()
        };
        adapter.create_table("t", &options, |_| {}).unwrap();

        let sql = adapter.connection().statements().pop().unwrap();
        assert!(sql.starts_with(prefix), "{} should start with {}", sql, prefix);
    }

    // no storage option at all
    let adapter = hana(ScriptedConnection::new(metadata()));
    adapter
        .create_table("t", &CreateTableOptions::default(), |_| {})
        .unwrap();
    let sql = adapter.connection().statements().pop().unwrap();
    assert_eq!(sql, "CREATE COLUMN TABLE \"t\" (\"id\" INT NOT NULL PRIMARY KEY)");
}

#[test]
fn test_create_table_force_drops_existing() {
    let conn = ScriptedConnection::new(metadata()).with_tables(vec![table_row("APP", "USERS", "TABLE")]);
    let adapter = hana(conn);
    let options = CreateTableOptions {
        force: true,
        primary_key: Some("user_id".to_string()),
        ..Default::default()
    };
    adapter.create_table("users", &options, |_| {}).unwrap();

    assert_eq!(
        adapter.connection().statements(),
        vec![
            "DROP TABLE \"users\"",
            "DROP SEQUENCE \"users_seq\"",
            "CREATE SEQUENCE \"users_seq\" INCREMENT BY 1 START WITH 1 NO CYCLE",
            "CREATE COLUMN TABLE \"users\" (\"user_id\" INT NOT NULL PRIMARY KEY)",
        ]
    );
}

#[test]
fn test_drop_table_propagates_sequence_failure_by_default() {
    let conn = ScriptedConnection::new(metadata()).fail_on("DROP SEQUENCE", "sequence does not exist");
    let adapter = hana(conn);

    let err = adapter.drop_table("users").unwrap_err();
    assert!(matches!(err, AdapterError::Driver { .. }));
    assert_eq!(adapter.connection().statements()[0], "DROP TABLE \"users\"");
}

#[test]
fn test_drop_table_ignores_sequence_failure_when_configured() {
    let conn = ScriptedConnection::new(metadata()).fail_on("DROP SEQUENCE", "sequence does not exist");
    let settings = AdapterSettings {
        sequence_drop_policy: SequenceDropPolicy::Ignore,
        ..Default::default()
    };
    let adapter = hana_with(conn, settings);

    adapter.drop_table("users").unwrap();
    assert_eq!(adapter.connection().statements().len(), 2);
}

#[test]
fn test_rename_table_moves_sequence() {
    let conn = ScriptedConnection::new(metadata()).respond("NEXTVAL", vec![vec![SqlValue::from("8")]]);
    let adapter = hana(conn);
    adapter.rename_table("users", "people").unwrap();

    assert_eq!(
        adapter.connection().statements(),
        vec![
            "RENAME TABLE \"users\" TO \"people\"",
            "SELECT \"users_seq\".NEXTVAL FROM DUMMY",
            "CREATE SEQUENCE \"people_seq\" INCREMENT BY 1 START WITH 8 NO CYCLE",
            "DROP SEQUENCE \"users_seq\"",
        ]
    );
}

#[test]
fn test_sequence_rename_is_not_atomic() {
    let conn = ScriptedConnection::new(metadata())
        .respond("NEXTVAL", vec![vec![SqlValue::Int(3)]])
        .fail_on("DROP SEQUENCE \"users_seq\"", "lock timeout");
    let adapter = hana(conn);

    let err = adapter.rename_sequence("users", "people").unwrap_err();
    assert!(err.to_string().contains("lock timeout"));

    // the new sequence was created and is not rolled back
    let statements = adapter.connection().statements();
    assert!(statements
        .iter()
        .any(|s| s.starts_with("CREATE SEQUENCE \"people_seq\"")));
    assert_eq!(statements.last().unwrap(), "DROP SEQUENCE \"users_seq\"");
}

// =============================================================================
// Column DDL
// =============================================================================

fn items_adapter() -> SchemaStatements<ScriptedConnection> {
    let conn = ScriptedConnection::new(metadata()).respond(
        "FROM SYS.COLUMNS",
        vec![
            sys_column("NAME", Some("unknown"), "NVARCHAR", "TRUE", "STRING", 40, None),
            sys_column("PRICE", None, "DECIMAL", "TRUE", "FIXED", 10, Some(2)),
            sys_column("QTY", Some("0"), "INTEGER", "TRUE", "INT", 10, Some(0)),
        ],
    );
    hana_with(conn, scoped_settings())
}

#[test]
fn test_add_column() {
    let adapter = hana(ScriptedConnection::new(metadata()));
    adapter
        .add_column(
            "items",
            "qty",
            odbc_adapter::AbstractType::Integer,
            &ColumnOptions::default().null(false).default_value(1),
        )
        .unwrap();

    assert_eq!(
        adapter.connection().statements(),
        vec!["ALTER TABLE \"items\" ADD (\"qty\" INTEGER DEFAULT 1 NOT NULL)"]
    );
}

#[test]
fn test_change_column_keeps_current_default() {
    let adapter = items_adapter();
    adapter
        .change_column("ITEMS", "name", "NVARCHAR(80)", &ColumnOptions::default())
        .unwrap();

    let last = adapter.connection().statements().pop().unwrap();
    assert_eq!(
        last,
        "ALTER TABLE \"ITEMS\" ALTER (\"name\" NVARCHAR(80) DEFAULT 'unknown')"
    );
}

#[test]
fn test_change_column_default_keeps_declared_type() {
    let adapter = items_adapter();
    adapter
        .change_column_default("ITEMS", "price", SqlValue::Int(0))
        .unwrap();

    let last = adapter.connection().statements().pop().unwrap();
    assert_eq!(last, "ALTER TABLE \"ITEMS\" ALTER (\"price\" DECIMAL(10,2) DEFAULT 0)");
}

#[test]
fn test_change_column_null_backfills_before_altering() {
    let adapter = items_adapter();
    let before = adapter.connection().statements().len();
    adapter
        .change_column_null("ITEMS", "name", false, Some(SqlValue::from("n/a")))
        .unwrap();

    let statements = adapter.connection().statements_since(before);
    let update = statements
        .iter()
        .position(|s| s == "UPDATE \"ITEMS\" SET \"name\"='n/a' WHERE \"name\" IS NULL")
        .expect("back-fill statement");
    let alter = statements
        .iter()
        .position(|s| s == "ALTER TABLE \"ITEMS\" ALTER (\"name\" NVARCHAR(40) DEFAULT 'unknown' NOT NULL)")
        .expect("alter statement");
    assert!(update < alter);
}

#[test]
fn test_change_column_null_keeps_numeric_default_unquoted() {
    let adapter = items_adapter();
    adapter.change_column_null("ITEMS", "qty", false, None).unwrap();

    let last = adapter.connection().statements().pop().unwrap();
    assert_eq!(last, "ALTER TABLE \"ITEMS\" ALTER (\"qty\" INTEGER DEFAULT 0 NOT NULL)");
}

#[test]
fn test_change_column_null_without_default_skips_backfill() {
    let adapter = items_adapter();
    adapter.change_column_null("ITEMS", "name", true, None).unwrap();
    assert!(!adapter
        .connection()
        .statements()
        .iter()
        .any(|s| s.starts_with("UPDATE")));
}

#[test]
fn test_change_missing_column_fails() {
    let adapter = items_adapter();
    let err = adapter
        .change_column_default("ITEMS", "nope", SqlValue::Null)
        .unwrap_err();
    assert!(matches!(err, AdapterError::NoSuchColumn { .. }));
}

// =============================================================================
// Index names
// =============================================================================

#[test]
fn test_index_name_generated_and_truncated() {
    let adapter = hana(ScriptedConnection::new(metadata()));
    let source = IndexNameSource::Columns(vec!["a".into(), "b".into()]);
    assert_eq!(adapter.index_name("t", &source), "index_t_on_a_and_b");

    let long = "x".repeat(300);
    assert_eq!(
        adapter.index_name("t", &IndexNameSource::Name(long)).len(),
        255
    );
}

#[test]
fn test_index_name_respects_driver_limit() {
    let meta = DatabaseMetadata {
        max_identifier_len: Some(10),
        ..metadata()
    };
    let adapter = hana(ScriptedConnection::new(meta));
    let source = IndexNameSource::Columns(vec!["email".into()]);
    assert_eq!(adapter.index_name("users", &source), "index_user");
}
