mod common;

use pretty_assertions::assert_eq;
use quarry_core::grammar::Grammar;
use quarry_core::schema::{self, ColumnType, Table};
use quarry_core::{Config, Database, Error};

use common::RecordingConnection;

fn run(driver: &str) -> Vec<String> {
    let db = Database::new(RecordingConnection::default(), Config::new(driver));
    let schema = db.schema();

    tokio_test::block_on(async {
        schema
            .create("users", |table| {
                table.increments("id");
                table.string("email", Some(100));
            })
            .await?;
        schema
            .table("users", |table| table.drop_column("email"))
            .await
    })
    .unwrap();

    db.connection().sql()
}

#[test]
fn create_then_drop_column_mysql() {
    assert_eq!(
        run("mysql"),
        vec![
            "CREATE TABLE `users` (`id` INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY, \
             `email` VARCHAR(100) NOT NULL)",
            "ALTER TABLE `users` DROP `email`",
        ]
    );
}

#[test]
fn create_then_drop_column_sqlite() {
    assert_eq!(
        run("sqlite"),
        vec![
            "CREATE TABLE \"users\" (\"id\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT, \
             \"email\" VARCHAR NOT NULL)",
            "ALTER TABLE \"users\" DROP COLUMN \"email\"",
        ]
    );
}

#[test]
fn create_then_drop_column_postgres() {
    assert_eq!(
        run("pgsql"),
        vec![
            "CREATE TABLE \"users\" (\"id\" SERIAL NOT NULL PRIMARY KEY, \
             \"email\" VARCHAR(100) NOT NULL)",
            "ALTER TABLE \"users\" DROP COLUMN \"email\"",
        ]
    );
}

#[test]
fn create_then_drop_column_sqlserver() {
    assert_eq!(
        run("sqlsrv"),
        vec![
            "CREATE TABLE [users] ([id] INT NOT NULL IDENTITY PRIMARY KEY, \
             [email] NVARCHAR(100) NOT NULL)",
            "ALTER TABLE [users] DROP COLUMN [email]",
        ]
    );
}

#[test]
fn prefix_applies_to_every_statement() {
    let db = Database::new(
        RecordingConnection::default(),
        Config::new("pgsql").with_prefix("app_"),
    );

    tokio_test::block_on(db.schema().table("posts", |table| {
        table.integer("user_id");
        table
            .foreign("user_id")
            .references("id")
            .on("users")
            .on_delete("cascade");
    }))
    .unwrap();

    assert_eq!(
        db.connection().sql(),
        vec![
            "ALTER TABLE \"app_posts\" ADD COLUMN \"user_id\" INTEGER NOT NULL",
            "ALTER TABLE \"app_posts\" ADD CONSTRAINT \"posts_user_id_foreign\" \
             FOREIGN KEY (\"user_id\") REFERENCES \"app_users\" (\"id\") ON DELETE cascade",
        ]
    );
}

#[test]
fn unsupported_types_fail_before_running() {
    let db = Database::new(RecordingConnection::default(), Config::new("sqlsrv"));

    let result = tokio_test::block_on(db.schema().create("flags", |table| {
        table.increments("id");
        table.set("bits", ["a", "b"]);
    }));

    match result {
        Err(Error::Unsupported { dialect, .. }) => assert_eq!(dialect, "sqlsrv"),
        other => panic!("expected an unsupported error, got {other:?}"),
    }
    assert!(db.connection().sql().is_empty());
}

/// Every logical type, in declaration order
fn every_type() -> Vec<ColumnType> {
    let allowed = vec!["draft".to_string(), "live".to_string()];
    vec![
        ColumnType::String { length: 100 },
        ColumnType::Char { length: 2 },
        ColumnType::Integer,
        ColumnType::BigInteger,
        ColumnType::SmallInteger,
        ColumnType::Float,
        ColumnType::Double,
        ColumnType::Decimal { precision: 8, scale: 2 },
        ColumnType::Boolean,
        ColumnType::Date,
        ColumnType::DateTime,
        ColumnType::Time,
        ColumnType::Timestamp,
        ColumnType::Text,
        ColumnType::MediumText,
        ColumnType::LongText,
        ColumnType::Blob,
        ColumnType::Json,
        ColumnType::Jsonb,
        ColumnType::Uuid,
        ColumnType::IpAddress,
        ColumnType::MacAddress,
        ColumnType::Enum(allowed.clone()),
        ColumnType::Set(allowed),
        ColumnType::Geometry,
        ColumnType::Point,
        ColumnType::LineString,
        ColumnType::Polygon,
    ]
}

/// Creates a one-column table, then drops the column again.
/// `None` in `expected` marks a type the dialect rejects.
fn assert_type_map(driver: &str, expected: &[Option<&str>], drop_sql: &str) {
    let grammar = schema::grammar::for_driver(driver, "").unwrap();
    let types = every_type();
    assert_eq!(types.len(), expected.len(), "{driver}: one entry per type");

    for (kind, expected) in types.into_iter().zip(expected) {
        let mut create = Table::new("samples");
        create.create();
        create.column("value", kind.clone());
        let result = schema::build(&mut create, grammar.as_ref());

        match expected {
            Some(sql_type) => {
                let statements = result.unwrap();
                assert_eq!(
                    statements[0],
                    format!(
                        "CREATE TABLE {} ({} {} NOT NULL)",
                        grammar.wrap_table("samples"),
                        grammar.wrap("value"),
                        sql_type
                    ),
                    "{driver}: {kind:?}"
                );
            }
            None => match result {
                Err(Error::Unsupported { dialect, .. }) => assert_eq!(dialect, driver),
                other => panic!("{driver}: expected {kind:?} to be unsupported, got {other:?}"),
            },
        }

        let mut alter = Table::new("samples");
        alter.drop_column("value");
        assert_eq!(
            schema::build(&mut alter, grammar.as_ref()).unwrap(),
            vec![drop_sql.to_string()],
            "{driver}: {kind:?}"
        );
    }
}

#[test]
fn type_map_mysql() {
    assert_type_map(
        "mysql",
        &[
            Some("VARCHAR(100)"),
            Some("CHAR(2)"),
            Some("INT"),
            Some("BIGINT"),
            Some("SMALLINT"),
            Some("FLOAT"),
            Some("DOUBLE"),
            Some("DECIMAL(8, 2)"),
            Some("TINYINT(1)"),
            Some("DATE"),
            Some("DATETIME"),
            Some("TIME"),
            Some("TIMESTAMP"),
            Some("TEXT"),
            Some("MEDIUMTEXT"),
            Some("LONGTEXT"),
            Some("BLOB"),
            Some("JSON"),
            Some("JSON"),
            Some("CHAR(36)"),
            Some("VARCHAR(45)"),
            Some("VARCHAR(17)"),
            Some("ENUM('draft', 'live')"),
            Some("SET('draft', 'live')"),
            Some("GEOMETRY"),
            Some("POINT"),
            Some("LINESTRING"),
            Some("POLYGON"),
        ],
        "ALTER TABLE `samples` DROP `value`",
    );
}

#[test]
fn type_map_sqlite() {
    assert_type_map(
        "sqlite",
        &[
            Some("VARCHAR"),
            Some("VARCHAR"),
            Some("INTEGER"),
            Some("INTEGER"),
            Some("INTEGER"),
            Some("FLOAT"),
            Some("FLOAT"),
            Some("FLOAT"),
            Some("INTEGER"),
            Some("DATETIME"),
            Some("DATETIME"),
            Some("DATETIME"),
            Some("DATETIME"),
            Some("TEXT"),
            Some("TEXT"),
            Some("TEXT"),
            Some("BLOB"),
            Some("TEXT"),
            Some("TEXT"),
            Some("TEXT"),
            Some("VARCHAR"),
            Some("VARCHAR"),
            Some("VARCHAR CHECK (\"value\" IN ('draft', 'live'))"),
            Some("VARCHAR"),
            Some("GEOMETRY"),
            Some("POINT"),
            Some("LINESTRING"),
            Some("POLYGON"),
        ],
        "ALTER TABLE \"samples\" DROP COLUMN \"value\"",
    );
}

#[test]
fn type_map_postgres() {
    assert_type_map(
        "pgsql",
        &[
            Some("VARCHAR(100)"),
            Some("CHAR(2)"),
            Some("INTEGER"),
            Some("BIGINT"),
            Some("SMALLINT"),
            Some("REAL"),
            Some("DOUBLE PRECISION"),
            Some("DECIMAL(8, 2)"),
            Some("BOOLEAN"),
            Some("DATE"),
            Some("TIMESTAMP(0) WITHOUT TIME ZONE"),
            Some("TIME(0) WITHOUT TIME ZONE"),
            Some("TIMESTAMP(0) WITHOUT TIME ZONE"),
            Some("TEXT"),
            Some("TEXT"),
            Some("TEXT"),
            Some("BYTEA"),
            Some("JSON"),
            Some("JSONB"),
            Some("UUID"),
            Some("INET"),
            Some("MACADDR"),
            Some("VARCHAR(255) CHECK (\"value\" IN ('draft', 'live'))"),
            None,
            Some("GEOMETRY"),
            Some("GEOMETRY(POINT)"),
            Some("GEOMETRY(LINESTRING)"),
            Some("GEOMETRY(POLYGON)"),
        ],
        "ALTER TABLE \"samples\" DROP COLUMN \"value\"",
    );
}

#[test]
fn type_map_sqlserver() {
    assert_type_map(
        "sqlsrv",
        &[
            Some("NVARCHAR(100)"),
            Some("NCHAR(2)"),
            Some("INT"),
            Some("BIGINT"),
            Some("SMALLINT"),
            Some("FLOAT"),
            Some("FLOAT"),
            Some("DECIMAL(8, 2)"),
            Some("BIT"),
            Some("DATE"),
            Some("DATETIME"),
            Some("TIME"),
            Some("DATETIME2"),
            Some("NVARCHAR(MAX)"),
            Some("NVARCHAR(MAX)"),
            Some("NVARCHAR(MAX)"),
            Some("VARBINARY(MAX)"),
            Some("NVARCHAR(MAX)"),
            Some("NVARCHAR(MAX)"),
            Some("UNIQUEIDENTIFIER"),
            Some("NVARCHAR(45)"),
            Some("NVARCHAR(17)"),
            Some("NVARCHAR(255) CHECK ([value] IN ('draft', 'live'))"),
            None,
            Some("GEOMETRY"),
            Some("GEOMETRY"),
            Some("GEOMETRY"),
            Some("GEOMETRY"),
        ],
        "ALTER TABLE [samples] DROP COLUMN [value]",
    );
}
