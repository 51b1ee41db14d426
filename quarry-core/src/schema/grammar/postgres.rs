use super::{quote_string, SchemaGrammar};
use crate::grammar::Grammar;
use crate::query::grammar::PostgresGrammar;
use crate::schema::command::IndexCommand;
use crate::schema::{Column, ColumnType, Table};
use crate::Result;

impl PostgresGrammar {
    fn alter(&self, table: &Table, clause: String) -> Vec<String> {
        vec![format!(
            "ALTER TABLE {} {}",
            self.wrap_table(&table.name),
            clause
        )]
    }

    /// `COMMENT ON COLUMN` statements for every commented column
    fn comments(&self, table: &Table) -> Vec<String> {
        table
            .columns
            .iter()
            .filter_map(|column| {
                column.comment.as_ref().map(|comment| {
                    format!(
                        "COMMENT ON COLUMN {}.{} IS {}",
                        self.wrap_table(&table.name),
                        self.wrap_value(&column.name),
                        quote_string(comment)
                    )
                })
            })
            .collect()
    }

    /// `ALTER COLUMN` clauses that bring an existing column in line
    fn change_clauses(&self, column: &Column) -> Result<Vec<String>> {
        let name = self.wrap(&column.name);
        let mut clauses = vec![format!("ALTER COLUMN {name} TYPE {}", self.column_type(column)?)];

        clauses.push(if column.nullable {
            format!("ALTER COLUMN {name} DROP NOT NULL")
        } else {
            format!("ALTER COLUMN {name} SET NOT NULL")
        });
        if let Some(default) = &column.default {
            clauses.push(format!(
                "ALTER COLUMN {name} SET DEFAULT {}",
                self.default_value(default)
            ));
        }
        Ok(clauses)
    }

    fn create_index(&self, table: &Table, index: &IndexCommand, using: Option<String>) -> Vec<String> {
        let target = match using {
            Some(method) => format!("USING {method}"),
            None => format!("({})", self.columnize(&index.columns)),
        };
        vec![format!(
            "CREATE INDEX {} ON {} {}",
            self.wrap_value(&index.name),
            self.wrap_table(&table.name),
            target
        )]
    }

    fn drop_constraint(&self, table: &Table, name: &str, if_exists: bool) -> Vec<String> {
        let guard = if if_exists { "IF EXISTS " } else { "" };
        self.alter(
            table,
            format!("DROP CONSTRAINT {guard}{}", self.wrap_value(name)),
        )
    }

    fn drop_named_index(&self, name: &str, if_exists: bool) -> Vec<String> {
        let guard = if if_exists { "IF EXISTS " } else { "" };
        vec![format!("DROP INDEX {guard}{}", self.wrap_value(name))]
    }

    fn drop_columns(&self, table: &Table, columns: &[String], if_exists: bool) -> Vec<String> {
        let guard = if if_exists { "IF EXISTS " } else { "" };
        let clauses: Vec<_> = columns
            .iter()
            .map(|column| format!("DROP COLUMN {guard}{}", self.wrap(column)))
            .collect();
        self.alter(table, clauses.join(", "))
    }
}

impl SchemaGrammar for PostgresGrammar {
    fn column_type(&self, column: &Column) -> Result<String> {
        Ok(match &column.kind {
            ColumnType::Integer if column.increment => "SERIAL".to_string(),
            ColumnType::BigInteger if column.increment => "BIGSERIAL".to_string(),
            ColumnType::SmallInteger if column.increment => "SMALLSERIAL".to_string(),
            ColumnType::String { length } => format!("VARCHAR({length})"),
            ColumnType::Char { length } => format!("CHAR({length})"),
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::BigInteger => "BIGINT".to_string(),
            ColumnType::SmallInteger => "SMALLINT".to_string(),
            ColumnType::Float => "REAL".to_string(),
            ColumnType::Double => "DOUBLE PRECISION".to_string(),
            ColumnType::Decimal { precision, scale } => format!("DECIMAL({precision}, {scale})"),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::DateTime | ColumnType::Timestamp => {
                "TIMESTAMP(0) WITHOUT TIME ZONE".to_string()
            }
            ColumnType::Time => "TIME(0) WITHOUT TIME ZONE".to_string(),
            ColumnType::Text | ColumnType::MediumText | ColumnType::LongText => "TEXT".to_string(),
            ColumnType::Blob => "BYTEA".to_string(),
            ColumnType::Json => "JSON".to_string(),
            ColumnType::Jsonb => "JSONB".to_string(),
            ColumnType::Uuid => "UUID".to_string(),
            ColumnType::IpAddress => "INET".to_string(),
            ColumnType::MacAddress => "MACADDR".to_string(),
            ColumnType::Enum(allowed) => {
                format!("VARCHAR(255) {}", self.check_in(column, allowed))
            }
            ColumnType::Set(_) => return Err(self.unsupported("set columns")),
            ColumnType::Geometry => "GEOMETRY".to_string(),
            ColumnType::Point => "GEOMETRY(POINT)".to_string(),
            ColumnType::LineString => "GEOMETRY(LINESTRING)".to_string(),
            ColumnType::Polygon => "GEOMETRY(POLYGON)".to_string(),
        })
    }

    fn column_definition(&self, column: &Column) -> Result<String> {
        let mut sql = format!("{} {}", self.wrap(&column.name), self.column_type(column)?);

        sql.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
        if let Some(default) = &column.default {
            sql.push_str(&format!(" DEFAULT {}", self.default_value(default)));
        }
        if column.increment {
            sql.push_str(" PRIMARY KEY");
        }
        Ok(sql)
    }

    fn compile_create(&self, table: &Table) -> Result<Vec<String>> {
        let mut statements = vec![format!(
            "CREATE TABLE {} ({})",
            self.wrap_table(&table.name),
            self.column_definitions(table)?.join(", ")
        )];
        statements.extend(self.comments(table));
        Ok(statements)
    }

    fn compile_add(&self, table: &Table) -> Result<Vec<String>> {
        let mut clauses = Vec::new();
        for column in &table.columns {
            if column.change {
                clauses.extend(self.change_clauses(column)?);
            } else {
                clauses.push(format!("ADD COLUMN {}", self.column_definition(column)?));
            }
        }

        let mut statements = self.alter(table, clauses.join(", "));
        statements.extend(self.comments(table));
        Ok(statements)
    }

    fn compile_drop_column(&self, table: &Table, columns: &[String]) -> Result<Vec<String>> {
        Ok(self.drop_columns(table, columns, false))
    }

    fn compile_drop_column_if_exists(&self, table: &Table, columns: &[String]) -> Result<Vec<String>> {
        Ok(self.drop_columns(table, columns, true))
    }

    fn compile_rename_column(&self, table: &Table, from: &str, to: &str) -> Result<Vec<String>> {
        Ok(self.alter(
            table,
            format!("RENAME COLUMN {} TO {}", self.wrap(from), self.wrap(to)),
        ))
    }

    fn compile_primary(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.alter(
            table,
            format!("ADD PRIMARY KEY ({})", self.columnize(&index.columns)),
        ))
    }

    fn compile_unique(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.alter(
            table,
            format!(
                "ADD CONSTRAINT {} UNIQUE ({})",
                self.wrap_value(&index.name),
                self.columnize(&index.columns)
            ),
        ))
    }

    fn compile_index(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.create_index(table, index, None))
    }

    fn compile_fulltext(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        let document = index
            .columns
            .iter()
            .map(|column| self.wrap(column))
            .collect::<Vec<_>>()
            .join(" || ' ' || ");
        Ok(self.create_index(
            table,
            index,
            Some(format!("gin(to_tsvector('english', {document}))")),
        ))
    }

    fn compile_spatial(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.create_index(
            table,
            index,
            Some(format!("gist({})", self.columnize(&index.columns))),
        ))
    }

    /// Unnamed primary keys follow the `{table}_pkey` convention
    fn compile_drop_primary(&self, table: &Table, name: Option<&str>) -> Result<Vec<String>> {
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("{}{}_pkey", self.prefix(), table.name),
        };
        Ok(self.drop_constraint(table, &name, false))
    }

    fn compile_drop_unique(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_constraint(table, name, false))
    }

    fn compile_drop_fulltext(&self, _table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_named_index(name, false))
    }

    fn compile_drop_index(&self, _table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_named_index(name, false))
    }

    fn compile_drop_spatial(&self, _table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_named_index(name, false))
    }

    fn compile_drop_index_if_exists(&self, _table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_named_index(name, true))
    }

    fn compile_drop_unique_if_exists(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_constraint(table, name, true))
    }

    fn compile_drop_fulltext_if_exists(&self, _table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_named_index(name, true))
    }

    fn compile_drop_foreign_if_exists(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_constraint(table, name, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build;
    use crate::Error;

    fn grammar() -> PostgresGrammar {
        PostgresGrammar::default()
    }

    #[test]
    fn test_create_with_comments() {
        let mut table = Table::new("users");
        table.create();
        table.big_increments("id");
        table.string("email", Some(120)).comment("login name");
        table.jsonb("settings").nullable();
        table.boolean("admin").defaults(false);

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "CREATE TABLE \"users\" (\
                 \"id\" BIGSERIAL NOT NULL PRIMARY KEY, \
                 \"email\" VARCHAR(120) NOT NULL, \
                 \"settings\" JSONB NULL, \
                 \"admin\" BOOLEAN NOT NULL DEFAULT '0')",
                "COMMENT ON COLUMN \"users\".\"email\" IS 'login name'",
            ]
        );
    }

    #[test]
    fn test_add_and_change_columns() {
        let mut table = Table::new("users");
        table.ip_address("last_ip").nullable();
        table.integer("votes").defaults(0).change();

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "ALTER TABLE \"users\" ADD COLUMN \"last_ip\" INET NULL, \
                 ALTER COLUMN \"votes\" TYPE INTEGER, \
                 ALTER COLUMN \"votes\" SET NOT NULL, \
                 ALTER COLUMN \"votes\" SET DEFAULT '0'"
            ]
        );
    }

    #[test]
    fn test_indexes() {
        let mut table = Table::new("posts");
        table.primary("id");
        table.unique("slug");
        table.fulltext(("title", "body"));
        table.spatial("area");

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "ALTER TABLE \"posts\" ADD PRIMARY KEY (\"id\")",
                "ALTER TABLE \"posts\" ADD CONSTRAINT \"posts_slug_unique\" UNIQUE (\"slug\")",
                "CREATE INDEX \"posts_title_body_fulltext\" ON \"posts\" \
                 USING gin(to_tsvector('english', \"title\" || ' ' || \"body\"))",
                "CREATE INDEX \"posts_area_spatial\" ON \"posts\" USING gist(\"area\")",
            ]
        );
    }

    #[test]
    fn test_drop_family() {
        let mut table = Table::new("posts");
        table.drop_primary(None);
        table.drop_unique_if_exists("posts_slug_unique");
        table.drop_index_if_exists("posts_slug_index");
        table.drop_foreign("posts_user_id_foreign");
        table.drop_column_if_exists(("a", "b"));
        table.rename_column("slug", "permalink");

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "ALTER TABLE \"posts\" DROP CONSTRAINT \"posts_pkey\"",
                "ALTER TABLE \"posts\" DROP CONSTRAINT IF EXISTS \"posts_slug_unique\"",
                "DROP INDEX IF EXISTS \"posts_slug_index\"",
                "ALTER TABLE \"posts\" DROP CONSTRAINT \"posts_user_id_foreign\"",
                "ALTER TABLE \"posts\" DROP COLUMN IF EXISTS \"a\", DROP COLUMN IF EXISTS \"b\"",
                "ALTER TABLE \"posts\" RENAME COLUMN \"slug\" TO \"permalink\"",
            ]
        );
    }

    #[test]
    fn test_prefixed_primary_key_name() {
        let mut table = Table::new("posts");
        table.drop_primary(None);
        assert_eq!(
            build(&mut table, &PostgresGrammar::new("app_")).unwrap(),
            vec!["ALTER TABLE \"app_posts\" DROP CONSTRAINT \"app_posts_pkey\""]
        );
    }

    #[test]
    fn test_set_columns_are_unsupported() {
        let mut table = Table::new("posts");
        table.create();
        table.set("flags", ["a", "b"]);
        assert!(matches!(
            build(&mut table, &grammar()),
            Err(Error::Unsupported { dialect: "pgsql", .. })
        ));
    }
}
