use super::{quote_string, SchemaGrammar};
use crate::grammar::Grammar;
use crate::query::grammar::SqlServerGrammar;
use crate::schema::command::IndexCommand;
use crate::schema::{Column, ColumnType, Table};
use crate::{Error, Result};

impl SqlServerGrammar {
    fn alter(&self, table: &Table, clause: String) -> Vec<String> {
        vec![format!(
            "ALTER TABLE {} {}",
            self.wrap_table(&table.name),
            clause
        )]
    }

    fn create_index(&self, table: &Table, index: &IndexCommand, kind: &str) -> Vec<String> {
        vec![format!(
            "CREATE {kind}INDEX {} ON {} ({})",
            self.wrap_value(&index.name),
            self.wrap_table(&table.name),
            self.columnize(&index.columns)
        )]
    }

    fn drop_named_index(&self, table: &Table, name: &str, if_exists: bool) -> Vec<String> {
        let guard = if if_exists { "IF EXISTS " } else { "" };
        vec![format!(
            "DROP INDEX {guard}{} ON {}",
            self.wrap_value(name),
            self.wrap_table(&table.name)
        )]
    }

    fn drop_columns(&self, table: &Table, columns: &[String], if_exists: bool) -> Vec<String> {
        let guard = if if_exists { "IF EXISTS " } else { "" };
        self.alter(
            table,
            format!("DROP COLUMN {guard}{}", self.columnize(columns)),
        )
    }
}

impl SchemaGrammar for SqlServerGrammar {
    fn column_type(&self, column: &Column) -> Result<String> {
        Ok(match &column.kind {
            ColumnType::String { length } => format!("NVARCHAR({length})"),
            ColumnType::Char { length } => format!("NCHAR({length})"),
            ColumnType::Integer => "INT".to_string(),
            ColumnType::BigInteger => "BIGINT".to_string(),
            ColumnType::SmallInteger => "SMALLINT".to_string(),
            ColumnType::Float | ColumnType::Double => "FLOAT".to_string(),
            ColumnType::Decimal { precision, scale } => format!("DECIMAL({precision}, {scale})"),
            ColumnType::Boolean => "BIT".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::DateTime => "DATETIME".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Timestamp => "DATETIME2".to_string(),
            ColumnType::Text
            | ColumnType::MediumText
            | ColumnType::LongText
            | ColumnType::Json
            | ColumnType::Jsonb => "NVARCHAR(MAX)".to_string(),
            ColumnType::Blob => "VARBINARY(MAX)".to_string(),
            ColumnType::Uuid => "UNIQUEIDENTIFIER".to_string(),
            ColumnType::IpAddress => "NVARCHAR(45)".to_string(),
            ColumnType::MacAddress => "NVARCHAR(17)".to_string(),
            ColumnType::Enum(allowed) => {
                format!("NVARCHAR(255) {}", self.check_in(column, allowed))
            }
            ColumnType::Set(_) => return Err(self.unsupported("set columns")),
            ColumnType::Geometry
            | ColumnType::Point
            | ColumnType::LineString
            | ColumnType::Polygon => "GEOMETRY".to_string(),
        })
    }

    fn column_definition(&self, column: &Column) -> Result<String> {
        let mut sql = format!("{} {}", self.wrap(&column.name), self.column_type(column)?);

        sql.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
        if let Some(default) = &column.default {
            sql.push_str(&format!(" DEFAULT {}", self.default_value(default)));
        }
        if column.increment {
            sql.push_str(" IDENTITY PRIMARY KEY");
        }
        Ok(sql)
    }

    fn compile_create(&self, table: &Table) -> Result<Vec<String>> {
        Ok(vec![format!(
            "CREATE TABLE {} ({})",
            self.wrap_table(&table.name),
            self.column_definitions(table)?.join(", ")
        )])
    }

    /// New columns share one ALTER; each changed column gets its own
    fn compile_add(&self, table: &Table) -> Result<Vec<String>> {
        let (changed, added): (Vec<&Column>, Vec<&Column>) =
            table.columns.iter().partition(|column| column.change);

        let mut statements = Vec::new();
        if !added.is_empty() {
            let definitions = added
                .iter()
                .map(|column| self.column_definition(column))
                .collect::<Result<Vec<_>>>()?;
            statements.extend(self.alter(table, format!("ADD {}", definitions.join(", "))));
        }
        for column in changed {
            statements.extend(self.alter(
                table,
                format!("ALTER COLUMN {}", self.column_definition(column)?),
            ));
        }
        Ok(statements)
    }

    fn compile_rename(&self, table: &Table, to: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "EXEC sp_rename {}, {}",
            quote_string(&format!("{}{}", self.prefix(), table.name)),
            quote_string(&format!("{}{}", self.prefix(), to))
        )])
    }

    fn compile_rename_column(&self, table: &Table, from: &str, to: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "EXEC sp_rename {}, {}, 'COLUMN'",
            quote_string(&format!("{}{}.{}", self.prefix(), table.name, from)),
            quote_string(to)
        )])
    }

    fn compile_drop_column(&self, table: &Table, columns: &[String]) -> Result<Vec<String>> {
        Ok(self.drop_columns(table, columns, false))
    }

    fn compile_drop_column_if_exists(&self, table: &Table, columns: &[String]) -> Result<Vec<String>> {
        Ok(self.drop_columns(table, columns, true))
    }

    fn compile_primary(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.alter(
            table,
            format!(
                "ADD CONSTRAINT {} PRIMARY KEY ({})",
                self.wrap_value(&index.name),
                self.columnize(&index.columns)
            ),
        ))
    }

    fn compile_unique(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.create_index(table, index, "UNIQUE "))
    }

    fn compile_index(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.create_index(table, index, ""))
    }

    fn compile_spatial(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.create_index(table, index, "SPATIAL "))
    }

    /// Full-text search needs a catalog and a unique key index to hang off
    fn compile_fulltext(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        let key = index.key.as_deref().ok_or_else(|| {
            Error::invalid_query(format!(
                "Full-text index [{}] needs the name of a unique key index",
                index.name
            ))
        })?;
        let catalog = self.wrap_value(index.catalog.as_deref().unwrap_or(&index.name));

        Ok(vec![
            format!("CREATE FULLTEXT CATALOG {catalog}"),
            format!(
                "CREATE FULLTEXT INDEX ON {} ({}) KEY INDEX {} ON {catalog}",
                self.wrap_table(&table.name),
                self.columnize(&index.columns),
                self.wrap_value(key)
            ),
        ])
    }

    fn compile_drop_primary(&self, table: &Table, name: Option<&str>) -> Result<Vec<String>> {
        let name = name.ok_or_else(|| {
            Error::invalid_query("Dropping a primary key needs its constraint name")
        })?;
        Ok(self.alter(table, format!("DROP CONSTRAINT {}", self.wrap_value(name))))
    }

    fn compile_drop_unique(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_named_index(table, name, false))
    }

    fn compile_drop_index(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_named_index(table, name, false))
    }

    fn compile_drop_spatial(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_named_index(table, name, false))
    }

    /// A table has at most one full-text index; its catalog is left in place
    fn compile_drop_fulltext(&self, table: &Table, _name: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "DROP FULLTEXT INDEX ON {}",
            self.wrap_table(&table.name)
        )])
    }

    fn compile_drop_index_if_exists(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_named_index(table, name, true))
    }

    fn compile_drop_unique_if_exists(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_named_index(table, name, true))
    }

    fn compile_drop_foreign_if_exists(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.alter(
            table,
            format!("DROP CONSTRAINT IF EXISTS {}", self.wrap_value(name)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build;

    fn grammar() -> SqlServerGrammar {
        SqlServerGrammar::default()
    }

    #[test]
    fn test_create_table() {
        let mut table = Table::new("users");
        table.create();
        table.increments("id");
        table.string("name", Some(80));
        table.uuid("token").nullable();
        table.timestamp("seen_at");

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "CREATE TABLE [users] (\
                 [id] INT NOT NULL IDENTITY PRIMARY KEY, \
                 [name] NVARCHAR(80) NOT NULL, \
                 [token] UNIQUEIDENTIFIER NULL, \
                 [seen_at] DATETIME2 NOT NULL)"
            ]
        );
    }

    #[test]
    fn test_add_splits_changed_columns() {
        let mut table = Table::new("users");
        table.string("nickname", None).nullable();
        table.boolean("admin").defaults(true);
        table.text("bio").nullable().change();

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "ALTER TABLE [users] ADD [nickname] NVARCHAR(200) NULL, \
                 [admin] BIT NOT NULL DEFAULT '1'",
                "ALTER TABLE [users] ALTER COLUMN [bio] NVARCHAR(MAX) NULL",
            ]
        );
    }

    #[test]
    fn test_renames_use_sp_rename() {
        let mut table = Table::new("posts");
        table.rename_column("slug", "permalink");
        table.rename("articles");

        assert_eq!(
            build(&mut table, &SqlServerGrammar::new("app_")).unwrap(),
            vec![
                "EXEC sp_rename 'app_posts.slug', 'permalink', 'COLUMN'",
                "EXEC sp_rename 'app_posts', 'app_articles'",
            ]
        );
    }

    #[test]
    fn test_fulltext_pairs() {
        let mut table = Table::new("posts");
        table.fulltext("body").key("posts_id_primary");
        table.drop_fulltext("posts_body_fulltext");

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "CREATE FULLTEXT CATALOG [posts_body_fulltext]",
                "CREATE FULLTEXT INDEX ON [posts] ([body]) \
                 KEY INDEX [posts_id_primary] ON [posts_body_fulltext]",
                "DROP FULLTEXT INDEX ON [posts]",
            ]
        );
    }

    #[test]
    fn test_drop_fulltext_keeps_shared_catalog() {
        let mut table = Table::new("posts");
        table.fulltext("body").catalog("search").key("posts_id_primary");
        table.drop_fulltext("posts_body_fulltext");

        let statements = build(&mut table, &grammar()).unwrap();
        assert_eq!(
            statements,
            vec![
                "CREATE FULLTEXT CATALOG [search]",
                "CREATE FULLTEXT INDEX ON [posts] ([body]) KEY INDEX [posts_id_primary] ON [search]",
                "DROP FULLTEXT INDEX ON [posts]",
            ]
        );
        assert!(!statements.iter().any(|sql| sql.starts_with("DROP FULLTEXT CATALOG")));
    }

    #[test]
    fn test_fulltext_without_key_is_rejected() {
        let mut table = Table::new("posts");
        table.fulltext("body").catalog("search");
        let err = build(&mut table, &grammar()).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
    }

    #[test]
    fn test_keys_and_drops() {
        let mut table = Table::new("posts");
        table.primary("id");
        table.unique("slug");
        table.drop_index_if_exists("posts_slug_index");
        table.drop_column(("a", "b"));
        table.drop_primary(Some("posts_id_primary"));

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "ALTER TABLE [posts] ADD CONSTRAINT [posts_id_primary] PRIMARY KEY ([id])",
                "CREATE UNIQUE INDEX [posts_slug_unique] ON [posts] ([slug])",
                "DROP INDEX IF EXISTS [posts_slug_index] ON [posts]",
                "ALTER TABLE [posts] DROP COLUMN [a], [b]",
                "ALTER TABLE [posts] DROP CONSTRAINT [posts_id_primary]",
            ]
        );
    }
}
