use super::SchemaGrammar;
use crate::grammar::Grammar;
use crate::query::grammar::SqliteGrammar;
use crate::schema::command::{Command, ForeignKey, IndexCommand};
use crate::schema::{Column, ColumnType, Table};
use crate::{Error, Result};

impl SqliteGrammar {
    /// Keys SQLite only accepts inside CREATE TABLE
    fn table_constraints(&self, table: &Table) -> Result<Vec<String>> {
        let mut constraints = Vec::new();

        let primary = table.commands.iter().find_map(|command| match command {
            Command::Primary(index) => Some(index),
            _ => None,
        });
        if let Some(index) = primary {
            constraints.push(format!("PRIMARY KEY ({})", self.columnize(&index.columns)));
        }

        for command in &table.commands {
            if let Command::Foreign(foreign) = command {
                constraints.push(self.foreign_reference(foreign)?);
            }
        }
        Ok(constraints)
    }

    fn create_index(&self, table: &Table, index: &IndexCommand, unique: bool) -> Vec<String> {
        vec![format!(
            "CREATE {}INDEX {} ON {} ({})",
            if unique { "UNIQUE " } else { "" },
            self.wrap_value(&index.name),
            self.wrap_table(&table.name),
            self.columnize(&index.columns)
        )]
    }
}

impl SchemaGrammar for SqliteGrammar {
    fn column_type(&self, column: &Column) -> Result<String> {
        Ok(match &column.kind {
            ColumnType::String { .. } | ColumnType::Char { .. } => "VARCHAR".to_string(),
            ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::SmallInteger
            | ColumnType::Boolean => "INTEGER".to_string(),
            ColumnType::Float | ColumnType::Double | ColumnType::Decimal { .. } => {
                "FLOAT".to_string()
            }
            ColumnType::Date
            | ColumnType::DateTime
            | ColumnType::Time
            | ColumnType::Timestamp => "DATETIME".to_string(),
            ColumnType::Text
            | ColumnType::MediumText
            | ColumnType::LongText
            | ColumnType::Json
            | ColumnType::Jsonb
            | ColumnType::Uuid => "TEXT".to_string(),
            ColumnType::IpAddress | ColumnType::MacAddress | ColumnType::Set(_) => {
                "VARCHAR".to_string()
            }
            ColumnType::Blob => "BLOB".to_string(),
            ColumnType::Enum(allowed) => format!("VARCHAR {}", self.check_in(column, allowed)),
            ColumnType::Geometry => "GEOMETRY".to_string(),
            ColumnType::Point => "POINT".to_string(),
            ColumnType::LineString => "LINESTRING".to_string(),
            ColumnType::Polygon => "POLYGON".to_string(),
        })
    }

    fn column_definition(&self, column: &Column) -> Result<String> {
        let mut sql = format!("{} {}", self.wrap(&column.name), self.column_type(column)?);

        sql.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
        if let Some(default) = &column.default {
            sql.push_str(&format!(" DEFAULT {}", self.default_value(default)));
        }
        if column.increment {
            sql.push_str(" PRIMARY KEY AUTOINCREMENT");
        }
        Ok(sql)
    }

    fn compile_create(&self, table: &Table) -> Result<Vec<String>> {
        let mut definitions = self.column_definitions(table)?;
        definitions.extend(self.table_constraints(table)?);

        Ok(vec![format!(
            "CREATE TABLE {} ({})",
            self.wrap_table(&table.name),
            definitions.join(", ")
        )])
    }

    /// One ALTER per column; SQLite cannot change a column in place
    fn compile_add(&self, table: &Table) -> Result<Vec<String>> {
        table
            .columns
            .iter()
            .map(|column| {
                if column.change {
                    return Err(Error::unsupported_with_hint(
                        self.dialect(),
                        "change",
                        "recreate the table instead",
                    ));
                }
                Ok(format!(
                    "ALTER TABLE {} ADD COLUMN {}",
                    self.wrap_table(&table.name),
                    self.column_definition(column)?
                ))
            })
            .collect()
    }

    fn compile_drop_column(&self, table: &Table, columns: &[String]) -> Result<Vec<String>> {
        Ok(columns
            .iter()
            .map(|column| {
                format!(
                    "ALTER TABLE {} DROP COLUMN {}",
                    self.wrap_table(&table.name),
                    self.wrap(column)
                )
            })
            .collect())
    }

    fn compile_rename_column(&self, _table: &Table, _from: &str, _to: &str) -> Result<Vec<String>> {
        Err(Error::unsupported_with_hint(
            self.dialect(),
            "rename_column",
            "recreate the table instead",
        ))
    }

    /// Folded into CREATE TABLE
    fn compile_primary(&self, table: &Table, _index: &IndexCommand) -> Result<Vec<String>> {
        if table.creating() {
            Ok(Vec::new())
        } else {
            Err(self.unsupported("primary"))
        }
    }

    /// Folded into CREATE TABLE
    fn compile_foreign(&self, table: &Table, _foreign: &ForeignKey) -> Result<Vec<String>> {
        if table.creating() {
            Ok(Vec::new())
        } else {
            Err(self.unsupported("foreign"))
        }
    }

    fn compile_unique(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.create_index(table, index, true))
    }

    fn compile_index(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.create_index(table, index, false))
    }

    fn compile_fulltext(&self, _table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(vec![format!(
            "CREATE VIRTUAL TABLE {} USING fts4({})",
            self.wrap_value(&index.name),
            self.columnize(&index.columns)
        )])
    }

    fn compile_drop_unique(&self, _table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(vec![format!("DROP INDEX {}", self.wrap_value(name))])
    }

    fn compile_drop_index(&self, _table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(vec![format!("DROP INDEX {}", self.wrap_value(name))])
    }

    fn compile_drop_fulltext(&self, _table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(vec![format!("DROP TABLE {}", self.wrap_value(name))])
    }

    fn compile_drop_foreign(&self, _table: &Table, _name: &str) -> Result<Vec<String>> {
        Err(self.unsupported("drop_foreign"))
    }

    fn compile_drop_index_if_exists(&self, _table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(vec![format!("DROP INDEX IF EXISTS {}", self.wrap_value(name))])
    }

    fn compile_drop_unique_if_exists(&self, _table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(vec![format!("DROP INDEX IF EXISTS {}", self.wrap_value(name))])
    }

    fn compile_drop_fulltext_if_exists(&self, _table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(vec![format!("DROP TABLE IF EXISTS {}", self.wrap_value(name))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build;

    fn grammar() -> SqliteGrammar {
        SqliteGrammar::default()
    }

    #[test]
    fn test_create_folds_keys_into_table() {
        let mut table = Table::new("memberships");
        table.create();
        table.integer("user_id");
        table.integer("team_id");
        table.enumeration("role", ["owner", "member"]).defaults("member");
        table.primary(("user_id", "team_id"));
        table
            .foreign("team_id")
            .references("id")
            .on("teams")
            .on_delete("cascade");
        table.index("role");

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "CREATE TABLE \"memberships\" (\
                 \"user_id\" INTEGER NOT NULL, \
                 \"team_id\" INTEGER NOT NULL, \
                 \"role\" VARCHAR CHECK (\"role\" IN ('owner', 'member')) NOT NULL DEFAULT 'member', \
                 PRIMARY KEY (\"user_id\", \"team_id\"), \
                 FOREIGN KEY (\"team_id\") REFERENCES \"teams\" (\"id\") ON DELETE cascade)",
                "CREATE INDEX \"memberships_role_index\" ON \"memberships\" (\"role\")",
            ]
        );
    }

    #[test]
    fn test_increments() {
        let mut table = Table::new("users");
        table.create();
        table.increments("id");

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec!["CREATE TABLE \"users\" (\"id\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT)"]
        );
    }

    #[test]
    fn test_add_is_one_statement_per_column() {
        let mut table = Table::new("users");
        table.string("nickname", None).nullable();
        table.boolean("admin").defaults(false);

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "ALTER TABLE \"users\" ADD COLUMN \"nickname\" VARCHAR NULL",
                "ALTER TABLE \"users\" ADD COLUMN \"admin\" INTEGER NOT NULL DEFAULT '0'",
            ]
        );
    }

    #[test]
    fn test_fulltext_and_drops() {
        let mut table = Table::new("posts");
        table.fulltext(("title", "body"));
        table.drop_fulltext_if_exists("posts_title_body_fulltext");
        table.drop_unique("posts_slug_unique");
        table.drop_column(("a", "b"));

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "CREATE VIRTUAL TABLE \"posts_title_body_fulltext\" USING fts4(\"title\", \"body\")",
                "DROP TABLE IF EXISTS \"posts_title_body_fulltext\"",
                "DROP INDEX \"posts_slug_unique\"",
                "ALTER TABLE \"posts\" DROP COLUMN \"a\"",
                "ALTER TABLE \"posts\" DROP COLUMN \"b\"",
            ]
        );
    }

    #[test]
    fn test_unsupported_operations() {
        let mut table = Table::new("posts");
        table.rename_column("a", "b");
        let err = build(&mut table, &grammar()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The sqlite grammar does not support rename_column; recreate the table instead"
        );

        let mut table = Table::new("posts");
        table.primary("id");
        assert!(matches!(
            build(&mut table, &grammar()),
            Err(Error::Unsupported { .. })
        ));

        let mut table = Table::new("places");
        table.spatial("location");
        assert!(build(&mut table, &grammar()).is_err());

        let mut table = Table::new("users");
        table.text("bio").change();
        assert!(build(&mut table, &grammar()).is_err());
    }
}
