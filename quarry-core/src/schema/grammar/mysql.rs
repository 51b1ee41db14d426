use super::{quote_list, quote_string, SchemaGrammar};
use crate::grammar::Grammar;
use crate::query::grammar::MySqlGrammar;
use crate::schema::command::{IndexCommand, IndexKind};
use crate::schema::{Column, ColumnType, Table};
use crate::Result;

impl MySqlGrammar {
    fn alter(&self, table: &Table, clause: String) -> Vec<String> {
        vec![format!(
            "ALTER TABLE {} {}",
            self.wrap_table(&table.name),
            clause
        )]
    }

    fn add_key(&self, table: &Table, index: &IndexCommand) -> Vec<String> {
        let columns = self.columnize(&index.columns);
        let clause = match index.kind {
            IndexKind::Primary => format!("ADD PRIMARY KEY ({columns})"),
            IndexKind::Unique => format!("ADD UNIQUE INDEX {} ({columns})", self.wrap_value(&index.name)),
            IndexKind::Fulltext => {
                format!("ADD FULLTEXT INDEX {} ({columns})", self.wrap_value(&index.name))
            }
            IndexKind::Index => format!("ADD INDEX {} ({columns})", self.wrap_value(&index.name)),
            IndexKind::Spatial => {
                format!("ADD SPATIAL INDEX {} ({columns})", self.wrap_value(&index.name))
            }
        };
        self.alter(table, clause)
    }

    fn drop_key(&self, table: &Table, name: &str) -> Vec<String> {
        self.alter(table, format!("DROP INDEX {}", self.wrap_value(name)))
    }
}

impl SchemaGrammar for MySqlGrammar {
    fn column_type(&self, column: &Column) -> Result<String> {
        Ok(match &column.kind {
            ColumnType::String { length } => format!("VARCHAR({length})"),
            ColumnType::Char { length } => format!("CHAR({length})"),
            ColumnType::Integer => "INT".to_string(),
            ColumnType::BigInteger => "BIGINT".to_string(),
            ColumnType::SmallInteger => "SMALLINT".to_string(),
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::Double => "DOUBLE".to_string(),
            ColumnType::Decimal { precision, scale } => format!("DECIMAL({precision}, {scale})"),
            ColumnType::Boolean => "TINYINT(1)".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::DateTime => "DATETIME".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::MediumText => "MEDIUMTEXT".to_string(),
            ColumnType::LongText => "LONGTEXT".to_string(),
            ColumnType::Blob => "BLOB".to_string(),
            ColumnType::Json | ColumnType::Jsonb => "JSON".to_string(),
            ColumnType::Uuid => "CHAR(36)".to_string(),
            ColumnType::IpAddress => "VARCHAR(45)".to_string(),
            ColumnType::MacAddress => "VARCHAR(17)".to_string(),
            ColumnType::Enum(allowed) => format!("ENUM({})", quote_list(allowed)),
            ColumnType::Set(allowed) => format!("SET({})", quote_list(allowed)),
            ColumnType::Geometry => "GEOMETRY".to_string(),
            ColumnType::Point => "POINT".to_string(),
            ColumnType::LineString => "LINESTRING".to_string(),
            ColumnType::Polygon => "POLYGON".to_string(),
        })
    }

    fn column_definition(&self, column: &Column) -> Result<String> {
        let mut sql = format!("{} {}", self.wrap(&column.name), self.column_type(column)?);

        if column.kind.is_integer() && (column.unsigned || column.increment) {
            sql.push_str(" UNSIGNED");
        }
        if let Some(charset) = &column.charset {
            sql.push_str(&format!(" CHARACTER SET {charset}"));
        }
        if let Some(collation) = &column.collation {
            sql.push_str(&format!(" COLLATE {collation}"));
        }
        sql.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
        if let Some(default) = &column.default {
            sql.push_str(&format!(" DEFAULT {}", self.default_value(default)));
        }
        if column.increment {
            sql.push_str(" AUTO_INCREMENT PRIMARY KEY");
        }
        if let Some(comment) = &column.comment {
            sql.push_str(&format!(" COMMENT {}", quote_string(comment)));
        }
        if let Some(after) = &column.after {
            sql.push_str(&format!(" AFTER {}", self.wrap(after)));
        } else if column.first {
            sql.push_str(" FIRST");
        }
        Ok(sql)
    }

    fn compile_create(&self, table: &Table) -> Result<Vec<String>> {
        let mut sql = format!(
            "CREATE TABLE {} ({})",
            self.wrap_table(&table.name),
            self.column_definitions(table)?.join(", ")
        );
        if let Some(charset) = &table.charset {
            sql.push_str(&format!(" DEFAULT CHARACTER SET {charset}"));
        }
        if let Some(collation) = &table.collation {
            sql.push_str(&format!(" COLLATE {collation}"));
        }
        if let Some(engine) = &table.engine {
            sql.push_str(&format!(" ENGINE = {engine}"));
        }
        Ok(vec![sql])
    }

    fn compile_add(&self, table: &Table) -> Result<Vec<String>> {
        let clauses = table
            .columns
            .iter()
            .map(|column| {
                let verb = if column.change { "MODIFY" } else { "ADD" };
                Ok(format!("{verb} {}", self.column_definition(column)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.alter(table, clauses.join(", ")))
    }

    fn compile_rename(&self, table: &Table, to: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "RENAME TABLE {} TO {}",
            self.wrap_table(&table.name),
            self.wrap_table(to)
        )])
    }

    fn compile_drop_column(&self, table: &Table, columns: &[String]) -> Result<Vec<String>> {
        let clauses: Vec<_> = columns
            .iter()
            .map(|column| format!("DROP {}", self.wrap(column)))
            .collect();
        Ok(self.alter(table, clauses.join(", ")))
    }

    fn compile_rename_column(&self, table: &Table, from: &str, to: &str) -> Result<Vec<String>> {
        Ok(self.alter(
            table,
            format!("RENAME COLUMN {} TO {}", self.wrap(from), self.wrap(to)),
        ))
    }

    fn compile_primary(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.add_key(table, index))
    }

    fn compile_unique(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.add_key(table, index))
    }

    fn compile_fulltext(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.add_key(table, index))
    }

    fn compile_index(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.add_key(table, index))
    }

    fn compile_spatial(&self, table: &Table, index: &IndexCommand) -> Result<Vec<String>> {
        Ok(self.add_key(table, index))
    }

    /// MySQL tables have one primary key, dropped without a name
    fn compile_drop_primary(&self, table: &Table, _name: Option<&str>) -> Result<Vec<String>> {
        Ok(self.alter(table, "DROP PRIMARY KEY".to_string()))
    }

    fn compile_drop_unique(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_key(table, name))
    }

    fn compile_drop_fulltext(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_key(table, name))
    }

    fn compile_drop_index(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_key(table, name))
    }

    fn compile_drop_spatial(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.drop_key(table, name))
    }

    fn compile_drop_foreign(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(self.alter(table, format!("DROP FOREIGN KEY {}", self.wrap_value(name))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build;
    use crate::{raw, Error};

    fn grammar() -> MySqlGrammar {
        MySqlGrammar::default()
    }

    #[test]
    fn test_create_table() {
        let mut table = Table::new("users");
        table.create();
        table.increments("id");
        table.string("email", Some(100)).unique();
        table.integer("votes").unsigned().defaults(0).comment("net votes");
        table.timestamp("seen_at").defaults(raw("CURRENT_TIMESTAMP"));
        table.engine("InnoDB").charset("utf8mb4").collation("utf8mb4_unicode_ci");

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "CREATE TABLE `users` (\
                 `id` INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY, \
                 `email` VARCHAR(100) NOT NULL, \
                 `votes` INT UNSIGNED NOT NULL DEFAULT '0' COMMENT 'net votes', \
                 `seen_at` TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP) \
                 DEFAULT CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci ENGINE = InnoDB",
                "ALTER TABLE `users` ADD UNIQUE INDEX `users_email_unique` (`email`)",
            ]
        );
    }

    #[test]
    fn test_add_and_modify_columns() {
        let mut table = Table::new("users");
        table.string("nickname", None).nullable().after("name");
        table.text("bio").change();

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "ALTER TABLE `users` ADD `nickname` VARCHAR(200) NULL AFTER `name`, \
                 MODIFY `bio` TEXT NOT NULL"
            ]
        );
    }

    #[test]
    fn test_index_commands() {
        let mut table = Table::new("posts");
        table.primary(("id", "version"));
        table.fulltext("body");
        table.spatial("location").named("posts_location");
        table.index("slug");

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "ALTER TABLE `posts` ADD PRIMARY KEY (`id`, `version`)",
                "ALTER TABLE `posts` ADD FULLTEXT INDEX `posts_body_fulltext` (`body`)",
                "ALTER TABLE `posts` ADD SPATIAL INDEX `posts_location` (`location`)",
                "ALTER TABLE `posts` ADD INDEX `posts_slug_index` (`slug`)",
            ]
        );
    }

    #[test]
    fn test_drops_and_renames() {
        let mut table = Table::new("posts");
        table.drop_column(("title", "body"));
        table.rename_column("slug", "permalink");
        table.drop_primary(None);
        table.drop_unique("posts_slug_unique");
        table.drop_foreign("posts_user_id_foreign");
        table.rename("articles");

        assert_eq!(
            build(&mut table, &grammar()).unwrap(),
            vec![
                "ALTER TABLE `posts` DROP `title`, DROP `body`",
                "ALTER TABLE `posts` RENAME COLUMN `slug` TO `permalink`",
                "ALTER TABLE `posts` DROP PRIMARY KEY",
                "ALTER TABLE `posts` DROP INDEX `posts_slug_unique`",
                "ALTER TABLE `posts` DROP FOREIGN KEY `posts_user_id_foreign`",
                "RENAME TABLE `posts` TO `articles`",
            ]
        );
    }

    #[test]
    fn test_if_exists_drops_are_unsupported() {
        let mut table = Table::new("posts");
        table.drop_index_if_exists("posts_slug_index");
        let err = build(&mut table, &grammar()).unwrap_err();
        assert!(matches!(err, Error::Unsupported { dialect: "mysql", .. }));
    }

    #[test]
    fn test_type_map() {
        let mut table = Table::new("things");
        table.boolean("active");
        table.uuid("token");
        table.enumeration("size", ["s", "m"]);
        table.set("tags", ["a", "b"]);
        table.decimal("price", 8, 2);

        let types: Vec<_> = table
            .columns
            .iter()
            .map(|column| grammar().column_type(column).unwrap())
            .collect();
        assert_eq!(
            types,
            vec!["TINYINT(1)", "CHAR(36)", "ENUM('s', 'm')", "SET('a', 'b')", "DECIMAL(8, 2)"]
        );
    }
}
