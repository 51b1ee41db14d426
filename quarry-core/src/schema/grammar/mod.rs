//! Schema grammars
//!
//! Each dialect's grammar struct implements both [`QueryGrammar`] and
//! [`SchemaGrammar`], so identifier quoting and prefixes are shared.
//! The trait's defaults render the ANSI forms; anything a dialect leaves
//! alone fails with [`Error::Unsupported`].
//!
//! [`QueryGrammar`]: crate::query::QueryGrammar

mod mysql;
mod postgres;
mod sqlite;
mod sqlserver;

use super::command::{Command, ForeignKey, IndexCommand};
use super::{Column, Table};
use crate::config::Driver;
use crate::grammar::Grammar;
use crate::query::grammar::{MySqlGrammar, PostgresGrammar, SqlServerGrammar, SqliteGrammar};
use crate::{Error, Result, Value};

/// Compiles table commands into ordered DDL statements
pub trait SchemaGrammar: Grammar + Send + Sync {
    /// Concrete column type for this dialect
    fn column_type(&self, column: &Column) -> Result<String>;

    /// Full column definition: name, type and modifiers
    fn column_definition(&self, column: &Column) -> Result<String>;

    /// Compile one command; the statements run in the returned order
    fn compile(&self, table: &Table, command: &Command) -> Result<Vec<String>> {
        match command {
            Command::Create => self.compile_create(table),
            Command::Add => self.compile_add(table),
            Command::Rename { to } => self.compile_rename(table, to),
            Command::Drop => self.compile_drop(table),
            Command::DropIfExists => self.compile_drop_if_exists(table),
            Command::DropColumn { columns } => self.compile_drop_column(table, columns),
            Command::DropColumnIfExists { columns } => {
                self.compile_drop_column_if_exists(table, columns)
            }
            Command::RenameColumn { from, to } => self.compile_rename_column(table, from, to),
            Command::Primary(index) => self.compile_primary(table, index),
            Command::Unique(index) => self.compile_unique(table, index),
            Command::Fulltext(index) => self.compile_fulltext(table, index),
            Command::Index(index) => self.compile_index(table, index),
            Command::Spatial(index) => self.compile_spatial(table, index),
            Command::Foreign(foreign) => self.compile_foreign(table, foreign),
            Command::DropPrimary { name } => self.compile_drop_primary(table, name.as_deref()),
            Command::DropUnique { name } => self.compile_drop_unique(table, name),
            Command::DropFulltext { name } => self.compile_drop_fulltext(table, name),
            Command::DropIndex { name } => self.compile_drop_index(table, name),
            Command::DropSpatial { name } => self.compile_drop_spatial(table, name),
            Command::DropForeign { name } => self.compile_drop_foreign(table, name),
            Command::DropIndexIfExists { name } => self.compile_drop_index_if_exists(table, name),
            Command::DropUniqueIfExists { name } => {
                self.compile_drop_unique_if_exists(table, name)
            }
            Command::DropFulltextIfExists { name } => {
                self.compile_drop_fulltext_if_exists(table, name)
            }
            Command::DropForeignIfExists { name } => {
                self.compile_drop_foreign_if_exists(table, name)
            }
        }
    }

    /// Error for an operation this dialect cannot express
    fn unsupported(&self, operation: &str) -> Error {
        Error::unsupported(self.dialect(), operation)
    }

    /// Definitions of every queued column, in order
    fn column_definitions(&self, table: &Table) -> Result<Vec<String>> {
        table
            .columns
            .iter()
            .map(|column| self.column_definition(column))
            .collect()
    }

    /// Literal for a column default; raw values go in verbatim
    fn default_value(&self, value: &Value) -> String {
        match value {
            Value::Raw(sql) => sql.clone(),
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => quote_string(if *b { "1" } else { "0" }),
            Value::I32(i) => quote_string(&i.to_string()),
            Value::I64(i) => quote_string(&i.to_string()),
            Value::F32(f) => quote_string(&f.to_string()),
            Value::F64(f) => quote_string(&f.to_string()),
            Value::String(s) => quote_string(s),
            Value::Bytes(b) => quote_string(&String::from_utf8_lossy(b)),
            Value::Json(j) => quote_string(&j.to_string()),
        }
    }

    /// `CHECK (col IN ('a', 'b'))` constraint for enumerations
    fn check_in(&self, column: &Column, allowed: &[String]) -> String {
        format!(
            "CHECK ({} IN ({}))",
            self.wrap(&column.name),
            quote_list(allowed)
        )
    }

    fn compile_create(&self, _table: &Table) -> Result<Vec<String>> {
        Err(self.unsupported("create"))
    }

    fn compile_add(&self, _table: &Table) -> Result<Vec<String>> {
        Err(self.unsupported("add"))
    }

    fn compile_rename(&self, table: &Table, to: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "ALTER TABLE {} RENAME TO {}",
            self.wrap_table(&table.name),
            self.wrap_table(to)
        )])
    }

    fn compile_drop(&self, table: &Table) -> Result<Vec<String>> {
        Ok(vec![format!("DROP TABLE {}", self.wrap_table(&table.name))])
    }

    fn compile_drop_if_exists(&self, table: &Table) -> Result<Vec<String>> {
        Ok(vec![format!(
            "DROP TABLE IF EXISTS {}",
            self.wrap_table(&table.name)
        )])
    }

    fn compile_drop_column(&self, _table: &Table, _columns: &[String]) -> Result<Vec<String>> {
        Err(self.unsupported("drop_column"))
    }

    fn compile_drop_column_if_exists(
        &self,
        _table: &Table,
        _columns: &[String],
    ) -> Result<Vec<String>> {
        Err(self.unsupported("drop_column_if_exists"))
    }

    fn compile_rename_column(&self, _table: &Table, _from: &str, _to: &str) -> Result<Vec<String>> {
        Err(self.unsupported("rename_column"))
    }

    fn compile_primary(&self, _table: &Table, _index: &IndexCommand) -> Result<Vec<String>> {
        Err(self.unsupported("primary"))
    }

    fn compile_unique(&self, _table: &Table, _index: &IndexCommand) -> Result<Vec<String>> {
        Err(self.unsupported("unique"))
    }

    fn compile_fulltext(&self, _table: &Table, _index: &IndexCommand) -> Result<Vec<String>> {
        Err(self.unsupported("fulltext"))
    }

    fn compile_index(&self, _table: &Table, _index: &IndexCommand) -> Result<Vec<String>> {
        Err(self.unsupported("index"))
    }

    fn compile_spatial(&self, _table: &Table, _index: &IndexCommand) -> Result<Vec<String>> {
        Err(self.unsupported("spatial"))
    }

    fn compile_foreign(&self, table: &Table, foreign: &ForeignKey) -> Result<Vec<String>> {
        Ok(vec![format!(
            "ALTER TABLE {} ADD {}",
            self.wrap_table(&table.name),
            self.foreign_constraint(foreign)?
        )])
    }

    /// `CONSTRAINT name FOREIGN KEY (..) REFERENCES ..` clause
    fn foreign_constraint(&self, foreign: &ForeignKey) -> Result<String> {
        Ok(format!(
            "CONSTRAINT {} {}",
            self.wrap_value(&foreign.name),
            self.foreign_reference(foreign)?
        ))
    }

    /// `FOREIGN KEY (..) REFERENCES t (..) [ON DELETE ..] [ON UPDATE ..]`
    fn foreign_reference(&self, foreign: &ForeignKey) -> Result<String> {
        let on = foreign.on.as_deref().ok_or_else(|| {
            Error::invalid_query(format!(
                "Foreign key [{}] has no referenced table",
                foreign.name
            ))
        })?;
        if foreign.references.is_empty() {
            return Err(Error::invalid_query(format!(
                "Foreign key [{}] has no referenced columns",
                foreign.name
            )));
        }

        let mut sql = format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            self.columnize(&foreign.columns),
            self.wrap_table(on),
            self.columnize(&foreign.references)
        );
        if let Some(action) = &foreign.on_delete {
            sql.push_str(&format!(" ON DELETE {action}"));
        }
        if let Some(action) = &foreign.on_update {
            sql.push_str(&format!(" ON UPDATE {action}"));
        }
        Ok(sql)
    }

    fn compile_drop_primary(&self, _table: &Table, _name: Option<&str>) -> Result<Vec<String>> {
        Err(self.unsupported("drop_primary"))
    }

    fn compile_drop_unique(&self, _table: &Table, _name: &str) -> Result<Vec<String>> {
        Err(self.unsupported("drop_unique"))
    }

    fn compile_drop_fulltext(&self, _table: &Table, _name: &str) -> Result<Vec<String>> {
        Err(self.unsupported("drop_fulltext"))
    }

    fn compile_drop_index(&self, _table: &Table, _name: &str) -> Result<Vec<String>> {
        Err(self.unsupported("drop_index"))
    }

    fn compile_drop_spatial(&self, _table: &Table, _name: &str) -> Result<Vec<String>> {
        Err(self.unsupported("drop_spatial"))
    }

    fn compile_drop_foreign(&self, table: &Table, name: &str) -> Result<Vec<String>> {
        Ok(vec![format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.wrap_table(&table.name),
            self.wrap_value(name)
        )])
    }

    fn compile_drop_index_if_exists(&self, _table: &Table, _name: &str) -> Result<Vec<String>> {
        Err(self.unsupported("drop_index_if_exists"))
    }

    fn compile_drop_unique_if_exists(&self, _table: &Table, _name: &str) -> Result<Vec<String>> {
        Err(self.unsupported("drop_unique_if_exists"))
    }

    fn compile_drop_fulltext_if_exists(&self, _table: &Table, _name: &str) -> Result<Vec<String>> {
        Err(self.unsupported("drop_fulltext_if_exists"))
    }

    fn compile_drop_foreign_if_exists(&self, _table: &Table, _name: &str) -> Result<Vec<String>> {
        Err(self.unsupported("drop_foreign_if_exists"))
    }
}

/// Single-quoted SQL string literal
pub(crate) fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Comma-joined string literals
pub(crate) fn quote_list(values: &[String]) -> String {
    values
        .iter()
        .map(|value| quote_string(value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Schema grammar for a driver name; unknown drivers have none
pub fn for_driver(driver: &str, prefix: &str) -> Result<Box<dyn SchemaGrammar>> {
    Ok(match driver.parse::<Driver>()? {
        Driver::MySql => Box::new(MySqlGrammar::new(prefix)),
        Driver::Sqlite => Box::new(SqliteGrammar::new(prefix)),
        Driver::Postgres => Box::new(PostgresGrammar::new(prefix)),
        Driver::SqlServer => Box::new(SqlServerGrammar::new(prefix)),
    })
}
