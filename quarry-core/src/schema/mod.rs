//! Schema building: table blueprints compiled to DDL and run in order
//!
//! ```
//! use quarry_core::schema::{build, Table};
//! use quarry_core::query::grammar::MySqlGrammar;
//!
//! let mut table = Table::new("users");
//! table.create();
//! table.increments("id");
//! table.string("email", None).unique();
//!
//! let statements = build(&mut table, &MySqlGrammar::default()).unwrap();
//! assert_eq!(statements.len(), 2);
//! ```

pub mod column;
pub mod command;
pub mod grammar;
mod table;

pub use column::{Column, ColumnType, InlineIndex};
pub use command::{Command, ForeignKey, IndexCommand, IndexKind};
pub use grammar::SchemaGrammar;
pub use table::Table;

use crate::connection::{Connection, Database};
use crate::{Error, Result};

/// Runs table blueprints against a database
pub struct Schema<'a, C> {
    db: &'a Database<C>,
}

impl<'a, C> Schema<'a, C>
where
    C: Connection,
{
    pub fn new(db: &'a Database<C>) -> Self {
        Self { db }
    }

    /// Create a table, letting `define` queue its columns
    pub async fn create<F>(&self, name: &str, define: F) -> Result<()>
    where
        F: FnOnce(&mut Table),
    {
        let mut table = Table::new(name);
        table.create();
        define(&mut table);
        self.execute(table).await
    }

    /// Alter an existing table
    pub async fn table<F>(&self, name: &str, define: F) -> Result<()>
    where
        F: FnOnce(&mut Table),
    {
        let mut table = Table::new(name);
        define(&mut table);
        self.execute(table).await
    }

    pub async fn rename(&self, from: &str, to: &str) -> Result<()> {
        let mut table = Table::new(from);
        table.rename(to);
        self.execute(table).await
    }

    pub async fn drop(&self, name: &str) -> Result<()> {
        let mut table = Table::new(name);
        table.drop();
        self.execute(table).await
    }

    pub async fn drop_if_exists(&self, name: &str) -> Result<()> {
        let mut table = Table::new(name);
        table.drop_if_exists();
        self.execute(table).await
    }

    /// Compile every command, then run the statements in order.
    ///
    /// A compile error aborts before anything runs; the first failing
    /// statement aborts the rest.
    pub async fn execute(&self, mut table: Table) -> Result<()> {
        if let Some(connection) = &table.connection {
            if connection != &self.db.config().name {
                return Err(Error::invalid_query(format!(
                    "Table [{}] belongs to connection [{}], not [{}]",
                    table.name,
                    connection,
                    self.db.config().name
                )));
            }
        }

        let grammar = self.db.schema_grammar()?;
        let statements = build(&mut table, grammar.as_ref())?;

        for sql in &statements {
            tracing::debug!(target: "quarry.schema", table = %table.name, sql = %sql, "running schema statement");
            self.db.execute(sql, &[]).await?;
        }

        tracing::info!(
            target: "quarry.schema",
            table = %table.name,
            statements = statements.len(),
            "schema updated"
        );
        Ok(())
    }
}

/// Compile a table's commands into statements without running them
pub fn build(table: &mut Table, grammar: &dyn SchemaGrammar) -> Result<Vec<String>> {
    add_implications(table);

    let mut statements = Vec::new();
    for command in &table.commands {
        statements.extend(grammar.compile(table, command)?);
    }
    Ok(statements)
}

/// Queue the commands a blueprint implies: an `add` for columns on an
/// existing table, and an index command for every inline index flag.
/// Runs once per table.
fn add_implications(table: &mut Table) {
    if table.implied {
        return;
    }
    table.implied = true;

    if !table.columns.is_empty() && !table.creating() {
        table.commands.insert(0, Command::Add);
    }

    let mut implied = Vec::new();
    for column in &table.columns {
        for inline in &column.indexes {
            let mut index = IndexCommand::new(inline.kind, &table.name, vec![column.name.clone()]);
            if let Some(name) = &inline.name {
                index.named(name);
            }
            implied.push(inline.kind.command(index));
        }
    }
    table.commands.extend(implied);
}
