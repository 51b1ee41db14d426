//! Schema commands queued on a table

use std::fmt::{self, Display};

/// Kinds of index a column or command can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Primary,
    Unique,
    Fulltext,
    Index,
    Spatial,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Primary => "primary",
            IndexKind::Unique => "unique",
            IndexKind::Fulltext => "fulltext",
            IndexKind::Index => "index",
            IndexKind::Spatial => "spatial",
        }
    }

    /// Wrap an index definition in the matching command
    pub fn command(self, index: IndexCommand) -> Command {
        match self {
            IndexKind::Primary => Command::Primary(index),
            IndexKind::Unique => Command::Unique(index),
            IndexKind::Fulltext => Command::Fulltext(index),
            IndexKind::Index => Command::Index(index),
            IndexKind::Spatial => Command::Spatial(index),
        }
    }
}

impl Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default index name: `{table}_{columns}_{kind}`, lowercased, with `-` and
/// `.` replaced by `_`
pub fn index_name(table: &str, columns: &[String], kind: &str) -> String {
    format!("{}_{}_{}", table, columns.join("_"), kind)
        .to_lowercase()
        .replace(['-', '.'], "_")
}

/// An index to create
#[derive(Debug, Clone, PartialEq)]
pub struct IndexCommand {
    pub kind: IndexKind,
    pub name: String,
    pub columns: Vec<String>,
    /// Full-text catalog (SQL Server)
    pub catalog: Option<String>,
    /// Unique key index the full-text index hangs off (SQL Server)
    pub key: Option<String>,
}

impl IndexCommand {
    pub fn new(kind: IndexKind, table: &str, columns: Vec<String>) -> Self {
        Self {
            kind,
            name: index_name(table, &columns, kind.as_str()),
            columns,
            catalog: None,
            key: None,
        }
    }

    pub fn named(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self
    }

    pub fn catalog(&mut self, catalog: &str) -> &mut Self {
        self.catalog = Some(catalog.to_string());
        self
    }

    pub fn key(&mut self, key: &str) -> &mut Self {
        self.key = Some(key.to_string());
        self
    }
}

/// A foreign key constraint to create
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub references: Vec<String>,
    /// Referenced table
    pub on: Option<String>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
}

impl ForeignKey {
    pub fn new(table: &str, columns: Vec<String>) -> Self {
        Self {
            name: index_name(table, &columns, "foreign"),
            columns,
            references: Vec::new(),
            on: None,
            on_delete: None,
            on_update: None,
        }
    }

    pub fn references<C>(&mut self, columns: C) -> &mut Self
    where
        C: crate::query::IntoColumns,
    {
        self.references = columns.into_columns();
        self
    }

    pub fn on(&mut self, table: &str) -> &mut Self {
        self.on = Some(table.to_string());
        self
    }

    pub fn on_delete(&mut self, action: &str) -> &mut Self {
        self.on_delete = Some(action.to_string());
        self
    }

    pub fn on_update(&mut self, action: &str) -> &mut Self {
        self.on_update = Some(action.to_string());
        self
    }

    pub fn named(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self
    }
}

/// One DDL operation on a table, compiled in queue order
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create,
    /// Add (or change) every queued column
    Add,
    Rename { to: String },
    Drop,
    DropIfExists,
    DropColumn { columns: Vec<String> },
    DropColumnIfExists { columns: Vec<String> },
    RenameColumn { from: String, to: String },
    Primary(IndexCommand),
    Unique(IndexCommand),
    Fulltext(IndexCommand),
    Index(IndexCommand),
    Spatial(IndexCommand),
    Foreign(ForeignKey),
    DropPrimary { name: Option<String> },
    DropUnique { name: String },
    DropFulltext { name: String },
    DropIndex { name: String },
    DropSpatial { name: String },
    DropForeign { name: String },
    DropIndexIfExists { name: String },
    DropUniqueIfExists { name: String },
    DropFulltextIfExists { name: String },
    DropForeignIfExists { name: String },
}

impl Command {
    /// Operation name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Create => "create",
            Command::Add => "add",
            Command::Rename { .. } => "rename",
            Command::Drop => "drop",
            Command::DropIfExists => "drop_if_exists",
            Command::DropColumn { .. } => "drop_column",
            Command::DropColumnIfExists { .. } => "drop_column_if_exists",
            Command::RenameColumn { .. } => "rename_column",
            Command::Primary(_) => "primary",
            Command::Unique(_) => "unique",
            Command::Fulltext(_) => "fulltext",
            Command::Index(_) => "index",
            Command::Spatial(_) => "spatial",
            Command::Foreign(_) => "foreign",
            Command::DropPrimary { .. } => "drop_primary",
            Command::DropUnique { .. } => "drop_unique",
            Command::DropFulltext { .. } => "drop_fulltext",
            Command::DropIndex { .. } => "drop_index",
            Command::DropSpatial { .. } => "drop_spatial",
            Command::DropForeign { .. } => "drop_foreign",
            Command::DropIndexIfExists { .. } => "drop_index_if_exists",
            Command::DropUniqueIfExists { .. } => "drop_unique_if_exists",
            Command::DropFulltextIfExists { .. } => "drop_fulltext_if_exists",
            Command::DropForeignIfExists { .. } => "drop_foreign_if_exists",
        }
    }

    pub(crate) fn as_index_mut(&mut self) -> Option<&mut IndexCommand> {
        match self {
            Command::Primary(index)
            | Command::Unique(index)
            | Command::Fulltext(index)
            | Command::Index(index)
            | Command::Spatial(index) => Some(index),
            _ => None,
        }
    }

    pub(crate) fn as_foreign_mut(&mut self) -> Option<&mut ForeignKey> {
        match self {
            Command::Foreign(foreign) => Some(foreign),
            _ => None,
        }
    }
}
