//! The table blueprint: queued columns and commands

use super::column::{Column, ColumnType};
use super::command::{Command, ForeignKey, IndexCommand, IndexKind};
use crate::query::IntoColumns;

/// Columns and commands for one table, compiled by a schema grammar
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    /// Connection the table must be built on; checked against the database
    pub connection: Option<String>,
    pub engine: Option<String>,
    pub charset: Option<String>,
    pub collation: Option<String>,
    pub columns: Vec<Column>,
    pub commands: Vec<Command>,
    pub(crate) implied: bool,
}

impl Table {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            connection: None,
            engine: None,
            charset: None,
            collation: None,
            columns: Vec::new(),
            commands: Vec::new(),
            implied: false,
        }
    }

    /// Bind the table to a named connection
    pub fn on(&mut self, connection: &str) -> &mut Self {
        self.connection = Some(connection.to_string());
        self
    }

    pub fn engine(&mut self, engine: &str) -> &mut Self {
        self.engine = Some(engine.to_string());
        self
    }

    pub fn charset(&mut self, charset: &str) -> &mut Self {
        self.charset = Some(charset.to_string());
        self
    }

    pub fn collation(&mut self, collation: &str) -> &mut Self {
        self.collation = Some(collation.to_string());
        self
    }

    /// Whether a `create` command is queued
    pub fn creating(&self) -> bool {
        self.commands
            .iter()
            .any(|command| matches!(command, Command::Create))
    }

    // ---------------------------------------------------------------------
    // Table commands
    // ---------------------------------------------------------------------

    pub fn create(&mut self) {
        self.commands.push(Command::Create);
    }

    pub fn rename(&mut self, to: &str) {
        self.commands.push(Command::Rename { to: to.to_string() });
    }

    pub fn drop(&mut self) {
        self.commands.push(Command::Drop);
    }

    pub fn drop_if_exists(&mut self) {
        self.commands.push(Command::DropIfExists);
    }

    pub fn drop_column<C>(&mut self, columns: C)
    where
        C: IntoColumns,
    {
        self.commands.push(Command::DropColumn {
            columns: columns.into_columns(),
        });
    }

    pub fn drop_column_if_exists<C>(&mut self, columns: C)
    where
        C: IntoColumns,
    {
        self.commands.push(Command::DropColumnIfExists {
            columns: columns.into_columns(),
        });
    }

    pub fn rename_column(&mut self, from: &str, to: &str) {
        self.commands.push(Command::RenameColumn {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    // ---------------------------------------------------------------------
    // Indexes and keys
    // ---------------------------------------------------------------------

    pub fn primary<C>(&mut self, columns: C) -> &mut IndexCommand
    where
        C: IntoColumns,
    {
        self.key(IndexKind::Primary, columns.into_columns())
    }

    pub fn unique<C>(&mut self, columns: C) -> &mut IndexCommand
    where
        C: IntoColumns,
    {
        self.key(IndexKind::Unique, columns.into_columns())
    }

    pub fn fulltext<C>(&mut self, columns: C) -> &mut IndexCommand
    where
        C: IntoColumns,
    {
        self.key(IndexKind::Fulltext, columns.into_columns())
    }

    pub fn index<C>(&mut self, columns: C) -> &mut IndexCommand
    where
        C: IntoColumns,
    {
        self.key(IndexKind::Index, columns.into_columns())
    }

    pub fn spatial<C>(&mut self, columns: C) -> &mut IndexCommand
    where
        C: IntoColumns,
    {
        self.key(IndexKind::Spatial, columns.into_columns())
    }

    /// Queue an index of the given kind
    pub fn key(&mut self, kind: IndexKind, columns: Vec<String>) -> &mut IndexCommand {
        let index = IndexCommand::new(kind, &self.name, columns);
        self.commands.push(kind.command(index));
        match self.commands.last_mut().and_then(Command::as_index_mut) {
            Some(index) => index,
            None => unreachable!("an index command was just queued"),
        }
    }

    /// Queue a foreign key; finish it with `references` and `on`
    pub fn foreign<C>(&mut self, columns: C) -> &mut ForeignKey
    where
        C: IntoColumns,
    {
        let foreign = ForeignKey::new(&self.name, columns.into_columns());
        self.commands.push(Command::Foreign(foreign));
        match self.commands.last_mut().and_then(Command::as_foreign_mut) {
            Some(foreign) => foreign,
            None => unreachable!("a foreign key command was just queued"),
        }
    }

    /// Drop the primary key; `None` uses the `{table}_pkey` convention
    pub fn drop_primary(&mut self, name: Option<&str>) {
        self.commands.push(Command::DropPrimary {
            name: name.map(str::to_string),
        });
    }

    pub fn drop_unique(&mut self, name: &str) {
        self.commands.push(Command::DropUnique { name: name.to_string() });
    }

    pub fn drop_fulltext(&mut self, name: &str) {
        self.commands.push(Command::DropFulltext { name: name.to_string() });
    }

    pub fn drop_index(&mut self, name: &str) {
        self.commands.push(Command::DropIndex { name: name.to_string() });
    }

    pub fn drop_spatial(&mut self, name: &str) {
        self.commands.push(Command::DropSpatial { name: name.to_string() });
    }

    pub fn drop_foreign(&mut self, name: &str) {
        self.commands.push(Command::DropForeign { name: name.to_string() });
    }

    pub fn drop_index_if_exists(&mut self, name: &str) {
        self.commands
            .push(Command::DropIndexIfExists { name: name.to_string() });
    }

    pub fn drop_unique_if_exists(&mut self, name: &str) {
        self.commands
            .push(Command::DropUniqueIfExists { name: name.to_string() });
    }

    pub fn drop_fulltext_if_exists(&mut self, name: &str) {
        self.commands
            .push(Command::DropFulltextIfExists { name: name.to_string() });
    }

    pub fn drop_foreign_if_exists(&mut self, name: &str) {
        self.commands
            .push(Command::DropForeignIfExists { name: name.to_string() });
    }

    // ---------------------------------------------------------------------
    // Columns
    // ---------------------------------------------------------------------

    /// Queue a column of any type
    pub fn column(&mut self, name: &str, kind: ColumnType) -> &mut Column {
        self.columns.push(Column::new(name, kind));
        let last = self.columns.len() - 1;
        &mut self.columns[last]
    }

    /// Auto-incrementing integer primary key
    pub fn increments(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Integer).increment()
    }

    /// Auto-incrementing big integer primary key
    pub fn big_increments(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::BigInteger).increment()
    }

    /// Variable-length string, 200 characters unless given
    pub fn string(&mut self, name: &str, length: Option<u32>) -> &mut Column {
        let length = length.unwrap_or(200);
        self.column(name, ColumnType::String { length })
    }

    pub fn char(&mut self, name: &str, length: u32) -> &mut Column {
        self.column(name, ColumnType::Char { length })
    }

    pub fn integer(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Integer)
    }

    pub fn big_integer(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::BigInteger)
    }

    pub fn small_integer(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::SmallInteger)
    }

    pub fn float(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Float)
    }

    pub fn double(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Double)
    }

    pub fn decimal(&mut self, name: &str, precision: u32, scale: u32) -> &mut Column {
        self.column(name, ColumnType::Decimal { precision, scale })
    }

    pub fn boolean(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Boolean)
    }

    pub fn date(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Date)
    }

    pub fn date_time(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::DateTime)
    }

    pub fn time(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Time)
    }

    pub fn timestamp(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Timestamp)
    }

    /// Nullable `created_at` and `updated_at` date-time columns
    pub fn timestamps(&mut self) {
        self.date_time("created_at").nullable();
        self.date_time("updated_at").nullable();
    }

    pub fn text(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Text)
    }

    pub fn medium_text(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::MediumText)
    }

    pub fn long_text(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::LongText)
    }

    pub fn blob(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Blob)
    }

    pub fn json(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Json)
    }

    pub fn jsonb(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Jsonb)
    }

    pub fn uuid(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Uuid)
    }

    pub fn ip_address(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::IpAddress)
    }

    pub fn mac_address(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::MacAddress)
    }

    pub fn enumeration<C>(&mut self, name: &str, allowed: C) -> &mut Column
    where
        C: IntoColumns,
    {
        self.column(name, ColumnType::Enum(allowed.into_columns()))
    }

    pub fn set<C>(&mut self, name: &str, allowed: C) -> &mut Column
    where
        C: IntoColumns,
    {
        self.column(name, ColumnType::Set(allowed.into_columns()))
    }

    pub fn geometry(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Geometry)
    }

    pub fn point(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Point)
    }

    pub fn line_string(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::LineString)
    }

    pub fn polygon(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Polygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creating_flag() {
        let mut table = Table::new("users");
        assert!(!table.creating());
        table.create();
        assert!(table.creating());
    }

    #[test]
    fn test_columns_are_queued_in_order() {
        let mut table = Table::new("users");
        table.increments("id");
        table.string("email", None).unique();
        table.timestamps();

        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "created_at", "updated_at"]);
        assert!(table.columns[0].increment);
        assert_eq!(table.columns[1].kind, ColumnType::String { length: 200 });
        assert!(table.columns[3].nullable);
    }

    #[test]
    fn test_index_commands_take_custom_names() {
        let mut table = Table::new("posts");
        table.unique(("user_id", "slug")).named("posts_slug_per_user");
        table.fulltext("body").catalog("posts_catalog").key("posts_pk");

        match &table.commands[0] {
            Command::Unique(index) => {
                assert_eq!(index.name, "posts_slug_per_user");
                assert_eq!(index.columns, vec!["user_id", "slug"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
        match &table.commands[1] {
            Command::Fulltext(index) => {
                assert_eq!(index.name, "posts_body_fulltext");
                assert_eq!(index.key.as_deref(), Some("posts_pk"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_foreign_returns_builder() {
        let mut table = Table::new("posts");
        table
            .foreign("user_id")
            .references("id")
            .on("users")
            .on_update("cascade");

        match &table.commands[0] {
            Command::Foreign(foreign) => {
                assert_eq!(foreign.name, "posts_user_id_foreign");
                assert_eq!(foreign.on_update.as_deref(), Some("cascade"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
