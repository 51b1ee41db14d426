//! Connection configuration

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Settings a [`Database`](crate::Database) needs to pick its grammars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Driver name: `mysql`, `sqlite`, `pgsql` or `sqlsrv`
    pub driver: String,
    /// Prepended to every table name
    #[serde(default)]
    pub prefix: String,
    /// Connection name checked against schema tables bound to a connection
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    "default".to_string()
}

impl Config {
    pub fn new(driver: &str) -> Self {
        Self {
            driver: driver.to_string(),
            prefix: String::new(),
            name: default_name(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Parsed driver, failing for names without a dedicated grammar
    pub fn driver(&self) -> Result<Driver, Error> {
        self.driver.parse()
    }
}

/// Database drivers with dedicated grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    MySql,
    Sqlite,
    Postgres,
    SqlServer,
}

impl FromStr for Driver {
    type Err = Error;

    fn from_str(driver: &str) -> Result<Self, Self::Err> {
        match driver.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Driver::MySql),
            "sqlite" => Ok(Driver::Sqlite),
            "pgsql" => Ok(Driver::Postgres),
            "sqlsrv" => Ok(Driver::SqlServer),
            _ => Err(Error::unsupported_driver(driver)),
        }
    }
}

impl Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::MySql => write!(f, "mysql"),
            Driver::Sqlite => write!(f, "sqlite"),
            Driver::Postgres => write!(f, "pgsql"),
            Driver::SqlServer => write!(f, "sqlsrv"),
        }
    }
}
