//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `ALLOCATIONS_*` environment variables and an
//! optional configuration file, in the precedence order OrthoConfig applies.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

/// Default store connection string.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432";

/// Default database name.
pub const DEFAULT_DATABASE_NAME: &str = "vehicle_allocation_db";

/// Errors raised while resolving settings into connection parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The configured database URL could not be parsed.
    #[error("invalid database url {url:?}: {message}")]
    InvalidDatabaseUrl { url: String, message: String },

    /// The configured database name is blank.
    #[error("database name must not be empty")]
    EmptyDatabaseName,
}

/// Configuration for the allocation service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ALLOCATIONS")]
pub struct AllocationSettings {
    /// Store connection string without the database path.
    pub database_url: Option<String>,
    /// Database holding the `allocations` table.
    pub database_name: Option<String>,
    /// Serve from the in-memory repository instead of PostgreSQL.
    #[ortho_config(default = false)]
    pub in_memory: bool,
}

impl AllocationSettings {
    /// Return the configured connection string, falling back to the default.
    pub fn database_url(&self) -> &str {
        self.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL)
    }

    /// Return the configured database name, falling back to the default.
    pub fn database_name(&self) -> &str {
        self.database_name
            .as_deref()
            .unwrap_or(DEFAULT_DATABASE_NAME)
    }

    /// Full connection URL with the database name as its path.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the URL does not parse or the name is
    /// blank.
    pub fn connection_url(&self) -> Result<String, SettingsError> {
        let name = self.database_name().trim();
        if name.is_empty() {
            return Err(SettingsError::EmptyDatabaseName);
        }
        let raw = self.database_url();
        let mut url = Url::parse(raw).map_err(|err| SettingsError::InvalidDatabaseUrl {
            url: raw.to_owned(),
            message: err.to_string(),
        })?;
        url.set_path(name);
        Ok(url.into())
    }
}
