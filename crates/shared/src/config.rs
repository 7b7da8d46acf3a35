//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger accounts used when posting a partial reversal.
    #[serde(default)]
    pub accounts: AccountsConfig,
    /// Reversal posting settings.
    #[serde(default)]
    pub reversal: ReversalConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

/// Fixed ledger accounts that mirror the original sale posting.
///
/// The customer's cash-in-hand account is not configured here; it is looked
/// up from the user that owns the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AccountsConfig {
    /// Spare parts sales (revenue) account.
    #[serde(default = "default_sales_account")]
    pub sales_account_id: i64,
    /// Spare parts cost of sales (expense) account.
    #[serde(default = "default_cost_of_sales_account")]
    pub cost_of_sales_account_id: i64,
    /// Stock (inventory asset) account.
    #[serde(default = "default_stock_account")]
    pub stock_account_id: i64,
}

fn default_sales_account() -> i64 {
    200
}

fn default_cost_of_sales_account() -> i64 {
    202
}

fn default_stock_account() -> i64 {
    183
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            sales_account_id: default_sales_account(),
            cost_of_sales_account_id: default_cost_of_sales_account(),
            stock_account_id: default_stock_account(),
        }
    }
}

/// Settings for the financial transaction written by a partial reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReversalConfig {
    /// User recorded as the author of reversal transactions.
    #[serde(default = "default_posted_by_user")]
    pub posted_by_user_id: i64,
}

fn default_posted_by_user() -> i64 {
    1
}

impl Default for ReversalConfig {
    fn default() -> Self {
        Self {
            posted_by_user_id: default_posted_by_user(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_database_url(None)
    }

    /// Loads configuration, letting an explicit database URL win over every
    /// other source.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load_with_database_url(database_url: Option<&str>) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("REVOICE").separator("__"))
            .set_override_option("database.url", database_url)?
            .build()?;

        config.try_deserialize()
    }
}
