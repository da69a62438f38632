//! Configuration management

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::application::messaging::AccessSettings;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub access: AccessConfig,
    pub budget: BudgetConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Authorization and routing of privileged traffic.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccessConfig {
    /// Handles allowed to run `/admin` and `/myFund`.
    pub admin_handles: Vec<String>,
    /// Chat that receives error diagnostics.
    pub operator_chat: i64,
    /// Handle shown in the group-chat notice.
    pub owner_handle: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BudgetConfig {
    pub monthly_limit: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "riel-bot".to_string(),
                token: None,
            },
            database: DatabaseConfig {
                path: PathBuf::from("riel-bot.db"),
            },
            access: AccessConfig {
                admin_handles: vec!["Lyhor_Hieng".to_string()],
                operator_chat: -1002542448425,
                owner_handle: "Lyhor_Hieng".to_string(),
            },
            budget: BudgetConfig {
                monthly_limit: Decimal::new(50000, 2),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("failed to parse config: {}", e)))
    }

    /// Defaults with environment overrides (`BOT_TOKEN`).
    pub fn load_env() -> Self {
        let mut config = Config::default();
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            config.bot.token = Some(token);
        }
        config
    }

    /// The settings slice the dispatcher is constructed with.
    pub fn access_settings(&self) -> AccessSettings {
        AccessSettings {
            admin_handles: self
                .access
                .admin_handles
                .iter()
                .cloned()
                .collect::<HashSet<String>>(),
            operator_chat: self.access.operator_chat,
            owner_handle: self.access.owner_handle.clone(),
            monthly_budget: self.budget.monthly_limit,
        }
    }
}
