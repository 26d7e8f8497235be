use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::model::apperror::{ApplicationError, ErrorType};

/**
 * Environment variables overriding the database and listener settings.
 */
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_PORT: &str = "PORT";

/**
 * Command-line arguments for the application.
 */
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct ApplicationArguments {
    /**
     * Path to the configuration file. Defaults are used when omitted.
     */
    #[arg(short, long)]
    pub config_file: Option<String>,
}

/**
 * Represents the configuration for the application.
 */
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /**
     * Logging configuration for the application.
     */
    pub logging: LoggingConfig,
    /**
     * Server configuration for the application.
     */
    pub server: Server,
    /**
     * Database configuration for the application.
     */
    pub database: Database,
    /**
     * Cross-origin configuration for the application.
     */
    pub cors: CorsConfig,
}

impl Config {
    /**
     * Applies environment overrides on top of the configuration.
     * Empty values are treated as unset.
     *
     * #Arguments
     * `lookup`: Resolves an environment variable name to its value.
     *
     * #Returns
     * The updated configuration or an `ApplicationError` if a port cannot be parsed.
     */
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ApplicationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());
        if let Some(host) = non_empty(ENV_DB_HOST) {
            self.database.host = host;
        }
        if let Some(user) = non_empty(ENV_DB_USER) {
            self.database.user = user;
        }
        if let Some(password) = non_empty(ENV_DB_PASSWORD) {
            self.database.password = password;
        }
        if let Some(name) = non_empty(ENV_DB_NAME) {
            self.database.name = name;
        }
        if let Some(port) = non_empty(ENV_DB_PORT) {
            self.database.port = parse_port(ENV_DB_PORT, &port)?;
        }
        if let Some(port) = non_empty(ENV_PORT) {
            self.server.http_port = parse_port(ENV_PORT, &port)?;
        }
        Ok(self)
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, ApplicationError> {
    value.parse::<u16>().map_err(|err| ApplicationError::new(ErrorType::Initialization, format!("Invalid port {value} in {key}: {err}")))
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /**
     * Whether to log the target of the log message.
     */
    pub target: bool,
    /**
     * Whether to log thread IDs .
     */
    pub thread_ids: bool,
    /**
     * Whether to log thread names.
     */
    pub thread_names: bool,
    /**
     * Whether to log line numbers.
     */
    pub line_number: bool,
    /**
     * Whether to log the log level.
     */
    pub level: bool,
    /**
     * Whether to use ANSI colors in logs.
     */
    pub ansi: bool,
    /**
     * Whether to log the source file.
     */
    pub file: bool,
    /**
     * Additional directives for logging configuration, e.g. `sqlx=warn`.
     */
    pub directives: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig { target: true, thread_ids: false, thread_names: false, line_number: false, level: true, ansi: true, file: false, directives: vec![] }
    }
}

/**
 * Represents the server configuration for the application.
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Server {
    /**
     * Number of worker threads for the server.
     */
    pub workers: usize,
    /**
     * Address to bind.
     */
    pub host: String,
    /**
     * HTTP port for the server.
     */
    pub http_port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Server { workers: 4, host: "0.0.0.0".to_string(), http_port: 8080 }
    }
}

/**
 * Connection and pool settings for `PostgreSQL`. Timeouts are in milliseconds.
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Database {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
    pub idle_timeout: u64,
    pub max_lifetime: u64,
}

impl Default for Database {
    fn default() -> Self {
        Database {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "CACMDesa".to_string(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: 30_000,
            idle_timeout: 300_000,
            max_lifetime: 3_600_000,
        }
    }
}

/**
 * Represents the cross-origin configuration.
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorsConfig {
    /**
     * Origins allowed to call the API with credentials.
     */
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig { allowed_origins: vec!["http://localhost:3000".to_string(), "http://localhost:3001".to_string()] }
    }
}
