//! Secrets and targets read from the process environment.

use syncbot_error::ConfigError;

/// Values that never live in configuration files.
pub struct Environment {
    /// Discord bot token
    pub discord_token: String,
    /// Target guild id
    pub guild_id: String,
    /// Redis `host:port` or `redis://` URL, only needed by commands that
    /// read the snapshot
    pub redis_host: Option<String>,
}

impl Environment {
    /// Read `DISCORD_TOKEN`, `GUILD_ID` and `REDIS_HOST`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first required variable that is
    /// unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            discord_token: require("DISCORD_TOKEN")?,
            guild_id: require("GUILD_ID")?,
            redis_host: require("REDIS_HOST").ok(),
        })
    }

    /// Redis address.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `REDIS_HOST` was not set.
    pub fn redis_host(&self) -> Result<&str, ConfigError> {
        self.redis_host
            .as_deref()
            .ok_or_else(|| ConfigError::new("REDIS_HOST is not set"))
    }
}

fn require(name: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::new(format!("{} is not set", name))),
    }
}
