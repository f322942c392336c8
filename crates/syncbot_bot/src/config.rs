//! Layered configuration for the reconciler.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use syncbot_core::LogFormat;
use syncbot_error::{ConfigError, SyncResult};
use syncbot_social::DEFAULT_MEMBER_LIMIT;

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../syncbot.toml");

/// Reconciler configuration.
///
/// Secrets and the target guild are not part of this file; they come from
/// the environment at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncbotConfig {
    /// Sleep between passes, in seconds
    pub interval_seconds: u64,
    /// Members fetched per pass
    pub member_limit: u64,
    /// Upper bound on any single remote call, in seconds
    pub call_timeout_seconds: u64,
    /// Desired-state store settings
    pub store: StoreSettings,
    /// Emoji asset settings
    pub assets: AssetSettings,
    /// Role protection settings
    pub roles: RoleSettings,
    /// Membership sync settings
    pub members: MemberSettings,
    /// What each syncer does when one item fails
    pub failure_policy: FailurePolicies,
    /// Log output settings
    pub logging: LoggingSettings,
}

impl Default for SyncbotConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 15,
            member_limit: DEFAULT_MEMBER_LIMIT,
            call_timeout_seconds: 10,
            store: StoreSettings::default(),
            assets: AssetSettings::default(),
            roles: RoleSettings::default(),
            members: MemberSettings::default(),
            failure_policy: FailurePolicies::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Desired-state store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Prefix of the `users`, `roles` and `emojis` keys
    pub key_prefix: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            key_prefix: "syncbot".to_string(),
        }
    }
}

/// Emoji asset settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory holding `<name>.png` images
    pub emoji_dir: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            emoji_dir: PathBuf::from("emojis"),
        }
    }
}

/// Roles the reconciler must never touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleSettings {
    /// Role names exempt from reconciliation
    pub protected: Vec<String>,
    /// Name of the bot's own role
    pub bot_role: Option<String>,
}

impl Default for RoleSettings {
    fn default() -> Self {
        Self {
            protected: vec!["@everyone".to_string()],
            bot_role: None,
        }
    }
}

impl RoleSettings {
    /// Configured protected names including the bot role.
    pub fn protected_names(&self) -> impl Iterator<Item = &str> {
        self.protected
            .iter()
            .map(String::as_str)
            .chain(self.bot_role.as_deref())
    }
}

/// When to push a member's desired nickname.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum NicknamePolicy {
    /// Every pass, whether or not it differs
    #[default]
    #[display("always")]
    Always,
    /// Only when the member's effective name differs
    #[display("when_changed")]
    WhenChanged,
}

/// Membership sync settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberSettings {
    /// Nickname push policy
    pub nickname_policy: NicknamePolicy,
    /// Remove roles a member holds but the snapshot does not list
    pub remove_unlisted_roles: bool,
    /// Longest nickname the platform accepts, in characters
    pub max_nickname_length: usize,
}

impl Default for MemberSettings {
    fn default() -> Self {
        Self {
            nickname_policy: NicknamePolicy::Always,
            remove_unlisted_roles: false,
            max_nickname_length: 32,
        }
    }
}

/// Reaction to a failed item mutation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure and move on to the next item
    #[default]
    #[display("continue")]
    Continue,
    /// Abort the pass
    #[display("abort")]
    Abort,
}

/// Failure policy per syncer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailurePolicies {
    /// Role syncer policy
    pub roles: FailurePolicy,
    /// Emoji syncer policy
    pub emojis: FailurePolicy,
    /// Membership syncer policy
    pub members: FailurePolicy,
}

/// Log output settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Line format
    pub format: LogFormat,
}

impl SyncbotConfig {
    /// Load configuration with precedence: environment > explicit file >
    /// current directory > home directory > bundled defaults.
    ///
    /// Sources, later overriding earlier:
    /// 1. Bundled `syncbot.toml`
    /// 2. `~/.config/syncbot/syncbot.toml`
    /// 3. `./syncbot.toml`
    /// 4. `explicit`, which must exist when given
    /// 5. `SYNCBOT__*` variables, e.g. `SYNCBOT__MEMBERS__NICKNAME_POLICY=when_changed`
    ///
    /// `SYNCBOT__ROLES__PROTECTED` takes a comma-separated list.
    ///
    /// Runs before logging is configured, so it emits no log events.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the merged
    /// configuration is invalid.
    pub fn load(explicit: Option<&Path>) -> SyncResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/syncbot/syncbot.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("syncbot").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SYNCBOT")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("roles.protected"),
        );

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_seconds == 0 {
            return Err(ConfigError::new("interval_seconds must be greater than zero"));
        }
        if self.call_timeout_seconds == 0 {
            return Err(ConfigError::new(
                "call_timeout_seconds must be greater than zero",
            ));
        }
        if self.member_limit == 0 || self.member_limit > DEFAULT_MEMBER_LIMIT {
            return Err(ConfigError::new(format!(
                "member_limit must be between 1 and {}",
                DEFAULT_MEMBER_LIMIT
            )));
        }
        if self.members.max_nickname_length == 0 {
            return Err(ConfigError::new(
                "members.max_nickname_length must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Sleep between passes.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    /// Per-call timeout.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults_match_default_impl() {
        let bundled: SyncbotConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(bundled, SyncbotConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = SyncbotConfig {
            interval_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_member_page() {
        assert_eq!(SyncbotConfig::default().member_limit, DEFAULT_MEMBER_LIMIT);
        assert!(SyncbotConfig::default().validate().is_ok());

        let config = SyncbotConfig {
            member_limit: DEFAULT_MEMBER_LIMIT + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_protected_names_include_bot_role() {
        let roles = RoleSettings {
            protected: vec!["@everyone".into()],
            bot_role: Some("Syncbot".into()),
        };
        let names: Vec<&str> = roles.protected_names().collect();
        assert_eq!(names, vec!["@everyone", "Syncbot"]);
    }
}
