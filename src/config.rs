use clap::ValueEnum;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HandlerError;
use crate::event::Event;
use crate::template::DEFAULT_TEMPLATE;

/// Name used in logs, annotations and the config directory
pub const HANDLER_NAME: &str = "sensu-discord-handler";

/// Annotation keyspace: `<KEYSPACE>/<option>` on the check or entity
pub const KEYSPACE: &str = "sensu.io/plugins/sensu-discord-handler/config";

pub const OPT_WEBHOOK_URL: &str = "webhook-url";
pub const OPT_CUSTOM_USERNAME: &str = "custom-username";
pub const OPT_CUSTOM_AVATAR_URL: &str = "custom-avatar-url";
pub const OPT_DESCRIPTION_TEMPLATE: &str = "description-template";
pub const OPT_ALERT_ON_CRITICAL: &str = "alert-on-critical";
pub const OPT_ALERT_MENTION: &str = "alert-mention";

pub const DEFAULT_ALERT_MENTION: &str = "@everyone";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// One source of settings. Unset fields fall through to the next layer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConfigLayer {
    pub webhook_url: Option<String>,
    pub custom_username: Option<String>,
    pub custom_avatar_url: Option<String>,
    pub description_template: Option<String>,
    pub alert_on_critical: Option<bool>,
    pub alert_mention: Option<String>,
    pub log_level: Option<LogLevel>,
}

impl ConfigLayer {
    /// Load the file layer.
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// used when present, otherwise the layer is empty.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            let path = expand_path(path);
            return Self::load_from_file(&path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join(HANDLER_NAME).join("config.yaml");
            if path.exists() {
                return Self::load_from_file(&path).context(format!("Failed to load config from {}", path.display()));
            }
        }

        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let layer: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(layer)
    }
}

/// Expand a path that may contain ~ or env vars
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
    PathBuf::from(expanded.as_ref())
}

/// Resolved handler settings, fixed for the rest of the run
#[derive(Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub webhook_url: String,
    pub custom_username: String,
    pub custom_avatar_url: String,
    pub description_template: String,
    pub alert_on_critical: bool,
    pub alert_mention: String,
    pub log_level: LogLevel,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            custom_username: String::new(),
            custom_avatar_url: String::new(),
            description_template: DEFAULT_TEMPLATE.to_string(),
            alert_on_critical: false,
            alert_mention: DEFAULT_ALERT_MENTION.to_string(),
            log_level: LogLevel::Info,
        }
    }
}

// The webhook URL embeds its own credentials and is never printed.
impl fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let webhook_url = if self.webhook_url.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("HandlerConfig")
            .field("webhook_url", &webhook_url)
            .field("custom_username", &self.custom_username)
            .field("custom_avatar_url", &self.custom_avatar_url)
            .field("description_template", &self.description_template)
            .field("alert_on_critical", &self.alert_on_critical)
            .field("alert_mention", &self.alert_mention)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn first<T: Clone>(layers: &[ConfigLayer], get: impl Fn(&ConfigLayer) -> Option<T>) -> Option<T> {
    layers.iter().find_map(get)
}

fn parse_bool(option: &str, value: &str) -> Result<bool, HandlerError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(HandlerError::Config(format!(
            "invalid boolean for {}: {:?}",
            option, other
        ))),
    }
}

impl HandlerConfig {
    /// Merge layers, highest precedence first, over the defaults
    pub fn from_layers(layers: &[ConfigLayer]) -> Self {
        let defaults = Self::default();

        Self {
            webhook_url: first(layers, |l| l.webhook_url.clone()).unwrap_or(defaults.webhook_url),
            custom_username: first(layers, |l| l.custom_username.clone()).unwrap_or(defaults.custom_username),
            custom_avatar_url: first(layers, |l| l.custom_avatar_url.clone()).unwrap_or(defaults.custom_avatar_url),
            description_template: first(layers, |l| l.description_template.clone())
                .unwrap_or(defaults.description_template),
            alert_on_critical: first(layers, |l| l.alert_on_critical).unwrap_or(defaults.alert_on_critical),
            alert_mention: first(layers, |l| l.alert_mention.clone()).unwrap_or(defaults.alert_mention),
            log_level: first(layers, |l| l.log_level).unwrap_or(defaults.log_level),
        }
    }

    /// Apply per-event overrides from check/entity annotations.
    ///
    /// The webhook URL is secret and cannot be set this way.
    pub fn with_annotations(mut self, event: &Event) -> Result<Self, HandlerError> {
        let lookup = |option: &str| event.annotation(&format!("{}/{}", KEYSPACE, option)).map(str::to_string);

        if let Some(value) = lookup(OPT_CUSTOM_USERNAME) {
            self.custom_username = value;
        }
        if let Some(value) = lookup(OPT_CUSTOM_AVATAR_URL) {
            self.custom_avatar_url = value;
        }
        if let Some(value) = lookup(OPT_DESCRIPTION_TEMPLATE) {
            self.description_template = value;
        }
        if let Some(value) = lookup(OPT_ALERT_ON_CRITICAL) {
            self.alert_on_critical = parse_bool(OPT_ALERT_ON_CRITICAL, &value)?;
        }
        if let Some(value) = lookup(OPT_ALERT_MENTION) {
            self.alert_mention = value;
        }
        if lookup(OPT_WEBHOOK_URL).is_some() {
            log::warn!("Ignoring {} annotation: secret options cannot be set from annotations", OPT_WEBHOOK_URL);
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), HandlerError> {
        if self.webhook_url.is_empty() {
            return Err(HandlerError::Config(format!(
                "--{} or DISCORD_WEBHOOK_URL environment variable is required",
                OPT_WEBHOOK_URL
            )));
        }
        Ok(())
    }

    /// Mention to prefix on critical events, if enabled
    pub fn critical_mention(&self) -> Option<&str> {
        self.alert_on_critical.then_some(self.alert_mention.as_str())
    }
}
