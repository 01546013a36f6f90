use clap::Parser;
use clap::builder::BoolishValueParser;
use std::path::PathBuf;

use crate::config::{ConfigLayer, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "sensu-discord-handler",
    about = "The Sensu Go Discord handler for notifying a channel.",
    version = env!("GIT_DESCRIBE"),
    after_help = "The event is read as JSON from stdin.\n\nLogs are written to: ~/.local/share/sensu-discord-handler/logs/handler.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, env = "DISCORD_HANDLER_CONFIG", help = "Path to a YAML config file")]
    pub config: Option<PathBuf>,

    /// The WebHook URL to send messages to
    #[arg(short = 'w', long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// The username that messages will be sent as
    #[arg(short = 'u', long, env = "DISCORD_CUSTOM_USERNAME")]
    pub custom_username: Option<String>,

    /// A URL to an image to use as the user avatar
    #[arg(short = 'i', long, env = "DISCORD_CUSTOM_AVATAR_URL")]
    pub custom_avatar_url: Option<String>,

    /// The Discord notification output template, in Go text/template placeholder format
    #[arg(short = 't', long, env = "DISCORD_DESCRIPTION_TEMPLATE")]
    pub description_template: Option<String>,

    /// Alert the channel with the configured mention (--alert-mention) on critical events
    #[arg(
        short = 'a',
        long,
        env = "DISCORD_ALERT_ON_CRITICAL",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub alert_on_critical: Option<bool>,

    /// Specifies the mentions to use if --alert-on-critical is enabled
    #[arg(short = 'm', long, env = "DISCORD_ALERT_MENTION")]
    pub alert_mention: Option<String>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, env = "DISCORD_HANDLER_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl Cli {
    /// The arguments (and their env fallbacks) as a config layer
    pub fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            webhook_url: self.webhook_url.clone(),
            custom_username: self.custom_username.clone(),
            custom_avatar_url: self.custom_avatar_url.clone(),
            description_template: self.description_template.clone(),
            alert_on_critical: self.alert_on_critical,
            alert_mention: self.alert_mention.clone(),
            log_level: self.log_level,
        }
    }
}
