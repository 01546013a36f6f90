//! Discord message assembly
//!
//! Builds the embed shown in the channel plus the one-line summary used for
//! log output.

use serde::{Deserialize, Serialize};

use crate::config::{HANDLER_NAME, HandlerConfig};
use crate::event::EventView;
use crate::status::Status;
use crate::template::{ELLIPSIS, render_description, truncate_chars};

pub const EMBED_TITLE: &str = "Description";

/// Output length kept in the one-line summary
pub const SUMMARY_OUTPUT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn new(name: &str, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            inline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn from_event(view: &EventView, config: &HandlerConfig) -> Self {
        let status = Status::from_code(view.status);
        let description = render_description(HANDLER_NAME, &config.description_template, view);

        Self {
            title: EMBED_TITLE.to_string(),
            description,
            color: status.color(),
            fields: vec![
                EmbedField::new("Status", status.label(config.critical_mention()), false),
                EmbedField::new("Entity", view.entity_name.as_str(), true),
                EmbedField::new("Check", view.check_name.as_str(), true),
            ],
        }
    }
}

/// Request body for the webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl WebhookMessage {
    pub fn new(embed: Embed, config: &HandlerConfig) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        Self {
            embeds: vec![embed],
            username: non_empty(&config.custom_username),
            avatar_url: non_empty(&config.custom_avatar_url),
        }
    }
}

/// Strip leading and trailing line breaks
pub fn chomp(s: &str) -> &str {
    s.trim_matches(|c| c == '\n' || c == '\r')
}

pub fn event_key(view: &EventView) -> String {
    format!("{}/{}", view.entity_name, view.check_name)
}

/// `<entity>/<check>:<output>` with the output cut to `max_chars`
pub fn event_summary(view: &EventView, max_chars: usize) -> String {
    let output = chomp(&view.output);
    let output = if output.chars().count() > max_chars {
        truncate_chars(output, max_chars + ELLIPSIS.len())
    } else {
        output.to_string()
    };
    format!("{}:{}", event_key(view), output)
}

/// `RESOLVED - web01/disk:OK` style one-liner
pub fn formatted_message(view: &EventView) -> String {
    format!(
        "{} - {}",
        Status::from_code(view.status).action(),
        event_summary(view, SUMMARY_OUTPUT_CHARS)
    )
}
