//! The format-and-send pipeline for one event

use colored::*;

use crate::config::HandlerConfig;
use crate::dispatch::{Transport, dispatch};
use crate::embed::{Embed, WebhookMessage, formatted_message};
use crate::error::HandlerError;
use crate::event::Event;

pub const SENT_MESSAGE: &str = "Notification sent to Discord WebHook destination";

pub struct Handler<'a> {
    config: HandlerConfig,
    transport: &'a dyn Transport,
}

impl<'a> Handler<'a> {
    pub fn new(config: HandlerConfig, transport: &'a dyn Transport) -> Self {
        Self { config, transport }
    }

    /// Validate, render and deliver. Nothing is sent if the config is invalid.
    pub fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        self.config.validate()?;
        event.validate()?;

        let view = event.view();
        log::info!("Handling {}", formatted_message(&view));

        let embed = Embed::from_event(&view, &self.config);
        let message = WebhookMessage::new(embed, &self.config);
        dispatch(&self.config.webhook_url, &message, self.transport)?;

        println!("{} {}", "✓".green(), SENT_MESSAGE);
        Ok(())
    }
}
