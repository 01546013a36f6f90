//! Sensu event intake
//!
//! The host pipes one Sensu Go event as JSON on stdin. Only the handful of
//! fields the handler renders are modelled; everything else is ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

use crate::error::HandlerError;

/// Object metadata shared by entities and checks
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ObjectMeta {
    pub name: String,
    pub annotations: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Entity {
    pub metadata: ObjectMeta,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Check {
    pub metadata: ObjectMeta,
    pub status: i64,
    pub output: String,
}

/// A monitoring event as delivered by the Sensu pipeline
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Event {
    #[serde(default)]
    pub entity: Option<Entity>,
    #[serde(default)]
    pub check: Option<Check>,
}

/// The fields of an event that templates and embeds may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventView {
    pub entity_name: String,
    pub check_name: String,
    pub status: i64,
    pub output: String,
}

impl Event {
    #[cfg(test)]
    pub fn new(entity_name: &str, check_name: &str, status: i64, output: &str) -> Self {
        Self {
            entity: Some(Entity {
                metadata: ObjectMeta {
                    name: entity_name.to_string(),
                    ..Default::default()
                },
            }),
            check: Some(Check {
                metadata: ObjectMeta {
                    name: check_name.to_string(),
                    ..Default::default()
                },
                status,
                output: output.to_string(),
            }),
        }
    }

    /// Ensure the event carries both an entity and a check
    pub fn validate(&self) -> Result<(), HandlerError> {
        if self.entity.is_none() {
            return Err(HandlerError::Event("event does not contain an entity".to_string()));
        }
        if self.check.is_none() {
            return Err(HandlerError::Event("event does not contain a check".to_string()));
        }
        Ok(())
    }

    /// Narrow view over the rendered fields
    pub fn view(&self) -> EventView {
        let entity = self.entity.clone().unwrap_or_default();
        let check = self.check.clone().unwrap_or_default();

        EventView {
            entity_name: entity.metadata.name,
            check_name: check.metadata.name,
            status: check.status,
            output: check.output,
        }
    }

    /// Look up an annotation, check annotations winning over entity ones
    pub fn annotation(&self, key: &str) -> Option<&str> {
        let from_check = self
            .check
            .as_ref()
            .and_then(|c| c.metadata.annotations.get(key));
        let from_entity = self
            .entity
            .as_ref()
            .and_then(|e| e.metadata.annotations.get(key));

        from_check.or(from_entity).map(String::as_str)
    }
}

/// Read and validate a single event from `reader`
pub fn read_event<R: Read>(mut reader: R) -> Result<Event, HandlerError> {
    let mut buffer = String::new();
    reader
        .read_to_string(&mut buffer)
        .map_err(|e| HandlerError::Event(format!("failed to read event from stdin: {}", e)))?;

    if buffer.trim().is_empty() {
        return Err(HandlerError::Event("no event data on stdin".to_string()));
    }

    let event: Event = serde_json::from_str(&buffer)
        .map_err(|e| HandlerError::Event(format!("failed to parse event JSON: {}", e)))?;
    event.validate()?;

    log::debug!("Read event for {}/{}", event.view().entity_name, event.view().check_name);
    Ok(event)
}
