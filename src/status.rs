//! Check status classification

/// Embed color for resolved events (green)
pub const COLOR_RESOLVED: u32 = 3061373;
/// Embed color for critical events (orange)
pub const COLOR_CRITICAL: u32 = 14687834;
/// Embed color for everything else (red)
pub const COLOR_WARNING: u32 = 15512110;

/// The three states a Sensu check status is displayed as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Resolved,
    Critical,
    Warning,
}

impl Status {
    /// Classify a raw check status. Only 0 and 2 are distinguished;
    /// every other value, including unknown (3) and negatives, is a warning.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Resolved,
            2 => Self::Critical,
            _ => Self::Warning,
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            Self::Resolved => COLOR_RESOLVED,
            Self::Critical => COLOR_CRITICAL,
            Self::Warning => COLOR_WARNING,
        }
    }

    /// Display label for the Status field.
    ///
    /// `mention` is only honoured for critical events and is prefixed to the
    /// label so the chat client notifies the channel.
    pub fn label(&self, mention: Option<&str>) -> String {
        match (self, mention) {
            (Self::Resolved, _) => "Resolved".to_string(),
            (Self::Critical, Some(mention)) => format!("{} Critical", mention),
            (Self::Critical, None) => "Critical".to_string(),
            (Self::Warning, _) => "Warning".to_string(),
        }
    }

    /// Action word used in the one-line summary
    pub fn action(&self) -> &'static str {
        match self {
            Self::Resolved => "RESOLVED",
            Self::Critical | Self::Warning => "ALERT",
        }
    }
}
