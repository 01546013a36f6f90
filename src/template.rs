//! Description templates
//!
//! Templates use Go text/template placeholder syntax (`{{ .Check.Output }}`)
//! so existing Sensu handler configs keep working. Only the fields exposed by
//! [`EventView`] can be referenced.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::event::EventView;

/// Default description: the raw check output
pub const DEFAULT_TEMPLATE: &str = "{{ .Check.Output }}";

/// Maximum description length in characters
pub const MAX_DESCRIPTION_CHARS: usize = 4096;

/// Marker appended to truncated text
pub const ELLIPSIS: &str = "...";

static FIELD_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.([A-Za-z]+)\.([A-Za-z]+)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed action at offset {0}")]
    Unterminated(usize),

    #[error("empty action at offset {0}")]
    EmptyAction(usize),

    #[error("unsupported action: {0}")]
    Unsupported(String),

    #[error("can't evaluate field {0}")]
    UnknownField(String),
}

/// Resolve a `.Object.Field` path against the view
fn resolve(path: &str, view: &EventView) -> Result<String, TemplateError> {
    let caps = FIELD_PATH
        .captures(path)
        .ok_or_else(|| TemplateError::Unsupported(path.to_string()))?;

    match (&caps[1], &caps[2]) {
        ("Entity", "Name") => Ok(view.entity_name.clone()),
        ("Check", "Name") => Ok(view.check_name.clone()),
        ("Check", "Status") => Ok(view.status.to_string()),
        ("Check", "Output") => Ok(view.output.clone()),
        _ => Err(TemplateError::UnknownField(path.to_string())),
    }
}

/// Evaluate `template` against `view`
pub fn render(template: &str, view: &EventView) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);

        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or(TemplateError::Unterminated(offset + start))?;

        let action = after_open[..end].trim();
        if action.is_empty() {
            return Err(TemplateError::EmptyAction(offset + start));
        }
        out.push_str(&resolve(action, view)?);

        let consumed = start + 2 + end + 2;
        rest = &rest[consumed..];
        offset += consumed;
    }

    out.push_str(rest);
    Ok(out)
}

/// Truncate to at most `cap` characters, ending in [`ELLIPSIS`] when cut
pub fn truncate_chars(s: &str, cap: usize) -> String {
    if s.chars().count() <= cap {
        return s.to_string();
    }

    let keep = cap.saturating_sub(ELLIPSIS.chars().count());
    let mut truncated: String = s.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Render the embed description.
///
/// A failing template is reported and yields an empty description; the
/// notification is still sent.
pub fn render_description(handler_name: &str, template: &str, view: &EventView) -> String {
    let description = match render(template, view) {
        Ok(rendered) => rendered,
        Err(e) => {
            log::error!("Error processing template: {}", e);
            println!("{}: Error processing template: {}", handler_name, e);
            String::new()
        }
    };

    let description = description.replace("\\n", "\n");
    truncate_chars(&description, MAX_DESCRIPTION_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> EventView {
        EventView {
            entity_name: "web01".to_string(),
            check_name: "disk".to_string(),
            status: 2,
            output: "DISK CRITICAL".to_string(),
        }
    }

    #[test]
    fn test_default_template_renders_output() {
        assert_eq!(render(DEFAULT_TEMPLATE, &view()).unwrap(), "DISK CRITICAL");
    }

    #[test]
    fn test_all_fields() {
        let rendered = render("{{.Entity.Name}}/{{ .Check.Name }} [{{ .Check.Status }}]: {{.Check.Output}}", &view());
        assert_eq!(rendered.unwrap(), "web01/disk [2]: DISK CRITICAL");
    }

    #[test]
    fn test_plain_text_passthrough() {
        assert_eq!(render("no placeholders here", &view()).unwrap(), "no placeholders here");
    }

    #[test]
    fn test_unknown_field() {
        let err = render("{{ .Check.Missing }}", &view()).unwrap_err();
        assert_eq!(err, TemplateError::UnknownField(".Check.Missing".to_string()));
    }

    #[test]
    fn test_unterminated_action() {
        let err = render("before {{ .Check.Output", &view()).unwrap_err();
        assert_eq!(err, TemplateError::Unterminated(7));
    }

    #[test]
    fn test_empty_action() {
        assert!(matches!(render("{{  }}", &view()), Err(TemplateError::EmptyAction(0))));
    }

    #[test]
    fn test_unsupported_action() {
        assert!(matches!(
            render("{{ range .Check }}", &view()),
            Err(TemplateError::Unsupported(_))
        ));
    }

    #[test]
    fn test_failed_template_degrades_to_empty() {
        let description = render_description("test", "{{ .Entity.Bogus }}", &view());
        assert_eq!(description, "");
    }

    #[test]
    fn test_literal_newline_escape_converted() {
        let description = render_description("test", "line one\\nline two", &view());
        assert_eq!(description, "line one\nline two");
    }

    #[test]
    fn test_truncate_short_string_untouched() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_truncate_multibyte() {
        let input = "é".repeat(20);
        let truncated = truncate_chars(&input, 10);
        assert_eq!(truncated.chars().count(), 10);
        assert!(truncated.ends_with(ELLIPSIS));
        assert!(truncated.starts_with("ééééééé"));
    }

    #[test]
    fn test_long_description_capped() {
        let mut v = view();
        v.output = "🔥".repeat(MAX_DESCRIPTION_CHARS + 50);
        let description = render_description("test", DEFAULT_TEMPLATE, &v);
        assert_eq!(description.chars().count(), MAX_DESCRIPTION_CHARS);
        assert!(description.ends_with(ELLIPSIS));
    }
}
