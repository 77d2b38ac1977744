use serde_json::Value;

use crate::form::{FormType, Violations, NOT_BLANK};

/// Fixture form used by unit tests: a note with a required title
#[derive(Debug, Clone, Default)]
pub struct NoteForm {
    pub title: Option<String>,
    pub body: Option<String>,
    pub pinned: bool,
}

impl FormType for NoteForm {
    fn fields() -> &'static [&'static str] {
        &["title", "body", "pinned"]
    }

    fn set_field(&mut self, name: &str, value: &Value) -> Result<(), String> {
        match name {
            "title" => self.title = string_field(value)?,
            "body" => self.body = string_field(value)?,
            "pinned" => {
                self.pinned = value
                    .as_bool()
                    .ok_or_else(|| type_message("bool"))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn validate(&self) -> Violations {
        let mut violations = Violations::new();
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => {}
            _ => {
                violations
                    .entry("title".to_string())
                    .or_default()
                    .push(NOT_BLANK.to_string());
            }
        }
        violations
    }
}

fn string_field(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(type_message("string")),
    }
}

fn type_message(expected: &str) -> String {
    format!("This value should be of type {}.", expected)
}
