//! Declarative field rules evaluated against an untyped JSON object

use serde_json::Value;

/// Constraints for one string field of a submission
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    /// Strip surrounding whitespace before the length checks
    pub trim: bool,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
}

impl FieldRule {
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            trim: false,
            min_len: None,
            max_len: None,
        }
    }

    pub const fn required(name: &'static str) -> Self {
        Self {
            required: true,
            ..Self::optional(name)
        }
    }

    pub const fn trimmed(self) -> Self {
        Self { trim: true, ..self }
    }

    pub const fn min(self, len: usize) -> Self {
        Self {
            min_len: Some(len),
            ..self
        }
    }

    pub const fn max(self, len: usize) -> Self {
        Self {
            max_len: Some(len),
            ..self
        }
    }

    /// Check one field value.
    ///
    /// `None` means the key is absent. Optional absent fields default to an
    /// empty string; a present key must hold a string.
    pub fn apply(&self, value: Option<&Value>) -> Result<String, Vec<String>> {
        let raw = match value {
            None if self.required => return Err(vec!["Required".to_string()]),
            None => return Ok(String::new()),
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(vec![format!(
                    "Expected string, received {}",
                    json_type(other)
                )])
            }
        };

        let value = if self.trim {
            raw.trim().to_string()
        } else {
            raw.clone()
        };

        let len = value.chars().count();
        let mut errors = Vec::new();

        if let Some(min) = self.min_len {
            if len < min {
                errors.push(format!("Must contain at least {} character(s)", min));
            }
        }

        if let Some(max) = self.max_len {
            if len > max {
                errors.push(format!("Must contain at most {} character(s)", max));
            }
        }

        if errors.is_empty() {
            Ok(value)
        } else {
            Err(errors)
        }
    }
}

/// Name of a JSON value's type, as shown in validation messages
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
