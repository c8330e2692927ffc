//! Feedback submissions and their schema
//!
//! A [`FeedbackSubmission`] only exists for the duration of one request. It is
//! built from the raw JSON body by [`FeedbackSubmission::from_json`], which
//! either yields a validated record or a [`ValidationErrors`] report listing
//! every broken field.

pub mod rules;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub use rules::FieldRule;

/// Minimum trimmed message length
pub const MIN_MESSAGE_LEN: usize = 8;
pub const MAX_MESSAGE_LEN: usize = 5000;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_CONTACT_LEN: usize = 100;

/// Schema of a feedback payload
pub const FEEDBACK_RULES: [FieldRule; 4] = [
    FieldRule::optional("name").trimmed().max(MAX_NAME_LEN),
    FieldRule::optional("contact").trimmed().max(MAX_CONTACT_LEN),
    FieldRule::required("message")
        .trimmed()
        .min(MIN_MESSAGE_LEN)
        .max(MAX_MESSAGE_LEN),
    // Honeypot: kept verbatim, only checked for emptiness later
    FieldRule::optional("website"),
];

/// A validated feedback submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub name: String,
    pub contact: String,
    pub message: String,
    /// Honeypot field, invisible to humans
    pub website: String,
}

/// Structured validation report returned to the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrors {
    /// Problems with the payload as a whole
    pub form_errors: Vec<String>,
    /// Problems per field name
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.form_errors.clone();
        for (field, errors) in &self.field_errors {
            parts.push(format!("{}: {}", field, errors.join(", ")));
        }
        write!(f, "{}", parts.join("; "))
    }
}

impl FeedbackSubmission {
    /// Validate an untyped JSON payload against [`FEEDBACK_RULES`].
    ///
    /// Unknown keys are ignored.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let Value::Object(map) = payload else {
            return Err(ValidationErrors {
                form_errors: vec![format!(
                    "Expected object, received {}",
                    rules::json_type(payload)
                )],
                field_errors: BTreeMap::new(),
            });
        };

        let mut errors = ValidationErrors::default();
        let mut values = BTreeMap::new();

        for rule in &FEEDBACK_RULES {
            match rule.apply(map.get(rule.name)) {
                Ok(value) => {
                    values.insert(rule.name, value);
                }
                Err(messages) => {
                    errors.field_errors.insert(rule.name.to_string(), messages);
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut take = |field: &str| values.remove(field).unwrap_or_default();
        Ok(Self {
            name: take("name"),
            contact: take("contact"),
            message: take("message"),
            website: take("website"),
        })
    }

    /// True when the honeypot field was filled in
    pub fn is_spam(&self) -> bool {
        !self.website.trim().is_empty()
    }

    /// True when the submission may be handed to the mail relay
    pub fn is_eligible(&self) -> bool {
        self.message.chars().count() >= MIN_MESSAGE_LEN && !self.is_spam()
    }
}
