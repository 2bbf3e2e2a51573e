//! Document validation that reports every violation at once.
//!
//! Payloads arrive as loosely typed JSON. [`FieldReader`] walks a document,
//! coercing values the way clients expect (numeric strings count as numbers,
//! numbers count as strings) and recording a [`FieldViolation`] for each
//! field that cannot be accepted. Callers inspect the [`Violations`] once the
//! whole document has been read.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One rejected field, addressed by its dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field, e.g. `address.city`.
    pub field: String,
    /// Why the value was rejected.
    pub message: String,
}

impl FieldViolation {
    /// Build a violation for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulator for violations found while reading a document.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    /// Record a violation.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    /// Yield `value` when nothing was recorded, otherwise every violation.
    pub fn finish<T>(self, value: T) -> Result<T, Vec<FieldViolation>> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self.0)
        }
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Cursor over one JSON object level.
///
/// A reader whose object is absent (because the parent field was missing or
/// malformed, which is already reported) returns defaults silently so a
/// missing `address` yields a single violation rather than one per child.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'doc> {
    object: Option<&'doc Map<String, Value>>,
    path: Option<&'doc str>,
}

impl<'doc> FieldReader<'doc> {
    /// Start reading at the document root.
    ///
    /// A non-object root is reported once under the field `document`.
    pub fn root(document: &'doc Value, violations: &mut Violations) -> Self {
        let object = document.as_object();
        if object.is_none() {
            violations.push("document", "must be a JSON object");
        }
        Self { object, path: None }
    }

    fn path(&self, key: &str) -> String {
        match self.path {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.to_owned(),
        }
    }

    fn value(&self, key: &str) -> Option<&'doc Value> {
        self.object?.get(key).filter(|value| !value.is_null())
    }

    /// Descend into a required nested object.
    pub fn nested(&self, key: &str, violations: &mut Violations) -> NestedReader<'doc> {
        let path = self.path(key);
        let object = match (self.object, self.value(key)) {
            (None, _) => None,
            (Some(_), None) => {
                violations.push(path.clone(), "is required");
                None
            }
            (Some(_), Some(Value::Object(map))) => Some(map),
            (Some(_), Some(_)) => {
                violations.push(path.clone(), "must be an object");
                None
            }
        };
        NestedReader { object, path }
    }

    /// Read a required, non-blank string. Numbers are accepted and rendered.
    pub fn string(&self, key: &str, violations: &mut Violations) -> String {
        match self.optional_string_inner(key, violations) {
            Some(value) => value.unwrap_or_default(),
            None => {
                if self.object.is_some() {
                    violations.push(self.path(key), "is required");
                }
                String::new()
            }
        }
    }

    /// Read an optional string; blank values count as absent.
    pub fn optional_string(&self, key: &str, violations: &mut Violations) -> Option<String> {
        self.optional_string_inner(key, violations).flatten()
    }

    /// `None` when absent or blank, `Some(None)` when present but malformed.
    fn optional_string_inner(
        &self,
        key: &str,
        violations: &mut Violations,
    ) -> Option<Option<String>> {
        let value = self.value(key)?;
        let text = match value {
            Value::String(text) => text.trim().to_owned(),
            Value::Number(number) => number.to_string(),
            _ => {
                violations.push(self.path(key), "must be a string");
                return Some(None);
            }
        };
        if text.is_empty() {
            None
        } else {
            Some(Some(text))
        }
    }

    /// Read a required string with a minimum length in characters.
    pub fn string_min_len(&self, key: &str, min: usize, violations: &mut Violations) -> String {
        let text = self.string(key, violations);
        if !text.is_empty() && text.chars().count() < min {
            violations.push(
                self.path(key),
                format!("must be at least {min} characters"),
            );
        }
        text
    }

    /// Read a required e-mail address.
    pub fn email(&self, key: &str, violations: &mut Violations) -> String {
        let text = self.string(key, violations);
        if !text.is_empty() && !email_regex().is_match(&text) {
            violations.push(self.path(key), "must be a valid email address");
        }
        text
    }

    fn number_value(&self, key: &str, violations: &mut Violations) -> Option<f64> {
        let Some(value) = self.value(key) else {
            if self.object.is_some() {
                violations.push(self.path(key), "is required");
            }
            return None;
        };
        let parsed = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|number| number.is_finite());
        if parsed.is_none() {
            violations.push(self.path(key), "must be a number");
        }
        parsed
    }

    /// Read a required number.
    pub fn number(&self, key: &str, violations: &mut Violations) -> f64 {
        self.number_value(key, violations).unwrap_or_default()
    }

    /// Read a required number strictly greater than zero.
    pub fn positive_number(&self, key: &str, violations: &mut Violations) -> f64 {
        let Some(number) = self.number_value(key, violations) else {
            return 0.0;
        };
        if number <= 0.0 {
            violations.push(self.path(key), "must be a positive number");
        }
        number
    }

    /// Read a required whole number strictly greater than zero.
    pub fn positive_integer(&self, key: &str, violations: &mut Violations) -> u32 {
        let Some(number) = self.number_value(key, violations) else {
            return 0;
        };
        if number.fract() != 0.0 {
            violations.push(self.path(key), "must be an integer");
            return 0;
        }
        if number < 1.0 || number > f64::from(u32::MAX) {
            violations.push(self.path(key), "must be a positive integer");
            return 0;
        }
        // Whole and in range, checked above.
        number as u32
    }

    /// Read a required, non-empty list of strings.
    ///
    /// A single string is accepted as a one-element list.
    pub fn string_list(&self, key: &str, violations: &mut Violations) -> Vec<String> {
        let Some(value) = self.value(key) else {
            if self.object.is_some() {
                violations.push(self.path(key), "is required");
            }
            return Vec::new();
        };
        let items: Option<Vec<String>> = match value {
            Value::String(text) => Some(vec![text.trim().to_owned()]),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(|text| text.trim().to_owned()))
                .collect(),
            _ => None,
        };
        let Some(items) = items else {
            violations.push(self.path(key), "must be a list of strings");
            return Vec::new();
        };
        let items: Vec<String> = items.into_iter().filter(|item| !item.is_empty()).collect();
        if items.is_empty() {
            violations.push(self.path(key), "must contain at least one entry");
        }
        items
    }
}

/// Reader for a nested object; owns its dotted path prefix.
#[derive(Debug)]
pub struct NestedReader<'doc> {
    object: Option<&'doc Map<String, Value>>,
    path: String,
}

impl NestedReader<'_> {
    /// Borrow a [`FieldReader`] positioned at this object.
    pub fn reader(&self) -> FieldReader<'_> {
        FieldReader {
            object: self.object,
            path: Some(self.path.as_str()),
        }
    }
}
