//! Issue-collecting structural checks over untyped JSON.
//!
//! A [`Checker`] walks a candidate document while tracking the current
//! [`FieldPath`]. Every check records an [`Issue`] on failure and returns
//! `None` instead of stopping, so one pass over a document reports every
//! problem it contains. Shape functions run all of their field checks before
//! combining the results with `?`.

use serde_json::{Map, Value};

use crate::config::RegistryConfig;
use crate::error::{Issue, IssueKind, ValidationError, ValidationResult};
use crate::path::{FieldPath, Segment};

const PREVIEW_CHARS: usize = 64;

/// Accumulates validation issues for one candidate document.
#[derive(Debug)]
pub struct Checker {
    config: RegistryConfig,
    path: FieldPath,
    issues: Vec<Issue>,
}

impl Checker {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            path: FieldPath::root(),
            issues: Vec::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Turn the checked value into a result. Any recorded issue fails the
    /// whole candidate, even when a value was produced.
    pub fn finish<T>(mut self, value: Option<T>) -> ValidationResult<T> {
        match value {
            Some(value) if self.issues.is_empty() => Ok(value),
            Some(_) => Err(ValidationError::new(self.issues)),
            None => {
                if self.issues.is_empty() {
                    self.report(IssueKind::InvalidValue, "a valid document", "unknown");
                }
                Err(ValidationError::new(self.issues))
            }
        }
    }

    /// Record an issue at the current path.
    pub fn report(
        &mut self,
        kind: IssueKind,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) {
        self.issues.push(Issue {
            path: self.path.clone(),
            kind,
            expected: expected.into(),
            received: received.into(),
        });
    }

    /// Run `f` with `segment` appended to the current path.
    pub fn at<S: Into<Segment>, T>(&mut self, segment: S, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(segment.into());
        let out = f(self);
        self.path.pop();
        out
    }

    pub fn wrong_type(&mut self, expected: &str, value: &Value) {
        self.report(IssueKind::WrongType, expected, type_name(value));
    }

    pub fn object<'v>(&mut self, value: &'v Value, expected: &str) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.wrong_type(expected, other);
                None
            }
        }
    }

    /// Check a key that must be present.
    pub fn required<'v, T>(
        &mut self,
        map: &'v Map<String, Value>,
        key: &str,
        expected: &str,
        check: impl FnOnce(&mut Self, &'v Value) -> Option<T>,
    ) -> Option<T> {
        self.at(key, |c| match map.get(key) {
            Some(value) => check(c, value),
            None => {
                c.report(IssueKind::MissingField, expected, "nothing");
                None
            }
        })
    }

    /// Check a key that may be absent. `null` counts as absent.
    ///
    /// The outer `Option` is `None` when the value is present but invalid.
    pub fn optional<'v, T>(
        &mut self,
        map: &'v Map<String, Value>,
        key: &str,
        check: impl FnOnce(&mut Self, &'v Value) -> Option<T>,
    ) -> Option<Option<T>> {
        match map.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(value) => self.at(key, |c| check(c, value)).map(Some),
        }
    }

    pub fn required_string(&mut self, map: &Map<String, Value>, key: &str) -> Option<String> {
        self.required(map, key, "non-empty string", Self::non_empty_string)
    }

    pub fn optional_string(&mut self, map: &Map<String, Value>, key: &str) -> Option<Option<String>> {
        self.optional(map, key, Self::string)
    }

    pub fn required_url(&mut self, map: &Map<String, Value>, key: &str) -> Option<String> {
        self.required(map, key, "URL string", Self::url)
    }

    pub fn optional_url(&mut self, map: &Map<String, Value>, key: &str) -> Option<Option<String>> {
        self.optional(map, key, Self::url)
    }

    pub fn optional_bool(&mut self, map: &Map<String, Value>, key: &str) -> Option<Option<bool>> {
        self.optional(map, key, Self::boolean)
    }

    /// Require `key` to hold exactly the string `literal`.
    pub fn literal(&mut self, map: &Map<String, Value>, key: &str, literal: &str) -> Option<()> {
        let expected = format!("\"{literal}\"");
        self.required(map, key, &expected, |c, value| match value {
            Value::String(found) if found == literal => Some(()),
            Value::String(_) => {
                c.report(IssueKind::InvalidValue, expected.as_str(), preview(value));
                None
            }
            other => {
                c.wrong_type(&expected, other);
                None
            }
        })
    }

    pub fn string(&mut self, value: &Value) -> Option<String> {
        match value {
            Value::String(text) => Some(text.clone()),
            other => {
                self.wrong_type("string", other);
                None
            }
        }
    }

    pub fn non_empty_string(&mut self, value: &Value) -> Option<String> {
        match value {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::String(_) => {
                self.report(IssueKind::InvalidValue, "non-empty string", "\"\"");
                None
            }
            other => {
                self.wrong_type("non-empty string", other);
                None
            }
        }
    }

    /// Syntactic URL check. The input text is kept verbatim.
    pub fn url(&mut self, value: &Value) -> Option<String> {
        match value {
            Value::String(text) => match url::Url::parse(text) {
                Ok(_) => Some(text.clone()),
                Err(err) => {
                    self.report(
                        IssueKind::InvalidFormat,
                        format!("URL string ({err})"),
                        preview(value),
                    );
                    None
                }
            },
            other => {
                self.wrong_type("URL string", other);
                None
            }
        }
    }

    pub fn boolean(&mut self, value: &Value) -> Option<bool> {
        match value {
            Value::Bool(flag) => Some(*flag),
            other => {
                self.wrong_type("boolean", other);
                None
            }
        }
    }

    /// A number inside the inclusive range `[min, max]`.
    pub fn number_in(&mut self, value: &Value, min: f64, max: f64) -> Option<f64> {
        match value.as_f64() {
            Some(number) if (min..=max).contains(&number) => Some(number),
            Some(_) => {
                self.report(
                    IssueKind::InvalidValue,
                    format!("number between {min} and {max}"),
                    preview(value),
                );
                None
            }
            None => {
                self.wrong_type("number", value);
                None
            }
        }
    }

    /// A non-negative integer that fits in `u32`.
    pub fn index(&mut self, value: &Value) -> Option<u32> {
        match value {
            Value::Number(number) => match number.as_u64().and_then(|n| u32::try_from(n).ok()) {
                Some(index) => Some(index),
                None => {
                    self.report(IssueKind::InvalidValue, "non-negative integer", preview(value));
                    None
                }
            },
            other => {
                self.wrong_type("non-negative integer", other);
                None
            }
        }
    }

    /// A string drawn from a closed set. Matching is exact.
    pub fn one_of<T: Copy>(&mut self, value: &Value, choices: &[(&'static str, T)]) -> Option<T> {
        let expected = || {
            let names: Vec<&str> = choices.iter().map(|(name, _)| *name).collect();
            format!("one of {}", names.join(", "))
        };
        match value {
            Value::String(text) => match choices.iter().find(|(name, _)| name == text) {
                Some((_, choice)) => Some(*choice),
                None => {
                    self.report(IssueKind::InvalidValue, expected(), preview(value));
                    None
                }
            },
            other => {
                let expected = expected();
                self.wrong_type(&expected, other);
                None
            }
        }
    }

    /// Check every element of an array, in order.
    pub fn array<'v, T>(
        &mut self,
        value: &'v Value,
        expected: &str,
        mut item: impl FnMut(&mut Self, &'v Value) -> Option<T>,
    ) -> Option<Vec<T>> {
        let Value::Array(elements) = value else {
            self.wrong_type(expected, value);
            return None;
        };

        let mut out = Vec::with_capacity(elements.len());
        let mut failed = false;
        for (position, element) in elements.iter().enumerate() {
            match self.at(position, |c| item(c, element)) {
                Some(checked) => out.push(checked),
                None => failed = true,
            }
        }

        if failed {
            None
        } else {
            Some(out)
        }
    }

    /// Like [`Checker::array`] but an empty array is an issue.
    pub fn non_empty_array<'v, T>(
        &mut self,
        value: &'v Value,
        expected: &str,
        item: impl FnMut(&mut Self, &'v Value) -> Option<T>,
    ) -> Option<Vec<T>> {
        if matches!(value, Value::Array(elements) if elements.is_empty()) {
            self.report(IssueKind::InvalidValue, format!("non-empty {expected}"), "[]");
            return None;
        }
        self.array(value, expected, item)
    }

    /// In strict mode, report every key of `map` not listed in `known`.
    /// A key that already has an issue at its path is not reported again.
    pub fn allow_only(&mut self, map: &Map<String, Value>, known: &[&str]) {
        if !self.config.strict_mode {
            return;
        }
        for (key, value) in map {
            if !known.contains(&key.as_str()) {
                self.at(key.as_str(), |c| {
                    if c.issues.iter().any(|issue| issue.path == c.path) {
                        return;
                    }
                    c.report(
                        IssueKind::UnexpectedField,
                        format!("one of the declared fields ({})", known.join(", ")),
                        type_name(value),
                    );
                });
            }
        }
    }
}

/// JSON type name of a value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Short JSON rendering of a value for issue reports.
pub(crate) fn preview(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() <= PREVIEW_CHARS {
        return rendered;
    }
    let mut short: String = rendered.chars().take(PREVIEW_CHARS).collect();
    short.push_str("...");
    short
}
