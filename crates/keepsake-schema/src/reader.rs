// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field-by-field reading of raw JSON records.
//!
//! A [`RecordReader`] never stops at the first problem. Each accessor
//! records its violation (with the full field path) and returns `None` or a
//! default, so a validator reads every field before deciding and the
//! failure lists everything that is wrong with the record.

use std::collections::HashMap;

use keepsake_core::{Catalogue, ValidationWarning, Violation};
use serde_json::{Map, Value};

/// Violations and warnings gathered while reading one record.
#[derive(Debug, Default)]
pub struct Findings {
    pub violations: Vec<Violation>,
    pub warnings: Vec<ValidationWarning>,
}

impl Findings {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    fn summary(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Read typed values from a nested record.
pub trait FromRecord: Sized {
    /// Returns `None` only after recording at least one violation.
    fn read(r: &mut RecordReader<'_>) -> Option<Self>;
}

/// Nested items that carry their own id and are deduplicated by it.
pub trait Identified {
    fn record_id(&self) -> &str;
}

pub struct RecordReader<'a> {
    fields: &'a Map<String, Value>,
    path: String,
    findings: &'a mut Findings,
}

impl<'a> RecordReader<'a> {
    pub fn new(object: &'a Map<String, Value>, findings: &'a mut Findings) -> Self {
        Self {
            fields: object,
            path: String::new(),
            findings,
        }
    }

    fn child<'b>(&'b mut self, object: &'a Map<String, Value>, path: String) -> RecordReader<'b> {
        RecordReader {
            fields: object,
            path,
            findings: &mut *self.findings,
        }
    }

    /// Full path of `key` below this reader, e.g. `setup.tone`.
    pub fn path_of(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    /// The raw value of `key`; `null` counts as absent.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn violate(&mut self, violation: Violation) {
        self.findings.violations.push(violation);
    }

    pub fn warn(&mut self, key: &str, message: impl Into<String>) {
        let field = self.path_of(key);
        self.findings
            .warnings
            .push(ValidationWarning::new(field, message));
    }

    pub fn push_warning(&mut self, warning: ValidationWarning) {
        let field = self.path_of(&warning.field);
        self.findings
            .warnings
            .push(ValidationWarning::new(field, warning.message));
    }

    pub fn invariant(&mut self, key: &str, message: impl Into<String>) {
        let field = self.path_of(key);
        self.violate(Violation::Invariant {
            field,
            message: message.into(),
        });
    }

    pub fn missing(&mut self, key: &str) {
        let field = self.path_of(key);
        self.violate(Violation::Missing { field });
    }

    fn wrong_type(&mut self, key: &str, expected: &'static str) {
        let field = self.path_of(key);
        self.violate(Violation::WrongType { field, expected });
    }

    // --- Scalars ---

    pub fn required_str(&mut self, key: &str) -> Option<String> {
        match self.get(key) {
            None => {
                self.missing(key);
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.wrong_type(key, "a string");
                None
            }
        }
    }

    pub fn optional_str(&mut self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.wrong_type(key, "a string");
                None
            }
        }
    }

    /// Free text defaulting to `""`.
    pub fn text(&mut self, key: &str) -> String {
        self.optional_str(key).unwrap_or_default()
    }

    pub fn bool_or(&mut self, key: &str, default: bool) -> bool {
        match self.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                self.wrong_type(key, "a boolean");
                default
            }
        }
    }

    /// Integer timestamps and counters. Floats with no fractional part are
    /// accepted since JavaScript writers do not distinguish them.
    pub fn required_i64(&mut self, key: &str) -> Option<i64> {
        match self.get(key) {
            None => {
                self.missing(key);
                None
            }
            Some(value) => {
                let parsed = as_integer(value);
                if parsed.is_none() {
                    self.wrong_type(key, "an integer");
                }
                parsed
            }
        }
    }

    pub fn i64_or(&mut self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            None => default,
            Some(value) => as_integer(value).unwrap_or_else(|| {
                self.wrong_type(key, "an integer");
                default
            }),
        }
    }

    pub fn index_or(&mut self, key: &str, default: usize) -> usize {
        match self.get(key) {
            None => default,
            Some(value) => match as_integer(value).and_then(|i| usize::try_from(i).ok()) {
                Some(index) => index,
                None => {
                    self.wrong_type(key, "a non-negative integer");
                    default
                }
            },
        }
    }

    pub fn required_f64(&mut self, key: &str) -> Option<f64> {
        match self.get(key) {
            None => {
                self.missing(key);
                None
            }
            Some(Value::Number(n)) => n.as_f64(),
            Some(_) => {
                self.wrong_type(key, "a number");
                None
            }
        }
    }

    /// A value that falls back to `default` with a warning when it has the
    /// wrong shape, for records where every field must load.
    pub fn lenient<T>(
        &mut self,
        key: &str,
        default: T,
        expected: &'static str,
        extract: impl FnOnce(&Value) -> Option<T>,
    ) -> T {
        match self.get(key) {
            None => default,
            Some(value) => match extract(value) {
                Some(v) => v,
                None => {
                    self.warn(key, format!("is not {expected}, using the default"));
                    default
                }
            },
        }
    }

    // --- Catalogues ---

    pub fn required_catalogue<C: Catalogue>(&mut self, key: &str) -> Option<C> {
        match self.get(key) {
            None => {
                self.missing(key);
                None
            }
            Some(value) => self.parse_catalogue(key, value),
        }
    }

    /// A catalogue token that defaults when absent. A present token outside
    /// the catalogue is still a violation.
    pub fn catalogue_or<C: Catalogue>(&mut self, key: &str, default: C) -> C {
        match self.get(key) {
            None => default,
            Some(value) => self.parse_catalogue(key, value).unwrap_or(default),
        }
    }

    fn parse_catalogue<C: Catalogue>(&mut self, key: &str, value: &Value) -> Option<C> {
        let Value::String(token) = value else {
            self.wrong_type(key, "a string");
            return None;
        };
        match C::parse_token(token) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                let field = self.path_of(key);
                self.violate(Violation::UnknownEnumValue {
                    field,
                    value: err.token,
                    catalogue: err.catalogue,
                });
                None
            }
        }
    }

    // --- Collections ---

    fn array(&mut self, key: &str) -> Option<&'a Vec<Value>> {
        match self.get(key)? {
            Value::Array(items) => Some(items),
            _ => {
                self.wrong_type(key, "an array");
                None
            }
        }
    }

    /// A list of strings, empty when absent.
    pub fn string_list(&mut self, key: &str) -> Vec<String> {
        let Some(items) = self.array(key) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                _ => self.wrong_type(&format!("{key}[{i}]"), "a string"),
            }
        }
        out
    }

    pub fn number_list(&mut self, key: &str) -> Vec<f64> {
        let Some(items) = self.array(key) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_f64() {
                Some(n) => out.push(n),
                None => self.wrong_type(&format!("{key}[{i}]"), "a number"),
            }
        }
        out
    }

    /// The raw object under `key`, if present and an object.
    pub fn object(&mut self, key: &str) -> Option<&'a Map<String, Value>> {
        match self.get(key)? {
            Value::Object(map) => Some(map),
            _ => {
                self.wrong_type(key, "an object");
                None
            }
        }
    }

    /// A nested record whose violations belong to this record.
    pub fn required_nested<T: FromRecord>(&mut self, key: &str) -> Option<T> {
        if self.get(key).is_none() {
            self.missing(key);
            return None;
        }
        self.optional_nested(key)
    }

    pub fn optional_nested<T: FromRecord>(&mut self, key: &str) -> Option<T> {
        let object = self.object(key)?;
        let path = self.path_of(key);
        T::read(&mut self.child(object, path))
    }

    /// A nested record found under a computed path such as a map entry.
    pub fn nested_at<T: FromRecord>(&mut self, key: &str, value: &'a Value) -> Option<T> {
        let Value::Object(object) = value else {
            self.wrong_type(key, "an object");
            return None;
        };
        let path = self.path_of(key);
        T::read(&mut self.child(object, path))
    }

    /// A list of nested values whose violations belong to this record.
    pub fn nested_list<T: FromRecord>(&mut self, key: &str) -> Vec<T> {
        let Some(items) = self.array(key) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_key = format!("{key}[{i}]");
            let Value::Object(object) = item else {
                self.wrong_type(&item_key, "an object");
                continue;
            };
            let path = self.path_of(&item_key);
            if let Some(value) = T::read(&mut self.child(object, path)) {
                out.push(value);
            }
        }
        out
    }

    /// A nested value that is dropped with a warning when malformed,
    /// instead of failing this record.
    pub fn isolated<T: FromRecord>(&mut self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        let path = self.path_of(key);
        self.read_isolated(value, path)
    }

    /// A list of entities with their own ids. Malformed items are dropped
    /// with a warning; repeated ids keep the last occurrence, in place.
    pub fn entity_list<T: FromRecord + Identified>(&mut self, key: &str) -> Vec<T> {
        let Some(items) = self.array(key) else {
            return Vec::new();
        };
        let mut accepted = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = self.path_of(&format!("{key}[{i}]"));
            if let Some(value) = self.read_isolated::<T>(item, path) {
                accepted.push(value);
            }
        }

        let mut last_seen: HashMap<&str, usize> = HashMap::new();
        for (i, item) in accepted.iter().enumerate() {
            last_seen.insert(item.record_id(), i);
        }
        if last_seen.len() == accepted.len() {
            return accepted;
        }

        let keep: Vec<bool> = accepted
            .iter()
            .enumerate()
            .map(|(i, item)| last_seen.get(item.record_id()) == Some(&i))
            .collect();
        let dropped = keep.iter().filter(|k| !**k).count();
        self.warn(
            key,
            format!("dropped {dropped} item(s) with a repeated id, keeping the last"),
        );
        accepted
            .into_iter()
            .zip(keep)
            .filter_map(|(item, keep)| keep.then_some(item))
            .collect()
    }

    fn read_isolated<T: FromRecord>(&mut self, value: &'a Value, path: String) -> Option<T> {
        let Value::Object(object) = value else {
            self.findings.warnings.push(ValidationWarning::new(
                path,
                "quarantined: not an object",
            ));
            return None;
        };
        let mut local = Findings::default();
        let read = T::read(&mut RecordReader {
            fields: object,
            path: path.clone(),
            findings: &mut local,
        });
        match read {
            Some(value) if local.is_clean() => {
                self.findings.warnings.append(&mut local.warnings);
                Some(value)
            }
            _ => {
                let summary = local.summary();
                self.findings
                    .warnings
                    .push(ValidationWarning::new(path, format!("quarantined: {summary}")));
                None
            }
        }
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        _ => None,
    }
}
