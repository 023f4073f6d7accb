// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment reports every problem it found in one error; [`from_figment`]
//! splits it into one [`ConfigError`] per problem. An unknown key is matched
//! against the keys its section accepts, and when the TOML text it came
//! from is at hand the report underlines the key.

#![allow(unused_assignments)] // miette's Diagnostic derive triggers this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a valid key needs to be offered as a correction.
const SIMILARITY_FLOOR: f64 = 0.75;

/// Name given to TOML passed in as a string.
pub const INLINE_SOURCE: &str = "<inline>";

/// TOML text a configuration was read from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub name: String,
    pub text: String,
}

impl ConfigSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("`{key}` is not a keepsake setting")]
    #[diagnostic(
        code(keepsake::config::unknown_key),
        help("{}", correction_help(suggestion.as_deref(), accepted))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        /// Keys the section accepts, comma-separated.
        accepted: String,
        #[label("unrecognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(keepsake::config::invalid_type), help("use {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("`{key}` is required")]
    #[diagnostic(
        code(keepsake::config::missing_key),
        help("set `{key}` in keepsake.toml")
    )]
    MissingKey { key: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(keepsake::config::validation))]
    Validation { message: String },

    #[error("{0}")]
    #[diagnostic(code(keepsake::config::other))]
    Other(String),
}

fn correction_help(suggestion: Option<&str>, accepted: &str) -> String {
    let mut help = String::new();
    if let Some(key) = suggestion {
        help.push_str(&format!("perhaps `{key}`? "));
    }
    help.push_str("accepted here: ");
    help.push_str(accepted);
    help
}

/// One diagnostic per problem inside `err`.
pub fn from_figment(err: figment::Error, sources: &[ConfigSource]) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, accepted) => {
                let (span, src) = underline(&error, field, sources).unzip();
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: closest_key(field, accepted),
                    accepted: accepted.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: dotted(&error.path, field),
            },
            Kind::InvalidType(found, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("got {found}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

fn dotted(path: &[String], field: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(field))
        .collect::<Vec<_>>()
        .join(".")
}

/// Span of `field` in the source `error` came from.
fn underline(
    error: &figment::error::Error,
    field: &str,
    sources: &[ConfigSource],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let name = match error.metadata.as_ref().and_then(|m| m.source.as_ref()) {
        Some(figment::Source::File(path)) => path.display().to_string(),
        Some(_) => return None,
        None => INLINE_SOURCE.to_string(),
    };
    let source = sources.iter().find(|s| s.name == name)?;
    let offset = key_offset(&source.text, error.path.first().map(String::as_str), field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(&source.name, source.text.clone()),
    ))
}

/// Byte offset of `field` in `text`, inside `[section]` or, without a
/// section, before the first table header.
pub fn key_offset(text: &str, section: Option<&str>, field: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let body = line.trim_start();
        if let Some(header) = body.strip_prefix('[') {
            current = header.split(']').next().map(str::trim);
            continue;
        }
        if current != section {
            continue;
        }
        let rest = match body.strip_prefix(field) {
            Some(rest) => rest,
            None => continue,
        };
        if rest.trim_start().starts_with('=') {
            return Some(start + line.len() - body.len());
        }
    }
    None
}

/// The accepted key closest to `unknown`, when one is close enough.
pub fn closest_key(unknown: &str, accepted: &[&str]) -> Option<String> {
    let (score, key) = accepted
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .max_by(|a, b| a.0.total_cmp(&b.0))?;
    (score > SIMILARITY_FLOOR).then(|| key.to_owned())
}

/// Print every error to stderr as a miette report.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{report}"),
            Err(_) => eprintln!("config: {error}"),
        }
    }
}
