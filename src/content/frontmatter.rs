//! Front-matter extraction and schema validation
//!
//! Content files carry a YAML front-matter block delimited by `---` lines.
//! The schema is closed: `title` and `date` are required, `description`,
//! `draft` and `tags` are optional, unknown fields are ignored. Validation
//! accumulates every violated field before failing, so one pass over a bad
//! document reports all of its problems.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

use crate::error::{FieldViolation, PipelineError};

/// A content file split into raw front matter and body, before validation
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Absolute path of the source file
    pub source_path: PathBuf,
    /// Path relative to the content root (slug derivation input)
    pub rel_path: PathBuf,
    /// Raw front-matter mapping as extracted from the header
    pub front_matter: Mapping,
    /// Untransformed body text
    pub body: String,
}

impl RawDocument {
    /// Split file contents into a front-matter mapping and the body.
    ///
    /// A missing or empty front-matter block yields an empty mapping; the
    /// required-field checks in [`FrontMatter::validate`] then report it.
    /// A present but syntactically invalid block is a schema error.
    pub fn parse(
        source_path: &Path,
        rel_path: &Path,
        contents: &str,
    ) -> Result<Self, PipelineError> {
        let (front_matter, body) = split_front_matter(contents).map_err(|message| {
            PipelineError::Schema {
                path: source_path.to_path_buf(),
                violations: vec![FieldViolation::new("front matter", message)],
            }
        })?;

        Ok(Self {
            source_path: source_path.to_path_buf(),
            rel_path: rel_path.to_path_buf(),
            front_matter,
            body,
        })
    }
}

/// Extract the YAML mapping between the opening and closing `---` lines.
/// Returns the mapping and the remaining body text.
fn split_front_matter(contents: &str) -> Result<(Mapping, String), String> {
    let trimmed = contents.trim_start_matches('\u{feff}');

    let Some(rest) = trimmed.strip_prefix("---") else {
        return Ok((Mapping::new(), trimmed.to_string()));
    };
    let rest = rest.trim_start_matches(['\r', '\n']);

    // The closing delimiter may come right after the opening one: an
    // empty block, not an unterminated one.
    if let Some(body) = rest.strip_prefix("---") {
        return Ok((Mapping::new(), body.trim_start_matches(['\r', '\n']).to_string()));
    }

    let Some(end) = rest.find("\n---") else {
        return Err("unterminated front-matter block".to_string());
    };

    let yaml = &rest[..end];
    let body = rest[end + 4..]
        .trim_start_matches(['\r', '\n'])
        .to_string();

    if yaml.trim().is_empty() {
        return Ok((Mapping::new(), body));
    }

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(map)) => Ok((map, body)),
        Ok(_) => Err("front matter is not a mapping".to_string()),
        Err(e) => Err(format!("front matter is not valid YAML: {e}")),
    }
}

/// Validated front matter: the closed schema every post satisfies
#[derive(Debug, Clone)]
pub struct FrontMatter {
    pub title: String,
    pub date: DateTime<FixedOffset>,
    pub description: Option<String>,
    pub draft: bool,
    pub tags: Vec<String>,
}

impl FrontMatter {
    /// Validate a raw front-matter mapping against the schema.
    ///
    /// Collects every violation rather than stopping at the first one.
    pub fn validate(raw: &RawDocument) -> Result<Self, PipelineError> {
        let map = &raw.front_matter;
        let mut violations = Vec::new();

        let title = match map.get("title") {
            None => {
                violations.push(FieldViolation::new("title", "missing required field"));
                None
            }
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::String(_)) => {
                violations.push(FieldViolation::new("title", "must not be empty"));
                None
            }
            Some(other) => {
                violations.push(FieldViolation::new(
                    "title",
                    format!("expected a string, got {}", type_name(other)),
                ));
                None
            }
        };

        let date = match map.get("date") {
            None => {
                violations.push(FieldViolation::new("date", "missing required field"));
                None
            }
            Some(Value::String(s)) => match parse_iso8601(s) {
                Some(dt) => Some(dt),
                None => {
                    violations.push(FieldViolation::new(
                        "date",
                        format!("{s:?} is not a valid ISO-8601 datetime"),
                    ));
                    None
                }
            },
            Some(other) => {
                violations.push(FieldViolation::new(
                    "date",
                    format!("expected an ISO-8601 string, got {}", type_name(other)),
                ));
                None
            }
        };

        let description = match map.get("description") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                violations.push(FieldViolation::new(
                    "description",
                    format!("expected a string, got {}", type_name(other)),
                ));
                None
            }
        };

        // Absent defaults to false; anything other than a boolean is an
        // error, never coerced.
        let draft = match map.get("draft") {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                violations.push(FieldViolation::new(
                    "draft",
                    format!("expected a boolean, got {}", type_name(other)),
                ));
                false
            }
        };

        let tags = match map.get("tags") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(seq)) => {
                let mut tags = Vec::with_capacity(seq.len());
                let mut ok = true;
                for item in seq {
                    match item {
                        Value::String(s) => tags.push(s.clone()),
                        other => {
                            violations.push(FieldViolation::new(
                                "tags",
                                format!("expected a string entry, got {}", type_name(other)),
                            ));
                            ok = false;
                            break;
                        }
                    }
                }
                if ok {
                    tags
                } else {
                    Vec::new()
                }
            }
            Some(other) => {
                violations.push(FieldViolation::new(
                    "tags",
                    format!("expected a sequence of strings, got {}", type_name(other)),
                ));
                Vec::new()
            }
        };

        if !violations.is_empty() {
            return Err(PipelineError::Schema {
                path: raw.source_path.clone(),
                violations,
            });
        }

        // title/date are Some whenever violations is empty
        Ok(Self {
            title: title.unwrap_or_default(),
            date: date.unwrap_or_else(|| Utc::now().fixed_offset()),
            description,
            draft,
            tags,
        })
    }
}

/// Parse an ISO-8601 datetime string. Accepts RFC 3339 (with offset or `Z`)
/// and the naive `YYYY-MM-DDTHH:MM:SS` form, which is taken as UTC.
fn parse_iso8601(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    None
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
