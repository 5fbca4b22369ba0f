//! Metadata header parser for skill documents.
//!
//! A header is the YAML block between two `---` lines at the top of the
//! file. It is deserialized into [`Header`]: `name`, `description` and
//! `tags` are typed, every other key is kept as a JSON value so nested maps
//! survive intact.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

const DELIMITER: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("document does not start with a '---' header")]
    MissingOpening,
    #[error("header opened on line {0} is never closed")]
    Unterminated(usize),
    #[error("header opened on line {line} is not valid YAML: {reason}")]
    Invalid { line: usize, reason: String },
}

/// Typed view of a header block. Keys are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Header {
    #[serde(default, deserialize_with = "scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub description: Option<String>,
    /// A YAML sequence or a comma-separated string.
    #[serde(default, deserialize_with = "tag_list")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Parsed header plus the remaining document body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillDocument {
    pub header: Header,
    pub body: String,
}

impl SkillDocument {
    pub fn name(&self) -> Option<String> {
        self.header.name.clone()
    }

    pub fn description(&self) -> Option<String> {
        self.header.description.clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.header.tags.clone()
    }

    /// A top-level extra field rendered as a string. Empty values read as `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.header
            .extra
            .get(key)
            .map(render)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Every field other than name, description and tags. Scalars render
    /// as plain text, sequences and maps as compact JSON.
    pub fn extra(&self) -> BTreeMap<String, String> {
        self.header
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), render(v)))
            .collect()
    }
}

/// Split a document into its header and body.
pub fn parse_document(content: &str) -> Result<SkillDocument, HeaderError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut offset = 0;
    let mut line_no = 0;
    let mut opened: Option<(usize, usize)> = None;
    let mut closed: Option<(usize, usize)> = None;

    for raw in content.split_inclusive('\n') {
        line_no += 1;
        let start = offset;
        offset += raw.len();
        let line = raw.trim_end_matches(['\n', '\r']).trim_end();

        match opened {
            None => {
                if line.trim().is_empty() {
                    continue;
                }
                if line != DELIMITER {
                    return Err(HeaderError::MissingOpening);
                }
                opened = Some((line_no, offset));
            }
            Some(_) => {
                if line == DELIMITER {
                    closed = Some((start, offset));
                    break;
                }
            }
        }
    }

    let (opened_at, header_start) = opened.ok_or(HeaderError::MissingOpening)?;
    let (header_end, body_start) = closed.ok_or(HeaderError::Unterminated(opened_at))?;

    let header = parse_header(&content[header_start..header_end]).map_err(|reason| {
        HeaderError::Invalid {
            line: opened_at,
            reason,
        }
    })?;
    let body = content[body_start..]
        .trim_start_matches(['\n', '\r'])
        .to_string();

    Ok(SkillDocument { header, body })
}

fn parse_header(yaml: &str) -> Result<Header, String> {
    if yaml.trim().is_empty() {
        return Ok(Header::default());
    }

    let raw: Option<Map<String, Value>> =
        serde_yaml_bw::from_str(yaml).map_err(|e| e.to_string())?;

    let mut fields = Map::new();
    for (key, value) in raw.unwrap_or_default() {
        let key = key.trim().to_lowercase();
        if fields.contains_key(&key) {
            debug!(key = %key, "header key repeated with different case, later value wins");
        }
        fields.insert(key, value);
    }

    serde_json::from_value(Value::Object(fields)).map_err(|e| e.to_string())
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let text = render(&value).trim().to_string();
    Ok((!text.is_empty()).then_some(text))
}

fn tag_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let items = match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Array(items) => items.iter().map(render).collect(),
        scalar @ (Value::Bool(_) | Value::Number(_)) => vec![render(&scalar)],
        Value::Object(_) => {
            return Err(de::Error::custom(
                "tags must be a list or a comma-separated string",
            ))
        }
    };
    Ok(items
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}
