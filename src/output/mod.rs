//! Output formatting module
//!
//! Renders sparse display records as a table, YAML or JSON.

mod table;

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

pub use self::table::render_table;

/// One displayable item: a name plus only the attributes that have a value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub name: String,
    /// Attribute name/value pairs in display order
    pub attributes: Vec<(String, String)>,
}

impl Record {
    /// Create a record with no attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute unless the value is absent or empty
    pub fn with(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.attributes.push((key.to_string(), v.to_string()));
        }
        self
    }

    /// Look up an attribute value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Serializable form used for YAML/JSON output
#[derive(Serialize)]
struct Resource<'a> {
    kind: &'a str,
    metadata: Metadata<'a>,
    spec: BTreeMap<&'a str, &'a str>,
}

#[derive(Serialize)]
struct Metadata<'a> {
    name: &'a str,
}

impl<'a> Resource<'a> {
    fn new(kind: &'a str, record: &'a Record) -> Self {
        Self {
            kind,
            metadata: Metadata { name: &record.name },
            spec: record
                .attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        }
    }
}

/// Render records of one kind to `out` in the requested format
pub fn render<W: Write>(
    out: &mut W,
    kind: &str,
    records: &[Record],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => render_table(out, records)?,
        OutputFormat::Json => {
            let resources: Vec<Resource> = records.iter().map(|r| Resource::new(kind, r)).collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&resources)?)?;
        }
        OutputFormat::Yaml => {
            let resources: Vec<Resource> = records.iter().map(|r| Resource::new(kind, r)).collect();
            write!(out, "{}", serde_yml::to_string(&resources)?)?;
        }
    }
    Ok(())
}

/// Mask a token for display: show last 4 chars only
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() >= 4 {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    } else {
        "****".to_string()
    }
}
