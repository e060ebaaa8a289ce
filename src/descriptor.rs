//! Typed view of a serverless deployment descriptor.
//!
//! Only the parts the transform reads or writes are modeled as fields;
//! everything else in the descriptor is captured by flattened `extra` maps
//! and round-trips untouched. Key order is significant for the transform's
//! output ordering, so the functions and `Resources` maps are `IndexMap`s
//! and JSON values preserve insertion order.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Root of the configuration tree handed to the transform, matching the
/// host object shape: the deployment data lives under `service`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerlessDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `service` section: a functions map, an optional resources section,
/// and whatever else the descriptor carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<IndexMap<String, FunctionDefinition>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesSection>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionDefinition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single trigger definition. Only schedule events participate in the
/// transform; any other event shape rides along in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleSpec>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSpec {
    /// Rate expression, never read by the transform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Value>,

    /// Cron expression, never read by the transform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron: Option<Value>,

    /// Constant payload delivered on every trigger. An explicit `input: null`
    /// is a present input (it stringifies to the text `null`), so plain
    /// `Option` deserialization would lose it.
    #[serde(
        default,
        deserialize_with = "deserialize_input",
        skip_serializing_if = "Option::is_none"
    )]
    pub input: Option<ScheduleInput>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keeps an explicit `input: null` distinguishable from an absent key.
fn deserialize_input<'de, D>(deserializer: D) -> std::result::Result<Option<ScheduleInput>, D::Error>
where
    D: Deserializer<'de>,
{
    ScheduleInput::deserialize(deserializer).map(Some)
}

/// A schedule input is either a literal string, used verbatim, or an
/// arbitrary structured value that is serialized at extraction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScheduleInput {
    Text(String),
    Structured(Value),
}

impl ScheduleInput {
    /// Resolve to the single text field carried into the generated resource.
    /// Strings pass through without re-serialization; structured values
    /// (including `null`) become their compact JSON form in key order.
    pub fn normalize(&self) -> String {
        match self {
            ScheduleInput::Text(text) => text.clone(),
            ScheduleInput::Structured(value) => {
                serde_json::to_string(value).expect("JSON value serialization cannot fail")
            }
        }
    }
}

/// The `resources` section. The `Resources` map is a typed field with a
/// default, so it exists (and serializes, even when empty) whenever the
/// section does.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesSection {
    #[serde(rename = "Resources", default)]
    pub resources: IndexMap<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// On-disk encoding of a descriptor, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn for_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl ServerlessDescriptor {
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = Format::for_path(path)?;
        let content = fs::read_to_string(path)?;
        match format {
            Format::Yaml => Ok(serde_yaml::from_str(&content)?),
            Format::Json => Ok(serde_json::from_str(&content)?),
        }
    }

    pub fn to_path(&self, path: &Path) -> Result<()> {
        let rendered = self.render(Format::for_path(path)?)?;
        fs::write(path, rendered)?;
        Ok(())
    }

    pub fn render(&self, format: Format) -> Result<String> {
        match format {
            Format::Yaml => Ok(serde_yaml::to_string(self)?),
            Format::Json => {
                let mut rendered = serde_json::to_string_pretty(self)?;
                rendered.push('\n');
                Ok(rendered)
            }
        }
    }
}
