use serde::{Deserialize, Serialize};

use crate::error::AlignError;
use crate::settings::SectionKind;

const DEFAULT_SCHEMA: &str = "align";
const DEFAULT_VERSION: u32 = 1;

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_version() -> u32 {
    DEFAULT_VERSION
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionValue {
    #[serde(default)]
    pub kind: SectionKind,
    pub content: String,
}

/// Versioned per-section form of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentValue {
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub sections: Vec<SectionValue>,
}

impl DocumentValue {
    pub fn from_sections(sections: Vec<SectionValue>) -> Self {
        Self {
            schema: default_schema(),
            version: default_version(),
            sections,
        }
    }

    /// Fails on a foreign schema or a version newer than this crate knows.
    pub fn validate(&self) -> Result<(), AlignError> {
        if self.schema != DEFAULT_SCHEMA {
            return Err(AlignError::UnsupportedSchema(self.schema.clone()));
        }
        if self.version > DEFAULT_VERSION {
            return Err(AlignError::UnsupportedVersion {
                found: self.version,
                supported: DEFAULT_VERSION,
            });
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, AlignError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, AlignError> {
        let value: Self = serde_json::from_str(s)?;
        value.validate()?;
        Ok(value)
    }
}
