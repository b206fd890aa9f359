use serde::{Deserialize, Serialize};

use crate::error::AlignError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylerMode {
    #[default]
    Default,
    /// Hidden while the selection is collapsed, floating above it otherwise.
    Bubble,
}

/// A command table entry: a format name, or an inline override of a format
/// with its own option values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandEntry {
    Name(String),
    Inline(InlineCommand),
}

impl CommandEntry {
    /// Name of the format the entry refers to.
    pub fn format_name(&self) -> &str {
        match self {
            CommandEntry::Name(name) => name,
            CommandEntry::Inline(inline) => &inline.element,
        }
    }
}

impl From<&str> for CommandEntry {
    fn from(name: &str) -> Self {
        CommandEntry::Name(name.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineCommand {
    pub element: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub icons: Vec<String>,
}

fn default_commands() -> Vec<CommandEntry> {
    ["bold", "italic", "underline"]
        .into_iter()
        .map(CommandEntry::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylerConfig {
    #[serde(default)]
    pub mode: StylerMode,
    #[serde(default = "default_commands")]
    pub commands: Vec<CommandEntry>,
}

impl Default for StylerConfig {
    fn default() -> Self {
        Self {
            mode: StylerMode::Default,
            commands: default_commands(),
        }
    }
}

fn default_section_mode() -> StylerMode {
    StylerMode::Bubble
}

fn default_true() -> bool {
    true
}

fn default_position() -> String {
    "left-top".to_string()
}

fn default_section_commands() -> Vec<CommandEntry> {
    vec![
        "_sectionUp".into(),
        "_sectionDown".into(),
        "_sectionToggleHTML".into(),
        "_sectionDuplicate".into(),
        CommandEntry::Inline(InlineCommand {
            element: "classes".to_string(),
            values: vec!["normal".to_string(), "full".to_string()],
            icons: vec!["sectionNormal".to_string(), "sectionFull".to_string()],
        }),
        "remove".into(),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionToolbarConfig {
    #[serde(default = "default_section_mode")]
    pub mode: StylerMode,
    #[serde(default = "default_true")]
    pub hide_when_click_out: bool,
    #[serde(default = "default_true")]
    pub tooltip: bool,
    #[serde(default = "default_position")]
    pub position: String,
    #[serde(default = "default_section_commands")]
    pub commands: Vec<CommandEntry>,
}

impl Default for SectionToolbarConfig {
    fn default() -> Self {
        Self {
            mode: default_section_mode(),
            hide_when_click_out: true,
            tooltip: true,
            position: default_position(),
            commands: default_section_commands(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default)]
    pub toolbar: StylerConfig,
    #[serde(default)]
    pub section_toolbar: SectionToolbarConfig,
}

impl DocumentConfig {
    pub fn from_json_str(s: &str) -> Result<Self, AlignError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, AlignError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
