use std::fmt;

use crate::capability::{FormatState, SelectionInfo};
use crate::config::{CommandEntry, StylerMode};
use crate::format::{Action, FormatDef, FormatElement, FormatTable, SelectOption};

const BUBBLE_OFFSET_Y: f32 = 70.0;
const BUBBLE_MIN_LEFT: f32 = 50.0;

/// Richer state holder for a control, e.g. a colour picker.
pub trait SubController {
    /// Command whose value the controller mirrors.
    fn source_command(&self) -> &str;
    fn sync(&mut self, value: Option<&str>);
    fn value(&self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPicker {
    source: String,
    selected: Option<String>,
}

impl ColorPicker {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            selected: None,
        }
    }
}

impl SubController for ColorPicker {
    fn source_command(&self) -> &str {
        &self.source
    }

    fn sync(&mut self, value: Option<&str>) {
        self.selected = value.and_then(normalize_color);
    }

    fn value(&self) -> Option<String> {
        self.selected.clone()
    }
}

/// `rgb(r, g, b)` and `rgba(..)` become `#rrggbb`; anything else is kept
/// lowercased.
pub fn normalize_color(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == "false" {
        return None;
    }
    let lower = value.to_ascii_lowercase();
    let channels = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'));
    let Some(channels) = channels else {
        return Some(lower);
    };
    let rgb: Vec<u8> = channels
        .split(',')
        .take(3)
        .filter_map(|c| c.trim().parse::<f32>().ok())
        .map(|c| c.round().clamp(0.0, 255.0) as u8)
        .collect();
    match rgb.as_slice() {
        [r, g, b] => Some(format!("#{r:02x}{g:02x}{b:02x}")),
        _ => Some(lower),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlState {
    pub active: bool,
    pub disabled: bool,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Press,
    Select(String),
    Input(String),
}

pub struct Control {
    pub name: String,
    pub element: FormatElement,
    pub action: Option<Action>,
    pub icon: Option<String>,
    pub tooltip: Option<String>,
    /// Markup produced by a custom element when the toolbar was built.
    pub markup: Option<String>,
    pub state: ControlState,
    sub: Option<Box<dyn SubController>>,
}

impl Control {
    fn build(name: &str, def: &FormatDef) -> Self {
        let markup = match &def.element {
            FormatElement::Custom(create) => Some(create()),
            _ => None,
        };
        Self {
            name: name.to_string(),
            element: def.element.clone(),
            action: def.action.clone(),
            icon: def.icon.clone(),
            tooltip: def.tooltip.clone(),
            markup,
            state: ControlState::default(),
            sub: def.sub_controller.as_ref().map(|factory| factory()),
        }
    }

    /// Styling and custom entries carry no state to sync.
    pub fn is_stateful(&self) -> bool {
        matches!(
            self.element,
            FormatElement::Button | FormatElement::Select(_) | FormatElement::Input(_)
        )
    }

    pub fn options(&self) -> &[SelectOption] {
        match &self.element {
            FormatElement::Select(options) => options,
            _ => &[],
        }
    }

    pub fn sub_value(&self) -> Option<String> {
        self.sub.as_ref().and_then(|sub| sub.value())
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("name", &self.name)
            .field("element", &self.element.name())
            .field("action", &self.action)
            .field("state", &self.state)
            .field("sub", &self.sub_value())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToolbarPosition {
    pub top: f32,
    pub left: f32,
}

/// A toolbar built from a command table, kept in sync with the formatting
/// state of whatever it edits.
#[derive(Debug)]
pub struct Styler {
    mode: StylerMode,
    controls: Vec<Control>,
    visible: bool,
    width: f32,
    position: Option<ToolbarPosition>,
}

impl Styler {
    pub fn new(mode: StylerMode, commands: &[CommandEntry], table: &FormatTable) -> Self {
        let mut controls = Vec::with_capacity(commands.len());
        for entry in commands {
            let name = entry.format_name();
            let Some(def) = table.get(name) else {
                tracing::warn!(command = %name, "command is not found");
                continue;
            };
            let mut control = Control::build(name, def);
            if let CommandEntry::Inline(inline) = entry {
                if !matches!(control.element, FormatElement::Select(_)) {
                    tracing::warn!(
                        command = %name,
                        element = control.element.name(),
                        "inline values only apply to select entries"
                    );
                } else if !inline.values.is_empty() {
                    let options = inline
                        .values
                        .iter()
                        .enumerate()
                        .map(|(ix, value)| SelectOption {
                            value: value.clone(),
                            text: value.clone(),
                            icon: inline.icons.get(ix).cloned(),
                        })
                        .collect();
                    control.element = FormatElement::Select(options);
                }
            }
            controls.push(control);
        }

        Self {
            mode,
            controls,
            visible: mode == StylerMode::Default,
            width: 0.0,
            position: None,
        }
    }

    pub fn mode(&self) -> StylerMode {
        self.mode
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.name == name)
    }

    /// The action and value a trigger of `name` results in.
    pub fn resolve(&self, name: &str, intent: Intent) -> Option<(Action, Option<String>)> {
        let Some(control) = self.control(name) else {
            tracing::debug!(control = %name, "no such control");
            return None;
        };
        let Some(action) = control.action.clone() else {
            tracing::debug!(control = %name, "control has no action");
            return None;
        };
        if control.state.disabled {
            tracing::debug!(control = %name, "control is disabled");
            return None;
        }
        let value = match intent {
            Intent::Press => match &action {
                Action::Format { value, .. } => value.clone(),
                Action::Delegate(_) => None,
            },
            Intent::Select(value) | Intent::Input(value) => Some(value),
        };
        Some((action, value))
    }

    /// Refreshes active/value state of every control from `state`.
    pub fn sync<S: FormatState + ?Sized>(&mut self, state: &S) {
        let block = state.query_value("formatBlock");
        for control in self.controls.iter_mut().filter(|c| c.is_stateful()) {
            control.state.disabled = !state.query_enabled(&control.name);

            if state.query_state(&control.name) || block.as_deref() == Some(control.name.as_str())
            {
                control.state.active = true;
                continue;
            }
            control.state.active = false;

            if let Some(value) = state
                .query_value(&control.name)
                .filter(|v| !v.is_empty() && v != "false")
            {
                control.state.value = Some(value);
                continue;
            }
            if let Some(sub) = control.sub.as_mut() {
                let value = state.query_value(sub.source_command());
                sub.sync(value.as_deref());
            }
        }
    }

    /// Shows the bubble above a range selection and hides it otherwise.
    /// Default-mode toolbars ignore selections.
    pub fn sync_selection(&mut self, selection: Option<SelectionInfo>) {
        if self.mode != StylerMode::Bubble {
            return;
        }
        match selection {
            Some(selection) if !selection.collapsed => {
                let rect = selection.rect;
                self.visible = true;
                self.position = Some(ToolbarPosition {
                    top: (rect.y - BUBBLE_OFFSET_Y).max(0.0),
                    left: (rect.x + rect.width / 2.0 - self.width / 2.0).max(BUBBLE_MIN_LEFT),
                });
            }
            _ => self.hide(),
        }
    }

    /// Rendered toolbar width, used to centre the bubble.
    pub fn set_width(&mut self, width: f32) {
        self.width = width.max(0.0);
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> Option<ToolbarPosition> {
        self.position
    }
}
