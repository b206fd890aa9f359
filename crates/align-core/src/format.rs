use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::styler::{ColorPicker, SubController};

/// Document controller operations a toolbar control can delegate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentAction {
    AddSection,
    MoveUp,
    MoveDown,
    ToggleRawView,
    Duplicate,
    Remove,
    SetModifier,
}

/// What a control does when triggered. Chosen once, when the format is
/// registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Format {
        command: String,
        value: Option<String>,
    },
    Delegate(DocumentAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
    pub icon: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            icon: None,
        }
    }
}

#[derive(Clone)]
pub enum FormatElement {
    Button,
    Select(Vec<SelectOption>),
    /// Input with its HTML input type.
    Input(String),
    /// Presentational entry carrying only a class, e.g. a separator.
    Styling(String),
    /// Host-provided markup.
    Custom(Rc<dyn Fn() -> String>),
}

impl FormatElement {
    pub fn name(&self) -> &'static str {
        match self {
            FormatElement::Button => "button",
            FormatElement::Select(_) => "select",
            FormatElement::Input(_) => "input",
            FormatElement::Styling(_) => "styling",
            FormatElement::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for FormatElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatElement::Button => f.write_str("Button"),
            FormatElement::Select(options) => f.debug_tuple("Select").field(options).finish(),
            FormatElement::Input(ty) => f.debug_tuple("Input").field(ty).finish(),
            FormatElement::Styling(class) => f.debug_tuple("Styling").field(class).finish(),
            FormatElement::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

pub type SubControllerFactory = Rc<dyn Fn() -> Box<dyn SubController>>;

#[derive(Clone)]
pub struct FormatDef {
    pub element: FormatElement,
    pub action: Option<Action>,
    pub icon: Option<String>,
    pub tooltip: Option<String>,
    pub sub_controller: Option<SubControllerFactory>,
}

impl FormatDef {
    pub fn new(element: FormatElement) -> Self {
        Self {
            element,
            action: None,
            icon: None,
            tooltip: None,
            sub_controller: None,
        }
    }

    pub fn button() -> Self {
        Self::new(FormatElement::Button)
    }

    pub fn select<I>(options: I) -> Self
    where
        I: IntoIterator<Item = SelectOption>,
    {
        Self::new(FormatElement::Select(options.into_iter().collect()))
    }

    pub fn input(input_type: impl Into<String>) -> Self {
        Self::new(FormatElement::Input(input_type.into()))
    }

    pub fn styling(class: impl Into<String>) -> Self {
        Self::new(FormatElement::Styling(class.into()))
    }

    pub fn custom(create: impl Fn() -> String + 'static) -> Self {
        Self::new(FormatElement::Custom(Rc::new(create)))
    }

    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.action = Some(Action::Format {
            command: command.into(),
            value: None,
        });
        self
    }

    pub fn command_value(mut self, command: impl Into<String>, value: impl Into<String>) -> Self {
        self.action = Some(Action::Format {
            command: command.into(),
            value: Some(value.into()),
        });
        self
    }

    pub fn delegate(mut self, action: DocumentAction) -> Self {
        self.action = Some(Action::Delegate(action));
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn sub_controller(
        mut self,
        factory: impl Fn() -> Box<dyn SubController> + 'static,
    ) -> Self {
        self.sub_controller = Some(Rc::new(factory));
        self
    }
}

impl fmt::Debug for FormatDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatDef")
            .field("element", &self.element)
            .field("action", &self.action)
            .field("icon", &self.icon)
            .field("tooltip", &self.tooltip)
            .field("sub_controller", &self.sub_controller.is_some())
            .finish()
    }
}

/// Named control definitions a toolbar is built from.
#[derive(Debug, Clone, Default)]
pub struct FormatTable {
    formats: HashMap<String, FormatDef>,
}

impl FormatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut table = Self::new();

        for (name, tooltip) in [
            ("bold", "Bold"),
            ("italic", "Italic"),
            ("underline", "Underline"),
            ("strikethrough", "Strikethrough"),
            ("subscript", "Subscript"),
            ("superscript", "Superscript"),
            ("justifyLeft", "Align left"),
            ("justifyCenter", "Align center"),
            ("justifyRight", "Align right"),
            ("justifyFull", "Justify"),
            ("insertOrderedList", "Ordered list"),
            ("insertUnorderedList", "Unordered list"),
            ("removeFormat", "Clear formatting"),
        ] {
            table.extend(
                name,
                FormatDef::button()
                    .command(name)
                    .icon(name)
                    .tooltip(tooltip),
            );
        }

        for block in ["h1", "h2", "h3", "h4", "p", "blockquote", "pre"] {
            table.extend(
                block,
                FormatDef::button()
                    .command_value("formatBlock", block)
                    .icon(block)
                    .tooltip(block),
            );
        }

        table.extend(
            "fontSize",
            FormatDef::select([
                SelectOption::new("2", "Small"),
                SelectOption::new("3", "Normal"),
                SelectOption::new("5", "Large"),
                SelectOption::new("7", "Huge"),
            ])
            .command("fontSize")
            .tooltip("Font size"),
        );
        table.extend(
            "color",
            FormatDef::input("text")
                .command("foreColor")
                .tooltip("Text color")
                .sub_controller(|| Box::new(ColorPicker::new("foreColor"))),
        );
        table.extend(
            "highlight",
            FormatDef::input("text")
                .command("hiliteColor")
                .tooltip("Highlight")
                .sub_controller(|| Box::new(ColorPicker::new("hiliteColor"))),
        );
        table.extend("separator", FormatDef::styling("separator"));

        table.extend(
            "html",
            FormatDef::button()
                .delegate(DocumentAction::ToggleRawView)
                .icon("html")
                .tooltip("Toggle HTML"),
        );
        for (name, action, tooltip) in [
            ("_sectionUp", DocumentAction::MoveUp, "Move up"),
            ("_sectionDown", DocumentAction::MoveDown, "Move down"),
            ("_sectionToggleHTML", DocumentAction::ToggleRawView, "Toggle HTML"),
            ("_sectionDuplicate", DocumentAction::Duplicate, "Duplicate"),
            ("remove", DocumentAction::Remove, "Remove section"),
            ("addSection", DocumentAction::AddSection, "Add section"),
        ] {
            table.extend(
                name,
                FormatDef::button().delegate(action).icon(name).tooltip(tooltip),
            );
        }
        table.extend(
            "classes",
            FormatDef::select([
                SelectOption::new("normal", "Normal"),
                SelectOption::new("full", "Full width"),
            ])
            .delegate(DocumentAction::SetModifier)
            .tooltip("Section width"),
        );

        table
    }

    /// Registers `def` under `name`, replacing an existing definition.
    pub fn extend(&mut self, name: impl Into<String>, def: FormatDef) {
        let name = name.into();
        if self.formats.insert(name.clone(), def).is_some() {
            tracing::debug!(%name, "format definition replaced");
        }
    }

    pub fn get(&self, name: &str) -> Option<&FormatDef> {
        self.formats.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}
