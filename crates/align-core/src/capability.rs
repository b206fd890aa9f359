//! Host bindings the core drives but never implements itself: the editable
//! content surface, embedded sub-block renderers, media resolution, syntax
//! highlighting and computed style reads.

use std::fmt;
use std::rc::Rc;

use crate::background::MediaFile;
use crate::section::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionInfo {
    pub collapsed: bool,
    /// Bounding box of the selection in viewport coordinates.
    pub rect: Rect,
}

impl SelectionInfo {
    pub fn collapsed_at(rect: Rect) -> Self {
        Self {
            collapsed: true,
            rect,
        }
    }

    pub fn range(rect: Rect) -> Self {
        Self {
            collapsed: false,
            rect,
        }
    }
}

/// Formatting state at the current cursor or selection.
pub trait FormatState {
    fn query_state(&self, command: &str) -> bool;
    fn query_value(&self, command: &str) -> Option<String>;
    fn query_enabled(&self, _command: &str) -> bool {
        true
    }
}

/// Formatting state of nothing in particular, used when no section is active.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankState;

impl FormatState for BlankState {
    fn query_state(&self, _command: &str) -> bool {
        false
    }

    fn query_value(&self, _command: &str) -> Option<String> {
        None
    }
}

pub trait EditableSurface: FormatState {
    /// Current inner markup of the content container.
    fn markup(&self) -> String;
    fn set_markup(&mut self, markup: &str);
    /// Literal rendered text of the container, markup stripped.
    fn text(&self) -> String;
    fn selection(&self) -> Option<SelectionInfo>;
    /// Applies a formatting command at the selection. Returns whether the
    /// surface accepted it.
    fn apply_format(&mut self, command: &str, value: Option<&str>) -> bool;
    fn focus(&mut self);
    /// Places the selection on the first block of the content.
    fn select_first_block(&mut self);
}

pub trait SurfaceFactory {
    fn create(&self, markup: &str) -> Box<dyn EditableSurface>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubBlockKind {
    Figure,
    Table,
    Link,
}

impl SubBlockKind {
    pub const ALL: [SubBlockKind; 3] = [SubBlockKind::Figure, SubBlockKind::Table, SubBlockKind::Link];

    pub fn tag(self) -> &'static str {
        match self {
            SubBlockKind::Figure => "figure",
            SubBlockKind::Table => "table",
            SubBlockKind::Link => "a",
        }
    }
}

pub trait SubBlockRenderer {
    /// Enables editing affordances on an embedded element.
    fn attach(&self, _kind: SubBlockKind, _element: &str) {}

    /// Produces the static render of an embedded element, without any
    /// editing affordances.
    fn flatten(&self, _kind: SubBlockKind, element: &str) -> String {
        element.to_string()
    }
}

pub trait MediaResolver {
    /// Resolves a file handle to a displayable URL owned by the caller.
    fn resolve(&self, file: &MediaFile) -> String;
    /// Releases a URL previously returned by `resolve`.
    fn release(&self, url: &str);
}

pub trait Highlighter {
    fn highlight(&self, section: SectionId, source: &str);
}

pub trait ComputedStyle {
    fn property(&self, section: SectionId, name: &str) -> Option<String>;
}

#[derive(Clone)]
pub struct Services {
    pub surfaces: Rc<dyn SurfaceFactory>,
    pub renderer: Rc<dyn SubBlockRenderer>,
    pub media: Rc<dyn MediaResolver>,
    pub highlighter: Rc<dyn Highlighter>,
    pub computed_style: Rc<dyn ComputedStyle>,
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
