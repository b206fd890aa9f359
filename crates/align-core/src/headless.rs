//! In-memory capability bindings. They back the playground and the tests and
//! record what the core asked of them.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use crate::background::MediaFile;
use crate::capability::{
    ComputedStyle, EditableSurface, FormatState, Highlighter, MediaResolver, SelectionInfo,
    Services, SubBlockKind, SubBlockRenderer, SurfaceFactory,
};
use crate::markup::text_content;
use crate::section::SectionId;

#[derive(Debug, Default)]
struct SurfaceState {
    markup: String,
    focused: bool,
    first_block_selected: bool,
    selection: Option<SelectionInfo>,
    toggled: BTreeSet<String>,
    values: BTreeMap<String, String>,
    applied: Vec<(String, Option<String>)>,
}

/// Editable surface keeping its content as a markup string. Clones share
/// state, so a test can keep a handle to the surface a section owns.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl HeadlessSurface {
    pub fn new(markup: &str) -> Self {
        let surface = Self::default();
        surface.state.borrow_mut().markup = markup.to_string();
        surface
    }

    pub fn set_selection(&self, selection: Option<SelectionInfo>) {
        self.state.borrow_mut().selection = selection;
    }

    /// Forces the reported state of a toggle command at the cursor.
    pub fn set_state(&self, command: &str, on: bool) {
        let mut state = self.state.borrow_mut();
        if on {
            state.toggled.insert(command.to_string());
        } else {
            state.toggled.remove(command);
        }
    }

    pub fn set_value(&self, command: &str, value: Option<&str>) {
        let mut state = self.state.borrow_mut();
        match value {
            Some(value) => {
                state.values.insert(command.to_string(), value.to_string());
            }
            None => {
                state.values.remove(command);
            }
        }
    }

    pub fn applied(&self) -> Vec<(String, Option<String>)> {
        self.state.borrow().applied.clone()
    }

    pub fn is_focused(&self) -> bool {
        self.state.borrow().focused
    }

    pub fn first_block_selected(&self) -> bool {
        self.state.borrow().first_block_selected
    }
}

impl FormatState for HeadlessSurface {
    fn query_state(&self, command: &str) -> bool {
        self.state.borrow().toggled.contains(command)
    }

    fn query_value(&self, command: &str) -> Option<String> {
        self.state.borrow().values.get(command).cloned()
    }
}

impl EditableSurface for HeadlessSurface {
    fn markup(&self) -> String {
        self.state.borrow().markup.clone()
    }

    fn set_markup(&mut self, markup: &str) {
        self.state.borrow_mut().markup = markup.to_string();
    }

    fn text(&self) -> String {
        text_content(&self.state.borrow().markup)
    }

    fn selection(&self) -> Option<SelectionInfo> {
        self.state.borrow().selection
    }

    fn apply_format(&mut self, command: &str, value: Option<&str>) -> bool {
        let mut state = self.state.borrow_mut();
        state
            .applied
            .push((command.to_string(), value.map(str::to_string)));
        match value {
            Some(value) => {
                state.values.insert(command.to_string(), value.to_string());
            }
            None => {
                if !state.toggled.remove(command) {
                    state.toggled.insert(command.to_string());
                }
            }
        }
        true
    }

    fn focus(&mut self) {
        self.state.borrow_mut().focused = true;
    }

    fn select_first_block(&mut self) {
        let mut state = self.state.borrow_mut();
        state.focused = true;
        state.first_block_selected = true;
    }
}

#[derive(Debug, Default)]
pub struct HeadlessSurfaces {
    created: RefCell<Vec<HeadlessSurface>>,
}

impl HeadlessSurfaces {
    pub fn created(&self) -> Vec<HeadlessSurface> {
        self.created.borrow().clone()
    }

    pub fn last(&self) -> Option<HeadlessSurface> {
        self.created.borrow().last().cloned()
    }
}

impl SurfaceFactory for HeadlessSurfaces {
    fn create(&self, markup: &str) -> Box<dyn EditableSurface> {
        let surface = HeadlessSurface::new(markup);
        self.created.borrow_mut().push(surface.clone());
        Box::new(surface)
    }
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    attached: RefCell<Vec<(SubBlockKind, String)>>,
}

impl RecordingRenderer {
    pub fn attached(&self) -> Vec<(SubBlockKind, String)> {
        self.attached.borrow().clone()
    }
}

impl SubBlockRenderer for RecordingRenderer {
    fn attach(&self, kind: SubBlockKind, element: &str) {
        self.attached
            .borrow_mut()
            .push((kind, element.to_string()));
    }
}

/// Resolves files to `blob:align/N` URLs and tracks which are still live.
#[derive(Debug, Default)]
pub struct HeadlessMedia {
    next: Cell<u64>,
    live: RefCell<BTreeSet<String>>,
}

impl HeadlessMedia {
    pub fn live(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live.borrow().contains(url)
    }
}

impl MediaResolver for HeadlessMedia {
    fn resolve(&self, file: &MediaFile) -> String {
        let id = self.next.get() + 1;
        self.next.set(id);
        let url = format!("blob:align/{id}");
        tracing::trace!(%url, name = %file.name, "resolved media file");
        self.live.borrow_mut().insert(url.clone());
        url
    }

    fn release(&self, url: &str) {
        if !self.live.borrow_mut().remove(url) {
            tracing::warn!(%url, "released an unknown media URL");
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingHighlighter {
    calls: RefCell<Vec<(SectionId, String)>>,
}

impl RecordingHighlighter {
    pub fn calls(&self) -> Vec<(SectionId, String)> {
        self.calls.borrow().clone()
    }
}

impl Highlighter for RecordingHighlighter {
    fn highlight(&self, section: SectionId, source: &str) {
        self.calls.borrow_mut().push((section, source.to_string()));
    }
}

#[derive(Debug, Default)]
pub struct MapComputedStyle {
    properties: RefCell<HashMap<(SectionId, String), String>>,
}

impl MapComputedStyle {
    pub fn set(&self, section: SectionId, name: &str, value: &str) {
        self.properties
            .borrow_mut()
            .insert((section, name.to_string()), value.to_string());
    }
}

impl ComputedStyle for MapComputedStyle {
    fn property(&self, section: SectionId, name: &str) -> Option<String> {
        self.properties
            .borrow()
            .get(&(section, name.to_string()))
            .cloned()
    }
}

/// Headless bindings with handles kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct HeadlessServices {
    pub surfaces: Rc<HeadlessSurfaces>,
    pub renderer: Rc<RecordingRenderer>,
    pub media: Rc<HeadlessMedia>,
    pub highlighter: Rc<RecordingHighlighter>,
    pub computed_style: Rc<MapComputedStyle>,
}

impl HeadlessServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn services(&self) -> Services {
        Services {
            surfaces: self.surfaces.clone(),
            renderer: self.renderer.clone(),
            media: self.media.clone(),
            highlighter: self.highlighter.clone(),
            computed_style: self.computed_style.clone(),
        }
    }
}
