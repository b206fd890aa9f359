use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::capability::Services;
use crate::collection::SectionCollection;
use crate::config::{DocumentConfig, StylerMode};
use crate::error::AlignError;
use crate::event::{DocumentEvent, EventBus};
use crate::format::{Action, DocumentAction, FormatDef, FormatTable};
use crate::markup::{split_sections, text_content};
use crate::section::{Section, SectionId};
use crate::settings::SectionKind;
use crate::styler::{Intent, Styler};
use crate::toolbar::{MODIFIER_PREFIX, NORMAL_MODIFIER, SectionToolbar};
use crate::value::{DocumentValue, SectionValue};

/// Work queued by an operation and run when the host calls
/// [`Document::run_deferred`].
#[derive(Debug)]
pub(crate) enum Deferred {
    /// Activate a freshly inserted section and put the cursor in its first
    /// block.
    Activate(Weak<Section>),
}

/// State shared by a document and its sections.
pub(crate) struct DocumentContext {
    pub sections: RefCell<SectionCollection>,
    pub bus: EventBus,
    pub services: Services,
    active: RefCell<Option<Weak<Section>>>,
    next_id: Cell<u64>,
    config: DocumentConfig,
    formats: RefCell<FormatTable>,
    styler: RefCell<Styler>,
    section_toolbar: RefCell<SectionToolbar>,
    deferred: RefCell<VecDeque<Deferred>>,
}

impl DocumentContext {
    pub fn next_section_id(&self) -> SectionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        SectionId(id)
    }

    pub fn active_section(&self) -> Option<Rc<Section>> {
        self.active.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub fn is_active(&self, section: &Section) -> bool {
        self.active
            .borrow()
            .as_ref()
            .is_some_and(|active| std::ptr::eq(active.as_ptr(), section))
    }

    pub fn set_active(&self, section: Option<&Rc<Section>>) {
        *self.active.borrow_mut() = section.map(Rc::downgrade);
    }

    /// Inserts and announces a new section.
    pub fn attach(&self, section: Rc<Section>, at: Option<usize>) -> usize {
        let id = section.id();
        let index = self.sections.borrow_mut().insert(section, at);
        tracing::debug!(%id, index, "section inserted");
        self.bus.section_changed(None, Some(index));
        if let Some(active) = self.active_section() {
            self.section_toolbar.borrow_mut().update(&active);
        }
        index
    }

    /// Resyncs both toolbars against `section`.
    pub fn resync_for(&self, section: &Rc<Section>) {
        {
            let mut styler = self.styler.borrow_mut();
            section.with_surface(|surface| {
                styler.sync(surface);
                styler.sync_selection(surface.selection());
            });
        }
        self.section_toolbar.borrow_mut().update(section);
    }

    pub fn hide_section_toolbar(&self) {
        self.section_toolbar.borrow_mut().hide();
    }

    pub fn defer(&self, task: Deferred) {
        self.deferred.borrow_mut().push_back(task);
    }

    fn rebuild_toolbars(&self) {
        let formats = self.formats.borrow();
        let toolbar = &self.config.toolbar;
        *self.styler.borrow_mut() = Styler::new(toolbar.mode, &toolbar.commands, &formats);
        *self.section_toolbar.borrow_mut() =
            SectionToolbar::new(&self.config.section_toolbar, &formats);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toolbar {
    Main,
    Section,
}

/// Editor controller: owns the sections, the toolbars and the event bus.
///
/// Cloning yields another handle to the same document.
#[derive(Clone)]
pub struct Document {
    context: Rc<DocumentContext>,
}

impl Document {
    pub fn new(config: DocumentConfig, services: Services) -> Self {
        Self::with_format_table(config, services, FormatTable::with_defaults())
    }

    pub fn with_format_table(
        config: DocumentConfig,
        services: Services,
        formats: FormatTable,
    ) -> Self {
        let toolbar = &config.toolbar;
        let styler = Styler::new(toolbar.mode, &toolbar.commands, &formats);
        let section_toolbar = SectionToolbar::new(&config.section_toolbar, &formats);
        let context = DocumentContext {
            sections: RefCell::new(SectionCollection::new()),
            bus: EventBus::new(),
            services,
            active: RefCell::new(None),
            next_id: Cell::new(0),
            config,
            formats: RefCell::new(formats),
            styler: RefCell::new(styler),
            section_toolbar: RefCell::new(section_toolbar),
            deferred: RefCell::new(VecDeque::new()),
        };
        Self {
            context: Rc::new(context),
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.context.config
    }

    pub fn services(&self) -> &Services {
        &self.context.services
    }

    pub fn bus(&self) -> &EventBus {
        &self.context.bus
    }

    pub fn styler(&self) -> Ref<'_, Styler> {
        self.context.styler.borrow()
    }

    pub fn section_toolbar(&self) -> Ref<'_, SectionToolbar> {
        self.context.section_toolbar.borrow()
    }

    /// Rendered width of the main toolbar, used to centre the bubble.
    pub fn set_toolbar_width(&self, width: f32) {
        self.context.styler.borrow_mut().set_width(width);
    }

    /// Registers or replaces a format and rebuilds both toolbars.
    pub fn extend_format(&self, name: impl Into<String>, def: FormatDef) {
        self.context.formats.borrow_mut().extend(name, def);
        self.context.rebuild_toolbars();
        if let Some(active) = self.active() {
            self.context.resync_for(&active);
        }
    }

    /// Inserts a text section built from persisted markup, appended when
    /// `at` is `None`.
    pub fn insert_text(&self, markup: &str, at: Option<usize>) -> Option<Rc<Section>> {
        let section = Section::build(&self.context, SectionKind::Text, markup)?;
        self.context.attach(Rc::clone(&section), at);
        Some(section)
    }

    /// Inserts the title section at index 0. A document holds one title.
    pub fn insert_title(&self, text: &str) -> Option<Rc<Section>> {
        if self.context.sections.borrow().title_index().is_some() {
            tracing::warn!("document already has a title section");
            return None;
        }
        let section = Section::build(&self.context, SectionKind::Title, text)?;
        self.context.attach(Rc::clone(&section), Some(0));
        Some(section)
    }

    /// Loads exported markup: text ahead of the first section wrapper becomes
    /// the title, each wrapper a text section. Markup without wrappers loads
    /// as a single text section. Returns the number of sections inserted.
    pub fn load_markup(&self, markup: &str) -> usize {
        let (leading, wrappers) = split_sections(markup);
        if wrappers.is_empty() {
            return usize::from(!markup.trim().is_empty() && self.insert_text(markup, None).is_some());
        }

        let mut inserted = 0;
        let title = text_content(leading);
        if !title.trim().is_empty() && self.insert_title(&title).is_some() {
            inserted += 1;
        }
        for wrapper in wrappers {
            if self.insert_text(wrapper, None).is_some() {
                inserted += 1;
            }
        }
        tracing::debug!(inserted, "markup loaded");
        inserted
    }

    pub fn sections(&self) -> Vec<Rc<Section>> {
        self.context.sections.borrow().to_vec()
    }

    pub fn section(&self, id: SectionId) -> Option<Rc<Section>> {
        self.context.sections.borrow().find(id).cloned()
    }

    pub fn section_at(&self, index: usize) -> Option<Rc<Section>> {
        self.context.sections.borrow().get(index).cloned()
    }

    pub fn title(&self) -> Option<Rc<Section>> {
        let sections = self.context.sections.borrow();
        sections.title_index().and_then(|ix| sections.get(ix).cloned())
    }

    pub fn len(&self) -> usize {
        self.context.sections.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.context.sections.borrow().is_empty()
    }

    pub fn active(&self) -> Option<Rc<Section>> {
        self.context.active_section()
    }

    /// Click outside every section: nothing stays active.
    pub fn deactivate_all(&self) {
        for section in self.sections() {
            section.deactivate();
        }
        if self.context.config.section_toolbar.hide_when_click_out {
            self.context.hide_section_toolbar();
        }
        let mut styler = self.context.styler.borrow_mut();
        if styler.mode() == StylerMode::Bubble {
            styler.hide();
        }
    }

    pub fn press(&self, control: &str) -> bool {
        self.trigger(Toolbar::Main, control, Intent::Press)
    }

    pub fn select(&self, control: &str, value: &str) -> bool {
        self.trigger(Toolbar::Main, control, Intent::Select(value.to_string()))
    }

    pub fn input(&self, control: &str, value: &str) -> bool {
        self.trigger(Toolbar::Main, control, Intent::Input(value.to_string()))
    }

    pub fn section_press(&self, control: &str) -> bool {
        self.trigger(Toolbar::Section, control, Intent::Press)
    }

    pub fn section_select(&self, control: &str, value: &str) -> bool {
        self.trigger(Toolbar::Section, control, Intent::Select(value.to_string()))
    }

    fn trigger(&self, toolbar: Toolbar, control: &str, intent: Intent) -> bool {
        let resolved = match toolbar {
            Toolbar::Main => self.context.styler.borrow().resolve(control, intent),
            Toolbar::Section => self
                .context
                .section_toolbar
                .borrow()
                .styler()
                .resolve(control, intent),
        };
        let Some((action, value)) = resolved else {
            return false;
        };
        tracing::debug!(?toolbar, %control, ?action, ?value, "control triggered");
        match action {
            Action::Format { command, .. } => self.format(&command, value.as_deref()),
            Action::Delegate(action) => self.dispatch(action, value.as_deref()),
        }
    }

    fn format(&self, command: &str, value: Option<&str>) -> bool {
        let Some(section) = self.active() else {
            tracing::debug!(%command, "no active section to format");
            return false;
        };
        if section.is_raw_view() {
            tracing::debug!(%command, id = %section.id(), "formatting skipped in raw view");
            self.context.resync_for(&section);
            return false;
        }
        let applied = section
            .with_surface_mut(|surface| {
                let applied = surface.apply_format(command, value);
                surface.focus();
                applied
            })
            .unwrap_or(false);
        self.context.resync_for(&section);
        if applied {
            self.context.bus.emit(DocumentEvent::Changed);
        }
        applied
    }

    /// Runs a delegated toolbar action against the active section.
    pub fn dispatch(&self, action: DocumentAction, value: Option<&str>) -> bool {
        let Some(section) = self.active() else {
            tracing::debug!(?action, "no active section");
            return false;
        };
        match action {
            DocumentAction::AddSection => section.add_section_before().is_some(),
            DocumentAction::MoveUp => section.move_up(),
            DocumentAction::MoveDown => section.move_down(),
            DocumentAction::ToggleRawView => {
                section.toggle_raw_view();
                true
            }
            DocumentAction::Duplicate => section.duplicate().is_some(),
            DocumentAction::Remove => section.remove(),
            DocumentAction::SetModifier => {
                let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
                    tracing::debug!("modifier without a value");
                    return false;
                };
                let modifiers = if value == NORMAL_MODIFIER {
                    Vec::new()
                } else {
                    vec![format!("{MODIFIER_PREFIX}{value}")]
                };
                section.settings().modifiers.set(modifiers);
                self.context.resync_for(&section);
                self.context.bus.emit(DocumentEvent::Changed);
                true
            }
        }
    }

    /// Host notification that the selection moved.
    pub fn selection_changed(&self) {
        match self.active() {
            Some(section) => self.context.resync_for(&section),
            None => {
                let mut styler = self.context.styler.borrow_mut();
                styler.sync_selection(None);
            }
        }
    }

    /// Flushes deferred work. Tasks whose section is gone do nothing.
    /// Returns the number of tasks that ran.
    pub fn run_deferred(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.context.deferred.borrow_mut().pop_front();
            let Some(task) = task else {
                break;
            };
            match task {
                Deferred::Activate(section) => {
                    let Some(section) = section.upgrade().filter(|s| !s.is_removed()) else {
                        tracing::debug!("deferred activation of a removed section");
                        continue;
                    };
                    section.activate();
                    section.with_surface_mut(|surface| surface.select_first_block());
                    ran += 1;
                }
            }
        }
        ran
    }

    pub fn pending_deferred(&self) -> usize {
        self.context.deferred.borrow().len()
    }

    /// Exported document: the title text followed by each section's markup.
    pub fn export(&self) -> String {
        self.sections().iter().map(|s| s.content()).collect()
    }

    pub fn to_value(&self) -> DocumentValue {
        DocumentValue::from_sections(
            self.sections()
                .iter()
                .map(|s| SectionValue {
                    kind: s.kind(),
                    content: s.content(),
                })
                .collect(),
        )
    }

    /// Appends the sections of `value`. Returns the number inserted.
    pub fn load_value(&self, value: &DocumentValue) -> Result<usize, AlignError> {
        value.validate()?;
        let mut inserted = 0;
        for section in &value.sections {
            let built = match section.kind {
                SectionKind::Title => self.insert_title(&section.content),
                SectionKind::Text => self.insert_text(&section.content, None),
            };
            inserted += usize::from(built.is_some());
        }
        Ok(inserted)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("sections", &self.sections())
            .field("active", &self.active().map(|s| s.id()))
            .finish_non_exhaustive()
    }
}
