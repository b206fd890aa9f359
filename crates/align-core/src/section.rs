use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::background::{Background, DecorationKind, MediaKind, MediaSource};
use crate::capability::{EditableSurface, SubBlockKind};
use crate::document::{Deferred, DocumentContext};
use crate::event::{DocumentEvent, MediaAdded, MediaUpdater};
use crate::layout::{SectionLayout, Spacing};
use crate::markup::{
    SECTION_CLASS, SectionMarkup, elements_named, escape_text, is_line_break, replace_elements,
    text_content,
};
use crate::observe::Observable;
use crate::settings::{SectionKind, SectionSettings, SettingChange};

pub(crate) const ACTIVE_CLASS: &str = "is-active";
const EMPTY_BODY: &str = "<p></p>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(pub u64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Idle,
    Active,
    RawView,
    Removed,
}

/// An embedded element handed to the sub-block renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubBlock {
    pub kind: SubBlockKind,
    pub markup: String,
}

enum Payload {
    Text {
        surface: RefCell<Box<dyn EditableSurface>>,
        sub_blocks: RefCell<Vec<SubBlock>>,
    },
    Title(RefCell<String>),
}

/// One content block of a document.
///
/// Sections are created through [`crate::Document`] and live in its
/// collection. Every operation degrades to a logged no-op when its guard
/// fails: removed sections, titles that cannot be decorated or moved, moves
/// against a missing neighbour.
pub struct Section {
    id: SectionId,
    kind: SectionKind,
    settings: SectionSettings,
    payload: Payload,
    classes: RefCell<Vec<String>>,
    background: RefCell<Background>,
    layout: RefCell<SectionLayout>,
    active: Cell<bool>,
    raw_view: Cell<bool>,
    removed: Cell<bool>,
    self_writes: Cell<u32>,
    context: Weak<DocumentContext>,
    this: Weak<Section>,
}

fn media_field(settings: &SectionSettings, kind: MediaKind) -> &Observable<Option<String>> {
    match kind {
        MediaKind::Image => &settings.background_image_url,
        MediaKind::Video => &settings.background_video_url,
    }
}

impl Section {
    /// Builds a section from persisted markup (text) or plain text (title).
    /// A line-break-only payload builds nothing.
    pub(crate) fn build(
        context: &Rc<DocumentContext>,
        kind: SectionKind,
        content: &str,
    ) -> Option<Rc<Section>> {
        if is_line_break(content) {
            tracing::debug!(?kind, "line-break payload, no section built");
            return None;
        }

        let id = context.next_section_id();
        let weak_context = Rc::downgrade(context);
        let blank = |payload: Payload, this: &Weak<Section>| Section {
            id,
            kind,
            settings: SectionSettings::new(kind),
            payload,
            classes: RefCell::new(Vec::new()),
            background: RefCell::new(Background::default()),
            layout: RefCell::new(SectionLayout::default()),
            active: Cell::new(false),
            raw_view: Cell::new(false),
            removed: Cell::new(false),
            self_writes: Cell::new(0),
            context: weak_context.clone(),
            this: this.clone(),
        };

        let section = match kind {
            SectionKind::Title => {
                let title = text_content(content).trim().to_string();
                Rc::new_cyclic(|this| blank(Payload::Title(RefCell::new(title)), this))
            }
            SectionKind::Text => {
                let parsed = SectionMarkup::parse(content);
                let body = if parsed.body.is_empty() {
                    EMPTY_BODY
                } else {
                    parsed.body.as_str()
                };
                let surface = context.services.surfaces.create(body);
                let section = Rc::new_cyclic(|this| {
                    blank(
                        Payload::Text {
                            surface: RefCell::new(surface),
                            sub_blocks: RefCell::new(Vec::new()),
                        },
                        this,
                    )
                });
                section.restore(parsed);
                section.attach_sub_blocks();
                section.watch_settings();
                section
            }
        };

        tracing::debug!(id = %section.id, ?kind, "section built");
        Some(section)
    }

    fn restore(&self, parsed: SectionMarkup) {
        let mut modifiers = Vec::new();
        let mut custom = Vec::new();
        for class in parsed.classes {
            if class == ACTIVE_CLASS || class.starts_with("has-") {
                continue;
            }
            if class.starts_with("is-") {
                modifiers.push(class);
            } else {
                custom.push(class);
            }
        }
        self.classes
            .borrow_mut()
            .extend(modifiers.iter().chain(custom.iter()).cloned());
        self.settings.modifiers.set(modifiers);
        self.settings.set_custom_class(custom);

        let mut color = None;
        {
            let mut layout = self.layout.borrow_mut();
            for (key, value) in parsed.style {
                if key == "background-color" {
                    color = Some(value);
                } else if let Some(spacing) = Spacing::from_css_name(&key) {
                    layout.set(spacing, Some(&value));
                }
            }
        }

        let mut background = self.background.borrow_mut();
        if let Some(url) = parsed.background_image {
            background.set_media(MediaKind::Image, url.clone(), false);
            self.settings.background_image_url.set(Some(url));
            self.add_class(DecorationKind::Image.class());
        }
        if let Some(url) = parsed.background_video {
            background.set_media(MediaKind::Video, url.clone(), false);
            self.settings.background_video_url.set(Some(url));
            self.add_class(DecorationKind::Video.class());
        }
        if let Some(color) = color {
            background.color = Some(color.clone());
            self.settings.background_color.set(Some(color));
            self.add_class(DecorationKind::Color.class());
        }
    }

    fn watch_settings(&self) {
        let this = self.this.clone();
        self.settings.watch(move |change| {
            if let Some(section) = this.upgrade() {
                section.react(change);
            }
        });
    }

    /// Re-derives the part of the section named by a settings write.
    fn react(&self, change: &SettingChange) {
        if self.removed.get() || self.self_writes.get() > 0 {
            return;
        }
        match change {
            SettingChange::CustomClass(previous) => {
                let current = self.settings.custom_class.get();
                self.restyle(previous, &current);
            }
            SettingChange::Modifiers(previous) => {
                let current = self.settings.modifiers.get();
                self.restyle(previous, &current);
            }
            SettingChange::BackgroundColor(_) => {
                let color = self.settings.background_color.get();
                self.apply_color(color.as_deref().map(str::trim).filter(|c| !c.is_empty()));
            }
            SettingChange::BackgroundImageUrl(_) => {
                let url = self.settings.background_image_url.get();
                self.apply_media(MediaKind::Image, url.map(MediaSource::Url), false);
            }
            SettingChange::BackgroundVideoUrl(_) => {
                let url = self.settings.background_video_url.get();
                self.apply_media(MediaKind::Video, url.map(MediaSource::Url), false);
            }
            SettingChange::IsRawView(_) => {
                if self.settings.is_raw_view.get() != self.raw_view.get() {
                    self.toggle_raw_view();
                }
            }
            SettingChange::Kind(_) => {
                tracing::warn!(id = %self.id, kind = ?self.kind, "section kind is fixed at creation");
            }
        }
    }

    fn write_setting(&self, write: impl FnOnce(&SectionSettings)) {
        self.self_writes.set(self.self_writes.get() + 1);
        write(&self.settings);
        self.self_writes.set(self.self_writes.get() - 1);
    }

    fn restyle(&self, previous: &[String], current: &[String]) {
        let mut classes = self.classes.borrow_mut();
        classes.retain(|class| !previous.contains(class));
        for class in current {
            if !classes.contains(class) {
                classes.push(class.clone());
            }
        }
    }

    fn add_class(&self, class: &str) {
        let mut classes = self.classes.borrow_mut();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().retain(|c| c != class);
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn settings(&self) -> &SectionSettings {
        &self.settings
    }

    pub fn state(&self) -> SectionState {
        if self.removed.get() {
            SectionState::Removed
        } else if self.active.get() {
            SectionState::Active
        } else if self.raw_view.get() {
            SectionState::RawView
        } else {
            SectionState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn is_raw_view(&self) -> bool {
        self.raw_view.get()
    }

    pub fn is_removed(&self) -> bool {
        self.removed.get()
    }

    /// Wrapper classes as currently rendered, including editing-only ones.
    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().clone()
    }

    pub fn index(&self) -> Option<usize> {
        let context = self.context.upgrade()?;
        let index = context.sections.borrow().index_of(self);
        index
    }

    pub(crate) fn neighbour_kind(&self, index: usize) -> Option<SectionKind> {
        let context = self.context.upgrade()?;
        let kind = context.sections.borrow().get(index).map(|s| s.kind());
        kind
    }

    pub fn background_color_value(&self) -> Option<String> {
        self.background.borrow().color.clone()
    }

    pub fn background_url(&self, kind: MediaKind) -> Option<String> {
        self.background.borrow().media(kind).map(|m| m.url.clone())
    }

    pub fn sub_blocks(&self) -> Vec<SubBlock> {
        match &self.payload {
            Payload::Text { sub_blocks, .. } => sub_blocks.borrow().clone(),
            Payload::Title(_) => Vec::new(),
        }
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&dyn EditableSurface) -> R) -> Option<R> {
        match &self.payload {
            Payload::Text { surface, .. } => Some(f(&**surface.borrow())),
            Payload::Title(_) => None,
        }
    }

    pub fn with_surface_mut<R>(
        &self,
        f: impl FnOnce(&mut dyn EditableSurface) -> R,
    ) -> Option<R> {
        match &self.payload {
            Payload::Text { surface, .. } => Some(f(&mut **surface.borrow_mut())),
            Payload::Title(_) => None,
        }
    }

    pub fn title(&self) -> Option<String> {
        match &self.payload {
            Payload::Title(title) => Some(title.borrow().clone()),
            Payload::Text { .. } => None,
        }
    }

    /// Sets the title text. Markup collapses to its literal text.
    pub fn set_title(&self, text: &str) -> bool {
        let Payload::Title(title) = &self.payload else {
            tracing::debug!(id = %self.id, "set_title on a text section");
            return false;
        };
        *title.borrow_mut() = text_content(text).trim().to_string();
        self.notify_changed();
        true
    }

    /// Replaces the editable content, leaving raw view if engaged.
    pub fn set_markup(&self, markup: &str) -> bool {
        if self.removed.get() {
            return false;
        }
        let Payload::Text { surface, .. } = &self.payload else {
            tracing::debug!(id = %self.id, "set_markup on a title section");
            return false;
        };
        let body = if markup.trim().is_empty() {
            EMPTY_BODY
        } else {
            markup.trim()
        };
        surface.borrow_mut().set_markup(body);
        if self.raw_view.replace(false) {
            self.write_setting(|s| s.is_raw_view.set(false));
        }
        self.attach_sub_blocks();
        self.notify_changed();
        true
    }

    pub fn spacing(&self, spacing: Spacing) -> String {
        self.layout.borrow().get(spacing, || {
            self.context.upgrade().and_then(|context| {
                context
                    .services
                    .computed_style
                    .property(self.id, spacing.css_name())
            })
        })
    }

    /// An absent or empty value clears the explicit spacing.
    pub fn set_spacing(&self, spacing: Spacing, value: Option<&str>) {
        self.layout.borrow_mut().set(spacing, value);
    }

    fn attach_sub_blocks(&self) {
        let Payload::Text { surface, sub_blocks } = &self.payload else {
            return;
        };
        let Some(context) = self.context.upgrade() else {
            return;
        };
        let markup = surface.borrow().markup();
        let mut attached = Vec::new();
        for kind in SubBlockKind::ALL {
            for element in elements_named(&markup, kind.tag()) {
                let element = &markup[element.range];
                context.services.renderer.attach(kind, element);
                attached.push(SubBlock {
                    kind,
                    markup: element.to_string(),
                });
            }
        }
        *sub_blocks.borrow_mut() = attached;
    }

    /// Exported form of the section: literal text for titles, sanitized
    /// wrapper markup for text sections. Leaves the live section untouched.
    pub fn content(&self) -> String {
        match &self.payload {
            Payload::Title(title) => title.borrow().clone(),
            Payload::Text { surface, .. } => {
                let body = {
                    let surface = surface.borrow();
                    if self.raw_view.get() {
                        surface.text()
                    } else {
                        surface.markup()
                    }
                };
                let body = self.flatten(&body);
                self.wrapper_markup(body.trim())
            }
        }
    }

    fn flatten(&self, body: &str) -> String {
        let Some(context) = self.context.upgrade() else {
            return body.to_string();
        };
        let renderer = &context.services.renderer;
        let mut out = body.to_string();
        for kind in SubBlockKind::ALL {
            let found = elements_named(&out, kind.tag());
            if found.is_empty() {
                continue;
            }
            out = replace_elements(&out, &found, |_, element| renderer.flatten(kind, element));
        }
        out
    }

    fn wrapper_markup(&self, body: &str) -> String {
        let mut class_attr = String::from(SECTION_CLASS);
        for class in self.classes.borrow().iter() {
            if class != ACTIVE_CLASS {
                class_attr.push(' ');
                class_attr.push_str(class);
            }
        }

        let background = self.background.borrow();
        let mut style: Vec<String> = Vec::new();
        if let Some(color) = &background.color {
            style.push(format!("background-color: {color}"));
        }
        for (spacing, value) in self.layout.borrow().explicit() {
            style.push(format!("{}: {value}", spacing.css_name()));
        }

        let mut out = format!(r#"<div class="{}""#, escape_text(&class_attr));
        if !style.is_empty() {
            out.push_str(&format!(r#" style="{}""#, escape_text(&style.join("; "))));
        }
        out.push('>');
        out.push_str(&background.render());
        out.push_str(body);
        out.push_str("</div>");
        out
    }

    pub fn toggle_raw_view(&self) {
        if self.removed.get() {
            return;
        }
        let Payload::Text { surface, sub_blocks } = &self.payload else {
            tracing::debug!(id = %self.id, "title sections have no raw view");
            return;
        };
        let context = self.context.upgrade();

        if !self.raw_view.get() {
            let source = surface.borrow().markup();
            surface.borrow_mut().set_markup(&format!(
                r#"<pre data-align-html="true">{}</pre>"#,
                escape_text(&source)
            ));
            sub_blocks.borrow_mut().clear();
            self.raw_view.set(true);
            self.write_setting(|s| s.is_raw_view.set(true));
            if let Some(context) = &context {
                context.services.highlighter.highlight(self.id, &source);
            }
        } else {
            let source = surface.borrow().text();
            let body = if source.trim().is_empty() {
                EMPTY_BODY
            } else {
                source.trim()
            };
            surface.borrow_mut().set_markup(body);
            self.raw_view.set(false);
            self.write_setting(|s| s.is_raw_view.set(false));
            self.attach_sub_blocks();
        }

        if let (Some(context), Some(this)) = (context, self.this.upgrade()) {
            if self.active.get() {
                context.resync_for(&this);
            }
        }
    }

    fn decoratable(&self) -> bool {
        if self.removed.get() {
            tracing::debug!(id = %self.id, "decoration on a removed section");
            return false;
        }
        if self.kind == SectionKind::Title {
            tracing::debug!(id = %self.id, "title sections carry no background");
            return false;
        }
        true
    }

    /// Sets the background color; `None` or an empty string clears it.
    pub fn background_color(&self, color: Option<&str>) {
        if !self.decoratable() {
            return;
        }
        let color = color.map(str::trim).filter(|c| !c.is_empty());
        self.write_setting(|s| s.background_color.set(color.map(str::to_string)));
        self.apply_color(color);
    }

    /// Sets the background image from a URL or a file handle; `None` or an
    /// empty URL clears it.
    pub fn background_image(&self, source: Option<MediaSource>) {
        if self.decoratable() {
            self.apply_media(MediaKind::Image, source.and_then(MediaSource::non_empty), true);
        }
    }

    /// Sets the background video from a URL or a file handle; `None` or an
    /// empty URL clears it.
    pub fn background_video(&self, source: Option<MediaSource>) {
        if self.decoratable() {
            self.apply_media(MediaKind::Video, source.and_then(MediaSource::non_empty), true);
        }
    }

    fn apply_color(&self, color: Option<&str>) {
        let Some(color) = color else {
            if self.background.borrow_mut().color.take().is_none() {
                tracing::debug!(id = %self.id, "no background color to clear");
                return;
            }
            self.remove_class(DecorationKind::Color.class());
            self.announce_in_place();
            return;
        };
        self.background.borrow_mut().color = Some(color.to_string());
        self.add_class(DecorationKind::Color.class());
        self.announce_in_place();
    }

    fn apply_media(&self, kind: MediaKind, source: Option<MediaSource>, sync_setting: bool) {
        let Some(context) = self.context.upgrade() else {
            return;
        };

        let Some(source) = source.and_then(MediaSource::non_empty) else {
            let cleared = self.background.borrow_mut().clear_media(kind);
            let Some(cleared) = cleared else {
                tracing::debug!(id = %self.id, ?kind, "no background media to clear");
                return;
            };
            if cleared.owned {
                context.services.media.release(&cleared.url);
            }
            self.remove_class(DecorationKind::from(kind).class());
            if sync_setting {
                self.write_setting(|s| media_field(s, kind).set(None));
            }
            self.announce_in_place();
            return;
        };

        let (url, owned) = match &source {
            MediaSource::Url(url) => (url.trim().to_string(), false),
            MediaSource::File(file) => (context.services.media.resolve(file), true),
        };
        let (generation, released) = self
            .background
            .borrow_mut()
            .set_media(kind, url.clone(), owned);
        if let Some(stale) = released {
            context.services.media.release(&stale);
        }
        self.add_class(DecorationKind::from(kind).class());
        if sync_setting {
            self.write_setting(|s| media_field(s, kind).set(Some(url)));
        }

        let added = MediaAdded {
            section: self.id,
            file: source,
            update: MediaUpdater::new(self.this.clone(), kind, generation),
        };
        context.bus.emit(match kind {
            MediaKind::Image => DocumentEvent::ImageAdded(added),
            MediaKind::Video => DocumentEvent::VideoAdded(added),
        });
        self.announce_in_place();
    }

    pub(crate) fn replace_media_url(&self, kind: MediaKind, generation: u64, url: String) -> bool {
        if self.removed.get() {
            return false;
        }
        let Some(context) = self.context.upgrade() else {
            return false;
        };
        let replaced = self
            .background
            .borrow_mut()
            .replace_url(kind, generation, url.clone());
        let Some(released) = replaced else {
            tracing::debug!(id = %self.id, ?kind, "media decoration no longer exists");
            return false;
        };
        if let Some(stale) = released {
            context.services.media.release(&stale);
        }
        self.write_setting(|s| media_field(s, kind).set(Some(url)));
        self.announce_in_place();
        true
    }

    fn release_media(&self, context: &DocumentContext) {
        for kind in [MediaKind::Image, MediaKind::Video] {
            let cleared = self.background.borrow_mut().clear_media(kind);
            if let Some(cleared) = cleared.filter(|m| m.owned) {
                context.services.media.release(&cleared.url);
            }
        }
    }

    fn announce_in_place(&self) {
        let Some(context) = self.context.upgrade() else {
            return;
        };
        let index = context.sections.borrow().index_of(self);
        if let Some(index) = index {
            context.bus.section_changed(Some(index), Some(index));
        }
    }

    fn notify_changed(&self) {
        if let Some(context) = self.context.upgrade() {
            context.bus.emit(DocumentEvent::Changed);
        }
    }

    /// Makes this the single active section of its document and resyncs the
    /// toolbars. Activating the active section only resyncs.
    pub fn activate(&self) {
        if self.removed.get() {
            tracing::debug!(id = %self.id, "activate on a removed section");
            return;
        }
        if self.kind == SectionKind::Title {
            tracing::debug!(id = %self.id, "title sections are not activatable");
            return;
        }
        let (Some(context), Some(this)) = (self.context.upgrade(), self.this.upgrade()) else {
            return;
        };
        if context.is_active(self) {
            context.resync_for(&this);
            return;
        }
        if let Some(previous) = context.active_section() {
            previous.deactivate();
        }
        context.set_active(Some(&this));
        self.active.set(true);
        self.add_class(ACTIVE_CLASS);
        context.resync_for(&this);
        self.with_surface_mut(|surface| surface.focus());
    }

    pub fn deactivate(&self) {
        if !self.active.replace(false) {
            return;
        }
        self.remove_class(ACTIVE_CLASS);
        if let Some(context) = self.context.upgrade() {
            if context.is_active(self) {
                context.set_active(None);
            }
        }
    }

    /// Detaches the section from its document. The section stays readable
    /// but every further operation is a no-op.
    pub fn remove(&self) -> bool {
        if self.removed.get() {
            tracing::debug!(id = %self.id, "section already removed");
            return false;
        }
        let Some(context) = self.context.upgrade() else {
            return false;
        };
        self.deactivate();
        let detached = context.sections.borrow_mut().remove(self);
        let Some((index, _entry)) = detached else {
            tracing::debug!(id = %self.id, "section is not in its collection");
            return false;
        };
        self.removed.set(true);
        self.release_media(&context);
        self.settings.clear_reactions();
        context.hide_section_toolbar();
        context.bus.section_changed(Some(index), None);
        true
    }

    /// Inserts a copy built from this section's exported content right after
    /// it. The copy is not activated.
    pub fn duplicate(&self) -> Option<Rc<Section>> {
        if self.removed.get() {
            tracing::debug!(id = %self.id, "duplicate of a removed section");
            return None;
        }
        if self.kind == SectionKind::Title {
            tracing::warn!(id = %self.id, "a document holds a single title, not duplicating");
            return None;
        }
        let context = self.context.upgrade()?;
        let content = self.content();
        let index = self.index()?;
        let copy = Section::build(&context, SectionKind::Text, &content)?;
        context.attach(Rc::clone(&copy), Some(index + 1));
        Some(copy)
    }

    /// Inserts an empty text section before this one and schedules its
    /// activation once the host flushes deferred work.
    pub fn add_section_before(&self) -> Option<Rc<Section>> {
        if self.removed.get() || self.kind == SectionKind::Title {
            tracing::debug!(id = %self.id, "cannot add a section here");
            return None;
        }
        let context = self.context.upgrade()?;
        let index = self.index()?;
        let section = Section::build(&context, SectionKind::Text, "")?;
        context.attach(Rc::clone(&section), Some(index));
        context.defer(Deferred::Activate(Rc::downgrade(&section)));
        Some(section)
    }

    pub fn move_up(&self) -> bool {
        self.shift(Direction::Up)
    }

    pub fn move_down(&self) -> bool {
        self.shift(Direction::Down)
    }

    fn shift(&self, direction: Direction) -> bool {
        if self.removed.get() || self.kind == SectionKind::Title {
            tracing::debug!(id = %self.id, ?direction, "section cannot move");
            return false;
        }
        let Some(context) = self.context.upgrade() else {
            return false;
        };

        let moved = {
            let mut sections = context.sections.borrow_mut();
            let Some(index) = sections.index_of(self) else {
                return false;
            };
            let target = match direction {
                Direction::Up => index.checked_sub(1),
                Direction::Down => Some(index + 1),
            };
            match target.and_then(|t| sections.get(t).map(|s| (t, s.kind()))) {
                Some((target, SectionKind::Text)) => {
                    sections.swap(index, target);
                    Some((index, target))
                }
                Some((_, SectionKind::Title)) | None => None,
            }
        };

        let Some((from, to)) = moved else {
            tracing::debug!(id = %self.id, ?direction, "no neighbour to swap with");
            return false;
        };
        context.bus.section_changed(Some(from), Some(to));
        if self.active.get() {
            if let Some(this) = self.this.upgrade() {
                context.resync_for(&this);
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &self.state())
            .field("classes", &self.classes.borrow())
            .finish_non_exhaustive()
    }
}
