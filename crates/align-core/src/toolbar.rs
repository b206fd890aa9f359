use std::rc::{Rc, Weak};

use crate::capability::FormatState;
use crate::config::SectionToolbarConfig;
use crate::format::FormatTable;
use crate::section::Section;
use crate::settings::SectionKind;
use crate::styler::Styler;

pub(crate) const MODIFIER_PREFIX: &str = "is-";
pub(crate) const NORMAL_MODIFIER: &str = "normal";

/// Formatting state of a section as seen by its own toolbar.
pub struct SectionStateView<'a> {
    section: &'a Section,
}

impl<'a> SectionStateView<'a> {
    pub fn new(section: &'a Section) -> Self {
        Self { section }
    }

    fn neighbour_is_text(&self, offset: isize) -> bool {
        let Some(index) = self.section.index() else {
            return false;
        };
        let Some(target) = index.checked_add_signed(offset) else {
            return false;
        };
        self.section
            .neighbour_kind(target)
            .is_some_and(|kind| kind == SectionKind::Text)
    }
}

impl FormatState for SectionStateView<'_> {
    fn query_state(&self, command: &str) -> bool {
        match command {
            "_sectionToggleHTML" => self.section.is_raw_view(),
            _ => false,
        }
    }

    fn query_value(&self, command: &str) -> Option<String> {
        match command {
            "classes" => Some(current_modifier(&self.section.settings().modifiers.get())),
            _ => None,
        }
    }

    fn query_enabled(&self, command: &str) -> bool {
        match command {
            "_sectionUp" => self.neighbour_is_text(-1),
            "_sectionDown" => self.neighbour_is_text(1),
            _ => !self.section.is_removed(),
        }
    }
}

/// Toolbar value for a modifier list: the first `is-*` modifier without its
/// prefix, `normal` when there is none.
pub(crate) fn current_modifier(modifiers: &[String]) -> String {
    modifiers
        .iter()
        .find_map(|m| m.strip_prefix(MODIFIER_PREFIX))
        .unwrap_or(NORMAL_MODIFIER)
        .to_string()
}

/// Per-section toolbar, shared by all sections of a document and retargeted
/// on activation.
#[derive(Debug)]
pub struct SectionToolbar {
    styler: Styler,
    target: Option<Weak<Section>>,
    hide_when_click_out: bool,
    tooltip: bool,
    position: String,
}

impl SectionToolbar {
    pub fn new(config: &SectionToolbarConfig, table: &FormatTable) -> Self {
        Self {
            styler: Styler::new(config.mode, &config.commands, table),
            target: None,
            hide_when_click_out: config.hide_when_click_out,
            tooltip: config.tooltip,
            position: config.position.clone(),
        }
    }

    /// Retargets the toolbar at `section`, resyncs and shows it.
    pub fn update(&mut self, section: &Rc<Section>) {
        self.target = Some(Rc::downgrade(section));
        self.styler.sync(&SectionStateView::new(section));
        self.styler.show();
    }

    pub fn hide(&mut self) {
        self.styler.hide();
    }

    pub fn target(&self) -> Option<Rc<Section>> {
        self.target.as_ref().and_then(Weak::upgrade)
    }

    pub fn styler(&self) -> &Styler {
        &self.styler
    }

    pub fn is_visible(&self) -> bool {
        self.styler.is_visible()
    }

    pub fn hide_when_click_out(&self) -> bool {
        self.hide_when_click_out
    }

    pub fn tooltip(&self) -> bool {
        self.tooltip
    }

    pub fn position(&self) -> &str {
        &self.position
    }
}
