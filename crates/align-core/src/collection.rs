use std::rc::Rc;

use crate::section::{Section, SectionId};
use crate::settings::SectionKind;

/// Ordered sections of one document. Order is render order; a title
/// section, when present, sits at index 0.
#[derive(Default)]
pub struct SectionCollection {
    sections: Vec<Rc<Section>>,
}

impl SectionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends when `at` is `None`, otherwise inserts before the section
    /// currently at `at`. Non-title sections never land above a title and a
    /// title always lands at 0. Returns the index the section ended up at.
    pub fn insert(&mut self, section: Rc<Section>, at: Option<usize>) -> usize {
        let len = self.sections.len();
        let index = if section.kind() == SectionKind::Title {
            0
        } else {
            let floor = usize::from(self.title_index().is_some());
            at.unwrap_or(len).clamp(floor, len)
        };
        self.sections.insert(index, section);
        index
    }

    pub fn index_of(&self, section: &Section) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| std::ptr::eq(Rc::as_ptr(s), section))
    }

    pub fn position(&self, id: SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id() == id)
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.sections.swap(a, b);
    }

    pub fn remove(&mut self, section: &Section) -> Option<(usize, Rc<Section>)> {
        let index = self.index_of(section)?;
        Some((index, self.sections.remove(index)))
    }

    pub fn get(&self, index: usize) -> Option<&Rc<Section>> {
        self.sections.get(index)
    }

    pub fn find(&self, id: SectionId) -> Option<&Rc<Section>> {
        self.sections.iter().find(|s| s.id() == id)
    }

    pub fn title_index(&self) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.kind() == SectionKind::Title)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<Section>> {
        self.sections.iter()
    }

    pub fn to_vec(&self) -> Vec<Rc<Section>> {
        self.sections.clone()
    }
}
