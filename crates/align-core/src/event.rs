use std::fmt;
use std::rc::Weak;

use crate::background::{MediaKind, MediaSource};
use crate::observe::{Dep, SubscriptionId};
use crate::section::{Section, SectionId};

#[derive(Debug)]
pub enum DocumentEvent {
    /// A section moved between positions. `from: None` is a creation,
    /// `to: None` a removal, equal indices an in-place change.
    SectionChanged {
        from: Option<usize>,
        to: Option<usize>,
    },
    Changed,
    ImageAdded(MediaAdded),
    VideoAdded(MediaAdded),
}

impl DocumentEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            DocumentEvent::SectionChanged { .. } => "sectionChanged",
            DocumentEvent::Changed => "changed",
            DocumentEvent::ImageAdded(_) => "imageAdded",
            DocumentEvent::VideoAdded(_) => "videoAdded",
        }
    }
}

/// Announced when a background image or video was set.
///
/// When `file` is a file handle the host may upload it and later call
/// `update.apply(url)` to swap the locally resolved URL for the permanent one.
#[derive(Debug)]
pub struct MediaAdded {
    pub section: SectionId,
    pub file: MediaSource,
    pub update: MediaUpdater,
}

#[derive(Clone)]
pub struct MediaUpdater {
    section: Weak<Section>,
    kind: MediaKind,
    generation: u64,
}

impl MediaUpdater {
    pub(crate) fn new(section: Weak<Section>, kind: MediaKind, generation: u64) -> Self {
        Self {
            section,
            kind,
            generation,
        }
    }

    /// Replaces the displayed URL. Returns false when the section is gone or
    /// the decoration was cleared or replaced since the announcement.
    pub fn apply(&self, url: impl Into<String>) -> bool {
        let Some(section) = self.section.upgrade() else {
            tracing::debug!(kind = ?self.kind, "media update for a dropped section");
            return false;
        };
        section.replace_media_url(self.kind, self.generation, url.into())
    }
}

impl fmt::Debug for MediaUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaUpdater")
            .field("kind", &self.kind)
            .field("generation", &self.generation)
            .field("live", &(self.section.strong_count() > 0))
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Dep<DocumentEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: impl Fn(&DocumentEvent) + 'static) -> SubscriptionId {
        self.subscribers.watch(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unwatch(id)
    }

    pub fn emit(&self, event: DocumentEvent) {
        tracing::trace!(topic = event.topic(), ?event, "emit");
        self.subscribers.notify(&event);
    }

    /// Announces a structural change followed by the generic change event.
    pub fn section_changed(&self, from: Option<usize>, to: Option<usize>) {
        self.emit(DocumentEvent::SectionChanged { from, to });
        self.emit(DocumentEvent::Changed);
    }
}
