use std::fmt;
use std::rc::Rc;

use crate::markup::{BG_IMAGE_CLASS, BG_VIDEO_CLASS, escape_text};

/// Opaque file-like handle handed in by the host, e.g. a dropped file.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub mime: String,
    pub bytes: Rc<[u8]>,
}

impl MediaFile {
    pub fn new(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Rc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Url(String),
    File(MediaFile),
}

impl MediaSource {
    /// Empty URLs are treated like an absent source.
    pub(crate) fn non_empty(self) -> Option<Self> {
        match self {
            MediaSource::Url(url) if url.trim().is_empty() => None,
            other => Some(other),
        }
    }
}

impl From<&str> for MediaSource {
    fn from(url: &str) -> Self {
        MediaSource::Url(url.to_string())
    }
}

impl From<String> for MediaSource {
    fn from(url: String) -> Self {
        MediaSource::Url(url)
    }
}

impl From<MediaFile> for MediaSource {
    fn from(file: MediaFile) -> Self {
        MediaSource::File(file)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    Color,
    Image,
    Video,
}

impl DecorationKind {
    pub fn class(self) -> &'static str {
        match self {
            DecorationKind::Color => "has-bgColor",
            DecorationKind::Image => "has-bgImage",
            DecorationKind::Video => "has-bgVideo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl From<MediaKind> for DecorationKind {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => DecorationKind::Image,
            MediaKind::Video => DecorationKind::Video,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MediaDecoration {
    pub url: String,
    /// Whether the URL was resolved from a file by this section, which then
    /// owns it and must release it.
    pub owned: bool,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Background {
    pub color: Option<String>,
    pub image: Option<MediaDecoration>,
    pub video: Option<MediaDecoration>,
    generation: u64,
}

impl Background {
    fn slot(&mut self, kind: MediaKind) -> &mut Option<MediaDecoration> {
        match kind {
            MediaKind::Image => &mut self.image,
            MediaKind::Video => &mut self.video,
        }
    }

    /// Creates the decoration on first use and updates it in place after.
    /// Every call starts a new generation, so updaters issued for an earlier
    /// source stop applying. Returns the generation and a previously owned
    /// URL that the caller must release.
    pub fn set_media(
        &mut self,
        kind: MediaKind,
        url: String,
        owned: bool,
    ) -> (u64, Option<String>) {
        let next = self.generation + 1;
        self.generation = next;
        let slot = self.slot(kind);
        match slot {
            Some(existing) => {
                let stale = std::mem::replace(&mut existing.url, url);
                let released = existing.owned.then_some(stale);
                existing.owned = owned;
                existing.generation = next;
                (next, released)
            }
            None => {
                *slot = Some(MediaDecoration {
                    url,
                    owned,
                    generation: next,
                });
                (next, None)
            }
        }
    }

    pub fn clear_media(&mut self, kind: MediaKind) -> Option<MediaDecoration> {
        self.slot(kind).take()
    }

    pub fn media(&self, kind: MediaKind) -> Option<&MediaDecoration> {
        match kind {
            MediaKind::Image => self.image.as_ref(),
            MediaKind::Video => self.video.as_ref(),
        }
    }

    /// Swaps the URL of the decoration set as `generation`. Returns
    /// `None` when that decoration no longer exists, otherwise the previously
    /// owned URL the caller must release.
    pub fn replace_url(
        &mut self,
        kind: MediaKind,
        generation: u64,
        url: String,
    ) -> Option<Option<String>> {
        let existing = self.slot(kind).as_mut()?;
        if existing.generation != generation {
            return None;
        }
        let stale = std::mem::replace(&mut existing.url, url);
        let released = existing.owned.then_some(stale);
        existing.owned = false;
        Some(released)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(video) = &self.video {
            out.push_str(&format!(
                r#"<div class="{BG_VIDEO_CLASS}"><video autoplay muted loop><source src="{}"></video></div>"#,
                escape_text(&video.url)
            ));
        }
        if let Some(image) = &self.image {
            out.push_str(&format!(
                r#"<div class="{BG_IMAGE_CLASS}" style="background-image: url({})"></div>"#,
                escape_text(&image.url)
            ));
        }
        out
    }
}
