use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::observe::{Dep, Observable, SubscriptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    #[default]
    Text,
    Title,
}

/// One write to a [`SectionSettings`] field, carrying the previous value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingChange {
    CustomClass(Vec<String>),
    Modifiers(Vec<String>),
    BackgroundColor(Option<String>),
    BackgroundVideoUrl(Option<String>),
    BackgroundImageUrl(Option<String>),
    IsRawView(bool),
    Kind(SectionKind),
}

impl SettingChange {
    pub fn key(&self) -> &'static str {
        match self {
            SettingChange::CustomClass(_) => "customClass",
            SettingChange::Modifiers(_) => "modifiers",
            SettingChange::BackgroundColor(_) => "backgroundColor",
            SettingChange::BackgroundVideoUrl(_) => "backgroundVideoUrl",
            SettingChange::BackgroundImageUrl(_) => "backgroundImageUrl",
            SettingChange::IsRawView(_) => "isRawView",
            SettingChange::Kind(_) => "kind",
        }
    }
}

/// Reactive settings of one section.
///
/// Every field forwards its writes to a record-level [`Dep`], so a reaction
/// registered with [`SectionSettings::watch`] sees every write to any field.
#[derive(Debug)]
pub struct SectionSettings {
    pub custom_class: Observable<Vec<String>>,
    pub modifiers: Observable<Vec<String>>,
    pub background_color: Observable<Option<String>>,
    pub background_video_url: Observable<Option<String>>,
    pub background_image_url: Observable<Option<String>>,
    pub is_raw_view: Observable<bool>,
    pub kind: Observable<SectionKind>,
    record: Rc<Dep<SettingChange>>,
}

fn forward<T: Clone + 'static>(
    field: &Observable<T>,
    record: &Rc<Dep<SettingChange>>,
    wrap: fn(T) -> SettingChange,
) {
    let record = Rc::clone(record);
    field.watch(move |previous: &T| record.notify(&wrap(previous.clone())));
}

impl SectionSettings {
    pub fn new(kind: SectionKind) -> Self {
        let settings = Self {
            custom_class: Observable::default(),
            modifiers: Observable::default(),
            background_color: Observable::default(),
            background_video_url: Observable::default(),
            background_image_url: Observable::default(),
            is_raw_view: Observable::new(false),
            kind: Observable::new(kind),
            record: Rc::new(Dep::new()),
        };

        forward(&settings.custom_class, &settings.record, SettingChange::CustomClass);
        forward(&settings.modifiers, &settings.record, SettingChange::Modifiers);
        forward(
            &settings.background_color,
            &settings.record,
            SettingChange::BackgroundColor,
        );
        forward(
            &settings.background_video_url,
            &settings.record,
            SettingChange::BackgroundVideoUrl,
        );
        forward(
            &settings.background_image_url,
            &settings.record,
            SettingChange::BackgroundImageUrl,
        );
        forward(&settings.is_raw_view, &settings.record, SettingChange::IsRawView);
        forward(&settings.kind, &settings.record, SettingChange::Kind);
        settings
    }

    pub fn watch(&self, reaction: impl Fn(&SettingChange) + 'static) -> SubscriptionId {
        self.record.watch(reaction)
    }

    pub fn unwatch(&self, id: SubscriptionId) -> bool {
        self.record.unwatch(id)
    }

    /// Sets the custom classes, dropping duplicates while keeping first
    /// occurrence order.
    pub fn set_custom_class<I, S>(&self, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for class in classes.into_iter().map(Into::into) {
            if !class.is_empty() && !unique.contains(&class) {
                unique.push(class);
            }
        }
        self.custom_class.set(unique);
    }

    pub(crate) fn clear_reactions(&self) {
        self.record.clear();
        for field in [&self.custom_class, &self.modifiers] {
            field.clear_reactions();
        }
        self.background_color.clear_reactions();
        self.background_video_url.clear_reactions();
        self.background_image_url.clear_reactions();
        self.is_raw_view.clear_reactions();
        self.kind.clear_reactions();
    }
}
