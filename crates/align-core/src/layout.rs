use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Spacing {
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
}

impl Spacing {
    pub const ALL: [Spacing; 8] = [
        Spacing::MarginTop,
        Spacing::MarginRight,
        Spacing::MarginBottom,
        Spacing::MarginLeft,
        Spacing::PaddingTop,
        Spacing::PaddingRight,
        Spacing::PaddingBottom,
        Spacing::PaddingLeft,
    ];

    pub fn css_name(self) -> &'static str {
        match self {
            Spacing::MarginTop => "margin-top",
            Spacing::MarginRight => "margin-right",
            Spacing::MarginBottom => "margin-bottom",
            Spacing::MarginLeft => "margin-left",
            Spacing::PaddingTop => "padding-top",
            Spacing::PaddingRight => "padding-right",
            Spacing::PaddingBottom => "padding-bottom",
            Spacing::PaddingLeft => "padding-left",
        }
    }

    pub fn from_css_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.css_name() == name)
    }
}

/// Margin and padding of a section wrapper. Explicit values win over the
/// host's computed style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionLayout {
    explicit: BTreeMap<Spacing, String>,
}

impl SectionLayout {
    pub fn get(&self, spacing: Spacing, computed: impl FnOnce() -> Option<String>) -> String {
        self.explicit
            .get(&spacing)
            .cloned()
            .or_else(computed)
            .unwrap_or_default()
    }

    /// An absent or empty value clears the explicit entry.
    pub fn set(&mut self, spacing: Spacing, value: Option<&str>) {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => {
                self.explicit.insert(spacing, value.to_string());
            }
            None => {
                self.explicit.remove(&spacing);
            }
        }
    }

    pub fn explicit(&self) -> impl Iterator<Item = (Spacing, &str)> {
        self.explicit.iter().map(|(k, v)| (*k, v.as_str()))
    }
}
