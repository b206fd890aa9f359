use std::path::PathBuf;

use align_core::headless::HeadlessServices;
use align_core::{
    Document, DocumentAction, DocumentConfig, DocumentEvent, MediaFile, Rect, SelectionInfo,
    Spacing,
};
use anyhow::Context as _;

const SAMPLE: &str = r#"Release notes<div class="align-section is-full"><h2>What changed</h2><p>Sections now keep their <b>own</b> toolbar.</p></div><div class="align-section" style="background-color: #f5f5f5"><p>Known issues</p><figure><img src="a.png"></figure></div>"#;

fn load_config(path: Option<PathBuf>) -> anyhow::Result<DocumentConfig> {
    let Some(path) = path else {
        return Ok(DocumentConfig::default());
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    DocumentConfig::from_json_str(&raw).with_context(|| format!("parse config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = load_config(std::env::args_os().nth(1).map(PathBuf::from))?;
    let headless = HeadlessServices::new();
    let document = Document::new(config, headless.services());

    document.bus().subscribe(|event| match event {
        DocumentEvent::SectionChanged { from, to } => {
            tracing::info!(?from, ?to, "sectionChanged");
        }
        DocumentEvent::Changed => tracing::debug!("changed"),
        DocumentEvent::ImageAdded(added) | DocumentEvent::VideoAdded(added) => {
            tracing::info!(topic = event.topic(), section = %added.section, "media added");
            if added.update.apply(format!("https://cdn.example.com/{}.bin", added.section)) {
                tracing::info!(section = %added.section, "media uploaded");
            }
        }
    });

    let loaded = document.load_markup(SAMPLE);
    tracing::info!(loaded, "sample loaded");

    let first = document
        .section_at(1)
        .context("sample has no text section")?;
    first.activate();
    if let Some(surface) = headless.surfaces.created().first() {
        surface.set_selection(Some(SelectionInfo::range(Rect::new(220.0, 140.0, 180.0, 18.0))));
    }
    document.set_toolbar_width(240.0);
    document.selection_changed();
    document.press("bold");
    tracing::info!(
        visible = document.styler().is_visible(),
        position = ?document.styler().position(),
        "toolbar synced"
    );

    first.background_image(Some(
        MediaFile::new("hero.png", "image/png", &b"\x89PNG"[..]).into(),
    ));
    first.set_spacing(Spacing::PaddingTop, Some("24px"));
    document.section_press("_sectionDuplicate");
    document.section_press("_sectionDown");
    document.section_select("classes", "normal");
    document.section_press("_sectionToggleHTML");
    document.section_press("_sectionToggleHTML");
    document.dispatch(DocumentAction::AddSection, None);
    let ran = document.run_deferred();
    tracing::info!(ran, live_media = headless.media.live(), "session done");

    let value = document.to_value();
    println!("{}", document.export());
    println!("{}", value.to_json_pretty().context("serialize document")?);
    Ok(())
}
