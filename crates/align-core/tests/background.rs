use std::cell::RefCell;
use std::rc::Rc;

use align_core::headless::HeadlessServices;
use align_core::{
    Document, DocumentConfig, DocumentEvent, MediaFile, MediaKind, MediaUpdater, Spacing,
};

fn document() -> (Document, HeadlessServices) {
    let headless = HeadlessServices::new();
    let document = Document::new(DocumentConfig::default(), headless.services());
    (document, headless)
}

fn record(document: &Document) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    document.bus().subscribe(move |event| {
        let line = match event {
            DocumentEvent::SectionChanged { from, to } => format!("sectionChanged {from:?} {to:?}"),
            other => other.topic().to_string(),
        };
        sink.borrow_mut().push(line);
    });
    log
}

fn capture_updates(document: &Document) -> Rc<RefCell<Vec<MediaUpdater>>> {
    let updates = Rc::new(RefCell::new(Vec::new()));
    let sink = updates.clone();
    document.bus().subscribe(move |event| {
        if let DocumentEvent::ImageAdded(added) | DocumentEvent::VideoAdded(added) = event {
            sink.borrow_mut().push(added.update.clone());
        }
    });
    updates
}

fn png(name: &str) -> MediaFile {
    MediaFile::new(name, "image/png", &b"\x89PNG"[..])
}

#[test]
fn color_decoration_sets_and_clears() {
    let (document, _) = document();
    let section = document.insert_text("<p>A</p>", None).unwrap();
    let events = record(&document);

    section.background_color(Some("#fff"));
    assert_eq!(section.background_color_value().as_deref(), Some("#fff"));
    assert!(section.classes().iter().any(|c| c == "has-bgColor"));
    assert_eq!(section.settings().background_color.get().as_deref(), Some("#fff"));
    assert_eq!(
        section.content(),
        r##"<div class="align-section has-bgColor" style="background-color: #fff"><p>A</p></div>"##
    );
    assert_eq!(*events.borrow(), vec!["sectionChanged Some(0) Some(0)", "changed"]);

    events.borrow_mut().clear();
    section.background_color(None);
    assert!(section.background_color_value().is_none());
    assert!(!section.classes().iter().any(|c| c == "has-bgColor"));
    assert_eq!(*events.borrow(), vec!["sectionChanged Some(0) Some(0)", "changed"]);

    events.borrow_mut().clear();
    section.background_color(Some(""));
    assert!(events.borrow().is_empty());
}

#[test]
fn file_backed_image_is_released_once() {
    let (document, headless) = document();
    let section = document.insert_text("<p>A</p>", None).unwrap();
    let events = record(&document);

    section.background_image(Some(png("one.png").into()));
    assert_eq!(
        *events.borrow(),
        vec!["imageAdded", "sectionChanged Some(0) Some(0)", "changed"]
    );
    assert_eq!(headless.media.live(), 1);
    assert_eq!(
        section.background_url(MediaKind::Image).as_deref(),
        Some("blob:align/1")
    );

    section.background_image(Some(png("two.png").into()));
    assert_eq!(headless.media.live(), 1);
    assert!(headless.media.is_live("blob:align/2"));
    assert!(!headless.media.is_live("blob:align/1"));

    assert!(section.remove());
    assert_eq!(headless.media.live(), 0);
}

#[test]
fn url_image_is_not_released() {
    let (document, headless) = document();
    let section = document.insert_text("<p>A</p>", None).unwrap();

    section.background_image(Some("https://cdn.example.com/a.png".into()));
    assert_eq!(headless.media.live(), 0);
    assert!(section.classes().iter().any(|c| c == "has-bgImage"));
    assert_eq!(
        section.content(),
        r#"<div class="align-section has-bgImage"><div class="align-bgImage" style="background-image: url(https://cdn.example.com/a.png)"></div><p>A</p></div>"#
    );

    section.background_image(Some("".into()));
    assert!(section.background_url(MediaKind::Image).is_none());
    assert!(!section.classes().iter().any(|c| c == "has-bgImage"));
}

#[test]
fn updater_swaps_in_the_uploaded_url() {
    let (document, headless) = document();
    let section = document.insert_text("<p>A</p>", None).unwrap();
    let updates = capture_updates(&document);

    section.background_image(Some(png("one.png").into()));
    let update = updates.borrow()[0].clone();
    let events = record(&document);

    assert!(update.apply("https://cdn.example.com/one.png"));
    assert_eq!(headless.media.live(), 0);
    assert_eq!(
        section.background_url(MediaKind::Image).as_deref(),
        Some("https://cdn.example.com/one.png")
    );
    assert_eq!(
        section.settings().background_image_url.get().as_deref(),
        Some("https://cdn.example.com/one.png")
    );
    assert_eq!(*events.borrow(), vec!["sectionChanged Some(0) Some(0)", "changed"]);
}

#[test]
fn updater_is_inert_after_clear_or_removal() {
    let (document, headless) = document();
    let section = document.insert_text("<p>A</p>", None).unwrap();
    let updates = capture_updates(&document);

    section.background_image(Some(png("one.png").into()));
    section.background_image(None);
    assert_eq!(headless.media.live(), 0);
    assert!(!updates.borrow()[0].apply("https://cdn.example.com/late.png"));

    section.background_image(Some(png("two.png").into()));
    assert!(!updates.borrow()[0].apply("https://cdn.example.com/stale.png"));
    assert_eq!(
        section.background_url(MediaKind::Image).as_deref(),
        Some("blob:align/2")
    );

    section.background_image(Some(png("three.png").into()));
    assert!(!updates.borrow()[1].apply("https://cdn.example.com/two.png"));
    assert_eq!(
        section.background_url(MediaKind::Image).as_deref(),
        Some("blob:align/3")
    );
    assert!(headless.media.is_live("blob:align/3"));
    assert_eq!(headless.media.live(), 1);

    section.remove();
    assert!(!updates.borrow()[2].apply("https://cdn.example.com/gone.png"));
    assert_eq!(headless.media.live(), 0);
}

#[test]
fn video_renders_ahead_of_image() {
    let (document, _) = document();
    let section = document.insert_text("<p>A</p>", None).unwrap();
    let events = record(&document);

    section.background_image(Some("i.png".into()));
    section.background_video(Some("v.mp4".into()));

    assert_eq!(events.borrow()[3], "videoAdded");
    assert_eq!(
        section.content(),
        r#"<div class="align-section has-bgImage has-bgVideo"><div class="align-bgVideo"><video autoplay muted loop><source src="v.mp4"></video></div><div class="align-bgImage" style="background-image: url(i.png)"></div><p>A</p></div>"#
    );

    let copy = document.insert_text(&section.content(), None).unwrap();
    assert_eq!(copy.background_url(MediaKind::Video).as_deref(), Some("v.mp4"));
    assert_eq!(copy.background_url(MediaKind::Image).as_deref(), Some("i.png"));
    assert_eq!(copy.content(), section.content());
}

#[test]
fn title_sections_take_no_background() {
    let (document, _) = document();
    let title = document.insert_title("Doc").unwrap();
    let events = record(&document);

    title.background_color(Some("red"));
    title.background_image(Some("i.png".into()));
    assert!(title.background_color_value().is_none());
    assert!(title.background_url(MediaKind::Image).is_none());
    assert!(events.borrow().is_empty());
}

#[test]
fn settings_writes_drive_the_decoration() {
    let (document, _) = document();
    let section = document.insert_text("<p>A</p>", None).unwrap();
    let events = record(&document);

    section
        .settings()
        .background_color
        .set(Some("blue".to_string()));
    assert_eq!(section.background_color_value().as_deref(), Some("blue"));
    assert!(section.classes().iter().any(|c| c == "has-bgColor"));

    section
        .settings()
        .background_video_url
        .set(Some("v.mp4".to_string()));
    assert_eq!(section.background_url(MediaKind::Video).as_deref(), Some("v.mp4"));

    assert_eq!(
        *events.borrow(),
        vec![
            "sectionChanged Some(0) Some(0)",
            "changed",
            "videoAdded",
            "sectionChanged Some(0) Some(0)",
            "changed",
        ]
    );
}

#[test]
fn spacing_prefers_explicit_values() {
    let (document, headless) = document();
    let section = document.insert_text("<p>A</p>", None).unwrap();
    headless
        .computed_style
        .set(section.id(), "padding-top", "12px");

    assert_eq!(section.spacing(Spacing::PaddingTop), "12px");
    assert_eq!(section.spacing(Spacing::MarginLeft), "");

    section.set_spacing(Spacing::PaddingTop, Some("4px"));
    assert_eq!(section.spacing(Spacing::PaddingTop), "4px");
    assert_eq!(
        section.content(),
        r#"<div class="align-section" style="padding-top: 4px"><p>A</p></div>"#
    );

    section.set_spacing(Spacing::PaddingTop, Some(""));
    assert_eq!(section.spacing(Spacing::PaddingTop), "12px");
    assert_eq!(section.content(), r#"<div class="align-section"><p>A</p></div>"#);
}
