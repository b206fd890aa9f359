use align_core::headless::HeadlessServices;
use align_core::{Document, DocumentConfig, EditableSurface, SectionState};

fn document() -> (Document, HeadlessServices) {
    let headless = HeadlessServices::new();
    let document = Document::new(DocumentConfig::default(), headless.services());
    (document, headless)
}

#[test]
fn raw_view_shows_escaped_source_and_highlights_it() {
    let (document, headless) = document();
    let section = document.insert_text("<p>Hi <b>there</b></p>", None).unwrap();
    let before = section.content();

    section.toggle_raw_view();
    assert_eq!(section.state(), SectionState::RawView);
    assert!(section.settings().is_raw_view.get());
    assert_eq!(
        section.with_surface(|s| s.markup()).unwrap(),
        r#"<pre data-align-html="true">&lt;p&gt;Hi &lt;b&gt;there&lt;/b&gt;&lt;/p&gt;</pre>"#
    );
    assert_eq!(
        headless.highlighter.calls(),
        vec![(section.id(), "<p>Hi <b>there</b></p>".to_string())]
    );
    assert_eq!(section.content(), before);

    section.toggle_raw_view();
    assert_eq!(section.state(), SectionState::Idle);
    assert!(!section.settings().is_raw_view.get());
    assert_eq!(
        section.with_surface(|s| s.markup()).unwrap(),
        "<p>Hi <b>there</b></p>"
    );
}

#[test]
fn edits_made_in_raw_view_are_parsed_back() {
    let (document, headless) = document();
    let section = document.insert_text("<p>old</p>", None).unwrap();
    section.toggle_raw_view();

    section.with_surface_mut(|s| {
        s.set_markup(r#"<pre data-align-html="true">&lt;h2&gt;new&lt;/h2&gt;&lt;figure&gt;&lt;img src="x.png"&gt;&lt;/figure&gt;</pre>"#)
    });
    assert_eq!(
        section.content(),
        r#"<div class="align-section"><h2>new</h2><figure><img src="x.png"></figure></div>"#
    );

    section.toggle_raw_view();
    assert_eq!(section.sub_blocks().len(), 1);
    assert_eq!(headless.renderer.attached().len(), 1);
    assert_eq!(
        section.with_surface(|s| s.text()).unwrap(),
        "new"
    );
}

#[test]
fn formatting_is_skipped_in_raw_view() {
    let (document, headless) = document();
    let section = document.insert_text("<p>A</p>", None).unwrap();
    section.activate();
    let surface = headless.surfaces.last().unwrap();

    assert!(document.section_press("_sectionToggleHTML"));
    assert!(
        document
            .section_toolbar()
            .styler()
            .control("_sectionToggleHTML")
            .unwrap()
            .state
            .active
    );

    assert!(!document.press("bold"));
    assert!(surface.applied().is_empty());

    assert!(document.section_press("_sectionToggleHTML"));
    assert!(document.press("bold"));
    assert_eq!(surface.applied(), vec![("bold".to_string(), None)]);
}

#[test]
fn raw_view_follows_the_setting() {
    let (document, _) = document();
    let section = document.insert_text("<p>A</p>", None).unwrap();

    section.settings().is_raw_view.set(true);
    assert!(section.is_raw_view());
    section.settings().is_raw_view.set(true);
    assert!(section.is_raw_view());
    section.settings().is_raw_view.set(false);
    assert!(!section.is_raw_view());
    assert_eq!(section.with_surface(|s| s.markup()).unwrap(), "<p>A</p>");
}

#[test]
fn title_sections_have_no_raw_view() {
    let (document, _) = document();
    let title = document.insert_title("Doc").unwrap();
    title.toggle_raw_view();
    assert_eq!(title.state(), SectionState::Idle);
    assert!(title.with_surface(|s| s.markup()).is_none());
}
