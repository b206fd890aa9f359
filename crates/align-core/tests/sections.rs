use std::cell::RefCell;
use std::rc::Rc;

use align_core::headless::HeadlessServices;
use align_core::{Document, DocumentConfig, DocumentEvent, SectionKind, SectionState};

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

fn texts(document: &Document) -> Vec<String> {
    document
        .sections()
        .iter()
        .map(|s| s.title().unwrap_or_else(|| s.content()))
        .collect()
}

#[test]
fn title_stays_pinned_to_the_top() {
    let (document, _) = document();
    let title = document.insert_title("Doc").unwrap();
    let a = document.insert_text("<p>A</p>", None).unwrap();
    let b = document.insert_text("<p>B</p>", None).unwrap();
    let c = document.insert_text("<p>C</p>", None).unwrap();

    let x = document.insert_text("<p>X</p>", Some(0)).unwrap();
    assert_eq!(x.index(), Some(1));
    assert_eq!(title.index(), Some(0));

    let events = record(&document);
    assert!(!x.move_up());
    assert!(!c.move_down());
    assert!(!title.move_down());
    assert!(events.borrow().is_empty());

    assert!(b.move_up());
    assert_eq!(b.index(), Some(2));
    assert_eq!(a.index(), Some(3));
    assert_eq!(
        *events.borrow(),
        vec!["sectionChanged Some(3) Some(2)", "changed"]
    );

    assert!(document.insert_title("Another").is_none());
    assert!(title.duplicate().is_none());
    title.activate();
    assert!(document.active().is_none());
    assert_eq!(document.len(), 5);
    assert_eq!(document.title().unwrap().title().as_deref(), Some("Doc"));
}

#[test]
fn title_inserted_late_lands_first() {
    let (document, _) = document();
    document.insert_text("<p>A</p>", None).unwrap();
    let events = record(&document);
    let title = document.insert_title("<b>Late</b> title").unwrap();

    assert_eq!(title.index(), Some(0));
    assert_eq!(title.kind(), SectionKind::Title);
    assert_eq!(title.title().as_deref(), Some("Late title"));
    assert_eq!(*events.borrow(), vec!["sectionChanged None Some(0)", "changed"]);

    assert!(title.set_title("Plain <i>text</i>"));
    assert_eq!(title.content(), "Plain text");
}

#[test]
fn line_break_payload_builds_nothing() {
    let (document, _) = document();
    let events = record(&document);

    assert!(document.insert_text("<br>", None).is_none());
    assert!(document.insert_text(" <br/> ", None).is_none());
    assert!(document.is_empty());
    assert!(events.borrow().is_empty());
}

#[test]
fn insert_position_is_clamped() {
    let (document, _) = document();
    let a = document.insert_text("<p>A</p>", None).unwrap();
    let b = document.insert_text("<p>B</p>", Some(99)).unwrap();
    let c = document.insert_text("<p>C</p>", Some(0)).unwrap();

    assert_eq!(c.index(), Some(0));
    assert_eq!(a.index(), Some(1));
    assert_eq!(b.index(), Some(2));
}

#[test]
fn only_one_section_is_active() {
    let (document, headless) = document();
    let a = document.insert_text("<p>A</p>", None).unwrap();
    let b = document.insert_text("<p>B</p>", None).unwrap();

    a.activate();
    assert!(a.is_active());
    assert!(a.classes().iter().any(|c| c == "is-active"));

    b.activate();
    assert!(!a.is_active());
    assert!(!a.classes().iter().any(|c| c == "is-active"));
    assert_eq!(b.state(), SectionState::Active);
    assert!(Rc::ptr_eq(&document.active().unwrap(), &b));
    assert!(headless.surfaces.created()[1].is_focused());

    assert_eq!(b.content(), r#"<div class="align-section"><p>B</p></div>"#);

    let active = document
        .sections()
        .iter()
        .filter(|s| s.is_active())
        .count();
    assert_eq!(active, 1);

    document.deactivate_all();
    assert!(document.active().is_none());
    assert_eq!(b.state(), SectionState::Idle);
    assert!(!document.section_toolbar().is_visible());
}

#[test]
fn activating_the_active_section_only_resyncs() {
    let (document, headless) = document();
    let a = document.insert_text("<p>A</p>", None).unwrap();
    a.activate();

    let surface = headless.surfaces.last().unwrap();
    surface.set_state("bold", true);
    let events = record(&document);
    a.activate();

    assert!(a.is_active());
    assert!(document.styler().control("bold").unwrap().state.active);
    assert!(events.borrow().is_empty());
}

#[test]
fn remove_detaches_and_announces() {
    let (document, _) = document();
    let a = document.insert_text("<p>A</p>", None).unwrap();
    let b = document.insert_text("<p>B</p>", None).unwrap();
    b.activate();

    let events = record(&document);
    assert!(b.remove());
    assert_eq!(*events.borrow(), vec!["sectionChanged Some(1) None", "changed"]);
    assert_eq!(b.state(), SectionState::Removed);
    assert!(document.active().is_none());
    assert_eq!(document.len(), 1);
    assert!(document.section(b.id()).is_none());
    assert!(!document.section_toolbar().is_visible());

    events.borrow_mut().clear();
    assert!(!b.remove());
    assert!(!b.move_up());
    assert!(b.duplicate().is_none());
    b.activate();
    b.background_color(Some("red"));
    assert!(!b.is_active());
    assert!(events.borrow().is_empty());
    assert_eq!(b.content(), r#"<div class="align-section"><p>B</p></div>"#);

    assert_eq!(a.index(), Some(0));
}

#[test]
fn duplicate_lands_right_after_its_source() {
    let (document, _) = document();
    let markup = r#"<div class="align-section is-full custom" style="padding-top: 10px"><p>A</p></div>"#;
    let a = document.insert_text(markup, None).unwrap();
    let b = document.insert_text("<p>B</p>", None).unwrap();
    a.activate();

    let events = record(&document);
    let copy = a.duplicate().unwrap();

    assert_eq!(*events.borrow(), vec!["sectionChanged None Some(1)", "changed"]);
    assert_eq!(copy.index(), Some(1));
    assert_eq!(b.index(), Some(2));
    assert_ne!(copy.id(), a.id());
    assert!(!copy.is_active());
    assert!(a.is_active());
    assert_eq!(copy.content(), a.content());
    assert_eq!(copy.content(), markup);
    assert_eq!(copy.settings().modifiers.get(), vec!["is-full".to_string()]);
}

#[test]
fn moves_swap_neighbours_and_resync_the_toolbar() {
    let (document, _) = document();
    let a = document.insert_text("<p>A</p>", None).unwrap();
    let b = document.insert_text("<p>B</p>", None).unwrap();
    b.activate();

    assert!(document.section_toolbar().styler().control("_sectionDown").unwrap().state.disabled);
    assert!(document.section_press("_sectionUp"));

    assert_eq!(b.index(), Some(0));
    assert_eq!(a.index(), Some(1));
    let toolbar = document.section_toolbar();
    assert!(toolbar.styler().control("_sectionUp").unwrap().state.disabled);
    assert!(!toolbar.styler().control("_sectionDown").unwrap().state.disabled);
    drop(toolbar);

    assert!(!document.section_press("_sectionUp"));
    assert_eq!(
        texts(&document),
        vec![
            r#"<div class="align-section"><p>B</p></div>"#,
            r#"<div class="align-section"><p>A</p></div>"#,
        ]
    );
}

#[test]
fn add_section_focuses_after_deferred_flush() {
    let (document, headless) = document();
    let a = document.insert_text("<p>A</p>", None).unwrap();
    a.activate();

    let events = record(&document);
    assert!(document.section_press("_sectionDuplicate"));
    events.borrow_mut().clear();

    let added = a.add_section_before().unwrap();
    assert_eq!(added.index(), Some(0));
    assert_eq!(a.index(), Some(1));
    assert_eq!(*events.borrow(), vec!["sectionChanged None Some(0)", "changed"]);
    assert!(a.is_active());
    assert_eq!(document.pending_deferred(), 1);

    assert_eq!(document.run_deferred(), 1);
    assert!(added.is_active());
    assert!(!a.is_active());
    let surface = headless.surfaces.created().into_iter().last().unwrap();
    assert!(surface.first_block_selected());
    assert_eq!(
        added.content(),
        r#"<div class="align-section"><p></p></div>"#
    );
}

#[test]
fn deferred_focus_of_a_removed_section_is_dropped() {
    let (document, _) = document();
    let a = document.insert_text("<p>A</p>", None).unwrap();
    a.activate();

    let added = a.add_section_before().unwrap();
    assert!(added.remove());
    assert_eq!(document.run_deferred(), 0);
    assert_eq!(document.pending_deferred(), 0);
    assert!(a.is_active());
    assert_eq!(added.state(), SectionState::Removed);
}

#[test]
fn sub_blocks_are_attached() {
    let (document, headless) = document();
    let section = document
        .insert_text(
            r##"<p>x</p><figure><img src="a.png"></figure><table><tr><td>1</td></tr></table><p><a href="#">l</a></p>"##,
            None,
        )
        .unwrap();

    let kinds: Vec<_> = section.sub_blocks().iter().map(|b| b.kind.tag()).collect();
    assert_eq!(kinds, vec!["figure", "table", "a"]);
    assert_eq!(headless.renderer.attached().len(), 3);
}
