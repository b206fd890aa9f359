use std::rc::Rc;

use align_core::headless::HeadlessServices;
use align_core::{Document, DocumentConfig, SectionKind};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(usize),
    Activate(usize),
    MoveUp(usize),
    MoveDown(usize),
    Duplicate(usize),
    Remove(usize),
    DeactivateAll,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8).prop_map(Op::Insert),
        (0usize..8).prop_map(Op::Activate),
        (0usize..8).prop_map(Op::MoveUp),
        (0usize..8).prop_map(Op::MoveDown),
        (0usize..8).prop_map(Op::Duplicate),
        (0usize..8).prop_map(Op::Remove),
        Just(Op::DeactivateAll),
    ]
}

fn apply(document: &Document, op: &Op, counter: &mut usize) {
    let sections = document.sections();
    let pick = |seed: usize| (!sections.is_empty()).then(|| sections[seed % sections.len()].clone());
    match *op {
        Op::Insert(at) => {
            *counter += 1;
            document.insert_text(&format!("<p>{counter}</p>"), Some(at));
        }
        Op::Activate(seed) => {
            if let Some(section) = pick(seed) {
                section.activate();
            }
        }
        Op::MoveUp(seed) => {
            if let Some(section) = pick(seed) {
                section.move_up();
            }
        }
        Op::MoveDown(seed) => {
            if let Some(section) = pick(seed) {
                section.move_down();
            }
        }
        Op::Duplicate(seed) => {
            if let Some(section) = pick(seed) {
                section.duplicate();
            }
        }
        Op::Remove(seed) => {
            if let Some(section) = pick(seed) {
                section.remove();
            }
        }
        Op::DeactivateAll => document.deactivate_all(),
    }
}

fn check(document: &Document) {
    let sections = document.sections();

    let titles: Vec<_> = sections
        .iter()
        .enumerate()
        .filter(|(_, s)| s.kind() == SectionKind::Title)
        .map(|(ix, _)| ix)
        .collect();
    assert!(titles.is_empty() || titles == vec![0], "titles at {titles:?}");

    for (ix, section) in sections.iter().enumerate() {
        assert_eq!(section.index(), Some(ix));
        assert!(!section.is_removed());
    }

    let active: Vec<_> = sections.iter().filter(|s| s.is_active()).collect();
    assert!(active.len() <= 1, "{} active sections", active.len());
    match document.active() {
        Some(current) => {
            assert_eq!(active.len(), 1);
            assert!(Rc::ptr_eq(&current, active[0]));
            assert_ne!(current.kind(), SectionKind::Title);
        }
        None => assert!(active.is_empty()),
    }
}

proptest! {
    #[test]
    fn title_pinned_and_single_active_under_any_sequence(
        with_title in any::<bool>(),
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let headless = HeadlessServices::new();
        let document = Document::new(DocumentConfig::default(), headless.services());
        for text in ["<p>A</p>", "<p>B</p>", "<p>C</p>"] {
            document.insert_text(text, None);
        }
        if with_title {
            document.insert_title("Doc");
        }

        let mut counter = 0;
        for op in &ops {
            apply(&document, op, &mut counter);
            check(&document);
        }
    }
}
