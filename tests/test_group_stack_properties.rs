//! Property tests for group stack discipline and operator redirection.

use pdf_compose::writer::{Composer, Destination, GroupOptions, OperatorSink, PageDimensions};
use pdf_compose::Error;
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Step {
    Open,
    Close,
    Write,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![Just(Step::Open), Just(Step::Close), Just(Step::Write)]
}

proptest! {
    #[test]
    fn close_restores_destination_before_matching_open(steps in prop::collection::vec(step(), 0..64)) {
        let mut composer = Composer::with_page(PageDimensions::new(612.0, 792.0));
        let mut saved: Vec<Destination> = Vec::new();

        for step in steps {
            match step {
                Step::Open => {
                    let before = composer.destination();
                    let group = composer.open_group(GroupOptions::default()).unwrap();
                    saved.push(before);
                    prop_assert_eq!(composer.destination(), Destination::Group(group.id));
                },
                Step::Close => match saved.pop() {
                    Some(expected) => {
                        composer.close_group().unwrap();
                        prop_assert_eq!(composer.destination(), expected);
                    },
                    None => {
                        prop_assert!(matches!(composer.close_group(), Err(Error::EmptyGroupStack)));
                        prop_assert_eq!(composer.destination(), Destination::Page(0));
                    },
                },
                Step::Write => composer.write("n"),
            }
            prop_assert_eq!(composer.depth(), saved.len());
        }
    }

    #[test]
    fn every_operator_lands_in_the_innermost_group(steps in prop::collection::vec(step(), 0..64)) {
        let mut composer = Composer::with_page(PageDimensions::new(612.0, 792.0));
        let mut open: Vec<u32> = Vec::new();
        let mut expected: HashMap<Option<u32>, Vec<String>> = HashMap::new();
        let mut counter = 0usize;

        for step in steps {
            match step {
                Step::Open => open.push(composer.open_group(GroupOptions::default()).unwrap().id),
                Step::Close => {
                    if open.pop().is_some() {
                        composer.close_group().unwrap();
                    }
                },
                Step::Write => {
                    let op = format!("op{}", counter);
                    counter += 1;
                    composer.write(&op);
                    expected.entry(open.last().copied()).or_default().push(op);
                },
            }
        }

        let page = expected.remove(&None).unwrap_or_default();
        prop_assert_eq!(composer.page_content(0).unwrap(), page.as_slice());
        for group in composer.groups() {
            let want = expected.remove(&Some(group.id)).unwrap_or_default();
            prop_assert_eq!(composer.group_content(group).unwrap(), want.as_slice());
        }
    }
}
