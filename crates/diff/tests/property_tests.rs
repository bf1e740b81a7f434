use diff_desc::{DiffDescriptor, Line, RunCategory, SourceOptions, TaggedEntry};
use proptest::collection::vec;
use proptest::prelude::*;

/// One step of an arbitrary, well-formed tagged stream
#[derive(Debug, Clone)]
enum Step {
    Base(String, Option<Vec<u8>>),
    Modified(String, Option<Vec<u8>>),
    Common(String),
}

fn step() -> impl Strategy<Value = Step> {
    let hint = proptest::option::of(vec(0u8..4, 0..5));
    prop_oneof![
        ("[ab]{0,4}", hint.clone()).prop_map(|(text, hint)| Step::Base(text, hint)),
        ("[ab]{0,4}", hint).prop_map(|(text, hint)| Step::Modified(text, hint)),
        "[ab]{0,4}".prop_map(Step::Common),
    ]
}

fn category(code: u8) -> RunCategory {
    match code {
        0 => RunCategory::Unchanged,
        1 => RunCategory::Added,
        2 => RunCategory::Deleted,
        _ => RunCategory::Changed,
    }
}

fn to_stream(steps: &[Step]) -> Vec<TaggedEntry> {
    let mut stream = Vec::new();
    for step in steps {
        let (entry, hint) = match step {
            Step::Base(text, hint) => (TaggedEntry::BaseOnly(text.clone()), hint.as_ref().map(|h| (text, h))),
            Step::Modified(text, hint) => (TaggedEntry::ModifiedOnly(text.clone()), hint.as_ref().map(|h| (text, h))),
            Step::Common(text) => (TaggedEntry::Common(text.clone()), None),
        };
        stream.push(entry);
        if let Some((text, codes)) = hint {
            let marks = codes
                .iter()
                .take(text.chars().count())
                .map(|&code| category(code))
                .collect();
            stream.push(TaggedEntry::Hint(marks));
        }
    }
    stream
}

fn real_texts(lines: &[Line]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| !line.is_placeholder())
        .map(|line| line.text().to_string())
        .collect()
}

/// Recount the statistics straight from the two sequences
fn brute_force_counts(desc: &DiffDescriptor) -> (usize, usize, usize, usize) {
    let (mut added, mut deleted, mut changed, mut unchanged) = (0, 0, 0, 0);
    for (base, modified) in desc.base().iter().zip(desc.modified()) {
        if base.is_placeholder() {
            added += 1;
        } else if modified.is_placeholder() {
            deleted += 1;
        } else if base.text() != modified.text() {
            changed += 1;
        } else {
            unchanged += 1;
        }
    }
    (added, deleted, changed, unchanged)
}

fn check_invariants(desc: &DiffDescriptor) -> Result<(), TestCaseError> {
    prop_assert_eq!(desc.base().len(), desc.modified().len());
    prop_assert_eq!(desc.violations(), Vec::new());

    for row in desc.rows() {
        prop_assert!(!(row.base.is_placeholder() && row.modified.is_placeholder()));
        let covered: usize = row.base.runs().iter().map(|run| run.length).sum();
        prop_assert_eq!(covered, row.base.char_len());
        let covered: usize = row.modified.runs().iter().map(|run| run.length).sum();
        prop_assert_eq!(covered, row.modified.char_len());
    }

    let stats = desc.stats();
    prop_assert_eq!(
        (stats.added, stats.deleted, stats.changed, stats.unchanged),
        brute_force_counts(desc)
    );
    prop_assert_eq!(
        stats.added + stats.deleted + stats.changed + stats.unchanged,
        desc.row_count()
    );

    // Regions cover disjoint ranges and only changed rows
    let mut last_end = 0;
    for region in desc.regions() {
        prop_assert!(region.rows().start >= last_end);
        prop_assert!(!region.is_empty());
        for row in region.rows() {
            prop_assert!(desc.row(row).unwrap().is_change());
            prop_assert_eq!(desc.base()[row].region(), Some(region.index()));
        }
        last_end = region.rows().end;
    }
    Ok(())
}

proptest! {
    #[test]
    fn arbitrary_streams_build_sound_descriptors(steps in vec(step(), 0..24)) {
        let stream = to_stream(&steps);
        let desc = DiffDescriptor::build(stream.clone()).unwrap();

        check_invariants(&desc)?;

        // Building twice gives the same descriptor
        prop_assert_eq!(&desc, &DiffDescriptor::build(stream).unwrap());

        // Each side keeps its own lines, in order
        let expected_base: Vec<String> = steps
            .iter()
            .filter_map(|step| match step {
                Step::Base(text, _) | Step::Common(text) => Some(text.clone()),
                Step::Modified(..) => None,
            })
            .collect();
        let expected_modified: Vec<String> = steps
            .iter()
            .filter_map(|step| match step {
                Step::Modified(text, _) | Step::Common(text) => Some(text.clone()),
                Step::Base(..) => None,
            })
            .collect();
        prop_assert_eq!(real_texts(desc.base()), expected_base);
        prop_assert_eq!(real_texts(desc.modified()), expected_modified);
    }

    #[test]
    fn line_diffs_build_sound_descriptors(
        base in vec("[abc]{0,3}", 0..16),
        modified in vec("[abc]{0,3}", 0..16),
    ) {
        let options = SourceOptions::default();
        let desc = DiffDescriptor::build(options.tagged_stream_from_lines(&base, &modified)).unwrap();

        check_invariants(&desc)?;
        prop_assert_eq!(real_texts(desc.base()), base.clone());
        prop_assert_eq!(real_texts(desc.modified()), modified.clone());

        // Line numbers count real lines from 1 on each side
        let numbers: Vec<usize> = desc.base().iter().filter_map(Line::line_number).collect();
        prop_assert_eq!(numbers, (1..=base.len()).collect::<Vec<_>>());

        let stats = desc.stats();
        prop_assert_eq!(stats.base_lines, base.len());
        prop_assert_eq!(stats.modified_lines, modified.len());
        prop_assert_eq!(stats.has_changes(), base != modified);
    }
}
