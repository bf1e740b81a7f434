use diff_desc::{Algorithm, DiffDescriptor, PlaceholderKind, RowKind, RunCategory, SourceOptions};

fn describe(old: &str, new: &str) -> DiffDescriptor {
    SourceOptions::default().describe(old, new).unwrap()
}

#[test]
fn test_newlines_at_end() {
    // Trailing newlines are terminators, not extra lines

    // Case 1: Both with trailing newlines
    let desc1 = describe("Line 1\nLine 2\n", "Line 1\nLine X\n");

    // Case 2: Old with trailing newline, new without
    let desc2 = describe("Line 1\nLine 2\n", "Line 1\nLine X");

    // Case 3: Old without trailing newline, new with
    let desc3 = describe("Line 1\nLine 2", "Line 1\nLine X\n");

    // Case 4: Neither with trailing newlines
    let desc4 = describe("Line 1\nLine 2", "Line 1\nLine X");

    for desc in [&desc1, &desc2, &desc3, &desc4] {
        assert_eq!(desc.row_count(), 2);
        assert_eq!(desc.row_kind(0), Some(RowKind::Unchanged));
        assert_eq!(desc.row_kind(1), Some(RowKind::Changed));
        assert!(desc.violations().is_empty());
    }
    assert_eq!(desc1, desc4);
}

#[test]
fn test_line_endings_are_normalized() {
    let desc = describe("one\r\ntwo\r\n", "one\ntwo\n");

    assert!(!desc.has_changes());
    assert_eq!(desc.base()[1].text(), "two");
}

#[test]
fn test_line_endings_kept_when_asked() {
    let options = SourceOptions::default().normalize_line_endings(false);
    // The rope still treats CRLF as one terminator
    let desc = options.describe("one\r\ntwo\r\n", "one\ntwo\n").unwrap();

    assert!(!desc.has_changes());
}

#[test]
fn test_very_large_diff() {
    let mut old = String::new();
    let mut new = String::new();

    // 1000 lines
    for i in 0..1000 {
        old.push_str(&format!("Line {} of old text\n", i));

        // Make every 10th line different
        if i % 10 == 0 {
            new.push_str(&format!("MODIFIED Line {} of new text\n", i));
        } else {
            new.push_str(&format!("Line {} of old text\n", i));
        }
    }

    let desc = describe(&old, &new);
    let stats = desc.stats();

    assert_eq!(stats.base_lines, 1000);
    assert_eq!(stats.modified_lines, 1000);
    assert_eq!(stats.unchanged, 900);
    // Every changed line sits between unchanged ones
    assert_eq!(desc.regions().len(), 100);
    assert!(desc.violations().is_empty());
}

#[test]
fn test_unicode_text() {
    let desc = describe("Line 1\nLine 2 🚀\nLine 3 😊\n", "Line 1\nLine 2 🚀\nLine 3 🎉\n");

    assert!(desc.has_changes());
    assert_eq!(desc.regions().len(), 1);

    // Runs count characters, not bytes
    let base = &desc.base()[2];
    let modified = &desc.modified()[2];
    assert_eq!(base.char_len(), 8);
    let changed: Vec<_> = base
        .runs()
        .iter()
        .filter(|run| run.category != RunCategory::Unchanged)
        .collect();
    assert_eq!(changed.len(), 1);
    assert_eq!(base.run_text(changed[0]), "😊");

    let changed = modified
        .runs()
        .iter()
        .find(|run| run.category != RunCategory::Unchanged)
        .unwrap();
    assert_eq!(modified.run_text(changed), "🎉");
    assert!(desc.violations().is_empty());
}

#[test]
fn test_empty_files() {
    let desc = describe("", "");
    assert!(desc.is_empty());
    assert!(!desc.has_changes());
}

#[test]
fn test_added_file() {
    let desc = describe("", "Line 1\nLine 2\n");
    let stats = desc.stats();

    assert_eq!(stats.added, 2);
    assert_eq!(stats.base_lines, 0);
    assert!(desc
        .base()
        .iter()
        .all(|line| line.placeholder_kind() == Some(PlaceholderKind::Added)));
}

#[test]
fn test_deleted_file() {
    let desc = describe("Line 1\nLine 2\n", "");
    let stats = desc.stats();

    assert_eq!(stats.deleted, 2);
    assert_eq!(stats.modified_lines, 0);
    assert_eq!(desc.regions().len(), 1);
}

#[test]
fn test_diff_with_only_whitespace_changes() {
    let desc = describe("Line 1\nLine 2\nLine 3\n", "Line 1\nLine  2\nLine 3\n");

    assert!(desc.has_changes());
    let line = &desc.modified()[1];
    let added: Vec<_> = line
        .runs()
        .iter()
        .filter(|run| run.category == RunCategory::Added)
        .collect();
    assert_eq!(added.len(), 1);
    assert_eq!(line.run_text(added[0]), " ");
}

#[test]
fn test_dissimilar_replacement_has_whole_line_runs() {
    let desc = describe("alpha\n", "zzzzz\n");

    assert_eq!(desc.row_count(), 1);
    assert_eq!(desc.base()[0].runs()[0].category, RunCategory::Deleted);
    assert_eq!(desc.modified()[0].runs()[0].category, RunCategory::Added);
}

#[test]
fn test_descriptor_clone() {
    let desc = describe("Line 1\nLine 2\nLine 3\n", "Line 1\nLine X\nLine 3\n");
    let copy = desc.clone();

    assert_eq!(desc, copy);
    assert_eq!(desc.stats(), copy.stats());
}

#[test]
fn test_algorithms_agree_on_simple_edit() {
    let old = "a\nb\nc\nd\n";
    let new = "a\nc\nd\ne\n";

    for algorithm in [Algorithm::Myers, Algorithm::Patience, Algorithm::Lcs] {
        let desc = SourceOptions::default()
            .algorithm(algorithm)
            .describe(old, new)
            .unwrap();
        let stats = desc.stats();

        assert_eq!(stats.deleted, 1, "{algorithm:?}");
        assert_eq!(stats.added, 1, "{algorithm:?}");
        assert!(desc.violations().is_empty());
    }
}
