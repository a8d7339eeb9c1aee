//! End-to-end tests of the comparison pipeline: normalize, align,
//! optimize, render.

use codediff::render::{self, RenderOptions};
use codediff::{CodeDiff, CodeText, DiffEntry, DiffOptions, compare, normalize};

fn render_to_string(diff: &CodeDiff, options: &RenderOptions) -> String {
    let mut out = Vec::new();
    render::side_by_side_diff(&mut out, diff, options).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_llvm_widening_scenario() {
    let left = "top:\n  %1 = add i64 %0, 1\n  ret i64 %1\n}";
    let right = "top:\n  %1 = sext i8 %0 to i64\n  %2 = add nsw i64 %1, 1\n  ret i64 %2\n}";

    let diff = compare(
        CodeText::new(left),
        CodeText::new(right),
        &DiffOptions::default(),
    )
    .unwrap();

    assert_eq!(
        diff.entries(),
        [
            DiffEntry::Unchanged { left: 0, right: 0 },
            DiffEntry::Added { right: 1 },
            DiffEntry::Changed { left: 1, right: 2 },
            DiffEntry::Changed { left: 2, right: 3 },
            DiffEntry::Unchanged { left: 3, right: 4 },
        ]
    );

    let options = RenderOptions::new(80, 4, false).unwrap();
    let output = render_to_string(&diff, &options);
    let rows: Vec<&str> = output.lines().collect();
    assert_eq!(rows.len(), 5);
    assert!(rows[0].contains(" ┃ "));
    assert!(rows[1].contains(" ┣⟫"));
    assert!(rows[2].contains("⟪╋⟫"));
    assert!(rows[3].contains("⟪╋⟫"));
    assert!(rows[4].contains(" ┃ "));
}

#[test]
fn test_unstable_identifiers_compare_equal_after_normalization() {
    let older = "define i64 @julia_f_2007(i64 signext %0) #0 {\ntop:\n  ret i64 %0\n}";
    let newer = "define i64 @julia_f_2019(i64 signext %0) #0 {\ntop:\n  ret i64 %0\n}";

    // Without normalization the module names differ.
    let raw = compare(
        CodeText::new(older),
        CodeText::new(newer),
        &DiffOptions::default(),
    )
    .unwrap();
    assert!(!raw.is_identical());

    // With normalization both sides read `@f` and the diff is empty.
    let normalized = compare(
        CodeText::new(&normalize::strip_unstable_suffix(older)),
        CodeText::new(&normalize::strip_unstable_suffix(newer)),
        &DiffOptions::default(),
    )
    .unwrap();
    assert!(normalized.is_identical());
    assert_eq!(normalized.left().line(0), "define i64 @f(i64 signext %0) #0 {");
}

#[test]
fn test_long_line_wraps_with_a_stable_line_number() {
    let long = "a".repeat(200);
    let diff = compare(
        CodeText::new(&long),
        CodeText::new(&long),
        &DiffOptions::default(),
    )
    .unwrap();

    let options = RenderOptions::new(80, 4, true).unwrap();
    let output = render_to_string(&diff, &options);

    // (80 - gutter - two number columns) / 2 = 36 usable columns, so the
    // 200-character line spans several physical rows, every one numbered 1.
    let rows: Vec<&str> = output.lines().collect();
    assert!(rows.len() > 1);
    assert_eq!(rows.len(), 200usize.div_ceil(36));
    for row in &rows {
        assert!(row.starts_with("1 "));
        assert!(row.ends_with(" 1"));
    }
}

#[test]
fn test_empty_left_side_is_pure_addition() {
    let diff = compare(
        CodeText::new(""),
        CodeText::new("one\ntwo\nthree"),
        &DiffOptions::default(),
    )
    .unwrap();

    assert_eq!(
        diff.entries(),
        [
            DiffEntry::Added { right: 0 },
            DiffEntry::Added { right: 1 },
            DiffEntry::Added { right: 2 },
        ]
    );

    let options = RenderOptions::new(60, 4, false).unwrap();
    let output = render_to_string(&diff, &options);
    assert_eq!(output.lines().count(), 3);
    for row in output.lines() {
        assert!(row.contains(" ┣⟫"));
    }
}

#[test]
fn test_highlighting_survives_the_whole_pipeline() {
    let left = CodeText::with_highlighting(
        "top:\n  ret i64 %1",
        "\x1b[33mtop:\x1b[0m\n  ret i64 \x1b[36m%1\x1b[0m",
    )
    .unwrap();
    let right = CodeText::with_highlighting(
        "top:\n  ret i64 %2",
        "\x1b[33mtop:\x1b[0m\n  ret i64 \x1b[36m%2\x1b[0m",
    )
    .unwrap();

    let diff = compare(left, right, &DiffOptions::default()).unwrap();
    let options = RenderOptions::new(60, 4, false).unwrap();
    let output = render_to_string(&diff, &options);

    // The changed row carries both highlighted forms, the diff itself
    // having been computed on plain text.
    assert!(output.contains("\x1b[36m%1\x1b[0m"));
    assert!(output.contains("\x1b[36m%2\x1b[0m"));
    assert!(output.contains("⟪╋⟫"));
}

#[test]
fn test_tab_expansion_before_width_calculations() {
    let diff = compare(
        CodeText::new("\tmov eax, 1"),
        CodeText::new("\tmov eax, 2"),
        &DiffOptions::default(),
    )
    .unwrap();
    let options = RenderOptions {
        width: 60,
        tab_width: 8,
        line_numbers: false,
    };
    let output = render_to_string(&diff, &options);
    assert!(output.contains("        mov eax, 1"));
    assert!(!output.contains('\t'));
}
