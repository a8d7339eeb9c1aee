//! Side-by-side terminal rendering of a [`CodeDiff`].
//!
//! The layout is two equally wide columns separated by a gutter glyph that
//! encodes the relationship between the two sides of each row, with
//! optional 1-based line number columns on the outside. Long logical lines
//! hard-wrap into several physical rows; wrapped rows repeat the gutter
//! glyph and the logical line number of the line they belong to.

/// ANSI-aware measurement, tab expansion and wrapping helpers.
pub mod ansi;

use crate::diff::{CodeDiff, DiffEntry};
use anyhow::{Result, bail};
use std::io::Write;
use tracing::{Level, debug, span};

/// Gutter glyph for a row that is identical on both sides.
const GUTTER_UNCHANGED: &str = " ┃ ";
/// Gutter glyph for a row that differs on both sides.
const GUTTER_CHANGED: &str = "⟪╋⟫";
/// Gutter glyph for a row with left-side content only.
const GUTTER_REMOVED: &str = "⟪┫ ";
/// Gutter glyph for a row with right-side content only.
const GUTTER_ADDED: &str = " ┣⟫";

/// Display columns taken by the gutter.
const GUTTER_WIDTH: usize = 3;

/// Smallest usable column content width. Below this the layout degrades
/// to one character per row but rendering still makes forward progress.
const MIN_COLUMN_WIDTH: usize = 4;

/// Environment variable toggling line-number display by default.
pub const LINE_NUMBERS_ENV: &str = "CODEDIFF_LINE_NUMBERS";

/// Fallback width when the output is not an interactive terminal.
const FALLBACK_WIDTH: usize = 80;

/// Layout configuration for [`side_by_side_diff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Total target width in display columns, both columns plus gutter.
    pub width: usize,
    /// Number of spaces a tab character expands to.
    pub tab_width: usize,
    /// Whether to prepend/append 1-based logical line number columns.
    pub line_numbers: bool,
}

impl RenderOptions {
    /// Default tab width.
    pub const DEFAULT_TAB_WIDTH: usize = 4;

    /// Creates validated render options.
    ///
    /// # Errors
    ///
    /// Returns an error if `width` or `tab_width` is zero. Both are
    /// rejected here, at configuration-resolution time, so the renderer
    /// itself never has to fail.
    pub fn new(width: usize, tab_width: usize, line_numbers: bool) -> Result<Self> {
        if width == 0 {
            bail!("target width must be positive");
        }
        if tab_width == 0 {
            bail!("tab width must be positive");
        }
        Ok(Self {
            width,
            tab_width,
            line_numbers,
        })
    }

    /// Resolves options from partial caller input.
    ///
    /// Missing values fall back to the detected terminal width, the
    /// default tab width, and the [`LINE_NUMBERS_ENV`] toggle.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided value is invalid.
    pub fn resolve(
        width: Option<usize>,
        tab_width: Option<usize>,
        line_numbers: Option<bool>,
    ) -> Result<Self> {
        Self::new(
            width.unwrap_or_else(detected_width),
            tab_width.unwrap_or(Self::DEFAULT_TAB_WIDTH),
            line_numbers.unwrap_or_else(line_numbers_default),
        )
    }
}

/// Width of the attached terminal, or [`FALLBACK_WIDTH`] when stdout is
/// not an interactive terminal.
///
/// Terminal detection is an environment concern: this helper is meant for
/// the boundary layer resolving [`RenderOptions`], never for the render
/// loop itself.
#[must_use]
pub fn detected_width() -> usize {
    use std::io::IsTerminal;

    if std::io::stdout().is_terminal() {
        if let Ok((columns, _rows)) = crossterm::terminal::size() {
            return usize::from(columns);
        }
    }
    FALLBACK_WIDTH
}

/// Default for line-number display, from the [`LINE_NUMBERS_ENV`]
/// environment variable (accepted truthy values: `1`, `true`, `yes`,
/// `on`, case-insensitive). Defaults to `false` when unset.
#[must_use]
pub fn line_numbers_default() -> bool {
    std::env::var(LINE_NUMBERS_ENV).is_ok_and(|value| {
        matches!(
            value.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// The tab-expanded highlighted content of one diff entry.
struct EntryContent {
    /// The entry this content was taken from.
    entry: DiffEntry,
    /// Expanded left-side text, when the entry has left content.
    left: Option<String>,
    /// Expanded right-side text, when the entry has right content.
    right: Option<String>,
}

/// Renders `diff` side by side into `io`.
///
/// Writes the projected highlighted text of every entry, laid out in two
/// columns around a gutter glyph. The output sink is arbitrary; the
/// binary passes stdout. Rendering is total for validated options: long
/// lines wrap, overly narrow widths clamp to a small floor, and empty
/// diffs produce no output.
///
/// # Errors
///
/// Returns an error only when writing to `io` fails.
pub fn side_by_side_diff(
    io: &mut dyn Write,
    diff: &CodeDiff,
    options: &RenderOptions,
) -> Result<()> {
    let span = span!(
        Level::DEBUG,
        "side_by_side",
        entries = diff.entries().len(),
        width = options.width,
        line_numbers = options.line_numbers
    );
    let _guard = span.enter();

    let contents: Vec<EntryContent> = diff
        .entries()
        .iter()
        .map(|&entry| EntryContent {
            entry,
            left: entry
                .left()
                .map(|i| ansi::expand_tabs(diff.left().highlighted_line(i), options.tab_width)),
            right: entry
                .right()
                .map(|i| ansi::expand_tabs(diff.right().highlighted_line(i), options.tab_width)),
        })
        .collect();

    let number_width = if options.line_numbers {
        decimal_digits(diff.left().line_count().max(diff.right().line_count()))
    } else {
        0
    };
    let column_width = column_width(&contents, options, number_width);

    debug!(column_width, number_width, "layout resolved");

    for content in &contents {
        let left_rows = content
            .left
            .as_deref()
            .map(|text| ansi::wrap_ansi(text, column_width));
        let right_rows = content
            .right
            .as_deref()
            .map(|text| ansi::wrap_ansi(text, column_width));

        let physical_rows = left_rows
            .as_ref()
            .map_or(0, Vec::len)
            .max(right_rows.as_ref().map_or(0, Vec::len));

        for row in 0..physical_rows {
            let left_cell = left_rows.as_ref().and_then(|rows| rows.get(row));
            let right_cell = right_rows.as_ref().and_then(|rows| rows.get(row));
            let gutter = row_gutter(content.entry, left_cell.is_some(), right_cell.is_some());

            if options.line_numbers {
                write_number(io, left_cell.map(|_| content.entry.left()), number_width)?;
                io.write_all(b" ")?;
            }

            let left_text = left_cell.map(String::as_str).unwrap_or_default();
            write!(io, "{}", ansi::pad_visible(left_text, column_width))?;
            write!(io, "{gutter}")?;

            let right_text = right_cell.map(String::as_str).unwrap_or_default();
            if options.line_numbers {
                write!(io, "{}", ansi::pad_visible(right_text, column_width))?;
                io.write_all(b" ")?;
                write_number(io, right_cell.map(|_| content.entry.right()), number_width)?;
            } else {
                write!(io, "{right_text}")?;
            }
            writeln!(io)?;
        }
    }

    Ok(())
}

/// Shared content width of both columns: the longest expanded line on
/// either side, bounded by half the space left after the gutter and the
/// number columns, and floored so narrow targets still render.
fn column_width(contents: &[EntryContent], options: &RenderOptions, number_width: usize) -> usize {
    let longest = contents
        .iter()
        .flat_map(|content| {
            content
                .left
                .as_deref()
                .into_iter()
                .chain(content.right.as_deref())
        })
        .map(ansi::visible_width)
        .max()
        .unwrap_or(0);

    let reserved = GUTTER_WIDTH + if number_width > 0 { 2 * (number_width + 1) } else { 0 };
    let half = options.width.saturating_sub(reserved) / 2;
    longest.min(half).max(MIN_COLUMN_WIDTH)
}

/// Gutter glyph for one physical row, from the entry tag and which sides
/// actually have content on this row.
fn row_gutter(entry: DiffEntry, has_left: bool, has_right: bool) -> &'static str {
    match (has_left, has_right) {
        (true, false) => GUTTER_REMOVED,
        (false, true) => GUTTER_ADDED,
        _ => match entry {
            DiffEntry::Unchanged { .. } => GUTTER_UNCHANGED,
            DiffEntry::Changed { .. } => GUTTER_CHANGED,
            // A one-sided entry only ever produces one-sided rows.
            DiffEntry::Removed { .. } => GUTTER_REMOVED,
            DiffEntry::Added { .. } => GUTTER_ADDED,
        },
    }
}

/// Writes a right-aligned 1-based line number, or blanks when the side
/// has no content on this row.
fn write_number(io: &mut dyn Write, index: Option<Option<usize>>, width: usize) -> Result<()> {
    match index.flatten() {
        Some(index) => write!(io, "{:>width$}", index + 1)?,
        None => write!(io, "{:>width$}", "")?,
    }
    Ok(())
}

/// Number of decimal digits needed to print `value` (at least one).
fn decimal_digits(value: usize) -> usize {
    std::iter::successors(Some(value), |v| (*v >= 10).then_some(v / 10)).count()
}
