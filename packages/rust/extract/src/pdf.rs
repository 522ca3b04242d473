//! PDF transcript text extraction and heuristic section segmentation.
//!
//! Transcripts have no structural markup once flattened to text, so sections
//! are recovered from mostly-uppercase lines (speaker labels such as
//! `CHAIRMAN GREENSPAN.` and agenda headings).

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use fomc_shared::{FomcError, Result};

/// Lowercased fragments that look like headings but are attendee lists,
/// model names or acronyms inside running text.
const HEADING_DENYLIST: &[&str] = &[
    "present",
    "frb/us",
    "abs cdo",
    "libor",
    "rp–ioer",
    "lsaps",
    "cusip",
    "nairu",
    "s cpi",
    "clos, r",
];

/// Number of leading characters inspected by the heading heuristic.
const HEADING_PREFIX_CHARS: usize = 10;

/// A heading needs strictly more uppercase letters than this in its prefix.
const HEADING_MIN_UPPERCASE: usize = 5;

/// Extract raw text from a PDF file on disk.
pub fn extract_text(path: &Path) -> Result<String> {
    pdf_extract::extract_text(path)
        .map_err(|e| FomcError::Extraction(format!("{}: {e}", path.display())))
}

/// Extract and segment a PDF file into sections.
pub fn extract_sections(path: &Path) -> Result<Vec<String>> {
    let raw = extract_text(path)?;
    let sections = segment_sections(&raw);
    debug!(path = %path.display(), sections = sections.len(), "pdf segmented");
    Ok(sections)
}

/// Split flattened transcript text into sections.
///
/// Page headers/footers are dropped, a heading line opens a new section, and
/// other lines are appended to the open section with no separator. Text
/// before the first heading is discarded.
pub fn segment_sections(raw: &str) -> Vec<String> {
    static BLANK_RUN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid regex"));

    let collapsed = BLANK_RUN_RE.replace_all(raw.trim(), "\n");

    let mut sections: Vec<String> = Vec::new();
    for line in collapsed.split('\n') {
        if is_page_marker(line) {
            continue;
        }
        if is_section_heading(line) {
            sections.push(String::new());
        }
        if let Some(current) = sections.last_mut() {
            current.push_str(line);
        }
    }

    sections
}

/// Whether a line starts with `page` or a month name/abbreviation.
pub fn is_page_marker(line: &str) -> bool {
    static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"^(page|january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)",
        )
        .expect("valid regex")
    });

    MARKER_RE.is_match(&line.to_lowercase())
}

/// Whether a (non page-marker) line opens a new section.
pub fn is_section_heading(line: &str) -> bool {
    if is_page_marker(line) {
        return false;
    }

    let prefix: String = line.chars().take(HEADING_PREFIX_CHARS).collect();
    let uppercase = prefix.chars().filter(char::is_ascii_uppercase).count();
    if uppercase <= HEADING_MIN_UPPERCASE {
        return false;
    }

    let lowered = prefix.to_lowercase();
    !HEADING_DENYLIST.iter().any(|frag| lowered.contains(frag))
}
