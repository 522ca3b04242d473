//! Document text extraction.
//!
//! Two strategies turn a fetched document into ordered text sections:
//! - [`html`]: paragraph assembly with markup repair, back-matter truncation
//!   and footnote removal
//! - [`pdf`]: heuristic section segmentation of flattened transcript text

pub mod html;
pub mod pdf;

use fomc_shared::SECTION_DELIMITER;

pub use html::{FootnotePolicy, HtmlOptions};

/// Join extracted sections into a document's final text.
pub fn join_sections(sections: &[String]) -> String {
    sections.join(SECTION_DELIMITER)
}
