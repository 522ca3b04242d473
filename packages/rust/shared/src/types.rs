//! Core domain types: collections, descriptors, records, datasets.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FomcError;

/// Delimiter placed between extracted sections of one document.
pub const SECTION_DELIMITER: &str = "\n\n[SECTION]\n\n";

// ---------------------------------------------------------------------------
// CollectionType
// ---------------------------------------------------------------------------

/// One of the six document collections published by the FOMC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionType {
    Statement,
    Minutes,
    MeetingScript,
    PresConfScript,
    Speech,
    Testimony,
}

/// How a collection's documents are encoded on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Html,
    Pdf,
}

impl CollectionType {
    /// All collections, in the order the CLI runs them for `all`.
    pub const ALL: [CollectionType; 6] = [
        CollectionType::Statement,
        CollectionType::Minutes,
        CollectionType::MeetingScript,
        CollectionType::PresConfScript,
        CollectionType::Speech,
        CollectionType::Testimony,
    ];

    /// Canonical snake_case name, also used for output file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statement => "statement",
            Self::Minutes => "minutes",
            Self::MeetingScript => "meeting_script",
            Self::PresConfScript => "presconf_script",
            Self::Speech => "speech",
            Self::Testimony => "testimony",
        }
    }

    /// Fixed document title, for collections whose listing pages carry none.
    pub fn fixed_title(&self) -> Option<&'static str> {
        match self {
            Self::Statement => Some("FOMC Statement"),
            Self::Minutes => Some("FOMC Meeting Minutes"),
            Self::MeetingScript => Some("FOMC Meeting Transcript"),
            Self::PresConfScript => Some("FOMC Press Conference Transcript"),
            Self::Speech | Self::Testimony => None,
        }
    }

    pub fn format(&self) -> DocumentFormat {
        match self {
            Self::MeetingScript | Self::PresConfScript => DocumentFormat::Pdf,
            _ => DocumentFormat::Html,
        }
    }

    /// Whether the speaker is derived from the document date (the sitting
    /// chair) rather than scraped from the listing page.
    pub fn derives_speaker(&self) -> bool {
        !matches!(self, Self::Speech | Self::Testimony)
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionType {
    type Err = FomcError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FomcError::config(format!("unknown collection type: {s}")))
    }
}

// ---------------------------------------------------------------------------
// DocumentDescriptor
// ---------------------------------------------------------------------------

/// One document to fetch, as found during link discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDescriptor {
    pub collection: CollectionType,
    /// The raw `href` as it appears on the listing page.
    pub link: String,
    /// The absolute URL the document is fetched from.
    pub url: String,
    /// Date as extracted from the URL or listing markup, before correction.
    pub raw_date: NaiveDate,
    pub title: String,
    /// `None` until resolved for collections that derive their speaker.
    pub speaker: Option<String>,
    /// Position in discovery order; the slot for this document's text.
    pub index: usize,
}

// ---------------------------------------------------------------------------
// DocumentRecord / Dataset
// ---------------------------------------------------------------------------

/// A fetched document joined with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Corrected document date.
    pub date: NaiveDate,
    #[serde(rename = "contents")]
    pub text: String,
    pub speaker: String,
    pub title: String,
}

/// Date-ordered records for one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<DocumentRecord>,
}

impl Dataset {
    /// Build a dataset, stable-sorting by date so that same-day records keep
    /// their discovery order.
    pub fn from_records(mut records: Vec<DocumentRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DocumentRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<DocumentRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DocumentRecord;
    type IntoIter = std::slice::Iter<'a, DocumentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
