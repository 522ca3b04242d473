//! Progress reporting hooks for discovery and fetching.

use fomc_shared::CollectionType;

/// Receives incremental progress while a collection is discovered and fetched.
///
/// All methods default to no-ops so reporters implement only what they show.
pub trait ProgressReporter: Send + Sync {
    /// A new phase of work has started for a collection.
    fn phase(&self, _collection: CollectionType, _phase: &str) {}
    /// One listing year has been scanned.
    fn year_scanned(&self, _year: i32, _found: usize) {}
    /// Discovery finished with `total` documents.
    fn links_found(&self, _total: usize) {}
    /// A document was fetched and extracted.
    fn document_fetched(&self, _current: usize, _total: usize) {}
    /// The collection is complete.
    fn done(&self, _records: usize) {}
}

/// No-op progress reporter.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {}
