//! Meeting transcripts, published as PDFs on the yearly archive pages only.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use fomc_shared::{CollectionType, Result};

use super::{ARCHIVE_CUTOVER_YEAR, Catalog, Found, archive_years, dated_links, hrefs_matching};
use crate::progress::ProgressReporter;

static TRANSCRIPT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/monetarypolicy/files/FOMC\d{8}meeting.pdf").expect("valid regex")
});

pub(super) async fn discover(
    catalog: &Catalog,
    from_year: i32,
    progress: &dyn ProgressReporter,
) -> Result<Vec<Found>> {
    if from_year >= ARCHIVE_CUTOVER_YEAR {
        info!(
            from_year,
            last_year = ARCHIVE_CUTOVER_YEAR - 1,
            "meeting transcripts are only published for earlier years"
        );
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for year in archive_years(from_year) {
        let page = catalog.archive_url(year)?;
        let body = catalog.get(&page).await?;
        let entries = dated_links(
            CollectionType::MeetingScript,
            &page,
            hrefs_matching(&body, &TRANSCRIPT_LINK_RE),
        )?;
        info!(year, found = entries.len(), "archive scanned");
        progress.year_scanned(year, entries.len());
        found.extend(entries);
    }

    Ok(found)
}
