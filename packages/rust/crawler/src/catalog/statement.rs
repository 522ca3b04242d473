//! Policy statements: the current calendar plus yearly archive pages.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use fomc_shared::{CollectionType, Result};

use super::{Catalog, Found, archive_years, dated_links, hrefs_matching, hrefs_with_text};
use crate::progress::ProgressReporter;

static CURRENT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/newsevents/pressreleases/monetary\d{8}[ax].htm").expect("valid regex")
});

/// Archive pages label the statement link with exactly this text.
const ARCHIVE_LINK_TEXT: &str = "Statement";

pub(super) async fn discover(
    catalog: &Catalog,
    from_year: i32,
    progress: &dyn ProgressReporter,
) -> Result<Vec<Found>> {
    let calendar = catalog.site_url(super::CALENDAR_PATH)?;
    let body = catalog.get(&calendar).await?;
    let mut found = dated_links(
        CollectionType::Statement,
        &calendar,
        hrefs_matching(&body, &CURRENT_LINK_RE),
    )?;
    info!(found = found.len(), "calendar scanned");

    for year in archive_years(from_year) {
        let page = catalog.archive_url(year)?;
        let body = catalog.get(&page).await?;
        let entries = dated_links(
            CollectionType::Statement,
            &page,
            hrefs_with_text(&body, ARCHIVE_LINK_TEXT),
        )?;
        info!(year, found = entries.len(), "archive scanned");
        progress.year_scanned(year, entries.len());
        found.extend(entries);
    }

    Ok(found)
}
