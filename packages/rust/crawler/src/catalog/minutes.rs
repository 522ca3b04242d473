//! Meeting minutes: the current calendar plus yearly archive pages.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use fomc_shared::{CollectionType, Result};

use super::{Catalog, Found, archive_years, dated_links, hrefs_matching};
use crate::progress::ProgressReporter;

static CURRENT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/monetarypolicy/fomcminutes\d{8}.htm").expect("valid regex")
});

static ARCHIVE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^/monetarypolicy/fomcminutes|^/fomc/minutes|^/fomc/MINUTES)")
        .expect("valid regex")
});

pub(super) async fn discover(
    catalog: &Catalog,
    from_year: i32,
    progress: &dyn ProgressReporter,
) -> Result<Vec<Found>> {
    let calendar = catalog.site_url(super::CALENDAR_PATH)?;
    let body = catalog.get(&calendar).await?;
    let mut found = dated_links(
        CollectionType::Minutes,
        &calendar,
        hrefs_matching(&body, &CURRENT_LINK_RE),
    )?;
    info!(found = found.len(), "calendar scanned");

    for year in archive_years(from_year) {
        let page = catalog.archive_url(year)?;
        let body = catalog.get(&page).await?;
        let entries = dated_links(
            CollectionType::Minutes,
            &page,
            hrefs_matching(&body, &ARCHIVE_LINK_RE),
        )?;
        info!(year, found = entries.len(), "archive scanned");
        progress.year_scanned(year, entries.len());
        found.extend(entries);
    }

    Ok(found)
}
