//! Press conference transcripts.
//!
//! Listing pages link to an event page per press conference; the transcript
//! PDF is linked from the event page.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};
use url::Url;

use fomc_shared::{CollectionType, Result};

use super::{Catalog, Found, archive_years, dated_links, hrefs_matching, resolve};
use crate::progress::ProgressReporter;

static EVENT_PAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/monetarypolicy/fomcpresconf\d{8}.htm").expect("valid regex")
});

static TRANSCRIPT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/mediacenter/files/FOMCpresconf\d{8}.pdf").expect("valid regex")
});

pub(super) async fn discover(
    catalog: &Catalog,
    from_year: i32,
    progress: &dyn ProgressReporter,
) -> Result<Vec<Found>> {
    let calendar = catalog.site_url(super::CALENDAR_PATH)?;
    let mut found = transcripts_listed_on(catalog, &calendar).await?;
    info!(found = found.len(), "calendar scanned");

    for year in archive_years(from_year) {
        let page = catalog.archive_url(year)?;
        let entries = transcripts_listed_on(catalog, &page).await?;
        info!(year, found = entries.len(), "archive scanned");
        progress.year_scanned(year, entries.len());
        found.extend(entries);
    }

    Ok(found)
}

/// Follow every event page linked from `listing` and collect its transcripts.
async fn transcripts_listed_on(catalog: &Catalog, listing: &Url) -> Result<Vec<Found>> {
    let body = catalog.get(listing).await?;
    let events = hrefs_matching(&body, &EVENT_PAGE_RE);

    let mut found = Vec::new();
    for event in events {
        let event_url = resolve(listing, &event)?;
        let body = catalog.get(&event_url).await?;
        let transcripts = hrefs_matching(&body, &TRANSCRIPT_LINK_RE);
        debug!(event = %event_url, transcripts = transcripts.len(), "event page scanned");
        found.extend(dated_links(
            CollectionType::PresConfScript,
            &event_url,
            transcripts,
        )?);
    }
    Ok(found)
}
