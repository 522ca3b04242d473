//! Link discovery: turn a collection type and starting year into an ordered
//! list of [`DocumentDescriptor`]s.
//!
//! Each collection has its own strategy module. They share a few helpers
//! here for fetching listing pages and filtering anchors; HTML is always
//! parsed inside synchronous helpers so no parsed tree is held across an
//! `.await`.

mod meeting_script;
mod minutes;
mod presconf;
mod speech;
mod statement;
mod testimony;

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, instrument};
use url::Url;

use fomc_shared::{
    CollectionType, DocumentDescriptor, FomcError, PipelineConfig, Result, date_from_link,
};

use crate::http::fetch_text;
use crate::progress::ProgressReporter;

/// Listing of upcoming and recent meetings.
pub(crate) const CALENDAR_PATH: &str = "/monetarypolicy/fomccalendars.htm";

/// First year whose meetings are no longer on a yearly archive page.
pub(crate) const ARCHIVE_CUTOVER_YEAR: i32 = 2015;

/// A discovered document before its position in the list is assigned.
#[derive(Debug, Clone)]
pub(crate) struct Found {
    pub link: String,
    pub url: Url,
    pub raw_date: NaiveDate,
    pub title: String,
    pub speaker: Option<String>,
}

/// Discovers the documents of each collection on the Federal Reserve site.
#[derive(Clone)]
pub struct Catalog {
    client: Client,
    config: Arc<PipelineConfig>,
    through_year: i32,
}

impl Catalog {
    /// Create a catalog that scans listings up to the current calendar year.
    pub fn new(client: Client, config: Arc<PipelineConfig>) -> Self {
        Self {
            client,
            config,
            through_year: Utc::now().year(),
        }
    }

    /// Override the last year scanned by open-ended collections.
    pub fn with_through_year(mut self, year: i32) -> Self {
        self.through_year = year;
        self
    }

    pub fn through_year(&self) -> i32 {
        self.through_year
    }

    /// Discover every document of `collection` from `from_year` onward.
    ///
    /// The result is in discovery order, and each descriptor's `index` is its
    /// position in the list. A listing page that fails to load aborts
    /// discovery.
    #[instrument(skip_all, fields(collection = %collection, from_year))]
    pub async fn discover(
        &self,
        collection: CollectionType,
        from_year: i32,
        progress: &dyn ProgressReporter,
    ) -> Result<Vec<DocumentDescriptor>> {
        progress.phase(collection, "discovering");

        let found = match collection {
            CollectionType::Statement => statement::discover(self, from_year, progress).await?,
            CollectionType::Minutes => minutes::discover(self, from_year, progress).await?,
            CollectionType::MeetingScript => {
                meeting_script::discover(self, from_year, progress).await?
            }
            CollectionType::PresConfScript => {
                presconf::discover(self, from_year, progress).await?
            }
            CollectionType::Speech => speech::discover(self, from_year, progress).await?,
            CollectionType::Testimony => testimony::discover(self, from_year, progress).await?,
        };

        let descriptors: Vec<DocumentDescriptor> = found
            .into_iter()
            .enumerate()
            .map(|(index, f)| DocumentDescriptor {
                collection,
                link: f.link,
                url: f.url.to_string(),
                raw_date: f.raw_date,
                title: f.title,
                speaker: f.speaker,
                index,
            })
            .collect();

        info!(found = descriptors.len(), "discovery complete");
        progress.links_found(descriptors.len());
        Ok(descriptors)
    }

    /// Resolve a site path against the base URL.
    pub(crate) fn site_url(&self, path: &str) -> Result<Url> {
        self.config.site_url(path)
    }

    /// Yearly archive page of FOMC meetings.
    pub(crate) fn archive_url(&self, year: i32) -> Result<Url> {
        self.site_url(&format!("/monetarypolicy/fomchistorical{year}.htm"))
    }

    pub(crate) async fn get(&self, url: &Url) -> Result<String> {
        fetch_text(&self.client, url).await
    }
}

/// Years served by the yearly archive pages: `from_year` up to the cutover.
pub(crate) fn archive_years(from_year: i32) -> std::ops::Range<i32> {
    from_year..ARCHIVE_CUTOVER_YEAR
}

/// Raw `href` values of anchors whose href matches `pattern`, in document order.
pub(crate) fn hrefs_matching(body: &str, pattern: &Regex) -> Vec<String> {
    let doc = Html::parse_document(body);
    let sel = Selector::parse("a[href]").expect("valid selector");
    doc.select(&sel)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| pattern.is_match(href))
        .map(str::to_string)
        .collect()
}

/// Raw `href` values of anchors whose text is exactly `text`.
pub(crate) fn hrefs_with_text(body: &str, text: &str) -> Vec<String> {
    let doc = Html::parse_document(body);
    let sel = Selector::parse("a[href]").expect("valid selector");
    doc.select(&sel)
        .filter(|a| a.text().collect::<String>() == text)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Resolve a raw href against the page it was found on.
pub(crate) fn resolve(page: &Url, href: &str) -> Result<Url> {
    page.join(href)
        .map_err(|e| FomcError::parse(format!("bad link {href:?} on {page}: {e}")))
}

/// Build entries for collections whose date comes from the URL and whose
/// title is fixed.
pub(crate) fn dated_links(
    collection: CollectionType,
    page: &Url,
    hrefs: Vec<String>,
) -> Result<Vec<Found>> {
    let title = collection.fixed_title().unwrap_or_default();
    hrefs
        .into_iter()
        .map(|href| {
            Ok(Found {
                url: resolve(page, &href)?,
                raw_date: date_from_link(&href)?,
                title: title.to_string(),
                speaker: None,
                link: href,
            })
        })
        .collect()
}

/// Compile a pattern that embeds runtime values such as the year.
pub(crate) fn year_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| FomcError::parse(format!("bad link pattern {pattern}: {e}")))
}
