//! Congressional testimony.
//!
//! Testimony from 2006 on is published as a single JSON feed; earlier years
//! have yearly listing pages whose markup varies from page to page.

use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::info;
use url::Url;

use fomc_shared::{FomcError, Result, parse_date};

use super::{Catalog, Found, resolve, year_pattern};
use crate::node::Node;
use crate::progress::ProgressReporter;

const FEED_PATH: &str = "/json/ne-testimony.json";

/// First year with a testimony listing page.
const FIRST_LISTING_YEAR: i32 = 1996;

/// First year covered by the JSON feed.
const FEED_FIRST_YEAR: i32 = 2006;

const FEED_DATE_FORMAT: &str = "%m/%d/%Y";
const LISTING_DATE_FORMAT: &str = "%B %d, %Y";

const MEDIA_LABELS: &[&str] = &["Watch Live", "Video"];

/// Where the title, speaker and date sit around a testimony link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TestimonyLayout {
    /// Title is the link text, speaker the first `div` after the link's
    /// parent, date the first node inside the grandparent.
    Standard,
    /// Date is the first node inside the grandparent and the speaker follows
    /// it directly.
    SpeakerAfterDate,
    /// The link text is the date; title and speaker are the first `em` and
    /// `strong` inside the grandparent.
    LinkIsDate,
}

const LAYOUT_OVERRIDES: &[(&str, TestimonyLayout)] = &[
    (
        "/boarddocs/testimony/2005/20050420/default.htm",
        TestimonyLayout::SpeakerAfterDate,
    ),
    (
        "/boarddocs/testimony/1997/19970121.htm",
        TestimonyLayout::LinkIsDate,
    ),
];

pub(crate) fn layout_for(href: &str) -> TestimonyLayout {
    LAYOUT_OVERRIDES
        .iter()
        .find(|(link, _)| *link == href)
        .map_or(TestimonyLayout::Standard, |(_, layout)| *layout)
}

/// One record of the testimony feed.
#[derive(Debug, Deserialize)]
struct FeedRecord {
    #[serde(rename = "l")]
    link: Option<String>,
    #[serde(rename = "t")]
    title: Option<String>,
    #[serde(rename = "s")]
    speaker: Option<String>,
    /// `M/D/YYYY hh:mm:ss AM`
    #[serde(rename = "d")]
    date: Option<String>,
}

pub(super) async fn discover(
    catalog: &Catalog,
    from_year: i32,
    progress: &dyn ProgressReporter,
) -> Result<Vec<Found>> {
    let from_year = if from_year < FIRST_LISTING_YEAR {
        info!(
            from_year,
            clamped_to = FIRST_LISTING_YEAR,
            "testimony listings start in {FIRST_LISTING_YEAR}"
        );
        FIRST_LISTING_YEAR
    } else {
        if from_year > FEED_FIRST_YEAR {
            info!(
                from_year,
                "testimony since {FEED_FIRST_YEAR} is one feed; returning all of it"
            );
        }
        from_year
    };

    let feed = catalog.site_url(FEED_PATH)?;
    let body = catalog.get(&feed).await?;
    let mut found = parse_feed(&body, &feed)?;
    info!(found = found.len(), "testimony feed read");

    for year in from_year..FEED_FIRST_YEAR {
        let page = catalog.site_url(&format!("/newsevents/testimony/{year}testimony.htm"))?;
        let body = catalog.get(&page).await?;
        let entries = parse_listing(&body, &page, year)?;
        info!(year, found = entries.len(), "testimony listing scanned");
        progress.year_scanned(year, entries.len());
        found.extend(entries);
    }

    Ok(found)
}

/// Parse the JSON feed. Records without a link are skipped.
pub(crate) fn parse_feed(body: &str, feed: &Url) -> Result<Vec<Found>> {
    let records: Vec<FeedRecord> = serde_json::from_str(body.trim_start_matches('\u{feff}'))
        .map_err(|e| FomcError::parse(format!("testimony feed is not valid JSON: {e}")))?;

    records
        .into_iter()
        .filter_map(|record| {
            let link = record.link.filter(|l| !l.is_empty())?;
            Some(feed_entry(link, record.title, record.speaker, record.date, feed))
        })
        .collect()
}

fn feed_entry(
    link: String,
    title: Option<String>,
    speaker: Option<String>,
    date: Option<String>,
    feed: &Url,
) -> Result<Found> {
    let date = date.ok_or_else(|| FomcError::parse(format!("feed record {link} has no date")))?;
    let day = date.split(' ').next().unwrap_or_default();
    Ok(Found {
        url: resolve(feed, &link)?,
        raw_date: parse_date(day, FEED_DATE_FORMAT)?,
        title: title.unwrap_or_default(),
        speaker: Some(speaker.unwrap_or_default()),
        link,
    })
}

/// Parse one pre-feed yearly listing page.
pub(crate) fn parse_listing(body: &str, page: &Url, year: i32) -> Result<Vec<Found>> {
    let link_re = year_pattern(&format!(
        r"^/boarddocs/testimony/{year}/|^/boarddocs/hh/{year}/"
    ))?;
    let doc = Html::parse_document(body);
    let anchor_sel = Selector::parse("a[href]").expect("valid selector");
    let watch_live_sel = Selector::parse(".watchLive").expect("valid selector");

    let mut found = Vec::new();
    for anchor in doc.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !link_re.is_match(href) || anchor.select(&watch_live_sel).next().is_some() {
            continue;
        }

        let entry = read_entry(Node::from(anchor), layout_for(href))?;
        found.push(Found {
            link: href.to_string(),
            url: resolve(page, href)?,
            raw_date: parse_date(&entry.date, LISTING_DATE_FORMAT)?,
            title: entry.title,
            speaker: Some(entry.speaker),
        });
    }
    Ok(found)
}

struct ListingEntry {
    title: String,
    speaker: String,
    date: String,
}

fn read_entry(link: Node<'_>, layout: TestimonyLayout) -> Result<ListingEntry> {
    match layout {
        TestimonyLayout::Standard => {
            let parent = link.parent()?;
            let mut speaker = parent.find_next("div")?.clean_text();
            if MEDIA_LABELS.contains(&speaker.as_str()) {
                speaker = parent.find_next("p")?.find_next("p")?.clean_text();
            }
            Ok(ListingEntry {
                title: link.text().trim().to_string(),
                speaker,
                date: parent.parent()?.next_element()?.clean_text(),
            })
        }
        TestimonyLayout::SpeakerAfterDate => {
            let date = link.parent()?.parent()?.next_element()?;
            Ok(ListingEntry {
                title: link.text().trim().to_string(),
                speaker: date.next_element()?.clean_text(),
                date: date.clean_text(),
            })
        }
        TestimonyLayout::LinkIsDate => {
            let block = link.parent()?.parent()?;
            Ok(ListingEntry {
                title: block.find_next("em")?.clean_text(),
                speaker: block.find_next("strong")?.clean_text(),
                date: link.clean_text(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::test_support::*;
    use crate::progress::SilentProgress;
    use chrono::NaiveDate;
    use fomc_shared::CollectionType;

    fn listing_url(year: i32) -> Url {
        Url::parse(&format!(
            "https://www.federalreserve.gov/newsevents/testimony/{year}testimony.htm"
        ))
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const FEED: &str = "\u{feff}[\
        {\"d\":\"2/11/2020 10:00:00 AM\",\"t\":\"Semiannual Monetary Policy Report\",\"s\":\"Chair Jerome H. Powell\",\"l\":\"/newsevents/testimony/powell20200211a.htm\"},\
        {\"d\":\"1/1/2020 10:00:00 AM\",\"t\":\"Placeholder\",\"s\":\"Nobody\"},\
        {\"d\":\"11/15/2006 10:00:00 AM\",\"t\":\"Economic Outlook\",\"s\":\"Chairman Ben S. Bernanke\",\"l\":\"/newsevents/testimony/bernanke20061115a.htm\"}\
    ]";

    #[test]
    fn feed_skips_records_without_link_and_strips_bom() {
        let feed = Url::parse("https://www.federalreserve.gov/json/ne-testimony.json").unwrap();
        let found = parse_feed(FEED, &feed).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].raw_date, date(2020, 2, 11));
        assert_eq!(found[0].speaker.as_deref(), Some("Chair Jerome H. Powell"));
        assert_eq!(
            found[1].url.as_str(),
            "https://www.federalreserve.gov/newsevents/testimony/bernanke20061115a.htm"
        );
    }

    #[test]
    fn feed_with_bad_date_is_date_error() {
        let feed = Url::parse("https://www.federalreserve.gov/json/ne-testimony.json").unwrap();
        let body = r#"[{"d":"2020-02-11","t":"T","s":"S","l":"/x.htm"}]"#;
        assert!(matches!(
            parse_feed(body, &feed),
            Err(FomcError::DateFormat { .. })
        ));
    }

    #[test]
    fn layout_table() {
        assert_eq!(
            layout_for("/boarddocs/testimony/2005/20050420/default.htm"),
            TestimonyLayout::SpeakerAfterDate
        );
        assert_eq!(
            layout_for("/boarddocs/testimony/1997/19970121.htm"),
            TestimonyLayout::LinkIsDate
        );
        assert_eq!(
            layout_for("/boarddocs/hh/2004/february/testimony.htm"),
            TestimonyLayout::Standard
        );
    }

    #[test]
    fn standard_layout() {
        let body = r#"<ul><li>February 11, 2004<p><a href="/boarddocs/hh/2004/february/testimony.htm">Semiannual Monetary Policy Report</a></p><div>Chairman Alan Greenspan</div></li></ul>"#;
        let found = parse_listing(body, &listing_url(2004), 2004).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Semiannual Monetary Policy Report");
        assert_eq!(found[0].speaker.as_deref(), Some("Chairman Alan Greenspan"));
        assert_eq!(found[0].raw_date, date(2004, 2, 11));
    }

    #[test]
    fn standard_layout_skips_video_label() {
        let body = r#"<ul><li>March 2, 2004<p><a href="/boarddocs/testimony/2004/20040302/default.htm">Budget</a></p><div>Video</div><p>Watch</p><p>Chairman Alan Greenspan</p></li></ul>"#;
        let found = parse_listing(body, &listing_url(2004), 2004).unwrap();
        assert_eq!(found[0].speaker.as_deref(), Some("Chairman Alan Greenspan"));
    }

    #[test]
    fn speaker_after_date_layout() {
        let body = r#"<ul><li>April 20, 2005<span>Chairman Alan Greenspan</span><p><a href="/boarddocs/testimony/2005/20050420/default.htm">Government-sponsored enterprises</a></p></li></ul>"#;
        let found = parse_listing(body, &listing_url(2005), 2005).unwrap();
        assert_eq!(found[0].speaker.as_deref(), Some("Chairman Alan Greenspan"));
        assert_eq!(found[0].raw_date, date(2005, 4, 20));
        assert_eq!(found[0].title, "Government-sponsored enterprises");
    }

    #[test]
    fn link_is_date_layout() {
        let body = r#"<ul><li><p><a href="/boarddocs/testimony/1997/19970121.htm">January 21, 1997</a></p><em>Monetary policy outlook</em><strong>Chairman Alan Greenspan</strong></li></ul>"#;
        let found = parse_listing(body, &listing_url(1997), 1997).unwrap();
        assert_eq!(found[0].title, "Monetary policy outlook");
        assert_eq!(found[0].speaker.as_deref(), Some("Chairman Alan Greenspan"));
        assert_eq!(found[0].raw_date, date(1997, 1, 21));
    }

    #[test]
    fn missing_layout_markup_is_parse_error() {
        let body = r#"<ul><li>May 5, 2003<p><a href="/boarddocs/testimony/2003/20030505/default.htm">Orphan</a></p></li></ul>"#;
        assert!(matches!(
            parse_listing(body, &listing_url(2003), 2003),
            Err(FomcError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn feed_then_yearly_pages() {
        let server = wiremock::MockServer::start().await;
        serve(&server, FEED_PATH, FEED).await;
        serve(
            &server,
            "/newsevents/testimony/2005testimony.htm",
            r#"<ul><li>April 20, 2005<span>Chairman Alan Greenspan</span><p><a href="/boarddocs/testimony/2005/20050420/default.htm">GSEs</a></p></li></ul>"#,
        )
        .await;

        let catalog = catalog(&server);
        let first = catalog
            .discover(CollectionType::Testimony, 2005, &SilentProgress)
            .await
            .unwrap();
        let second = catalog
            .discover(CollectionType::Testimony, 2005, &SilentProgress)
            .await
            .unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first[2].link, "/boarddocs/testimony/2005/20050420/default.htm");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn recent_from_year_reads_feed_only() {
        let server = wiremock::MockServer::start().await;
        serve(&server, FEED_PATH, FEED).await;

        let found = catalog(&server)
            .discover(CollectionType::Testimony, 2015, &SilentProgress)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }
}
