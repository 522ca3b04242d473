//! Speeches by Board members, from yearly listing pages.
//!
//! The speaker's name sits next to the link, but where exactly depends on the
//! era of the page. [`speaker_position`] holds the known layouts.

use scraper::{Html, Selector};
use tracing::info;
use url::Url;

use fomc_shared::{Result, date_from_link};

use super::{Catalog, Found, resolve, year_pattern};
use crate::node::Node;
use crate::progress::ProgressReporter;

/// First year with a speech listing page.
const FIRST_LISTING_YEAR: i32 = 1996;

/// Listing pages switched URL scheme in this year.
const NEW_LISTING_YEAR: i32 = 2011;

/// In this year the speaker is printed before the link.
const SPEAKER_BEFORE_LINK_YEAR: i32 = 1997;

/// Pages from [`SPEAKER_BEFORE_LINK_YEAR`] that use the usual layout anyway.
const SPEAKER_AFTER_LINK: &[&str] = &["/boarddocs/speeches/1997/19971215.htm"];

/// Pages from other years with the speaker before the link.
const SPEAKER_BEFORE_LINK: &[&str] = &[
    "/boarddocs/speeches/2005/20051128/default.htm",
    "/boarddocs/speeches/2005/20051129/default.htm",
];

/// Media labels that can sit between a link and its speaker.
const MEDIA_LABELS: &[&str] = &["Watch Live", "Video"];

/// Where the speaker name sits relative to a speech link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpeakerPosition {
    /// `parent → previous sibling ×2`
    BeforeLink,
    /// `parent → next sibling → next element`, skipping a media label.
    AfterLink,
}

pub(crate) fn speaker_position(year: i32, href: &str) -> SpeakerPosition {
    if SPEAKER_BEFORE_LINK.contains(&href) {
        return SpeakerPosition::BeforeLink;
    }
    if year == SPEAKER_BEFORE_LINK_YEAR && !SPEAKER_AFTER_LINK.contains(&href) {
        return SpeakerPosition::BeforeLink;
    }
    SpeakerPosition::AfterLink
}

fn listing_path(year: i32) -> String {
    if year < NEW_LISTING_YEAR {
        format!("/newsevents/speech/{year}speech.htm")
    } else {
        format!("/newsevents/speech/{year}-speeches.htm")
    }
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
            "speech listings start in {FIRST_LISTING_YEAR}"
        );
        FIRST_LISTING_YEAR
    } else {
        from_year
    };

    let mut found = Vec::new();
    for year in from_year..=catalog.through_year() {
        let page = catalog.site_url(&listing_path(year))?;
        let body = catalog.get(&page).await?;
        let entries = parse_listing(&body, &page, year)?;
        info!(year, found = entries.len(), "speech listing scanned");
        progress.year_scanned(year, entries.len());
        found.extend(entries);
    }

    Ok(found)
}

/// Parse one yearly listing page into speech entries.
pub(crate) fn parse_listing(body: &str, page: &Url, year: i32) -> Result<Vec<Found>> {
    let link_re = year_pattern(&format!(
        r"^/?newsevents/speech/.*{year}\d\d\d\d.*.htm|^/boarddocs/speeches/{year}/|^{year}\d\d\d\d.*.htm"
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

        let link = Node::from(anchor);
        let speaker = match speaker_position(year, href) {
            SpeakerPosition::BeforeLink => speaker_before(link)?,
            SpeakerPosition::AfterLink => speaker_after(link)?,
        };

        found.push(Found {
            link: href.to_string(),
            url: resolve(page, href)?,
            raw_date: date_from_link(href)?,
            title: link.text().trim().to_string(),
            speaker: Some(speaker),
        });
    }
    Ok(found)
}

fn speaker_before(link: Node<'_>) -> Result<String> {
    Ok(link.parent()?.prev_sibling()?.prev_sibling()?.clean_text())
}

fn speaker_after(link: Node<'_>) -> Result<String> {
    let parent = link.parent()?;
    let speaker = parent.next_sibling()?.next_element()?.clean_text();
    if !MEDIA_LABELS.contains(&speaker.as_str()) {
        return Ok(speaker);
    }
    Ok(parent
        .next_sibling()?
        .next_sibling()?
        .next_sibling()?
        .next_element()?
        .clean_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::test_support::*;
    use crate::progress::SilentProgress;
    use chrono::NaiveDate;
    use fomc_shared::{CollectionType, FomcError};

    fn page_url(year: i32) -> Url {
        Url::parse("https://www.federalreserve.gov")
            .unwrap()
            .join(&listing_path(year))
            .unwrap()
    }

    #[test]
    fn listing_url_switches_in_2011() {
        assert_eq!(listing_path(2010), "/newsevents/speech/2010speech.htm");
        assert_eq!(listing_path(2011), "/newsevents/speech/2011-speeches.htm");
    }

    #[test]
    fn speaker_position_table() {
        use SpeakerPosition::*;
        assert_eq!(speaker_position(1997, "/boarddocs/speeches/1997/19970107.htm"), BeforeLink);
        assert_eq!(speaker_position(1997, "/boarddocs/speeches/1997/19971215.htm"), AfterLink);
        assert_eq!(
            speaker_position(2005, "/boarddocs/speeches/2005/20051128/default.htm"),
            BeforeLink
        );
        assert_eq!(
            speaker_position(2005, "/boarddocs/speeches/2005/20051213/default.htm"),
            AfterLink
        );
        assert_eq!(speaker_position(2019, "/newsevents/speech/powell20190108a.htm"), AfterLink);
    }

    #[test]
    fn speaker_follows_link() {
        let body = r#"<ul><li><div class="title"><a href="/newsevents/speech/powell20190108a.htm">The Economic Outlook</a></div>
<div class="speaker">Chairman Jerome H. Powell</div></li></ul>"#;
        let found = parse_listing(body, &page_url(2019), 2019).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "The Economic Outlook");
        assert_eq!(found[0].speaker.as_deref(), Some("Chairman Jerome H. Powell"));
        assert_eq!(found[0].raw_date, NaiveDate::from_ymd_opt(2019, 1, 8).unwrap());
    }

    #[test]
    fn media_label_is_skipped() {
        let body = r#"<ul><li><div class="title"><a href="/newsevents/speech/yellen20150602a.htm">Remarks</a></div>
<div class="video">Video</div>
<div class="speaker">Chair Janet L. Yellen</div></li></ul>"#;
        let found = parse_listing(body, &page_url(2015), 2015).unwrap();
        assert_eq!(found[0].speaker.as_deref(), Some("Chair Janet L. Yellen"));
    }

    #[test]
    fn speaker_before_link_in_1997() {
        let body = r#"<html><body><p class="speaker">Chairman Alan Greenspan</p>
<p><a href="/boarddocs/speeches/1997/19970107.htm">Remarks at the Economic Club</a></p>
</body></html>"#;
        let found = parse_listing(body, &page_url(1997), 1997).unwrap();
        assert_eq!(found[0].speaker.as_deref(), Some("Chairman Alan Greenspan"));
    }

    #[test]
    fn late_2005_pages_put_speaker_before_link() {
        let body = r#"<html><body>
<p>Chairman Alan Greenspan</p>
<p><a href="/boarddocs/speeches/2005/20051128/default.htm">Energy</a></p>
<div><a href="/boarddocs/speeches/2005/20051213/default.htm">Monetary policy</a></div>
<div>Governor Ben S. Bernanke</div>
</body></html>"#;
        let found = parse_listing(body, &page_url(2005), 2005).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].speaker.as_deref(), Some("Chairman Alan Greenspan"));
        assert_eq!(found[0].raw_date, NaiveDate::from_ymd_opt(2005, 11, 28).unwrap());
        assert_eq!(found[1].speaker.as_deref(), Some("Governor Ben S. Bernanke"));
    }

    #[test]
    fn december_1997_page_puts_speaker_after_link() {
        let body = r#"<ul><li><div><a href="/boarddocs/speeches/1997/19971215.htm">Banking</a></div>
<div>Governor Laurence H. Meyer</div></li></ul>"#;
        let found = parse_listing(body, &page_url(1997), 1997).unwrap();
        assert_eq!(found[0].speaker.as_deref(), Some("Governor Laurence H. Meyer"));
    }

    #[test]
    fn watch_live_anchors_are_skipped() {
        let body = r#"<ul><li><div><a href="/newsevents/speech/powell20190108a.htm"><span class="watchLive">Watch Live</span></a></div>
<div>Chairman Jerome H. Powell</div></li></ul>"#;
        assert!(parse_listing(body, &page_url(2019), 2019).unwrap().is_empty());
    }

    #[test]
    fn relative_links_match_and_resolve() {
        let body = r#"<ul><li><div><a href="20000105.htm">Remarks</a></div>
<div>Governor Meyer</div></li></ul>"#;
        let found = parse_listing(body, &page_url(2000), 2000).unwrap();
        assert_eq!(found[0].link, "20000105.htm");
        assert_eq!(
            found[0].url.as_str(),
            "https://www.federalreserve.gov/newsevents/speech/20000105.htm"
        );
    }

    #[test]
    fn missing_speaker_markup_is_parse_error() {
        let body = r#"<div><a href="/newsevents/speech/powell20190108a.htm">Alone</a></div>"#;
        let err = parse_listing(body, &page_url(2019), 2019).unwrap_err();
        assert!(matches!(err, FomcError::Parse { .. }));
    }

    #[tokio::test]
    async fn scans_from_floor_through_last_year() {
        let server = wiremock::MockServer::start().await;
        for year in 1996..2020 {
            serve(&server, &listing_path(year), "<html><body></body></html>").await;
        }
        serve(
            &server,
            &listing_path(2020),
            r#"<ul><li><div><a href="/newsevents/speech/powell20200117a.htm">Remarks</a></div>
<div>Chair Jerome H. Powell</div></li></ul>"#,
        )
        .await;

        let found = catalog(&server)
            .discover(CollectionType::Speech, 1980, &SilentProgress)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 25);
        assert_eq!(requests[0].url.path(), "/newsevents/speech/1996speech.htm");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].speaker.as_deref(), Some("Chair Jerome H. Powell"));
    }

    #[tokio::test]
    async fn repeated_discovery_is_identical() {
        let server = wiremock::MockServer::start().await;
        serve(
            &server,
            &listing_path(2020),
            r#"<ul><li><div><a href="/newsevents/speech/powell20200117a.htm">Remarks</a></div>
<div>Chair Jerome H. Powell</div></li>
<li><div><a href="/newsevents/speech/brainard20200205a.htm">Digital currencies</a></div>
<div>Governor Lael Brainard</div></li></ul>"#,
        )
        .await;

        let catalog = catalog(&server);
        let first = catalog
            .discover(CollectionType::Speech, 2020, &SilentProgress)
            .await
            .unwrap();
        let second = catalog
            .discover(CollectionType::Speech, 2020, &SilentProgress)
            .await
            .unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }
}
