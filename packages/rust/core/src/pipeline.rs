//! End-to-end collection pipeline: discover → fetch → extract → normalize.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use fomc_crawler::{Catalog, ProgressReporter, build_client, fetch_all, fetch_bytes, fetch_text};
use fomc_extract::{FootnotePolicy, HtmlOptions, html, join_sections, pdf};
use fomc_shared::{
    CollectionType, Dataset, DocumentDescriptor, DocumentFormat, DocumentRecord, FomcError,
    PipelineConfig, Result,
};

use crate::{chairs, corrections};

/// Directory under `base_dir` that keeps downloaded transcript PDFs.
pub const PDF_DIR: &str = "script_pdf";

/// Builds the dataset for one collection.
pub struct CollectionPipeline {
    collection: CollectionType,
    config: Arc<PipelineConfig>,
    client: Client,
    catalog: Catalog,
}

impl CollectionPipeline {
    pub fn new(collection: CollectionType, config: PipelineConfig) -> Result<Self> {
        let client = build_client(&config)?;
        let config = Arc::new(config);
        let catalog = Catalog::new(client.clone(), Arc::clone(&config));
        Ok(Self {
            collection,
            config,
            client,
            catalog,
        })
    }

    /// Override the last year scanned by open-ended collections.
    pub fn with_through_year(mut self, year: i32) -> Self {
        self.catalog = self.catalog.with_through_year(year);
        self
    }

    pub fn collection(&self) -> CollectionType {
        self.collection
    }

    /// Discover, fetch and extract every document from `from_year` on.
    ///
    /// Speakers of chair-led collections are resolved from the URL date
    /// before that date is corrected. Records with no text are dropped and
    /// the rest are sorted by date. Any failure aborts the whole collection.
    #[instrument(skip_all, fields(collection = %self.collection, from_year))]
    pub async fn get_contents(
        &self,
        from_year: i32,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<Dataset> {
        let start = Instant::now();

        let descriptors = self
            .catalog
            .discover(self.collection, from_year, progress.as_ref())
            .await?;

        progress.phase(self.collection, "fetching");
        let context = Arc::new(FetchContext {
            collection: self.collection,
            client: self.client.clone(),
            config: Arc::clone(&self.config),
            progress: Arc::clone(&progress),
            fetched: AtomicUsize::new(0),
            total: descriptors.len(),
        });

        let fetched = fetch_all(descriptors, self.config.max_threads, move |_, descriptor| {
            let context = Arc::clone(&context);
            async move {
                let text = context.fetch_document(&descriptor).await?;
                Ok((descriptor, text))
            }
        })
        .await?;

        let dataset = Dataset::from_records(self.to_records(fetched));

        info!(
            records = dataset.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "collection complete"
        );
        progress.done(dataset.len());
        Ok(dataset)
    }

    fn to_records(&self, fetched: Vec<(DocumentDescriptor, String)>) -> Vec<DocumentRecord> {
        fetched
            .into_iter()
            .filter_map(|(descriptor, text)| {
                if text.is_empty() {
                    debug!(index = descriptor.index, link = %descriptor.link, "no text, dropped");
                    return None;
                }
                let speaker = if self.collection.derives_speaker() {
                    chairs::resolve(descriptor.raw_date).to_string()
                } else {
                    descriptor.speaker.unwrap_or_default()
                };
                Some(DocumentRecord {
                    date: corrections::correct(self.collection, descriptor.raw_date),
                    text,
                    speaker,
                    title: descriptor.title,
                })
            })
            .collect()
    }
}

/// Shared, read-only state for the fetch tasks of one collection.
struct FetchContext {
    collection: CollectionType,
    client: Client,
    config: Arc<PipelineConfig>,
    progress: Arc<dyn ProgressReporter>,
    fetched: AtomicUsize,
    total: usize,
}

impl FetchContext {
    async fn fetch_document(&self, descriptor: &DocumentDescriptor) -> Result<String> {
        let url = Url::parse(&descriptor.url)
            .map_err(|e| FomcError::parse(format!("bad document URL {}: {e}", descriptor.url)))?;

        let sections = match self.collection.format() {
            DocumentFormat::Html => {
                let body = fetch_text(&self.client, &url).await?;
                html::extract_sections(&body, &html_options(self.collection))
            }
            DocumentFormat::Pdf => {
                let bytes = fetch_bytes(&self.client, &url).await?;
                let path = pdf_path(&self.config, self.collection, descriptor);
                let staged = staging_path(&path, descriptor.index);
                save_pdf(&staged, &bytes).await?;

                let source = staged.clone();
                let extracted = tokio::task::spawn_blocking(move || pdf::extract_sections(&source))
                    .await
                    .map_err(|e| FomcError::Task(format!("pdf extraction did not complete: {e}")))?;
                publish_pdf(&staged, &path).await?;
                extracted?
            }
        };

        let current = self.fetched.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            index = descriptor.index,
            %url,
            sections = sections.len(),
            "document extracted"
        );
        self.progress.document_fetched(current, self.total);

        Ok(join_sections(&sections))
    }
}

fn html_options(collection: CollectionType) -> HtmlOptions {
    let footnotes = match collection {
        CollectionType::Speech => FootnotePolicy::ContainingElement,
        _ => FootnotePolicy::Anchor,
    };
    HtmlOptions { footnotes }
}

/// `{base_dir}/script_pdf/FOMC_{MeetingScript|PresConfScript}_{yyyy-mm-dd}.pdf`
pub fn pdf_path(
    config: &PipelineConfig,
    collection: CollectionType,
    descriptor: &DocumentDescriptor,
) -> PathBuf {
    let label = match collection {
        CollectionType::MeetingScript => "MeetingScript",
        CollectionType::PresConfScript => "PresConfScript",
        other => other.as_str(),
    };
    config.base_dir.join(PDF_DIR).join(format!(
        "FOMC_{label}_{}.pdf",
        descriptor.raw_date.format("%Y-%m-%d")
    ))
}

/// File a single task writes and reads before the PDF is moved to its final
/// path. Two documents of one collection can share a date, and so a final
/// path; each reads only its own download.
fn staging_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(format!(".{index}.part"));
    path.with_file_name(name)
}

/// Move a staged PDF to its final path, replacing any earlier file.
async fn publish_pdf(staged: &Path, path: &Path) -> Result<()> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "replacing pdf with the same date");
    }
    tokio::fs::rename(staged, path)
        .await
        .map_err(|e| FomcError::io(path, e))
}

async fn save_pdf(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FomcError::io(parent, e))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| FomcError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fomc_crawler::SilentProgress;
    use fomc_shared::{AppConfig, SECTION_DELIMITER};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8"),
            )
            .mount(server)
            .await;
    }

    fn config(server: &MockServer, base_dir: PathBuf) -> PipelineConfig {
        let mut app = AppConfig::default();
        app.site.base_url = server.uri();
        app.defaults.base_dir = base_dir.to_string_lossy().into_owned();
        app.defaults.max_threads = 2;
        PipelineConfig::from_app_config(&app).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fomc-core-{name}-{}", std::process::id()))
    }

    #[tokio::test]
    async fn statements_are_corrected_sorted_and_attributed() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/monetarypolicy/fomccalendars.htm",
            r#"<html><body>
<a href="/newsevents/pressreleases/monetary20191030a.htm">Statement</a>
<a href="/newsevents/pressreleases/monetary20191011a.htm">Statement</a>
<a href="/newsevents/pressreleases/monetary20190918a.htm">Statement</a>
</body></html>"#,
        )
        .await;
        serve(
            &server,
            "/newsevents/pressreleases/monetary20191030a.htm",
            "<P>October cut.<P>Second paragraph.",
        )
        .await;
        serve(
            &server,
            "/newsevents/pressreleases/monetary20191011a.htm",
            "<p>Reserve management.</p>",
        )
        .await;
        serve(
            &server,
            "/newsevents/pressreleases/monetary20190918a.htm",
            "<div>No paragraphs here.</div>",
        )
        .await;

        let pipeline = CollectionPipeline::new(
            CollectionType::Statement,
            config(&server, scratch_dir("statements")),
        )
        .unwrap();
        let dataset = pipeline
            .get_contents(2019, Arc::new(SilentProgress))
            .await
            .unwrap();

        let records = dataset.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, date(2019, 10, 4));
        assert_eq!(records[0].text, "Reserve management.");
        assert_eq!(records[1].date, date(2019, 10, 30));
        assert_eq!(
            records[1].text,
            format!("October cut.{SECTION_DELIMITER}Second paragraph.")
        );
        assert!(records.iter().all(|r| r.speaker == "Jerome Powell"));
        assert!(records.iter().all(|r| r.title == "FOMC Statement"));
    }

    #[tokio::test]
    async fn speech_keeps_scraped_speaker_and_strips_footnote_wrapper() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/newsevents/speech/2020-speeches.htm",
            r#"<ul><li><div><a href="/newsevents/speech/powell20200117a.htm">Opening Remarks</a></div>
<div>Chair Jerome H. Powell</div></li></ul>"#,
        )
        .await;
        serve(
            &server,
            "/newsevents/speech/powell20200117a.htm",
            r##"<p>Thank you.<sup><a name="fn1" href="#f1">1</a></sup> Welcome.</p>"##,
        )
        .await;

        let pipeline = CollectionPipeline::new(
            CollectionType::Speech,
            config(&server, scratch_dir("speech")),
        )
        .unwrap()
        .with_through_year(2020);
        let dataset = pipeline
            .get_contents(2020, Arc::new(SilentProgress))
            .await
            .unwrap();

        assert_eq!(dataset.len(), 1);
        let record = &dataset.records()[0];
        assert_eq!(record.speaker, "Chair Jerome H. Powell");
        assert_eq!(record.title, "Opening Remarks");
        assert_eq!(record.text, "Thank you. Welcome.");
        assert_eq!(record.date, date(2020, 1, 17));
    }

    #[tokio::test]
    async fn document_failure_fails_collection() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/monetarypolicy/fomccalendars.htm",
            r#"<a href="/monetarypolicy/fomcminutes20200129.htm">HTML</a>
<a href="/monetarypolicy/fomcminutes20200315.htm">HTML</a>"#,
        )
        .await;
        serve(
            &server,
            "/monetarypolicy/fomcminutes20200129.htm",
            "<p>Minutes text.</p>",
        )
        .await;

        let pipeline = CollectionPipeline::new(
            CollectionType::Minutes,
            config(&server, scratch_dir("minutes")),
        )
        .unwrap();
        let err = pipeline
            .get_contents(2020, Arc::new(SilentProgress))
            .await
            .unwrap_err();
        assert!(matches!(err, FomcError::Network(_)));
    }

    #[test]
    fn pdf_paths_use_padded_dates() {
        let config = PipelineConfig::from_app_config(&AppConfig::default()).unwrap();
        let descriptor = DocumentDescriptor {
            collection: CollectionType::PresConfScript,
            link: "/mediacenter/files/FOMCpresconf20190619.pdf".into(),
            url: "https://www.federalreserve.gov/mediacenter/files/FOMCpresconf20190619.pdf"
                .into(),
            raw_date: date(2019, 6, 19),
            title: "FOMC Press Conference Transcript".into(),
            speaker: None,
            index: 0,
        };
        let path = pdf_path(&config, CollectionType::PresConfScript, &descriptor);
        assert!(path.ends_with("script_pdf/FOMC_PresConfScript_2019-06-19.pdf"));
    }

    #[test]
    fn same_date_documents_stage_separately() {
        let path = PathBuf::from("/data/script_pdf/FOMC_MeetingScript_2008-03-10.pdf");
        let first = staging_path(&path, 3);
        let second = staging_path(&path, 4);
        assert_ne!(first, second);
        assert_eq!(first.parent(), path.parent());
        assert!(
            first
                .to_string_lossy()
                .ends_with("FOMC_MeetingScript_2008-03-10.pdf.3.part")
        );
    }

    #[tokio::test]
    async fn staged_pdfs_replace_final_file() {
        let dir = scratch_dir("publish").join(PDF_DIR);
        let path = dir.join("FOMC_MeetingScript_2008-03-10.pdf");

        for (index, bytes) in [(0, b"first".as_slice()), (1, b"second".as_slice())] {
            let staged = staging_path(&path, index);
            save_pdf(&staged, bytes).await.unwrap();
            assert_eq!(tokio::fs::read(&staged).await.unwrap(), bytes);
            publish_pdf(&staged, &path).await.unwrap();
            assert!(!staged.exists());
        }

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"second");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn footnote_policy_by_collection() {
        assert_eq!(
            html_options(CollectionType::Speech).footnotes,
            FootnotePolicy::ContainingElement
        );
        assert_eq!(
            html_options(CollectionType::Testimony).footnotes,
            FootnotePolicy::Anchor
        );
    }
}
