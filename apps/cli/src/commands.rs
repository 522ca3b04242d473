//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use fomc_core::{CollectionPipeline, ProgressReporter, SilentProgress, write_json, write_texts};
use fomc_shared::{AppConfig, CollectionType, Dataset, PipelineConfig, init_config, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Earliest `--from-year` accepted.
const MIN_FROM_YEAR: i32 = 1980;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// fomc-corpus: download FOMC communications as a text corpus.
#[derive(Parser)]
#[command(
    name = "fomc-corpus",
    version,
    about = "Download FOMC statements, minutes, transcripts, speeches and testimony as text.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Download one collection, or all of them.
    Fetch {
        /// statement, minutes, meeting_script, presconf_script, speech,
        /// testimony, or all.
        #[arg(value_parser = parse_target)]
        collection: FetchTarget,

        /// First year to download (defaults to the config value).
        #[arg(long, value_parser = parse_from_year)]
        from_year: Option<i32>,

        /// Maximum concurrent downloads.
        #[arg(long)]
        max_threads: Option<usize>,

        /// Output directory (defaults to the config value).
        #[arg(long)]
        base_dir: Option<PathBuf>,

        /// Skip writing one text file per document.
        #[arg(long)]
        no_texts: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

/// What `fetch` downloads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FetchTarget {
    One(CollectionType),
    All,
}

impl FetchTarget {
    fn collections(&self) -> Vec<CollectionType> {
        match self {
            Self::One(c) => vec![*c],
            Self::All => CollectionType::ALL.to_vec(),
        }
    }
}

fn parse_target(s: &str) -> std::result::Result<FetchTarget, String> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(FetchTarget::All);
    }
    s.parse::<CollectionType>()
        .map(FetchTarget::One)
        .map_err(|e| e.to_string())
}

fn parse_from_year(s: &str) -> std::result::Result<i32, String> {
    let year: i32 = s.parse().map_err(|_| format!("'{s}' is not a year"))?;
    check_from_year(year)
}

fn check_from_year(year: i32) -> std::result::Result<i32, String> {
    let current = Utc::now().year();
    if (MIN_FROM_YEAR..=current).contains(&year) {
        Ok(year)
    } else {
        Err(format!("from-year must be between {MIN_FROM_YEAR} and {current}"))
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "fomc=info",
        1 => "fomc=debug",
        _ => "fomc=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Fetch {
            collection,
            from_year,
            max_threads,
            base_dir,
            no_texts,
        } => {
            let options = FetchOptions {
                from_year,
                max_threads,
                base_dir,
                write_texts: !no_texts,
            };
            cmd_fetch(&collection, options).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Flags that override the config file for one `fetch`.
struct FetchOptions {
    from_year: Option<i32>,
    max_threads: Option<usize>,
    base_dir: Option<PathBuf>,
    write_texts: bool,
}

/// Merge CLI overrides into the loaded config.
fn apply_overrides(mut config: AppConfig, options: &FetchOptions) -> AppConfig {
    if let Some(from_year) = options.from_year {
        config.defaults.from_year = from_year;
    }
    if let Some(max_threads) = options.max_threads {
        config.defaults.max_threads = max_threads;
    }
    if let Some(dir) = &options.base_dir {
        config.defaults.base_dir = dir.to_string_lossy().into_owned();
    }
    config
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_fetch(target: &FetchTarget, options: FetchOptions) -> Result<()> {
    let config = apply_overrides(load_config()?, &options);
    let from_year = check_from_year(config.defaults.from_year).map_err(|e| eyre!(e))?;
    let pipeline_config = PipelineConfig::from_app_config(&config)?;

    for collection in target.collections() {
        info!(%collection, from_year, "fetching collection");

        let progress: Arc<dyn ProgressReporter> = if pipeline_config.verbose {
            Arc::new(CliProgress::new())
        } else {
            Arc::new(SilentProgress)
        };

        let pipeline = CollectionPipeline::new(collection, pipeline_config.clone())?;
        let dataset = pipeline.get_contents(from_year, progress).await?;
        log_summary(collection, &dataset);

        let json_path = write_json(&dataset, &pipeline_config.base_dir, collection)?;
        println!("  {collection}: {} records -> {}", dataset.len(), json_path.display());

        if options.write_texts {
            let files = write_texts(&dataset, &pipeline_config.base_dir, collection)?;
            println!("  {collection}: {} text files", files.len());
        }
    }

    Ok(())
}

/// Log the dataset's shape and its first and last records.
fn log_summary(collection: CollectionType, dataset: &Dataset) {
    info!(%collection, records = dataset.len(), columns = 4, "dataset shape");
    let records = dataset.records();
    for record in records.iter().take(5) {
        info!(date = %record.date, speaker = %record.speaker, title = %record.title, "head");
    }
    for record in records.iter().skip(records.len().saturating_sub(5)) {
        info!(date = %record.date, speaker = %record.speaker, title = %record.title, "tail");
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter: a spinner while listings are scanned, then a bar
/// over the documents being fetched.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

impl ProgressReporter for CliProgress {
    fn phase(&self, collection: CollectionType, phase: &str) {
        self.bar.set_message(format!("{collection}: {phase}"));
    }

    fn year_scanned(&self, year: i32, found: usize) {
        self.bar.set_message(format!("scanned {year}: {found} links"));
    }

    fn links_found(&self, total: usize) {
        self.bar.set_style(bar_style());
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message("fetching");
    }

    fn document_fetched(&self, current: usize, _total: usize) {
        self.bar.set_position(current as u64);
    }

    fn done(&self, _records: usize) {
        self.bar.finish_and_clear();
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
