use clap::Parser;
use kobo2notion::{
    CommandLineInput, GeminiSummarizer, GoogleBooksCovers, KoboReader, NotionHttpClient,
    SyncConfig, SyncEngine, SyncReport,
};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let console_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("kobo2notion.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} | {h({l:<8})} | {m}{n}",
        )))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} | {l:<8} | {m} ({f}:{L}){n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(console_level)))
                .build("stdout", Box::new(stdout_appender)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .logger(log4rs::config::Logger::builder().build("reqwest", LevelFilter::Warn))
        .logger(log4rs::config::Logger::builder().build("hyper", LevelFilter::Warn))
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Wires the configured components together and runs one sync.
async fn execute_sync(config: &SyncConfig) -> Result<SyncReport, kobo2notion::AppError> {
    let reader = KoboReader::open(&config.sqlite_path)?;
    log::info!("Reading bookmarks from {}", reader.source().display());

    let notion = Arc::new(NotionHttpClient::new(&config.notion_api_key)?);
    let mut engine =
        SyncEngine::new(notion, config.database_id.clone()).with_retry(config.retry);

    match &config.summarizer {
        Some(summarizer) => {
            engine = engine.with_summarizer(Arc::new(GeminiSummarizer::new(summarizer)?));
        }
        None => log::info!("Summarizing disabled"),
    }

    if config.fetch_covers {
        engine = engine.with_covers(Arc::new(GoogleBooksCovers::new()?));
    }

    engine.sync_from(&reader).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = SyncConfig::resolve(cli).map_err(|e| {
        log::error!("{}", e);
        e
    })?;

    let report = execute_sync(&config).await.map_err(|e| {
        log::error!("{}", e);
        e
    })?;

    println!("{}", report);
    for failure in &report.failures {
        eprintln!(
            "  failed: {} ({}): {}",
            failure.bookmark_id, failure.book_title, failure.reason
        );
    }

    Ok(())
}
