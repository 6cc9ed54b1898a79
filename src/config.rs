use crate::constants::{
    DEFAULT_GEMINI_MODEL, DEFAULT_MAX_ATTEMPTS, RETRY_INITIAL_DELAY, RETRY_MAX_DELAY,
};
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::types::{ApiKey, DatabaseId, GeminiApiKey, SummaryLanguage, ValidationError};
use clap::Parser;
use std::path::PathBuf;

/// Parsed command-line input. Everything else comes from the environment.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Path to KoboReader.sqlite (defaults to $SQLITE_SOURCE)
    pub sqlite_path: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Settings for the optional summarizer.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub api_key: GeminiApiKey,
    pub model: String,
    pub language: SummaryLanguage,
}

/// Resolved sync configuration, validated once at startup and passed
/// read-only into every component.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub sqlite_path: PathBuf,
    pub notion_api_key: ApiKey,
    pub database_id: DatabaseId,
    /// `None` when `SUMMARIZE_BOOKMARKS` is off.
    pub summarizer: Option<SummarizerConfig>,
    pub fetch_covers: bool,
    pub retry: RetryPolicy,
    pub verbose: bool,
}

impl SyncConfig {
    /// Resolves a complete configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    /// Resolves a configuration, reading settings through `lookup`.
    pub fn resolve_with<F>(cli: CommandLineInput, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let setting = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let sqlite_path = cli
            .sqlite_path
            .or_else(|| setting("SQLITE_SOURCE").map(PathBuf::from))
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "Kobo database path not given (pass PATH or set SQLITE_SOURCE)".to_string(),
                )
            })?;

        let api_key = setting("NOTION_API_KEY").ok_or_else(|| {
            AppError::MissingConfiguration(
                "NOTION_API_KEY environment variable not set".to_string(),
            )
        })?;
        let notion_api_key = ApiKey::new(api_key)?;

        let database = setting("NOTION_DATABASE_ID")
            .or_else(|| setting("NOTION_DB_ID"))
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "NOTION_DATABASE_ID environment variable not set".to_string(),
                )
            })?;
        let database_id = DatabaseId::parse(&database)?;

        let summarize = parse_flag("SUMMARIZE_BOOKMARKS", setting("SUMMARIZE_BOOKMARKS"))?;
        let summarizer = if summarize {
            let api_key = setting("GEMINI_API_KEY").ok_or_else(|| {
                AppError::MissingConfiguration(
                    "GEMINI_API_KEY must be set when SUMMARIZE_BOOKMARKS is on".to_string(),
                )
            })?;
            let language = match setting("SUMMARIZE_LANGUAGE") {
                Some(language) => language.parse()?,
                None => SummaryLanguage::default(),
            };
            Some(SummarizerConfig {
                api_key: GeminiApiKey::new(api_key)?,
                model: setting("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                language,
            })
        } else {
            None
        };

        let fetch_covers = parse_flag("FETCH_BOOK_COVERS", setting("FETCH_BOOK_COVERS"))?;

        let max_attempts = match setting("NOTION_MAX_RETRIES") {
            Some(value) => value.parse::<u32>().ok().filter(|n| *n >= 1).ok_or_else(|| {
                ValidationError::InvalidSetting {
                    key: "NOTION_MAX_RETRIES",
                    value,
                    reason: "expected a whole number of attempts, at least 1".to_string(),
                }
            })?,
            None => DEFAULT_MAX_ATTEMPTS,
        };

        Ok(SyncConfig {
            sqlite_path,
            notion_api_key,
            database_id,
            summarizer,
            fetch_covers,
            retry: RetryPolicy {
                max_attempts,
                initial_delay: RETRY_INITIAL_DELAY,
                max_delay: RETRY_MAX_DELAY,
            },
            verbose: cli.verbose,
        })
    }

    pub fn summarize(&self) -> bool {
        self.summarizer.is_some()
    }
}

/// Parses a boolean setting; absent means off.
fn parse_flag(key: &'static str, value: Option<String>) -> Result<bool, ValidationError> {
    let Some(value) = value else {
        return Ok(false);
    };

    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ValidationError::InvalidSetting {
            key,
            value,
            reason: "expected true or false".to_string(),
        }),
    }
}
