//! Runtime configuration, read from `QUIZ_*` environment variables.
//!
//! Every setting has a default, so an empty environment yields a working
//! configuration that reads test sets from the current directory.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use quiz_core::gate::DEFAULT_FREE_COUNT;
use quiz_core::session::DEFAULT_PASS_THRESHOLD;
use quiz_core::time::DEFAULT_TIME_LIMIT_SECS;

use crate::error::ConfigValueError;

pub const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
pub const DEFAULT_TEST_SETS_DIR: &str = "test_sets";
pub const DEFAULT_QUESTIONS_DIR: &str = "question_json";

/// What a batch load does when one referenced question cannot be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnMissingQuestion {
    /// Fail the whole test load with the first error.
    #[default]
    Abort,
    /// Log and continue with the remaining entries.
    Skip,
}

impl FromStr for OnMissingQuestion {
    type Err = ConfigValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            _ => Err(ConfigValueError {
                key: "on_missing",
                raw: s.to_string(),
            }),
        }
    }
}

/// Whether saved progress is discarded or resumed when a test is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProgressPolicy {
    #[default]
    StartFresh,
    Resume,
}

/// Where test sets and questions are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A static HTTP server with directory listings.
    Http(String),
    /// A local directory laid out the same way.
    Directory(PathBuf),
}

impl Default for CatalogSource {
    fn default() -> Self {
        Self::Directory(PathBuf::from("."))
    }
}

/// Folder names under the catalog root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    pub test_sets_dir: String,
    pub questions_dir: String,
}

impl Default for CatalogPaths {
    fn default() -> Self {
        Self {
            test_sets_dir: DEFAULT_TEST_SETS_DIR.into(),
            questions_dir: DEFAULT_QUESTIONS_DIR.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub source: CatalogSource,
    pub paths: CatalogPaths,
    pub db_url: String,
    pub free_count: usize,
    pub pass_threshold: usize,
    pub time_limit_secs: u32,
    pub on_missing: OnMissingQuestion,
    pub progress: ProgressPolicy,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::default(),
            paths: CatalogPaths::default(),
            db_url: DEFAULT_DB_URL.into(),
            free_count: DEFAULT_FREE_COUNT,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            on_missing: OnMissingQuestion::default(),
            progress: ProgressPolicy::default(),
        }
    }
}

impl QuizConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Unparseable values are logged and replaced by their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = match (value("QUIZ_BASE_URL"), value("QUIZ_ROOT_DIR")) {
            (Some(url), _) => CatalogSource::Http(url.trim().to_string()),
            (None, Some(dir)) => CatalogSource::Directory(PathBuf::from(dir)),
            (None, None) => defaults.source,
        };
        let paths = CatalogPaths {
            test_sets_dir: value("QUIZ_TEST_SETS_DIR").unwrap_or(defaults.paths.test_sets_dir),
            questions_dir: value("QUIZ_QUESTIONS_DIR").unwrap_or(defaults.paths.questions_dir),
        };
        let progress = match value("QUIZ_RESUME_PROGRESS").as_deref().map(str::trim) {
            Some("1" | "true" | "yes") => ProgressPolicy::Resume,
            _ => defaults.progress,
        };

        Self {
            source,
            paths,
            db_url: value("QUIZ_DB_URL").unwrap_or(defaults.db_url),
            free_count: parse_or("QUIZ_FREE_TESTS", value("QUIZ_FREE_TESTS"), defaults.free_count),
            pass_threshold: parse_or(
                "QUIZ_PASS_THRESHOLD",
                value("QUIZ_PASS_THRESHOLD"),
                defaults.pass_threshold,
            ),
            time_limit_secs: parse_or(
                "QUIZ_TIME_LIMIT_SECS",
                value("QUIZ_TIME_LIMIT_SECS"),
                defaults.time_limit_secs,
            ),
            on_missing: parse_or("QUIZ_ON_MISSING", value("QUIZ_ON_MISSING"), defaults.on_missing),
            progress,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, "ignoring invalid configuration value");
        default
    })
}
