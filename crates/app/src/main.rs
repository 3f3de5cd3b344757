use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::gate::AccessGate;
use services::{
    AppServices, CatalogService, CatalogSource, Clock, EntryRequest, QuizConfig, QuizLoopService,
    SignInService,
};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidQuery { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidQuery { raw } => {
                write!(f, "--open names neither a test nor a question: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    entry: Option<EntryRequest>,
}

impl UiApp for DesktopApp {
    fn gate(&self) -> AccessGate {
        self.services.gate()
    }

    fn entry_on_launch(&self) -> Option<EntryRequest> {
        self.entry.clone()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn sign_in(&self) -> Arc<SignInService> {
        self.services.sign_in()
    }
}

struct Args {
    config: QuizConfig,
    entry: Option<EntryRequest>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--base-url <url> | --root <dir>] [--db <sqlite_url>]");
    eprintln!("                      [--test <name> | --question <ref> | --open <query>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --root .");
    eprintln!("  --db sqlite://quiz.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BASE_URL, QUIZ_ROOT_DIR, QUIZ_TEST_SETS_DIR, QUIZ_QUESTIONS_DIR, QUIZ_DB_URL");
    eprintln!("  QUIZ_FREE_TESTS, QUIZ_PASS_THRESHOLD, QUIZ_TIME_LIMIT_SECS, QUIZ_ON_MISSING");
    eprintln!("  QUIZ_RESUME_PROGRESS, QUIZ_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut config = QuizConfig::from_env();
        config.db_url = normalize_sqlite_url(config.db_url);
        let mut test = None;
        let mut question = None;
        let mut query = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base-url" => {
                    config.source = CatalogSource::Http(require_value(args, "--base-url")?);
                }
                "--root" => {
                    let value = require_value(args, "--root")?;
                    config.source = CatalogSource::Directory(PathBuf::from(value));
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    config.db_url = normalize_sqlite_url(value);
                }
                "--test" => test = Some(require_value(args, "--test")?),
                "--question" => question = Some(require_value(args, "--question")?),
                "--open" => query = Some(require_value(args, "--open")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let entry = match query {
            Some(raw) => Some(
                EntryRequest::from_query(&raw).map_err(|_| ArgsError::InvalidQuery { raw })?,
            ),
            None => EntryRequest::from_args(test.as_deref(), question.as_deref()).ok(),
        };

        Ok(Self { config, entry })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("QUIZ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| format!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let mut iter = std::env::args().skip(1);
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.config.db_url)?;
    let services = AppServices::new_sqlite(&parsed.config, Clock::default()).await?;
    tracing::info!(source = ?parsed.config.source, entry = ?parsed.entry, "starting quiz");

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        entry: parsed.entry,
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Quiz")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn test_flag_wins_over_question() {
        let args = parse(&["--question", "7", "--test", "set_1.json"]).unwrap();
        assert_eq!(
            args.entry,
            Some(EntryRequest::Test("set_1.json".into()))
        );
    }

    #[test]
    fn open_query_is_parsed_like_a_page_query() {
        let args = parse(&["--open", "?q=12"]).unwrap();
        assert_eq!(args.entry, Some(EntryRequest::Question("12".into())));
        assert!(matches!(
            parse(&["--open", "foo=bar"]),
            Err(ArgsError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn source_flags_override_config() {
        let args = parse(&["--base-url", "https://quiz.example/"]).unwrap();
        assert_eq!(
            args.config.source,
            CatalogSource::Http("https://quiz.example/".into())
        );
        let args = parse(&["--root", "/srv/quiz"]).unwrap();
        assert_eq!(
            args.config.source,
            CatalogSource::Directory(PathBuf::from("/srv/quiz"))
        );
    }

    #[test]
    fn db_paths_become_absolute_sqlite_urls() {
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
        assert!(normalize_sqlite_url("quiz.db".into()).starts_with("sqlite:///"));
        assert!(matches!(
            parse(&["--db", " "]),
            Err(ArgsError::InvalidDbUrl { .. })
        ));
    }

    #[test]
    fn missing_flag_value_is_reported() {
        assert!(matches!(
            parse(&["--test"]),
            Err(ArgsError::MissingValue { flag: "--test" })
        ));
    }
}
