#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod config;
pub mod entry;
pub mod error;
pub mod progress_service;
pub mod quiz_loop;
pub mod sign_in_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use catalog::{CatalogService, DirectoryFetcher, HttpFetcher, LoadedTest, ResourceFetcher};
pub use config::{CatalogPaths, CatalogSource, OnMissingQuestion, ProgressPolicy, QuizConfig};
pub use entry::EntryRequest;
pub use error::{
    AppServicesError, CatalogError, ConfigValueError, EntryError, FetchError, ProgressError,
    QuizLoopError, SignInError,
};
pub use progress_service::ProgressService;
pub use quiz_loop::{ActiveQuiz, QuizLoopService, QuizSource};
pub use sign_in_service::{SIGN_IN_KEY, SignInService};
