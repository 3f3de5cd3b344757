use std::sync::Arc;

use quiz_core::gate::AccessGate;
use quiz_core::session::PassPolicy;
use storage::repository::Storage;
use url::Url;

use crate::Clock;
use crate::catalog::{CatalogService, DirectoryFetcher, HttpFetcher, ResourceFetcher};
use crate::config::{CatalogSource, QuizConfig};
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::quiz_loop::QuizLoopService;
use crate::sign_in_service::SignInService;

/// Assembles app-facing services from configuration and storage.
#[derive(Clone)]
pub struct AppServices {
    gate: AccessGate,
    catalog: Arc<CatalogService>,
    quiz_loop: Arc<QuizLoopService>,
    progress: Arc<ProgressService>,
    sign_in: Arc<SignInService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage at `config.db_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the base
    /// URL cannot be parsed.
    pub async fn new_sqlite(config: &QuizConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        Self::new(config, clock, storage).await
    }

    /// Build services over an existing storage backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the base URL cannot be parsed or the
    /// sign-in record cannot be read.
    pub async fn new(
        config: &QuizConfig,
        clock: Clock,
        storage: Storage,
    ) -> Result<Self, AppServicesError> {
        let fetcher = build_fetcher(&config.source)?;
        Self::with_fetcher(config, clock, storage, fetcher).await
    }

    /// Build services with a caller-supplied fetcher.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::SignIn` if the sign-in record cannot be read.
    pub async fn with_fetcher(
        config: &QuizConfig,
        clock: Clock,
        storage: Storage,
        fetcher: Arc<dyn ResourceFetcher>,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(CatalogService::new(
            fetcher,
            config.paths.clone(),
            config.on_missing,
        ));
        let progress = Arc::new(ProgressService::new(Arc::clone(&storage.kv)));
        let quiz_loop = Arc::new(
            QuizLoopService::new(
                clock,
                Arc::clone(&catalog),
                Arc::clone(&progress),
                PassPolicy::new(config.pass_threshold),
                config.time_limit_secs,
            )
            .with_progress_policy(config.progress),
        );
        let sign_in = SignInService::restore(Arc::clone(&storage.kv)).await?;

        Ok(Self {
            gate: AccessGate::new(config.free_count),
            catalog,
            quiz_loop,
            progress,
            sign_in: Arc::new(sign_in),
        })
    }

    #[must_use]
    pub fn gate(&self) -> AccessGate {
        self.gate
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn sign_in(&self) -> Arc<SignInService> {
        Arc::clone(&self.sign_in)
    }
}

fn build_fetcher(source: &CatalogSource) -> Result<Arc<dyn ResourceFetcher>, AppServicesError> {
    match source {
        CatalogSource::Http(raw) => {
            let base = Url::parse(raw).map_err(|source| AppServicesError::BaseUrl {
                raw: raw.clone(),
                source,
            })?;
            Ok(Arc::new(HttpFetcher::new(base)))
        }
        CatalogSource::Directory(root) => Ok(Arc::new(DirectoryFetcher::new(root.clone()))),
    }
}
