use std::fmt;
use std::sync::Arc;

use quiz_core::model::{Question, TestSet, TestSetName};
use quiz_core::normalize::{normalize_question, normalize_test_set, question_file_name};

use super::fetcher::{ResourceFetcher, fetch_json};
use super::listing::parse_listing;
use crate::config::{CatalogPaths, OnMissingQuestion};
use crate::error::CatalogError;

/// A test set with its questions loaded and normalized, in entry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTest {
    pub name: TestSetName,
    pub title: String,
    pub questions: Vec<Question>,
    /// Entries that failed to load and were skipped.
    pub skipped: usize,
}

/// Discovers and loads test sets and questions through a [`ResourceFetcher`].
#[derive(Clone)]
pub struct CatalogService {
    fetcher: Arc<dyn ResourceFetcher>,
    paths: CatalogPaths,
    on_missing: OnMissingQuestion,
}

impl CatalogService {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn ResourceFetcher>,
        paths: CatalogPaths,
        on_missing: OnMissingQuestion,
    ) -> Self {
        Self {
            fetcher,
            paths,
            on_missing,
        }
    }

    #[must_use]
    pub fn paths(&self) -> &CatalogPaths {
        &self.paths
    }

    #[must_use]
    pub fn on_missing(&self) -> OnMissingQuestion {
        self.on_missing
    }

    /// List the published test sets from the test-set directory listing.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Fetch` if the listing cannot be fetched.
    pub async fn discover_test_sets(&self) -> Result<Vec<TestSetName>, CatalogError> {
        let path = format!("{}/", self.paths.test_sets_dir);
        let listing = self.fetcher.fetch_text(&path).await.inspect_err(|err| {
            tracing::warn!(%path, error = %err, "test set listing failed");
        })?;
        let names = parse_listing(&listing);
        tracing::debug!(count = names.len(), "discovered test sets");
        Ok(names)
    }

    /// Fetch and normalize one test-set document without its questions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Fetch` if the document is missing or not JSON.
    pub async fn load_test_set(&self, name: &TestSetName) -> Result<TestSet, CatalogError> {
        let path = format!("{}/{}", self.paths.test_sets_dir, name.as_str());
        let raw = fetch_json(self.fetcher.as_ref(), &path).await?;
        Ok(normalize_test_set(&raw, name.as_str()))
    }

    /// Load a test set and then each of its questions, one after another.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the test set cannot be loaded, or, under
    /// [`OnMissingQuestion::Abort`], the first question that fails.
    pub async fn load_test(&self, name: &TestSetName) -> Result<LoadedTest, CatalogError> {
        let set = self.load_test_set(name).await?;
        let mut questions = Vec::with_capacity(set.entries.len());
        let mut skipped = 0;

        for entry in &set.entries {
            match self.load_question(&entry.file).await {
                Ok(question) => questions.push(question),
                Err(err) => match self.on_missing {
                    OnMissingQuestion::Abort => return Err(err),
                    OnMissingQuestion::Skip => {
                        skipped += 1;
                        tracing::warn!(
                            test = %name,
                            file = %entry.file,
                            id = %entry.id,
                            error = %err,
                            "skipping question that failed to load"
                        );
                    }
                },
            }
        }

        Ok(LoadedTest {
            name: name.clone(),
            title: set.title,
            questions,
            skipped,
        })
    }

    /// Load a single question by reference (`"7"`, `"q7"` or a file name).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidReference` for a blank reference, or
    /// `CatalogError::Fetch` if the question document cannot be loaded.
    pub async fn load_question(&self, reference: &str) -> Result<Question, CatalogError> {
        let file = question_file_name(reference)
            .ok_or_else(|| CatalogError::InvalidReference(reference.to_string()))?;
        let path = format!("{}/{}", self.paths.questions_dir, file);
        let raw = fetch_json(self.fetcher.as_ref(), &path).await?;
        Ok(normalize_question(&raw))
    }
}

impl fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogService")
            .field("paths", &self.paths)
            .field("on_missing", &self.on_missing)
            .finish_non_exhaustive()
    }
}
