use std::fmt;
use std::sync::Arc;

use quiz_core::model::TestSetName;
use quiz_core::session::{AnswerFeedback, PassPolicy, QuizSession, QuizState};
use quiz_core::time::Countdown;

use crate::Clock;
use crate::catalog::CatalogService;
use crate::config::ProgressPolicy;
use crate::entry::EntryRequest;
use crate::error::QuizLoopError;
use crate::progress_service::ProgressService;

/// What an active quiz was started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizSource {
    Test(TestSetName),
    Question(String),
}

/// A running session together with where it came from.
#[derive(Debug, Clone)]
pub struct ActiveQuiz {
    source: QuizSource,
    title: String,
    session: QuizSession,
    skipped: usize,
}

impl ActiveQuiz {
    #[must_use]
    pub fn source(&self) -> &QuizSource {
        &self.source
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Questions dropped while loading a test under the skip policy.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn test_name(&self) -> Option<&TestSetName> {
        match &self.source {
            QuizSource::Test(name) => Some(name),
            QuizSource::Question(_) => None,
        }
    }

    #[must_use]
    pub fn is_single_question(&self) -> bool {
        matches!(self.source, QuizSource::Question(_))
    }
}

/// Starts quiz sessions from the catalog and keeps their progress persisted.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressService>,
    policy: PassPolicy,
    time_limit_secs: u32,
    progress_policy: ProgressPolicy,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<CatalogService>,
        progress: Arc<ProgressService>,
        policy: PassPolicy,
        time_limit_secs: u32,
    ) -> Self {
        Self {
            clock,
            catalog,
            progress,
            policy,
            time_limit_secs,
            progress_policy: ProgressPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_progress_policy(mut self, progress_policy: ProgressPolicy) -> Self {
        self.progress_policy = progress_policy;
        self
    }

    #[must_use]
    pub fn policy(&self) -> PassPolicy {
        self.policy
    }

    /// Start whatever the entry request names.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError` if loading fails or nothing could be loaded.
    pub async fn start(&self, request: &EntryRequest) -> Result<ActiveQuiz, QuizLoopError> {
        match request {
            EntryRequest::Test(name) => self.start_test(name).await,
            EntryRequest::Question(reference) => self.start_question(reference).await,
        }
    }

    /// Load a test set and start a timed session over its questions.
    ///
    /// Saved progress is cleared, or resumed when the loop was built with
    /// [`ProgressPolicy::Resume`] and the snapshot still fits the test.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Catalog` for load failures and
    /// `QuizLoopError::Quiz` when the test has no questions.
    pub async fn start_test(&self, name: &TestSetName) -> Result<ActiveQuiz, QuizLoopError> {
        let loaded = self.catalog.load_test(name).await?;
        let countdown = Countdown::new(self.time_limit_secs);
        let mut session = QuizSession::new(loaded.questions, Some(countdown), self.policy)?;

        match self.progress_policy {
            ProgressPolicy::StartFresh => self.progress.clear(name.as_str()).await?,
            ProgressPolicy::Resume => {
                if let Some(saved) = self.progress.load(name.as_str()).await? {
                    match session.restore(&saved) {
                        Ok(()) => tracing::info!(test = %name, "resumed saved progress"),
                        Err(err) => {
                            tracing::warn!(test = %name, error = %err, "discarding saved progress");
                        }
                    }
                }
            }
        }

        Ok(ActiveQuiz {
            source: QuizSource::Test(name.clone()),
            title: loaded.title,
            session,
            skipped: loaded.skipped,
        })
    }

    /// Load one question into an untimed session.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Catalog` if the question cannot be loaded.
    pub async fn start_question(&self, reference: &str) -> Result<ActiveQuiz, QuizLoopError> {
        let question = self.catalog.load_question(reference).await?;
        let title = question.stem().to_string();
        let session = QuizSession::new(vec![question], None, self.policy)?;
        Ok(ActiveQuiz {
            source: QuizSource::Question(reference.to_string()),
            title,
            session,
            skipped: 0,
        })
    }

    /// Record an answer for the presented question and persist progress.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Progress` if the snapshot cannot be stored.
    pub async fn select_answer(
        &self,
        quiz: &mut ActiveQuiz,
        choice: usize,
    ) -> Result<Option<AnswerFeedback>, QuizLoopError> {
        let feedback = quiz.session.select_answer(choice);
        if feedback.is_some() {
            self.persist(quiz).await?;
        }
        Ok(feedback)
    }

    /// Advance to the next question and persist progress.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Progress` if the snapshot cannot be stored.
    pub async fn next(&self, quiz: &mut ActiveQuiz) -> Result<QuizState, QuizLoopError> {
        let state = quiz.session.next();
        self.persist(quiz).await?;
        Ok(state)
    }

    /// Go back one question and persist progress.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Progress` if the snapshot cannot be stored.
    pub async fn previous(&self, quiz: &mut ActiveQuiz) -> Result<QuizState, QuizLoopError> {
        let state = quiz.session.previous();
        self.persist(quiz).await?;
        Ok(state)
    }

    /// Start the same quiz over from the first question with a full clock.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Progress` if the snapshot cannot be stored.
    pub async fn restart(&self, quiz: &mut ActiveQuiz) -> Result<(), QuizLoopError> {
        quiz.session.restart();
        tracing::debug!(source = ?quiz.source, "restarted quiz");
        self.persist(quiz).await
    }

    /// Consume one second. Progress is only written when this ends the quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Progress` if the saved snapshot cannot be cleared.
    pub async fn tick(&self, quiz: &mut ActiveQuiz) -> Result<bool, QuizLoopError> {
        let expired = quiz.session.tick();
        if expired {
            self.persist(quiz).await?;
        }
        Ok(expired)
    }

    /// Save a snapshot of an unfinished test, or clear it once completed.
    async fn persist(&self, quiz: &ActiveQuiz) -> Result<(), QuizLoopError> {
        let Some(name) = quiz.test_name() else {
            return Ok(());
        };
        if quiz.session.is_complete() {
            self.progress.clear(name.as_str()).await?;
        } else {
            let snapshot = quiz.session.snapshot(self.clock.now());
            self.progress.save(name.as_str(), &snapshot).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for QuizLoopService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizLoopService")
            .field("policy", &self.policy)
            .field("time_limit_secs", &self.time_limit_secs)
            .field("progress_policy", &self.progress_policy)
            .finish_non_exhaustive()
    }
}
