use quiz_core::session::{CompletionReason, QuizResult, QuizState};
use services::{ActiveQuiz, EntryRequest, QuizLoopService};

use super::time_fmt::{elapsed_width, format_countdown};
use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(usize),
    Next,
    Previous,
    Restart,
}

/// How a choice is drawn once its question has been answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceMark {
    Open,
    Correct,
    Wrong,
    Disabled,
}

impl ChoiceMark {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            ChoiceMark::Open => "answer",
            ChoiceMark::Correct => "answer answer--correct disabled",
            ChoiceMark::Wrong => "answer answer--wrong disabled",
            ChoiceMark::Disabled => "answer disabled",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceVm {
    pub index: usize,
    pub label: String,
    pub mark: ChoiceMark,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub verdict: &'static str,
    pub explanation: String,
    pub success: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub text: String,
    pub percent_label: String,
    pub passed: bool,
    pub timed_out: bool,
}

/// View model over an active quiz; owns the session between renders.
#[derive(Clone, Debug)]
pub struct QuizVm {
    quiz: ActiveQuiz,
}

impl QuizVm {
    #[must_use]
    pub fn new(quiz: ActiveQuiz) -> Self {
        Self { quiz }
    }

    #[must_use]
    pub fn quiz(&self) -> &ActiveQuiz {
        &self.quiz
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.quiz.title()
    }

    #[must_use]
    pub fn is_single_question(&self) -> bool {
        self.quiz.is_single_question()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.quiz.session().is_complete()
    }

    #[must_use]
    pub fn stem(&self) -> Option<&str> {
        self.quiz.session().current_question().map(|q| q.stem())
    }

    #[must_use]
    pub fn progress_label(&self) -> Option<String> {
        let session = self.quiz.session();
        match session.state() {
            QuizState::Presenting(i) => Some(format!("Question {} of {}", i + 1, session.total())),
            QuizState::Completed => None,
        }
    }

    #[must_use]
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.quiz.session().score())
    }

    #[must_use]
    pub fn source_label(&self) -> Option<String> {
        let question = self.quiz.session().current_question()?;
        Some(source_label(question.display_number()))
    }

    #[must_use]
    pub fn choices(&self) -> Vec<ChoiceVm> {
        let session = self.quiz.session();
        let Some(question) = session.current_question() else {
            return Vec::new();
        };
        let selected = session.answer_for(session.current_index());
        question
            .choices()
            .iter()
            .enumerate()
            .map(|(index, choice)| ChoiceVm {
                index,
                label: choice.label().to_string(),
                mark: choice_mark(index, selected, question.correct_index()),
            })
            .collect()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<FeedbackVm> {
        let feedback = self.quiz.session().current_feedback()?;
        Some(FeedbackVm {
            verdict: if feedback.is_correct {
                "Correct"
            } else {
                "Incorrect"
            },
            explanation: feedback.explanation,
            success: feedback.is_correct,
        })
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        !self.is_single_question()
            && matches!(self.quiz.session().state(), QuizState::Presenting(i) if i > 0)
    }

    /// Next is offered once the presented question has been answered.
    #[must_use]
    pub fn can_go_next(&self) -> bool {
        let session = self.quiz.session();
        !self.is_single_question() && !session.is_complete() && session.is_locked()
    }

    #[must_use]
    pub fn timer_label(&self) -> Option<String> {
        self.quiz.session().remaining_seconds().map(format_countdown)
    }

    #[must_use]
    pub fn timer_width(&self) -> Option<String> {
        self.quiz
            .session()
            .countdown()
            .map(|countdown| elapsed_width(countdown.elapsed_fraction()))
    }

    #[must_use]
    pub fn results(&self) -> Option<ResultsVm> {
        if self.is_single_question() {
            return None;
        }
        self.quiz.session().result().map(|result| ResultsVm {
            text: results_text(&result),
            percent_label: format!("Score: {}%", result.percent()),
            passed: result.passed,
            timed_out: result.reason == CompletionReason::TimeExpired,
        })
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if progress could not be persisted.
    pub async fn apply(
        &mut self,
        quiz_loop: &QuizLoopService,
        intent: QuizIntent,
    ) -> Result<(), ViewError> {
        let result = match intent {
            QuizIntent::Select(choice) => quiz_loop
                .select_answer(&mut self.quiz, choice)
                .await
                .map(|_| ()),
            QuizIntent::Next => quiz_loop.next(&mut self.quiz).await.map(|_| ()),
            QuizIntent::Previous => quiz_loop.previous(&mut self.quiz).await.map(|_| ()),
            QuizIntent::Restart => quiz_loop.restart(&mut self.quiz).await,
        };
        result.map_err(|err| {
            tracing::warn!(error = %err, ?intent, "quiz action failed");
            ViewError::Unknown
        })
    }

    /// Consume one second. Returns `true` when time ran out on this tick.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if progress could not be persisted.
    pub async fn tick(&mut self, quiz_loop: &QuizLoopService) -> Result<bool, ViewError> {
        quiz_loop.tick(&mut self.quiz).await.map_err(|err| {
            tracing::warn!(error = %err, "quiz tick failed");
            ViewError::Unknown
        })
    }
}

#[must_use]
pub fn source_label(display_number: &str) -> String {
    if display_number.is_empty() {
        "Source: \u{2014}".to_string()
    } else {
        format!("Source: question_{display_number}")
    }
}

#[must_use]
pub fn results_text(result: &QuizResult) -> String {
    let verdict = if result.passed { "PASSED" } else { "FAILED" };
    format!(
        "{verdict} \u{2014} You scored {} out of {}. ({} required to pass)",
        result.score, result.total, result.threshold
    )
}

fn choice_mark(index: usize, selected: Option<usize>, correct: Option<usize>) -> ChoiceMark {
    let Some(selected) = selected else {
        return ChoiceMark::Open;
    };
    if correct == Some(index) {
        ChoiceMark::Correct
    } else if selected == index {
        ChoiceMark::Wrong
    } else {
        ChoiceMark::Disabled
    }
}

/// # Errors
///
/// Returns `ViewError::EmptyTest` when the test has no questions, and
/// `ViewError::LoadTest` or `ViewError::LoadQuestion` for other failures.
pub async fn start_quiz(
    quiz_loop: &QuizLoopService,
    request: &EntryRequest,
) -> Result<QuizVm, ViewError> {
    match quiz_loop.start(request).await {
        Ok(quiz) => Ok(QuizVm::new(quiz)),
        Err(err) if err.is_empty() => Err(ViewError::EmptyTest),
        Err(err) => {
            tracing::warn!(error = %err, ?request, "quiz failed to start");
            Err(match request {
                EntryRequest::Test(_) => ViewError::LoadTest,
                EntryRequest::Question(_) => ViewError::LoadQuestion,
            })
        }
    }
}
