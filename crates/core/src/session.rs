use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::QuizError;
use crate::model::{Question, QuizProgress};
use crate::time::Countdown;

/// Score required to pass, independent of the number of questions.
pub const DEFAULT_PASS_THRESHOLD: usize = 15;

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Presenting(usize),
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    Finished,
    TimeExpired,
}

/// Absolute pass mark. Not scaled by the question count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassPolicy {
    threshold: usize,
}

impl PassPolicy {
    #[must_use]
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    #[must_use]
    pub fn passes(&self, score: usize) -> bool {
        score >= self.threshold
    }
}

impl Default for PassPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PASS_THRESHOLD)
    }
}

/// Outcome of the first selection on a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_index: usize,
    pub selected: usize,
    pub correct_index: Option<usize>,
    pub is_correct: bool,
    pub explanation: String,
}

/// Final tally once the session is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub threshold: usize,
    pub passed: bool,
    pub reason: CompletionReason,
}

impl QuizResult {
    /// Score as a whole percentage of the question count, halves rounded up.
    #[must_use]
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.score * 200 + self.total) / (self.total * 2)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Timed multiple-choice session over an ordered list of questions.
///
/// Answers are recorded per question and the first one counts: selecting
/// again, or returning to an answered question with [`QuizSession::previous`],
/// never changes the score.
#[derive(Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    state: QuizState,
    score: usize,
    answers: Vec<Option<usize>>,
    countdown: Option<Countdown>,
    policy: PassPolicy,
    reason: Option<CompletionReason>,
}

impl QuizSession {
    /// Start a session at the first question.
    ///
    /// Pass `None` as `countdown` for an untimed session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if `questions` is empty.
    pub fn new(
        questions: Vec<Question>,
        countdown: Option<Countdown>,
        policy: PassPolicy,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        let answers = vec![None; questions.len()];
        let mut session = Self {
            questions,
            state: QuizState::Presenting(0),
            score: 0,
            answers,
            countdown,
            policy,
            reason: None,
        };
        if session.countdown.is_some_and(|c| c.is_expired()) {
            session.complete(CompletionReason::TimeExpired);
        }
        Ok(session)
    }

    #[must_use]
    pub fn state(&self) -> QuizState {
        self.state
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Index of the presented question, or `total` once completed.
    #[must_use]
    pub fn current_index(&self) -> usize {
        match self.state {
            QuizState::Presenting(i) => i,
            QuizState::Completed => self.total(),
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            QuizState::Presenting(i) => self.questions.get(i),
            QuizState::Completed => None,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Whether the presented question accepts no more selections.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        match self.state {
            QuizState::Presenting(i) => self.answers[i].is_some(),
            QuizState::Completed => true,
        }
    }

    /// The recorded selection for question `index`, if any.
    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<usize> {
        self.answers.get(index).copied().flatten()
    }

    /// Feedback for the presented question if it was already answered.
    #[must_use]
    pub fn current_feedback(&self) -> Option<AnswerFeedback> {
        let QuizState::Presenting(i) = self.state else {
            return None;
        };
        let selected = self.answers[i]?;
        Some(self.feedback(i, selected))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == QuizState::Completed
    }

    #[must_use]
    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.countdown.map(|c| c.remaining_secs())
    }

    #[must_use]
    pub fn policy(&self) -> PassPolicy {
        self.policy
    }

    /// Record the first selection for the presented question.
    ///
    /// Returns `None` (and changes nothing) when the session is completed,
    /// the question is already locked, or `choice` is not one of its choices.
    pub fn select_answer(&mut self, choice: usize) -> Option<AnswerFeedback> {
        let QuizState::Presenting(i) = self.state else {
            return None;
        };
        if self.answers[i].is_some() || choice >= self.questions[i].choices().len() {
            return None;
        }
        self.answers[i] = Some(choice);
        let feedback = self.feedback(i, choice);
        if feedback.is_correct {
            self.score += 1;
        }
        Some(feedback)
    }

    /// Advance to the next question, or complete after the last one.
    pub fn next(&mut self) -> QuizState {
        if let QuizState::Presenting(i) = self.state {
            if i + 1 < self.total() {
                self.state = QuizState::Presenting(i + 1);
            } else {
                self.complete(CompletionReason::Finished);
            }
        }
        self.state
    }

    /// Go back one question. No effect on the first question or once completed.
    pub fn previous(&mut self) -> QuizState {
        if let QuizState::Presenting(i @ 1..) = self.state {
            self.state = QuizState::Presenting(i - 1);
        }
        self.state
    }

    /// Consume one second of the countdown. Returns `true` if this tick ended the session.
    pub fn tick(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        let Some(countdown) = self.countdown.as_mut() else {
            return false;
        };
        if countdown.tick() {
            self.complete(CompletionReason::TimeExpired);
            return true;
        }
        false
    }

    /// Start over on the same questions: first question, no answers, zero
    /// score and a full countdown.
    pub fn restart(&mut self) {
        self.answers = vec![None; self.questions.len()];
        self.score = 0;
        self.reason = None;
        self.state = QuizState::Presenting(0);
        self.countdown = self.countdown.map(|c| Countdown::new(c.budget_secs()));
    }

    /// Final tally; `None` while questions are still being presented.
    #[must_use]
    pub fn result(&self) -> Option<QuizResult> {
        let reason = self.reason?;
        Some(QuizResult {
            score: self.score,
            total: self.total(),
            threshold: self.policy.threshold(),
            passed: self.policy.passes(self.score),
            reason,
        })
    }

    #[must_use]
    pub fn snapshot(&self, saved_at: DateTime<Utc>) -> QuizProgress {
        QuizProgress {
            current_index: self.current_index(),
            score: self.score,
            remaining_seconds: self.remaining_seconds(),
            answers: self.answers.clone(),
            saved_at,
        }
    }

    /// Resume from a saved snapshot of the same quiz.
    ///
    /// The score is recomputed from the recorded answers.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::SnapshotLength` or `QuizError::SnapshotIndex` when
    /// the snapshot does not fit this question list.
    pub fn restore(&mut self, progress: &QuizProgress) -> Result<(), QuizError> {
        let total = self.total();
        if progress.answers.len() != total {
            return Err(QuizError::SnapshotLength {
                saved: progress.answers.len(),
                total,
            });
        }
        if progress.current_index > total {
            return Err(QuizError::SnapshotIndex {
                index: progress.current_index,
                total,
            });
        }

        self.answers = progress
            .answers
            .iter()
            .zip(&self.questions)
            .map(|(answer, question)| answer.filter(|a| *a < question.choices().len()))
            .collect();
        self.score = self
            .answers
            .iter()
            .zip(&self.questions)
            .filter(|(answer, question)| answer.is_some_and(|a| question.is_correct(a)))
            .count();
        self.reason = None;
        self.state = QuizState::Presenting(progress.current_index.min(total - 1));

        if let (Some(countdown), Some(remaining)) = (self.countdown, progress.remaining_seconds) {
            self.countdown = Some(Countdown::with_remaining(countdown.budget_secs(), remaining));
        }
        if progress.current_index == total {
            self.complete(CompletionReason::Finished);
        } else if self.countdown.is_some_and(|c| c.is_expired()) {
            self.complete(CompletionReason::TimeExpired);
        }
        Ok(())
    }

    fn feedback(&self, index: usize, selected: usize) -> AnswerFeedback {
        let question = &self.questions[index];
        AnswerFeedback {
            question_index: index,
            selected,
            correct_index: question.correct_index(),
            is_correct: question.is_correct(selected),
            explanation: question.explanation().to_string(),
        }
    }

    fn complete(&mut self, reason: CompletionReason) {
        self.state = QuizState::Completed;
        self.reason = Some(reason);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("state", &self.state)
            .field("score", &self.score)
            .field("remaining_seconds", &self.remaining_seconds())
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
