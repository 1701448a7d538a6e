//! Review session state machine
//!
//! Holds the locally mutable queue of due cards for one sitting and the
//! counters shown on the summary screen. Scheduling itself happens on the
//! server; this only tracks what the user has seen and graded.
//!
//! ```text
//! Loading ─┬─ empty ──────────────────────────────► Finished
//!          └─ cards ─► Question ─► Checked ─► Answer ─► (grade) ─► Question | Finished
//! ```

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::matching::{check_answer, AnswerCheck};
use crate::error::ClientError;
use crate::models::{Card, Grade};

/// Where the session currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    /// Prompt shown, waiting for a guess
    Question,
    /// Guess checked locally, answer still hidden
    Checked(AnswerCheck),
    /// Full card revealed, waiting for a grade
    Answer,
    Finished,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Question => "question",
            Phase::Checked(_) => "checked",
            Phase::Answer => "answer",
            Phase::Finished => "finished",
        }
    }
}

/// Errors from driving a review session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReviewError {
    #[error("Cannot {action} while in {phase} state")]
    InvalidPhase {
        action: &'static str,
        phase: &'static str,
    },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Grade is no longer the most recent one")]
    StaleCommand,

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Local counters for the current sitting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
    /// Time spent on graded cards
    pub time_ms: i64,
}

impl SessionStats {
    fn apply(&mut self, grade: Grade, elapsed_ms: i64) {
        if grade.is_pass() {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.total += 1;
        self.time_ms += elapsed_ms;
    }

    fn revert(&mut self, grade: Grade, elapsed_ms: i64) {
        if grade.is_pass() {
            self.correct = self.correct.saturating_sub(1);
        } else {
            self.incorrect = self.incorrect.saturating_sub(1);
        }
        self.total = self.total.saturating_sub(1);
        self.time_ms = (self.time_ms - elapsed_ms).max(0);
    }

    /// Share of graded cards that were not "again"
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.correct as f64 / self.total as f64)
        }
    }

    pub fn average_ms(&self) -> Option<i64> {
        if self.total == 0 {
            None
        } else {
            Some(self.time_ms / self.total as i64)
        }
    }
}

/// A grade applied to the local queue, reversible until the next grade
#[derive(Debug, Clone, PartialEq)]
pub struct GradeCommand {
    seq: u64,
    pub card: Card,
    pub grade: Grade,
    pub elapsed_ms: i64,
    shown_at: Option<DateTime<Utc>>,
}

/// Extra content revealed on the answer side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reveal {
    pub mnemonic: bool,
    pub sentence: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    queue: VecDeque<Card>,
    phase: Phase,
    stats: SessionStats,
    last_graded: Option<GradeCommand>,
    // Undo slot displaced by the newest grade, restored if that grade rolls back
    displaced: Option<GradeCommand>,
    reveal: Reveal,
    shown_at: Option<DateTime<Utc>>,
    next_seq: u64,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewSession {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            phase: Phase::Loading,
            stats: SessionStats::default(),
            last_graded: None,
            displaced: None,
            reveal: Reveal::default(),
            shown_at: None,
            next_seq: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn reveal_state(&self) -> &Reveal {
        &self.reveal
    }

    pub fn current(&self) -> Option<&Card> {
        match self.phase {
            Phase::Loading | Phase::Finished => None,
            _ => self.queue.front(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> impl Iterator<Item = &Card> {
        self.queue.iter()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn can_undo(&self) -> bool {
        self.last_graded.is_some()
    }

    /// Card that the next undo would bring back
    pub fn last_graded(&self) -> Option<&GradeCommand> {
        self.last_graded.as_ref()
    }

    /// Enter the loading state while a batch is being fetched
    pub fn begin_loading(&mut self) {
        self.phase = Phase::Loading;
    }

    /// Install a freshly fetched batch
    pub fn load(&mut self, batch: Vec<Card>) {
        self.load_at(batch, Utc::now());
    }

    pub fn load_at(&mut self, batch: Vec<Card>, now: DateTime<Utc>) {
        tracing::debug!("Loaded review batch of {} cards", batch.len());
        self.queue = batch.into();
        self.advance(now);
    }

    /// Check a typed guess against the current card
    pub fn check_answer(&mut self, input: &str) -> Result<AnswerCheck, ReviewError> {
        match self.phase {
            Phase::Question | Phase::Checked(_) => {}
            _ => return Err(self.invalid("check an answer")),
        }
        let card = self.queue.front().ok_or(ReviewError::InvalidPhase {
            action: "check an answer",
            phase: "finished",
        })?;

        let check = check_answer(card, input);
        self.phase = Phase::Checked(check.clone());
        Ok(check)
    }

    /// Show the full card
    pub fn reveal(&mut self) -> Result<(), ReviewError> {
        match self.phase {
            Phase::Question | Phase::Checked(_) => {
                self.phase = Phase::Answer;
                Ok(())
            }
            Phase::Answer => Ok(()),
            _ => Err(self.invalid("reveal the answer")),
        }
    }

    /// Mark the mnemonic as revealed and return it, if the card has one
    pub fn reveal_mnemonic(&mut self) -> Result<Option<&str>, ReviewError> {
        if self.phase != Phase::Answer {
            return Err(self.invalid("reveal the mnemonic"));
        }
        self.reveal.mnemonic = true;
        Ok(self.queue.front().and_then(|c| c.mnemonic.as_deref()))
    }

    /// Store a mnemonic generated for the current card
    pub fn attach_mnemonic(&mut self, mnemonic: String) -> Result<(), ReviewError> {
        if self.phase != Phase::Answer {
            return Err(self.invalid("attach a mnemonic"));
        }
        if let Some(card) = self.queue.front_mut() {
            card.mnemonic = Some(mnemonic);
        }
        self.reveal.mnemonic = true;
        Ok(())
    }

    /// Store a practice sentence fetched for the current card
    pub fn attach_sentence(&mut self, sentence: String) -> Result<(), ReviewError> {
        if self.phase != Phase::Answer {
            return Err(self.invalid("attach a sentence"));
        }
        self.reveal.sentence = Some(sentence);
        Ok(())
    }

    pub fn grade(&mut self, grade: Grade) -> Result<GradeCommand, ReviewError> {
        self.grade_at(grade, Utc::now())
    }

    /// Pop the current card and count it. The returned command is what the
    /// caller posts to the server and hands back to [`rollback`] on failure.
    ///
    /// [`rollback`]: ReviewSession::rollback
    pub fn grade_at(&mut self, grade: Grade, now: DateTime<Utc>) -> Result<GradeCommand, ReviewError> {
        match self.phase {
            Phase::Answer | Phase::Checked(_) => {}
            _ => return Err(self.invalid("grade")),
        }
        let card = self.queue.pop_front().ok_or(ReviewError::InvalidPhase {
            action: "grade",
            phase: "finished",
        })?;

        let elapsed_ms = self
            .shown_at
            .map(|t| (now - t).num_milliseconds().max(0))
            .unwrap_or(0);

        self.stats.apply(grade, elapsed_ms);

        let command = GradeCommand {
            seq: self.next_seq,
            card,
            grade,
            elapsed_ms,
            shown_at: self.shown_at,
        };
        self.next_seq += 1;
        self.displaced = self.last_graded.replace(command.clone());

        tracing::debug!(
            card_id = command.card.id,
            grade = %grade,
            elapsed_ms,
            "Graded card"
        );

        self.advance(now);
        Ok(command)
    }

    /// Reverse a grade whose submission failed; the card goes back on
    /// screen with its answer shown
    pub fn rollback(&mut self, command: &GradeCommand) -> Result<(), ReviewError> {
        match &self.last_graded {
            Some(last) if last.seq == command.seq => {}
            _ => return Err(ReviewError::StaleCommand),
        }
        let Some(command) = self.last_graded.take() else {
            return Err(ReviewError::StaleCommand);
        };
        self.last_graded = self.displaced.take();

        self.stats.revert(command.grade, command.elapsed_ms);
        self.shown_at = command.shown_at;
        self.queue.push_front(command.card);
        self.phase = Phase::Answer;

        tracing::warn!("Rolled back grade after failed submission");
        Ok(())
    }

    pub fn undo(&mut self) -> Result<GradeCommand, ReviewError> {
        self.undo_at(Utc::now())
    }

    /// Put the last graded card back in front and reverse its counters.
    /// Only the most recent grade can be undone. The grade already recorded
    /// on the server is left untouched.
    pub fn undo_at(&mut self, now: DateTime<Utc>) -> Result<GradeCommand, ReviewError> {
        if self.phase == Phase::Loading {
            return Err(self.invalid("undo"));
        }
        let command = self.last_graded.take().ok_or(ReviewError::NothingToUndo)?;
        self.displaced = None;

        self.stats.revert(command.grade, command.elapsed_ms);
        self.queue.push_front(command.card.clone());
        self.phase = Phase::Question;
        self.reveal = Reveal::default();
        self.shown_at = Some(now);

        tracing::info!(
            card_id = command.card.id,
            grade = %command.grade,
            "Undid local grade; server-side grade is kept"
        );
        Ok(command)
    }

    pub fn skip(&mut self) -> Result<Card, ReviewError> {
        self.skip_at(Utc::now())
    }

    /// Drop the current card without grading it
    pub fn skip_at(&mut self, now: DateTime<Utc>) -> Result<Card, ReviewError> {
        match self.phase {
            Phase::Question | Phase::Checked(_) | Phase::Answer => {}
            _ => return Err(self.invalid("skip")),
        }
        let card = self.queue.pop_front().ok_or(ReviewError::InvalidPhase {
            action: "skip",
            phase: "finished",
        })?;
        self.advance(now);
        Ok(card)
    }

    /// Load the next batch after finishing, keeping the counters
    pub fn continue_with(&mut self, batch: Vec<Card>) -> Result<(), ReviewError> {
        self.continue_with_at(batch, Utc::now())
    }

    pub fn continue_with_at(&mut self, batch: Vec<Card>, now: DateTime<Utc>) -> Result<(), ReviewError> {
        match self.phase {
            Phase::Finished | Phase::Loading => {}
            _ => return Err(self.invalid("continue")),
        }
        self.last_graded = None;
        self.displaced = None;
        self.load_at(batch, now);
        Ok(())
    }

    /// Reset the counters and start over with a new batch
    pub fn restart(&mut self, batch: Vec<Card>) {
        self.restart_at(batch, Utc::now());
    }

    pub fn restart_at(&mut self, batch: Vec<Card>, now: DateTime<Utc>) {
        self.stats = SessionStats::default();
        self.last_graded = None;
        self.displaced = None;
        self.load_at(batch, now);
    }

    fn advance(&mut self, now: DateTime<Utc>) {
        self.reveal = Reveal::default();
        if self.queue.is_empty() {
            self.phase = Phase::Finished;
            self.shown_at = None;
        } else {
            self.phase = Phase::Question;
            self.shown_at = Some(now);
        }
    }

    fn invalid(&self, action: &'static str) -> ReviewError {
        ReviewError::InvalidPhase {
            action,
            phase: self.phase.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn batch(n: i64) -> Vec<Card> {
        (1..=n)
            .map(|i| Card::new(i, format!("かな{}", i)).meaning_en(format!("word {}", i)))
            .collect()
    }

    fn session_with(n: i64) -> ReviewSession {
        let mut session = ReviewSession::new();
        session.load_at(batch(n), t(0));
        session
    }

    fn assert_counters_consistent(s: &ReviewSession) {
        let stats = s.stats();
        assert_eq!(stats.total, stats.correct + stats.incorrect);
    }

    #[test]
    fn test_empty_batch_finishes() {
        let mut session = ReviewSession::new();
        assert_eq!(session.phase(), &Phase::Loading);

        session.load_at(Vec::new(), t(0));
        assert!(session.is_finished());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_question_check_answer_flow() {
        let mut session = session_with(2);
        assert_eq!(session.phase(), &Phase::Question);

        let check = session.check_answer("word 1").unwrap();
        assert!(check.is_correct());
        assert!(matches!(session.phase(), Phase::Checked(_)));

        session.reveal().unwrap();
        assert_eq!(session.phase(), &Phase::Answer);
    }

    #[test]
    fn test_grade_pops_exactly_one() {
        for size in 1..=4 {
            let mut session = session_with(size);
            session.reveal().unwrap();

            let before = session.remaining();
            let head = session.current().unwrap().id;
            let cmd = session.grade_at(Grade::Good, t(5)).unwrap();

            assert_eq!(cmd.card.id, head);
            assert_eq!(session.remaining(), before - 1);
            assert_eq!(session.stats().total, 1);
            assert_counters_consistent(&session);
        }
    }

    #[test]
    fn test_grade_counts_and_time() {
        let mut session = session_with(3);

        session.reveal().unwrap();
        session.grade_at(Grade::Again, t(4)).unwrap();
        session.reveal().unwrap();
        session.grade_at(Grade::Easy, t(10)).unwrap();

        let stats = session.stats();
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.incorrect, 1);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.time_ms, 10_000);
        assert_eq!(stats.accuracy(), Some(0.5));
        assert_eq!(stats.average_ms(), Some(5_000));
    }

    #[test]
    fn test_last_grade_finishes() {
        let mut session = session_with(1);
        session.reveal().unwrap();
        session.grade_at(Grade::Hard, t(1)).unwrap();
        assert!(session.is_finished());
        assert!(matches!(
            session.grade_at(Grade::Good, t(2)),
            Err(ReviewError::InvalidPhase { .. })
        ));
    }

    #[test]
    fn test_grade_requires_revealed_or_checked() {
        let mut session = session_with(2);
        assert!(matches!(
            session.grade_at(Grade::Good, t(1)),
            Err(ReviewError::InvalidPhase { action: "grade", phase: "question" })
        ));

        session.check_answer("nope").unwrap();
        assert!(session.grade_at(Grade::Again, t(1)).is_ok());
    }

    #[test]
    fn test_undo_restores_card_and_counters() {
        let mut session = session_with(3);
        session.reveal().unwrap();
        session.grade_at(Grade::Good, t(3)).unwrap();
        session.reveal().unwrap();
        let before = session.stats();

        let cmd = session.grade_at(Grade::Again, t(8)).unwrap();
        assert_eq!(cmd.card.id, 2);

        let undone = session.undo_at(t(9)).unwrap();
        assert_eq!(undone.card.id, 2);
        assert_eq!(session.current().unwrap().id, 2);
        assert_eq!(session.remaining(), 2);
        assert_eq!(session.stats(), before);
        assert_eq!(session.phase(), &Phase::Question);
        assert_counters_consistent(&session);
    }

    #[test]
    fn test_undo_is_single_level() {
        let mut session = session_with(3);
        session.reveal().unwrap();
        session.grade_at(Grade::Good, t(1)).unwrap();
        session.reveal().unwrap();
        session.grade_at(Grade::Good, t(2)).unwrap();

        session.undo_at(t(3)).unwrap();
        assert_eq!(session.undo_at(t(4)), Err(ReviewError::NothingToUndo));
        assert_eq!(session.stats().total, 1);
    }

    #[test]
    fn test_undo_from_finished() {
        let mut session = session_with(1);
        session.reveal().unwrap();
        session.grade_at(Grade::Easy, t(1)).unwrap();
        assert!(session.is_finished());

        session.undo_at(t(2)).unwrap();
        assert_eq!(session.phase(), &Phase::Question);
        assert_eq!(session.stats().total, 0);
    }

    #[test]
    fn test_rollback_after_failed_submit() {
        let mut session = session_with(2);
        session.reveal().unwrap();
        let cmd = session.grade_at(Grade::Good, t(6)).unwrap();

        session.rollback(&cmd).unwrap();
        assert_eq!(session.current().unwrap().id, 1);
        assert_eq!(session.remaining(), 2);
        assert_eq!(session.stats(), SessionStats::default());
        assert_eq!(session.phase(), &Phase::Answer);
        assert!(!session.can_undo());

        // Re-grading counts time from when the card was first shown
        let again = session.grade_at(Grade::Good, t(10)).unwrap();
        assert_eq!(again.elapsed_ms, 10_000);
    }

    #[test]
    fn test_rollback_restores_previous_undo() {
        let mut session = session_with(3);
        session.reveal().unwrap();
        session.grade_at(Grade::Good, t(1)).unwrap();
        session.reveal().unwrap();
        let second = session.grade_at(Grade::Hard, t(2)).unwrap();

        session.rollback(&second).unwrap();
        assert_eq!(session.current().unwrap().id, 2);
        assert_eq!(session.last_graded().unwrap().card.id, 1);

        let undone = session.undo_at(t(3)).unwrap();
        assert_eq!(undone.card.id, 1);
        assert_eq!(session.current().unwrap().id, 1);
        assert_eq!(session.stats(), SessionStats::default());
        assert_counters_consistent(&session);
    }

    #[test]
    fn test_rollback_rejects_stale_command() {
        let mut session = session_with(3);
        session.reveal().unwrap();
        let first = session.grade_at(Grade::Good, t(1)).unwrap();
        session.reveal().unwrap();
        session.grade_at(Grade::Good, t(2)).unwrap();

        assert_eq!(session.rollback(&first), Err(ReviewError::StaleCommand));
        assert_eq!(session.stats().total, 2);
    }

    #[test]
    fn test_skip_leaves_counters() {
        let mut session = session_with(2);
        let skipped = session.skip_at(t(1)).unwrap();
        assert_eq!(skipped.id, 1);
        assert_eq!(session.current().unwrap().id, 2);
        assert_eq!(session.stats(), SessionStats::default());

        session.skip_at(t(2)).unwrap();
        assert!(session.is_finished());
        assert!(session.skip_at(t(3)).is_err());
    }

    #[test]
    fn test_reveal_extras_only_on_answer_side() {
        let mut session = ReviewSession::new();
        let mut card = Card::new(1, "ねこ");
        card.mnemonic = Some("neko naps".to_string());
        session.load_at(vec![card], t(0));

        assert!(session.reveal_mnemonic().is_err());
        assert!(session.attach_sentence("猫が寝る".to_string()).is_err());

        session.reveal().unwrap();
        assert_eq!(session.reveal_mnemonic().unwrap(), Some("neko naps"));
        session.attach_sentence("猫が寝る".to_string()).unwrap();
        assert!(session.reveal_state().mnemonic);
        assert_eq!(session.reveal_state().sentence.as_deref(), Some("猫が寝る"));

        session.grade_at(Grade::Good, t(1)).unwrap();
        assert_eq!(session.reveal_state(), &Reveal::default());
    }

    #[test]
    fn test_continue_keeps_counters_restart_resets() {
        let mut session = session_with(1);
        session.reveal().unwrap();
        session.grade_at(Grade::Good, t(2)).unwrap();

        session.continue_with_at(batch(2), t(3)).unwrap();
        assert_eq!(session.stats().total, 1);
        assert_eq!(session.remaining(), 2);
        assert!(!session.can_undo());
        assert!(session.continue_with_at(batch(1), t(4)).is_err());

        session.restart_at(batch(1), t(5));
        assert_eq!(session.stats(), SessionStats::default());
        assert_eq!(session.remaining(), 1);
    }

    #[test]
    fn test_elapsed_never_negative() {
        let mut session = session_with(1);
        session.reveal().unwrap();
        let cmd = session.grade_at(Grade::Good, t(0) - Duration::seconds(5)).unwrap();
        assert_eq!(cmd.elapsed_ms, 0);
    }
}
