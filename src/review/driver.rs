//! Review driver
//!
//! Couples a [`ReviewSession`] to the backend: fetches batches, posts grades
//! and rolls a grade back when the post fails.

use async_trait::async_trait;

use super::session::{GradeCommand, ReviewError, ReviewSession};
use crate::error::ClientResult;
use crate::models::{Card, Grade};

/// The backend calls a review needs
#[async_trait]
pub trait ReviewBackend: Send + Sync {
    async fn fetch_queue(&self, deck: Option<&str>, limit: u32) -> ClientResult<Vec<Card>>;

    async fn submit_grade(&self, card_id: i64, grade: Grade, elapsed_ms: i64) -> ClientResult<()>;

    async fn generate_mnemonic(&self, card_id: i64) -> ClientResult<String>;

    async fn generate_sentence(&self, card_id: i64) -> ClientResult<String>;
}

/// What happened to an undo
#[derive(Debug, Clone, PartialEq)]
pub struct UndoOutcome {
    pub card_id: i64,
    pub grade: Grade,
    /// Always true today: there is no endpoint to retract a grade
    pub server_grade_kept: bool,
}

pub struct ReviewDriver<B> {
    backend: B,
    session: ReviewSession,
    deck: Option<String>,
    batch_size: u32,
}

impl<B: ReviewBackend> ReviewDriver<B> {
    pub fn new(backend: B, deck: Option<String>, batch_size: u32) -> Self {
        Self {
            backend,
            session: ReviewSession::new(),
            deck,
            batch_size,
        }
    }

    pub fn session(&self) -> &ReviewSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ReviewSession {
        &mut self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn fetch(&mut self) -> Result<Vec<Card>, ReviewError> {
        self.session.begin_loading();
        let batch = self
            .backend
            .fetch_queue(self.deck.as_deref(), self.batch_size)
            .await?;
        tracing::info!("Fetched {} due cards", batch.len());
        Ok(batch)
    }

    /// Fetch the first batch
    pub async fn start(&mut self) -> Result<(), ReviewError> {
        let batch = self.fetch().await?;
        self.session.load(batch);
        Ok(())
    }

    /// Grade locally, post, and undo the local change if the post fails
    pub async fn grade(&mut self, grade: Grade) -> Result<GradeCommand, ReviewError> {
        let command = self.session.grade(grade)?;

        match self
            .backend
            .submit_grade(command.card.id, grade, command.elapsed_ms)
            .await
        {
            Ok(()) => Ok(command),
            Err(e) => {
                tracing::error!(card_id = command.card.id, "Failed to submit grade: {}", e);
                self.session.rollback(&command)?;
                Err(e.into())
            }
        }
    }

    pub fn undo(&mut self) -> Result<UndoOutcome, ReviewError> {
        let command = self.session.undo()?;
        tracing::warn!(
            card_id = command.card.id,
            "Grade {} stays recorded on the server",
            command.grade
        );
        Ok(UndoOutcome {
            card_id: command.card.id,
            grade: command.grade,
            server_grade_kept: true,
        })
    }

    pub fn skip(&mut self) -> Result<Card, ReviewError> {
        self.session.skip()
    }

    /// Show the mnemonic, generating one if the card has none
    pub async fn mnemonic(&mut self) -> Result<String, ReviewError> {
        if let Some(existing) = self.session.reveal_mnemonic()? {
            return Ok(existing.to_string());
        }
        let card_id = self.current_id()?;
        let generated = self.backend.generate_mnemonic(card_id).await?;
        self.session.attach_mnemonic(generated.clone())?;
        Ok(generated)
    }

    pub async fn sentence(&mut self) -> Result<String, ReviewError> {
        if let Some(existing) = self.session.reveal_state().sentence.clone() {
            return Ok(existing);
        }
        let card_id = self.current_id()?;
        let sentence = self.backend.generate_sentence(card_id).await?;
        self.session.attach_sentence(sentence.clone())?;
        Ok(sentence)
    }

    /// Next batch, counters kept
    pub async fn continue_session(&mut self) -> Result<(), ReviewError> {
        let batch = self.fetch().await?;
        self.session.continue_with(batch)
    }

    /// Fresh counters, fresh batch
    pub async fn restart(&mut self) -> Result<(), ReviewError> {
        let batch = self.fetch().await?;
        self.session.restart(batch);
        Ok(())
    }

    fn current_id(&self) -> Result<i64, ReviewError> {
        self.session
            .current()
            .map(|c| c.id)
            .ok_or(ReviewError::InvalidPhase {
                action: "generate content",
                phase: self.session.phase().name(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::review::session::Phase;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeBackend {
        batches: Mutex<Vec<Vec<Card>>>,
        fail_submit: AtomicBool,
        fail_fetch: AtomicBool,
        submitted: Mutex<Vec<(i64, Grade)>>,
        generated: AtomicU32,
    }

    impl FakeBackend {
        fn with_batches(batches: Vec<Vec<Card>>) -> Self {
            Self {
                batches: Mutex::new(batches.into_iter().rev().collect()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ReviewBackend for FakeBackend {
        async fn fetch_queue(&self, _deck: Option<&str>, _limit: u32) -> ClientResult<Vec<Card>> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(ClientError::Timeout);
            }
            Ok(self.batches.lock().unwrap().pop().unwrap_or_default())
        }

        async fn submit_grade(&self, card_id: i64, grade: Grade, _elapsed_ms: i64) -> ClientResult<()> {
            if self.fail_submit.load(Ordering::SeqCst) {
                return Err(ClientError::Network("connection reset".to_string()));
            }
            self.submitted.lock().unwrap().push((card_id, grade));
            Ok(())
        }

        async fn generate_mnemonic(&self, card_id: i64) -> ClientResult<String> {
            self.generated.fetch_add(1, Ordering::SeqCst);
            Ok(format!("mnemonic for {}", card_id))
        }

        async fn generate_sentence(&self, card_id: i64) -> ClientResult<String> {
            self.generated.fetch_add(1, Ordering::SeqCst);
            Ok(format!("sentence for {}", card_id))
        }
    }

    fn cards(ids: &[i64]) -> Vec<Card> {
        ids.iter().map(|&id| Card::new(id, "かな")).collect()
    }

    #[tokio::test]
    async fn test_grade_posts_to_backend() {
        let backend = FakeBackend::with_batches(vec![cards(&[1, 2])]);
        let mut driver = ReviewDriver::new(backend, None, 20);
        driver.start().await.unwrap();

        driver.session_mut().reveal().unwrap();
        driver.grade(Grade::Good).await.unwrap();

        assert_eq!(*driver.backend().submitted.lock().unwrap(), vec![(1, Grade::Good)]);
        assert_eq!(driver.session().remaining(), 1);
    }

    #[tokio::test]
    async fn test_failed_submit_rolls_back() {
        let backend = FakeBackend::with_batches(vec![cards(&[1, 2])]);
        backend.fail_submit.store(true, Ordering::SeqCst);
        let mut driver = ReviewDriver::new(backend, None, 20);
        driver.start().await.unwrap();

        driver.session_mut().reveal().unwrap();
        let err = driver.grade(Grade::Again).await.unwrap_err();

        assert!(matches!(err, ReviewError::Client(ClientError::Network(_))));
        assert_eq!(driver.session().remaining(), 2);
        assert_eq!(driver.session().current().unwrap().id, 1);
        assert_eq!(driver.session().stats().total, 0);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_earlier_undo() {
        let backend = FakeBackend::with_batches(vec![cards(&[1, 2, 3])]);
        let mut driver = ReviewDriver::new(backend, None, 20);
        driver.start().await.unwrap();

        driver.session_mut().reveal().unwrap();
        driver.grade(Grade::Good).await.unwrap();

        driver.backend().fail_submit.store(true, Ordering::SeqCst);
        driver.session_mut().reveal().unwrap();
        assert!(driver.grade(Grade::Good).await.is_err());

        assert!(driver.session().can_undo());
        let outcome = driver.undo().unwrap();
        assert_eq!(outcome.card_id, 1);
        assert_eq!(driver.session().current().unwrap().id, 1);
        assert_eq!(driver.session().remaining(), 3);
    }

    #[tokio::test]
    async fn test_continue_retries_after_failed_fetch() {
        let backend = FakeBackend::with_batches(vec![cards(&[1]), cards(&[2])]);
        let mut driver = ReviewDriver::new(backend, None, 20);
        driver.start().await.unwrap();
        driver.session_mut().reveal().unwrap();
        driver.grade(Grade::Good).await.unwrap();
        assert!(driver.session().is_finished());

        driver.backend().fail_fetch.store(true, Ordering::SeqCst);
        assert!(driver.continue_session().await.is_err());
        assert_eq!(driver.session().phase(), &Phase::Loading);

        driver.backend().fail_fetch.store(false, Ordering::SeqCst);
        driver.continue_session().await.unwrap();
        assert_eq!(driver.session().current().unwrap().id, 2);
        assert_eq!(driver.session().stats().total, 1);
        assert!(!driver.session().can_undo());
    }

    #[tokio::test]
    async fn test_undo_reports_server_grade_kept() {
        let backend = FakeBackend::with_batches(vec![cards(&[5])]);
        let mut driver = ReviewDriver::new(backend, Some("n5".to_string()), 20);
        driver.start().await.unwrap();
        driver.session_mut().reveal().unwrap();
        driver.grade(Grade::Hard).await.unwrap();

        let outcome = driver.undo().unwrap();
        assert_eq!(outcome.card_id, 5);
        assert!(outcome.server_grade_kept);
        assert_eq!(driver.backend().submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generated_content_is_cached_on_card() {
        let backend = FakeBackend::with_batches(vec![cards(&[9])]);
        let mut driver = ReviewDriver::new(backend, None, 20);
        driver.start().await.unwrap();
        driver.session_mut().reveal().unwrap();

        assert_eq!(driver.mnemonic().await.unwrap(), "mnemonic for 9");
        assert_eq!(driver.mnemonic().await.unwrap(), "mnemonic for 9");
        assert_eq!(driver.sentence().await.unwrap(), "sentence for 9");
        assert_eq!(driver.sentence().await.unwrap(), "sentence for 9");
        assert_eq!(driver.backend().generated.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_continue_and_restart() {
        let backend = FakeBackend::with_batches(vec![cards(&[1]), cards(&[2, 3]), cards(&[4])]);
        let mut driver = ReviewDriver::new(backend, None, 20);
        driver.start().await.unwrap();
        driver.session_mut().reveal().unwrap();
        driver.grade(Grade::Good).await.unwrap();
        assert!(driver.session().is_finished());

        driver.continue_session().await.unwrap();
        assert_eq!(driver.session().remaining(), 2);
        assert_eq!(driver.session().stats().total, 1);

        driver.restart().await.unwrap();
        assert_eq!(driver.session().remaining(), 1);
        assert_eq!(driver.session().stats().total, 0);
    }
}
