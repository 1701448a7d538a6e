//! # Kioku
//!
//! Client core for a Japanese spaced-repetition study service: the REST
//! API wrapper, the review-session state machine, local answer checking,
//! streak statistics, the practice chat and the persisted client session.
//!
//! The scheduling itself happens on the server. Everything here is what a
//! front end needs around it, shared by the terminal client (`kioku` binary)
//! and the browser front end (`kioku-ui`, built with
//! `default-features = false`).
//!
//! ## Modules
//!
//! - [`models`]: wire types (cards, decks, users, practice sessions)
//! - [`api`]: endpoint paths, envelopes and the HTTP client
//! - [`session`]: token, cached profile and UI preferences
//! - [`review`]: answer matching and the review flow
//! - [`stats`]: streaks and weekly summaries
//! - [`practice`]: optimistic practice conversation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kioku::{ApiClient, Config, MemoryStore, NoRedirect, ReviewDriver, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let session = Arc::new(Session::new(MemoryStore::new()));
//!     let client = ApiClient::new(&config.api, session, Arc::new(NoRedirect))?;
//!
//!     client.login("ayu@example.com", "secret").await?;
//!
//!     let mut review = ReviewDriver::new(client, None, config.review.batch_size);
//!     review.start().await?;
//!     if let Some(card) = review.session().current() {
//!         println!("First card: {}", card.prompt());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod practice;
pub mod review;
pub mod session;
pub mod stats;

#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod logging;

// Re-export top-level types for convenience
pub use error::{ClientError, ClientResult};

pub use models::{
    AuthResponse, Card, CardProgress, CardUpdate, ChartDay, Dashboard, Deck, DictionaryEntry,
    ExampleSentence, Grade, Material, MessageReply, Note, NoteDraft, Particle, PracticeMessage,
    PracticeSession, Role, User, UserSettings,
};

pub use review::{
    check_answer, AnswerCheck, AnswerMatch, GradeCommand, Phase, ReviewError, ReviewSession,
    SessionStats,
};

pub use session::{KeyValueStore, LoginRedirect, MemoryStore, NoRedirect, Session};

pub use stats::{streak, summarize, WeekSummary};

pub use practice::{Conversation, ConversationEntry, ConversationError, PendingMessage};

#[cfg(feature = "native")]
pub use api::ApiClient;

#[cfg(feature = "native")]
pub use review::{ReviewBackend, ReviewDriver, UndoOutcome};

#[cfg(feature = "native")]
pub use session::FileStore;

#[cfg(feature = "native")]
pub use config::{Config, ConfigError};
