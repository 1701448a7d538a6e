//! Domain Model
//!
//! Shapes returned by the study backend. The client never computes these; it
//! deserializes them leniently and renders them.

mod card;
mod content;
mod dashboard;
mod deck;
mod practice;
mod user;

pub use card::{Card, CardProgress, CardUpdate, ExampleSentence, Grade};
pub use content::{DictionaryEntry, Material, Note, NoteDraft, Particle};
pub use dashboard::{ChartDay, Dashboard};
pub use deck::{group_by_level, Deck};
pub use practice::{MessageReply, NewPracticeSession, PracticeMessage, PracticeSession, Role};
pub use user::{
    AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, ResetPasswordRequest, User,
    UserSettings,
};
