//! Practice Conversation
//!
//! Local view of a practice session's messages. A sent message shows up
//! immediately as pending; the server's reply either confirms it or the
//! pending entry is taken back out.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{MessageReply, PracticeMessage, PracticeSession, Role};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Still waiting for the tutor to answer")]
    AwaitingReply,

    #[error("Pending message {0} not found")]
    UnknownPending(Uuid),
}

/// Handle for an optimistic append, used to confirm or roll it back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMessage {
    pub local_id: Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversationEntry {
    Confirmed(PracticeMessage),
    Pending { local_id: Uuid, content: String },
}

impl ConversationEntry {
    pub fn role(&self) -> Role {
        match self {
            ConversationEntry::Confirmed(m) => m.role,
            ConversationEntry::Pending { .. } => Role::User,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            ConversationEntry::Confirmed(m) => &m.content,
            ConversationEntry::Pending { content, .. } => content,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ConversationEntry::Pending { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Conversation {
    session_id: i64,
    entries: Vec<ConversationEntry>,
}

impl Conversation {
    pub fn new(session_id: i64) -> Self {
        Self {
            session_id,
            entries: Vec::new(),
        }
    }

    pub fn from_session(session: &PracticeSession) -> Self {
        Self {
            session_id: session.id,
            entries: session
                .messages
                .iter()
                .cloned()
                .map(ConversationEntry::Confirmed)
                .collect(),
        }
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.entries.iter().any(ConversationEntry::is_pending)
    }

    /// Append the user's message before the server has seen it
    pub fn send(&mut self, content: &str) -> Result<PendingMessage, ConversationError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ConversationError::EmptyMessage);
        }
        if self.is_awaiting_reply() {
            return Err(ConversationError::AwaitingReply);
        }

        let local_id = Uuid::new_v4();
        self.entries.push(ConversationEntry::Pending {
            local_id,
            content: content.to_string(),
        });
        Ok(PendingMessage { local_id })
    }

    /// Replace the pending entry with what the server stored, then append
    /// the tutor's answer
    pub fn confirm(
        &mut self,
        pending: PendingMessage,
        reply: MessageReply,
    ) -> Result<(), ConversationError> {
        let index = self.position(pending)?;

        let user_message = match reply.user_message {
            Some(message) => message,
            None => PracticeMessage {
                id: None,
                role: Role::User,
                content: self.entries[index].content().to_string(),
                created_at: None,
            },
        };

        self.entries[index] = ConversationEntry::Confirmed(user_message);
        self.entries
            .push(ConversationEntry::Confirmed(reply.assistant_message));
        Ok(())
    }

    /// Take a failed message back out; returns its text so the input can be refilled
    pub fn rollback(&mut self, pending: PendingMessage) -> Result<String, ConversationError> {
        let index = self.position(pending)?;
        let entry = self.entries.remove(index);
        tracing::debug!("Rolled back pending message {}", pending.local_id);
        Ok(entry.content().to_string())
    }

    fn position(&self, pending: PendingMessage) -> Result<usize, ConversationError> {
        self.entries
            .iter()
            .position(|e| matches!(e, ConversationEntry::Pending { local_id, .. } if *local_id == pending.local_id))
            .ok_or(ConversationError::UnknownPending(pending.local_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant(content: &str) -> PracticeMessage {
        PracticeMessage {
            id: Some(2),
            role: Role::Assistant,
            content: content.to_string(),
            created_at: None,
        }
    }

    fn session() -> PracticeSession {
        PracticeSession {
            id: 11,
            title: None,
            context: Some("At the station".to_string()),
            reading_reference: None,
            messages: vec![assistant("いらっしゃいませ")],
            created_at: None,
        }
    }

    #[test]
    fn test_send_then_confirm() {
        let mut convo = Conversation::from_session(&session());
        let pending = convo.send(" きっぷをください ").unwrap();
        assert!(convo.is_awaiting_reply());
        assert_eq!(convo.entries()[1].content(), "きっぷをください");

        convo
            .confirm(
                pending,
                MessageReply {
                    user_message: None,
                    assistant_message: assistant("どちらまでですか"),
                },
            )
            .unwrap();

        assert!(!convo.is_awaiting_reply());
        let roles: Vec<Role> = convo.entries().iter().map(|e| e.role()).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(convo.entries()[1].content(), "きっぷをください");
    }

    #[test]
    fn test_rollback_removes_only_pending() {
        let mut convo = Conversation::from_session(&session());
        let pending = convo.send("すみません").unwrap();

        let text = convo.rollback(pending).unwrap();
        assert_eq!(text, "すみません");
        assert_eq!(convo.entries().len(), 1);
        assert_eq!(convo.entries()[0].content(), "いらっしゃいませ");

        assert_eq!(
            convo.rollback(pending),
            Err(ConversationError::UnknownPending(pending.local_id))
        );
    }

    #[test]
    fn test_one_message_in_flight() {
        let mut convo = Conversation::new(1);
        assert_eq!(convo.send("   "), Err(ConversationError::EmptyMessage));

        convo.send("はい").unwrap();
        assert_eq!(convo.send("いいえ"), Err(ConversationError::AwaitingReply));
    }
}
