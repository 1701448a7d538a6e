//! Typed endpoint calls
//!
//! One method per backend operation the front ends use. Auth calls also
//! keep the session in step with the server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::body::{mime_for, FormPart, RequestBody};
use super::client::ApiClient;
use super::envelope::MessageResponse;
use super::paths;
use crate::error::ClientResult;
use crate::models::{
    AuthResponse, Card, CardUpdate, Dashboard, Deck, DictionaryEntry, Grade, LoginRequest,
    Material, MessageReply, NewPracticeSession, Note, NoteDraft, Particle, PracticeSession,
    ProfileUpdate, RegisterRequest, ResetPasswordRequest, User,
};
use crate::review::ReviewBackend;
use crate::session::KeyValueStore;

#[derive(Debug, Serialize)]
struct GradeRequest {
    card_id: i64,
    grade: Grade,
    time_ms: i64,
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeneratedMnemonic {
    #[serde(alias = "text", alias = "data")]
    mnemonic: String,
}

#[derive(Debug, Deserialize)]
struct GeneratedSentence {
    #[serde(alias = "text", alias = "data")]
    sentence: String,
}

impl<S: KeyValueStore> ApiClient<S> {
    // ============ Auth ============

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let body = RequestBody::json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let auth: AuthResponse = self.post_item(&paths::login(), body).await?;
        self.session().sign_in(&auth.token, &auth.user)?;
        Ok(auth.user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<User> {
        let auth: AuthResponse = self
            .post_item(&paths::register(), RequestBody::json(request)?)
            .await?;
        self.session().sign_in(&auth.token, &auth.user)?;
        Ok(auth.user)
    }

    /// Ask the server to drop the token; the local session is cleared either way
    pub async fn logout(&self) -> ClientResult<()> {
        if self.session().is_authenticated() {
            if let Err(e) = self
                .post::<serde_json::Value>(&paths::logout(), RequestBody::Empty)
                .await
            {
                tracing::warn!("Server-side logout failed: {}", e);
            }
        }
        self.session().clear()
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<Option<String>> {
        let response: MessageResponse = self
            .post(&paths::forgot_password(), RequestBody::json(&EmailRequest { email })?)
            .await?;
        Ok(response.message)
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> ClientResult<Option<String>> {
        let response: MessageResponse = self
            .post(&paths::reset_password(), RequestBody::json(request)?)
            .await?;
        Ok(response.message)
    }

    // ============ Profile ============

    /// Fetch the profile and refresh the cached copy
    pub async fn me(&self) -> ClientResult<User> {
        let user: User = self.get_item(&paths::me()).await?;
        self.session().set_user(&user)?;
        Ok(user)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        let user: User = self.put_item(&paths::me(), RequestBody::json(update)?).await?;
        self.session().set_user(&user)?;
        Ok(user)
    }

    pub async fn upload_avatar(&self, filename: &str, bytes: Vec<u8>) -> ClientResult<User> {
        let body = RequestBody::Form(vec![FormPart::file(
            "avatar",
            filename,
            mime_for(filename),
            bytes,
        )]);
        let user: User = self.post_item(&paths::me_avatar(), body).await?;
        self.session().set_user(&user)?;
        Ok(user)
    }

    // ============ Dashboard & decks ============

    pub async fn dashboard(&self) -> ClientResult<Dashboard> {
        self.get_item(&paths::dashboard()).await
    }

    pub async fn decks(&self) -> ClientResult<Vec<Deck>> {
        self.get_list(&paths::decks()).await
    }

    pub async fn deck(&self, slug: &str) -> ClientResult<Deck> {
        self.get_item(&paths::deck(slug)).await
    }

    pub async fn deck_cards(&self, slug: &str) -> ClientResult<Vec<Card>> {
        self.get_list(&paths::deck_cards(slug)).await
    }

    // ============ Cards ============

    pub async fn card(&self, id: i64) -> ClientResult<Card> {
        self.get_item(&paths::card(id)).await
    }

    pub async fn update_card(&self, id: i64, update: &CardUpdate) -> ClientResult<Card> {
        self.put_item(&paths::card(id), RequestBody::json(update)?).await
    }

    pub async fn delete_card(&self, id: i64) -> ClientResult<()> {
        self.delete(&paths::card(id)).await
    }

    pub async fn generate_mnemonic(&self, card_id: i64) -> ClientResult<String> {
        let generated: GeneratedMnemonic = self
            .post_item(&paths::card_mnemonic(card_id), RequestBody::Empty)
            .await?;
        Ok(generated.mnemonic)
    }

    pub async fn generate_sentence(&self, card_id: i64) -> ClientResult<String> {
        let generated: GeneratedSentence = self
            .post_item(&paths::card_sentence(card_id), RequestBody::Empty)
            .await?;
        Ok(generated.sentence)
    }

    // ============ Review ============

    pub async fn review_queue(&self, deck: Option<&str>, limit: u32) -> ClientResult<Vec<Card>> {
        self.get_list(&paths::review_queue(deck, limit)).await
    }

    pub async fn submit_grade(&self, card_id: i64, grade: Grade, time_ms: i64) -> ClientResult<()> {
        let body = RequestBody::json(&GradeRequest {
            card_id,
            grade,
            time_ms,
        })?;
        self.post::<serde_json::Value>(&paths::review_grade(), body).await?;
        Ok(())
    }

    // ============ Practice ============

    pub async fn practice_sessions(&self) -> ClientResult<Vec<PracticeSession>> {
        self.get_list(&paths::practice_sessions()).await
    }

    pub async fn practice_session(&self, id: i64) -> ClientResult<PracticeSession> {
        self.get_item(&paths::practice_session(id)).await
    }

    pub async fn create_practice_session(&self, new: &NewPracticeSession) -> ClientResult<PracticeSession> {
        self.post_item(&paths::practice_sessions(), RequestBody::json(new)?)
            .await
    }

    pub async fn delete_practice_session(&self, id: i64) -> ClientResult<()> {
        self.delete(&paths::practice_session(id)).await
    }

    pub async fn send_practice_message(&self, session_id: i64, content: &str) -> ClientResult<MessageReply> {
        self.post_item(
            &paths::practice_messages(session_id),
            RequestBody::json(&MessageRequest { content })?,
        )
        .await
    }

    // ============ Reference content ============

    pub async fn particles(&self) -> ClientResult<Vec<Particle>> {
        self.get_list(&paths::particles()).await
    }

    pub async fn particle(&self, id: i64) -> ClientResult<Particle> {
        self.get_item(&paths::particle(id)).await
    }

    pub async fn materials(&self) -> ClientResult<Vec<Material>> {
        self.get_list(&paths::materials()).await
    }

    pub async fn material(&self, id: i64) -> ClientResult<Material> {
        self.get_item(&paths::material(id)).await
    }

    pub async fn notes(&self) -> ClientResult<Vec<Note>> {
        self.get_list(&paths::notes()).await
    }

    pub async fn create_note(&self, draft: &NoteDraft) -> ClientResult<Note> {
        self.post_item(&paths::notes(), RequestBody::json(draft)?).await
    }

    pub async fn update_note(&self, id: i64, draft: &NoteDraft) -> ClientResult<Note> {
        self.put_item(&paths::note(id), RequestBody::json(draft)?).await
    }

    pub async fn delete_note(&self, id: i64) -> ClientResult<()> {
        self.delete(&paths::note(id)).await
    }

    pub async fn lookup(&self, word: &str) -> ClientResult<Vec<DictionaryEntry>> {
        self.get_list(&paths::dictionary_lookup(word)).await
    }
}

#[async_trait]
impl<S> ReviewBackend for ApiClient<S>
where
    S: KeyValueStore + Send + Sync,
{
    async fn fetch_queue(&self, deck: Option<&str>, limit: u32) -> ClientResult<Vec<Card>> {
        self.review_queue(deck, limit).await
    }

    async fn submit_grade(&self, card_id: i64, grade: Grade, elapsed_ms: i64) -> ClientResult<()> {
        ApiClient::submit_grade(self, card_id, grade, elapsed_ms).await
    }

    async fn generate_mnemonic(&self, card_id: i64) -> ClientResult<String> {
        ApiClient::generate_mnemonic(self, card_id).await
    }

    async fn generate_sentence(&self, card_id: i64) -> ClientResult<String> {
        ApiClient::generate_sentence(self, card_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::client::tests::{signed_in_client, spawn_server};
    use super::*;
    use crate::error::ClientError;
    use crate::session::{MemoryStore, NoRedirect, Session};
    use axum::extract::Query;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_login_signs_in() {
        let app = Router::new().route(
            "/api/v1/auth/login",
            post(|Json(body): Json<serde_json::Value>| async move {
                Json(serde_json::json!({
                    "token": "fresh",
                    "user": {"id": 3, "name": "Dewi", "email": body["email"]}
                }))
            }),
        );
        let base = spawn_server(app).await;

        let session = Arc::new(Session::new(MemoryStore::new()));
        let config = crate::config::ApiConfig {
            base_url: base,
            request_timeout_secs: 5,
        };
        let client = ApiClient::new(&config, session, Arc::new(NoRedirect)).unwrap();

        let user = client.login("dewi@example.com", "hunter2").await.unwrap();
        assert_eq!(user.email, "dewi@example.com");
        assert_eq!(client.session().token().as_deref(), Some("fresh"));
        assert_eq!(client.session().user().unwrap().name, "Dewi");
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        let app = Router::new().route(
            "/api/v1/auth/logout",
            post(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let (client, _) = signed_in_client(spawn_server(app).await);

        client.logout().await.unwrap();
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_review_queue_and_grade() {
        let grades: Arc<Mutex<Vec<serde_json::Value>>> = Arc::default();
        let recorded = grades.clone();

        let app = Router::new()
            .route(
                "/api/v1/review/queue",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    assert_eq!(q.get("limit").map(String::as_str), Some("2"));
                    assert_eq!(q.get("deck").map(String::as_str), Some("n5"));
                    Json(serde_json::json!({"data": [
                        {"id": 1, "kana": "ねこ", "meaning_en": "cat"},
                        {"id": 2, "kana": "いぬ", "meaning_en": "dog"}
                    ]}))
                }),
            )
            .route(
                "/api/v1/review/grade",
                post(move |Json(body): Json<serde_json::Value>| async move {
                    recorded.lock().unwrap().push(body);
                    axum::http::StatusCode::NO_CONTENT
                }),
            );
        let (client, _) = signed_in_client(spawn_server(app).await);

        let queue = client.review_queue(Some("n5"), 2).await.unwrap();
        assert_eq!(queue.len(), 2);

        client.submit_grade(1, Grade::Hard, 4200).await.unwrap();
        assert_eq!(
            grades.lock().unwrap()[0],
            serde_json::json!({"card_id": 1, "grade": "hard", "time_ms": 4200})
        );
    }

    #[tokio::test]
    async fn test_generate_sentence_shapes() {
        let app = Router::new()
            .route(
                "/api/v1/cards/7/sentence",
                post(|| async { Json(serde_json::json!({"data": {"sentence": "猫がいる。"}})) }),
            )
            .route(
                "/api/v1/cards/7/mnemonic",
                post(|| async { Json(serde_json::json!({"text": "Neko naps."})) }),
            );
        let (client, _) = signed_in_client(spawn_server(app).await);

        assert_eq!(client.generate_sentence(7).await.unwrap(), "猫がいる。");
        assert_eq!(client.generate_mnemonic(7).await.unwrap(), "Neko naps.");
    }

    #[tokio::test]
    async fn test_me_refreshes_cached_user() {
        let app = Router::new().route(
            "/api/v1/me",
            get(|| async {
                Json(serde_json::json!({
                    "data": {"id": 1, "name": "Ayu Lestari", "email": "ayu@example.com",
                             "settings": {"whatsapp_number": "+62812"}}
                }))
            }),
        );
        let (client, _) = signed_in_client(spawn_server(app).await);

        client.me().await.unwrap();
        let cached = client.session().user().unwrap();
        assert_eq!(cached.name, "Ayu Lestari");
        assert_eq!(cached.settings.whatsapp_number.as_deref(), Some("+62812"));
    }

    #[tokio::test]
    async fn test_practice_message_reply() {
        let app = Router::new().route(
            "/api/v1/practice/sessions/4/messages",
            post(|Json(body): Json<serde_json::Value>| async move {
                Json(serde_json::json!({
                    "user_message": {"id": 10, "role": "user", "content": body["content"]},
                    "assistant_message": {"id": 11, "role": "assistant", "content": "いいですね"}
                }))
            }),
        );
        let (client, _) = signed_in_client(spawn_server(app).await);

        let reply = client.send_practice_message(4, "こんにちは").await.unwrap();
        assert_eq!(reply.user_message.unwrap().content, "こんにちは");
        assert_eq!(reply.assistant_message.content, "いいですね");
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let app = Router::new().route(
            "/api/v1/dictionary/lookup",
            get(|| async {
                (
                    axum::http::StatusCode::NOT_FOUND,
                    Json(serde_json::json!({"message": "No entries"})),
                )
            }),
        );
        let (client, _) = signed_in_client(spawn_server(app).await);

        let err = client.lookup("ねこ").await.unwrap_err();
        assert_eq!(err, ClientError::Api { status: 404, message: "No entries".to_string() });
    }
}
