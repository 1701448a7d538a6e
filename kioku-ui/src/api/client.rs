//! HTTP API Client
//!
//! Functions for talking to the study backend from the browser. Routes,
//! envelopes and error bodies are shared with the `kioku` crate; this file
//! only owns the `gloo-net` transport.

use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use kioku::api::envelope::{decode, decode_item, decode_list, error_for_status, MessageResponse};
use kioku::api::{paths, DEFAULT_API_BASE};
use kioku::models::{
    AuthResponse, Card, Dashboard, Deck, Grade, LoginRequest, MessageReply, NewPracticeSession,
    PracticeSession, ProfileUpdate, RegisterRequest, ResetPasswordRequest, User,
};
use kioku::ClientError;

use crate::storage::{session, BrowserRedirect};

/// localStorage key overriding the API base URL
const API_URL_KEY: &str = "kioku_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(API_URL_KEY).ok().flatten())
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

enum Method {
    Get,
    Post,
    Put,
    Delete,
}

enum Payload {
    None,
    Json(serde_json::Value),
    Form(web_sys::FormData),
}

fn json<T: Serialize>(value: &T) -> Result<Payload, String> {
    serde_json::to_value(value)
        .map(Payload::Json)
        .map_err(|e| format!("Request build error: {}", e))
}

/// Send a request and return the body of a 2xx response.
///
/// A 401 clears the stored session and sends the browser to the login page.
async fn send(method: Method, endpoint: &str, payload: Payload) -> Result<String, ClientError> {
    let url = paths::url(&get_api_base(), endpoint);
    let session = session();

    let mut builder: RequestBuilder = match method {
        Method::Get => Request::get(&url),
        Method::Post => Request::post(&url),
        Method::Put => Request::put(&url),
        Method::Delete => Request::delete(&url),
    };
    builder = builder.header("Accept", "application/json");
    if let Some(token) = session.token() {
        builder = builder.header("Authorization", &format!("Bearer {}", token));
    }

    let request = match payload {
        Payload::None => builder.build(),
        Payload::Json(value) => builder.json(&value),
        // The browser sets the multipart boundary itself
        Payload::Form(form) => builder.body(form),
    }
    .map_err(|e| ClientError::Decode(format!("Request build error: {}", e)))?;

    let response = request
        .send()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;

    if response.status() == 401 {
        return Err(session.expire(&BrowserRedirect));
    }

    let text = response
        .text()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;

    if !response.ok() {
        let err = error_for_status(response.status(), &text);
        web_sys::console::warn_1(&format!("{} failed: {}", endpoint, err).into());
        return Err(err);
    }

    Ok(text)
}

async fn get_list<T: DeserializeOwned>(endpoint: &str) -> Result<Vec<T>, String> {
    let body = send(Method::Get, endpoint, Payload::None).await.map_err(|e| e.to_string())?;
    decode_list(&body).map_err(|e| e.to_string())
}

async fn get_item<T: DeserializeOwned>(endpoint: &str) -> Result<T, String> {
    let body = send(Method::Get, endpoint, Payload::None).await.map_err(|e| e.to_string())?;
    decode_item(&body).map_err(|e| e.to_string())
}

async fn post_item<T: DeserializeOwned>(endpoint: &str, payload: Payload) -> Result<T, String> {
    let body = send(Method::Post, endpoint, payload).await.map_err(|e| e.to_string())?;
    decode_item(&body).map_err(|e| e.to_string())
}

// ============ Auth ============

pub async fn login(email: &str, password: &str) -> Result<User, String> {
    let auth: AuthResponse = post_item(
        &paths::login(),
        json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?,
    )
    .await?;
    session()
        .sign_in(&auth.token, &auth.user)
        .map_err(|e| e.to_string())?;
    Ok(auth.user)
}

pub async fn register(request: &RegisterRequest) -> Result<User, String> {
    let auth: AuthResponse = post_item(&paths::register(), json(request)?).await?;
    session()
        .sign_in(&auth.token, &auth.user)
        .map_err(|e| e.to_string())?;
    Ok(auth.user)
}

/// Log out on the server; the local session is cleared regardless
pub async fn logout() {
    if let Err(e) = send(Method::Post, &paths::logout(), Payload::None).await {
        web_sys::console::warn_1(&format!("Logout request failed: {}", e).into());
    }
    if let Err(e) = session().clear() {
        web_sys::console::error_1(&format!("Failed to clear session: {}", e).into());
    }
}

pub async fn forgot_password(email: &str) -> Result<Option<String>, String> {
    #[derive(Serialize)]
    struct ForgotRequest<'a> {
        email: &'a str,
    }

    let body = send(
        Method::Post,
        &paths::forgot_password(),
        json(&ForgotRequest { email })?,
    )
    .await
    .map_err(|e| e.to_string())?;
    let response: MessageResponse = decode(&body).map_err(|e| e.to_string())?;
    Ok(response.message)
}

pub async fn reset_password(request: &ResetPasswordRequest) -> Result<Option<String>, String> {
    let body = send(Method::Post, &paths::reset_password(), json(request)?)
        .await
        .map_err(|e| e.to_string())?;
    let response: MessageResponse = decode(&body).map_err(|e| e.to_string())?;
    Ok(response.message)
}

// ============ Profile ============

pub async fn fetch_me() -> Result<User, String> {
    let user: User = get_item(&paths::me()).await?;
    session().set_user(&user).map_err(|e| e.to_string())?;
    Ok(user)
}

pub async fn update_profile(update: &ProfileUpdate) -> Result<User, String> {
    let body = send(Method::Put, &paths::me(), json(update)?)
        .await
        .map_err(|e| e.to_string())?;
    let user: User = decode_item(&body).map_err(|e| e.to_string())?;
    session().set_user(&user).map_err(|e| e.to_string())?;
    Ok(user)
}

/// Upload a new avatar picked from a file input
pub async fn upload_avatar(file: &web_sys::File) -> Result<User, String> {
    let form = web_sys::FormData::new().map_err(|e| format!("{:?}", e))?;
    form.append_with_blob_and_filename("avatar", file, &file.name())
        .map_err(|e| format!("{:?}", e))?;

    let user: User = post_item(&paths::me_avatar(), Payload::Form(form)).await?;
    session().set_user(&user).map_err(|e| e.to_string())?;
    Ok(user)
}

// ============ Dashboard & decks ============

pub async fn fetch_dashboard() -> Result<Dashboard, String> {
    get_item(&paths::dashboard()).await
}

pub async fn fetch_decks() -> Result<Vec<Deck>, String> {
    get_list(&paths::decks()).await
}

pub async fn fetch_deck(slug: &str) -> Result<Deck, String> {
    get_item(&paths::deck(slug)).await
}

pub async fn fetch_deck_cards(slug: &str) -> Result<Vec<Card>, String> {
    get_list(&paths::deck_cards(slug)).await
}

// ============ Review ============

pub async fn fetch_review_queue(deck: Option<&str>, limit: u32) -> Result<Vec<Card>, String> {
    get_list(&paths::review_queue(deck, limit)).await
}

pub async fn submit_grade(card_id: i64, grade: Grade, time_ms: i64) -> Result<(), String> {
    #[derive(Serialize)]
    struct GradeRequest {
        card_id: i64,
        grade: Grade,
        time_ms: i64,
    }

    send(
        Method::Post,
        &paths::review_grade(),
        json(&GradeRequest {
            card_id,
            grade,
            time_ms,
        })?,
    )
    .await
    .map_err(|e| e.to_string())?;
    Ok(())
}

#[derive(Deserialize)]
struct Generated {
    #[serde(alias = "mnemonic", alias = "sentence", alias = "data")]
    text: String,
}

pub async fn generate_mnemonic(card_id: i64) -> Result<String, String> {
    let generated: Generated = post_item(&paths::card_mnemonic(card_id), Payload::None).await?;
    Ok(generated.text)
}

pub async fn generate_sentence(card_id: i64) -> Result<String, String> {
    let generated: Generated = post_item(&paths::card_sentence(card_id), Payload::None).await?;
    Ok(generated.text)
}

// ============ Practice ============

pub async fn fetch_practice_sessions() -> Result<Vec<PracticeSession>, String> {
    get_list(&paths::practice_sessions()).await
}

pub async fn fetch_practice_session(id: i64) -> Result<PracticeSession, String> {
    get_item(&paths::practice_session(id)).await
}

pub async fn create_practice_session(context: Option<String>) -> Result<PracticeSession, String> {
    post_item(
        &paths::practice_sessions(),
        json(&NewPracticeSession {
            context,
            material_id: None,
        })?,
    )
    .await
}

pub async fn delete_practice_session(id: i64) -> Result<(), String> {
    send(Method::Delete, &paths::practice_session(id), Payload::None)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

pub async fn send_practice_message(session_id: i64, content: &str) -> Result<MessageReply, String> {
    #[derive(Serialize)]
    struct MessageRequest<'a> {
        content: &'a str,
    }

    post_item(
        &paths::practice_messages(session_id),
        json(&MessageRequest { content })?,
    )
    .await
}
