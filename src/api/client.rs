//! HTTP API Client
//!
//! Thin wrapper over `reqwest` for the study backend: injects the bearer
//! token, serializes bodies, handles 401 centrally and turns error bodies
//! into [`ClientError`]s.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{multipart, Method};
use serde::de::DeserializeOwned;

use super::body::{FormValue, RequestBody};
use super::envelope::{decode, decode_item, decode_list, error_for_status};
use super::paths;
use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::{KeyValueStore, LoginRedirect, Session};

/// REST client bound to one session
pub struct ApiClient<S> {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session<S>>,
    redirect: Arc<dyn LoginRedirect + Send + Sync>,
}

impl<S: KeyValueStore> ApiClient<S> {
    pub fn new(
        config: &ApiConfig,
        session: Arc<Session<S>>,
        redirect: Arc<dyn LoginRedirect + Send + Sync>,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            redirect,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        let body = self.send(Method::GET, endpoint, RequestBody::Empty).await?;
        decode(&body)
    }

    pub async fn post<T: DeserializeOwned>(&self, endpoint: &str, body: RequestBody) -> ClientResult<T> {
        let body = self.send(Method::POST, endpoint, body).await?;
        decode(&body)
    }

    pub async fn put<T: DeserializeOwned>(&self, endpoint: &str, body: RequestBody) -> ClientResult<T> {
        let body = self.send(Method::PUT, endpoint, body).await?;
        decode(&body)
    }

    pub async fn delete(&self, endpoint: &str) -> ClientResult<()> {
        self.send(Method::DELETE, endpoint, RequestBody::Empty).await?;
        Ok(())
    }

    /// GET a list that may come bare or wrapped in `data`
    pub async fn get_list<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<Vec<T>> {
        let body = self.send(Method::GET, endpoint, RequestBody::Empty).await?;
        decode_list(&body)
    }

    /// GET a single item that may come bare or wrapped in `data`
    pub async fn get_item<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        let body = self.send(Method::GET, endpoint, RequestBody::Empty).await?;
        decode_item(&body)
    }

    pub(crate) async fn post_item<T: DeserializeOwned>(&self, endpoint: &str, body: RequestBody) -> ClientResult<T> {
        let body = self.send(Method::POST, endpoint, body).await?;
        decode_item(&body)
    }

    pub(crate) async fn put_item<T: DeserializeOwned>(&self, endpoint: &str, body: RequestBody) -> ClientResult<T> {
        let body = self.send(Method::PUT, endpoint, body).await?;
        decode_item(&body)
    }

    /// Issue a request and return the raw body of a 2xx response
    async fn send(&self, method: Method, endpoint: &str, body: RequestBody) -> ClientResult<String> {
        let url = paths::url(&self.base_url, endpoint);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }

        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Form(parts) => request.multipart(build_form(parts)?),
        };

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!("{} {} answered 401, clearing session", method, endpoint);
            return Err(self.session.expire(self.redirect.as_ref()));
        }

        let text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            let err = error_for_status(status.as_u16(), &text);
            tracing::warn!("{} {} failed ({}): {}", method, endpoint, status.as_u16(), err);
            return Err(err);
        }

        Ok(text)
    }
}

fn build_form(parts: Vec<super::body::FormPart>) -> ClientResult<multipart::Form> {
    let mut form = multipart::Form::new();
    for part in parts {
        form = match part.value {
            FormValue::Text(text) => form.text(part.name, text),
            FormValue::File {
                filename,
                mime,
                bytes,
            } => {
                let file = multipart::Part::bytes(bytes)
                    .file_name(filename)
                    .mime_str(&mime)
                    .map_err(|e| ClientError::Decode(format!("Invalid upload type: {}", e)))?;
                form.part(part.name, file)
            }
        };
    }
    Ok(form)
}

fn map_transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else if e.is_decode() {
        ClientError::Decode(e.to_string())
    } else {
        ClientError::Network(e.to_string())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Deck, User, UserSettings};
    use crate::session::{MemoryStore, TOKEN_KEY, USER_KEY};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{delete, get, post, put};
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    pub(crate) struct CountingRedirect(pub AtomicU32);

    impl LoginRedirect for CountingRedirect {
        fn redirect_to_login(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Serve `app` on an ephemeral port and return its base URL
    pub(crate) async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    pub(crate) fn signed_in_client(
        base_url: String,
    ) -> (ApiClient<MemoryStore>, Arc<CountingRedirect>) {
        let session = Arc::new(Session::new(MemoryStore::new()));
        session
            .sign_in(
                "secret-token",
                &User {
                    id: 1,
                    name: "Ayu".to_string(),
                    email: "ayu@example.com".to_string(),
                    settings: UserSettings::default(),
                },
            )
            .unwrap();

        let redirect = Arc::new(CountingRedirect::default());
        let config = ApiConfig {
            base_url,
            request_timeout_secs: 5,
        };
        let client = ApiClient::new(&config, session, redirect.clone()).unwrap();
        (client, redirect)
    }

    async fn unauthorized() -> (StatusCode, Json<serde_json::Value>) {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"message": "Unauthenticated."})),
        )
    }

    #[tokio::test]
    async fn test_bearer_token_injected() {
        let app = Router::new().route(
            "/api/v1/me",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(serde_json::json!({"id": 1, "name": auth, "email": "ayu@example.com"}))
            }),
        );
        let (client, _) = signed_in_client(spawn_server(app).await);

        let user: User = client.get("/api/v1/me").await.unwrap();
        assert_eq!(user.name, "Bearer secret-token");
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_for_every_method() {
        let app = Router::new()
            .route("/api/v1/decks", get(unauthorized))
            .route("/api/v1/review/grade", post(unauthorized))
            .route("/api/v1/me", put(unauthorized))
            .route("/api/v1/cards/1", delete(unauthorized));
        let base = spawn_server(app).await;

        for method in ["GET", "POST", "PUT", "DELETE"] {
            let (client, redirect) = signed_in_client(base.clone());

            let result = match method {
                "GET" => client.get::<serde_json::Value>("/api/v1/decks").await.map(|_| ()),
                "POST" => client
                    .post::<serde_json::Value>("/api/v1/review/grade", RequestBody::Empty)
                    .await
                    .map(|_| ()),
                "PUT" => client
                    .put::<serde_json::Value>("/api/v1/me", RequestBody::Empty)
                    .await
                    .map(|_| ()),
                _ => client.delete("/api/v1/cards/1").await,
            };

            assert_eq!(result, Err(ClientError::Unauthorized), "{}", method);
            assert_eq!(redirect.0.load(Ordering::SeqCst), 1, "{}", method);
            assert!(client.session().store().get(TOKEN_KEY).is_none(), "{}", method);
            assert!(client.session().store().get(USER_KEY).is_none(), "{}", method);
        }
    }

    #[tokio::test]
    async fn test_error_message_from_server() {
        let app = Router::new().route(
            "/api/v1/decks/missing",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(serde_json::json!({"message": "Deck not found"})),
                )
            }),
        );
        let (client, redirect) = signed_in_client(spawn_server(app).await);

        let err = client.get_item::<Deck>("/api/v1/decks/missing").await.unwrap_err();
        assert_eq!(
            err,
            ClientError::Api {
                status: 404,
                message: "Deck not found".to_string()
            }
        );
        assert_eq!(redirect.0.load(Ordering::SeqCst), 0);
        assert!(client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_error_without_message() {
        let app = Router::new().route(
            "/api/v1/dashboard",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let (client, _) = signed_in_client(spawn_server(app).await);

        let err = client.get::<serde_json::Value>("/api/v1/dashboard").await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[tokio::test]
    async fn test_json_body_and_list_envelope() {
        let app = Router::new().route(
            "/api/v1/echo",
            post(|Json(body): Json<serde_json::Value>| async move {
                Json(serde_json::json!({"data": [body]}))
            }),
        );
        let (client, _) = signed_in_client(spawn_server(app).await);

        let body = RequestBody::json(&serde_json::json!({"grade": "good"})).unwrap();
        let echoed: crate::api::envelope::ListEnvelope<serde_json::Value> =
            client.post("/api/v1/echo", body).await.unwrap();
        assert_eq!(echoed.into_vec(), vec![serde_json::json!({"grade": "good"})]);
    }

    #[tokio::test]
    async fn test_network_error() {
        let (client, _) = signed_in_client("http://127.0.0.1:9".to_string());
        let err = client.get::<serde_json::Value>("/api/v1/me").await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_) | ClientError::Timeout));
    }
}
