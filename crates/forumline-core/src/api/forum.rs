//! Typed forum operations on top of [`SessionedClient`].

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::TokenClaims;
use crate::models::{
    AuthSession, ForumStats, LoginRequest, Message, MessageQuery, NewMessage, NewThread,
    ProfileUpdate, Reaction, RegisterRequest, Thread, ThreadDetail, ThreadQuery, ThreadUpdate,
    User,
};

use super::client::SessionedClient;
use super::envelope::{RequestEnvelope, ResponseEnvelope};
use super::ApiError;

const LOGIN_ENDPOINT: &str = "/api/auth/login";
const REGISTER_ENDPOINT: &str = "/api/auth/register";
const THREADS_ENDPOINT: &str = "/api/threads";
const SEARCH_ENDPOINT: &str = "/api/threads/search";
const PROFILE_ENDPOINT: &str = "/api/users/me";
const USER_THREADS_ENDPOINT: &str = "/api/users/threads";
const USER_MESSAGES_ENDPOINT: &str = "/api/users/messages";
const STATS_ENDPOINT: &str = "/api/stats";

/// Reject blank required fields before anything goes over the wire.
fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::InvalidRequest(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

#[derive(Clone)]
pub struct ForumApi {
    client: SessionedClient,
}

impl ForumApi {
    pub fn new(client: SessionedClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SessionedClient {
        &self.client
    }

    // ===== Authentication =====

    /// Log in and store the returned token.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession, ApiError> {
        require("username", username)?;
        require("password", password)?;

        let request = RequestEnvelope::post(LOGIN_ENDPOINT).json(&LoginRequest {
            username: username.trim(),
            password,
        })?;
        let envelope = self.client.send(request).await?;

        let session: AuthSession = envelope.data_as()?;
        if session.token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "login response carried an empty token".to_string(),
            ));
        }
        self.client.store_credential(&session.token)?;
        info!(username = username.trim(), "Logged in");
        Ok(session)
    }

    /// Create an account. The backend answers with the new user; if it also
    /// hands out a token, that token is stored.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, ApiError> {
        require("username", username)?;
        require("email", email)?;
        require("password", password)?;

        let request = RequestEnvelope::post(REGISTER_ENDPOINT).json(&RegisterRequest {
            username: username.trim(),
            email: email.trim(),
            password,
        })?;
        let envelope = self.client.send(request).await?;

        let token: Option<String> = envelope.field_as("token")?;
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.client.store_credential(&token)?;
            debug!("Registration response included a token");
        }

        let user = match envelope.data.as_ref() {
            Some(data) if data.get("user").is_some() => envelope.field_as::<Option<User>>("user")?,
            Some(data) => match serde_json::from_value::<User>(data.clone()) {
                Ok(user) => Some(user),
                Err(e) => {
                    debug!(error = %e, "Registration response data is not a user record");
                    None
                }
            },
            None => None,
        };
        info!(username = username.trim(), "Registered account");
        Ok(user)
    }

    /// Drop the stored token. The caller decides where to go next.
    pub fn logout(&self) {
        self.client.clear_credential();
        info!("Logged out");
    }

    /// Identity from the stored token, decoded locally. A token that cannot
    /// be decoded is cleared.
    pub fn current_user(&self) -> Option<TokenClaims> {
        let token = self.client.credential()?;
        match TokenClaims::decode(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Stored token is unreadable, clearing it");
                self.client.clear_credential();
                None
            }
        }
    }

    // ===== Threads =====

    pub async fn list_threads(&self, query: &ThreadQuery) -> Result<Vec<Thread>, ApiError> {
        let mut request = RequestEnvelope::get(THREADS_ENDPOINT);
        request.query = query.to_query_pairs();
        let envelope = self.client.send(request).await?;
        let threads: Vec<Thread> = envelope.field_as("threads")?;
        debug!(count = threads.len(), page = query.page, "Fetched threads");
        Ok(threads)
    }

    pub async fn search_threads(
        &self,
        q: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Thread>, ApiError> {
        require("search query", q)?;

        let request = RequestEnvelope::get(SEARCH_ENDPOINT)
            .query("q", q.trim())
            .query("page", page.max(1))
            .query("per_page", per_page.max(1));
        let envelope = self.client.send(request).await?;
        let threads = Self::thread_list(&envelope)?;
        debug!(count = threads.len(), q = q.trim(), "Search returned threads");
        Ok(threads)
    }

    pub async fn get_thread(&self, id: i64) -> Result<ThreadDetail, ApiError> {
        let envelope = self.client.get(&format!("{}/{}", THREADS_ENDPOINT, id)).await?;
        envelope.data_as()
    }

    pub async fn create_thread(&self, thread: &NewThread) -> Result<Thread, ApiError> {
        require("title", &thread.title)?;
        require("description", &thread.description)?;

        let request = RequestEnvelope::post(THREADS_ENDPOINT).json(thread)?;
        let created: Thread = self.client.send(request).await?.data_as()?;
        info!(id = created.id, "Created thread");
        Ok(created)
    }

    pub async fn update_thread(&self, id: i64, update: &ThreadUpdate) -> Result<Thread, ApiError> {
        require("title", &update.title)?;
        require("description", &update.description)?;

        let request = RequestEnvelope::put(format!("{}/{}", THREADS_ENDPOINT, id)).json(update)?;
        let updated: Thread = self.client.send(request).await?.data_as()?;
        info!(id, "Updated thread");
        Ok(updated)
    }

    /// Returns the server's confirmation message, if any.
    pub async fn delete_thread(&self, id: i64) -> Result<Option<String>, ApiError> {
        let request = RequestEnvelope::delete(format!("{}/{}", THREADS_ENDPOINT, id));
        let envelope = self.client.send(request).await?;
        info!(id, "Deleted thread");
        Ok(envelope.message)
    }

    // ===== Messages =====

    pub async fn list_messages(
        &self,
        thread_id: i64,
        query: &MessageQuery,
    ) -> Result<Vec<Message>, ApiError> {
        let mut request = RequestEnvelope::get(format!("{}/{}/messages", THREADS_ENDPOINT, thread_id));
        request.query = query.to_query_pairs();
        let envelope = self.client.send(request).await?;

        // `{"messages": [...]}` from the paginated handler, a bare list otherwise
        match envelope.data {
            Some(Value::Array(_)) => envelope.data_as(),
            _ => envelope.field_as("messages"),
        }
    }

    pub async fn create_message(&self, thread_id: i64, content: &str) -> Result<Message, ApiError> {
        require("content", content)?;

        let request = RequestEnvelope::post(format!("{}/{}/messages", THREADS_ENDPOINT, thread_id))
            .json(&NewMessage { content })?;
        let message: Message = self.client.send(request).await?.data_as()?;
        info!(thread_id, id = message.id, "Posted message");
        Ok(message)
    }

    /// Like or dislike a message. Returns the server's confirmation text;
    /// the backend does not send the updated counts.
    pub async fn react(&self, message_id: i64, reaction: Reaction) -> Result<Option<String>, ApiError> {
        let endpoint = format!("/api/messages/{}/{}", message_id, reaction.path_segment());
        let request = RequestEnvelope::post(endpoint);
        let envelope = self.client.send(request).await?;
        debug!(message_id, %reaction, "Reaction recorded");
        Ok(envelope.message)
    }

    pub async fn like_message(&self, message_id: i64) -> Result<Option<String>, ApiError> {
        self.react(message_id, Reaction::Like).await
    }

    pub async fn dislike_message(&self, message_id: i64) -> Result<Option<String>, ApiError> {
        self.react(message_id, Reaction::Dislike).await
    }

    // ===== Profile =====

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.client.get(PROFILE_ENDPOINT).await?.data_as()
    }

    /// The backend answers with either an envelope or the bare user object;
    /// both decode to the same `data`.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        if update.is_empty() {
            return Err(ApiError::InvalidRequest("nothing to update".to_string()));
        }
        if let Some(ref username) = update.username {
            require("username", username)?;
        }

        let request = RequestEnvelope::put(PROFILE_ENDPOINT).json(update)?;
        let user: User = self.client.send(request).await?.data_as()?;
        info!(username = %user.username, "Updated profile");
        Ok(user)
    }

    pub async fn user_threads(&self) -> Result<Vec<Thread>, ApiError> {
        let envelope = self.client.get(USER_THREADS_ENDPOINT).await?;
        Self::thread_list(&envelope)
    }

    /// Messages written by the current user. Shape varies between backend
    /// versions, so entries are left as raw JSON.
    pub async fn user_messages(&self) -> Result<Vec<Value>, ApiError> {
        let envelope = self.client.get(USER_MESSAGES_ENDPOINT).await?;
        if let Some(Value::Array(items)) = envelope.data.as_ref() {
            return Ok(items.clone());
        }
        envelope.field_as("messages")
    }

    // ===== Stats =====

    pub async fn stats(&self) -> Result<ForumStats, ApiError> {
        self.client.get(STATS_ENDPOINT).await?.data_as()
    }

    /// `data` is either the list itself or `{"threads": [...]}`.
    fn thread_list(envelope: &ResponseEnvelope) -> Result<Vec<Thread>, ApiError> {
        match envelope.data {
            Some(Value::Array(_)) => envelope.data_as(),
            _ => envelope.field_as("threads"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::MemoryStore;
    use crate::models::{MessageSort, ThreadStatus};

    const ALICE_TOKEN: &str =
        "eyJhbGciOiJIUzI1NiJ9.eyJ1c2VyX2lkIjo3LCJ1c2VybmFtZSI6ImFsaWNlIiwicm9sZSI6InVzZXIifQ.sig";

    fn api_with(server: &MockServer, store: &MemoryStore) -> ForumApi {
        ForumApi::new(SessionedClient::new(server.uri(), Arc::new(store.clone())).unwrap())
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"username": "alice", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"token": ALICE_TOKEN, "user": {"id": 7, "username": "alice", "email": "a@x.io", "role": "user"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = MemoryStore::new();
        let api = api_with(&server, &store);
        let session = api.login(" alice ", "secret").await.unwrap();

        assert_eq!(session.user.unwrap().id, 7);
        assert_eq!(api.client().credential().as_deref(), Some(ALICE_TOKEN));
        assert_eq!(api.current_user().unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_login_failure_keeps_store_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"status": "error", "message": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let store = MemoryStore::new();
        let api = api_with(&server, &store);
        let err = api.login("alice", "wrong").await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(err.message(), "Invalid credentials");
        assert!(!api.client().has_credential());
    }

    #[tokio::test]
    async fn test_blank_fields_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::new());
        assert!(matches!(api.login("", "pw").await, Err(ApiError::InvalidRequest(_))));
        assert!(matches!(api.login("alice", "").await, Err(ApiError::InvalidRequest(_))));
        assert!(matches!(
            api.create_message(1, "   ").await,
            Err(ApiError::InvalidRequest(_))
        ));
        let thread = NewThread {
            title: String::new(),
            description: "body".to_string(),
            tags: vec![],
        };
        assert!(matches!(
            api.create_thread(&thread).await,
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(matches!(
            api.update_profile(&ProfileUpdate::default()).await,
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_register_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .and(body_json(json!({"username": "dave", "email": "d@x.io", "password": "pw"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status": "success",
                "data": {"id": 11, "username": "dave", "email": "d@x.io", "role": "user"}
            })))
            .mount(&server)
            .await;

        let store = MemoryStore::new();
        let api = api_with(&server, &store);
        let user = api.register("dave", "d@x.io", "pw").await.unwrap().unwrap();

        assert_eq!(user.id, 11);
        assert!(!api.client().has_credential());
    }

    #[tokio::test]
    async fn test_register_with_token_stores_it() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status": "success",
                "data": {"token": "T9", "user": {"id": 12, "username": "erin"}}
            })))
            .mount(&server)
            .await;

        let store = MemoryStore::new();
        let api = api_with(&server, &store);
        let user = api.register("erin", "e@x.io", "pw").await.unwrap();

        assert_eq!(user.unwrap().username, "erin");
        assert_eq!(api.client().credential().as_deref(), Some("T9"));
    }

    #[tokio::test]
    async fn test_register_with_unrecognised_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status": "success",
                "data": {"user_id": "13"},
                "message": "Account created"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::new());
        let user = api.register("fay", "f@x.io", "pw").await.unwrap();

        assert!(user.is_none());
        assert!(!api.client().has_credential());
    }

    #[tokio::test]
    async fn test_logout_and_undecodable_token() {
        let server = MockServer::start().await;
        let store = MemoryStore::with_token(ALICE_TOKEN);
        let api = api_with(&server, &store);

        api.logout();
        assert!(!api.client().has_credential());
        api.logout();

        api.client().store_credential("not-a-jwt").unwrap();
        assert!(api.current_user().is_none());
        assert!(!api.client().has_credential());
    }

    #[tokio::test]
    async fn test_list_threads_sends_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/threads"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "10"))
            .and(query_param("status", "closed"))
            .and(query_param("visibility", "public"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"threads": [
                    {"id": 1, "title": "One", "description": "d", "tags": "a,b", "status": "closed"},
                    {"id": 2, "title": "Two", "description": "d", "tags": null}
                ], "total": 2}
            })))
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::new());
        let query = ThreadQuery {
            page: 2,
            status: ThreadStatus::Closed,
            ..Default::default()
        };
        let threads = api.list_threads(&query).await.unwrap();

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].tags, vec!["a", "b"]);
        assert!(!threads[0].is_open());
    }

    #[tokio::test]
    async fn test_list_threads_null_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"threads": null}
            })))
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::new());
        assert!(api.list_threads(&ThreadQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_accepts_bare_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/threads/search"))
            .and(query_param("q", "rust"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": [{"id": 3, "title": "Rust tips", "description": "d"}]
            })))
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::new());
        let threads = api.search_threads("rust", 0, 10).await.unwrap();
        assert_eq!(threads[0].title, "Rust tips");
        assert!(matches!(
            api.search_threads(" ", 1, 10).await,
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_get_thread_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/threads/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"id": 5, "title": "T", "description": "D", "tags": ["x"], "views": 3,
                         "messages": [{"id": 1, "content": "hi", "likes": 2, "dislikes": 0}]}
            })))
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::new());
        let detail = api.get_thread(5).await.unwrap();
        assert_eq!(detail.thread.title, "T");
        assert_eq!(detail.messages[0].content, "hi");
        assert_eq!(detail.views, Some(3));
    }

    #[tokio::test]
    async fn test_get_thread_without_data_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/threads/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::new());
        assert!(matches!(
            api.get_thread(5).await,
            Err(ApiError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_create_thread_sends_bearer_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/threads"))
            .and(header("authorization", format!("Bearer {}", ALICE_TOKEN).as_str()))
            .and(body_json(json!({"title": "Hello", "description": "World", "tags": ["intro"]})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status": "success",
                "data": {"id": 42, "title": "Hello", "description": "World", "tags": "intro"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::with_token(ALICE_TOKEN));
        let thread = NewThread {
            title: "Hello".to_string(),
            description: "World".to_string(),
            tags: vec!["intro".to_string()],
        };
        let created = api.create_thread(&thread).await.unwrap();
        assert_eq!(created.id, 42);
        assert_eq!(created.tags, vec!["intro"]);
    }

    #[tokio::test]
    async fn test_delete_thread_returns_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/threads/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": "Thread deleted successfully"
            })))
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::with_token("T"));
        let message = api.delete_thread(9).await.unwrap();
        assert_eq!(message.as_deref(), Some("Thread deleted successfully"));
    }

    #[tokio::test]
    async fn test_list_messages_sort() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/threads/5/messages"))
            .and(query_param("sort_by", "likes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"messages": [{"id": 1, "content": "top", "likes": 9}], "total": 1}
            })))
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::new());
        let query = MessageQuery {
            sort_by: MessageSort::Likes,
            ..Default::default()
        };
        let messages = api.list_messages(5, &query).await.unwrap();
        assert_eq!(messages[0].likes, 9);
    }

    #[tokio::test]
    async fn test_like_returns_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/messages/4/like"))
            .and(header("authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": "Message liked successfully"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::with_token("T"));
        let message = api.like_message(4).await.unwrap();
        assert_eq!(message.as_deref(), Some("Message liked successfully"));
    }

    #[tokio::test]
    async fn test_dislike_without_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/messages/4/dislike"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::with_token("T"));
        assert_eq!(api.dislike_message(4).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_like_plain_text_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/messages/4/dislike"))
            .respond_with(
                ResponseTemplate::new(400)
                    .insert_header("content-type", "text/plain; charset=utf-8")
                    .set_body_string("You have already disliked this message\n"),
            )
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::with_token("T"));
        let err = api.dislike_message(4).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.message(), "You have already disliked this message");
        assert!(api.client().has_credential());
    }

    #[tokio::test]
    async fn test_update_profile_bare_user() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/me"))
            .and(body_json(json!({"biography": "Hi there"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7, "username": "alice", "email": "a@x.io", "biography": "Hi there"
            })))
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::with_token(ALICE_TOKEN));
        let update = ProfileUpdate {
            biography: Some("Hi there".to_string()),
            ..Default::default()
        };
        let user = api.update_profile(&update).await.unwrap();
        assert_eq!(user.biography_display(), "Hi there");
    }

    #[tokio::test]
    async fn test_profile_401_clears_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/me"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"status": "error", "message": "Invalid token"})),
            )
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::with_token(ALICE_TOKEN));
        let err = api.profile().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(api.current_user().is_none());
    }

    #[tokio::test]
    async fn test_user_messages_raw() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": [{"id": 1, "content": "a", "thread_title": "T"}]
            })))
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::with_token("T"));
        let messages = api.user_messages().await.unwrap();
        assert_eq!(messages[0]["thread_title"], "T");
    }

    #[tokio::test]
    async fn test_stats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"user_count": 3, "thread_count": 2, "message_count": 8,
                         "recent_threads": null, "active_users": [{"id": 1, "username": "a", "message_count": 5}]}
            })))
            .mount(&server)
            .await;

        let api = api_with(&server, &MemoryStore::new());
        let stats = api.stats().await.unwrap();
        assert_eq!(stats.message_count, 8);
        assert!(stats.recent_threads.is_empty());
        assert_eq!(stats.active_users[0].message_count, 5);
    }
}
