//! Chatwork async client implementation.

use crate::models::{NewRoom, NewTask, RawResponse, RoomAction, RoomMembers, RoomUpdate};
use crate::{Error, Result};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

const API_URL_BASE: &str = "https://api.chatwork.com/v2";
const TOKEN_HEADER: &str = "X-ChatWorkToken";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const USER_AGENT_VALUE: &str = concat!("chatwork-client/", env!("CARGO_PKG_VERSION"));
const TOKEN_ENV: &str = "CHATWORK_API_TOKEN";
const BASE_URL_ENV: &str = "CHATWORK_API_BASE_URL";

/// Async client for the Chatwork REST API.
///
/// Every method issues exactly one request. JSON bodies are handed back
/// untouched; endpoints whose answer is only a status come back as a
/// [`RawResponse`].
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    token: HeaderValue,
    base_url: String,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client for the public Chatwork endpoint.
    ///
    /// # Examples
    /// ```no_run
    /// # use chatwork_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), chatwork_client::Error> {
    /// let client = Client::new("your-api-token")?;
    /// let me = client.get_me().await?;
    /// println!("{}", me["name"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(token: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().token(token).build()
    }

    /// Create a client from `CHATWORK_API_TOKEN`, honouring
    /// `CHATWORK_API_BASE_URL` when set.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV).map_err(|_| Error::MissingToken)?;
        let mut builder = ClientBuilder::new().token(token);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            builder = builder.base_url(base_url);
        }
        builder.build()
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get your account information.
    pub async fn get_me(&self) -> Result<Value> {
        self.get_json("/me").await
    }

    /// Get the number of unread messages, unread mentions, and unfinished tasks.
    pub async fn get_my_status(&self) -> Result<Value> {
        self.get_json("/my/status").await
    }

    /// Get your unfinished tasks.
    ///
    /// Returns `None` when Chatwork answers 204 because there are none.
    pub async fn get_my_tasks(&self) -> Result<Option<Value>> {
        self.get_optional_json("/my/tasks").await
    }

    /// Get your contacts.
    pub async fn get_contacts(&self) -> Result<Value> {
        self.get_json("/contacts").await
    }

    /// Get every chat on your account.
    pub async fn get_rooms(&self) -> Result<Value> {
        self.get_json("/rooms").await
    }

    /// Post a message to a chat.
    ///
    /// # Examples
    /// ```no_run
    /// # use chatwork_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), chatwork_client::Error> {
    /// let client = Client::new("your-api-token")?;
    /// let response = client.send_message(123, "Hello from Rust").await?;
    /// println!("{}", response.text());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_message(&self, room_id: u64, message: &str) -> Result<RawResponse> {
        let path = format!("/rooms/{room_id}/messages");
        let request = self.request(Method::POST, &path).form(&[("body", message)]);
        self.send_raw(request, Method::POST, &path).await
    }

    /// Upload a local file to a chat together with a message.
    ///
    /// # Arguments
    /// * `room_id` - Target chat
    /// * `file_path` - File to read from disk
    /// * `file_name` - Name the file is shown under in Chatwork
    /// * `message` - Text posted along with the file
    pub async fn send_file(
        &self,
        room_id: u64,
        file_path: impl AsRef<Path>,
        file_name: &str,
        message: &str,
    ) -> Result<RawResponse> {
        let contents = tokio::fs::read(file_path.as_ref()).await?;
        let form = Form::new()
            .part("file", Part::bytes(contents).file_name(file_name.to_string()))
            .text("message", message.to_string());

        let path = format!("/rooms/{room_id}/files");
        let request = self.request(Method::POST, &path).multipart(form);
        self.send_raw(request, Method::POST, &path).await
    }

    /// Get a chat's name, icon, and type (my, direct, or group).
    pub async fn get_rooms_by_id(&self, room_id: u64) -> Result<Value> {
        self.get_json(&format!("/rooms/{room_id}")).await
    }

    /// Leave or delete a group chat.
    pub async fn delete_rooms_by_id(&self, room_id: u64, action: RoomAction) -> Result<RawResponse> {
        let path = format!("/rooms/{room_id}");
        let request = self
            .request(Method::DELETE, &path)
            .form(&[("action_type", action)]);
        self.send_raw(request, Method::DELETE, &path).await
    }

    /// Get the members of a chat.
    pub async fn get_rooms_members(&self, room_id: u64) -> Result<Value> {
        self.get_json(&format!("/rooms/{room_id}/members")).await
    }

    /// Get the messages of a chat (Chatwork returns up to 100).
    ///
    /// Returns `None` when Chatwork answers 204 because there are no new messages.
    pub async fn get_rooms_messages(&self, room_id: u64) -> Result<Option<Value>> {
        self.get_optional_json(&format!("/rooms/{room_id}/messages"))
            .await
    }

    /// Get a single message.
    ///
    /// Chatwork serialises message ids as strings of digits; parse them into `u64`.
    pub async fn get_rooms_message_information(
        &self,
        room_id: u64,
        message_id: u64,
    ) -> Result<Value> {
        self.get_json(&format!("/rooms/{room_id}/messages/{message_id}"))
            .await
    }

    /// Add a task to a chat. Returns the created task ids.
    pub async fn add_rooms_task(&self, room_id: u64, task: &NewTask) -> Result<Value> {
        let path = format!("/rooms/{room_id}/tasks");
        let request = self.request(Method::POST, &path).form(task);
        self.send_json(request, Method::POST, &path).await
    }

    /// Get the tasks of a chat, or `None` on 204 when there are none.
    pub async fn get_rooms_tasks(&self, room_id: u64) -> Result<Option<Value>> {
        self.get_optional_json(&format!("/rooms/{room_id}/tasks"))
            .await
    }

    /// Get a single task.
    pub async fn get_rooms_task_information(&self, room_id: u64, task_id: u64) -> Result<Value> {
        self.get_json(&format!("/rooms/{room_id}/tasks/{task_id}"))
            .await
    }

    /// Get the files of a chat (Chatwork returns up to 100).
    ///
    /// Returns `None` when Chatwork answers 204 because there are none.
    pub async fn get_rooms_files(&self, room_id: u64) -> Result<Option<Value>> {
        self.get_optional_json(&format!("/rooms/{room_id}/files"))
            .await
    }

    /// Get a single file, including a download link.
    pub async fn get_rooms_file_information(&self, room_id: u64, file_id: u64) -> Result<Value> {
        let path = format!("/rooms/{room_id}/files/{file_id}");
        let request = self
            .request(Method::GET, &path)
            .query(&[("create_download_url", "1")]);
        self.send_json(request, Method::GET, &path).await
    }

    /// Create a group chat.
    ///
    /// # Examples
    /// ```no_run
    /// # use chatwork_client::{Client, IconPreset, NewRoom};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), chatwork_client::Error> {
    /// let client = Client::new("your-api-token")?;
    /// let room = NewRoom::new("Release train", vec![1001])
    ///     .description("Weekly release coordination")
    ///     .icon_preset(IconPreset::Project)
    ///     .members(vec![1002, 1003]);
    /// let response = client.create_new_room(&room).await?;
    /// println!("{}", response.json()?["room_id"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_new_room(&self, room: &NewRoom) -> Result<RawResponse> {
        let request = self.request(Method::POST, "/rooms").form(room);
        self.send_raw(request, Method::POST, "/rooms").await
    }

    /// Change the description, name, or icon of a chat.
    pub async fn change_room_info(&self, room_id: u64, update: &RoomUpdate) -> Result<RawResponse> {
        let path = format!("/rooms/{room_id}");
        let request = self.request(Method::PUT, &path).form(update);
        self.send_raw(request, Method::PUT, &path).await
    }

    /// Replace the members of a group chat at once.
    pub async fn change_rooms_members(
        &self,
        room_id: u64,
        members: &RoomMembers,
    ) -> Result<RawResponse> {
        let path = format!("/rooms/{room_id}/members");
        let request = self.request(Method::PUT, &path).form(members);
        self.send_raw(request, Method::PUT, &path).await
    }

    /// Get the contact approval requests you received.
    ///
    /// Returns `None` when Chatwork answers 204 because there are none.
    pub async fn get_incoming_requests(&self) -> Result<Option<Value>> {
        self.get_optional_json("/incoming_requests").await
    }

    /// Approve a contact request.
    pub async fn approve_incoming_requests(&self, request_id: u64) -> Result<Value> {
        let path = format!("/incoming_requests/{request_id}");
        let request = self.request(Method::PUT, &path);
        self.send_json(request, Method::PUT, &path).await
    }

    /// Decline a contact request.
    pub async fn delete_incoming_requests(&self, request_id: u64) -> Result<RawResponse> {
        let path = format!("/incoming_requests/{request_id}");
        let request = self.request(Method::DELETE, &path);
        self.send_raw(request, Method::DELETE, &path).await
    }

    /// Common GET-and-parse pattern.
    async fn get_json(&self, path: &str) -> Result<Value> {
        let request = self.request(Method::GET, path);
        self.send_json(request, Method::GET, path).await
    }

    /// GET where 204 means "nothing to list".
    async fn get_optional_json(&self, path: &str) -> Result<Option<Value>> {
        let response = self.send(self.request(Method::GET, path), Method::GET, path).await?;
        if response.status() == StatusCode::NO_CONTENT {
            debug!(path, "no content");
            return Ok(None);
        }
        let body = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }

    async fn send_json(&self, request: RequestBuilder, method: Method, path: &str) -> Result<Value> {
        let body = self.send(request, method, path).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(Into::into)
    }

    async fn send_raw(
        &self,
        request: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<RawResponse> {
        RawResponse::read(self.send(request, method, path).await?).await
    }

    /// Send a request and turn non-2xx statuses into [`Error::Api`].
    async fn send(
        &self,
        request: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<reqwest::Response> {
        debug!(%method, path, "sending Chatwork request");
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    warn!(%method, path, %status, error = %err, "failed to read error body");
                    String::new()
                }
            };
            warn!(%method, path, %status, "Chatwork request failed");
            return Err(Error::Api { status, body });
        }

        debug!(%method, path, %status, "Chatwork request completed");
        Ok(response)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .headers(self.headers())
    }

    /// Build headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(TOKEN_HEADER, self.token.clone());
        headers
    }
}

/// Builder for configuring a Chatwork client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    token: Option<String>,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    proxy: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - No token (required before [`build`](Self::build))
    /// - `https://api.chatwork.com/v2` as base URL
    /// - 120 second request timeout
    /// - `chatwork-client/<version>` user agent
    /// - No proxy
    pub fn new() -> Self {
        Self {
            token: None,
            base_url: API_URL_BASE.to_string(),
            timeout: REQUEST_TIMEOUT,
            user_agent: USER_AGENT_VALUE.to_string(),
            proxy: None,
        }
    }

    /// Set the Chatwork API token sent as `X-ChatWorkToken`.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing against a mock server. A trailing `/` is ignored.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a proxy URL (e.g., "socks5://127.0.0.1:1080").
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Build the client. No request is made.
    pub fn build(self) -> Result<Client> {
        let token = self.token.ok_or(Error::MissingToken)?;
        let mut token = HeaderValue::from_str(&token).map_err(|_| Error::InvalidToken)?;
        token.set_sensitive(true);

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent);

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Client {
            http: builder.build()?,
            token,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
