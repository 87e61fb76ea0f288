//! # Chatwork Client
//! Asynchronous wrapper around the Chatwork REST API (v2), exposing each endpoint as one method on [`Client`]: account info, rooms, messages, tasks, files, contacts, and contact requests.
//!
//! ## Audience and uses
//! For Rust developers automating Chatwork: posting build notifications, uploading reports, creating rooms, or assigning tasks from scripts and services. Configure with [`ClientBuilder`], then call the endpoint you need.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`.
//!
//! ## Responses
//! Read endpoints return the JSON document Chatwork sent, unmodified, as a [`serde_json::Value`]. Write endpoints whose answer is mostly a status return a [`RawResponse`]. Listing your tasks, incoming requests, or a room's messages, tasks, and files yields `None` when Chatwork answers `204 No Content`.
//!
//! ## Out of scope
//! No retries, pagination, or rate-limit handling. Each method is exactly one HTTP request.
//!
//! ## Errors
//! Non-2xx statuses become [`Error::Api`] with the response body attached; transport failures are [`Error::Request`] and malformed bodies [`Error::Json`]. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Logging
//! Requests are traced with the `tracing` crate at `debug` level and failures at `warn`. The API token is never logged.
//!
//! ## Example
//! ```no_run
//! use chatwork_client::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chatwork_client::Error> {
//!     let client = Client::new("your-api-token")?;
//!     let me = client.get_me().await?;
//!     println!("Logged in as {}", me["name"]);
//!
//!     if let Some(tasks) = client.get_my_tasks().await? {
//!         println!("Open tasks: {tasks}");
//!     }
//!
//!     client.send_message(123, "Deploy finished").await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;

pub use client::{Client, ClientBuilder};
pub use error::Error;
pub use models::{IconPreset, NewRoom, NewTask, RawResponse, RoomAction, RoomMembers, RoomUpdate};

/// Result type alias for Chatwork operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
