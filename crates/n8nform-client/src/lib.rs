//! n8n public API client for n8nform
//!
//! Typed access to the workflow, credential and user endpoints of a
//! self-hosted n8n instance (`/api/v1`).
//!
//! # Example
//!
//! ```ignore
//! use n8nform_client::Client;
//!
//! let client = Client::connect("https://n8n.example.com", api_key)?;
//! let workflow = client.get_workflow("42").await?;
//! if !workflow.active {
//!     client.activate_workflow(&workflow.id).await?;
//! }
//! ```
//!
//! All requests go through a [`Transport`]; [`HttpTransport`] is the
//! production implementation. There is no retry: a timeout or a non-2xx
//! response is returned to the caller as is.

pub mod client;
pub mod credentials;
pub mod error;
pub mod model;
pub mod transport;
pub mod users;
pub mod workflows;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::Client;
pub use error::{ClientError, Result};
pub use model::{
    CreateUserRequest, CreateUserResult, CreatedUser, Credential, JsonObject, Tag, User, Workflow,
    tags_have_ids,
};
pub use reqwest::Method;
pub use transport::{API_KEY_HEADER, HttpTransport, REQUEST_TIMEOUT, Transport};
