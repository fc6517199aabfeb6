//! Client library for the Autonomi network-fabric provisioning API.
//!
//! Provisioning calls on the API are asynchronous: creating or deleting a node,
//! a transport or an attachment returns immediately while the backend moves the
//! element through its lifecycle. This crate hides that behind single calls
//! that return once the element has reached the requested administrative state.
//!
//! # Architecture
//!
//! ```text
//!   create_node / delete_transport / ...        (nodes, transports, attachments)
//!                      │
//!                      ▼
//!   ┌──────────────────────────────────────┐
//!   │  lifecycle: validate, POST / DELETE  │
//!   └──────────────────┬───────────────────┘
//!                      ▼
//!   ┌──────────────────────────────────────┐
//!   │  poll: fetch, classify, sleep        │──▶ PollOutcome
//!   └──────────────────┬───────────────────┘
//!                      ▼
//!   ┌──────────────────────────────────────┐
//!   │  http: HttpBackend (reqwest / mock)  │
//!   └──────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use autonomi_core::{CreateNode, NodeType, WorkspaceId};
//! use autonomi_sdk::{Client, WaitOptions};
//!
//! # async fn example(workspace_id: WorkspaceId) -> Result<(), autonomi_sdk::ClientError> {
//! let client = Client::builder()
//!     .terms_accepted(true)
//!     .host_url("https://api.autonomi-platform.com")
//!     .personal_access_token("my-token")
//!     .build()
//!     .await?;
//!
//! let payload = CreateNode::new("edge-fr5", NodeType::Access, "AEQUFR5100");
//! let node = client
//!     .create_node(&payload, workspace_id, WaitOptions::new())
//!     .await?;
//! println!("node {} is {}", node.base.id, node.state);
//! # Ok(())
//! # }
//! ```
//!
//! # Testing
//!
//! Enable the `test-utils` feature for [`MockBackend`], a scripted
//! [`HttpBackend`] that can drive a [`Client`] without a server.

#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod poll;

mod accounts;
mod attachments;
mod nodes;
mod ports;
mod transports;
mod workspaces;

#[cfg(test)]
mod fixtures;

pub use client::{Client, ClientBuilder};
pub use error::{ClientError, Operation, Result};
pub use http::{ApiRequest, HttpBackend, Method, ReqwestBackend};
pub use lifecycle::{resolve_target, WaitOptions};
pub use poll::{classify, poll_until, Observed, PollConfig, PollOutcome, StopReason, Verdict};

#[cfg(any(test, feature = "test-utils"))]
pub use http::mock::{MockBackend, MockResponse};
