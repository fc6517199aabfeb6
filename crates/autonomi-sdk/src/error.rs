//! Error types for the SDK.
//!
//! Errors fall into five groups: configuration mistakes caught before any network
//! call, transport/HTTP failures, terminal provisioning failures reported by the
//! backend, timeouts, and caller cancellation. Callers can tell them apart to
//! decide whether re-issuing the whole operation makes sense.

use std::fmt;

use autonomi_core::{AdministrativeState, ElementId, ResourceKind, ValidationError};
use thiserror::Error;

/// A result type using `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Which lifecycle operation a target state was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Element creation.
    Creation,
    /// Element deletion.
    Deletion,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Creation => "creation",
            Self::Deletion => "deletion",
        })
    }
}

/// Errors that can occur while talking to the provisioning API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The caller did not accept the terms and conditions.
    #[error("terms and conditions must be accepted")]
    TermsNotAccepted,

    /// No host URL was configured.
    #[error("host url must be set")]
    MissingHostUrl,

    /// No personal access token was configured.
    #[error("personal access token must be set")]
    MissingToken,

    /// The poll configuration cannot drive a single attempt.
    #[error("invalid poll configuration: {0}")]
    InvalidPollConfig(String),

    /// The requested target state is not part of the operation's lifecycle.
    #[error("{state} is not a valid administrative state for element {operation}")]
    InvalidAdministrativeState {
        /// Operation the state was requested for.
        operation: Operation,
        /// The rejected state.
        state: AdministrativeState,
    },

    /// A request payload failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("status: {status}, body: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The element settled in an error state.
    #[error("{kind} {id} reached {state}{}", failure_detail(.code, .message))]
    ProvisioningFailed {
        /// Kind of element.
        kind: ResourceKind,
        /// Element identifier.
        id: ElementId,
        /// The error state observed.
        state: AdministrativeState,
        /// Backend error code, empty when none was reported.
        code: String,
        /// Backend error message, empty when none was reported.
        message: String,
    },

    /// The element disappeared while waiting for a state other than `deleted`.
    #[error("{kind} {id} vanished while waiting for '{target}'")]
    Vanished {
        /// Kind of element.
        kind: ResourceKind,
        /// Element identifier.
        id: ElementId,
        /// State that was being waited for.
        target: AdministrativeState,
    },

    /// The element did not reach the target state within the configured attempts.
    #[error("{kind} {id} did not reach '{target}' state in time after {attempts} attempts (last seen: {})", .last_state.map_or("unknown", AdministrativeState::as_str))]
    Timeout {
        /// Kind of element.
        kind: ResourceKind,
        /// Element identifier.
        id: ElementId,
        /// State that was being waited for.
        target: AdministrativeState,
        /// Number of fetches performed.
        attempts: u32,
        /// Last observed state, if any fetch succeeded on the final attempt.
        last_state: Option<AdministrativeState>,
    },

    /// The caller cancelled the wait.
    #[error("waiting for {kind} {id} to reach '{target}' was cancelled")]
    Cancelled {
        /// Kind of element.
        kind: ResourceKind,
        /// Element identifier.
        id: ElementId,
        /// State that was being waited for.
        target: AdministrativeState,
    },
}

/// `: code: message`, dropping whichever parts the backend left empty.
fn failure_detail(code: &str, message: &str) -> String {
    match (code.is_empty(), message.is_empty()) {
        (true, true) => String::new(),
        (false, true) => format!(": {code}"),
        (true, false) => format!(": {message}"),
        (false, false) => format!(": {code}: {message}"),
    }
}

impl ClientError {
    /// HTTP status code carried by the error, if it came from a response.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the backend answered `404 Not Found`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Returns true if re-issuing the operation as-is might succeed.
    ///
    /// Timeouts, transport failures and server errors are retriable; terminal
    /// provisioning failures and configuration mistakes are not.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
