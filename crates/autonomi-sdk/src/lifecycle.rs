//! Create and delete operations that wait for an administrative state.
//!
//! ```text
//!   POST ──▶ creation_pending ──▶ creation_proceed ──┬──▶ deployed
//!                                                    └──▶ creation_error
//!
//!   DELETE ─▶ delete_pending ──▶ delete_proceed ─────┬──▶ deleted (404)
//!                                                    └──▶ delete_error
//! ```
//!
//! A lifecycle call issues the mutating request, then drives
//! [`poll_until`](crate::poll::poll_until) until the element reaches the
//! requested state, and maps the outcome to a value or a typed error.

use autonomi_core::{AdministrativeState, Element, ElementId, Validate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::client::{decode, Client};
use crate::error::{ClientError, Operation, Result};
use crate::http::ApiRequest;
use crate::poll::{poll_until, Observed, PollOutcome, StopReason};

/// Options for a create or delete call.
#[derive(Debug, Clone, Default)]
pub struct WaitOptions {
    /// State to wait for. Defaults to `deployed` on create and `deleted` on delete.
    pub administrative_state: Option<AdministrativeState>,
    /// Token aborting the wait when cancelled.
    pub cancellation: Option<CancellationToken>,
}

impl WaitOptions {
    /// Wait for the default state, without cancellation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for `state` instead of the default.
    #[must_use]
    pub const fn administrative_state(mut self, state: AdministrativeState) -> Self {
        self.administrative_state = Some(state);
        self
    }

    /// Abort the wait when `token` is cancelled.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Resolve and check the state to wait for.
///
/// # Errors
///
/// Returns [`ClientError::InvalidAdministrativeState`] if `requested` does not
/// belong to the operation's lifecycle.
pub fn resolve_target(
    operation: Operation,
    requested: Option<AdministrativeState>,
) -> Result<AdministrativeState> {
    let (default, allowed) = match operation {
        Operation::Creation => (AdministrativeState::Deployed, &AdministrativeState::CREATION),
        Operation::Deletion => (AdministrativeState::Deleted, &AdministrativeState::DELETION),
    };
    let state = requested.unwrap_or(default);
    if allowed.contains(&state) {
        Ok(state)
    } else {
        Err(ClientError::InvalidAdministrativeState { operation, state })
    }
}

/// Turn a poll outcome into the caller-facing result.
pub(crate) fn into_result<T: Element>(
    outcome: PollOutcome<T>,
    id: ElementId,
    target: AdministrativeState,
) -> Result<Observed<T>> {
    let kind = T::KIND;
    match outcome.stop {
        StopReason::Converged => outcome.last_observed.ok_or(ClientError::Vanished {
            kind,
            id,
            target,
        }),
        StopReason::TerminalState => {
            let element = outcome.last_observed.and_then(Observed::present);
            let state = element
                .as_ref()
                .map_or(AdministrativeState::CreationError, Element::state);
            let (code, message) = element
                .as_ref()
                .and_then(Element::support_error)
                .map(|e| (e.code.clone(), e.msg.clone()))
                .unwrap_or_default();
            tracing::error!(kind = %kind, id = %id, state = %state, code = %code, "Element failed");
            Err(ClientError::ProvisioningFailed {
                kind,
                id,
                state,
                code,
                message,
            })
        }
        StopReason::Vanished => Err(ClientError::Vanished { kind, id, target }),
        StopReason::Exhausted => Err(ClientError::Timeout {
            kind,
            id,
            target,
            attempts: outcome.attempts,
            last_state: outcome.last_observed.map(|o| o.state()),
        }),
        StopReason::Cancelled => Err(ClientError::Cancelled { kind, id, target }),
    }
}

impl Client {
    /// Create an element under `collection` and wait for the requested state.
    pub(crate) async fn create_element<P, T>(
        &self,
        collection: &str,
        payload: &P,
        options: &WaitOptions,
    ) -> Result<T>
    where
        P: Validate + Serialize + Sync,
        T: Element + DeserializeOwned,
    {
        payload.validate()?;
        let target = resolve_target(Operation::Creation, options.administrative_state)?;

        let created: T = self.post_data(collection, payload).await?;
        let id = created.id();
        tracing::info!(
            kind = %T::KIND,
            id = %id,
            state = %created.state(),
            target = %target,
            "Element created, waiting for target state"
        );

        let path = format!("{collection}/{id}");
        let outcome = poll_until(
            self.poll_config(),
            target,
            options.cancellation.as_ref(),
            || self.get_data::<T>(&path),
        )
        .await;

        into_result(outcome, id, target)?
            .present()
            .ok_or(ClientError::Vanished {
                kind: T::KIND,
                id,
                target,
            })
    }

    /// Delete the element at `path` and wait for the requested state.
    ///
    /// The element is polled by `id` whatever the `DELETE` answer contains;
    /// an empty or unreadable body is tolerated.
    pub(crate) async fn delete_element<T>(
        &self,
        path: &str,
        id: ElementId,
        options: &WaitOptions,
    ) -> Result<Observed<T>>
    where
        T: Element + DeserializeOwned,
    {
        let target = resolve_target(Operation::Deletion, options.administrative_state)?;

        let body = self.send(ApiRequest::delete(path)).await?;
        match decode::<autonomi_core::Data<T>>(&body) {
            Ok(data) => tracing::info!(
                kind = %T::KIND,
                id = %id,
                state = %data.data.state(),
                target = %target,
                "Element deletion accepted, waiting for target state"
            ),
            Err(_) => tracing::info!(
                kind = %T::KIND,
                id = %id,
                target = %target,
                "Element deletion accepted without a readable body, waiting for target state"
            ),
        }

        let outcome = poll_until(
            self.poll_config(),
            target,
            options.cancellation.as_ref(),
            || self.get_data::<T>(path),
        )
        .await;

        into_result(outcome, id, target)
    }
}

#[cfg(test)]
mod tests {
    use autonomi_core::{ResourceKind, SupportError};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Probe {
        id: ElementId,
        state: AdministrativeState,
        error: Option<SupportError>,
    }

    impl Element for Probe {
        const KIND: ResourceKind = ResourceKind::Attachment;

        fn id(&self) -> ElementId {
            self.id
        }

        fn state(&self) -> AdministrativeState {
            self.state
        }

        fn support_error(&self) -> Option<&SupportError> {
            self.error.as_ref()
        }
    }

    fn outcome(
        stop: StopReason,
        last_observed: Option<Observed<Probe>>,
        attempts: u32,
    ) -> PollOutcome<Probe> {
        PollOutcome {
            last_observed,
            attempts,
            stop,
        }
    }

    #[test]
    fn default_targets() {
        assert_eq!(
            resolve_target(Operation::Creation, None).unwrap(),
            AdministrativeState::Deployed
        );
        assert_eq!(
            resolve_target(Operation::Deletion, None).unwrap(),
            AdministrativeState::Deleted
        );
    }

    #[test]
    fn every_family_member_is_accepted() {
        for state in AdministrativeState::CREATION {
            assert_eq!(resolve_target(Operation::Creation, Some(state)).unwrap(), state);
            assert!(resolve_target(Operation::Deletion, Some(state)).is_err());
        }
        for state in AdministrativeState::DELETION {
            assert_eq!(resolve_target(Operation::Deletion, Some(state)).unwrap(), state);
            assert!(resolve_target(Operation::Creation, Some(state)).is_err());
        }
    }

    #[test]
    fn wrong_family_is_rejected() {
        let err = resolve_target(Operation::Creation, Some(AdministrativeState::Deleted))
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::InvalidAdministrativeState {
                operation: Operation::Creation,
                state: AdministrativeState::Deleted,
            }
        ));
    }

    #[test]
    fn options_builder() {
        let token = CancellationToken::new();
        let options = WaitOptions::new()
            .administrative_state(AdministrativeState::CreationProceed)
            .cancellation(token);
        assert_eq!(
            options.administrative_state,
            Some(AdministrativeState::CreationProceed)
        );
        assert!(options.cancellation.is_some());
    }

    #[test]
    fn terminal_state_carries_support_error() {
        let id = ElementId::generate();
        let probe = Probe {
            id,
            state: AdministrativeState::CreationError,
            error: Some(SupportError {
                code: "ERR_INTERNAL".to_string(),
                msg: "cannot attach".to_string(),
            }),
        };

        let err = into_result(
            outcome(StopReason::TerminalState, Some(Observed::Present(probe)), 2),
            id,
            AdministrativeState::Deployed,
        )
        .unwrap_err();

        match err {
            ClientError::ProvisioningFailed {
                kind,
                state,
                code,
                message,
                ..
            } => {
                assert_eq!(kind, ResourceKind::Attachment);
                assert_eq!(state, AdministrativeState::CreationError);
                assert_eq!(code, "ERR_INTERNAL");
                assert_eq!(message, "cannot attach");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn exhaustion_reports_attempts_and_last_state() {
        let id = ElementId::generate();
        let probe = Probe {
            id,
            state: AdministrativeState::CreationPending,
            error: None,
        };

        let err = into_result(
            outcome(StopReason::Exhausted, Some(Observed::Present(probe)), 1),
            id,
            AdministrativeState::Deployed,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ClientError::Timeout {
                attempts: 1,
                last_state: Some(AdministrativeState::CreationPending),
                ..
            }
        ));
        assert!(err.is_retriable());
    }

    #[test]
    fn converged_removal_is_returned() {
        let id = ElementId::generate();
        let result = into_result(
            outcome(StopReason::Converged, Some(Observed::Removed), 3),
            id,
            AdministrativeState::Deleted,
        )
        .unwrap();
        assert!(result.is_removed());
    }

    #[test]
    fn cancelled_and_vanished_map_to_their_errors() {
        let id = ElementId::generate();
        let err = into_result(
            outcome(StopReason::Cancelled, None, 0),
            id,
            AdministrativeState::Deployed,
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Cancelled { .. }));

        let err = into_result(
            outcome(StopReason::Vanished, Some(Observed::Removed), 2),
            id,
            AdministrativeState::Deployed,
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Vanished { .. }));
    }
}
