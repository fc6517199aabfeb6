//! Administrative states of provisioned elements.
//!
//! # State Machine
//!
//! ```text
//!   creation family                       deletion family
//!
//!   ┌──────────────────┐                  ┌────────────────┐
//!   │ creation_pending │                  │ delete_pending │
//!   └────────┬─────────┘                  └───────┬────────┘
//!            ▼                                    ▼
//!   ┌──────────────────┐                  ┌────────────────┐
//!   │ creation_proceed │                  │ delete_proceed │
//!   └───┬──────────┬───┘                  └───┬────────┬───┘
//!       ▼          ▼                          ▼        ▼
//!  ┌──────────┐ ┌────────────────┐   ┌──────────────┐ ┌─────────┐
//!  │ deployed │ │ creation_error │   │ delete_error │ │ deleted │ (GET → 404)
//!  └──────────┘ └────────────────┘   └──────────────┘ └─────────┘
//! ```
//!
//! Within a family transitions only move forward. `deleted` is never observed
//! as a value: the backend answers `404 Not Found` once the element is gone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle tag of an element as tracked by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdministrativeState {
    /// Creation accepted, not yet started.
    CreationPending,
    /// Creation in progress.
    CreationProceed,
    /// Creation failed; stable until the caller acts.
    CreationError,
    /// Element is provisioned.
    Deployed,
    /// Deletion accepted, not yet started.
    DeletePending,
    /// Deletion in progress.
    DeleteProceed,
    /// Deletion failed; stable until the caller acts.
    DeleteError,
    /// Element is removed.
    Deleted,
}

/// The two disjoint families of administrative states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateFamily {
    /// States reachable while an element is being created.
    Creation,
    /// States reachable while an element is being deleted.
    Deletion,
}

impl AdministrativeState {
    /// Every state of the creation family, in lifecycle order.
    pub const CREATION: [Self; 4] = [
        Self::CreationPending,
        Self::CreationProceed,
        Self::CreationError,
        Self::Deployed,
    ];

    /// Every state of the deletion family, in lifecycle order.
    pub const DELETION: [Self; 4] = [
        Self::DeletePending,
        Self::DeleteProceed,
        Self::DeleteError,
        Self::Deleted,
    ];

    /// Wire token of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreationPending => "creation_pending",
            Self::CreationProceed => "creation_proceed",
            Self::CreationError => "creation_error",
            Self::Deployed => "deployed",
            Self::DeletePending => "delete_pending",
            Self::DeleteProceed => "delete_proceed",
            Self::DeleteError => "delete_error",
            Self::Deleted => "deleted",
        }
    }

    /// Family the state belongs to.
    #[must_use]
    pub const fn family(self) -> StateFamily {
        match self {
            Self::CreationPending | Self::CreationProceed | Self::CreationError | Self::Deployed => {
                StateFamily::Creation
            }
            Self::DeletePending | Self::DeleteProceed | Self::DeleteError | Self::Deleted => {
                StateFamily::Deletion
            }
        }
    }

    /// Returns true for the failure states the backend never leaves on its own.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::CreationError | Self::DeleteError)
    }

    /// Returns true if the backend will not transition further without new caller action.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Deployed | Self::CreationError | Self::Deleted | Self::DeleteError
        )
    }

    /// Position of the state within its family, used to check forward-only progress.
    const fn rank(self) -> u8 {
        match self {
            Self::CreationPending | Self::DeletePending => 0,
            Self::CreationProceed | Self::DeleteProceed => 1,
            Self::CreationError | Self::Deployed | Self::DeleteError | Self::Deleted => 2,
        }
    }
}

/// Check whether the backend may move an element from `from` to `to`.
///
/// Staying in the same state is allowed. Within a family states only move forward.
/// The only way across families is a deletion issued on a settled creation
/// (`deployed` or `creation_error`).
#[must_use]
pub fn is_valid_transition(from: AdministrativeState, to: AdministrativeState) -> bool {
    if from == to {
        return true;
    }
    match (from.family(), to.family()) {
        (StateFamily::Creation, StateFamily::Deletion) => from.is_terminal(),
        (StateFamily::Deletion, StateFamily::Creation) => false,
        _ => !from.is_terminal() && from.rank() < to.rank(),
    }
}

impl fmt::Display for AdministrativeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdministrativeState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CREATION
            .into_iter()
            .chain(Self::DELETION)
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownState(s.to_string()))
    }
}

/// Returned when parsing a token that is not an administrative state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown administrative state: {0:?}")]
pub struct UnknownState(pub String);
