//! Invitation lifecycle state machine.

use serde::{Deserialize, Serialize};

/// Status of an invitation.
///
/// Wire/DB format: SCREAMING_SNAKE_CASE strings (`PENDING`, `CANCELED`,
/// `ACCEPTED`), preserved from the legacy application. `Pending` is the only
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Canceled,
    Accepted,
}

impl InvitationStatus {
    /// Convert from the stored string value. Returns `None` for unknown values.
    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "CANCELED" => Some(Self::Canceled),
            "ACCEPTED" => Some(Self::Accepted),
            _ => None,
        }
    }

    /// The stored string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Canceled => "CANCELED",
            Self::Accepted => "ACCEPTED",
        }
    }

    /// Whether a transition to `next` is allowed. The only legal transitions
    /// are PENDING→CANCELED and PENDING→ACCEPTED; terminal states have no
    /// outgoing edge.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Canceled) | (Self::Pending, Self::Accepted)
        )
    }

    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}
