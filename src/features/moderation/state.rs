use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Moderation status matching the `moderation_status` database enum.
///
/// `Pending` is the only non-terminal state:
/// pending -> approved, pending -> rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "moderation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationStatus::Pending => write!(f, "pending"),
            ModerationStatus::Approved => write!(f, "approved"),
            ModerationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
}

impl ModerationAction {
    pub fn target(self) -> ModerationStatus {
        match self {
            ModerationAction::Approve => ModerationStatus::Approved,
            ModerationAction::Reject => ModerationStatus::Rejected,
        }
    }
}

/// Outcome of applying an action to a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The record moves to the target state
    Applied(ModerationStatus),
    /// The record is already in the target state; nothing is written
    Unchanged,
}

impl ModerationStatus {
    pub fn apply(self, action: ModerationAction) -> Result<Transition, AppError> {
        let target = action.target();
        match self {
            ModerationStatus::Pending => Ok(Transition::Applied(target)),
            current if current == target => Ok(Transition::Unchanged),
            current => Err(AppError::Conflict(format!(
                "Cannot {} a record that is already {}",
                match action {
                    ModerationAction::Approve => "approve",
                    ModerationAction::Reject => "reject",
                },
                current
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_moves_to_either_terminal_state() {
        assert_eq!(
            ModerationStatus::Pending.apply(ModerationAction::Approve).unwrap(),
            Transition::Applied(ModerationStatus::Approved)
        );
        assert_eq!(
            ModerationStatus::Pending.apply(ModerationAction::Reject).unwrap(),
            Transition::Applied(ModerationStatus::Rejected)
        );
    }

    #[test]
    fn test_repeating_an_action_is_a_no_op() {
        assert_eq!(
            ModerationStatus::Approved.apply(ModerationAction::Approve).unwrap(),
            Transition::Unchanged
        );
        assert_eq!(
            ModerationStatus::Rejected.apply(ModerationAction::Reject).unwrap(),
            Transition::Unchanged
        );
    }

    #[test]
    fn test_crossing_terminal_states_conflicts() {
        assert!(matches!(
            ModerationStatus::Rejected.apply(ModerationAction::Approve),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            ModerationStatus::Approved.apply(ModerationAction::Reject),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ModerationStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(ModerationStatus::Approved.to_string(), "approved");
    }
}
