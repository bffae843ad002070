use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::request::StatusDetail;

/// Local workflow state of a laptop request. All transitions are driven
/// by the external process engine; this module only classifies reported
/// statuses and gates which actions are legal from each state.
///
/// `Approved` and `Rejected` are treated as effectively terminal for
/// action gating even though the engine may still finalize them to
/// `Completed`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestState {
    Pending,
    InProgress,
    Approved,
    Completed,
    Rejected,
    /// Pass-through for vocabulary this build does not know. Rendered
    /// verbatim, never acted on.
    Unknown(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("illegal status transition from {from} to {to}")]
pub struct TransitionError {
    pub from: RequestState,
    pub to: RequestState,
}

impl RequestState {
    /// Parses an engine-reported status string. Comparison is
    /// case-insensitive and tolerant of space/hyphen/underscore
    /// separators (`"IN PROGRESS"`, `"in-progress"`, `"InProgress"`).
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "pending" => Self::Pending,
            "inprogress" => Self::InProgress,
            "approved" => Self::Approved,
            "completed" => Self::Completed,
            "rejected" => Self::Rejected,
            _ => Self::Unknown(raw.to_owned()),
        }
    }

    /// Classifies a reported status detail, falling back to the numeric
    /// id when the string form is unrecognized.
    pub fn of(detail: &StatusDetail) -> Self {
        let parsed = Self::parse(&detail.status);
        if let Self::Unknown(_) = parsed {
            if let Some(by_id) = detail.status_id.and_then(Self::from_status_id) {
                return by_id;
            }
        }
        parsed
    }

    /// Numeric status ids used by some engine revisions. `Approved`
    /// carries no stable id upstream.
    pub fn from_status_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::Pending),
            3 => Some(Self::Completed),
            4 => Some(Self::Rejected),
            5 => Some(Self::InProgress),
            _ => None,
        }
    }

    pub fn status_id(&self) -> Option<i32> {
        match self {
            Self::Pending => Some(1),
            Self::Completed => Some(3),
            Self::Rejected => Some(4),
            Self::InProgress => Some(5),
            Self::Approved | Self::Unknown(_) => None,
        }
    }

    /// Formal terminal states. No further transition is ever observed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// Whether a local approve/reject decision is legal. The
    /// `InProgress -> Approved | Rejected` edge is the only transition
    /// this system initiates.
    pub fn is_decidable(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Whether approve/reject controls should be offered at all.
    /// Identical to [`is_decidable`](Self::is_decidable) today, kept
    /// separate so presentation gating does not leak into the decision
    /// precondition.
    pub fn actions_visible(&self) -> bool {
        self.is_decidable()
    }

    /// Validates an observed transition against the monotonic lifecycle
    /// graph. Refreshed data that appears to move a request backward is
    /// reported as an error rather than applied.
    pub fn validate_transition(&self, next: &Self) -> Result<(), TransitionError> {
        let legal = match (self, next) {
            (from, to) if from == to => true,
            // An unknown endpoint cannot be ordered, so it is accepted.
            (Self::Unknown(_), _) | (_, Self::Unknown(_)) => true,
            (Self::Pending, Self::InProgress) => true,
            (Self::Pending, Self::Approved | Self::Rejected | Self::Completed) => true,
            (Self::InProgress, Self::Approved | Self::Rejected | Self::Completed) => true,
            (Self::Approved | Self::Rejected, Self::Completed) => true,
            _ => false,
        };

        if legal {
            Ok(())
        } else {
            Err(TransitionError { from: self.clone(), to: next.clone() })
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("Pending"),
            Self::InProgress => f.write_str("In Progress"),
            Self::Approved => f.write_str("Approved"),
            Self::Completed => f.write_str("Completed"),
            Self::Rejected => f.write_str("Rejected"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_across_separator_variants() {
        for raw in ["IN PROGRESS", "in progress", "In Progress", "in-progress", "InProgress"] {
            assert_eq!(RequestState::parse(raw), RequestState::InProgress, "raw: {raw}");
        }
        assert_eq!(RequestState::parse("PENDING"), RequestState::Pending);
        assert_eq!(RequestState::parse("rejected"), RequestState::Rejected);
    }

    #[test]
    fn unrecognized_status_passes_through() {
        let state = RequestState::parse("Awaiting Quorum");
        assert_eq!(state, RequestState::Unknown("Awaiting Quorum".to_owned()));
        assert_eq!(state.to_string(), "Awaiting Quorum");
        assert!(!state.is_terminal());
        assert!(!state.is_decidable());
    }

    #[test]
    fn classification_falls_back_to_status_id() {
        let detail = StatusDetail {
            status: "WIP".to_owned(),
            status_id: Some(5),
            remarks: None,
        };
        assert_eq!(RequestState::of(&detail), RequestState::InProgress);

        // A recognized string wins over a contradictory id.
        let detail = StatusDetail {
            status: "COMPLETED".to_owned(),
            status_id: Some(1),
            remarks: None,
        };
        assert_eq!(RequestState::of(&detail), RequestState::Completed);
    }

    #[test]
    fn only_in_progress_is_decidable() {
        assert!(RequestState::InProgress.is_decidable());
        for state in [
            RequestState::Pending,
            RequestState::Approved,
            RequestState::Completed,
            RequestState::Rejected,
        ] {
            assert!(!state.is_decidable(), "state: {state}");
            assert!(!state.actions_visible(), "state: {state}");
        }
    }

    #[test]
    fn terminal_states_are_completed_and_rejected() {
        assert!(RequestState::Completed.is_terminal());
        assert!(RequestState::Rejected.is_terminal());
        assert!(!RequestState::Approved.is_terminal());
        assert!(!RequestState::InProgress.is_terminal());
    }

    #[test]
    fn backward_transitions_are_rejected() {
        let error = RequestState::Completed
            .validate_transition(&RequestState::Pending)
            .expect_err("completed is final");
        assert_eq!(error.from, RequestState::Completed);
        assert_eq!(error.to, RequestState::Pending);

        assert!(RequestState::Approved.validate_transition(&RequestState::InProgress).is_err());
        assert!(RequestState::Rejected.validate_transition(&RequestState::Approved).is_err());
    }

    #[test]
    fn forward_transitions_are_accepted() {
        assert!(RequestState::Pending.validate_transition(&RequestState::InProgress).is_ok());
        assert!(RequestState::InProgress.validate_transition(&RequestState::Approved).is_ok());
        assert!(RequestState::InProgress.validate_transition(&RequestState::Rejected).is_ok());
        assert!(RequestState::Approved.validate_transition(&RequestState::Completed).is_ok());
        // Self-transition is a no-op refresh.
        assert!(RequestState::InProgress.validate_transition(&RequestState::InProgress).is_ok());
    }

    #[test]
    fn status_id_round_trip_where_defined() {
        for id in [1, 3, 4, 5] {
            let state = RequestState::from_status_id(id).expect("defined id");
            assert_eq!(state.status_id(), Some(id));
        }
        assert_eq!(RequestState::from_status_id(2), None);
        assert_eq!(RequestState::Approved.status_id(), None);
    }
}
