//! Registered participants and their payment-proof verification status.

use crate::models::bracket::Entrant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transaction id recorded for tournaments without an entry fee.
pub const FREE_ENTRY: &str = "Free Entry";

/// Where a participant's payment proof stands.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    PendingVerification,
    Verified,
    Rejected,
}

/// Admin decision on a pending registration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
}

/// A registered team (or solo player).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub email: String,
    pub team_name: String,
    /// "Solo", "Duo", "Squad", ...
    pub team_size: String,
    /// Roster (in-game names).
    #[serde(default)]
    pub players: Vec<String>,
    pub transaction_id: String,
    pub payment_status: PaymentStatus,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    /// New registration, pending verification, joined now.
    pub fn new(
        email: impl Into<String>,
        team_name: impl Into<String>,
        transaction_id: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            team_name: team_name.into(),
            team_size: "Solo".to_string(),
            players: Vec::new(),
            transaction_id: transaction_id.into(),
            payment_status: PaymentStatus::PendingVerification,
            joined_at: Utc::now(),
        }
    }

    /// Bracket identifier: the team name, or the email when no team name was given.
    pub fn entrant(&self) -> Entrant {
        let name = self.team_name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }

    pub fn is_verified(&self) -> bool {
        self.payment_status == PaymentStatus::Verified
    }

    pub fn is_rejected(&self) -> bool {
        self.payment_status == PaymentStatus::Rejected
    }

    pub fn review(&mut self, action: ReviewAction) {
        self.payment_status = match action {
            ReviewAction::Approve => PaymentStatus::Verified,
            ReviewAction::Reject => PaymentStatus::Rejected,
        };
    }
}
