//! Tournament record, TournamentStatus, and TournamentError.

use crate::models::bracket::{Bracket, BracketError};
use crate::models::participant::Participant;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// No tournament with this id.
    NotFound(TournamentId),
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Registration without an email address.
    MissingEmail,
    /// Email or team name already registered (team names compare case-insensitively).
    DuplicateParticipant(String),
    /// All slots are taken.
    TournamentFull { max_slots: u32 },
    /// Paid tournament joined without a transaction id.
    PaymentProofRequired,
    /// No participant registered with this email.
    ParticipantNotFound(String),
    /// The store could not be accessed.
    Storage(String),
    /// Building or progressing the bracket failed.
    Bracket(BracketError),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::NotFound(_) => write!(f, "Tournament not found"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::MissingEmail => write!(f, "An email address is required to join"),
            TournamentError::DuplicateParticipant(name) => write!(f, "'{}' is already registered", name),
            TournamentError::TournamentFull { max_slots } => {
                write!(f, "Tournament is full ({} slots)", max_slots)
            }
            TournamentError::PaymentProofRequired => {
                write!(f, "Payment proof (transaction id) is required for this tournament")
            }
            TournamentError::ParticipantNotFound(email) => write!(f, "No participant registered as {}", email),
            TournamentError::Storage(reason) => write!(f, "Storage error: {}", reason),
            TournamentError::Bracket(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TournamentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TournamentError::Bracket(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BracketError> for TournamentError {
    fn from(e: BracketError) -> Self {
        TournamentError::Bracket(e)
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Registration open; no bracket yet.
    #[default]
    Open,
    /// Bracket generated; results being reported.
    InProgress,
    /// Final decided.
    Completed,
}

/// Admin-supplied fields for a new tournament.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentSettings {
    pub title: String,
    pub game: String,
    pub format: String,
    /// "Free" (or empty) for free entry; anything else requires payment proof.
    pub entry_fee: String,
    /// 0 means unlimited.
    pub max_slots: u32,
    pub map: Option<String>,
    pub prize: Option<String>,
    /// Scheduled start, as entered by the admin.
    pub date: Option<String>,
    pub time: Option<String>,
    pub discord_link: Option<String>,
}

/// Full tournament record: settings, registrations, bracket, and phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    /// Human-friendly code, e.g. "TRN-4821".
    pub short_id: String,
    pub title: String,
    pub game: String,
    pub format: String,
    pub entry_fee: String,
    pub max_slots: u32,
    pub map: Option<String>,
    pub prize: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub discord_link: Option<String>,
    pub participants: Vec<Participant>,
    pub status: TournamentStatus,
    pub bracket: Bracket,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new open tournament with no participants and an empty bracket.
    pub fn new(settings: TournamentSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            short_id: generate_short_id(&mut rand::thread_rng()),
            title: settings.title,
            game: settings.game,
            format: settings.format,
            entry_fee: settings.entry_fee,
            max_slots: settings.max_slots,
            map: settings.map,
            prize: settings.prize,
            date: settings.date,
            time: settings.time,
            discord_link: settings.discord_link,
            participants: Vec::new(),
            status: TournamentStatus::Open,
            bracket: Bracket::empty(),
            created_at: Utc::now(),
        }
    }

    /// Whether joining requires a transaction id.
    pub fn is_paid(&self) -> bool {
        let fee = self.entry_fee.trim();
        !fee.is_empty() && !fee.eq_ignore_ascii_case("free")
    }

    pub fn get_participant_mut(&mut self, email: &str) -> Option<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.email.eq_ignore_ascii_case(email))
    }

    /// Participants holding (or waiting for) a slot.
    pub fn active_participants(&self) -> usize {
        self.participants.iter().filter(|p| !p.is_rejected()).count()
    }
}

/// "TRN-" followed by four digits.
fn generate_short_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("TRN-{}", rng.gen_range(1000..10000))
}
