//! Data structures for esports tournaments: bracket, participants, tournament record.

mod bracket;
mod participant;
mod tournament;

pub use bracket::{Bracket, BracketError, Entrant, Match, MatchId, Slot, SlotPosition, SlotRef};
pub use participant::{Participant, PaymentStatus, ReviewAction, FREE_ENTRY};
pub use tournament::{
    Tournament, TournamentError, TournamentId, TournamentSettings, TournamentStatus,
};
