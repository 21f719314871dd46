//! Esports tournament operations: single-elimination bracket engine with models,
//! business logic, and a transactional in-memory store.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    advance, build_bracket, derive_status, eligible_entrants, generate_bracket, join_tournament,
    report_result, review_participant, Advancement, FixedSeeder, RandomSeeder, Seeder,
};
pub use models::{
    Bracket, BracketError, Entrant, Match, MatchId, Participant, PaymentStatus, ReviewAction, Slot,
    SlotPosition, SlotRef, Tournament, TournamentError, TournamentId, TournamentSettings,
    TournamentStatus, FREE_ENTRY,
};
pub use store::TournamentStore;
