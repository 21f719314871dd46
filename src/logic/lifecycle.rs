//! Tournament lifecycle around the bracket: generation, result reporting, derived status.

use crate::logic::builder::build_bracket;
use crate::logic::progression::{advance, Advancement};
use crate::logic::registration::eligible_entrants;
use crate::logic::seeding::Seeder;
use crate::models::{Bracket, MatchId, Tournament, TournamentError, TournamentStatus};

/// Build the bracket from the verified participants (Open -> InProgress).
///
/// Nothing on the tournament changes if the build fails.
pub fn generate_bracket<S: Seeder + ?Sized>(
    tournament: &mut Tournament,
    seeder: &mut S,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Open {
        return Err(TournamentError::InvalidState);
    }
    let entrants = eligible_entrants(tournament);
    let bracket = build_bracket(&entrants, seeder)?;
    log::info!(
        "bracket generated for {}: {} teams -> {} matches",
        tournament.short_id,
        entrants.len(),
        bracket.len()
    );
    tournament.bracket = bracket;
    tournament.status = TournamentStatus::InProgress;
    Ok(())
}

/// Record a match result (including corrections) and refresh the status.
pub fn report_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: &str,
) -> Result<Advancement, TournamentError> {
    if tournament.status == TournamentStatus::Open || tournament.bracket.is_empty() {
        return Err(TournamentError::InvalidState);
    }
    let outcome = advance(&mut tournament.bracket, match_id, winner)?;

    let status = derive_status(&tournament.bracket);
    if status != tournament.status {
        log::info!("tournament {} is now {:?}", tournament.short_id, status);
        tournament.status = status;
    }
    Ok(outcome)
}

/// Open without a bracket, Completed once the final has a winner, InProgress otherwise.
pub fn derive_status(bracket: &Bracket) -> TournamentStatus {
    if bracket.is_empty() {
        TournamentStatus::Open
    } else if bracket.champion().is_some() {
        TournamentStatus::Completed
    } else {
        TournamentStatus::InProgress
    }
}
