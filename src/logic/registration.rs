//! Registration phase: joining, payment-proof review, and the eligible entrant list.

use crate::models::{
    Entrant, Participant, PaymentStatus, ReviewAction, Tournament, TournamentError, TournamentStatus,
    FREE_ENTRY,
};

/// Register a team. Paid tournaments need a transaction id and start the team
/// as pending verification; free tournaments verify immediately.
pub fn join_tournament(
    tournament: &mut Tournament,
    mut participant: Participant,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Open {
        return Err(TournamentError::InvalidState);
    }
    participant.email = participant.email.trim().to_string();
    participant.team_name = participant.team_name.trim().to_string();
    if participant.email.is_empty() {
        return Err(TournamentError::MissingEmail);
    }

    if tournament.max_slots > 0 && tournament.active_participants() >= tournament.max_slots as usize {
        return Err(TournamentError::TournamentFull {
            max_slots: tournament.max_slots,
        });
    }
    let entrant = participant.entrant();
    let is_duplicate = tournament.participants.iter().any(|p| {
        p.email.eq_ignore_ascii_case(&participant.email) || p.entrant().eq_ignore_ascii_case(&entrant)
    });
    if is_duplicate {
        return Err(TournamentError::DuplicateParticipant(entrant));
    }

    if tournament.is_paid() {
        if participant.transaction_id.trim().is_empty() {
            return Err(TournamentError::PaymentProofRequired);
        }
        participant.payment_status = PaymentStatus::PendingVerification;
    } else {
        participant.transaction_id = FREE_ENTRY.to_string();
        participant.payment_status = PaymentStatus::Verified;
    }

    log::info!(
        "{} joined tournament {} ({:?})",
        entrant,
        tournament.short_id,
        participant.payment_status
    );
    tournament.participants.push(participant);
    Ok(())
}

/// Approve or reject a participant's payment proof.
pub fn review_participant(
    tournament: &mut Tournament,
    email: &str,
    action: ReviewAction,
) -> Result<(), TournamentError> {
    let short_id = tournament.short_id.clone();
    let p = tournament
        .get_participant_mut(email.trim())
        .ok_or_else(|| TournamentError::ParticipantNotFound(email.to_string()))?;
    p.review(action);
    log::info!("{} {:?} in tournament {}", p.entrant(), p.payment_status, short_id);
    Ok(())
}

/// Verified participants, in registration order, as bracket entrants.
pub fn eligible_entrants(tournament: &Tournament) -> Vec<Entrant> {
    tournament
        .participants
        .iter()
        .filter(|p| p.is_verified())
        .map(Participant::entrant)
        .collect()
}
