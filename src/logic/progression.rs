//! Result reporting: record a match winner and move it into the next round.

use crate::models::{Bracket, BracketError, Entrant, Match, MatchId, Slot, SlotPosition, SlotRef};

/// What a reported result changed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Advancement {
    /// First result for the match; the winner now sits in `downstream`.
    /// `reset_winner` is the downstream result cleared because the slot held
    /// someone else (left over from an earlier correction).
    Recorded {
        downstream: SlotRef,
        reset_winner: Option<Entrant>,
    },
    /// The result changed. `downstream` is the slot where the old winner was
    /// replaced (if it had been placed), `reset_winner` the downstream result
    /// that was cleared because its input changed.
    Corrected {
        downstream: Option<SlotRef>,
        reset_winner: Option<Entrant>,
    },
    /// The same winner was reported again; nothing changed.
    Unchanged,
}

/// Where a first result goes.
enum Placement {
    Slot(SlotRef),
    /// No slot waiting in the next round: open a match with this id.
    Append(MatchId),
}

/// Record `winner` for match `match_id` and propagate it one round forward.
///
/// Fails without touching the bracket if the match is unknown, lies past the
/// final, or `winner` does not occupy one of its slots.
///
/// A correction replaces the old winner in the next round and clears that
/// match's result. It does not reach further: if the old winner already
/// advanced two rounds, the caller corrects each level in turn.
pub fn advance(
    bracket: &mut Bracket,
    match_id: MatchId,
    winner: &str,
) -> Result<Advancement, BracketError> {
    let m = bracket
        .get(match_id)
        .ok_or(BracketError::MatchNotFound(match_id))?;
    if m.round > bracket.final_round() {
        return Err(BracketError::BeyondFinal(match_id));
    }
    if m.position_of(winner).is_none() {
        return Err(BracketError::InvalidWinner {
            match_id,
            winner: winner.to_string(),
        });
    }
    let round = m.round;
    let next = m.next;

    match m.winner.clone() {
        None => {
            let placement = match next.or_else(|| first_open_slot(bracket, round + 1)) {
                Some(target) => Placement::Slot(target),
                None => Placement::Append(bracket.next_id()?),
            };
            let outcome = record(bracket, match_id, round, placement, winner);
            log::debug!("match {} won by '{}': {:?}", match_id, winner, outcome);
            Ok(outcome)
        }
        Some(old) if old == winner => Ok(Advancement::Unchanged),
        Some(old) => {
            let outcome = correct(bracket, match_id, round, next, &old, winner);
            log::warn!(
                "match {} corrected from '{}' to '{}': {:?}",
                match_id,
                old,
                winner,
                outcome
            );
            Ok(outcome)
        }
    }
}

fn record(
    bracket: &mut Bracket,
    match_id: MatchId,
    round: u32,
    placement: Placement,
    winner: &str,
) -> Advancement {
    let mut reset_winner = None;
    let target = match placement {
        Placement::Slot(target) => {
            if let Some(downstream) = bracket.get_mut(target.match_id) {
                let slot = downstream.slot_mut(target.position);
                let stale = slot.entrant().map_or(false, |e| e != winner);
                *slot = Slot::Entrant(winner.to_string());
                // A different entrant was still sitting here: its result no longer stands.
                if stale {
                    reset_winner = downstream.winner.take();
                }
            }
            target
        }
        Placement::Append(id) => {
            bracket.push(Match::new(id, round + 1, Slot::Entrant(winner.to_string()), Slot::Empty));
            SlotRef {
                match_id: id,
                position: SlotPosition::Player1,
            }
        }
    };

    if let Some(m) = bracket.get_mut(match_id) {
        m.winner = Some(winner.to_string());
        m.next = Some(target);
    }
    Advancement::Recorded {
        downstream: target,
        reset_winner,
    }
}

fn correct(
    bracket: &mut Bracket,
    match_id: MatchId,
    round: u32,
    next: Option<SlotRef>,
    old: &str,
    winner: &str,
) -> Advancement {
    let downstream = next
        .filter(|t| holds(bracket, *t, old))
        .or_else(|| slot_holding(bracket, round + 1, old));

    let mut reset_winner = None;
    if let Some(target) = downstream {
        if let Some(d) = bracket.get_mut(target.match_id) {
            *d.slot_mut(target.position) = Slot::Entrant(winner.to_string());
            reset_winner = d.winner.take();
        }
    }
    if let Some(m) = bracket.get_mut(match_id) {
        m.winner = Some(winner.to_string());
        if downstream.is_some() {
            m.next = downstream;
        }
    }
    Advancement::Corrected {
        downstream,
        reset_winner,
    }
}

fn holds(bracket: &Bracket, target: SlotRef, entrant: &str) -> bool {
    bracket
        .get(target.match_id)
        .map_or(false, |m| m.slot(target.position).entrant() == Some(entrant))
}

/// First empty slot in `round`, in creation order (brackets without feed pointers).
fn first_open_slot(bracket: &Bracket, round: u32) -> Option<SlotRef> {
    bracket.round(round).find_map(|m| {
        m.first_open().map(|position| SlotRef {
            match_id: m.id,
            position,
        })
    })
}

fn slot_holding(bracket: &Bracket, round: u32, entrant: &str) -> Option<SlotRef> {
    bracket.round(round).find_map(|m| {
        m.position_of(entrant).map(|position| SlotRef {
            match_id: m.id,
            position,
        })
    })
}
