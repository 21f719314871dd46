//! Single-elimination bracket construction: power-of-two sizing with byes into round 2.

use crate::logic::seeding::Seeder;
use crate::models::{Bracket, BracketError, Entrant, Match, MatchId, Slot, SlotPosition, SlotRef};
use std::collections::HashSet;
use std::iter;

/// Build the initial bracket for `entrants`.
///
/// 1. Seed (shuffle) the entrants.
/// 2. Pad to the next power of two; the first `bracket_size - n` seeds get byes.
/// 3. Round 1 pairs the remaining entrants.
/// 4. Round 2 pairs the bye teams followed by one empty slot per round-1 match.
/// 5. Each further round halves the previous one until a single final remains.
///
/// Ids start at 1 and ascend in creation order. Every match except the final
/// points at the downstream slot its winner fills.
pub fn build_bracket<S: Seeder + ?Sized>(
    entrants: &[Entrant],
    seeder: &mut S,
) -> Result<Bracket, BracketError> {
    check_entrants(entrants)?;

    let mut teams = entrants.to_vec();
    seeder.seed(&mut teams);

    let n = teams.len();
    let bracket_size = n.next_power_of_two();
    let bye_count = bracket_size - n;
    let final_round = bracket_size.trailing_zeros();
    let (bye_teams, fight_teams) = teams.split_at(bye_count);

    let mut next_id: MatchId = 1;
    let mut new_match = |round: u32, player1: Slot, player2: Slot| {
        let m = Match::new(next_id, round, player1, player2);
        next_id += 1;
        m
    };

    let mut matches = Vec::with_capacity(n - 1);
    let mut current: Vec<Match> = fight_teams
        .chunks_exact(2)
        .map(|pair| new_match(1, Slot::Entrant(pair[0].clone()), Slot::Entrant(pair[1].clone())))
        .collect();

    if bracket_size > 2 {
        let pool: Vec<Slot> = bye_teams
            .iter()
            .cloned()
            .map(Slot::Entrant)
            .chain(iter::repeat(Slot::Empty).take(current.len()))
            .collect();
        let mut following: Vec<Match> = pool
            .chunks_exact(2)
            .map(|pair| new_match(2, pair[0].clone(), pair[1].clone()))
            .collect();
        // Round-1 winners take the pool positions after the bye teams.
        link(&mut current, &following, bye_count);
        matches.append(&mut current);

        let mut round = 2;
        while following.len() > 1 {
            round += 1;
            let next_round: Vec<Match> = (0..following.len() / 2)
                .map(|_| new_match(round, Slot::Empty, Slot::Empty))
                .collect();
            link(&mut following, &next_round, 0);
            matches.append(&mut following);
            following = next_round;
        }
        current = following;
    }
    matches.append(&mut current);

    log::debug!(
        "built bracket: {} entrants, {} byes, {} rounds, {} matches",
        n,
        bye_count,
        final_round,
        matches.len()
    );
    Bracket::from_matches(matches, final_round)
}

/// At least two distinct entrants, none repeated.
fn check_entrants(entrants: &[Entrant]) -> Result<(), BracketError> {
    let mut seen = HashSet::with_capacity(entrants.len());
    let mut duplicate = None;
    for e in entrants {
        if !seen.insert(e.as_str()) && duplicate.is_none() {
            duplicate = Some(e.clone());
        }
    }
    if seen.len() < 2 {
        return Err(BracketError::InsufficientEntrants { found: seen.len() });
    }
    match duplicate {
        Some(name) => Err(BracketError::DuplicateEntrant(name)),
        None => Ok(()),
    }
}

/// Point `upstream[i]` at pool position `offset + i` of `downstream` (two positions per match).
fn link(upstream: &mut [Match], downstream: &[Match], offset: usize) {
    for (i, m) in upstream.iter_mut().enumerate() {
        let position = offset + i;
        m.next = Some(SlotRef {
            match_id: downstream[position / 2].id,
            position: if position % 2 == 0 {
                SlotPosition::Player1
            } else {
                SlotPosition::Player2
            },
        });
    }
}
