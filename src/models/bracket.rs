//! Bracket data shapes: entrants, slots, matches, and the bracket itself.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Team (or solo player) identifier placed in the bracket.
pub type Entrant = String;

/// Unique identifier for a match within one tournament's bracket.
pub type MatchId = u32;

/// Errors raised while building, progressing, or loading a bracket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Fewer than two distinct entrants.
    InsufficientEntrants { found: usize },
    /// The same entrant was listed twice.
    DuplicateEntrant(Entrant),
    /// No match with this id.
    MatchNotFound(MatchId),
    /// The match lies past the final and cannot be played.
    BeyondFinal(MatchId),
    /// The named winner does not play in the match.
    InvalidWinner { match_id: MatchId, winner: Entrant },
    /// A loaded bracket breaks a structural invariant.
    Inconsistent(String),
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InsufficientEntrants { found } => {
                write!(f, "Need at least 2 verified teams to generate a bracket (found {})", found)
            }
            BracketError::DuplicateEntrant(name) => write!(f, "Team '{}' is listed more than once", name),
            BracketError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            BracketError::BeyondFinal(id) => write!(f, "Match {} comes after the final", id),
            BracketError::InvalidWinner { match_id, winner } => {
                write!(f, "'{}' does not play in match {}", winner, match_id)
            }
            BracketError::Inconsistent(reason) => write!(f, "Inconsistent bracket: {}", reason),
        }
    }
}

impl std::error::Error for BracketError {}

/// One of the two positions of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPosition {
    Player1,
    Player2,
}

/// Content of a slot.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "entrant")]
pub enum Slot {
    /// Waiting for an upstream winner.
    #[default]
    Empty,
    /// Filler position; never wins.
    Bye,
    Entrant(Entrant),
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn entrant(&self) -> Option<&str> {
        match self {
            Slot::Entrant(name) => Some(name),
            _ => None,
        }
    }
}

/// Pointer to the downstream slot a match's winner moves into.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SlotRef {
    pub match_id: MatchId,
    pub position: SlotPosition,
}

/// A single bracket match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// 1 = first round; the highest built round is the final.
    pub round: u32,
    pub player1: Slot,
    pub player2: Slot,
    /// None while undecided.
    pub winner: Option<Entrant>,
    /// Where the winner goes. None for the final and for legacy brackets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<SlotRef>,
}

impl Match {
    pub fn new(id: MatchId, round: u32, player1: Slot, player2: Slot) -> Self {
        Self {
            id,
            round,
            player1,
            player2,
            winner: None,
            next: None,
        }
    }

    pub fn slot(&self, position: SlotPosition) -> &Slot {
        match position {
            SlotPosition::Player1 => &self.player1,
            SlotPosition::Player2 => &self.player2,
        }
    }

    pub fn slot_mut(&mut self, position: SlotPosition) -> &mut Slot {
        match position {
            SlotPosition::Player1 => &mut self.player1,
            SlotPosition::Player2 => &mut self.player2,
        }
    }

    /// Position occupied by `entrant`, checking player1 first.
    pub fn position_of(&self, entrant: &str) -> Option<SlotPosition> {
        if self.player1.entrant() == Some(entrant) {
            Some(SlotPosition::Player1)
        } else if self.player2.entrant() == Some(entrant) {
            Some(SlotPosition::Player2)
        } else {
            None
        }
    }

    /// First empty slot, player1 before player2.
    pub fn first_open(&self) -> Option<SlotPosition> {
        if self.player1.is_empty() {
            Some(SlotPosition::Player1)
        } else if self.player2.is_empty() {
            Some(SlotPosition::Player2)
        } else {
            None
        }
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }
}

/// Wire shape of a bracket: the flat match list in creation order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct BracketDocument {
    #[serde(default)]
    final_round: u32,
    #[serde(default)]
    matches: Vec<Match>,
}

/// All matches of one tournament, keyed by id (ids ascend in creation order).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BracketDocument", into = "BracketDocument")]
pub struct Bracket {
    matches: BTreeMap<MatchId, Match>,
    /// Depth produced by the builder; the final is the one match of this round.
    final_round: u32,
}

impl Bracket {
    /// Bracket with no matches (tournament not started).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a bracket from a flat match list. `final_round` of 0 means "the highest round present".
    pub fn from_matches(matches: Vec<Match>, final_round: u32) -> Result<Self, BracketError> {
        let mut map = BTreeMap::new();
        for m in matches {
            let id = m.id;
            if map.insert(id, m).is_some() {
                return Err(BracketError::Inconsistent(format!("match id {} used twice", id)));
            }
        }
        let final_round = if final_round == 0 {
            map.values().map(|m| m.round).max().unwrap_or(0)
        } else {
            final_round
        };
        let bracket = Self {
            matches: map,
            final_round,
        };
        bracket.validate()?;
        Ok(bracket)
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn final_round(&self) -> u32 {
        self.final_round
    }

    pub fn get(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.get_mut(&id)
    }

    /// Matches in creation order.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.values()
    }

    /// Matches of one round, in creation order.
    pub fn round(&self, round: u32) -> impl Iterator<Item = &Match> {
        self.matches.values().filter(move |m| m.round == round)
    }

    /// Highest round present (can exceed `final_round` once the final is decided).
    pub fn max_round(&self) -> u32 {
        self.matches.values().map(|m| m.round).max().unwrap_or(0)
    }

    /// Id the next appended match receives.
    pub fn next_id(&self) -> Result<MatchId, BracketError> {
        match self.matches.keys().next_back() {
            None => Ok(1),
            Some(id) => id
                .checked_add(1)
                .ok_or_else(|| BracketError::Inconsistent(format!("no match id left after {}", id))),
        }
    }

    pub fn final_match(&self) -> Option<&Match> {
        self.round(self.final_round).next()
    }

    /// Winner of the final, once decided.
    pub fn champion(&self) -> Option<&str> {
        self.final_match().and_then(|m| m.winner.as_deref())
    }

    pub(crate) fn push(&mut self, m: Match) {
        self.matches.insert(m.id, m);
    }

    /// Check the structural invariants every built or loaded bracket must hold.
    pub fn validate(&self) -> Result<(), BracketError> {
        if self.matches.is_empty() {
            return Ok(());
        }
        let inconsistent = |reason: String| Err(BracketError::Inconsistent(reason));

        if let Some(m) = self.matches.values().find(|m| m.round == 0) {
            return inconsistent(format!("match {} has round 0", m.id));
        }
        let rounds: HashSet<u32> = self.matches.values().map(|m| m.round).collect();
        let max_round = self.max_round();
        if let Some(missing) = (1..=max_round).find(|r| !rounds.contains(r)) {
            return inconsistent(format!("round {} has no matches", missing));
        }
        if self.round(self.final_round).count() != 1 {
            return inconsistent(format!("final round {} must hold exactly one match", self.final_round));
        }

        let mut fed = HashSet::new();
        for m in self.matches.values() {
            if let Some(w) = &m.winner {
                if m.position_of(w).is_none() {
                    return inconsistent(format!("winner '{}' of match {} is not a participant", w, m.id));
                }
            }
            let Some(next) = m.next else {
                continue;
            };
            match self.matches.get(&next.match_id) {
                Some(target) if target.round == m.round + 1 => {}
                Some(_) => {
                    return inconsistent(format!("match {} feeds a match outside round {}", m.id, m.round + 1));
                }
                None => return inconsistent(format!("match {} feeds missing match {}", m.id, next.match_id)),
            }
            if !fed.insert(next) {
                return inconsistent(format!(
                    "slot {:?} of match {} is fed twice",
                    next.position, next.match_id
                ));
            }
        }
        Ok(())
    }
}

impl TryFrom<BracketDocument> for Bracket {
    type Error = BracketError;

    fn try_from(doc: BracketDocument) -> Result<Self, Self::Error> {
        Bracket::from_matches(doc.matches, doc.final_round)
    }
}

impl From<Bracket> for BracketDocument {
    fn from(bracket: Bracket) -> Self {
        Self {
            final_round: bracket.final_round,
            matches: bracket.matches.into_values().collect(),
        }
    }
}
