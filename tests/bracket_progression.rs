//! Integration tests for result reporting: normal progression, corrections, idempotence, errors.

use esports_tournament_web::{
    advance, build_bracket, Advancement, Bracket, BracketError, Entrant, FixedSeeder, Slot,
    SlotPosition, SlotRef,
};

fn names(list: &[&str]) -> Vec<Entrant> {
    list.iter().map(|s| s.to_string()).collect()
}

fn entrant(name: &str) -> Slot {
    Slot::Entrant(name.to_string())
}

/// A-B (match 1), C-D (match 2), final (match 3).
fn four_team_bracket() -> Bracket {
    build_bracket(&names(&["A", "B", "C", "D"]), &mut FixedSeeder).unwrap()
}

fn winner_of(bracket: &Bracket, id: u32) -> Option<&str> {
    bracket.get(id).unwrap().winner.as_deref()
}

#[test]
fn first_result_fills_the_reserved_slot() {
    let mut bracket = four_team_bracket();
    let before = bracket.clone();

    let outcome = advance(&mut bracket, 1, "A").unwrap();
    assert_eq!(
        outcome,
        Advancement::Recorded {
            downstream: SlotRef {
                match_id: 3,
                position: SlotPosition::Player1
            },
            reset_winner: None,
        }
    );
    assert_eq!(winner_of(&bracket, 1), Some("A"));
    assert_eq!(bracket.get(3).unwrap().player1, entrant("A"));
    assert_eq!(bracket.get(3).unwrap().player2, Slot::Empty);
    assert_eq!(bracket.get(2), before.get(2));
    assert_eq!(bracket.len(), before.len());
}

#[test]
fn out_of_order_results_keep_bracket_branches() {
    let mut bracket = four_team_bracket();
    advance(&mut bracket, 2, "D").unwrap();
    let fin = bracket.get(3).unwrap();
    assert_eq!(fin.player1, Slot::Empty);
    assert_eq!(fin.player2, entrant("D"));

    let teams: Vec<Entrant> = (0..8).map(|i| format!("T{i}")).collect();
    let mut eight = build_bracket(&teams, &mut FixedSeeder).unwrap();
    // Match 4 (T6-T7) belongs to the lower half: it feeds match 6, never match 5.
    advance(&mut eight, 4, "T6").unwrap();
    assert_eq!(eight.get(5).unwrap().player1, Slot::Empty);
    assert_eq!(eight.get(5).unwrap().player2, Slot::Empty);
    assert_eq!(eight.get(6).unwrap().player2, entrant("T6"));
}

#[test]
fn full_run_crowns_a_champion() {
    let mut bracket = four_team_bracket();
    advance(&mut bracket, 1, "B").unwrap();
    advance(&mut bracket, 2, "C").unwrap();
    assert_eq!(bracket.champion(), None);
    advance(&mut bracket, 3, "C").unwrap();
    assert_eq!(bracket.champion(), Some("C"));
    assert!(bracket.get(3).unwrap().is_decided());
    assert!(bracket.validate().is_ok());
}

#[test]
fn correction_replaces_old_winner_and_clears_next_result() {
    let mut bracket = four_team_bracket();
    advance(&mut bracket, 1, "A").unwrap();
    advance(&mut bracket, 2, "C").unwrap();
    advance(&mut bracket, 3, "C").unwrap();

    let outcome = advance(&mut bracket, 1, "B").unwrap();
    assert_eq!(
        outcome,
        Advancement::Corrected {
            downstream: Some(SlotRef {
                match_id: 3,
                position: SlotPosition::Player1
            }),
            reset_winner: Some("C".to_string()),
        }
    );
    assert_eq!(winner_of(&bracket, 1), Some("B"));
    let fin = bracket.get(3).unwrap();
    assert_eq!(fin.player1, entrant("B"));
    assert_eq!(fin.player2, entrant("C"));
    assert_eq!(fin.winner, None);
    assert!(bracket
        .matches()
        .filter(|m| m.round == 2)
        .all(|m| m.position_of("A").is_none()));
}

#[test]
fn correction_before_next_round_is_played_resets_nothing() {
    let mut bracket = four_team_bracket();
    advance(&mut bracket, 1, "A").unwrap();
    let outcome = advance(&mut bracket, 1, "B").unwrap();
    assert_eq!(
        outcome,
        Advancement::Corrected {
            downstream: Some(SlotRef {
                match_id: 3,
                position: SlotPosition::Player1
            }),
            reset_winner: None,
        }
    );
    assert_eq!(bracket.get(3).unwrap().player1, entrant("B"));
}

#[test]
fn repeating_a_result_changes_nothing() {
    let mut bracket = four_team_bracket();
    advance(&mut bracket, 1, "A").unwrap();
    advance(&mut bracket, 2, "D").unwrap();
    advance(&mut bracket, 3, "D").unwrap();
    let before = bracket.clone();

    assert_eq!(advance(&mut bracket, 1, "A").unwrap(), Advancement::Unchanged);
    assert_eq!(bracket, before);
    assert_eq!(winner_of(&bracket, 3), Some("D"));
}

#[test]
fn unknown_match_or_outsider_winner_is_rejected_untouched() {
    let mut bracket = four_team_bracket();
    advance(&mut bracket, 1, "A").unwrap();
    let before = bracket.clone();

    assert_eq!(
        advance(&mut bracket, 99, "A"),
        Err(BracketError::MatchNotFound(99))
    );
    assert_eq!(
        advance(&mut bracket, 2, "A"),
        Err(BracketError::InvalidWinner {
            match_id: 2,
            winner: "A".to_string()
        })
    );
    // An empty slot can never be named as the winner.
    assert!(matches!(
        advance(&mut bracket, 3, ""),
        Err(BracketError::InvalidWinner { .. })
    ));
    assert_eq!(bracket, before);
}

#[test]
fn deciding_the_final_opens_a_match_past_it() {
    let mut bracket = build_bracket(&names(&["A", "B"]), &mut FixedSeeder).unwrap();
    let outcome = advance(&mut bracket, 1, "A").unwrap();
    assert_eq!(
        outcome,
        Advancement::Recorded {
            downstream: SlotRef {
                match_id: 2,
                position: SlotPosition::Player1
            },
            reset_winner: None,
        }
    );
    let extra = bracket.get(2).unwrap();
    assert_eq!(extra.round, 2);
    assert_eq!(extra.player1, entrant("A"));
    assert_eq!(extra.player2, Slot::Empty);
    assert_eq!(extra.winner, None);
    assert_eq!(bracket.final_round(), 1);
    assert_eq!(bracket.champion(), Some("A"));

    advance(&mut bracket, 1, "B").unwrap();
    assert_eq!(bracket.get(2).unwrap().player1, entrant("B"));
    assert_eq!(bracket.champion(), Some("B"));
    assert_eq!(bracket.len(), 2);
}

#[test]
fn correction_does_not_cascade_past_the_next_round() {
    let mut bracket = four_team_bracket();
    advance(&mut bracket, 1, "A").unwrap();
    advance(&mut bracket, 2, "C").unwrap();
    advance(&mut bracket, 3, "A").unwrap();
    assert_eq!(bracket.get(4).unwrap().player1, entrant("A"));

    let outcome = advance(&mut bracket, 1, "B").unwrap();
    assert!(matches!(
        outcome,
        Advancement::Corrected { reset_winner: Some(ref w), .. } if w == "A"
    ));
    // Two rounds down the old winner is still recorded until the final is reported again.
    assert_eq!(bracket.get(4).unwrap().player1, entrant("A"));

    advance(&mut bracket, 3, "B").unwrap();
    assert_eq!(bracket.get(4).unwrap().player1, entrant("B"));
    assert_eq!(bracket.champion(), Some("B"));
}

#[test]
fn rereporting_a_cleared_match_clears_the_stale_result_after_it() {
    let teams: Vec<Entrant> = (0..8).map(|i| format!("T{i}")).collect();
    let mut bracket = build_bracket(&teams, &mut FixedSeeder).unwrap();
    for (id, winner) in [(1, "T0"), (2, "T2"), (5, "T0"), (3, "T4"), (4, "T6"), (6, "T4"), (7, "T0")] {
        advance(&mut bracket, id, winner).unwrap();
    }
    assert_eq!(bracket.champion(), Some("T0"));

    // The quarter-final correction clears the semi-final; the final keeps T0 for now.
    advance(&mut bracket, 1, "T1").unwrap();
    assert_eq!(winner_of(&bracket, 5), None);
    assert_eq!(winner_of(&bracket, 7), Some("T0"));

    let outcome = advance(&mut bracket, 5, "T1").unwrap();
    assert_eq!(
        outcome,
        Advancement::Recorded {
            downstream: SlotRef {
                match_id: 7,
                position: SlotPosition::Player1
            },
            reset_winner: Some("T0".to_string()),
        }
    );
    let fin = bracket.get(7).unwrap();
    assert_eq!(fin.player1, entrant("T1"));
    assert_eq!(fin.player2, entrant("T4"));
    assert_eq!(fin.winner, None);
    assert_eq!(bracket.champion(), None);
    assert!(bracket.validate().is_ok());

    advance(&mut bracket, 7, "T1").unwrap();
    assert_eq!(bracket.champion(), Some("T1"));
    assert!(bracket.validate().is_ok());
}

#[test]
fn match_past_the_final_cannot_be_reported() {
    let mut bracket = four_team_bracket();
    advance(&mut bracket, 1, "A").unwrap();
    advance(&mut bracket, 2, "C").unwrap();
    advance(&mut bracket, 3, "A").unwrap();
    let before = bracket.clone();

    assert_eq!(advance(&mut bracket, 4, "A"), Err(BracketError::BeyondFinal(4)));
    assert_eq!(bracket, before);
    assert_eq!(bracket.len(), 4);
    assert_eq!(bracket.champion(), Some("A"));
}

#[test]
fn legacy_bracket_without_feed_pointers_uses_open_slots() {
    let json = serde_json::json!({
        "matches": [
            { "id": 1, "round": 1,
              "player1": { "kind": "entrant", "entrant": "Red Dragons" },
              "player2": { "kind": "entrant", "entrant": "Blue Skulls" },
              "winner": "Red Dragons" },
            { "id": 2, "round": 1,
              "player1": { "kind": "entrant", "entrant": "Green Vipers" },
              "player2": { "kind": "entrant", "entrant": "Yellow Bolts" },
              "winner": null },
            { "id": 3, "round": 2,
              "player1": { "kind": "entrant", "entrant": "Red Dragons" },
              "player2": { "kind": "empty" },
              "winner": null }
        ]
    });
    let mut bracket: Bracket = serde_json::from_value(json).unwrap();
    assert_eq!(bracket.final_round(), 2);

    advance(&mut bracket, 2, "Green Vipers").unwrap();
    assert_eq!(bracket.get(3).unwrap().player2, entrant("Green Vipers"));
    assert_eq!(
        bracket.get(2).unwrap().next,
        Some(SlotRef {
            match_id: 3,
            position: SlotPosition::Player2
        })
    );

    // Match 1 never had a pointer: the old winner is found by scanning round 2.
    advance(&mut bracket, 1, "Blue Skulls").unwrap();
    assert_eq!(bracket.get(3).unwrap().player1, entrant("Blue Skulls"));
    advance(&mut bracket, 2, "Yellow Bolts").unwrap();
    assert_eq!(bracket.get(3).unwrap().player2, entrant("Yellow Bolts"));
}

#[test]
fn bye_slot_cannot_win() {
    let json = serde_json::json!({
        "matches": [
            { "id": 1, "round": 1,
              "player1": { "kind": "entrant", "entrant": "A" },
              "player2": { "kind": "bye" },
              "winner": null }
        ]
    });
    let mut bracket: Bracket = serde_json::from_value(json).unwrap();
    assert!(matches!(
        advance(&mut bracket, 1, "BYE"),
        Err(BracketError::InvalidWinner { .. })
    ));
    assert!(advance(&mut bracket, 1, "A").is_ok());
}
