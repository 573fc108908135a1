use crate::battle::events::{BattleEvent, EventLog};
use crate::battle::tests::common::*;
use crate::rng::ScriptedRng;
use pretty_assertions::assert_eq;
use schema::StatusKind;

fn position(log: &EventLog, predicate: impl Fn(&BattleEvent) -> bool) -> usize {
    log.events()
        .iter()
        .position(predicate)
        .expect("expected event missing")
}

#[test]
fn a_moves_full_consequence_chain_runs_before_the_next_queued_action() {
    // Ember Burst's burn rider resolves before Tidepup's own move, even
    // though Tidepup's action was queued in the same turn.
    let player = TestCreatureBuilder::new("embercub")
        .with_moves(&["ember_burst"])
        .build();
    let enemy = TestCreatureBuilder::new("tidepup").build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        // ties, ember burst (accuracy, crit, damage, burn chance 5 < 10),
        // then tidepup's tackle (accuracy, crit, damage)
        Box::new(ScriptedRng::new(vec![0, 0, 0, 1, 15, 5, 0, 1, 15])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(
            vec![player_move("ember_burst"), enemy_move("tackle")],
            &mut log,
            &mut [],
        )
        .unwrap();

    let burst = position(&log, |event| {
        matches!(event, BattleEvent::MoveUsed { move_name, .. } if move_name == "Ember Burst")
    });
    let damage = position(&log, |event| {
        matches!(event, BattleEvent::DamageDealt { target_name, .. } if target_name == "Tidepup")
    });
    let burn = position(&log, |event| {
        matches!(
            event,
            BattleEvent::StatusInflicted {
                status: StatusKind::Burn,
                ..
            }
        )
    });
    let tackle = position(&log, |event| {
        matches!(event, BattleEvent::MoveUsed { move_name, .. } if move_name == "Tackle")
    });

    assert!(burst < damage);
    assert!(damage < burn, "damage resolves before the status rider");
    assert!(burn < tackle, "the whole chain precedes the next action");
}

#[test]
fn a_kill_resolves_its_faint_before_the_status_rider_can_speak() {
    // Venom Sting against a 1-HP target: the faint lands, and the poison
    // rider finds nobody to poison.
    let player = TestCreatureBuilder::new("thornling")
        .with_moves(&["venom_sting"])
        .build();
    let enemy = TestCreatureBuilder::new("tidepup").with_hp(1).build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        // tie, accuracy, crit, damage (the poison chance is never reached
        // by the rng because the handler still rolls it - include it)
        Box::new(ScriptedRng::new(vec![0, 0, 1, 15, 5])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(vec![player_move("venom_sting")], &mut log, &mut [])
        .unwrap();

    let damage = position(&log, |event| {
        matches!(event, BattleEvent::DamageDealt { .. })
    });
    let faint = position(&log, |event| matches!(event, BattleEvent::Fainted { .. }));
    assert!(damage < faint);
    assert_eq!(
        log.count_matching(|event| matches!(event, BattleEvent::StatusInflicted { .. })),
        0,
        "a fainted creature cannot be poisoned"
    );
}

#[test]
fn flinch_cancels_the_slower_action_this_turn() {
    // Galehawk's Bite flinches Tidepup; Tidepup's queued move fizzles.
    let player = TestCreatureBuilder::new("galehawk")
        .with_moves(&["bite"])
        .build();
    let enemy = TestCreatureBuilder::new("tidepup").build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        // ties, bite (accuracy, crit, damage, flinch chance 10 < 30)
        Box::new(ScriptedRng::new(vec![0, 0, 0, 1, 15, 10])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(
            vec![player_move("bite"), enemy_move("tackle")],
            &mut log,
            &mut [],
        )
        .unwrap();

    assert_eq!(
        log.count_matching(
            |event| matches!(event, BattleEvent::MoveUsed { move_name, .. } if move_name == "Tackle")
        ),
        0
    );
    assert_eq!(
        log.count_matching(|event| matches!(
            event,
            BattleEvent::Message { text } if text.contains("flinched")
        )),
        1
    );
    // Only the bite dealt damage.
    assert_eq!(
        log.count_matching(|event| matches!(event, BattleEvent::DamageDealt { .. })),
        1
    );
}
