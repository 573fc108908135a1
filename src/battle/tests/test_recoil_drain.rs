use crate::battle::events::{BattleEvent, EventLog};
use crate::battle::field::SideId;
use crate::battle::tests::common::*;
use crate::rng::ScriptedRng;
use pretty_assertions::assert_eq;

fn damage_events(log: &EventLog) -> Vec<(String, u16)> {
    log.events()
        .iter()
        .filter_map(|event| match event {
            BattleEvent::DamageDealt {
                target_name,
                amount,
                ..
            } => Some((target_name.clone(), *amount)),
            _ => None,
        })
        .collect()
}

#[test]
fn recoil_is_a_third_of_the_pipeline_damage() {
    let player = TestCreatureBuilder::new("embercub")
        .with_moves(&["flare_charge"])
        .build();
    let enemy = TestCreatureBuilder::new("granitebear").build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        // tie, accuracy, crit, max damage roll
        Box::new(ScriptedRng::new(vec![0, 0, 1, 15])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(vec![player_move("flare_charge")], &mut log, &mut [])
        .unwrap();

    let damage = damage_events(&log);
    assert_eq!(damage.len(), 2);
    let (hit_target, hit_amount) = &damage[0];
    let (recoil_target, recoil_amount) = &damage[1];
    assert_eq!(hit_target, "Granitebear");
    assert_eq!(recoil_target, "Embercub");
    assert_eq!(*recoil_amount, hit_amount * 33 / 100);
}

#[test]
fn recoil_tracks_pipeline_damage_even_on_overkill() {
    // The defender has 1 HP, so HP lost is 1 - but the recoil is still a
    // third of the pipeline's full figure.
    let player = TestCreatureBuilder::new("embercub")
        .with_moves(&["flare_charge"])
        .build();
    let enemy = TestCreatureBuilder::new("granitebear").with_hp(1).build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        Box::new(ScriptedRng::new(vec![0, 0, 1, 15])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(vec![player_move("flare_charge")], &mut log, &mut [])
        .unwrap();

    let damage = damage_events(&log);
    let (_, hit_amount) = &damage[0];
    let (_, recoil_amount) = &damage[1];
    assert!(*hit_amount > 1, "pipeline damage ignores remaining HP");
    assert_eq!(*recoil_amount, hit_amount * 33 / 100);
}

#[test]
fn sure_footed_nullifies_recoil() {
    let player = TestCreatureBuilder::new("embercub")
        .with_moves(&["flare_charge"])
        .with_ability("sure_footed")
        .build();
    let enemy = TestCreatureBuilder::new("granitebear").build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        Box::new(ScriptedRng::new(vec![0, 0, 1, 15])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(vec![player_move("flare_charge")], &mut log, &mut [])
        .unwrap();

    let damage = damage_events(&log);
    assert_eq!(damage.len(), 1, "no recoil damage event");
    let player_creature = &engine.field().side(SideId::Player).roster[0];
    assert_eq!(player_creature.current_hp(), player_creature.max_hp());
}

#[test]
fn drain_heals_half_the_pipeline_damage() {
    let player = TestCreatureBuilder::new("thornling")
        .with_moves(&["leech_bite"])
        .with_hp(60)
        .build();
    let enemy = TestCreatureBuilder::new("tidepup").build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        Box::new(ScriptedRng::new(vec![0, 0, 1, 15])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(vec![player_move("leech_bite")], &mut log, &mut [])
        .unwrap();

    let hit_amount = damage_events(&log)[0].1;
    let healed: Vec<u16> = log
        .events()
        .iter()
        .filter_map(|event| match event {
            BattleEvent::Healed { amount, .. } => Some(*amount),
            _ => None,
        })
        .collect();
    assert_eq!(healed, vec![hit_amount * 50 / 100]);
}

#[test]
fn siphon_root_boosts_drained_hp() {
    let player = TestCreatureBuilder::new("thornling")
        .with_moves(&["leech_bite"])
        .with_hp(60)
        .with_held_item("siphon_root")
        .build();
    let enemy = TestCreatureBuilder::new("tidepup").build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        Box::new(ScriptedRng::new(vec![0, 0, 1, 15])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(vec![player_move("leech_bite")], &mut log, &mut [])
        .unwrap();

    let hit_amount = damage_events(&log)[0].1;
    let healed: Vec<u16> = log
        .events()
        .iter()
        .filter_map(|event| match event {
            BattleEvent::Healed { amount, .. } => Some(*amount),
            _ => None,
        })
        .collect();
    let base_drain = (hit_amount * 50 / 100) as i32;
    assert_eq!(healed, vec![(base_drain * 130 / 100) as u16]);
}
