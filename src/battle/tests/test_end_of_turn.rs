use crate::battle::events::{BattleEvent, EventLog};
use crate::battle::tests::common::*;
use crate::rng::ScriptedRng;
use pretty_assertions::assert_eq;
use schema::{SideConditionKind, StatusCondition, WeatherKind};

#[test]
fn poison_and_burn_chip_at_turn_end() {
    let player = TestCreatureBuilder::new("embercub")
        .with_status(StatusCondition::Burn)
        .build();
    let enemy = TestCreatureBuilder::new("tidepup")
        .with_status(StatusCondition::Poison)
        .build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        Box::new(ScriptedRng::new(vec![])),
    ));

    let mut log = EventLog::new();
    engine.run_turn(Vec::new(), &mut log, &mut []).unwrap();

    let player_creature = engine.field().creature_at(player_slot()).unwrap();
    let enemy_creature = engine.field().creature_at(enemy_slot()).unwrap();
    assert_eq!(
        player_creature.max_hp() - player_creature.current_hp(),
        player_creature.max_hp() / 16,
        "burn chips a sixteenth"
    );
    assert_eq!(
        enemy_creature.max_hp() - enemy_creature.current_hp(),
        enemy_creature.max_hp() / 8,
        "poison chips an eighth"
    );
    assert_eq!(
        log.count_matching(|event| matches!(event, BattleEvent::DamageDealt { .. })),
        2
    );
}

#[test]
fn sandstorm_spares_earth_creatures_and_expires_on_schedule() {
    let player = TestCreatureBuilder::new("granitebear")
        .with_moves(&["sandstorm_call"])
        .build();
    let enemy = TestCreatureBuilder::new("tidepup").build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        // one tie per turn; nothing else rolls
        Box::new(ScriptedRng::new(vec![0])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(vec![player_move("sandstorm_call")], &mut log, &mut [])
        .unwrap();

    let player_creature = engine.field().creature_at(player_slot()).unwrap();
    let enemy_creature = engine.field().creature_at(enemy_slot()).unwrap();
    assert_eq!(
        player_creature.current_hp(),
        player_creature.max_hp(),
        "Earth creatures ignore the sandstorm"
    );
    assert_eq!(
        enemy_creature.max_hp() - enemy_creature.current_hp(),
        enemy_creature.max_hp() / 16
    );

    // Four more idle turns tick the 5-turn weather away.
    for _ in 0..4 {
        engine.run_turn(Vec::new(), &mut log, &mut []).unwrap();
    }
    assert_eq!(engine.field().weather, None);
    assert_eq!(
        log.count_matching(|event| matches!(
            event,
            BattleEvent::WeatherChanged { weather: None }
        )),
        1
    );
}

#[test]
fn hail_spares_ice_creatures() {
    let player = TestCreatureBuilder::new("frostfawn")
        .with_moves(&["hail_call"])
        .build();
    let enemy = TestCreatureBuilder::new("tidepup").build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        Box::new(ScriptedRng::new(vec![0])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(vec![player_move("hail_call")], &mut log, &mut [])
        .unwrap();

    let player_creature = engine.field().creature_at(player_slot()).unwrap();
    let enemy_creature = engine.field().creature_at(enemy_slot()).unwrap();
    assert_eq!(player_creature.current_hp(), player_creature.max_hp());
    assert!(enemy_creature.current_hp() < enemy_creature.max_hp());
}

#[test]
fn verdant_terrain_mends_the_wounded() {
    let player = TestCreatureBuilder::new("thornling")
        .with_moves(&["verdant_field"])
        .with_hp(50)
        .build();
    let enemy = TestCreatureBuilder::new("tidepup").build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        Box::new(ScriptedRng::new(vec![0])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(vec![player_move("verdant_field")], &mut log, &mut [])
        .unwrap();

    let player_creature = engine.field().creature_at(player_slot()).unwrap();
    assert_eq!(
        player_creature.current_hp(),
        50 + player_creature.max_hp() / 16
    );
}

#[test]
fn sustain_herb_heals_its_holder_every_turn() {
    let player = TestCreatureBuilder::new("tidepup")
        .with_hp(50)
        .with_held_item("sustain_herb")
        .build();
    let enemy = TestCreatureBuilder::new("embercub").build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        Box::new(ScriptedRng::new(vec![])),
    ));

    let mut log = EventLog::new();
    engine.run_turn(Vec::new(), &mut log, &mut []).unwrap();

    let player_creature = engine.field().creature_at(player_slot()).unwrap();
    assert_eq!(
        player_creature.current_hp(),
        50 + player_creature.max_hp() / 16
    );
    assert_eq!(
        log.count_matching(|event| matches!(
            event,
            BattleEvent::Message { text } if text.contains("Sustain Herb")
        )),
        1
    );
}

#[test]
fn tailwind_runs_out_after_its_allotted_turns() {
    let player = TestCreatureBuilder::new("galehawk")
        .with_moves(&["tailwind"])
        .build();
    let enemy = TestCreatureBuilder::new("tidepup").build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        Box::new(ScriptedRng::new(vec![0])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(vec![player_move("tailwind")], &mut log, &mut [])
        .unwrap();
    assert!(engine
        .field()
        .side(crate::battle::field::SideId::Player)
        .has_condition(SideConditionKind::Tailwind));

    for _ in 0..3 {
        engine.run_turn(Vec::new(), &mut log, &mut []).unwrap();
    }
    assert!(!engine
        .field()
        .side(crate::battle::field::SideId::Player)
        .has_condition(SideConditionKind::Tailwind));
    assert_eq!(
        log.count_matching(|event| matches!(
            event,
            BattleEvent::SideConditionEnded {
                condition: SideConditionKind::Tailwind,
                ..
            }
        )),
        1
    );
}

#[test]
fn setting_weather_announces_it() {
    let player = TestCreatureBuilder::new("granitebear")
        .with_moves(&["sandstorm_call"])
        .build();
    let enemy = TestCreatureBuilder::new("tidepup").build();
    let mut engine = started(singles_engine_with_rng(
        vec![player],
        vec![enemy],
        Box::new(ScriptedRng::new(vec![0])),
    ));

    let mut log = EventLog::new();
    engine
        .run_turn(vec![player_move("sandstorm_call")], &mut log, &mut [])
        .unwrap();

    assert_eq!(
        log.count_matching(|event| matches!(
            event,
            BattleEvent::WeatherChanged {
                weather: Some(WeatherKind::Sandstorm)
            }
        )),
        1
    );
}
