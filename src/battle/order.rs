//! The turn-order resolver.
//!
//! Sorts the actions collected for a turn by descending priority bracket,
//! then descending effective speed of the acting slot, then a random key
//! drawn from the battle's seeded source - so full-speed ties are fair but
//! reproducible under a fixed seed.

use crate::battle::actions::Action;
use crate::battle::field::Field;
use crate::battle::stats::effective_speed;
use crate::content::Dex;
use crate::rng::BattleRng;
use ordered_float::OrderedFloat;

pub fn order_actions(
    field: &Field,
    dex: &Dex,
    actions: Vec<Action>,
    rng: &mut dyn BattleRng,
) -> Vec<Action> {
    let mut keyed: Vec<(i8, OrderedFloat<f32>, u32, Action)> = actions
        .into_iter()
        .map(|action| {
            let priority = action.priority(dex);
            let speed = action
                .user_slot()
                .map(|slot_ref| effective_speed(field, slot_ref))
                .unwrap_or(0.0);
            let tie_break = rng.next_int(u32::MAX);
            (priority, OrderedFloat(speed), tie_break, action)
        })
        .collect();

    keyed.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| a.2.cmp(&b.2))
    });

    keyed.into_iter().map(|(_, _, _, action)| action).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::field::{Side, SideId, SlotRef};
    use crate::creature::Creature;
    use crate::rng::SeededRng;
    use pretty_assertions::assert_eq;
    use schema::{ElementType, SideConditionKind, StatusCondition};

    fn field_with_speeds(player_speed: u16, enemy_speed: u16) -> Field {
        let player = Creature::new_for_test(
            "Ours",
            (ElementType::Normal, None),
            [100, 60, 60, 60, 60, player_speed],
            [const { None }; 4],
        );
        let enemy = Creature::new_for_test(
            "Theirs",
            (ElementType::Normal, None),
            [100, 60, 60, 60, 60, enemy_speed],
            [const { None }; 4],
        );
        let mut field = Field::new(
            Side::new(SideId::Player, 1, vec![player]),
            Side::new(SideId::Enemy, 1, vec![enemy]),
        );
        field
            .slot_mut(SlotRef::new(SideId::Player, 0))
            .set_occupant(0);
        field
            .slot_mut(SlotRef::new(SideId::Enemy, 0))
            .set_occupant(0);
        field
    }

    fn use_move(side: SideId, move_id: &str) -> Action {
        Action::UseMove {
            user: SlotRef::new(side, 0),
            target: SlotRef::new(side.opponent(), 0),
            move_id: move_id.to_string(),
        }
    }

    fn acting_side(action: &Action) -> SideId {
        action.user_slot().unwrap().side
    }

    #[test]
    fn higher_priority_beats_any_speed() {
        let field = field_with_speeds(10, 200);
        let dex = Dex::demo();
        let mut rng = SeededRng::new(1);
        // Player is far slower but Quick Jab sits in a higher bracket.
        let ordered = order_actions(
            &field,
            &dex,
            vec![
                use_move(SideId::Enemy, "tackle"),
                use_move(SideId::Player, "quick_jab"),
            ],
            &mut rng,
        );
        assert_eq!(acting_side(&ordered[0]), SideId::Player);
    }

    #[test]
    fn switches_outrank_priority_moves() {
        let field = field_with_speeds(10, 200);
        let dex = Dex::demo();
        let mut rng = SeededRng::new(1);
        let ordered = order_actions(
            &field,
            &dex,
            vec![
                use_move(SideId::Enemy, "quick_jab"),
                Action::Switch {
                    slot: SlotRef::new(SideId::Player, 0),
                    roster_index: 1,
                },
            ],
            &mut rng,
        );
        assert!(matches!(ordered[0], Action::Switch { .. }));
    }

    #[test]
    fn faster_user_acts_first_within_a_bracket() {
        let field = field_with_speeds(90, 30);
        let dex = Dex::demo();
        let mut rng = SeededRng::new(7);
        let ordered = order_actions(
            &field,
            &dex,
            vec![
                use_move(SideId::Enemy, "tackle"),
                use_move(SideId::Player, "tackle"),
            ],
            &mut rng,
        );
        assert_eq!(acting_side(&ordered[0]), SideId::Player);
    }

    #[test]
    fn paralysis_can_flip_the_order() {
        let mut field = field_with_speeds(90, 65);
        field
            .creature_at_mut(SlotRef::new(SideId::Player, 0))
            .unwrap()
            .status = Some(StatusCondition::Paralysis);
        let dex = Dex::demo();
        let mut rng = SeededRng::new(7);
        // 90 * 0.5 = 45 < 65: the unafflicted side now leads.
        let ordered = order_actions(
            &field,
            &dex,
            vec![
                use_move(SideId::Player, "tackle"),
                use_move(SideId::Enemy, "tackle"),
            ],
            &mut rng,
        );
        assert_eq!(acting_side(&ordered[0]), SideId::Enemy);
    }

    #[test]
    fn tailwind_can_flip_the_order() {
        let mut field = field_with_speeds(40, 60);
        field
            .side_mut(SideId::Player)
            .set_condition(SideConditionKind::Tailwind, 4);
        let dex = Dex::demo();
        let mut rng = SeededRng::new(7);
        let ordered = order_actions(
            &field,
            &dex,
            vec![
                use_move(SideId::Player, "tackle"),
                use_move(SideId::Enemy, "tackle"),
            ],
            &mut rng,
        );
        assert_eq!(acting_side(&ordered[0]), SideId::Player);
    }

    #[test]
    fn speed_ties_break_reproducibly_but_not_one_sidedly() {
        let field = field_with_speeds(70, 70);
        let dex = Dex::demo();

        // Same seed, same order.
        let order_under = |seed: u64| {
            let mut rng = SeededRng::new(seed);
            let ordered = order_actions(
                &field,
                &dex,
                vec![
                    use_move(SideId::Player, "tackle"),
                    use_move(SideId::Enemy, "tackle"),
                ],
                &mut rng,
            );
            acting_side(&ordered[0])
        };
        assert_eq!(order_under(42), order_under(42));

        // Across seeds, both sides get to lead.
        let leaders: Vec<SideId> = (0..32).map(order_under).collect();
        assert!(leaders.contains(&SideId::Player));
        assert!(leaders.contains(&SideId::Enemy));
    }

    #[test]
    fn actions_without_a_user_slot_order_at_speed_zero() {
        let field = field_with_speeds(5, 5);
        let dex = Dex::demo();
        let mut rng = SeededRng::new(3);
        let ordered = order_actions(
            &field,
            &dex,
            vec![
                Action::SetWeather {
                    weather: schema::WeatherKind::Hailstorm,
                    turns: 5,
                },
                use_move(SideId::Player, "tackle"),
            ],
            &mut rng,
        );
        // The slotless system action still sorts, after the speed-5 move.
        assert!(matches!(ordered[1], Action::SetWeather { .. }));
        assert_eq!(ordered.len(), 2);
    }
}
