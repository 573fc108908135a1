//! The outcome arbiter: derives the battle's terminal state from the field.

use crate::battle::field::{Field, SideId};
use serde::{Deserialize, Serialize};

/// Battle outcome from the player side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    Victory,
    Defeat,
    Draw,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// Recomputed from scratch each time: a side with zero able roster members
/// has lost; both at once is a draw.
pub fn assess(field: &Field) -> Outcome {
    let player_standing = field.side(SideId::Player).has_able_member();
    let enemy_standing = field.side(SideId::Enemy).has_able_member();
    match (player_standing, enemy_standing) {
        (false, false) => Outcome::Draw,
        (true, false) => Outcome::Victory,
        (false, true) => Outcome::Defeat,
        (true, true) => Outcome::Ongoing,
    }
}

/// The battle's final summary, handed back by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub outcome: Outcome,
    pub turns: u32,
    /// Player roster index of the member that dealt the most damage.
    pub mvp: Option<usize>,
    /// Names of the enemy roster members defeated during the battle.
    pub defeated: Vec<String>,
}

/// Running totals the engine keeps across a battle: damage credit for the
/// most-valuable-participant pick and the list of defeated opponents.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    damage_credit: std::collections::HashMap<usize, u64>,
    defeated: Vec<String>,
}

impl Tally {
    pub fn record_damage(&mut self, player_roster_index: usize, amount: u16) {
        *self.damage_credit.entry(player_roster_index).or_insert(0) += amount as u64;
    }

    pub fn record_defeated(&mut self, name: String) {
        self.defeated.push(name);
    }

    /// The player roster member with the most damage credit.
    pub fn mvp(&self) -> Option<usize> {
        self.damage_credit
            .iter()
            .max_by_key(|(index, total)| (**total, std::cmp::Reverse(**index)))
            .map(|(index, _)| *index)
    }

    pub fn defeated(&self) -> &[String] {
        &self.defeated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::field::{Side, SideId};
    use crate::creature::Creature;
    use pretty_assertions::assert_eq;
    use schema::ElementType;

    fn creature(name: &str) -> Creature {
        Creature::new_for_test(
            name,
            (ElementType::Normal, None),
            [50, 50, 50, 50, 50, 50],
            [const { None }; 4],
        )
    }

    fn field() -> Field {
        Field::new(
            Side::new(SideId::Player, 1, vec![creature("Ours")]),
            Side::new(SideId::Enemy, 1, vec![creature("Theirs")]),
        )
    }

    #[test]
    fn both_standing_is_ongoing() {
        assert_eq!(assess(&field()), Outcome::Ongoing);
    }

    #[test]
    fn enemy_wipe_is_victory() {
        let mut field = field();
        field.side_mut(SideId::Enemy).roster[0].take_damage(9999);
        assert_eq!(assess(&field), Outcome::Victory);
    }

    #[test]
    fn player_wipe_is_defeat() {
        let mut field = field();
        field.side_mut(SideId::Player).roster[0].take_damage(9999);
        assert_eq!(assess(&field), Outcome::Defeat);
    }

    #[test]
    fn double_wipe_is_a_draw() {
        let mut field = field();
        field.side_mut(SideId::Player).roster[0].take_damage(9999);
        field.side_mut(SideId::Enemy).roster[0].take_damage(9999);
        assert_eq!(assess(&field), Outcome::Draw);
    }
}
