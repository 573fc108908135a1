use schema::{ElementType, MoveData, SpeciesData, StatusCondition};
use serde::{Deserialize, Serialize};

/// A known move and its remaining uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub move_id: String,
    pub pp: u8,
}

impl MoveInstance {
    pub fn new(data: &MoveData) -> Self {
        Self {
            move_id: data.id.clone(),
            pp: data.max_pp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseMoveError {
    NoPpRemaining,
    MoveNotKnown,
}

/// A roster member: the creature itself, independent of any battle. Battle
/// volatile state (stat stages, flinches, charge bookkeeping) lives on the
/// slot, not here; this is the state that survives switching out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    /// Species name if no nickname was given.
    pub name: String,
    pub species_id: String,
    pub level: u8,
    pub elements: (ElementType, Option<ElementType>),
    /// HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub stats: [u16; 6],
    current_hp: u16,
    pub moves: [Option<MoveInstance>; 4],
    pub status: Option<StatusCondition>,
    pub ability: Option<String>,
    pub held_item: Option<String>,
}

impl Creature {
    /// Builds a battle-ready creature from catalog rows. At most the first
    /// four moves are kept.
    pub fn from_species(species: &SpeciesData, level: u8, move_rows: &[&MoveData]) -> Self {
        let stats = compute_stats(species, level);
        let mut moves = [const { None }; 4];
        for (slot, data) in move_rows.iter().take(4).enumerate() {
            moves[slot] = Some(MoveInstance::new(data));
        }
        Self {
            name: species.name.clone(),
            species_id: species.id.clone(),
            level,
            elements: species.elements(),
            stats,
            current_hp: stats[0],
            moves,
            status: None,
            ability: None,
            held_item: None,
        }
    }

    pub fn with_nickname(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_ability(mut self, ability_id: &str) -> Self {
        self.ability = Some(ability_id.to_string());
        self
    }

    pub fn with_held_item(mut self, item_id: &str) -> Self {
        self.held_item = Some(item_id.to_string());
        self
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.stats[0]
    }

    pub fn base_speed(&self) -> u16 {
        self.stats[5]
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn has_element(&self, element: ElementType) -> bool {
        self.elements.0 == element || self.elements.1 == Some(element)
    }

    /// Reduces HP, clamping at zero. Returns true if this damage fainted the
    /// creature (it was alive before and is at zero now).
    pub fn take_damage(&mut self, amount: u16) -> bool {
        if self.current_hp == 0 {
            return false;
        }
        self.current_hp = self.current_hp.saturating_sub(amount);
        self.current_hp == 0
    }

    /// Restores HP, clamping at max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let headroom = self.max_hp() - self.current_hp;
        let restored = amount.min(headroom);
        self.current_hp += restored;
        restored
    }

    /// Spends one PP of the given move.
    pub fn use_move(&mut self, move_id: &str) -> Result<(), UseMoveError> {
        let instance = self
            .moves
            .iter_mut()
            .flatten()
            .find(|instance| instance.move_id == move_id)
            .ok_or(UseMoveError::MoveNotKnown)?;
        if instance.pp == 0 {
            return Err(UseMoveError::NoPpRemaining);
        }
        instance.pp -= 1;
        Ok(())
    }

    /// Applies a persistent status. Fails (returns false) if one is already
    /// present; a status never overwrites another.
    pub fn set_status(&mut self, status: StatusCondition) -> bool {
        if self.status.is_some() {
            return false;
        }
        self.status = Some(status);
        true
    }

    pub fn cure_status(&mut self) -> Option<StatusCondition> {
        self.status.take()
    }

    /// Test constructor with explicit stats, bypassing catalog lookups.
    #[cfg(test)]
    pub fn new_for_test(
        name: &str,
        elements: (ElementType, Option<ElementType>),
        stats: [u16; 6],
        moves: [Option<MoveInstance>; 4],
    ) -> Self {
        Self {
            name: name.to_string(),
            species_id: name.to_lowercase(),
            level: 50,
            elements,
            stats,
            current_hp: stats[0],
            moves,
            status: None,
            ability: None,
            held_item: None,
        }
    }
}

/// Stat computation from base stats and level. HP gets the flat level bonus;
/// the other five share one formula.
fn compute_stats(species: &SpeciesData, level: u8) -> [u16; 6] {
    let level = level as u32;
    let hp = (2 * species.base_stats.hp as u32 * level) / 100 + level + 10;
    let stat = |base: u8| ((2 * base as u32 * level) / 100 + 5) as u16;
    [
        hp as u16,
        stat(species.base_stats.attack),
        stat(species.base_stats.defense),
        stat(species.base_stats.sp_attack),
        stat(species.base_stats.sp_defense),
        stat(species.base_stats.speed),
    ]
}
