//! Read-only content repositories.
//!
//! Catalogs are keyed by string identifier and immutable once loaded. The
//! engine only ever reads them; anything that writes content (editors, data
//! pipelines) lives outside this crate and talks RON or JSON.

use crate::errors::{ContentError, ContentResult};
use schema::{
    AbilityData, BaseStats, Effect, ElementType, HazardKind, ItemData, MoveCategory, MoveData,
    SideConditionKind, SpeciesData, StatusKind, TerrainKind, Target, WeatherKind,
};
use schema::Stat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// The aggregate catalog: moves, species, abilities, and held items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dex {
    moves: HashMap<String, MoveData>,
    species: HashMap<String, SpeciesData>,
    abilities: HashMap<String, AbilityData>,
    items: HashMap<String, ItemData>,
}

/// On-disk catalog document. All sections are optional so content can be
/// split across files by kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDoc {
    #[serde(default)]
    pub moves: Vec<MoveData>,
    #[serde(default)]
    pub species: Vec<SpeciesData>,
    #[serde(default)]
    pub abilities: Vec<AbilityData>,
    #[serde(default)]
    pub items: Vec<ItemData>,
}

impl Dex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_data(&self, id: &str) -> ContentResult<&MoveData> {
        self.moves
            .get(id)
            .ok_or_else(|| ContentError::MoveNotFound(id.to_string()))
    }

    pub fn species(&self, id: &str) -> ContentResult<&SpeciesData> {
        self.species
            .get(id)
            .ok_or_else(|| ContentError::SpeciesNotFound(id.to_string()))
    }

    pub fn ability(&self, id: &str) -> ContentResult<&AbilityData> {
        self.abilities
            .get(id)
            .ok_or_else(|| ContentError::AbilityNotFound(id.to_string()))
    }

    pub fn item(&self, id: &str) -> ContentResult<&ItemData> {
        self.items
            .get(id)
            .ok_or_else(|| ContentError::ItemNotFound(id.to_string()))
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    /// Folds a parsed document into the catalog. Later entries win on id
    /// collision, which lets a local file override the demo catalog.
    pub fn merge(&mut self, doc: CatalogDoc) {
        for row in doc.moves {
            self.moves.insert(row.id.clone(), row);
        }
        for row in doc.species {
            self.species.insert(row.id.clone(), row);
        }
        for row in doc.abilities {
            self.abilities.insert(row.id.clone(), row);
        }
        for row in doc.items {
            self.items.insert(row.id.clone(), row);
        }
    }

    pub fn from_ron_str(source: &str) -> ContentResult<Self> {
        let doc: CatalogDoc =
            ron::from_str(source).map_err(|err| ContentError::Malformed(err.to_string()))?;
        let mut dex = Self::new();
        dex.merge(doc);
        Ok(dex)
    }

    pub fn from_json_str(source: &str) -> ContentResult<Self> {
        let doc: CatalogDoc = serde_json::from_str(source)
            .map_err(|err| ContentError::Malformed(err.to_string()))?;
        let mut dex = Self::new();
        dex.merge(doc);
        Ok(dex)
    }

    /// Loads every `.ron` and `.json` catalog file in a directory, merging in
    /// filename order.
    pub fn load_dir(dir: &Path) -> ContentResult<Self> {
        let mut entries: Vec<_> = fs::read_dir(dir)
            .map_err(|err| ContentError::Malformed(format!("{}: {}", dir.display(), err)))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("ron") | Some("json")
                )
            })
            .collect();
        entries.sort();

        let mut dex = Self::new();
        for path in entries {
            let source = fs::read_to_string(&path)
                .map_err(|err| ContentError::Malformed(format!("{}: {}", path.display(), err)))?;
            let doc = match path.extension().and_then(|ext| ext.to_str()) {
                Some("ron") => ron::from_str(&source)
                    .map_err(|err| ContentError::Malformed(format!("{}: {}", path.display(), err)))?,
                _ => serde_json::from_str(&source)
                    .map_err(|err| ContentError::Malformed(format!("{}: {}", path.display(), err)))?,
            };
            dex.merge(doc);
        }
        Ok(dex)
    }

    /// The built-in demo catalog: enough species, moves, abilities, and items
    /// to exercise every engine mechanic without external files.
    pub fn demo() -> Self {
        let mut dex = Self::new();
        dex.merge(CatalogDoc {
            moves: demo_moves(),
            species: demo_species(),
            abilities: demo_abilities(),
            items: demo_items(),
        });
        dex
    }
}

// --- Demo catalog -----------------------------------------------------------

fn strike(
    id: &str,
    name: &str,
    element: ElementType,
    category: MoveCategory,
    power: u16,
    accuracy: u8,
    max_pp: u8,
) -> MoveData {
    MoveData {
        id: id.to_string(),
        name: name.to_string(),
        element,
        category,
        power,
        accuracy: Some(accuracy),
        priority: 0,
        crit_boost: 0,
        makes_contact: matches!(category, MoveCategory::Physical),
        max_pp,
        effects: Vec::new(),
    }
}

fn ritual(id: &str, name: &str, element: ElementType, max_pp: u8, effects: Vec<Effect>) -> MoveData {
    MoveData {
        id: id.to_string(),
        name: name.to_string(),
        element,
        category: MoveCategory::Status,
        power: 0,
        accuracy: None,
        priority: 0,
        crit_boost: 0,
        makes_contact: false,
        max_pp,
        effects,
    }
}

fn demo_moves() -> Vec<MoveData> {
    use ElementType::*;
    use MoveCategory::*;

    let mut rows = vec![
        strike("tackle", "Tackle", Normal, Physical, 40, 100, 35),
        strike("slam", "Slam", Normal, Physical, 80, 75, 20),
        strike("water_pulse", "Water Pulse", Water, Special, 60, 100, 20),
        strike("quake_slam", "Quake Slam", Earth, Physical, 100, 100, 10),
        strike("gale_slash", "Gale Slash", Wind, Physical, 65, 95, 25),
        strike("shadow_rend", "Shadow Rend", Shade, Physical, 70, 100, 15),
        strike("mind_spike", "Mind Spike", Mystic, Special, 80, 100, 15),
    ];

    let mut quick_jab = strike("quick_jab", "Quick Jab", Normal, Physical, 40, 100, 30);
    quick_jab.priority = 1;
    rows.push(quick_jab);

    let mut keen_cut = strike("keen_cut", "Keen Cut", Normal, Physical, 55, 95, 25);
    keen_cut.crit_boost = 2;
    rows.push(keen_cut);

    let mut ember_burst = strike("ember_burst", "Ember Burst", Fire, Special, 70, 100, 15);
    ember_burst.effects = vec![Effect::InflictStatus {
        target: Target::Foe,
        status: StatusKind::Burn,
        chance: 10,
    }];
    rows.push(ember_burst);

    let mut flare_charge = strike("flare_charge", "Flare Charge", Fire, Physical, 120, 100, 15);
    flare_charge.effects = vec![Effect::Recoil { percent: 33 }];
    rows.push(flare_charge);

    let mut leech_bite = strike("leech_bite", "Leech Bite", Grass, Physical, 60, 100, 15);
    leech_bite.effects = vec![Effect::Drain { percent: 50 }];
    rows.push(leech_bite);

    let mut venom_sting = strike("venom_sting", "Venom Sting", Venom, Physical, 15, 100, 35);
    venom_sting.effects = vec![Effect::InflictStatus {
        target: Target::Foe,
        status: StatusKind::Poison,
        chance: 30,
    }];
    rows.push(venom_sting);

    let mut thunder_shock = strike("thunder_shock", "Thunder Shock", Electric, Special, 40, 100, 30);
    thunder_shock.effects = vec![Effect::InflictStatus {
        target: Target::Foe,
        status: StatusKind::Paralysis,
        chance: 10,
    }];
    rows.push(thunder_shock);

    let mut frost_beam = strike("frost_beam", "Frost Beam", Ice, Special, 90, 100, 10);
    frost_beam.effects = vec![Effect::InflictStatus {
        target: Target::Foe,
        status: StatusKind::Freeze,
        chance: 10,
    }];
    rows.push(frost_beam);

    let mut bite = strike("bite", "Bite", Shade, Physical, 60, 100, 25);
    bite.effects = vec![Effect::Flinch { chance: 30 }];
    rows.push(bite);

    let mut sky_dive = strike("sky_dive", "Sky Dive", Wind, Physical, 90, 95, 10);
    sky_dive.effects = vec![Effect::Charge {
        semi_invulnerable: true,
    }];
    rows.push(sky_dive);

    let mut lumen_cannon = strike("lumen_cannon", "Lumen Cannon", Grass, Special, 120, 100, 10);
    lumen_cannon.effects = vec![Effect::Charge {
        semi_invulnerable: false,
    }];
    rows.push(lumen_cannon);

    let mut retaliate = strike("retaliate", "Retaliate", Fighting, Physical, 0, 100, 20);
    retaliate.priority = -5;
    retaliate.effects = vec![Effect::Counter];
    rows.push(retaliate);

    // Status rituals
    let mut stun_wave = ritual(
        "stun_wave",
        "Stun Wave",
        Electric,
        20,
        vec![Effect::InflictStatus {
            target: Target::Foe,
            status: StatusKind::Paralysis,
            chance: 100,
        }],
    );
    stun_wave.accuracy = Some(90);
    rows.push(stun_wave);

    let mut dream_mist = ritual(
        "dream_mist",
        "Dream Mist",
        Mystic,
        15,
        vec![Effect::InflictStatus {
            target: Target::Foe,
            status: StatusKind::Sleep,
            chance: 100,
        }],
    );
    dream_mist.accuracy = Some(75);
    rows.push(dream_mist);

    let mut guard_stance = ritual("guard_stance", "Guard Stance", Normal, 10, vec![Effect::Protect]);
    guard_stance.priority = 4;
    rows.push(guard_stance);

    rows.push(ritual(
        "bulk_up",
        "Bulk Up",
        Fighting,
        20,
        vec![
            Effect::StatChange {
                target: Target::User,
                stat: Stat::Attack,
                stages: 1,
                chance: 100,
            },
            Effect::StatChange {
                target: Target::User,
                stat: Stat::Defense,
                stages: 1,
                chance: 100,
            },
        ],
    ));

    let mut screech = ritual(
        "screech",
        "Screech",
        Normal,
        40,
        vec![Effect::StatChange {
            target: Target::Foe,
            stat: Stat::Defense,
            stages: -2,
            chance: 100,
        }],
    );
    screech.accuracy = Some(85);
    rows.push(screech);

    rows.push(ritual("mend", "Mend", Normal, 10, vec![Effect::Heal { percent: 50 }]));

    rows.push(ritual(
        "sandstorm_call",
        "Sandstorm Call",
        Earth,
        10,
        vec![Effect::SetWeather {
            weather: WeatherKind::Sandstorm,
            turns: 5,
        }],
    ));

    rows.push(ritual(
        "hail_call",
        "Hail Call",
        Ice,
        10,
        vec![Effect::SetWeather {
            weather: WeatherKind::Hailstorm,
            turns: 5,
        }],
    ));

    rows.push(ritual(
        "verdant_field",
        "Verdant Field",
        Grass,
        10,
        vec![Effect::SetTerrain {
            terrain: TerrainKind::Verdant,
            turns: 5,
        }],
    ));

    rows.push(ritual(
        "mist_field",
        "Mist Field",
        Water,
        10,
        vec![Effect::SetTerrain {
            terrain: TerrainKind::Misty,
            turns: 5,
        }],
    ));

    rows.push(ritual(
        "tailwind",
        "Tailwind",
        Wind,
        15,
        vec![Effect::SideCondition {
            target: Target::User,
            condition: SideConditionKind::Tailwind,
            turns: 4,
        }],
    ));

    rows.push(ritual(
        "spike_scatter",
        "Spike Scatter",
        Earth,
        20,
        vec![Effect::Hazard {
            hazard: HazardKind::Spikes,
        }],
    ));

    rows.push(ritual(
        "toxic_web",
        "Toxic Web",
        Venom,
        20,
        vec![Effect::Hazard {
            hazard: HazardKind::ToxicTrap,
        }],
    ));

    rows
}

fn species_row(
    id: &str,
    dex_number: u16,
    name: &str,
    primary: ElementType,
    secondary: Option<ElementType>,
    base_stats: [u8; 6],
    description: &str,
) -> SpeciesData {
    SpeciesData {
        id: id.to_string(),
        dex_number,
        name: name.to_string(),
        primary,
        secondary,
        base_stats: BaseStats {
            hp: base_stats[0],
            attack: base_stats[1],
            defense: base_stats[2],
            sp_attack: base_stats[3],
            sp_defense: base_stats[4],
            speed: base_stats[5],
        },
        description: description.to_string(),
    }
}

fn demo_species() -> Vec<SpeciesData> {
    use ElementType::*;
    vec![
        species_row(
            "embercub",
            1,
            "Embercub",
            Fire,
            None,
            [60, 70, 50, 80, 55, 90],
            "A cub whose fur smolders when it is excited.",
        ),
        species_row(
            "tidepup",
            2,
            "Tidepup",
            Water,
            None,
            [70, 60, 65, 75, 70, 55],
            "It herds schools of fish with sonar barks.",
        ),
        species_row(
            "thornling",
            3,
            "Thornling",
            Grass,
            Some(Venom),
            [65, 55, 70, 60, 80, 45],
            "Its thorns weep a sap that numbs on contact.",
        ),
        species_row(
            "voltvole",
            4,
            "Voltvole",
            Electric,
            None,
            [50, 55, 40, 75, 50, 100],
            "Static builds in its cheeks as it burrows.",
        ),
        species_row(
            "frostfawn",
            5,
            "Frostfawn",
            Ice,
            Some(Wind),
            [55, 50, 50, 85, 65, 85],
            "Snow refuses to melt where it has slept.",
        ),
        species_row(
            "granitebear",
            6,
            "Granitebear",
            Earth,
            None,
            [90, 95, 85, 40, 50, 30],
            "It naps under landslides without noticing.",
        ),
        species_row(
            "wispwraith",
            7,
            "Wispwraith",
            Shade,
            Some(Mystic),
            [45, 35, 45, 95, 75, 95],
            "Lanterns dim when it drifts past.",
        ),
        species_row(
            "galehawk",
            8,
            "Galehawk",
            Wind,
            Some(Normal),
            [60, 75, 50, 55, 50, 110],
            "It rides storm fronts for days without landing.",
        ),
    ]
}

fn demo_abilities() -> Vec<AbilityData> {
    let row = |id: &str, name: &str, description: &str| AbilityData {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    };
    vec![
        row(
            "static_coat",
            "Static Coat",
            "May paralyze attackers that make contact.",
        ),
        row(
            "bramble_hide",
            "Bramble Hide",
            "Attackers that make contact are hurt by thorns.",
        ),
        row(
            "sure_footed",
            "Sure-Footed",
            "The bearer takes no recoil damage from its own moves.",
        ),
        row(
            "contrary_spirit",
            "Contrary Spirit",
            "Stat stage changes applied to the bearer are inverted.",
        ),
        row(
            "last_stand",
            "Last Stand",
            "At full HP, the bearer survives any single hit with 1 HP.",
        ),
        row(
            "dreadful_presence",
            "Dreadful Presence",
            "Lowers the Attack of opposing creatures on entry.",
        ),
    ]
}

fn demo_items() -> Vec<ItemData> {
    let row = |id: &str, name: &str, description: &str, consumable: bool| ItemData {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        consumable,
    };
    vec![
        row(
            "sustain_herb",
            "Sustain Herb",
            "Restores a sliver of HP at the end of every turn.",
            false,
        ),
        row(
            "siphon_root",
            "Siphon Root",
            "Boosts HP drained from damaging moves.",
            false,
        ),
        row(
            "grit_charm",
            "Grit Charm",
            "At full HP, the holder survives any single hit with 1 HP. One use.",
            true,
        ),
    ]
}
