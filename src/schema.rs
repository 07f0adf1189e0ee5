//! Record shapes for the four PokeAPI categories
//!
//! Every record shares `{name, id}`. A pokemon's stat / ability / move lists
//! start out as shallow references and may be replaced once by fully parsed
//! sub-records during expansion.

use serde::Serialize;

/// API record kind, used as the URL path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pokemon,
    Move,
    Ability,
    Stat,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pokemon => "pokemon",
            Category::Move => "move",
            Category::Ability => "ability",
            Category::Stat => "stat",
        }
    }

    /// Plural label for progress output
    pub fn plural(&self) -> &'static str {
        match self {
            Category::Pokemon => "pokemon",
            Category::Move => "moves",
            Category::Ability => "abilities",
            Category::Stat => "stats",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference list that is either entirely shallow or entirely expanded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum References<S, F> {
    Shallow(Vec<S>),
    Expanded(Vec<F>),
}

impl<S, F> References<S, F> {
    pub fn len(&self) -> usize {
        match self {
            References::Shallow(items) => items.len(),
            References::Expanded(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, References::Expanded(_))
    }

    /// Shallow references, or `None` once expanded
    pub fn shallow(&self) -> Option<&[S]> {
        match self {
            References::Shallow(items) => Some(items),
            References::Expanded(_) => None,
        }
    }

    /// Expanded sub-records, or `None` while still shallow
    pub fn expanded(&self) -> Option<&[F]> {
        match self {
            References::Shallow(_) => None,
            References::Expanded(items) => Some(items),
        }
    }
}

/// Unexpanded stat entry of a pokemon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRef {
    pub name: String,
    pub base_stat: u32,
    /// API URL of the stat, e.g. `https://pokeapi.co/api/v2/stat/1/`
    pub url: String,
}

/// Unexpanded ability entry of a pokemon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityRef {
    pub name: String,
    pub is_hidden: bool,
}

/// Unexpanded move entry of a pokemon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveRef {
    pub name: String,
    /// Level from the first version group entry, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_learned: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PokemonRecord {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub types: Vec<String>,
    pub stats: References<StatRef, StatRecord>,
    pub abilities: References<AbilityRef, AbilityRecord>,
    pub moves: References<MoveRef, MoveRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityRecord {
    pub id: u32,
    pub name: String,
    pub generation: String,
    /// Long-form effect text as returned by the API
    pub effect: String,
    pub effect_short: String,
    /// Names of pokemon that can have this ability
    pub pokemon: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveRecord {
    pub id: u32,
    pub name: String,
    pub generation: String,
    pub accuracy: Option<u32>,
    pub pp: Option<u32>,
    pub power: Option<u32>,
    pub move_type: String,
    pub damage_class: String,
    pub effect_short: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRecord {
    pub id: u32,
    pub name: String,
    pub is_battle_only: bool,
}

/// Closed set of record shapes, tagged by category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Record {
    Pokemon(PokemonRecord),
    Ability(AbilityRecord),
    Move(MoveRecord),
    Stat(StatRecord),
}

impl Record {
    pub fn id(&self) -> u32 {
        match self {
            Record::Pokemon(r) => r.id,
            Record::Ability(r) => r.id,
            Record::Move(r) => r.id,
            Record::Stat(r) => r.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Record::Pokemon(r) => &r.name,
            Record::Ability(r) => &r.name,
            Record::Move(r) => &r.name,
            Record::Stat(r) => &r.name,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Record::Pokemon(_) => Category::Pokemon,
            Record::Ability(_) => Category::Ability,
            Record::Move(_) => Category::Move,
            Record::Stat(_) => Category::Stat,
        }
    }
}
