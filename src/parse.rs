//! Record Parser: one raw payload in, one typed record out
//!
//! Extraction is schema-checked. A missing or mistyped required key is a
//! `MalformedPayload` error, never an empty default.

use crate::error::{PokedexError, Result};
use crate::fetch::RawPayload;
use crate::schema::{
    AbilityRecord, AbilityRef, Category, MoveRecord, MoveRef, PokemonRecord, Record, References,
    StatRecord, StatRef,
};
use serde::{Deserialize, Deserializer};
use url::Url;

#[derive(Deserialize)]
struct Named {
    name: String,
}

#[derive(Deserialize)]
struct NamedUrl {
    name: String,
    url: String,
}

#[derive(Deserialize)]
struct PokemonPayload {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    types: Vec<TypeSlot>,
    stats: Vec<StatSlot>,
    abilities: Vec<AbilitySlot>,
    moves: Vec<MoveSlot>,
}

#[derive(Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    kind: Named,
}

#[derive(Deserialize)]
struct StatSlot {
    base_stat: u32,
    stat: NamedUrl,
}

#[derive(Deserialize)]
struct AbilitySlot {
    ability: Named,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Deserialize)]
struct MoveSlot {
    #[serde(rename = "move")]
    learned: Named,
    #[serde(default)]
    version_group_details: Vec<VersionGroupDetail>,
}

#[derive(Deserialize)]
struct VersionGroupDetail {
    level_learned_at: u32,
}

#[derive(Deserialize)]
struct AbilityPayload {
    id: u32,
    name: String,
    generation: Named,
    effect_entries: Vec<EffectEntry>,
    pokemon: Vec<AbilityHolder>,
}

#[derive(Deserialize)]
struct AbilityHolder {
    pokemon: Named,
}

#[derive(Deserialize)]
struct MovePayload {
    id: u32,
    name: String,
    generation: Named,
    #[serde(deserialize_with = "nullable")]
    accuracy: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    pp: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    power: Option<u32>,
    #[serde(rename = "type")]
    move_type: Named,
    damage_class: Named,
    effect_entries: Vec<EffectEntry>,
}

#[derive(Deserialize)]
struct StatPayload {
    id: u32,
    name: String,
    is_battle_only: bool,
}

#[derive(Deserialize)]
struct EffectEntry {
    #[serde(default)]
    effect: Option<String>,
    short_effect: String,
}

/// Key must be present, value may be null
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Parse a payload of the given category into its record shape
pub fn parse(category: Category, payload: &RawPayload) -> Result<Record> {
    match category {
        Category::Pokemon => parse_pokemon(payload).map(Record::Pokemon),
        Category::Ability => parse_ability(payload).map(Record::Ability),
        Category::Move => parse_move(payload).map(Record::Move),
        Category::Stat => parse_stat(payload).map(Record::Stat),
    }
}

/// Parse a pokemon with shallow stat / ability / move references
pub fn parse_pokemon(payload: &RawPayload) -> Result<PokemonRecord> {
    let raw: PokemonPayload = decode(Category::Pokemon, payload)?;

    let stats = raw
        .stats
        .into_iter()
        .map(|slot| StatRef {
            name: slot.stat.name,
            base_stat: slot.base_stat,
            url: slot.stat.url,
        })
        .collect();

    let abilities = raw
        .abilities
        .into_iter()
        .map(|slot| AbilityRef {
            name: slot.ability.name,
            is_hidden: slot.is_hidden,
        })
        .collect();

    let moves = raw
        .moves
        .into_iter()
        .map(|slot| MoveRef {
            name: slot.learned.name,
            level_learned: slot.version_group_details.first().map(|d| d.level_learned_at),
        })
        .collect();

    Ok(PokemonRecord {
        id: raw.id,
        name: raw.name,
        height: raw.height,
        weight: raw.weight,
        types: raw.types.into_iter().map(|slot| slot.kind.name).collect(),
        stats: References::Shallow(stats),
        abilities: References::Shallow(abilities),
        moves: References::Shallow(moves),
    })
}

pub fn parse_ability(payload: &RawPayload) -> Result<AbilityRecord> {
    let raw: AbilityPayload = decode(Category::Ability, payload)?;
    let entry = pick_effect(&raw.effect_entries)
        .ok_or_else(|| PokedexError::malformed(Category::Ability, &raw.name, "no effect entries"))?;
    let effect = entry.effect.clone().ok_or_else(|| {
        PokedexError::malformed(Category::Ability, &raw.name, "effect entry has no `effect`")
    })?;

    Ok(AbilityRecord {
        id: raw.id,
        effect,
        effect_short: entry.short_effect.clone(),
        generation: raw.generation.name,
        pokemon: raw.pokemon.into_iter().map(|p| p.pokemon.name).collect(),
        name: raw.name,
    })
}

pub fn parse_move(payload: &RawPayload) -> Result<MoveRecord> {
    let raw: MovePayload = decode(Category::Move, payload)?;
    let effect_short = pick_effect(&raw.effect_entries)
        .map(|entry| entry.short_effect.clone())
        .ok_or_else(|| PokedexError::malformed(Category::Move, &raw.name, "no effect entries"))?;

    Ok(MoveRecord {
        id: raw.id,
        name: raw.name,
        generation: raw.generation.name,
        accuracy: raw.accuracy,
        pp: raw.pp,
        power: raw.power,
        move_type: raw.move_type.name,
        damage_class: raw.damage_class.name,
        effect_short,
    })
}

pub fn parse_stat(payload: &RawPayload) -> Result<StatRecord> {
    let raw: StatPayload = decode(Category::Stat, payload)?;
    Ok(StatRecord {
        id: raw.id,
        name: raw.name,
        is_battle_only: raw.is_battle_only,
    })
}

/// Stat identifier from a stat URL: its last non-empty path segment
///
/// `https://pokeapi.co/api/v2/stat/1/` -> `1`
pub fn stat_identifier(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(String::from)
}

fn decode<'a, T: Deserialize<'a>>(category: Category, payload: &'a RawPayload) -> Result<T> {
    T::deserialize(payload).map_err(|e| PokedexError::malformed(category, label(payload), e))
}

/// Name or id of a payload, for error messages
fn label(payload: &RawPayload) -> String {
    match (payload.get("name"), payload.get("id")) {
        (Some(serde_json::Value::String(name)), _) => name.clone(),
        (_, Some(id)) => id.to_string(),
        _ => "?".to_string(),
    }
}

/// Effect text always comes from the first entry, whatever its language
fn pick_effect(entries: &[EffectEntry]) -> Option<&EffectEntry> {
    entries.first()
}
