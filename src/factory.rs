//! Record Factory: a batch of payloads in, a lazy stream of records out
//!
//! In expanded mode each pokemon's shallow ability / move / stat references
//! are replaced by fully parsed sub-records, fetched as three concurrent
//! batches. Expansion is per pokemon; nothing is shared across records.

use crate::error::{PokedexError, Result};
use crate::fetch::{PokeApi, RawPayload};
use crate::parse::{parse, parse_ability, parse_move, parse_pokemon, parse_stat, stat_identifier};
use crate::schema::{AbilityRef, Category, MoveRef, PokemonRecord, Record, References, StatRef};
use futures::future;
use futures::stream::{self, LocalBoxStream, StreamExt};
use std::collections::HashSet;

pub struct RecordFactory<'a> {
    api: &'a PokeApi,
    category: Category,
    expanded: bool,
}

impl<'a> RecordFactory<'a> {
    /// Expansion is only defined for the pokemon category
    pub fn new(api: &'a PokeApi, category: Category, expanded: bool) -> Result<Self> {
        if expanded && category != Category::Pokemon {
            return Err(PokedexError::InvalidArgument(format!(
                "expansion is only supported for pokemon, not {}",
                category
            )));
        }
        Ok(Self {
            api,
            category,
            expanded,
        })
    }

    /// Turn payloads into records, one at a time, in input order
    ///
    /// The stream is consumed once. The first error is its last item: no
    /// later payload is parsed or expanded after it.
    pub fn create(&self, payloads: Vec<RawPayload>) -> LocalBoxStream<'a, Result<Record>> {
        let records = if self.expanded {
            let api = self.api;
            stream::iter(payloads)
                .then(move |payload| async move {
                    let pokemon = parse_pokemon(&payload)?;
                    expand_pokemon(api, pokemon).await.map(Record::Pokemon)
                })
                .boxed_local()
        } else {
            let category = self.category;
            stream::iter(payloads.into_iter().map(move |payload| parse(category, &payload)))
                .boxed_local()
        };
        stop_after_error(records)
    }
}

fn stop_after_error<'a>(
    records: LocalBoxStream<'a, Result<Record>>,
) -> LocalBoxStream<'a, Result<Record>> {
    records
        .scan(false, |failed, record| {
            if *failed {
                return future::ready(None);
            }
            *failed = record.is_err();
            future::ready(Some(record))
        })
        .boxed_local()
}

/// Replace a pokemon's shallow references with fetched sub-records
///
/// Abilities, moves and stats are fetched concurrently; the record is only
/// returned once all three succeed. Lists that are already expanded are kept.
pub async fn expand_pokemon(api: &PokeApi, pokemon: PokemonRecord) -> Result<PokemonRecord> {
    let PokemonRecord {
        id,
        name,
        height,
        weight,
        types,
        stats,
        abilities,
        moves,
    } = pokemon;

    let stat_id = |stat: &StatRef| {
        stat_identifier(&stat.url).ok_or_else(|| {
            PokedexError::malformed(
                Category::Pokemon,
                &name,
                format!("cannot derive a stat identifier from '{}'", stat.url),
            )
        })
    };

    let (abilities, moves, stats) = tokio::try_join!(
        expand_references(
            api,
            Category::Ability,
            abilities,
            |ability: &AbilityRef| Ok(ability.name.clone()),
            parse_ability,
        ),
        expand_references(
            api,
            Category::Move,
            moves,
            |learned: &MoveRef| Ok(learned.name.clone()),
            parse_move,
        ),
        expand_references(api, Category::Stat, stats, stat_id, parse_stat)
    )?;

    Ok(PokemonRecord {
        id,
        name,
        height,
        weight,
        types,
        stats,
        abilities,
        moves,
    })
}

async fn expand_references<S, F, I, P>(
    api: &PokeApi,
    category: Category,
    refs: References<S, F>,
    identify: I,
    build: P,
) -> Result<References<S, F>>
where
    I: Fn(&S) -> Result<String>,
    P: Fn(&RawPayload) -> Result<F>,
{
    let shallow = match refs {
        References::Shallow(items) => items,
        expanded @ References::Expanded(_) => return Ok(expanded),
    };

    let ids = distinct(shallow.iter().map(&identify).collect::<Result<Vec<_>>>()?);
    let payloads = api.fetch_many(category, &ids).await?;
    let records = payloads.iter().map(&build).collect::<Result<Vec<_>>>()?;

    Ok(References::Expanded(records))
}

/// Drop repeated identifiers, keeping first occurrences in order
fn distinct(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
