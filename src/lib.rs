//! pokedex: PokeAPI lookups with optional expansion of a pokemon's
//! abilities, moves and stats
//!
//! Pipeline: identifiers -> `PokeApi::fetch_many` -> `RecordFactory` -> report.

pub mod error;
pub mod factory;
pub mod fetch;
pub mod parse;
pub mod query;
pub mod report;
pub mod schema;

pub use error::PokedexError;
pub use factory::{expand_pokemon, RecordFactory};
pub use fetch::{ApiConfig, PokeApi, RawPayload};
pub use query::{retrieve, run_query, QueryArgs, Request};
pub use report::{render, OutputFormat, Sink};
pub use schema::{
    AbilityRecord, AbilityRef, Category, MoveRecord, MoveRef, PokemonRecord, Record, References,
    StatRecord, StatRef,
};
