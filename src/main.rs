//! pokedex CLI
//!
//! Looks up pokemon, moves and abilities on the PokeAPI and writes a text report.
//! Pokemon can be expanded into full ability, move and stat records.

use anyhow::Result;
use clap::Parser;
use pokedex::query::{run_query, QueryArgs};

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(author = "RoyalBit Inc.")]
#[command(version)]
#[command(about = "Query the PokeAPI for pokemon, moves and abilities")]
#[command(long_about = "Query the PokeAPI for pokemon, moves and abilities.\n\nExamples:\n  pokedex pokemon --inputdata 151 --expanded\n  pokedex move --inputfile moves.txt --output report.txt")]
struct Cli {
    #[command(flatten)]
    query: QueryArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run_query(cli.query).await
}
