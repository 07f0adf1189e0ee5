//! Report rendering and output
//!
//! Text blocks are concatenated in input order. JSON and YAML serialize the
//! record list as-is. The report is only written once it is complete.

use crate::schema::{AbilityRecord, MoveRecord, PokemonRecord, Record, References, StatRecord};
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

const POKEMON_RULER: &str = "=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=";
const RECORD_RULER: &str = "-----------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Where the finished report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    File(PathBuf),
}

/// Render all records in one format
pub fn render(records: &[Record], format: OutputFormat) -> Result<String> {
    let output = match format {
        OutputFormat::Text => records.iter().map(|r| r.to_string()).collect(),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(records)?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yaml::to_string(records)?,
    };
    Ok(output)
}

/// Write a complete report to its sink
///
/// Files are written to a sibling temp file first and renamed into place.
pub async fn write_report(report: &str, sink: &Sink) -> Result<()> {
    match sink {
        Sink::Stdout => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(report.as_bytes()).await?;
            stdout.flush().await?;
        }
        Sink::File(path) => {
            let tmp = temp_path(path);
            tokio::fs::write(&tmp, report)
                .await
                .with_context(|| format!("Failed to write {}", tmp.display()))?;
            if let Err(e) = tokio::fs::rename(&tmp, path).await {
                let _ = tokio::fs::remove_file(&tmp).await;
                return Err(e).with_context(|| format!("Failed to write {}", path.display()));
            }
        }
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Presentation casing: first letter of every word upper-cased
///
/// `ice-punch` -> `Ice-Punch`
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

/// Drop the blank-line separators of long effect text
fn flatten(text: &str) -> String {
    text.replace("\n\n", "")
}

fn or_dash(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn join_or_none(items: Vec<String>) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn section<T: fmt::Display>(f: &mut fmt::Formatter<'_>, tag: &str, items: &[T]) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "<Pokemon {}>", tag)?;
    for item in items {
        write!(f, "{}", item)?;
    }
    writeln!(f, "</Pokemon {}>", tag)
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Pokemon(r) => fmt::Display::fmt(r, f),
            Record::Ability(r) => fmt::Display::fmt(r, f),
            Record::Move(r) => fmt::Display::fmt(r, f),
            Record::Stat(r) => fmt::Display::fmt(r, f),
        }
    }
}

impl fmt::Display for PokemonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", POKEMON_RULER)?;
        writeln!(f, "Pokemon: {}", title_case(&self.name))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Height: {}", self.height)?;
        writeln!(f, "Weight: {}", self.weight)?;
        writeln!(f, "Type: {}", join_or_none(self.types.clone()))?;

        match &self.stats {
            References::Shallow(stats) => writeln!(
                f,
                "Stats: {}",
                join_or_none(
                    stats
                        .iter()
                        .map(|s| format!("{} ({})", s.name, s.base_stat))
                        .collect()
                )
            )?,
            References::Expanded(stats) => section(f, "Stats", stats)?,
        }

        match &self.moves {
            References::Shallow(moves) => writeln!(
                f,
                "Moves: {}",
                join_or_none(
                    moves
                        .iter()
                        .map(|m| match m.level_learned {
                            Some(level) => format!("{} (lvl {})", m.name, level),
                            None => m.name.clone(),
                        })
                        .collect()
                )
            )?,
            References::Expanded(moves) => section(f, "Moves", moves)?,
        }

        match &self.abilities {
            References::Shallow(abilities) => writeln!(
                f,
                "Abilities: {}",
                join_or_none(
                    abilities
                        .iter()
                        .map(|a| {
                            if a.is_hidden {
                                format!("{} (hidden)", a.name)
                            } else {
                                a.name.clone()
                            }
                        })
                        .collect()
                )
            )?,
            References::Expanded(abilities) => section(f, "Abilities", abilities)?,
        }

        writeln!(f, "{}", POKEMON_RULER)
    }
}

impl fmt::Display for AbilityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RECORD_RULER)?;
        writeln!(f, "Ability: {}", title_case(&self.name))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Generation: {}", self.generation)?;
        writeln!(f, "Short Effect: {}", self.effect_short)?;
        writeln!(f, "Effect: {}", flatten(&self.effect))?;
        writeln!(f, "Pokemon: {}", join_or_none(self.pokemon.clone()))
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RECORD_RULER)?;
        writeln!(f, "Move: {}", title_case(&self.name))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Generation: {}", self.generation)?;
        writeln!(f, "Accuracy: {}", or_dash(self.accuracy))?;
        writeln!(f, "PP: {}", or_dash(self.pp))?;
        writeln!(f, "Power: {}", or_dash(self.power))?;
        writeln!(f, "Type: {}", self.move_type)?;
        writeln!(f, "Damage Class: {}", self.damage_class)?;
        writeln!(f, "Effect: {}", self.effect_short)
    }
}

impl fmt::Display for StatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RECORD_RULER)?;
        writeln!(f, "Stat: {}", title_case(&self.name))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Is Battle Only: {}", self.is_battle_only)
    }
}
