//! query command: look up pokemon, moves or abilities and write a report
//!
//! Identifiers -> batch fetch -> record factory (optionally expanded) ->
//! rendered report -> stdout or file. Nothing is written unless every
//! record was retrieved.

use crate::error::{PokedexError, Result};
use crate::factory::RecordFactory;
use crate::fetch::{ApiConfig, PokeApi, DEFAULT_BASE_URL};
use crate::report::{render, write_report, OutputFormat, Sink};
use crate::schema::{Category, Record};
use clap::{ArgGroup, Args, ValueEnum};
use futures::TryStreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File written when `--output` is given without a value
pub const DEFAULT_OUTPUT: &str = "output.txt";

/// Categories that can be queried from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Pokemon,
    Move,
    Ability,
}

impl From<Mode> for Category {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Pokemon => Category::Pokemon,
            Mode::Move => Category::Move,
            Mode::Ability => Category::Ability,
        }
    }
}

#[derive(Args)]
#[command(group(ArgGroup::new("input").required(true).args(["input_file", "input_data"])))]
pub struct QueryArgs {
    /// What to look up
    #[arg(value_enum)]
    pub mode: Mode,

    /// Text file (.txt) with one name or id per line
    #[arg(long = "inputfile", value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Name or id to look up (comma-separated for several)
    #[arg(long = "inputdata", value_name = "DATA")]
    pub input_data: Option<String>,

    /// Also fetch full ability, move and stat records (pokemon mode only)
    #[arg(long)]
    pub expanded: bool,

    /// Write the report to a file instead of stdout (output.txt if no FILE given)
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = DEFAULT_OUTPUT)]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// API base URL
    #[arg(long, env = "POKEDEX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Timeout per request in milliseconds (default: wait indefinitely)
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Suppress progress output on stderr
    #[arg(long, short)]
    pub quiet: bool,
}

/// A validated query, ready to run
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub category: Category,
    pub identifiers: Vec<String>,
    pub expanded: bool,
    pub format: OutputFormat,
    pub sink: Sink,
}

impl Request {
    /// Validate arguments and load identifiers, before any network activity
    pub async fn from_args(args: &QueryArgs) -> Result<Self> {
        let category = Category::from(args.mode);
        if args.expanded && category != Category::Pokemon {
            return Err(PokedexError::InvalidArgument(format!(
                "--expanded is only supported in pokemon mode, not {}",
                category
            )));
        }

        let identifiers = match (&args.input_file, &args.input_data) {
            (Some(path), None) => read_identifiers(path).await?,
            (None, Some(data)) => normalize_identifiers(data.split(',')),
            _ => {
                return Err(PokedexError::InvalidArgument(
                    "exactly one of --inputfile or --inputdata is required".to_string(),
                ))
            }
        };

        if identifiers.is_empty() {
            return Err(PokedexError::InvalidArgument(
                "no identifiers to look up".to_string(),
            ));
        }

        let sink = match &args.output {
            Some(path) => Sink::File(path.clone()),
            None => Sink::Stdout,
        };

        Ok(Self {
            category,
            identifiers,
            expanded: args.expanded,
            format: args.format,
            sink,
        })
    }
}

/// Run the query command
pub async fn run_query(args: QueryArgs) -> anyhow::Result<()> {
    let request = Request::from_args(&args).await?;

    let mut config = ApiConfig::new(&args.base_url)?;
    config.timeout = args.timeout.map(Duration::from_millis);
    config.progress = !args.quiet;
    let api = PokeApi::new(&config)?;

    if !args.quiet {
        eprintln!(
            "Fetching {} {}{}...",
            request.identifiers.len(),
            request.category.plural(),
            if request.expanded { " (expanded)" } else { "" }
        );
    }

    let records = retrieve(
        &api,
        request.category,
        &request.identifiers,
        request.expanded,
    )
    .await?;

    let report = render(&records, request.format)?;
    write_report(&report, &request.sink).await?;

    if !args.quiet {
        match &request.sink {
            Sink::File(path) => eprintln!("Done: {} records -> {}", records.len(), path.display()),
            Sink::Stdout => eprintln!("Done: {} records", records.len()),
        }
    }

    Ok(())
}

/// Fetch and build every record, failing as a whole on the first error
pub async fn retrieve(
    api: &PokeApi,
    category: Category,
    identifiers: &[String],
    expanded: bool,
) -> Result<Vec<Record>> {
    let factory = RecordFactory::new(api, category, expanded)?;
    let payloads = api.fetch_many(category, identifiers).await?;
    factory.create(payloads).try_collect().await
}

/// Read identifiers from a `.txt` file, one per line
pub async fn read_identifiers(path: &Path) -> Result<Vec<String>> {
    let is_txt = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    if !is_txt {
        return Err(PokedexError::InvalidArgument(format!(
            "input file must have a .txt extension: {}",
            path.display()
        )));
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PokedexError::InputFile {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(normalize_identifiers(content.lines()))
}

/// Trim, lowercase and drop blank entries
pub fn normalize_identifiers<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    raw.into_iter()
        .map(|id| id.trim().to_lowercase())
        .filter(|id| !id.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(mode: Mode) -> QueryArgs {
        QueryArgs {
            mode,
            input_file: None,
            input_data: None,
            expanded: false,
            output: None,
            format: OutputFormat::Text,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            quiet: true,
        }
    }

    #[test]
    fn test_normalize_identifiers() {
        assert_eq!(
            normalize_identifiers(["Pikachu\n", " 151 ", "", "ICE-PUNCH"].into_iter()),
            vec!["pikachu", "151", "ice-punch"]
        );
        assert_eq!(
            normalize_identifiers("1, Cut ,ice-punch".split(',')),
            vec!["1", "cut", "ice-punch"]
        );
    }

    #[test]
    fn test_mode_to_category() {
        assert_eq!(Category::from(Mode::Pokemon), Category::Pokemon);
        assert_eq!(Category::from(Mode::Move), Category::Move);
        assert_eq!(Category::from(Mode::Ability), Category::Ability);
    }

    #[tokio::test]
    async fn test_request_from_input_data() {
        let mut a = args(Mode::Move);
        a.input_data = Some("1,Cut,ice-punch".to_string());
        let request = Request::from_args(&a).await.unwrap();
        assert_eq!(request.category, Category::Move);
        assert_eq!(request.identifiers, vec!["1", "cut", "ice-punch"]);
        assert_eq!(request.sink, Sink::Stdout);
    }

    #[tokio::test]
    async fn test_request_from_input_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pokemon.txt");
        fs::write(&path, "Charmander\nSquirtle\n\n151\n").unwrap();

        let mut a = args(Mode::Pokemon);
        a.input_file = Some(path);
        a.expanded = true;
        a.output = Some(PathBuf::from(DEFAULT_OUTPUT));
        let request = Request::from_args(&a).await.unwrap();
        assert_eq!(request.identifiers, vec!["charmander", "squirtle", "151"]);
        assert!(request.expanded);
        assert_eq!(request.sink, Sink::File(PathBuf::from("output.txt")));
    }

    #[tokio::test]
    async fn test_request_rejects_expanded_move() {
        let mut a = args(Mode::Move);
        a.input_data = Some("cut".to_string());
        a.expanded = true;
        assert!(matches!(
            Request::from_args(&a).await,
            Err(PokedexError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_request_rejects_wrong_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pokemon.csv");
        fs::write(&path, "pikachu\n").unwrap();

        let mut a = args(Mode::Pokemon);
        a.input_file = Some(path);
        let err = Request::from_args(&a).await.unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }

    #[tokio::test]
    async fn test_request_missing_file() {
        let dir = tempdir().unwrap();
        let mut a = args(Mode::Ability);
        a.input_file = Some(dir.path().join("nope.txt"));
        assert!(matches!(
            Request::from_args(&a).await,
            Err(PokedexError::InputFile { .. })
        ));
    }

    #[tokio::test]
    async fn test_request_without_identifiers() {
        let mut a = args(Mode::Ability);
        a.input_data = Some(" , ".to_string());
        assert!(matches!(
            Request::from_args(&a).await,
            Err(PokedexError::InvalidArgument(_))
        ));
    }
}
