//! castrank command line: one query in, one JSON document out.
//!
//! `castrank 'Leonardo DiCaprio'` prints the ranked filmography on stdout
//! and exits 0. Any failure prints `{"error": "..."}` on stderr and exits 1.

pub mod logging;

use std::path::PathBuf;

use castrank_core::{
    CastrankError, ConfigOverrides, ErrorReport, ExecutionContext, FullReport, MetadataProvider,
    PersonReport, PipelineConfig, SearchReport, CASTRANK_VERSION,
};
use castrank_imdb::{ImdbProvider, SnapshotProvider};
use castrank_stages::{run_full, run_person, run_search, Query, USAGE};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "castrank", version, about = "Rank an actor's movies by IMDb popularity")]
pub struct Cli {
    /// Actor name, or IMDb person id such as nm0000138
    pub query: String,

    /// Which document to produce
    #[arg(long, value_enum, default_value_t = Mode::Full)]
    pub mode: Mode,

    /// Configuration preset
    #[arg(long, default_value = "full", value_parser = ["full", "strict", "preview"])]
    pub profile: String,

    /// YAML file overriding fields of the preset
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Answer from a JSON snapshot instead of IMDb
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Line-delimited JSON diagnostics on stderr
    #[arg(long)]
    pub trace: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// `{"imdbId", "name", "movies"}`
    Full,
    /// `{"imdbId", "name"}`
    Person,
    /// `{"results": [...]}`
    Search,
}

/// Map a clap parse failure to the usage error the process reports
pub fn usage_error(err: &clap::Error) -> CastrankError {
    if err.kind() == ErrorKind::MissingRequiredArgument {
        return CastrankError::Usage(USAGE.to_string());
    }
    let rendered = err.to_string();
    let first_line = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error:")
        .trim();
    CastrankError::Usage(first_line.to_string())
}

pub fn load_config(cli: &Cli) -> Result<PipelineConfig, CastrankError> {
    let base = PipelineConfig::for_profile(&cli.profile)?;
    let mut config = match &cli.config {
        Some(path) => ConfigOverrides::load(path)?.apply(base)?,
        None => {
            base.validate()?;
            base
        }
    };
    if cli.trace {
        config.diagnostics = true;
    }
    Ok(config)
}

pub fn build_provider(cli: &Cli) -> Result<Box<dyn MetadataProvider>, CastrankError> {
    match &cli.snapshot {
        Some(path) => Ok(Box::new(SnapshotProvider::from_path(path)?)),
        None => Ok(Box::new(ImdbProvider::new())),
    }
}

fn to_document<T: Serialize>(report: &T) -> Result<String, CastrankError> {
    serde_json::to_string(report).map_err(|e| CastrankError::Output(e.to_string()))
}

/// Run the requested mode and render the stdout document
pub fn execute(
    mode: Mode,
    query: &str,
    provider: &dyn MetadataProvider,
    ctx: &ExecutionContext,
) -> Result<String, CastrankError> {
    match mode {
        Mode::Search => {
            let hits = run_search(provider, query, ctx)?;
            to_document(&SearchReport::from(hits.as_slice()))
        }
        Mode::Person => {
            let person = run_person(provider, Query::classify(query)?, ctx)?;
            to_document(&PersonReport::from(&person))
        }
        Mode::Full => {
            let output = run_full(provider, Query::classify(query)?, ctx)?;
            tracing::debug!(traces = ?output.traces, "stage traces");
            to_document(&FullReport::from(&output.payload))
        }
    }
}

/// One whole invocation after argument parsing
pub fn run(cli: &Cli) -> Result<String, CastrankError> {
    let config = load_config(cli)?;
    logging::init(config.diagnostics).map_err(|e| CastrankError::Config(format!("{e:#}")))?;

    let ctx = ExecutionContext::new(config);
    tracing::info!(
        version = CASTRANK_VERSION,
        run_id = %ctx.run_id,
        profile = %ctx.config.profile,
        mode = ?cli.mode,
        "castrank starting"
    );

    let provider = build_provider(cli)?;
    execute(cli.mode, &cli.query, provider.as_ref(), &ctx)
}

/// The stderr document for a failure
pub fn error_document(err: &CastrankError) -> String {
    serde_json::to_value(ErrorReport::from(err))
        .map(|value| value.to_string())
        .unwrap_or_else(|_| serde_json::json!({ "error": err.to_string() }).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Path to the snapshot fixture relative to the workspace root
    const FIXTURE_PATH: &str = "testing/fixtures/imdb/dicaprio.json";

    fn fixture_path() -> PathBuf {
        let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
        let crate_dir = std::path::Path::new(&manifest_dir);
        crate_dir.parent().unwrap().parent().unwrap().join(FIXTURE_PATH)
    }

    fn fixture() -> SnapshotProvider {
        SnapshotProvider::from_path(&fixture_path()).unwrap()
    }

    fn run_fixture(mode: Mode, query: &str) -> Result<String, CastrankError> {
        execute(mode, query, &fixture(), &ExecutionContext::default())
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["castrank", "Leonardo DiCaprio"]).unwrap();
        assert_eq!(cli.query, "Leonardo DiCaprio");
        assert_eq!(cli.mode, Mode::Full);
        assert_eq!(cli.profile, "full");
        assert!(!cli.trace);
        assert_eq!(load_config(&cli).unwrap(), PipelineConfig::full());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "castrank", "--mode", "search", "--profile", "strict", "--trace", "Leo",
        ])
        .unwrap();
        assert_eq!(cli.mode, Mode::Search);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.profile, "strict");
        assert!(config.diagnostics);
    }

    #[test]
    fn test_missing_argument_is_usage_error() {
        let err = Cli::try_parse_from(["castrank"]).unwrap_err();
        assert_eq!(usage_error(&err), CastrankError::Usage(USAGE.to_string()));
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let err = Cli::try_parse_from(["castrank", "--bogus", "Leo"]).unwrap_err();
        match usage_error(&err) {
            CastrankError::Usage(msg) => assert!(msg.contains("--bogus")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_person_document() {
        let doc = run_fixture(Mode::Person, "Leonardo DiCaprio").unwrap();
        assert_eq!(doc, r#"{"imdbId":"nm0000138","name":"Leonardo DiCaprio"}"#);
    }

    #[test]
    fn test_search_document() {
        let doc = run_fixture(Mode::Search, "Leonardo DiCaprio").unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value["results"].as_array().unwrap().len(), 2);
        assert_eq!(value["results"][0]["imdbId"], "nm9000001");
        assert!(value["results"][0]["imageUrl"].is_null());
        assert_eq!(
            value["results"][1]["imageUrl"],
            "https://m.media-amazon.com/images/M/leonardo.jpg"
        );
    }

    #[test]
    fn test_full_document() {
        let doc = run_fixture(Mode::Full, "nm0000138").unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value["imdbId"], "nm0000138");
        assert_eq!(value["name"], "Leonardo DiCaprio");
        assert_eq!(value["movies"][0]["title"], "Inception");
        assert_eq!(value["movies"][0]["votes"], 2_600_000);
        assert_eq!(value["movies"][0]["imdbUrl"], "https://www.imdb.com/title/tt1375666/");
        assert!(value["movies"][5]["year"].is_null());
    }

    #[test]
    fn test_error_document() {
        let err = run_fixture(Mode::Full, "xx12345").unwrap_err();
        assert_eq!(error_document(&err), r#"{"error":"Invalid IMDb ID format: xx12345"}"#);
    }
}
