use anyhow::{Context as AnyhowContext, Result};
use canvas_extractor::{Analyzer, FileStructureMap, Symbol, SymbolKind};
use canvas_graph::{
    resolve_symbol_usages, CanvasGraph, GraphEdge, GraphNode, SymbolKey, UsageGroup,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

mod config;
mod sources;

pub use config::CanvasConfig;
pub use sources::{collect_sources, display_path, SourceFile};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "code-canvas")]
#[command(about = "Source structure extraction and cross-reference graphs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze files and print their structures and the import graph
    Analyze(AnalyzeArgs),

    /// Show where a symbol is used across the analyzed files
    Usages(UsagesArgs),
}

#[derive(Args)]
struct SelectionArgs {
    /// Files or directories to analyze
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// TOML settings file with [analyzer] and [layout] tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    selection: SelectionArgs,
}

#[derive(Args)]
struct UsagesArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Name of the symbol to look up
    #[arg(long)]
    symbol: String,

    /// Only consider declarations in this file
    #[arg(long)]
    file: Option<PathBuf>,
}

/// A file left out of the analysis
#[derive(Debug, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

#[derive(Serialize)]
struct AnalyzeReport<'a> {
    structures: &'a FileStructureMap,
    nodes: &'a [GraphNode],
    edges: &'a [GraphEdge],
    skipped: &'a [SkippedFile],
}

#[derive(Serialize)]
struct UsagesReport<'a> {
    subject: &'a SymbolKey,
    groups: &'a [UsageGroup],
    nodes: &'a [GraphNode],
    edges: &'a [GraphEdge],
}

/// Structures of one analysis pass and the selection they came from
struct Session {
    sources: Vec<SourceFile>,
    structures: FileStructureMap,
    candidates: Vec<String>,
    skipped: Vec<SkippedFile>,
}

impl Session {
    /// Key of a file given on the command line, matched by disk path or by key
    fn key_for(&self, file: &Path) -> String {
        let wanted = display_path(file);
        self.sources
            .iter()
            .find(|source| display_path(&source.path) == wanted)
            .map_or(wanted, |source| source.key.clone())
    }
}

fn analyze_selection(selection: &SelectionArgs, config: &CanvasConfig) -> Result<Session> {
    let sources = collect_sources(&selection.paths)?;
    let mut skipped = Vec::new();
    let mut inputs = Vec::with_capacity(sources.len());
    let mut keys = HashSet::new();

    for source in &sources {
        let path = source.key.clone();
        if !keys.insert(path.clone()) {
            log::warn!("Skipping {}: key {path} is already taken", source.path.display());
            skipped.push(SkippedFile {
                path: display_path(&source.path),
                reason: format!("duplicate path {path}"),
            });
            continue;
        }
        match fs::read_to_string(&source.path) {
            Ok(content) => inputs.push((path, content)),
            Err(e) => {
                log::warn!("Skipping {path}: {e}");
                skipped.push(SkippedFile {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    let mut analyzer = Analyzer::new(config.analyzer.clone())?;
    analyzer.initialize()?;
    let batch = analyzer.analyze_batch(inputs);
    skipped.extend(batch.failures.into_iter().map(|(path, e)| SkippedFile {
        path,
        reason: e.to_string(),
    }));

    log::info!(
        "Analyzed {} files ({} skipped)",
        batch.structures.len(),
        skipped.len()
    );

    let candidates = batch.structures.keys().cloned().collect();
    Ok(Session {
        sources,
        structures: batch.structures,
        candidates,
        skipped,
    })
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = CanvasConfig::load(args.selection.config.as_deref())?;
    let session = analyze_selection(&args.selection, &config)?;

    let mut canvas = CanvasGraph::build(&session.structures, &session.candidates);
    canvas.relayout(&config.layout);

    let report = AnalyzeReport {
        structures: &session.structures,
        nodes: canvas.nodes(),
        edges: canvas.edges(),
        skipped: &session.skipped,
    };
    print_stdout(&to_json(&report, args.selection.pretty)?)
}

/// Declaration named `name`, optionally restricted to one file.
///
/// The first non-variable declaration wins, so `const add = () => ...`
/// resolves to the function rather than its binding; a variable is the
/// answer only when nothing else carries the name.
fn find_subject<'a>(
    structures: &'a FileStructureMap,
    name: &str,
    file: Option<&str>,
) -> Option<(&'a str, &'a Symbol)> {
    let mut declarations = structures
        .iter()
        .filter(|(path, _)| file.map_or(true, |file| path.as_str() == file))
        .flat_map(move |(path, structure)| {
            structure
                .symbols
                .iter()
                .filter(move |symbol| symbol.name == name)
                .map(move |symbol| (path.as_str(), symbol))
        });

    let first = declarations.next()?;
    if first.1.kind != SymbolKind::Variable {
        return Some(first);
    }
    Some(
        declarations
            .find(|(_, symbol)| symbol.kind != SymbolKind::Variable)
            .unwrap_or(first),
    )
}

fn run_usages(args: UsagesArgs) -> Result<()> {
    let config = CanvasConfig::load(args.selection.config.as_deref())?;
    let session = analyze_selection(&args.selection, &config)?;

    let file = args.file.as_deref().map(|file| session.key_for(file));
    let (owner, symbol) = find_subject(&session.structures, &args.symbol, file.as_deref())
        .with_context(|| match &file {
            Some(file) => format!("Symbol '{}' not found in {file}", args.symbol),
            None => format!("Symbol '{}' not found", args.symbol),
        })?;

    let resolution =
        resolve_symbol_usages(symbol, owner, &session.structures, &session.candidates);

    let mut canvas = CanvasGraph::build(&session.structures, &session.candidates);
    canvas.show_usages(&resolution)?;
    canvas.relayout(&config.layout);

    let report = UsagesReport {
        subject: &resolution.subject,
        groups: &resolution.groups,
        nodes: canvas.nodes(),
        edges: canvas.edges(),
    };
    print_stdout(&to_json(&report, args.selection.pretty)?)
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Analyze(args) => run_analyze(args)?,
        Commands::Usages(args) => run_usages(args)?,
    }

    Ok(())
}
