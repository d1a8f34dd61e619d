use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "tweenschema", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a scene graph into a playback schema.
    Translate(TranslateArgs),
    /// Load and validate a scene graph without translating it.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input scene graph JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output schema JSON path. Writes to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,

    /// Block-name allocator state. Loaded when the file exists, written back after a
    /// successful translation, so names stay unique across runs.
    #[arg(long)]
    names: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input scene graph JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Translate(args) => cmd_translate(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_graph(path: &Path) -> anyhow::Result<tweenschema::SceneGraph> {
    let f = File::open(path).with_context(|| format!("open scene graph '{}'", path.display()))?;
    let def: tweenschema::GraphDef = serde_json::from_reader(BufReader::new(f))
        .with_context(|| "parse scene graph JSON")?;
    Ok(tweenschema::SceneGraph::from_def(&def)?)
}

fn read_names(path: &Path) -> anyhow::Result<tweenschema::BlockNameAllocator> {
    if !path.exists() {
        return Ok(tweenschema::BlockNameAllocator::new());
    }
    let f = File::open(path).with_context(|| format!("open names state '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse names state '{}'", path.display()))
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_translate(args: TranslateArgs) -> anyhow::Result<()> {
    let graph = read_graph(&args.in_path)?;

    let names = match &args.names {
        Some(path) => read_names(path)?,
        None => tweenschema::BlockNameAllocator::new(),
    };
    let mut translator = tweenschema::Translator::with_allocator(names);
    let schema = translator
        .translate(&graph)
        .with_context(|| format!("translate '{}'", args.in_path.display()))?;

    let mut json = schema.to_json_string(args.pretty)?;
    json.push('\n');

    match &args.out {
        Some(out) => {
            write_file(out, json.as_bytes())?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes()).context("write schema to stdout")?;
        }
    }

    if let Some(path) = &args.names {
        let state = serde_json::to_vec_pretty(translator.allocator())?;
        write_file(path, &state)?;
    }

    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let graph = read_graph(&args.in_path)?;

    eprintln!("{}: ok", args.in_path.display());
    eprintln!("  nodes:      {}", graph.len());
    eprintln!("  shapes:     {}", graph.shapes().len());
    eprintln!("  containers: {}", graph.containers().len());
    eprintln!("  animations: {}", graph.animations().len());
    Ok(())
}
