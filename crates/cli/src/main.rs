use analyst_code_chunker::Chunker;
use analyst_indexer::{spawn_build, AnalystConfig, IndexBuilder, RetrievalSession};
use analyst_vector_store::{join_context, EmbeddingMode, EmbeddingProvider};
use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod report;

use report::{ChunkPreview, QueryOutput, StatusReport};

#[derive(Parser)]
#[command(name = "analyst")]
#[command(about = "Embedding index and context retrieval for source projects", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Override the embedding backend for this process
    #[arg(long, global = true, value_enum)]
    embed_mode: Option<EmbedMode>,

    /// Override the Gemini embedding model id
    #[arg(long, global = true)]
    embed_model: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the embedding index for a project (reuses an existing snapshot)
    Index(IndexArgs),

    /// Retrieve the chunks most relevant to a piece of text
    Query(QueryArgs),

    /// Show snapshot location, size and age
    Status(StatusArgs),

    /// Print the line windows a file would be split into
    Chunk(ChunkArgs),
}

#[derive(Args)]
struct IndexArgs {
    /// Project directory to index (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Rebuild even when a snapshot already exists
    #[arg(long)]
    force: bool,

    /// Output the build report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct QueryArgs {
    /// Text to find context for
    text: String,

    /// Project directory
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Number of chunks to return (defaults to retrieval.top_k)
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct StatusArgs {
    /// Project directory
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output status as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ChunkArgs {
    /// File to split
    file: PathBuf,

    /// Project directory whose `.analyst.toml` supplies the defaults
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Window size in lines
    #[arg(long)]
    window: Option<usize>,

    /// Overlap between consecutive windows in lines
    #[arg(long)]
    overlap: Option<usize>,

    /// Output windows as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EmbedMode {
    Gemini,
    Stub,
}

impl From<EmbedMode> for EmbeddingMode {
    fn from(mode: EmbedMode) -> Self {
        match mode {
            EmbedMode::Gemini => Self::Gemini,
            EmbedMode::Stub => Self::Stub,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // stdout carries the JSON document, keep it free of progress noise
    let json_output = match &cli.command {
        Commands::Index(args) => args.json,
        Commands::Query(args) => args.json,
        Commands::Status(args) => args.json,
        Commands::Chunk(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let overrides = Overrides {
        embed_mode: cli.embed_mode,
        embed_model: cli.embed_model.clone(),
    };

    match cli.command {
        Commands::Index(args) => run_index(args, &overrides).await?,
        Commands::Query(args) => run_query(args, &overrides).await?,
        Commands::Status(args) => run_status(args).await?,
        Commands::Chunk(args) => run_chunk(args)?,
    }

    Ok(())
}

/// Global flags that take precedence over `.analyst.toml` and the environment
struct Overrides {
    embed_mode: Option<EmbedMode>,
    embed_model: Option<String>,
}

fn load_config(root: &Path, overrides: &Overrides) -> Result<AnalystConfig> {
    let mut config = AnalystConfig::load(root)
        .with_context(|| format!("Failed to load configuration for {}", root.display()))?;
    if let Some(mode) = overrides.embed_mode {
        config.embedding.mode = EmbeddingMode::from(mode).as_str().to_string();
    }
    if let Some(model) = &overrides.embed_model {
        config.embedding.model.clone_from(model);
    }
    Ok(config)
}

fn project_root(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("Invalid project path: {}", path.display()))
}

async fn run_index(args: IndexArgs, overrides: &Overrides) -> Result<()> {
    let root = project_root(&args.path)?;
    let config = load_config(&root, overrides)?;
    let provider = config
        .embedding
        .build_provider()
        .context("Failed to create embedding provider")?;

    let builder = IndexBuilder::with_config(&root, &config, provider)?;
    let report = if args.force {
        builder.build().await?
    } else {
        spawn_build(Arc::new(builder)).wait().await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.reused_snapshot {
        eprintln!(
            "Snapshot already present ({} chunks); use --force to rebuild",
            report.chunks
        );
    } else {
        eprintln!(
            "Indexed {} files, {} chunks in {}ms",
            report.files, report.chunks, report.time_ms
        );
        for error in &report.errors {
            eprintln!("  skipped: {error}");
        }
    }
    Ok(())
}

async fn run_query(args: QueryArgs, overrides: &Overrides) -> Result<()> {
    let root = project_root(&args.path)?;
    let config = load_config(&root, overrides)?;
    let top_k = args.top_k.unwrap_or(config.retrieval.top_k);

    let session = RetrievalSession::open(&root).await;
    if session.is_empty() {
        log::warn!(
            "No index at {}; run `analyst index` first",
            session.snapshot_path().display()
        );
    }

    let provider: Arc<dyn EmbeddingProvider> = config
        .embedding
        .build_provider()
        .context("Failed to create embedding provider")?;
    let results = session
        .retrieve_for_text(provider.as_ref(), &args.text, top_k)
        .await?;

    if args.json {
        let output = QueryOutput::new(&args.text, top_k, results);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if results.is_empty() {
        eprintln!("No context found");
    } else {
        println!("{}", join_context(&results));
    }
    Ok(())
}

async fn run_status(args: StatusArgs) -> Result<()> {
    let root = project_root(&args.path)?;
    let session = RetrievalSession::open(&root).await;
    let status = StatusReport::from_session(&session);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print!("{}", status.render());
    }
    Ok(())
}

fn run_chunk(args: ChunkArgs) -> Result<()> {
    let root = project_root(&args.path)?;
    let mut chunking = AnalystConfig::load(&root)
        .with_context(|| format!("Failed to load configuration for {}", root.display()))?
        .chunking;
    if let Some(window) = args.window {
        chunking.window_lines = window;
    }
    if let Some(overlap) = args.overlap {
        chunking.overlap_lines = overlap;
    }

    let chunker = Chunker::new(chunking)?;
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let windows: Vec<ChunkPreview> = chunker
        .chunk_spans(&content)
        .into_iter()
        .map(ChunkPreview::from)
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&windows)?);
    } else {
        for window in &windows {
            println!("{}", window.render());
        }
        eprintln!("{} windows", windows.len());
    }
    Ok(())
}
