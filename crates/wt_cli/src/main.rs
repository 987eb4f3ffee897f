use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wt_cli::{build_pipeline, elapsed_report, failure_message, open_indexer, Backends, RunRequest};
use wt_core::{AppConfig, Error, Result, TokenCounter};
use wt_inference::DEFAULT_TOP_K;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn a Wikipedia article into a short-form video script", long_about = None)]
struct Cli {
    /// Wikipedia page title. Prompted for when omitted.
    #[arg(long)]
    topic: Option<String>,
    /// Target audience. Prompted for when omitted.
    #[arg(long)]
    audience: Option<String>,
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
    #[arg(long, global = true, default_value = "memory", help = "Vector store: memory (default), qdrant")]
    storage: String,
    #[arg(long, global = true, default_value = "anthropic", help = "Chat model: anthropic (default), openai, dummy")]
    model: String,
    #[arg(long, global = true, default_value = "openai", help = "Embedding model: openai (default), dummy")]
    embedding: String,
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch, analyze and write a script (default)
    Generate,
    /// Query the existing index
    Search {
        query: String,
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Drop everything in the index
    Clear,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn backends(cli: &Cli) -> Result<Backends> {
    Ok(Backends {
        storage: cli.storage.parse()?,
        chat: cli.model.parse()?,
        embedding: cli.embedding.parse()?,
    })
}

async fn generate(cli: &Cli, config: &AppConfig) -> Result<()> {
    let backends = backends(cli)?;
    let topic = match &cli.topic {
        Some(topic) => topic.clone(),
        None => prompt("Enter a Wikipedia topic: ")?,
    };
    if topic.is_empty() {
        return Err(Error::Config("A topic is required".to_string()));
    }
    let audience = match &cli.audience {
        Some(audience) => audience.clone(),
        None => prompt("Enter target audience: ")?,
    };
    info!("🚀 Starting Wikipedia TikTok Generator: {} for {}", topic, audience);

    let request = RunRequest {
        topic,
        audience,
        output_dir: cli.output_dir.clone(),
    };
    let mut pipeline = build_pipeline(config, &backends, &request.output_dir).await?;
    let outcome = pipeline.run(&request).await?;

    println!("\nScript generated successfully!");
    println!("Output directory: {}", request.output_dir.display());
    if let Some(path) = &outcome.script_path {
        println!("Script file: {}", path.display());
    }
    println!("\nEngagement Analysis:");
    println!("{}", outcome.engagement.engagement_analysis);
    println!("\nToken Usage and Cost:");
    println!("{}", wt_cli::pipeline::usage_summary(&pipeline));
    Ok(())
}

async fn search(cli: &Cli, config: &AppConfig, query: &str, top_k: usize) -> Result<()> {
    let tokens = Arc::new(TokenCounter::new());
    let indexer = open_indexer(config, &backends(cli)?, tokens).await?;
    let matches = indexer.search(query, top_k).await?;
    println!("Found {} matches for '{}'", matches.len(), query);
    for (rank, m) in matches.iter().enumerate() {
        println!("{}. [{:.3}] {} ({})", rank + 1, m.score, m.chunk_title, m.url);
        println!("   {}", m.text.chars().take(200).collect::<String>());
    }
    Ok(())
}

async fn clear(cli: &Cli, config: &AppConfig) -> Result<()> {
    let tokens = Arc::new(TokenCounter::new());
    let mut indexer = open_indexer(config, &backends(cli)?, tokens).await?;
    indexer.clear().await?;
    println!("Index cleared");
    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let config = AppConfig::from_env()?;
    match &cli.command {
        None | Some(Commands::Generate) => generate(cli, &config).await,
        Some(Commands::Search { query, top_k }) => search(cli, &config, query, *top_k).await,
        Some(Commands::Clear) => clear(cli, &config).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let started = Instant::now();
    let result = run(&cli).await;
    if let Err(e) = &result {
        println!("{}", failure_message(e));
    }
    for line in elapsed_report(started.elapsed()) {
        println!("{}", line);
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
