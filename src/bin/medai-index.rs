use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use medai::chunking::splitter::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use medai::chunking::TextSplitter;
use medai::config::Config;
use medai::ingest;
use medai::llm::HttpEmbedder;

/// Build the vector index the answering service loads at startup.
#[derive(Parser, Debug)]
#[command(name = "medai-index", version, about, long_about = None)]
struct Args {
    /// Source document (PDF or plain text)
    #[arg(short, long, default_value = "Medical_book.pdf")]
    input: PathBuf,

    /// Output index directory (defaults to MEDAI_INDEX_DIR)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Maximum characters per passage
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Characters shared between consecutive passages
    #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
    chunk_overlap: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    let out = args.out.unwrap_or_else(|| config.index_dir.clone());

    let splitter = TextSplitter::new(args.chunk_size, args.chunk_overlap)?;
    let http_client = reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(10))
        .timeout(std::time::Duration::from_secs(120))
        .build()?;
    let embedder = HttpEmbedder::new(http_client, config.embedding.clone());

    ingest::run(&args.input, &out, &splitter, &embedder).await?;
    Ok(())
}
