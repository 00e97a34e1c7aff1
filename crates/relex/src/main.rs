use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use relex_core::{ApiCredentials, ExtractOptions, HttpTransport, RelationshipExtractor};

/// Extract entities and relationships from text.
#[derive(Debug, Parser)]
#[command(name = "relex", version, about)]
struct Cli {
    /// Text to analyse. Reads standard input when omitted.
    text: Option<String>,

    /// Include relationships found between entities.
    #[arg(long)]
    relationships: bool,

    /// Include character offsets into the input text.
    #[arg(long)]
    locations: bool,

    /// Include unique entity and mention ids.
    #[arg(long)]
    ids: bool,

    /// Leave confidence scores out of the output.
    #[arg(long)]
    no_scores: bool,

    /// Leave entities and their mentions out of the output.
    #[arg(long)]
    no_mentions: bool,

    /// Extraction dataset.
    #[arg(long, default_value = relex_core::DEFAULT_DATASET)]
    dataset: String,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Service endpoint URL.
    #[arg(long, env = "RELEX_URL")]
    url: Option<String>,

    /// Service username.
    #[arg(long, env = "RELEX_USER")]
    user: Option<String>,

    /// Service password.
    #[arg(long, env = "RELEX_PASS")]
    pass: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let text = match cli.text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading text from stdin")?;
            buffer
        }
    };

    let mut options = ExtractOptions::new()
        .with_mentions(!cli.no_mentions)
        .with_relationships(cli.relationships)
        .with_locations(cli.locations)
        .with_scores(!cli.no_scores)
        .with_ids(cli.ids)
        .with_dataset(cli.dataset);
    if let (Some(url), Some(user), Some(pass)) = (cli.url, cli.user, cli.pass) {
        options = options.with_api(ApiCredentials { url, user, pass });
    }

    let client = match cli.timeout {
        Some(seconds) => {
            let transport = HttpTransport::with_timeout(Duration::from_secs(seconds))
                .context("building HTTP client")?;
            RelationshipExtractor::with_transport(Arc::new(transport))
        }
        None => RelationshipExtractor::new(),
    };
    let response = client
        .extract(&text, &options)
        .await
        .context("extraction failed")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
