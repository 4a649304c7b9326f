//! One-shot invocation from the shell.
//!
//! Runs the same pipeline the webhook runs, using the process environment (and `.env`), and
//! prints the response body. Useful for backfills and for checking credentials before deploying.
use anyhow::{Context, Result};
use clap::Parser;
use searchbridge::{
    algolia::{AlgoliaClient, IndexSink},
    config::{self, Config, ResponseBody},
    contentful::ContentfulClient,
    logging,
    pipeline::run_pipeline,
    transport::{HttpTransport, TransportOptions},
};

#[derive(Parser)]
#[command(
    name = "sync-index",
    about = "Fetch Contentful entries and build (or submit) Algolia index requests"
)]
struct Cli {
    /// Target index; overrides `ALGOLIA_INDEX`.
    #[arg(long)]
    index_name: Option<String>,
    /// Submit the requests even when `INDEXING_ENABLED` is off.
    #[arg(long)]
    submit: bool,
    /// Print this pipeline stage instead of `RESPONSE_BODY`.
    #[arg(long, value_parser = parse_body)]
    output: Option<ResponseBody>,
}

fn parse_body(value: &str) -> Result<ResponseBody, String> {
    value
        .parse()
        .map_err(|()| format!("unknown output '{value}' (entries, requests, acknowledgements)"))
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    logging::init_tracing();
    let cli = Cli::parse();

    let config = Config::from_env().context("failed to load configuration")?;
    let transport = HttpTransport::new(TransportOptions {
        origin_hint: config.origin_hint.clone(),
    })
    .context("failed to build HTTP client")?;

    let contentful = ContentfulClient::new(&config.contentful, transport.clone())?;
    let algolia = if cli.submit || config.indexing_enabled {
        Some(AlgoliaClient::new(&config.algolia, transport)?)
    } else {
        None
    };

    let outcome = run_pipeline(
        &contentful,
        algolia.as_ref().map(|client| client as &dyn IndexSink),
        cli.index_name.as_deref(),
    )
    .await?;

    let body = outcome.into_body(cli.output.unwrap_or(config.response_body));
    println!(
        "{}",
        serde_json::to_string_pretty(&body).context("failed to render output")?
    );
    Ok(())
}
