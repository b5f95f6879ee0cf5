use anyhow::{Context, Result};
use clap::Parser;
use contextify::enrich::{BingNewsSearcher, CourseCatalog, Enricher, WikipediaSummarizer};
use contextify::extract::{ChatCompletionsClient, EntityExtractor};
use contextify::http::{create_router, AppState};
use contextify::pipeline::Pipeline;
use contextify::stt::HttpTranscriber;
use contextify::Config;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "contextify")]
#[command(about = "Streaming lecture audio to structured, linked knowledge")]
struct Args {
    /// Configuration file without extension, e.g. config/contextify
    #[arg(long, default_value = "config/contextify")]
    config: String,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        cfg.service.http.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} starting", cfg.service.name);
    info!(
        "Source audio: {}Hz, {} bytes/sample, {} channel(s), unit threshold {} bytes",
        cfg.audio.sample_rate,
        cfg.audio.sample_width,
        cfg.audio.channels,
        cfg.audio.unit_threshold_bytes
    );

    let catalog = if cfg.courses.catalog_path.is_empty() {
        info!("Using embedded course catalog");
        CourseCatalog::builtin()
    } else {
        CourseCatalog::load(&cfg.courses.catalog_path)?
    };

    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    let transcriber = Arc::new(HttpTranscriber::new(client.clone(), &cfg.transcription));
    let llm = Arc::new(ChatCompletionsClient::new(client.clone(), &cfg.extraction));
    let extractor = EntityExtractor::new(llm, cfg.extraction.timeout());
    let enricher = Enricher::new(
        Arc::new(catalog),
        Arc::new(WikipediaSummarizer::new(
            client.clone(),
            &cfg.enrichment.summary_api_url,
        )),
        Arc::new(BingNewsSearcher::new(
            client,
            &cfg.enrichment.news_api_url,
            &cfg.enrichment.news_api_key,
        )),
        cfg.enrichment.news_count,
        cfg.enrichment.timeout(),
    );

    let pipeline = Arc::new(Pipeline::new(&cfg, transcriber, extractor, enricher));
    let app = create_router(AppState::new(pipeline));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("Listening on {} (audio stream at /ws/audio)", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
