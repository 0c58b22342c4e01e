use anyhow::{Context, Result};
use clap::Parser;
use lumina_analysis::{Analyzer, AnalyzerLimits};
use lumina_common::observability::{init_logging, LogConfig};
use lumina_config::{Settings, SettingsLoader};
use lumina_llm::{GeminiClient, GroqClient, MistralOcrClient};
use lumina_app::routes;
use lumina_app::state::AppState;
use lumina_search::{SearchCache, TavilyClient};
use lumina_web::ContentFetcher;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "lumina", about = "Misinformation verification service")]
struct Args {
    /// Path to the YAML config file. Env vars (LUMINA_*) override it.
    #[arg(long, env = "LUMINA_CONFIG", default_value = "lumina.yaml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load config (env wins), then fail fast on missing credentials
    // before anything binds or logs.
    let settings: Settings = SettingsLoader::new().with_file(&args.config).load()?;
    settings.validate()?;

    let log_path = init_logging(LogConfig::default())?;
    tracing::info!(target: "app", log_path = %log_path.display(), "startup.logging_ready");

    let state = build_state(&settings)?;
    let app = routes::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(target: "app", %addr, "startup.listening");

    axum::serve(listener, app).await.context("server exited")
}

fn build_state(settings: &Settings) -> Result<AppState> {
    let providers = &settings.providers;

    let llm = GroqClient::new(
        providers.groq_api_key.clone(),
        providers.chat_model.clone(),
    )?;
    let vision = GeminiClient::new(
        providers.google_api_key.clone(),
        providers.vision_model.clone(),
    )?;
    let ocr = MistralOcrClient::new(
        providers.mistral_api_key.clone(),
        providers.ocr_model.clone(),
    )?;
    let tavily = TavilyClient::new(providers.tavily_api_key.clone())?;

    let search = SearchCache::new(Arc::new(tavily), settings.limits.search_cache_capacity);
    let fetcher = ContentFetcher::new()?;
    let limits = AnalyzerLimits {
        batch_claim_cap: settings.limits.batch_claim_cap,
        video_max_bytes: settings.limits.video_max_bytes,
    };

    let analyzer = Analyzer::new(
        Arc::new(llm),
        Arc::new(vision),
        Arc::new(ocr),
        Arc::new(search),
        fetcher,
        limits,
    );

    Ok(AppState {
        analyzer: Arc::new(analyzer),
    })
}
