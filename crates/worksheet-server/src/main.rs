use tracing::info;
use tracing_subscriber::EnvFilter;

use worksheet_bedrock::client::{build_sdk_config, BedrockGenerator};
use worksheet_bedrock::pipeline::ContentPipeline;
use worksheet_export::pdf::PdfRenderer;
use worksheet_server::config::{AppConfig, LogFormat};
use worksheet_server::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let sdk_config = build_sdk_config(&config.region, &config.credentials).await;
    let generator = BedrockGenerator::new(&sdk_config, config.model_id.clone(), config.max_tokens);

    let state = AppState::new(
        ContentPipeline::new(generator, config.pipeline_options()),
        PdfRenderer::new(config.render_options()),
    );
    let app = worksheet_server::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        addr = %config.bind,
        region = %config.region,
        model = %config.model_id,
        engine = %config.tex_engine,
        "worksheet server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("worksheet server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
