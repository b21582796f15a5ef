//! Report Assistant server.

use std::error::Error;
use std::sync::Arc;

use report_assistant::adapters::ai::{
    FunctionCallingGenerator, GeneratorSettings, MockAIProvider, OpenAIConfig, OpenAIProvider,
};
use report_assistant::adapters::backend::{HttpReportSource, HttpRetrievalClient, HttpUploadClient};
use report_assistant::adapters::http::{app_router, AppState};
use report_assistant::adapters::storage::{InMemoryConversationRegistry, InMemoryDocumentStore};
use report_assistant::adapters::validation::JsonSchemaValidator;
use report_assistant::application::availability::{AvailabilityPoller, ReportWatcher};
use report_assistant::application::handlers::{
    AnswerQueryHandler, ChatTurnHandler, ReportLookupHandler, UploadReportHandler,
};
use report_assistant::application::routing::QueryRouter;
use report_assistant::config::{AiConfig, AiProvider, AppConfig, ConfigError, ValidationError};
use report_assistant::ports::{AIProvider, DocumentStore, EscalationService};
use report_assistant::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate().map_err(ConfigError::from)?;

    let addr = config.server.socket_addr()?;
    let (state, watcher) = build_state(&config)?;
    let app = app_router(state, &config);

    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        model = %config.ai.model,
        backend = %config.backend.base_url,
        "Report Assistant starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    watcher.cancel_all().await;
    tracing::info!("Report Assistant stopped");
    Ok(())
}

fn build_provider(ai: &AiConfig) -> Result<Arc<dyn AIProvider>, Box<dyn Error + Send + Sync>> {
    match ai.provider {
        AiProvider::OpenAI => {
            let key = ai
                .openai_api_key
                .clone()
                .ok_or(ValidationError::MissingRequired("OPENAI_API_KEY"))?;
            let provider = OpenAIProvider::new(
                OpenAIConfig::from_secret(key)
                    .with_model(ai.model.clone())
                    .with_base_url(ai.base_url.clone())
                    .with_timeout(ai.timeout())
                    .with_max_retries(ai.max_retries),
            )?;
            Ok(Arc::new(provider))
        }
        AiProvider::Mock => {
            tracing::warn!("Using the mock AI provider");
            Ok(Arc::new(MockAIProvider::new()))
        }
    }
}

fn build_state(
    config: &AppConfig,
) -> Result<(AppState, Arc<ReportWatcher>), Box<dyn Error + Send + Sync>> {
    let generator = Arc::new(FunctionCallingGenerator::new(
        build_provider(&config.ai)?,
        Arc::new(JsonSchemaValidator::new()),
        GeneratorSettings {
            timeout: config.ai.timeout(),
            temperature: config.ai.temperature,
        },
    ));
    let router = Arc::new(QueryRouter::new(generator));

    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    let escalation: Arc<dyn EscalationService> =
        Arc::new(HttpRetrievalClient::new(config.backend.clone())?);
    let source = Arc::new(HttpReportSource::new(config.backend.clone())?);
    let uploads = Arc::new(HttpUploadClient::new(config.backend.clone())?);

    let poller = Arc::new(AvailabilityPoller::new(
        source.clone(),
        config.poller.poll_state()?,
    ));
    let watcher = Arc::new(ReportWatcher::new(poller, store.clone()));

    let state = AppState {
        lookup: Arc::new(ReportLookupHandler::new(
            store.clone(),
            source,
            watcher.clone(),
        )),
        uploads: Arc::new(UploadReportHandler::new(
            uploads,
            store.clone(),
            watcher.clone(),
            config.upload.clone(),
        )),
        answers: Arc::new(AnswerQueryHandler::new(
            router.clone(),
            escalation.clone(),
            store.clone(),
        )),
        turns: Arc::new(ChatTurnHandler::new(router, escalation, store)),
        conversations: Arc::new(InMemoryConversationRegistry::new()),
        watcher: watcher.clone(),
        features: config.features.clone(),
    };
    Ok((state, watcher))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
