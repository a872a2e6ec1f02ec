use clap::Parser;
use clinical_notes::{EntityExtractor, NoteSynthesizer, OpenAiCompletionClient};
use database_layer::RestDatastore;
use error_common::log_error;
use logger_redacted::init_logging;
use mcp_server::{Cli, McpServer, StdioTransport, ToolContext, SERVER_NAME};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.logger_config(), SERVER_NAME) {
        eprintln!("{SERVER_NAME}: {e}");
        return ExitCode::FAILURE;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting {}", SERVER_NAME);

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            log_error("startup", &e);
            return ExitCode::FAILURE;
        }
    };

    let store = match RestDatastore::connect(&config.datastore) {
        Ok(store) => store,
        Err(e) => {
            log_error("datastore connection", &e);
            return ExitCode::FAILURE;
        }
    };

    if !config.completion.is_configured() {
        warn!("No completion API key configured; visit notes will use keyword extraction");
    }
    let completion = match OpenAiCompletionClient::new(&config.completion) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            log_error("completion client", &e);
            return ExitCode::FAILURE;
        }
    };

    let server = McpServer::new(ToolContext {
        store: Arc::new(store),
        synthesizer: NoteSynthesizer::new(completion.clone()),
        extractor: EntityExtractor::new(completion),
    });

    let mut transport = StdioTransport::new();
    match server.serve(&mut transport).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Transport failure: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
