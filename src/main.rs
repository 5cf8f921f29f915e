use std::{process, sync::Arc};

use blogify::{
    application::{error::AppError, suggestions::CompletionClient},
    config,
    infra::{
        completion::{GroqCompletionClient, GroqKeyDiagnostics},
        db::SqliteRepositories,
        error::InfraError,
        http::{self, ApiState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    warn_on_defaults(&settings);

    let repositories = init_repositories(&settings).await?;
    let completion: Arc<dyn CompletionClient> =
        Arc::new(GroqCompletionClient::new(&settings.groq)?);
    let groq_key = GroqKeyDiagnostics::inspect(settings.groq.api_key.as_deref());

    let state = ApiState::new(repositories.clone(), repositories, completion, groq_key);
    let router = http::build_router(state, &settings.cors)?;

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(InfraError::from)?;

    info!(
        target = "blogify::main",
        addr = %settings.server.addr,
        database = %settings.database.path.display(),
        cors_origin = %settings.cors.frontend_url,
        "backend running"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

fn warn_on_defaults(settings: &config::Settings) {
    if !settings.cors.explicit {
        warn!(
            target = "blogify::main",
            origin = %settings.cors.frontend_url,
            "frontend url is not configured; allowing the local development origin"
        );
    }

    if settings.groq.api_key.is_none() {
        warn!(
            target = "blogify::main",
            "groq api key is not configured; suggestion requests will fail"
        );
    }
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<SqliteRepositories>, AppError> {
    let pool = SqliteRepositories::connect(
        &settings.database.path,
        settings.database.max_connections.get(),
    )
    .await
    .map_err(|err| InfraError::database(err.to_string()))?;

    SqliteRepositories::run_migrations(&pool)
        .await
        .map_err(|err| InfraError::database(err.to_string()))?;

    Ok(Arc::new(SqliteRepositories::new(pool)))
}
