use focusbot_lib::{
    chat::{ChatService, CompletionProvider, ConversationStore, PgConversationStore},
    cli::parse_args,
    completion::CompletionClient,
    config::Config,
    db::build_db_pool,
    server::setup_server,
    state::AppState,
};

use diesel::{pg::PgConnection, Connection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use log::{debug, info};
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

const DEFAULT_PORT: u16 = 8000;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Gracefully shuts down the application when a SIGTERM or SIGINT signal is received.
async fn handle_shutdown_signals(state: Arc<AppState>) {
    let mut sigterm =
        signal(SignalKind::terminate()).expect("Failed to register SIGTERM signal handler");
    let mut sigint =
        signal(SignalKind::interrupt()).expect("Failed to register SIGINT signal handler");

    tokio::select! {
        _ = sigterm.recv() => {
            info!("SIGTERM received, shutting down.");
        }
        _ = sigint.recv() => {
            info!("SIGINT received, shutting down.");
        }
    }

    state.shutdown_token.cancel();
}

fn run_initial_migrations(
    connection: &mut impl MigrationHarness<diesel::pg::Pg>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

#[tokio::main]
async fn main() {
    info!("Starting focusbot backend");
    dotenv().ok();

    let config = Config::from_env().expect("Config incorrectly specified");
    env_logger::init();
    let args = parse_args();
    debug!("Config loaded");

    let mut temp_conn =
        PgConnection::establish(&config.db.url()).expect("Could not open migration connection");
    run_initial_migrations(&mut temp_conn).expect("Migrations failed");

    let pool = build_db_pool(&config.db)
        .await
        .expect("Could not initialize DB pool!");

    let completion: Arc<dyn CompletionProvider> = Arc::new(
        CompletionClient::new(config.completion_api_url, config.mistral_api_key)
            .expect("Could not build completion client"),
    );
    let store: Arc<dyn ConversationStore> = Arc::new(PgConversationStore::new(pool.clone()));
    let chat = ChatService::new(completion, store);

    let state = Arc::new(AppState::new(chat, CancellationToken::new()));
    let shutdown_handle = tokio::spawn(handle_shutdown_signals(state.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port.unwrap_or(DEFAULT_PORT)));
    let server_handle = setup_server(state.clone(), addr)
        .await
        .expect("failed to bind chat server");

    shutdown_handle.await.unwrap();
    server_handle.await.unwrap();
}
