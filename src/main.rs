use std::sync::Arc;

use clap::{Parser, Subcommand};

mod admin;
mod app;
mod attrs;
mod auth;
mod config;
mod db;
mod error;
mod recipes;
mod state;
mod users;

#[cfg(test)]
mod testing;

use crate::auth::services::{create_account, normalize_email, NewAccount};
use crate::config::AppConfig;
use crate::db::PgStore;
use crate::state::{AppState, Store};
use crate::users::{UserChanges, UserStore};

/// Recipe API server and admin tooling
#[derive(Parser)]
#[command(name = "recipe-api")]
#[command(about = "Recipe management REST backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Bind host (overrides APP_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides APP_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations and exit
    Migrate,
    /// Create a staff superuser, or promote the account with this email
    CreateSuperuser {
        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        name: String,

        #[arg(long)]
        password: String,
    },
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "recipe_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.host.clone());
            let port = port.unwrap_or(config.port);
            let app_state = AppState::init(config).await?;
            app::serve(app::build_app(app_state), &host, port).await
        }
        Commands::Migrate => {
            let pool = db::connect(&config).await?;
            db::migrate(&pool).await?;
            tracing::info!("migrations applied");
            Ok(())
        }
        Commands::CreateSuperuser { email, name, password } => {
            let pool = db::connect(&config).await?;
            db::migrate(&pool).await?;
            let store = Arc::new(PgStore::new(pool)) as Arc<dyn Store>;
            create_superuser(store.as_ref(), &email, &name, &password).await
        }
    }
}

async fn create_superuser(
    store: &dyn Store,
    email: &str,
    name: &str,
    password: &str,
) -> anyhow::Result<()> {
    let promote = UserChanges {
        is_active: Some(true),
        is_staff: Some(true),
        is_superuser: Some(true),
        ..Default::default()
    };

    if let Some(existing) = store.find_user_by_email(&normalize_email(email)).await? {
        store.update_user(existing.id, promote).await?;
        tracing::info!(user_id = %existing.id, "existing user promoted to superuser");
        return Ok(());
    }

    let user = create_account(
        store,
        NewAccount {
            email,
            name,
            password,
            is_staff: true,
            is_superuser: true,
        },
    )
    .await?;
    tracing::info!(user_id = %user.id, email = %user.email, "superuser created");
    Ok(())
}
