use dotenvy::dotenv;
use espresso_engine::SqliteDatabase;
use espresso_server::{
    cli::{handle_command_line_args, CliCommand},
    config::ServerConfig,
    errors::ServerError,
    server::run_server,
};
use log::{info, warn};

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    match handle_command_line_args() {
        CliCommand::HelpShown => {},
        CliCommand::RebuildDb => {
            let config = ServerConfig::from_env_or_default();
            warn!(
                "🚨️ Dropping and re-creating the drinks database at {}. All records will be lost.",
                config.database_url
            );
            match rebuild_database(&config).await {
                Ok(()) => println!("Database rebuilt."),
                Err(e) => eprintln!("{e}"),
            }
        },
        CliCommand::Run => {
            let config = ServerConfig::from_env_or_default();
            info!("🚀️ Starting server on {}:{}", config.host, config.port);
            match run_server(config).await {
                Ok(_) => println!("Bye!"),
                Err(e) => eprintln!("{e}"),
            }
        },
    }
}

async fn rebuild_database(config: &ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 1)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.drop_and_recreate_all().await.map_err(|e| ServerError::InitializeError(e.to_string()))
}
