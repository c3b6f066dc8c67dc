use std::time::Duration;

use actix_cors::Cors;
use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use espresso_engine::{MenuApi, SqliteDatabase};

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    errors::ServerError,
    routes::{health, CreateDrinkRoute, DeleteDrinkRoute, DrinksDetailRoute, DrinksRoute, UpdateDrinkRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.create_schema().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let menu_api = MenuApi::new(db.clone());
        let verifier = TokenVerifier::new(&config.auth);
        // Browser-based storefronts call these endpoints cross-origin.
        let cors = match &config.cors_allowed_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allowed_methods(["GET", "POST", "PATCH", "DELETE"])
                .allow_any_header()
                .max_age(3600),
            None => Cors::permissive(),
        };
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("esp::access_log"))
            .wrap(cors)
            .app_data(web::Data::new(menu_api))
            .app_data(web::Data::new(verifier))
            // Extractor failures must produce the uniform error envelope as well.
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into()),
            )
            .app_data(
                web::PathConfig::default()
                    .error_handler(|err, _req| ServerError::InvalidRequestPath(err.to_string()).into()),
            )
            .service(health)
            .service(DrinksRoute::<SqliteDatabase>::new())
            .service(DrinksDetailRoute::<SqliteDatabase>::new())
            .service(CreateDrinkRoute::<SqliteDatabase>::new())
            .service(UpdateDrinkRoute::<SqliteDatabase>::new())
            .service(DeleteDrinkRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
