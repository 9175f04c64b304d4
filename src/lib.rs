//! Back-office broker roster: drag-to-reorder ranking persisted to the
//! brokerage REST API.

pub mod domain;
pub mod models;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use std::sync::{Arc, Mutex};

    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::models::config::ServerConfig;
    use crate::repository::{HttpRosterRepository, StaticCredentials};
    use crate::routes::configure;
    use crate::services::roster::RosterController;

    /// Minimum length of the cookie signing secret.
    const MIN_SECRET_LEN: usize = 64;

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        if server_config.secret.len() < MIN_SECRET_LEN {
            return Err(std::io::Error::other(format!(
                "secret must be at least {MIN_SECRET_LEN} bytes long"
            )));
        }

        let repo = HttpRosterRepository::from_config(&server_config)
            .map_err(|e| std::io::Error::other(format!("Failed to build roster client: {e}")))?;

        if server_config.auth_token.is_none() {
            log::warn!("No auth token configured; roster requests will be refused");
        }
        let credentials = Arc::new(StaticCredentials::new(server_config.auth_token.clone()));
        let roster = web::Data::new(Mutex::new(RosterController::new(credentials)));

        // Keys and stores for flash messages.
        let secret_key = Key::from(server_config.secret.as_bytes());
        let message_store = CookieMessageStore::builder(secret_key).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Serving the broker roster on {}:{}",
            bind_address.0,
            bind_address.1
        );

        HttpServer::new(move || {
            App::new()
                .wrap(message_framework.clone())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .configure(configure)
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(roster.clone())
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
