use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

use crate::mailer::LettreMailer;
use crate::models::config::ServerConfig;
use crate::routes::email::send_email;
use crate::routes::main::health;

pub mod domain;
pub mod dto;
pub mod forms;
pub mod mailer;
pub mod models;
pub mod routes;
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let mailer = LettreMailer::new(Duration::from_secs(server_config.smtp_timeout_secs));

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(health)
            .service(web::scope("/api").service(send_email))
            .app_data(web::Data::new(mailer.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
