//! HTTP service exposing key generation, encryption and decryption per scheme.
//!
//! The service layer owns transport concerns only: routing, JSON bodies, CORS and security
//! headers. Everything cryptographic lives in `common`.

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use common::Config;
use log::info;

pub mod handlers;

/// Registers the API routes. Mounted under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::json_config())
        .service(web::resource("/status").route(web::get().to(handlers::get_status)))
        .service(web::resource("/schemes").route(web::get().to(handlers::get_schemes)))
        .service(web::resource("/keys/{method}").route(web::get().to(handlers::generate_keys)))
        .service(web::resource("/encrypt/{method}").route(web::post().to(handlers::encrypt)))
        .service(web::resource("/decrypt/{method}").route(web::post().to(handlers::decrypt)));
}

pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-DNS-Prefetch-Control", "on"))
        .add((
            "Strict-Transport-Security",
            "max-age=63072000; includeSubDomains; preload",
        ))
        .add(("X-Frame-Options", "SAMEORIGIN"))
        .add((
            "Permissions-Policy",
            "camera=(), microphone=(), geolocation=(), browsing-topics=()",
        ))
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("Referrer-Policy", "origin-when-cross-origin"))
        .add((
            "Content-Security-Policy",
            "default-src 'self'; script-src 'self' 'unsafe-eval' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self' data:; connect-src 'self'",
        ))
}

pub fn cors(allowed_origin: &str) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600);

    if allowed_origin == "*" {
        cors.allow_any_origin()
    } else {
        cors.allowed_origin(allowed_origin)
    }
}

pub struct CipherLabServer {
    config: Config,
}

impl CipherLabServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn start(&self) -> std::io::Result<()> {
        let allowed_origin = self.config.allowed_origin.clone();

        let mut http_server = HttpServer::new(move || {
            App::new()
                .wrap(security_headers())
                .wrap(Logger::default())
                .wrap(cors(&allowed_origin))
                .service(web::scope("/api").configure(configure))
        });

        if let Some(workers) = self.config.http_workers {
            info!("Using {} HTTP workers", workers);
            http_server = http_server.workers(workers);
        }

        info!("Starting HTTP server on {}", self.config.bind_address);
        let http_server = http_server.bind(&self.config.bind_address)?;

        http_server.run().await?;
        info!("HTTP server stopped");
        Ok(())
    }
}
