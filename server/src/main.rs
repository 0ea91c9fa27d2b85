//! Main entry point for the CipherLab server

use common::logging::{setup_logger, LogStyle};
use cipherlab_server::CipherLabServer;
use common::Config;
use log::{error, info, warn};

const BANNER: &str = r#"
╔═══════════════════════════════════════════════════════════════════╗
║                                                                   ║
║    ██████╗██╗██████╗ ██╗  ██╗███████╗██████╗                      ║
║   ██╔════╝██║██╔══██╗██║  ██║██╔════╝██╔══██╗                     ║
║   ██║     ██║██████╔╝███████║█████╗  ██████╔╝                     ║
║   ██║     ██║██╔═══╝ ██╔══██║██╔══╝  ██╔══██╗                     ║
║   ╚██████╗██║██║     ██║  ██║███████╗██║  ██║  LAB                ║
║    ╚═════╝╚═╝╚═╝     ╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝                     ║
║                                                                   ║
║   Encryption Playground Server v0.1.0                             ║
║                                                                   ║
╚═══════════════════════════════════════════════════════════════════╝
"#;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    setup_logger(LogStyle::Service);

    println!("{}", BANNER);

    info!("Starting CipherLab server...");

    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    info!("Configuration loaded successfully");
    info!("✓ Allowed origin: {}", config.allowed_origin);

    warn!("The aes, pgp and tls schemes are teaching stand-ins; their envelopes do not keep messages secret");

    let server = CipherLabServer::new(config);
    info!("✓ Server instance created successfully");

    server.start().await
}
