mod client;
mod report;

use clap::{Args, Parser, Subcommand};
use client::{ClientError, Playground};
use common::api::{DecryptRequest, EncryptRequest};
use common::encryption::MetricsCollector;
use common::logging::{setup_logger, LogStyle};
use common::{Config, Scheme};
use log::{error, info, warn};
use report::{format_exchange, Exchange};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

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
║   Encryption Playground Client v0.1.0                             ║
║                                                                   ║
╚═══════════════════════════════════════════════════════════════════╝
"#;

#[derive(Parser, Debug)]
#[command(name = "cipherlab", about = "Try each encryption scheme from the terminal")]
struct Cli {
    /// Server base URL. Defaults to SERVER_URL.
    #[arg(long, global = true, conflicts_with = "local")]
    server: Option<String>,

    /// Run everything in-process instead of calling a server.
    #[arg(long, global = true)]
    local: bool,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Skip the banner.
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a key pair.
    Keys { scheme: Scheme },
    /// Encrypt a message with a public key.
    Encrypt {
        scheme: Scheme,
        #[arg(short, long)]
        message: String,
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Decrypt an envelope with a private key.
    Decrypt {
        scheme: Scheme,
        /// Transport form of the envelope, or `-` to read stdin.
        #[arg(short, long)]
        encrypted: String,
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        tamper: TamperArgs,
    },
    /// Generate keys, encrypt and decrypt in one go, then show the metrics.
    Run {
        /// Omit to run every scheme.
        scheme: Option<Scheme>,
        #[arg(short, long, default_value = "Hello, World!")]
        message: String,
        #[command(flatten)]
        tamper: TamperArgs,
    },
}

#[derive(Args, Debug)]
struct KeyArgs {
    #[arg(long, conflicts_with = "key_file")]
    key: Option<String>,
    #[arg(long)]
    key_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TamperArgs {
    /// Ask the server to report the envelope as tampered with.
    #[arg(long = "simulate-tamper", alias = "mitm")]
    simulate_tamper: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Config(#[from] common::ConfigError),
    #[error("Failed to read {0}: {1}")]
    Io(String, std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0} round trip returned a different message")]
    Mismatch(Scheme),
}

impl KeyArgs {
    fn resolve(&self) -> Result<Option<String>, CliError> {
        match (&self.key, &self.key_file) {
            (Some(key), _) => Ok(Some(key.clone())),
            (None, Some(path)) => std::fs::read_to_string(path)
                .map(Some)
                .map_err(|e| CliError::Io(path.display().to_string(), e)),
            (None, None) => Ok(None),
        }
    }
}

fn read_envelope(arg: &str) -> Result<String, CliError> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    std::io::read_to_string(std::io::stdin()).map_err(|e| CliError::Io("stdin".to_string(), e))
}

async fn run_exchange(
    playground: &Playground,
    scheme: Scheme,
    message: &str,
    simulate_tamper: bool,
) -> Result<Exchange, CliError> {
    info!("Running {} exchange against {}", scheme, playground.describe());
    let keys = playground.generate_keys(scheme).await?;
    let mut collector = MetricsCollector::new(scheme);

    let start = Instant::now();
    let encrypted = playground
        .encrypt(
            scheme,
            &EncryptRequest {
                message: Some(message.to_string()),
                public_key: Some(keys.public_key),
            },
        )
        .await;
    collector.record_encryption(message, encrypted.as_deref().ok(), start.elapsed());
    let encrypted = encrypted?;

    let start = Instant::now();
    let decrypted = playground
        .decrypt(
            scheme,
            &DecryptRequest {
                encrypted_message: Some(encrypted.clone()),
                private_key: Some(keys.private_key),
                simulate_tamper,
            },
        )
        .await;
    collector.record_decryption(start.elapsed());

    Ok(Exchange {
        scheme,
        message: message.to_string(),
        encrypted_message: encrypted,
        decrypted_message: decrypted?,
        simulate_tamper,
        metrics: collector.into_metrics(),
    })
}

async fn execute(cli: Cli) -> Result<(), CliError> {
    let playground = if cli.local {
        Playground::local()
    } else {
        let server_url = match cli.server {
            Some(url) => url,
            None => Config::load()?.server_url,
        };
        Playground::remote(&server_url)?
    };

    match cli.command {
        Command::Keys { scheme } => {
            let keys = playground.generate_keys(scheme).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&keys)?);
            } else {
                println!("Public key:\n{}\n", keys.public_key);
                println!("Private key:\n{}", keys.private_key);
            }
        }
        Command::Encrypt { scheme, message, key } => {
            let request = EncryptRequest {
                message: Some(message),
                public_key: key.resolve()?,
            };
            let encrypted = playground.encrypt(scheme, &request).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "encryptedMessage": encrypted }));
            } else {
                println!("{}", encrypted);
            }
        }
        Command::Decrypt {
            scheme,
            encrypted,
            key,
            tamper,
        } => {
            let request = DecryptRequest {
                encrypted_message: Some(read_envelope(&encrypted)?),
                private_key: key.resolve()?,
                simulate_tamper: tamper.simulate_tamper,
            };
            let decrypted = playground.decrypt(scheme, &request).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "decryptedMessage": decrypted }));
            } else {
                println!("{}", decrypted);
            }
        }
        Command::Run {
            scheme,
            message,
            tamper,
        } => {
            let schemes = match scheme {
                Some(scheme) => vec![scheme],
                None => Scheme::ALL.to_vec(),
            };

            let mut exchanges = Vec::with_capacity(schemes.len());
            for scheme in schemes {
                let exchange =
                    run_exchange(&playground, scheme, &message, tamper.simulate_tamper).await?;
                if !cli.json {
                    println!("{}", format_exchange(&exchange));
                }
                if !exchange.round_trip_ok() {
                    return Err(CliError::Mismatch(scheme));
                }
                exchanges.push(exchange);
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&exchanges)?);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logger(LogStyle::Cli);

    let cli = Cli::parse();
    if !cli.quiet && !cli.json {
        println!("{}", BANNER);
    }
    if cli.local {
        warn!("Local mode: requests never leave this process");
    }

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
