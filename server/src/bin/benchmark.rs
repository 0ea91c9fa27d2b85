use cipherlab_server::benchmark::{run_benchmark, SchemeReport};
use common::logging::{setup_logger, LogStyle};
use clap::Parser;
use common::Scheme;
use log::{error, info};

#[derive(Parser, Debug)]
#[command(name = "cipherlab-benchmark", about = "Round-trip benchmark across all schemes")]
struct Args {
    /// Round trips per scheme
    #[arg(short, long, default_value_t = 20)]
    iterations: usize,

    /// Message to encrypt (must fit the RSA-OAEP bound of 214 bytes)
    #[arg(short, long, default_value = "Hello, World!")]
    message: String,

    /// Only benchmark these schemes (aes, rsa, pgp, tls)
    #[arg(short, long, value_delimiter = ',')]
    schemes: Vec<String>,

    /// Print the reports as JSON
    #[arg(long)]
    json: bool,
}

fn selected_schemes(names: &[String]) -> Result<Vec<Scheme>, common::CryptoError> {
    if names.is_empty() {
        return Ok(Scheme::ALL.to_vec());
    }
    names.iter().map(|name| name.parse()).collect()
}

fn main() {
    setup_logger(LogStyle::Service);
    let args = Args::parse();

    let schemes = match selected_schemes(&args.schemes) {
        Ok(schemes) => schemes,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    info!("Running benchmark over {} schemes", schemes.len());
    let reports: Vec<SchemeReport> = schemes
        .into_iter()
        .map(|scheme| run_benchmark(scheme, &args.message, args.iterations))
        .collect();

    if args.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize reports: {}", e),
        }
    } else {
        println!(
            "{:<24} {:>10} {:>12} {:>12} {:>10} {:>9}",
            "scheme", "keygen ms", "encrypt ms", "decrypt ms", "size", "strength"
        );
        for r in &reports {
            println!(
                "{:<24} {:>10.3} {:>12.3} {:>12.3} {:>4}->{:<5} {:>9}",
                r.scheme.display_name(),
                r.key_generation_time,
                r.encryption_time,
                r.decryption_time,
                r.original_size,
                r.encrypted_size,
                r.strength
            );
        }
    }

    let failures: usize = reports.iter().map(|r| r.failures).sum();
    if failures > 0 {
        error!("{} round trips failed", failures);
        std::process::exit(1);
    }
}
