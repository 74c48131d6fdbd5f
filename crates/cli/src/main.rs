//! Command-line front-end for Fe26.2 tokens.
//!
//! ```bash
//! # Seal a value
//! ironseal --secret "$SECRET" --value "hello" seal
//!
//! # Unseal from stdin
//! echo "$TOKEN" | ironseal --secret "$SECRET" unseal
//! ```
//!
//! The payload comes from `--value` when given, otherwise from stdin with
//! surrounding whitespace trimmed. The result is written to stdout; errors go
//! to stderr and the process exits non-zero. `RUST_LOG` controls log
//! verbosity.

use std::io::{self, Read, Write};

use clap::{Parser, Subcommand};
use ironseal::{Options, Vault, MIN_SECRET_LEN};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ironseal")]
#[command(about = "Seal and unseal Fe26.2 tokens")]
#[command(version)]
struct Cli {
    /// Shared secret used to derive the encryption and integrity keys.
    #[arg(short, long)]
    secret: String,

    /// Payload. Read from stdin when not provided.
    #[arg(short, long)]
    value: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encrypt and sign a payload into a token
    Seal,
    /// Verify and decrypt a token back into its payload
    Unseal,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.secret.len() < MIN_SECRET_LEN {
        return Err(format!("secret must be at least {MIN_SECRET_LEN} bytes").into());
    }

    let vault = Vault::new(Options {
        secret: cli.secret.into_bytes(),
        ..Options::default()
    });

    let input = read_input(cli.value)?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Seal => {
            debug!(bytes = input.len(), "sealing payload");
            let token = vault.seal(&input)?;
            stdout.write_all(token.as_bytes())?;
        }
        Command::Unseal => {
            let token = std::str::from_utf8(&input)?;
            debug!(bytes = token.len(), "unsealing token");
            let payload = vault.unseal(token)?;
            stdout.write_all(&payload)?;
        }
    }

    Ok(())
}

fn read_input(value: Option<String>) -> io::Result<Vec<u8>> {
    let raw = match value {
        Some(value) => value.into_bytes(),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    Ok(raw.trim_ascii().to_vec())
}
