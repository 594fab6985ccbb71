// file: src/main.rs
// version: 2.0.0
// guid: h8i9j0k1-l2m3-4567-8901-234567hijklm

//! Pexip Infinity provider CLI - Main entry point

use clap::Parser;
use pexip_infinity_provider::{
    cli::{
        args::{Cli, Commands},
        commands::*,
    },
    logging::{init_json_logger, init_logger, logger::with_async_operation_span},
    Result,
};
use tokio::signal;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let logger = if cli.json_logs {
        init_json_logger(cli.verbose, cli.quiet)
    } else {
        init_logger(cli.verbose, cli.quiet)
    };
    if let Err(e) = logger {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let shutdown_signal = async {
        match signal::ctrl_c().await {
            Ok(()) => warn!("Received Ctrl+C, aborting"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        result = run(cli.command) => {
            if let Err(e) = result {
                error!("{}", e);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        _ = shutdown_signal => {
            std::process::exit(130); // Standard exit code for Ctrl+C
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::ValidateConfig { config } => {
            with_async_operation_span("validate-config", || validate_config_command(&config)).await
        }
        Commands::GenerateSalt => {
            with_async_operation_span("generate-salt", generate_salt_command).await
        }
        Commands::HashPassword { salt, rounds, password_env, json } => {
            with_async_operation_span("hash-password", || {
                hash_password_command(&password_env, salt, rounds, json)
            })
            .await
        }
        Commands::VerifyPassword { hash, password_env } => {
            with_async_operation_span("verify-password", || {
                verify_password_command(&password_env, &hash)
            })
            .await
        }
    }
}
