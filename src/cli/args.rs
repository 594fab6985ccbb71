// file: src/cli/args.rs
// version: 2.0.0
// guid: f6g7h8i9-j0k1-2345-6789-012345fghijk

//! Command line argument definitions

use clap::{Parser, Subcommand};

/// Environment variable the web password is read from by default
pub const DEFAULT_PASSWORD_ENV: &str = "INFINITY_WEB_PASSWORD";

#[derive(Parser)]
#[command(name = "infinity-provider")]
#[command(about = "Validate Pexip Infinity manager bootstrap configuration and derive web password hashes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true, help = "Emit logs as JSON (honours RUST_LOG)")]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a manager bootstrap configuration file
    ValidateConfig {
        #[arg(short, long, help = "Path to a YAML or JSON configuration file")]
        config: String,
    },

    /// Generate a random 12 character salt
    GenerateSalt,

    /// Derive a SHA-512 crypt web password hash
    HashPassword {
        #[arg(short, long, help = "12 character salt; generated when omitted")]
        salt: Option<String>,

        #[arg(short, long, help = "Round count, at least 5000 (default 5000)")]
        rounds: Option<u32>,

        #[arg(long, default_value = DEFAULT_PASSWORD_ENV, help = "Environment variable holding the password")]
        password_env: String,

        #[arg(long, help = "Print the full resource state as JSON")]
        json: bool,
    },

    /// Check a password against a SHA-512 crypt hash
    VerifyPassword {
        #[arg(long, help = "Encoded $6$ hash")]
        hash: String,

        #[arg(long, default_value = DEFAULT_PASSWORD_ENV, help = "Environment variable holding the password")]
        password_env: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hash_password() {
        let cli = Cli::parse_from(["infinity-provider", "hash-password", "--salt", "abcdefghijkl", "--rounds", "6000"]);
        match cli.command {
            Commands::HashPassword { salt, rounds, password_env, json } => {
                assert_eq!(salt.as_deref(), Some("abcdefghijkl"));
                assert_eq!(rounds, Some(6000));
                assert_eq!(password_env, DEFAULT_PASSWORD_ENV);
                assert!(!json);
            }
            _ => panic!("expected hash-password"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["infinity-provider", "generate-salt", "--quiet", "--json-logs"]);
        assert!(cli.quiet);
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::GenerateSalt));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
