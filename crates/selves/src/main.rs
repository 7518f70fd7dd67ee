// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Selves - talk with your past and future selves.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod setup;
mod shell;
mod status;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// Selves - talk with your past and future selves.
#[derive(Parser, Debug)]
#[command(name = "selves", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Describe your past and future selves.
    Setup,
    /// Chat with both selves in an interactive shell.
    Chat,
    /// Run the chat proxy that forwards exchanges to the model vendor.
    Proxy,
    /// Check storage and the chat proxy.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match selves_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            selves_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Setup) => setup::run_setup(&config).await,
        Some(Commands::Chat) => shell::run_chat(&config).await,
        Some(Commands::Proxy) => serve::run_proxy(&config).await,
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        None => {
            println!("selves: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Installs the global tracing subscriber; logs go to stderr.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("selves={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = selves_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.app.name, "selves");
    }

    #[test]
    fn cli_parses_status_flags() {
        let cli = Cli::try_parse_from(["selves", "status", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Status {
                json: true,
                plain: false
            })
        ));
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["selves", "reflect"]).is_err());
    }
}
