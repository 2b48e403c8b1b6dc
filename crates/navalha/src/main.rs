// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Navalha - WhatsApp booking assistant for barbershops.
//!
//! Binary entry point: loads configuration, then serves the webhook or
//! prints the resolved configuration.

use clap::{Parser, Subcommand};

mod serve;

/// Navalha - WhatsApp booking assistant for barbershops.
#[derive(Parser, Debug)]
#[command(name = "navalha", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server and conversation engine.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match navalha_config::load_and_validate() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("navalha: invalid configuration: {error}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(error) = serve::run_serve(config).await {
                eprintln!("navalha serve: {error}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(error) => {
                eprintln!("navalha config: {error}");
                std::process::exit(1);
            }
        },
        None => {
            println!("navalha: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        let config = navalha_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.agent.name, "navalha");
        assert_eq!(config.booking.open_hour, 9);
    }
}
