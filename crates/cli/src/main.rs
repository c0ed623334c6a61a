//! Fleetdesk CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! fleetdesk migrate
//!
//! # Seed fuel types
//! fleetdesk seed fuel-types
//!
//! # Insert the placeholder car
//! fleetdesk seed mock-car
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed fuel-types` - Insert fuel types if missing
//! - `seed mock-car` - Insert the placeholder car if missing

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fleetdesk")]
#[command(author, version, about = "Fleetdesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert fuel types that do not exist yet
    FuelTypes {
        /// Fuel type name (repeatable; defaults to Petrol, Diesel, Electric, Hybrid)
        #[arg(short, long = "name")]
        names: Vec<String>,
    },
    /// Insert the placeholder car unless it already exists
    MockCar,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::FuelTypes { names } => commands::seed::fuel_types(&names).await?,
            SeedTarget::MockCar => commands::seed::mock_car().await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_seed_fuel_types() {
        let cli = Cli::try_parse_from(["fleetdesk", "seed", "fuel-types", "-n", "LPG", "--name", "CNG"])
            .map_err(|e| e.to_string());
        let Ok(Cli {
            command: Commands::Seed {
                target: SeedTarget::FuelTypes { names },
            },
        }) = cli
        else {
            panic!("unexpected parse result");
        };
        assert_eq!(names, vec!["LPG", "CNG"]);
    }

    #[test]
    fn test_parse_mock_car() {
        assert!(matches!(
            Cli::try_parse_from(["fleetdesk", "seed", "mock-car"]).map(|c| c.command),
            Ok(Commands::Seed {
                target: SeedTarget::MockCar
            })
        ));
    }
}
