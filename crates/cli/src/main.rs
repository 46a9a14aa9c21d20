//! Tandaro CLI - Database migrations and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (schema and session table)
//! tandaro-cli migrate
//!
//! # Grant or revoke the administrator flag
//! tandaro-cli admin grant --phone 050-123-4567
//! tandaro-cli admin grant --phone 050-123-4567 --revoke
//!
//! # Find, or delete, stored images without a gallery record
//! tandaro-cli gallery orphans
//! tandaro-cli gallery orphans --purge
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tandaro-cli")]
#[command(author, version, about = "Tandaro CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage administrators
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Gallery storage maintenance
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Set the administrator flag on a registered user
    Grant {
        /// User's phone number
        #[arg(short, long)]
        phone: String,

        /// Clear the flag instead
        #[arg(long)]
        revoke: bool,
    },
}

#[derive(Subcommand)]
enum GalleryAction {
    /// List stored images no gallery record references, older than an hour
    Orphans {
        /// Delete them
        #[arg(long)]
        purge: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { phone, revoke } => {
                commands::admin::grant(&phone, revoke).await?;
            }
        },
        Commands::Gallery { action } => match action {
            GalleryAction::Orphans { purge } => commands::gallery::orphans(purge).await?,
        },
    }
    Ok(())
}
