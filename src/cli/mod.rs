pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "bilemo")]
#[command(about = "BileMo CLI - database and operations tooling for the BileMo API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Replace database contents with the fixture data set")]
    Seed(commands::seed::SeedArgs),

    #[command(about = "Hash a password for an admin or client account")]
    HashPassword {
        #[arg(help = "Plain-text password")]
        password: String,
    },

    #[command(about = "Query the status endpoint of a running server")]
    Status {
        #[arg(long, help = "Server base URL (defaults to the configured bind address)")]
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Seed(args) => commands::seed::handle(args, output_format).await,
        Commands::HashPassword { password } => commands::hash_password::handle(&password, output_format),
        Commands::Status { url } => commands::status::handle(url, output_format).await,
    }
}
