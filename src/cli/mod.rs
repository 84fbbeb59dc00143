pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "bucketlist")]
#[command(about = "Bucketlist CLI - database and account management for the Bucketlist API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create every table that does not exist yet")]
    InitDb,

    #[command(about = "Drop every table and its data")]
    DropDb {
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Register a user with the same validation as the API")]
    CreateUser {
        username: String,
        email: String,
        password: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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
    let config = crate::config::config();

    match cli.command {
        Commands::InitDb => commands::db::init(config, output_format).await,
        Commands::DropDb { yes } => commands::db::drop(config, yes, output_format).await,
        Commands::CreateUser {
            username,
            email,
            password,
        } => commands::user::create(config, username, email, password, output_format).await,
    }
}
