//! data-onboarding-cli - batch interface for ingestion artifacts

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use data_onboarding_sdk::cli::commands::{
    GenerateArgs, PublishArgs, ValidateArgs, handle_generate, handle_publish, handle_validate,
};

#[derive(Parser)]
#[command(
    name = "data-onboarding-cli",
    version,
    about = "Render, validate and publish ingestion pipeline configurations"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a configuration document into a DAG and copy it to the
    /// orchestrator watch folder
    Generate {
        /// Path to the configuration document
        config_path: PathBuf,
        /// Where to write the rendered DAG source
        output_path: PathBuf,
        /// Orchestrator watch folder
        deploy_folder: PathBuf,
    },
    /// Validate a configuration document
    Validate {
        /// Path to the configuration document
        config_path: PathBuf,
    },
    /// Render a configuration document and open a pull request for it
    Publish {
        /// Path to the configuration document
        config_path: PathBuf,
        /// Repository in owner/name form
        #[arg(long)]
        repo: String,
        /// Branch name (defaults to the DAG id)
        #[arg(long)]
        branch: Option<String>,
        /// Environment variable holding the access token
        #[arg(long, default_value = "GITHUB_TOKEN")]
        token_env: String,
        /// Override the API base URL (GitHub Enterprise)
        #[arg(long)]
        api_base: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            config_path,
            output_path,
            deploy_folder,
        } => handle_generate(&GenerateArgs {
            config_path,
            output_path,
            deploy_folder,
        })
        .context("generate failed")?,
        Command::Validate { config_path } => {
            handle_validate(&ValidateArgs { config_path }).context("validation failed")?
        }
        Command::Publish {
            config_path,
            repo,
            branch,
            token_env,
            api_base,
        } => handle_publish(&PublishArgs {
            config_path,
            repo,
            branch,
            token_env,
            api_base,
        })
        .await
        .context("publish failed")?,
    }

    Ok(())
}
