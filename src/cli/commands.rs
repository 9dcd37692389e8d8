//! CLI command handlers for batch artifact operations

use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::error::CliError;
use crate::models::IngestionDocument;
use crate::publish::{GitHubHost, PublishGateway};
use crate::render::{RenderedArtifact, render};
use crate::validation::validate_config;

/// Arguments for the `generate` command
pub struct GenerateArgs {
    /// Path to the configuration document
    pub config_path: PathBuf,
    /// Where to write the rendered DAG source
    pub output_path: PathBuf,
    /// Orchestrator watch folder the DAG is copied into
    pub deploy_folder: PathBuf,
}

/// Arguments for the `validate` command
pub struct ValidateArgs {
    /// Path to the configuration document
    pub config_path: PathBuf,
}

/// Arguments for the `publish` command
pub struct PublishArgs {
    /// Path to the configuration document
    pub config_path: PathBuf,
    /// Repository in `owner/name` form
    pub repo: String,
    /// Branch name; defaults to the DAG id
    pub branch: Option<String>,
    /// Environment variable holding the access token
    pub token_env: String,
    /// Override the API base URL (GitHub Enterprise)
    pub api_base: Option<String>,
}

/// Handle the `generate` command: render the document and deploy the DAG.
pub fn handle_generate(args: &GenerateArgs) -> Result<(), CliError> {
    let artifact = load_and_render(&args.config_path)?;

    std::fs::write(&args.output_path, &artifact.dag_source).map_err(|source| CliError::Write {
        path: args.output_path.clone(),
        source,
    })?;

    let file_name = args.output_path.file_name().ok_or_else(|| {
        CliError::InvalidArgument(format!(
            "output path has no file name: {}",
            args.output_path.display()
        ))
    })?;
    let deploy_path = args.deploy_folder.join(file_name);
    std::fs::copy(&args.output_path, &deploy_path).map_err(|source| CliError::Write {
        path: deploy_path.clone(),
        source,
    })?;

    info!(dag_id = %artifact.dag_id, deploy = %deploy_path.display(), "DAG generated and deployed");
    eprintln!("DAG generated and copied: {}", artifact.dag_id);
    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate(args: &ValidateArgs) -> Result<(), CliError> {
    let document = load_document(&args.config_path)?;
    validate_config(&document.ingestion).map_err(|e| CliError::InvalidDocument(e.to_string()))?;
    eprintln!("Valid: {}", document.ingestion.summary());
    Ok(())
}

/// Handle the `publish` command: render and open a pull request.
pub async fn handle_publish(args: &PublishArgs) -> Result<(), CliError> {
    let artifact = load_and_render(&args.config_path)?;

    let token = std::env::var(&args.token_env).map_err(|_| {
        CliError::InvalidArgument(format!("environment variable {} is not set", args.token_env))
    })?;

    let host = match &args.api_base {
        Some(base) => GitHubHost::with_base_url(base, token),
        None => GitHubHost::new(token),
    };
    let gateway = PublishGateway::new(host, args.repo.clone());

    let branch = args.branch.clone().unwrap_or_else(|| artifact.dag_id.clone());
    let outcome = gateway
        .publish(&artifact.dag_id, &artifact.config_document, &branch)
        .await
        .map_err(|e| CliError::Publish(e.to_string()))?;

    if outcome.created {
        eprintln!("Pull request opened: {}", outcome.location.url);
    } else {
        eprintln!("Pull request already open: {}", outcome.location.url);
    }
    Ok(())
}

fn load_document(path: &Path) -> Result<IngestionDocument, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    IngestionDocument::from_yaml(&raw).map_err(|e| CliError::InvalidDocument(e.to_string()))
}

fn load_and_render(path: &Path) -> Result<RenderedArtifact, CliError> {
    let document = load_document(path)?;
    validate_config(&document.ingestion).map_err(|e| CliError::InvalidDocument(e.to_string()))?;
    Ok(render(&document.ingestion)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        IngestionConfig, LoadStrategy, RefreshSchedule, SourceRef, TargetRef,
    };
    use chrono::Utc;
    use tempfile::TempDir;

    fn write_document(dir: &TempDir) -> PathBuf {
        let config = IngestionConfig {
            source: SourceRef {
                name: "mysql_source".to_string(),
                schema: "ai_tdv_finacle".to_string(),
                table: "transactions".to_string(),
            },
            target: TargetRef {
                schema: "analytics11".to_string(),
                table: "transactions".to_string(),
            },
            domain: "transactions".to_string(),
            description: String::new(),
            refresh_schedule: RefreshSchedule::Daily,
            load_strategy: LoadStrategy::Incremental,
            created_at: Utc::now(),
        };
        let path = dir.path().join("ingestion.yaml");
        let yaml = IngestionDocument::new(config).to_yaml().unwrap();
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_generate_writes_and_deploys() {
        let dir = TempDir::new().unwrap();
        let config_path = write_document(&dir);
        let output_path = dir.path().join("out").join("dag.py");
        std::fs::create_dir(dir.path().join("out")).unwrap();
        let deploy_folder = dir.path().join("dags");
        std::fs::create_dir(&deploy_folder).unwrap();

        handle_generate(&GenerateArgs {
            config_path,
            output_path: output_path.clone(),
            deploy_folder: deploy_folder.clone(),
        })
        .unwrap();

        let written = std::fs::read_to_string(&output_path).unwrap();
        let deployed = std::fs::read_to_string(deploy_folder.join("dag.py")).unwrap();
        assert_eq!(written, deployed);
        assert!(written.contains("ingest__mysql_source__transactions"));
        assert!(!written.contains("{{"));
    }

    #[test]
    fn test_generate_fails_on_missing_config() {
        let dir = TempDir::new().unwrap();
        let err = handle_generate(&GenerateArgs {
            config_path: dir.path().join("absent.yaml"),
            output_path: dir.path().join("dag.py"),
            deploy_folder: dir.path().to_path_buf(),
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_validate_accepts_good_document() {
        let dir = TempDir::new().unwrap();
        let config_path = write_document(&dir);
        handle_validate(&ValidateArgs { config_path }).unwrap();
    }

    #[test]
    fn test_validate_rejects_malformed_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "ingestion: [not, a, config]").unwrap();
        let err = handle_validate(&ValidateArgs { config_path: path }).unwrap_err();
        assert!(matches!(err, CliError::InvalidDocument(_)));
    }

    #[test]
    fn test_validate_rejects_blank_required_field() {
        let dir = TempDir::new().unwrap();
        let config_path = write_document(&dir);
        let raw = std::fs::read_to_string(&config_path).unwrap();
        let patched = raw.replace("name: mysql_source", "name: ''");
        std::fs::write(&config_path, patched).unwrap();
        let err = handle_validate(&ValidateArgs { config_path }).unwrap_err();
        assert!(matches!(err, CliError::InvalidDocument(_)));
    }
}
