//! userstack - Users resource HTTP API
//!
//! Serves create/read/update/delete of user records over HTTP, backed by an
//! in-memory store or a DynamoDB table. With `--invoke` it instead processes a
//! single API Gateway HTTP API event, the way the function runs behind a
//! gateway.

mod config;

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use userstack_api::{http::create_app, CreateMode, ErrorMapping, HttpApiEvent, UsersRouter};
use userstack_store::{DynamoDbStore, EphemeralStore, RecordStore};

use crate::config::{Config, StoreConfig};

#[derive(Parser, Debug)]
#[command(name = "userstack")]
#[command(about = "Users resource HTTP API", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "USERSTACK_PORT")]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "USERSTACK_HOST")]
    host: Option<String>,

    /// Configuration file (defaults to ./userstack.toml when present)
    #[arg(short, long, env = "USERSTACK_CONFIG")]
    config: Option<PathBuf>,

    /// DynamoDB table holding user records; selects the DynamoDB store
    #[arg(long, env = "TABLE_NAME")]
    table_name: Option<String>,

    /// DynamoDB endpoint override (e.g. DynamoDB Local)
    #[arg(long, env = "USERSTACK_DYNAMODB_ENDPOINT")]
    dynamodb_endpoint: Option<String>,

    /// Where created users get name/email: from-body or placeholder
    #[arg(long, env = "USERSTACK_CREATE_MODE")]
    create_mode: Option<CreateMode>,

    /// Handler failure mapping: typed or catch-all
    #[arg(long, env = "USERSTACK_ERROR_MAPPING")]
    error_mapping: Option<ErrorMapping>,

    /// Path prefix stripped before routing (API Gateway stage)
    #[arg(long, env = "USERSTACK_BASE_PATH")]
    base_path: Option<String>,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,

    /// Process one API Gateway event from FILE (or - for stdin), print the response and exit
    #[arg(long, value_name = "FILE")]
    invoke: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "USERSTACK_LOG_LEVEL")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing; stdout is reserved for the response in invoke mode
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("userstack={},tower_http=debug", args.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load(args.config.as_deref())?;
    apply_args(&mut config, &args);

    let store = build_store(&config.store).await;
    let router = UsersRouter::new(store, config.api.settings());

    if let Some(path) = &args.invoke {
        return invoke(&router, path).await;
    }

    info!("Starting userstack...");
    info!("  Store: {}", store_label(&config.store));
    info!("  Create mode: {}", config.api.create_mode);
    info!("  Error mapping: {}", config.api.error_mapping);

    let app = create_app(router, config.api.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Command-line flags and their environment variables win over the config file
fn apply_args(config: &mut Config, args: &Args) {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(table_name) = &args.table_name {
        let (endpoint_url, region) = match &config.store {
            StoreConfig::DynamoDb {
                endpoint_url,
                region,
                ..
            } => (endpoint_url.clone(), region.clone()),
            StoreConfig::Ephemeral => (None, None),
        };
        config.store = StoreConfig::DynamoDb {
            table_name: table_name.clone(),
            endpoint_url,
            region,
        };
    }
    if let (Some(endpoint), StoreConfig::DynamoDb { endpoint_url, .. }) =
        (&args.dynamodb_endpoint, &mut config.store)
    {
        *endpoint_url = Some(endpoint.clone());
    }
    if let Some(mode) = args.create_mode {
        config.api.create_mode = mode;
    }
    if let Some(mapping) = args.error_mapping {
        config.api.error_mapping = mapping;
    }
    if let Some(base_path) = &args.base_path {
        config.api.base_path = Some(base_path.clone());
    }
    if args.no_cors {
        config.api.cors = false;
    }
}

async fn build_store(config: &StoreConfig) -> Arc<dyn RecordStore> {
    match config.dynamodb() {
        Some(dynamodb) => Arc::new(DynamoDbStore::connect(dynamodb).await),
        None => Arc::new(EphemeralStore::new()),
    }
}

fn store_label(config: &StoreConfig) -> String {
    match config {
        StoreConfig::Ephemeral => "ephemeral (in-memory)".to_string(),
        StoreConfig::DynamoDb { table_name, .. } => format!("dynamodb (table: {table_name})"),
    }
}

async fn invoke(router: &UsersRouter, path: &std::path::Path) -> anyhow::Result<()> {
    let raw = if path.as_os_str() == "-" {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("reading event from stdin")?;
        raw
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading event from {}", path.display()))?
    };

    let event: HttpApiEvent = serde_json::from_str(&raw).context("parsing API Gateway event")?;
    let response = userstack_api::handle_event(router, event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};

    /// Parse flags only, with every env fallback detached from the arguments
    fn parse(argv: &[&str]) -> Args {
        let matches = Args::command()
            .mut_args(|arg| arg.env(None::<&'static str>))
            .try_get_matches_from(std::iter::once("userstack").chain(argv.iter().copied()))
            .unwrap();
        Args::from_arg_matches(&matches).unwrap()
    }

    fn configured(argv: &[&str]) -> Config {
        let args = parse(argv);
        let mut config = Config::default();
        apply_args(&mut config, &args);
        config
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let config = configured(&[]);
        assert_eq!(config.store, StoreConfig::Ephemeral);
        assert!(config.api.cors);
    }

    #[test]
    fn test_table_name_selects_dynamodb() {
        let config = configured(&[
            "--table-name",
            "users-table",
            "--dynamodb-endpoint",
            "http://localhost:8000",
        ]);
        assert_eq!(
            config.store,
            StoreConfig::DynamoDb {
                table_name: "users-table".to_string(),
                endpoint_url: Some("http://localhost:8000".to_string()),
                region: None,
            }
        );
        assert_eq!(store_label(&config.store), "dynamodb (table: users-table)");
    }

    #[test]
    fn test_api_flags() {
        let config = configured(&[
            "--port",
            "9001",
            "--create-mode",
            "placeholder",
            "--error-mapping",
            "catch-all",
            "--base-path",
            "/prod",
            "--no-cors",
        ]);
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.api.create_mode, CreateMode::Placeholder);
        assert_eq!(config.api.error_mapping, ErrorMapping::CatchAll);
        assert_eq!(config.api.base_path.as_deref(), Some("/prod"));
        assert!(!config.api.cors);
    }

    #[test]
    fn test_bad_mode_is_rejected() {
        let result = Args::try_parse_from(["userstack", "--error-mapping", "strict"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_env_fallbacks_are_ignored_by_flag_parsing() {
        let args = parse(&["--port", "9001"]);
        assert_eq!(args.port, Some(9001));
        assert!(args.table_name.is_none());
        assert!(args.host.is_none());
        assert!(args.config.is_none());
    }

    #[tokio::test]
    async fn test_invoke_reads_event_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(
            &path,
            r#"{"requestContext":{"http":{"method":"GET","path":"/users"}}}"#,
        )
        .unwrap();

        let router = UsersRouter::new(Arc::new(EphemeralStore::new()), Default::default());
        invoke(&router, &path).await.unwrap();

        let missing = dir.path().join("absent.json");
        assert!(invoke(&router, &missing).await.is_err());
    }
}
