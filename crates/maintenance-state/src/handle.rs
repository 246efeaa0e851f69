//! SurrealDB connection setup
//!
//! A [`StoreTarget`] says where the store lives; [`connect`] opens it,
//! authenticates when needed, selects the namespace/database and applies the
//! schema. Resolution order from the environment: a credentialed server
//! (`SURREALDB_ENDPOINT`), then any URL (`SURREALDB_URL`), then local file
//! persistence.

use std::path::PathBuf;

use surrealdb::engine::any::Any;
use surrealdb::opt::auth::{Database, Root};
use surrealdb::Surreal;
use tracing::{info, instrument};

use crate::error::StateError;
use crate::migrations;
use crate::Result;

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "maintenance";
/// Database used when none is configured
pub const DEFAULT_DATABASE: &str = "main";
/// On-disk location used when no server is configured
pub const DEFAULT_LOCAL_PATH: &str = ".repair-planner/db";

/// Credentials and scope for a SurrealDB server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// WebSocket endpoint, e.g. `wss://db.plant.example:8000`
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub namespace: String,
    pub database: String,
    /// Sign in as a root user instead of a database user
    pub is_root: bool,
}

impl ServerConfig {
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: username.into(),
            password: password.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            is_root: false,
        }
    }

    pub fn with_scope(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self.database = database.into();
        self
    }

    pub fn with_root(mut self, is_root: bool) -> Self {
        self.is_root = is_root;
        self
    }
}

/// Where the maintenance store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// `mem://`, lost on exit
    Memory,
    /// Any SurrealDB URL, default namespace and database, no sign-in
    Url(String),
    /// Credentialed server
    Server(ServerConfig),
    /// `surrealkv://` under a local directory
    Local(PathBuf),
}

impl StoreTarget {
    /// Resolve from process environment variables
    ///
    /// Reads:
    /// - SURREALDB_ENDPOINT, SURREALDB_USERNAME, SURREALDB_PASSWORD (all three
    ///   select a server)
    /// - SURREALDB_NAMESPACE (optional, default: "maintenance")
    /// - SURREALDB_DATABASE (optional, default: "main")
    /// - SURREALDB_ROOT (optional, "true" for root users)
    /// - SURREALDB_URL (used when no server is configured)
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let (Some(endpoint), Some(username), Some(password)) = (
            get("SURREALDB_ENDPOINT"),
            get("SURREALDB_USERNAME"),
            get("SURREALDB_PASSWORD"),
        ) {
            let config = ServerConfig::new(endpoint, username, password)
                .with_scope(
                    get("SURREALDB_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
                    get("SURREALDB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
                )
                .with_root(get("SURREALDB_ROOT").is_some_and(|v| v.eq_ignore_ascii_case("true")));
            return StoreTarget::Server(config);
        }

        match get("SURREALDB_URL") {
            Some(url) => StoreTarget::Url(url),
            None => StoreTarget::Local(PathBuf::from(DEFAULT_LOCAL_PATH)),
        }
    }
}

/// Open `target` and apply the schema.
#[instrument(skip_all)]
pub(crate) async fn connect(target: &StoreTarget) -> Result<Surreal<Any>> {
    match target {
        StoreTarget::Memory => connect_url("mem://").await,
        StoreTarget::Url(url) => connect_url(url).await,
        StoreTarget::Server(config) => connect_server(config).await,
        StoreTarget::Local(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                StateError::Connection(format!(
                    "Failed to create database directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            connect_url(&format!("surrealkv://{}", dir.display())).await
        }
    }
}

async fn connect_url(url: &str) -> Result<Surreal<Any>> {
    info!("Connecting to SurrealDB at {}", url);
    let db = surrealdb::engine::any::connect(url)
        .await
        .map_err(|e| StateError::Connection(format!("Failed to connect to {}: {}", url, e)))?;

    db.use_ns(DEFAULT_NAMESPACE)
        .use_db(DEFAULT_DATABASE)
        .await
        .map_err(|e| StateError::Connection(e.to_string()))?;

    migrations::init_schema(&db).await?;
    Ok(db)
}

async fn connect_server(config: &ServerConfig) -> Result<Surreal<Any>> {
    info!(
        endpoint = %config.endpoint,
        namespace = %config.namespace,
        root = config.is_root,
        "Connecting to SurrealDB server"
    );
    let db = surrealdb::engine::any::connect(&config.endpoint)
        .await
        .map_err(|e| {
            StateError::Connection(format!("Failed to connect to {}: {}", config.endpoint, e))
        })?;

    let signin = if config.is_root {
        db.signin(Root {
            username: &config.username,
            password: &config.password,
        })
        .await
    } else {
        db.signin(Database {
            namespace: &config.namespace,
            database: &config.database,
            username: &config.username,
            password: &config.password,
        })
        .await
    };
    signin.map_err(|e| StateError::Connection(format!("Authentication failed: {}", e)))?;

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await
        .map_err(|e| {
            StateError::Connection(format!("Failed to select namespace/database: {}", e))
        })?;

    migrations::init_schema(&db).await?;
    Ok(db)
}
