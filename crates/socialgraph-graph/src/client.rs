//! Neo4j connection management and shared graph client.

use neo4rs::{ConfigBuilder, Graph, Query};

use socialgraph_core::config::Neo4jSettings;
use socialgraph_core::NodeKind;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[source] neo4rs::Error),

    #[error("Node not found: {kind} with id {id}")]
    NotFound { kind: NodeKind, id: i64 },

    #[error("Node already exists: {kind} with id {id}")]
    Conflict { kind: NodeKind, id: i64 },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<neo4rs::Error> for GraphError {
    /// Transport failures become `Connection`; everything else is a query error.
    fn from(err: neo4rs::Error) -> Self {
        match err {
            neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError => {
                Self::Connection(err.to_string())
            }
            other => Self::Query(other),
        }
    }
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Neo4jSettings::default().into()
    }
}

impl From<Neo4jSettings> for GraphConfig {
    fn from(settings: Neo4jSettings) -> Self {
        Self {
            uri: settings.uri,
            user: settings.user,
            password: settings.password,
            max_connections: settings.max_connections,
            fetch_size: settings.fetch_size,
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        // The pool opens connections lazily, on the first query.
        tracing::info!(uri = %config.uri, "Configured Neo4j connection pool");
        Ok(Self { graph })
    }

    /// Round-trip a trivial query to check the server is reachable.
    pub async fn ping(&self) -> Result<(), GraphError> {
        self.query_one(neo4rs::query("RETURN 1 AS ok")).await?;
        tracing::debug!("Neo4j reachable");
        Ok(())
    }

    /// Execute a write-only query (CREATE, MERGE, DELETE, SET).
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Execute a read query and collect all rows.
    pub async fn query_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a read query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        Ok(stream.next().await?)
    }
}
