//! socialgraph-graph: the graph backend boundary.
//!
//! All graph reads and writes flow through the `GraphBackend` trait. The
//! Neo4j `GraphClient` is the production implementation; `InMemoryGraph`
//! provides the same semantics without a database.

pub mod backend;
pub mod client;
pub mod memory;
pub mod mutations;
pub mod queries;
pub mod schema;

pub use backend::GraphBackend;
pub use client::{GraphClient, GraphConfig, GraphError};
pub use memory::InMemoryGraph;
