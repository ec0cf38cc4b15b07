//! Runtime configuration (spec.md §6): connection string, traversal memory
//! limit, bind address. Loaded from a plain JSON document via `serde_json`,
//! matching the teacher's choice of `serde_json` over a dedicated config
//! crate. No HTTP server lives in this crate, so `bind_address` is carried
//! only for a caller building one on top.

use {
    crate::EvalError,
    serde::{Deserialize, Serialize},
};

/// Configuration for a running evaluator instance.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Config {
    /// Connection string for the graph-database backend (opaque to this crate).
    pub graph_connection_string: String,

    /// Upper bound, in nodes, on a single bounded-BFS traversal before it is
    /// aborted with [`crate::EvalError::GraphError`]. Guards against runaway
    /// expansion through densely-connected blob nodes.
    #[serde(default = "Config::default_traversal_memory_limit")]
    pub traversal_memory_limit: usize,

    /// Bind address for an HTTP layer built on top of this crate. Unused by
    /// the core itself.
    #[serde(default)]
    pub bind_address: Option<String>,
}

impl Config {
    fn default_traversal_memory_limit() -> usize {
        100_000
    }

    /// Parse configuration from a JSON document.
    pub fn from_json(data: &str) -> Result<Self, EvalError> {
        serde_json::from_str(data).map_err(|e| EvalError::BadInput(format!("invalid config: {e}")))
    }
}
