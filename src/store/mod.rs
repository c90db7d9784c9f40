//! Graph persistence layer.
//!
//! [`GraphStore`] is the narrow property-graph capability the orchestrator
//! persists through: create a labeled node, look a node up by store id, and
//! upsert a typed relationship. Store ids are always assigned here, never by
//! callers, so the orchestrator must map its own node ids explicitly.
//!
//! Backends: [`SqliteGraphStore`] (embedded, sqlx) and [`Neo4jGraphStore`]
//! (Bolt, neo4rs).

mod neo4j;
mod sqlite;

pub use neo4j::Neo4jGraphStore;
pub use sqlite::SqliteGraphStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// Flat property map attached to a node or relationship.
pub type Properties = Map<String, Value>;

/// Property-graph store capability.
///
/// Implementations must be shareable across request tasks
/// (`Arc<dyn GraphStore>`), with one store operation per logical
/// session/transaction scope.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create a node with the given label.
    ///
    /// Assigns a fresh store id and stamps `created_at`; caller-supplied
    /// `id`/`created_at` properties are overwritten. Returns the store id.
    async fn create_node(&self, label: &str, properties: Properties) -> StoreResult<String>;

    /// Look up a node's properties by store id. `None` when absent.
    async fn get_node(&self, store_id: &str) -> StoreResult<Option<Properties>>;

    /// Upsert a directed relationship between two existing nodes.
    ///
    /// Creates the relationship if absent; a repeat call with the same
    /// `(from, to, rel_type)` overwrites its properties instead of
    /// duplicating. Returns `false` when either endpoint does not exist.
    async fn create_relationship(
        &self,
        from_id: &str,
        to_id: &str,
        rel_type: &str,
        properties: Properties,
    ) -> StoreResult<bool>;
}

/// Validate a label or relationship type before it is interpolated into a
/// query. Property-graph query languages take these as syntax, not values,
/// so only `[A-Za-z0-9_]` identifiers are accepted.
pub(crate) fn validate_identifier(name: &str) -> StoreResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}
