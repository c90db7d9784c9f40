use async_trait::async_trait;
use chrono::Utc;
use neo4rs::{query, Graph, Node, Query};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use super::{validate_identifier, GraphStore, Properties};
use crate::config::Neo4jConfig;
use crate::error::{StoreError, StoreResult};

/// Neo4j property-graph backend over the Bolt protocol
#[derive(Clone)]
pub struct Neo4jGraphStore {
    graph: Graph,
}

impl Neo4jGraphStore {
    /// Connect to a Neo4j instance
    pub async fn connect(config: &Neo4jConfig) -> StoreResult<Self> {
        let graph = Graph::new(&config.uri, &config.user, &config.password)
            .await
            .map_err(|e| StoreError::Connection {
                message: format!("Failed to connect to Neo4j at {}: {}", config.uri, e),
            })?;

        info!(uri = %config.uri, "Connected to Neo4j");

        Ok(Self { graph })
    }

    /// Verify the connection with a trivial query
    pub async fn ping(&self) -> StoreResult<()> {
        let mut stream = self.graph.execute(query("RETURN 1 AS ok")).await?;
        stream.next().await?;
        Ok(())
    }
}

/// Bind a JSON property value as a typed query parameter. Nested values are
/// stored as JSON strings; this system only writes flat primitive maps.
fn bind_value(q: Query, name: &str, value: &Value) -> Query {
    match value {
        Value::String(s) => q.param(name, s.as_str()),
        Value::Bool(b) => q.param(name, *b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.param(name, i)
            } else {
                q.param(name, n.as_f64().unwrap_or(0.0))
            }
        }
        other => q.param(name, other.to_string()),
    }
}

/// Build `x.key = $pN` assignment fragments for a property map. Returns the
/// fragments and the `(param, value)` pairs to bind once the query exists.
fn property_assignments<'a>(
    target: &str,
    properties: &'a Properties,
) -> StoreResult<(Vec<String>, Vec<(String, &'a Value)>)> {
    let mut assignments = Vec::with_capacity(properties.len());
    let mut params = Vec::with_capacity(properties.len());
    for (index, (key, value)) in properties.iter().enumerate() {
        validate_identifier(key)?;
        let param = format!("p{}", index);
        assignments.push(format!("{}.{} = ${}", target, key, param));
        params.push((param, value));
    }
    Ok((assignments, params))
}

#[async_trait]
impl GraphStore for Neo4jGraphStore {
    async fn create_node(&self, label: &str, properties: Properties) -> StoreResult<String> {
        validate_identifier(label)?;

        let store_id = Uuid::new_v4().to_string();

        // Store-assigned values win over caller-supplied ones
        let mut props = properties;
        props.insert("id".to_string(), Value::String(store_id.clone()));
        props.insert(
            "created_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        let (assignments, params) = property_assignments("n", &props)?;
        let cypher = format!("CREATE (n:{}) SET {}", label, assignments.join(", "));
        let mut q = query(&cypher);
        for (param, value) in params {
            q = bind_value(q, &param, value);
        }

        self.graph.run(q).await?;

        debug!(store_id = %store_id, label = %label, "Created graph node");

        Ok(store_id)
    }

    async fn get_node(&self, store_id: &str) -> StoreResult<Option<Properties>> {
        let q = query("MATCH (n {id: $id}) RETURN n").param("id", store_id);

        let mut stream = self.graph.execute(q).await?;
        let row = match stream.next().await? {
            Some(row) => row,
            None => return Ok(None),
        };

        let node: Node = row.get("n").map_err(|e| StoreError::Query {
            message: format!("Failed to read node {}: {}", store_id, e),
        })?;

        let mut props = Properties::new();
        for key in node.keys() {
            let value = if let Ok(s) = node.get::<String>(key) {
                Value::String(s)
            } else if let Ok(b) = node.get::<bool>(key) {
                Value::Bool(b)
            } else if let Ok(i) = node.get::<i64>(key) {
                Value::from(i)
            } else if let Ok(f) = node.get::<f64>(key) {
                Value::from(f)
            } else {
                continue;
            };
            props.insert(key.to_string(), value);
        }

        Ok(Some(props))
    }

    async fn create_relationship(
        &self,
        from_id: &str,
        to_id: &str,
        rel_type: &str,
        properties: Properties,
    ) -> StoreResult<bool> {
        validate_identifier(rel_type)?;

        let (assignments, params) = property_assignments("r", &properties)?;

        let set_clause = if assignments.is_empty() {
            String::new()
        } else {
            format!("SET {} ", assignments.join(", "))
        };

        let cypher = format!(
            "MATCH (a {{id: $from_id}}), (b {{id: $to_id}}) \
             MERGE (a)-[r:{}]->(b) {}RETURN count(r) AS c",
            rel_type, set_clause
        );
        let mut q = query(&cypher).param("from_id", from_id).param("to_id", to_id);
        for (param, value) in params {
            q = bind_value(q, &param, value);
        }

        let mut stream = self.graph.execute(q).await?;
        let created = match stream.next().await? {
            Some(row) => {
                let count: i64 = row.get("c").map_err(|e| StoreError::Query {
                    message: format!("Failed to read relationship count: {}", e),
                })?;
                count > 0
            }
            None => false,
        };

        debug!(
            from_id = %from_id,
            to_id = %to_id,
            rel_type = %rel_type,
            created,
            "Merged relationship"
        );

        Ok(created)
    }
}
