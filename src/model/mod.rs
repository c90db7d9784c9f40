//! Thought graph value types.
//!
//! A reasoning chain is a small directed graph: `ThoughtNode` steps connected
//! by labeled `ReasoningEdge`s, grouped under one `ReasoningChain` per
//! session. All types validate at construction and carry no mutation methods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ValidationError, ValidationResult};

/// Kind of reasoning step in a thought chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThoughtType {
    /// Understanding/rephrasing the problem.
    Question,
    /// Identifying needed information or facts.
    Retrieval,
    /// Applying logic, making connections.
    Reasoning,
    /// Final answer or result.
    Conclusion,
}

impl std::fmt::Display for ThoughtType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThoughtType::Question => write!(f, "question"),
            ThoughtType::Retrieval => write!(f, "retrieval"),
            ThoughtType::Reasoning => write!(f, "reasoning"),
            ThoughtType::Conclusion => write!(f, "conclusion"),
        }
    }
}

impl std::str::FromStr for ThoughtType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "question" => Ok(ThoughtType::Question),
            "retrieval" => Ok(ThoughtType::Retrieval),
            "reasoning" => Ok(ThoughtType::Reasoning),
            "conclusion" => Ok(ThoughtType::Conclusion),
            other => Err(ValidationError::UnknownThoughtType {
                value: other.to_string(),
            }),
        }
    }
}

/// Lifecycle status of a reasoning chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainStatus {
    /// Chain is being generated or persisted.
    #[default]
    Active,
    /// Chain is fully populated and persisted.
    Completed,
    /// Reserved; no current code path produces it.
    Failed,
}

impl std::fmt::Display for ChainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainStatus::Active => write!(f, "active"),
            ChainStatus::Completed => write!(f, "completed"),
            ChainStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for ChainStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ChainStatus::Active),
            "completed" => Ok(ChainStatus::Completed),
            "failed" => Ok(ChainStatus::Failed),
            other => Err(ValidationError::UnknownChainStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// A single step in an externalized reasoning process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtNode {
    /// Session-scoped identifier, `{session_id}_node_{local_id}`.
    pub id: String,
    /// Kind of reasoning step.
    #[serde(rename = "type")]
    pub thought_type: ThoughtType,
    /// The thought content.
    pub content: String,
    /// Confidence in this step (0.0-1.0).
    pub confidence: f64,
    /// Session this node belongs to.
    pub session_id: String,
    /// Additional metadata; LLM-derived nodes carry `original_id`.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Set by the persistence layer, not the generator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ThoughtNode {
    /// Create a validated thought node.
    pub fn new(
        id: impl Into<String>,
        thought_type: ThoughtType,
        content: impl Into<String>,
        confidence: f64,
        session_id: impl Into<String>,
    ) -> ValidationResult<Self> {
        let id = id.into();
        let content = content.into();
        let session_id = session_id.into();

        if id.is_empty() {
            return Err(ValidationError::EmptyField { field: "id" });
        }
        if content.is_empty() {
            return Err(ValidationError::EmptyField { field: "content" });
        }
        if session_id.is_empty() {
            return Err(ValidationError::EmptyField { field: "session_id" });
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ValidationError::ConfidenceOutOfRange { value: confidence });
        }

        Ok(Self {
            id,
            thought_type,
            content,
            confidence,
            session_id,
            metadata: Map::new(),
            created_at: None,
        })
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A directed, labeled connection between two thought nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningEdge {
    /// Source thought node id.
    pub source_id: String,
    /// Target thought node id.
    pub target_id: String,
    /// Free-text description of the relationship.
    pub label: String,
    /// Strength of the connection (0.0-1.0).
    #[serde(default = "default_edge_confidence")]
    pub confidence: f64,
}

fn default_edge_confidence() -> f64 {
    1.0
}

impl ReasoningEdge {
    /// Create a validated edge.
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        label: impl Into<String>,
        confidence: f64,
    ) -> ValidationResult<Self> {
        let source_id = source_id.into();
        let target_id = target_id.into();
        let label = label.into();

        if source_id.is_empty() {
            return Err(ValidationError::EmptyField { field: "source_id" });
        }
        if target_id.is_empty() {
            return Err(ValidationError::EmptyField { field: "target_id" });
        }
        if label.is_empty() {
            return Err(ValidationError::EmptyField { field: "label" });
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ValidationError::ConfidenceOutOfRange { value: confidence });
        }

        Ok(Self {
            source_id,
            target_id,
            label,
            confidence,
        })
    }
}

/// Complete reasoning graph produced for one prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningChain {
    /// Unique per-request session identifier.
    pub session_id: String,
    /// Original user prompt (1-2000 characters).
    pub prompt: String,
    /// Thought nodes in generation order.
    pub nodes: Vec<ThoughtNode>,
    /// Edges in generation order.
    pub edges: Vec<ReasoningEdge>,
    /// Chain lifecycle status.
    pub status: ChainStatus,
    /// When the chain was assembled.
    pub created_at: DateTime<Utc>,
}

impl ReasoningChain {
    /// Maximum accepted prompt length in characters.
    pub const MAX_PROMPT_CHARS: usize = 2000;

    /// Create a validated chain.
    pub fn new(
        session_id: impl Into<String>,
        prompt: impl Into<String>,
        nodes: Vec<ThoughtNode>,
        edges: Vec<ReasoningEdge>,
        status: ChainStatus,
    ) -> ValidationResult<Self> {
        let session_id = session_id.into();
        let prompt = prompt.into();

        if session_id.is_empty() {
            return Err(ValidationError::EmptyField { field: "session_id" });
        }
        validate_prompt(&prompt)?;

        Ok(Self {
            session_id,
            prompt,
            nodes,
            edges,
            status,
            created_at: Utc::now(),
        })
    }
}

/// Check prompt length bounds (1-2000 characters).
pub fn validate_prompt(prompt: &str) -> ValidationResult<()> {
    let length = prompt.chars().count();
    if length == 0 || length > ReasoningChain::MAX_PROMPT_CHARS {
        return Err(ValidationError::PromptLength { length });
    }
    Ok(())
}

/// Rewrite a generator-local id into the session namespace.
pub fn scoped_node_id(session_id: &str, local_id: &str) -> String {
    format!("{}_node_{}", session_id, local_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thought_type_round_trip() {
        for (t, s) in [
            (ThoughtType::Question, "question"),
            (ThoughtType::Retrieval, "retrieval"),
            (ThoughtType::Reasoning, "reasoning"),
            (ThoughtType::Conclusion, "conclusion"),
        ] {
            assert_eq!(t.to_string(), s);
            assert_eq!(s.parse::<ThoughtType>().unwrap(), t);
        }
    }

    #[test]
    fn test_thought_type_rejects_unknown() {
        let err = "speculation".parse::<ThoughtType>().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownThoughtType { .. }));
    }

    #[test]
    fn test_thought_type_serde_lowercase() {
        let json = serde_json::to_string(&ThoughtType::Retrieval).unwrap();
        assert_eq!(json, "\"retrieval\"");
        let parsed: ThoughtType = serde_json::from_str("\"conclusion\"").unwrap();
        assert_eq!(parsed, ThoughtType::Conclusion);
    }

    #[test]
    fn test_chain_status_round_trip() {
        assert_eq!("completed".parse::<ChainStatus>().unwrap(), ChainStatus::Completed);
        assert_eq!(ChainStatus::Failed.to_string(), "failed");
        assert!("done".parse::<ChainStatus>().is_err());
    }

    #[test]
    fn test_thought_node_validation() {
        let node = ThoughtNode::new(
            "sess_node_1",
            ThoughtType::Question,
            "What is being asked?",
            0.9,
            "sess",
        )
        .unwrap();
        assert_eq!(node.id, "sess_node_1");
        assert!(node.metadata.is_empty());
        assert!(node.created_at.is_none());

        assert!(matches!(
            ThoughtNode::new("", ThoughtType::Question, "c", 0.9, "s"),
            Err(ValidationError::EmptyField { field: "id" })
        ));
        assert!(matches!(
            ThoughtNode::new("i", ThoughtType::Question, "", 0.9, "s"),
            Err(ValidationError::EmptyField { field: "content" })
        ));
        assert!(matches!(
            ThoughtNode::new("i", ThoughtType::Question, "c", 0.9, ""),
            Err(ValidationError::EmptyField { field: "session_id" })
        ));
        assert!(matches!(
            ThoughtNode::new("i", ThoughtType::Question, "c", 1.5, "s"),
            Err(ValidationError::ConfidenceOutOfRange { .. })
        ));
        assert!(matches!(
            ThoughtNode::new("i", ThoughtType::Question, "c", -0.1, "s"),
            Err(ValidationError::ConfidenceOutOfRange { .. })
        ));
    }

    #[test]
    fn test_thought_node_metadata() {
        let node = ThoughtNode::new("i", ThoughtType::Reasoning, "c", 0.5, "s")
            .unwrap()
            .with_metadata("original_id", json!("3"));
        assert_eq!(node.metadata.get("original_id"), Some(&json!("3")));
    }

    #[test]
    fn test_thought_node_serializes_type_field() {
        let node = ThoughtNode::new("i", ThoughtType::Question, "c", 0.5, "s").unwrap();
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], json!("question"));
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_reasoning_edge_validation() {
        let edge = ReasoningEdge::new("a", "b", "requires information", 0.9).unwrap();
        assert_eq!(edge.label, "requires information");

        assert!(ReasoningEdge::new("", "b", "l", 1.0).is_err());
        assert!(ReasoningEdge::new("a", "", "l", 1.0).is_err());
        assert!(ReasoningEdge::new("a", "b", "", 1.0).is_err());
        assert!(matches!(
            ReasoningEdge::new("a", "b", "l", 1.1),
            Err(ValidationError::ConfidenceOutOfRange { .. })
        ));
    }

    #[test]
    fn test_edge_confidence_defaults_on_deserialize() {
        let edge: ReasoningEdge =
            serde_json::from_str(r#"{"source_id":"a","target_id":"b","label":"l"}"#).unwrap();
        assert!((edge.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_chain_prompt_bounds() {
        let chain = ReasoningChain::new("s", "Why?", vec![], vec![], ChainStatus::Completed);
        assert!(chain.is_ok());

        assert!(matches!(
            ReasoningChain::new("s", "", vec![], vec![], ChainStatus::Completed),
            Err(ValidationError::PromptLength { length: 0 })
        ));

        let long = "x".repeat(2001);
        assert!(matches!(
            ReasoningChain::new("s", long, vec![], vec![], ChainStatus::Completed),
            Err(ValidationError::PromptLength { length: 2001 })
        ));

        let max = "x".repeat(2000);
        assert!(ReasoningChain::new("s", max, vec![], vec![], ChainStatus::Completed).is_ok());
    }

    #[test]
    fn test_scoped_node_id() {
        assert_eq!(scoped_node_id("sess-1", "3"), "sess-1_node_3");
    }
}
