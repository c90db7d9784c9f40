use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("Not implemented: {operation}")]
    NotImplemented { operation: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Thought graph model validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Unknown thought type: {value}")]
    UnknownThoughtType { value: String },

    #[error("Unknown chain status: {value}")]
    UnknownChainStatus { value: String },

    #[error("Confidence {value} outside [0.0, 1.0]")]
    ConfidenceOutOfRange { value: f64 },

    #[error("Field cannot be empty: {field}")]
    EmptyField { field: &'static str },

    #[error("Prompt length {length} outside [1, 2000] characters")]
    PromptLength { length: usize },
}

/// LLM completion errors (transport, API, schema)
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No LLM credential configured")]
    MissingCredentials,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("LLM unavailable: {message} (retries: {retries})")]
    Unavailable { message: String, retries: u32 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Graph store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection failed: {message}")]
    Connection { message: String },

    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("Invalid graph identifier: {name}")]
    InvalidIdentifier { name: String },

    #[error("Migration failed: {message}")]
    Migration { message: String },

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Neo4j error: {0}")]
    Neo4j(#[from] neo4rs::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for model validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type alias for LLM completion calls
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Result type alias for graph store operations
pub type StoreResult<T> = Result<T, StoreError>;
