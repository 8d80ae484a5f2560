use thiserror::Error;

/// Structural problems found while decoding a compact representation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    #[error("missing `{0}` field")]
    MissingField(&'static str),
    #[error("id {0} has no entry")]
    UnknownId(String),
    #[error("id {id} resolves to `{path}`, which is not under `{parent}`")]
    WrongLevel { id: String, path: String, parent: String },
    #[error("{0}")]
    Shape(String),
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unsupported value: cannot encode a bare {kind}")]
    UnsupportedValue { kind: &'static str },
    #[error("Malformed compact node: {0}")]
    MalformedCompactNode(#[from] Malformed),
    #[error("Depth exceeded: nesting is deeper than {limit}")]
    DepthExceeded { limit: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CodecError {
    pub fn missing(field: &'static str) -> Self {
        Malformed::MissingField(field).into()
    }

    pub fn unknown_id(id: impl Into<String>) -> Self {
        Malformed::UnknownId(id.into()).into()
    }

    pub fn shape(msg: impl Into<String>) -> Self {
        Malformed::Shape(msg.into()).into()
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedCompactNode(_))
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
