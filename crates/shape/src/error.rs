#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("unknown shape reference: `{name}`")]
    UnknownReference { name: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum JsonValueError {
    #[error("number {0} is not finite")]
    NonFiniteNumber(f64),
    #[error("{kind} has no json representation")]
    Unsupported { kind: &'static str },
    #[error("property key {key} is not a string")]
    SymbolKey { key: String },
}
