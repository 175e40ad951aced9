use json_pointer::JsonPointer;

#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
pub enum JsonPatchError {
    #[error("path not found: {path}")]
    PathNotFound { path: JsonPointer },
    #[error("invalid index `{index}` in {path}")]
    InvalidIndex { path: JsonPointer, index: String },
    #[error("not a container: {path}")]
    NotAContainer { path: JsonPointer },
    #[error("empty path")]
    EmptyPath,
}
