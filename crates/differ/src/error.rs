use json_pointer::JsonPointer;
use shape::JsonValueError;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum LowerError {
    #[error("value at {path:?} cannot be written as json: {reason}")]
    NonJsonValue {
        path: JsonPointer,
        reason: JsonValueError,
    },
    #[error("key {key} under {path:?} cannot be used as a json pointer segment")]
    NonStringKey { path: JsonPointer, key: String },
}

#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
#[error("cannot decode value: {reason}")]
pub struct DecodeError {
    reason: String,
}

impl DecodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JsonDiffError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Lower(#[from] LowerError),
    #[error(transparent)]
    Patch(#[from] json_patch::JsonPatchError),
}
