use std::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
};

use json_patch::JsonPatch;
use serde::{de::DeserializeOwned, Serialize};
use shape::{Shape, Value};

use crate::{Differ, JsonDiffError};

/// Diffs `serde` types through their JSON encoding and speaks plain patch
/// documents on both ends.
pub struct JsonDiffer<A> {
    differ: Differ,
    marker: PhantomData<fn() -> A>,
}

impl<A: Serialize + DeserializeOwned> JsonDiffer<A> {
    pub fn new() -> Self {
        Self {
            differ: Differ::compile(&Shape::json()),
            marker: PhantomData,
        }
    }

    pub fn diff(&self, from: &A, to: &A) -> Result<Vec<JsonPatch>, JsonDiffError> {
        let from = Value::from(serde_json::to_value(from)?);
        let to = Value::from(serde_json::to_value(to)?);
        Ok(self.differ.diff(&from, &to).to_json_patch()?)
    }

    /// Runs `patch` against the encoding of `value` and decodes the result.
    pub fn apply(&self, patch: &[JsonPatch], value: &A) -> Result<A, JsonDiffError> {
        let mut doc = serde_json::to_value(value)?;
        json_patch::apply_patch(&mut doc, patch)?;
        Ok(serde_json::from_value(doc)?)
    }
}

impl<A: Serialize + DeserializeOwned> Default for JsonDiffer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for JsonDiffer<A> {
    fn clone(&self) -> Self {
        Self {
            differ: self.differ.clone(),
            marker: PhantomData,
        }
    }
}

impl<A> Debug for JsonDiffer<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonDiffer")
            .field("differ", &self.differ)
            .finish()
    }
}
