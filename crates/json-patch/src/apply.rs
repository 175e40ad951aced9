use json_pointer::{parse_index, JsonPointerRef, ValueExt};
use serde_json::Value;

use crate::{JsonPatch, JsonPatchError};

/// Applies `patch` to `root` one operation after another.
///
/// Either every operation succeeds or `root` is left exactly as it was: each
/// applied operation is kept as a [`Step`], and the steps are reverted newest
/// first as soon as an operation fails.
pub fn apply_patch(root: &mut Value, patch: &[JsonPatch]) -> Result<(), JsonPatchError> {
    let mut steps = Vec::new();

    match apply_all(root, &mut steps, patch) {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::debug!(applied = steps.len(), error = %err, "rolling back patch");
            for step in steps.into_iter().rev() {
                step.revert(root);
            }
            Err(err)
        }
    }
}

/// What one operation changed, with the paths borrowed from the patch.
enum Step<'a> {
    /// The whole document was swapped out.
    Root(Value),
    /// A member of the object at `parent` was written over `previous`, or
    /// created when there was none.
    Member {
        parent: JsonPointerRef<'a>,
        key: &'a str,
        previous: Option<Value>,
    },
    Inserted {
        parent: JsonPointerRef<'a>,
        index: usize,
    },
    Removed {
        parent: JsonPointerRef<'a>,
        index: usize,
        previous: Value,
    },
    Overwritten {
        parent: JsonPointerRef<'a>,
        index: usize,
        previous: Value,
    },
}

impl Step<'_> {
    /// Undoes the step; the document must be as the step left it.
    fn revert(self, root: &mut Value) {
        match self {
            Step::Root(previous) => *root = previous,
            Step::Member {
                parent,
                key,
                previous,
            } => {
                if let Some(Value::Object(obj)) = root.locate_mut(parent) {
                    match previous {
                        Some(previous) => {
                            obj.insert(key.to_string(), previous);
                        }
                        None => {
                            obj.remove(key);
                        }
                    }
                }
            }
            Step::Inserted { parent, index } => {
                if let Some(Value::Array(array)) = root.locate_mut(parent) {
                    if index < array.len() {
                        array.remove(index);
                    }
                }
            }
            Step::Removed {
                parent,
                index,
                previous,
            } => {
                if let Some(Value::Array(array)) = root.locate_mut(parent) {
                    array.insert(index.min(array.len()), previous);
                }
            }
            Step::Overwritten {
                parent,
                index,
                previous,
            } => {
                if let Some(element) = root
                    .locate_mut(parent)
                    .and_then(|array| array.get_mut(index))
                {
                    *element = previous;
                }
            }
        }
    }
}

fn apply_all<'a>(
    root: &mut Value,
    steps: &mut Vec<Step<'a>>,
    patch: &'a [JsonPatch],
) -> Result<(), JsonPatchError> {
    for command in patch {
        let step = match command {
            JsonPatch::Add { path, value } => apply_add(root, path.as_ref(), value.clone())?,
            JsonPatch::Remove { path } => apply_remove(root, path.as_ref())?,
            JsonPatch::Replace { path, value } => {
                apply_replace(root, path.as_ref(), value.clone())?
            }
        };
        steps.push(step);
    }
    Ok(())
}

fn locate_parent<'v>(
    root: &'v mut Value,
    parent_path: JsonPointerRef<'_>,
) -> Result<&'v mut Value, JsonPatchError> {
    root.locate_mut(parent_path)
        .ok_or_else(|| JsonPatchError::PathNotFound {
            path: parent_path.to_owned(),
        })
}

fn invalid_index(parent_path: JsonPointerRef<'_>, key: &str) -> JsonPatchError {
    JsonPatchError::InvalidIndex {
        path: parent_path.to_owned(),
        index: key.to_string(),
    }
}

fn apply_add<'a>(
    root: &mut Value,
    path: JsonPointerRef<'a>,
    value: Value,
) -> Result<Step<'a>, JsonPatchError> {
    let (parent, key) = match path.split_last() {
        Some(parts) => parts,
        None => return Ok(Step::Root(std::mem::replace(root, value))),
    };

    match locate_parent(root, parent)? {
        Value::Object(obj) => Ok(Step::Member {
            parent,
            key,
            previous: obj.insert(key.to_string(), value),
        }),
        Value::Array(array) => {
            let index = if key == "-" {
                array.len()
            } else {
                parse_index(key)
                    .filter(|index| *index <= array.len())
                    .ok_or_else(|| invalid_index(parent, key))?
            };
            array.insert(index, value);
            Ok(Step::Inserted { parent, index })
        }
        _ => Err(JsonPatchError::NotAContainer {
            path: parent.to_owned(),
        }),
    }
}

fn apply_remove<'a>(
    root: &mut Value,
    path: JsonPointerRef<'a>,
) -> Result<Step<'a>, JsonPatchError> {
    let (parent, key) = path.split_last().ok_or(JsonPatchError::EmptyPath)?;

    match locate_parent(root, parent)? {
        Value::Object(obj) => {
            let previous = obj.remove(key).ok_or_else(|| JsonPatchError::PathNotFound {
                path: path.to_owned(),
            })?;
            Ok(Step::Member {
                parent,
                key,
                previous: Some(previous),
            })
        }
        Value::Array(array) => {
            let index = parse_index(key)
                .filter(|index| *index < array.len())
                .ok_or_else(|| invalid_index(parent, key))?;
            Ok(Step::Removed {
                parent,
                index,
                previous: array.remove(index),
            })
        }
        _ => Err(JsonPatchError::NotAContainer {
            path: parent.to_owned(),
        }),
    }
}

fn apply_replace<'a>(
    root: &mut Value,
    path: JsonPointerRef<'a>,
    value: Value,
) -> Result<Step<'a>, JsonPatchError> {
    let (parent, key) = match path.split_last() {
        Some(parts) => parts,
        None => return Ok(Step::Root(std::mem::replace(root, value))),
    };
    let not_found = || JsonPatchError::PathNotFound {
        path: path.to_owned(),
    };

    match root.locate_mut(parent).ok_or_else(not_found)? {
        Value::Object(obj) => {
            let member = obj.get_mut(key).ok_or_else(not_found)?;
            Ok(Step::Member {
                parent,
                key,
                previous: Some(std::mem::replace(member, value)),
            })
        }
        Value::Array(array) => {
            let element = parse_index(key)
                .and_then(|index| Some((index, array.get_mut(index)?)));
            let (index, element) = element.ok_or_else(not_found)?;
            Ok(Step::Overwritten {
                parent,
                index,
                previous: std::mem::replace(element, value),
            })
        }
        _ => Err(not_found()),
    }
}
