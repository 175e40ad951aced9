use shape::{PropertyKey, Value};

use crate::{NestedOp, Op};

impl Op {
    /// Applies this tree to `value`, returning the changed copy.
    pub fn apply(&self, value: &Value) -> Value {
        let mut value = value.clone();
        self.apply_in_place(&mut value);
        value
    }

    /// Applies this tree to `value` in place.
    ///
    /// Applying a tree to a value of a different shape than the one it was
    /// computed from is a caller error: mismatched containers and indices are
    /// logged and skipped.
    pub fn apply_in_place(&self, value: &mut Value) {
        if self.is_identical() {
            return;
        }
        match self {
            Op::Identical => {}
            Op::Replace { to, .. } => *value = to.clone(),
            Op::ObjectOps { entries } => apply_object(entries, value),
            Op::ArrayOps { entries } => apply_array(entries, value),
        }
    }
}

impl NestedOp {
    fn apply_in_place(&self, value: &mut Value) {
        match self {
            NestedOp::Replace { to, .. } => *value = to.clone(),
            NestedOp::ObjectOps { entries } => apply_object(entries, value),
            NestedOp::ArrayOps { entries } => apply_array(entries, value),
            // handled by the parent container
            NestedOp::Add { .. } | NestedOp::Remove { .. } => {}
        }
    }
}

/// Execution order of array entries: in-place entries in list order, then
/// removals by descending source index, then insertions by ascending result
/// index.
pub(crate) fn schedule(entries: &[(usize, NestedOp)]) -> Vec<&(usize, NestedOp)> {
    let (structural, mut ordered): (Vec<_>, Vec<_>) =
        entries.iter().partition(|(_, op)| op.is_structural());
    let (mut adds, mut removes): (Vec<_>, Vec<_>) = structural
        .into_iter()
        .partition(|(_, op)| matches!(op, NestedOp::Add { .. }));

    removes.sort_by(|(a, _), (b, _)| b.cmp(a));
    adds.sort_by_key(|(index, _)| *index);

    ordered.extend(removes);
    ordered.extend(adds);
    ordered
}

fn apply_object(entries: &[(PropertyKey, NestedOp)], target: &mut Value) {
    let obj = match target {
        Value::Object(obj) => obj,
        _ => {
            tracing::warn!(kind = target.kind(), "object changes applied to a non-object");
            return;
        }
    };

    for (key, op) in entries {
        match op {
            NestedOp::Add { value } | NestedOp::Replace { to: value, .. } => {
                obj.insert(key.clone(), value.clone());
            }
            NestedOp::Remove { .. } => {
                obj.shift_remove(key);
            }
            NestedOp::ObjectOps { .. } | NestedOp::ArrayOps { .. } => match obj.get_mut(key) {
                Some(child) => op.apply_in_place(child),
                None => tracing::warn!(%key, "change to a missing property skipped"),
            },
        }
    }
}

fn apply_array(entries: &[(usize, NestedOp)], target: &mut Value) {
    let items = match target {
        Value::Array(items) => items,
        _ => {
            tracing::warn!(kind = target.kind(), "array changes applied to a non-array");
            return;
        }
    };

    for (index, op) in schedule(entries) {
        let index = *index;
        match op {
            NestedOp::Add { value } => {
                if index > items.len() {
                    tracing::warn!(index, len = items.len(), "insertion past the end appended");
                }
                items.insert(index.min(items.len()), value.clone());
            }
            NestedOp::Remove { .. } => {
                if index < items.len() {
                    items.remove(index);
                } else {
                    tracing::warn!(index, len = items.len(), "removal of a missing element skipped");
                }
            }
            _ => match items.get_mut(index) {
                Some(item) => op.apply_in_place(item),
                None => tracing::warn!(index, len = items.len(), "change to a missing element skipped"),
            },
        }
    }
}
