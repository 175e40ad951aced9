use json_patch::JsonPatch;
use json_pointer::JsonPointer;
use shape::{PropertyKey, Value};

use crate::{apply::schedule, LowerError, NestedOp, Op};

/// Flattens an op tree into a patch document.
///
/// Entries are emitted depth first; array entries follow the same execution
/// order as [`Op::apply`], so applying the document sequentially reproduces
/// the target. Fails on the first key or value with no JSON form, without
/// returning a partial document.
pub fn lower(op: &Op) -> Result<Vec<JsonPatch>, LowerError> {
    let mut lowering = Lowering {
        path: JsonPointer::root(),
        output: Vec::new(),
    };

    let res = match op {
        Op::Identical => Ok(()),
        Op::Replace { to, .. } => lowering.replace(to),
        Op::ObjectOps { entries } => lowering.object(entries),
        Op::ArrayOps { entries } => lowering.array(entries),
    };

    match res {
        Ok(()) => Ok(lowering.output),
        Err(err) => {
            tracing::debug!(error = %err, "op tree has no json patch form");
            Err(err)
        }
    }
}

impl Op {
    #[inline]
    pub fn to_json_patch(&self) -> Result<Vec<JsonPatch>, LowerError> {
        lower(self)
    }
}

struct Lowering {
    path: JsonPointer,
    output: Vec<JsonPatch>,
}

impl Lowering {
    fn object(&mut self, entries: &[(PropertyKey, NestedOp)]) -> Result<(), LowerError> {
        for (key, op) in entries {
            let segment = key.as_str().ok_or_else(|| LowerError::NonStringKey {
                path: self.path.clone(),
                key: key.to_string(),
            })?;
            self.path.push(segment);
            self.nested(op)?;
            self.path.pop();
        }
        Ok(())
    }

    fn array(&mut self, entries: &[(usize, NestedOp)]) -> Result<(), LowerError> {
        for (index, op) in schedule(entries) {
            self.path.push(index.to_string());
            self.nested(op)?;
            self.path.pop();
        }
        Ok(())
    }

    fn nested(&mut self, op: &NestedOp) -> Result<(), LowerError> {
        match op {
            NestedOp::Replace { to, .. } => self.replace(to),
            NestedOp::Add { value } => {
                let value = self.json(value)?;
                self.output.push(JsonPatch::Add {
                    path: self.path.clone(),
                    value,
                });
                Ok(())
            }
            NestedOp::Remove { .. } => {
                self.output.push(JsonPatch::Remove {
                    path: self.path.clone(),
                });
                Ok(())
            }
            NestedOp::ObjectOps { entries } => self.object(entries),
            NestedOp::ArrayOps { entries } => self.array(entries),
        }
    }

    fn replace(&mut self, to: &Value) -> Result<(), LowerError> {
        let value = self.json(to)?;
        self.output.push(JsonPatch::Replace {
            path: self.path.clone(),
            value,
        });
        Ok(())
    }

    fn json(&self, value: &Value) -> Result<serde_json::Value, LowerError> {
        serde_json::Value::try_from(value).map_err(|reason| LowerError::NonJsonValue {
            path: self.path.clone(),
            reason,
        })
    }
}
