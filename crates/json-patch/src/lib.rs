//! RFC 6902 patch documents restricted to `add`, `remove` and `replace`, with a
//! sequential, all-or-nothing applier.

mod apply;
mod error;

use json_pointer::JsonPointer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use apply::apply_patch;
pub use error::JsonPatchError;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum JsonPatch {
    Add { path: JsonPointer, value: Value },
    Remove { path: JsonPointer },
    Replace { path: JsonPointer, value: Value },
}

impl JsonPatch {
    pub fn path(&self) -> &JsonPointer {
        match self {
            JsonPatch::Add { path, .. }
            | JsonPatch::Remove { path }
            | JsonPatch::Replace { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use json_pointer::json_pointer;
    use serde_json::json;

    use super::*;

    #[test]
    fn serde_format() {
        let patch = vec![
            JsonPatch::Add {
                path: json_pointer!("/a~1b"),
                value: json!(1),
            },
            JsonPatch::Remove {
                path: json_pointer!("/c/0"),
            },
            JsonPatch::Replace {
                path: json_pointer!(""),
                value: json!({}),
            },
        ];

        let encoded = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            encoded,
            json!([
                {"op": "add", "path": "/a~1b", "value": 1},
                {"op": "remove", "path": "/c/0"},
                {"op": "replace", "path": "", "value": {}},
            ])
        );

        let decoded: Vec<JsonPatch> = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, patch);
    }

    #[test]
    fn rejects_unsupported_operations() {
        let res = serde_json::from_value::<JsonPatch>(json!({
            "op": "move",
            "from": "/a",
            "path": "/b",
        }));
        assert!(res.is_err());
    }
}
