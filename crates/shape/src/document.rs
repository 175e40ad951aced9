use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, OnceLock, Weak},
};

use serde::Deserialize;

use crate::{Element, Field, IndexSignature, Sequence, Shape, ShapeError, Value};

/// A shape described as JSON.
///
/// ```json
/// {
///   "definitions": {
///     "Category": {
///       "type": "struct",
///       "fields": [
///         {"name": "name", "shape": {"type": "string"}},
///         {"name": "children", "shape": {"type": "array", "items": {"type": "ref", "name": "Category"}}}
///       ]
///     }
///   },
///   "root": {"type": "ref", "name": "Category"}
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ShapeDocument {
    #[serde(default)]
    pub definitions: BTreeMap<String, ShapeNode>,
    pub root: ShapeNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShapeNode {
    Number,
    String,
    Boolean,
    Null,
    Unknown,
    Literal {
        value: serde_json::Value,
    },
    Enum {
        values: Vec<serde_json::Value>,
    },
    Struct {
        #[serde(default)]
        fields: Vec<FieldNode>,
        #[serde(default)]
        index: Option<Box<ShapeNode>>,
    },
    Array {
        items: Box<ShapeNode>,
    },
    Tuple {
        elements: Vec<ShapeNode>,
        #[serde(default)]
        rest: Option<Box<ShapeNode>>,
    },
    Union {
        members: Vec<ShapeNode>,
    },
    Ref {
        name: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldNode {
    pub name: String,
    pub shape: ShapeNode,
    #[serde(default)]
    pub optional: bool,
}

type DefinitionTable = OnceLock<HashMap<String, Shape>>;

impl ShapeDocument {
    pub fn from_slice(data: &[u8]) -> Result<Self, ShapeError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Builds the root shape.
    ///
    /// Every definition is built exactly once and `ref` nodes resolve to that
    /// single node, so recursive definitions keep a stable identity. `ref`
    /// nodes hold the definition table weakly and the returned root owns it:
    /// shapes taken out of the graph resolve references only while the root
    /// is alive, and resolve to `unknown` afterwards.
    pub fn build(&self) -> Result<Shape, ShapeError> {
        self.build_with(Arc::default())
    }

    fn build_with(&self, table: Arc<DefinitionTable>) -> Result<Shape, ShapeError> {
        let builder = Builder {
            definitions: &self.definitions,
            table: Arc::downgrade(&table),
        };

        let shapes = self
            .definitions
            .iter()
            .map(|(name, node)| -> Result<_, ShapeError> {
                Ok((name.clone(), builder.build(node)?))
            })
            .collect::<Result<HashMap<_, _>, ShapeError>>()?;
        let root = builder.build(&self.root)?;

        if self.definitions.is_empty() {
            return Ok(root);
        }

        let _ = table.set(shapes);
        Ok(Shape::suspend(move || {
            let _owner = &table;
            root.clone()
        }))
    }
}

struct Builder<'a> {
    definitions: &'a BTreeMap<String, ShapeNode>,
    table: Weak<DefinitionTable>,
}

impl Builder<'_> {
    fn build(&self, node: &ShapeNode) -> Result<Shape, ShapeError> {
        Ok(match node {
            ShapeNode::Number => Shape::number(),
            ShapeNode::String => Shape::string(),
            ShapeNode::Boolean => Shape::boolean(),
            ShapeNode::Null => Shape::null(),
            ShapeNode::Unknown => Shape::unknown(),
            ShapeNode::Literal { value } => Shape::literal(Value::from(value.clone())),
            ShapeNode::Enum { values } => Shape::enums(values.iter().cloned().map(Value::from)),
            ShapeNode::Struct { fields, index } => {
                let fields = fields
                    .iter()
                    .map(|field| -> Result<_, ShapeError> {
                        let shape = self.build(&field.shape)?;
                        Ok(if field.optional {
                            Field::optional(field.name.as_str(), shape)
                        } else {
                            Field::required(field.name.as_str(), shape)
                        })
                    })
                    .collect::<Result<Vec<_>, ShapeError>>()?;
                let index_signatures = match index {
                    Some(value) => vec![IndexSignature::new(Shape::string(), self.build(value)?)],
                    None => Vec::new(),
                };
                Shape::structure_with_index(fields, index_signatures)
            }
            ShapeNode::Array { items } => Shape::array(self.build(items)?),
            ShapeNode::Tuple { elements, rest } => Sequence {
                elements: elements
                    .iter()
                    .map(|element| -> Result<_, ShapeError> {
                        Ok(Element {
                            shape: self.build(element)?,
                            optional: false,
                        })
                    })
                    .collect::<Result<_, ShapeError>>()?,
                rest: rest.as_deref().map(|rest| self.build(rest)).transpose()?,
            }
            .into(),
            ShapeNode::Union { members } => Shape::union(
                members
                    .iter()
                    .map(|member| self.build(member))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            ShapeNode::Ref { name } => {
                if !self.definitions.contains_key(name) {
                    return Err(ShapeError::UnknownReference { name: name.clone() });
                }
                let table = Weak::clone(&self.table);
                let name = name.clone();
                Shape::suspend(move || {
                    table
                        .upgrade()
                        .and_then(|table| table.get()?.get(&name).cloned())
                        .unwrap_or_else(Shape::unknown)
                })
            }
        })
    }
}
