//! Shape descriptors and the dynamic value model they describe.

mod document;
mod error;
mod guard;
mod json;
mod shape;
mod value;

pub use document::{FieldNode, ShapeDocument, ShapeNode};
pub use error::{JsonValueError, ShapeError};
pub use shape::{
    Element, Field, IndexSignature, Leaf, Refinement, Sequence, Shape, ShapeId, ShapeKind, Struct,
    Suspend, Transform,
};
pub use value::{same_value_number, Object, Opaque, PropertyKey, Symbol, Value};
