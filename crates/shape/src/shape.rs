use std::{
    fmt::{self, Debug, Formatter},
    sync::{Arc, LazyLock},
};

use crate::{PropertyKey, Value};

/// Identity of a shape node, stable for as long as the node is alive.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShapeId(usize);

/// A shared, immutable node of a shape descriptor tree.
///
/// Cloning is cheap and preserves identity; two shapes built separately are
/// different nodes even when they describe the same structure.
#[derive(Clone)]
pub struct Shape(Arc<ShapeKind>);

#[derive(Debug, Clone)]
pub enum ShapeKind {
    Leaf(Leaf),
    Struct(Struct),
    Sequence(Sequence),
    Union(Vec<Shape>),
    Suspend(Suspend),
    Refinement(Refinement),
    Transform(Transform),
}

#[derive(Debug, Clone)]
pub enum Leaf {
    Number,
    String,
    Boolean,
    BigInt,
    Symbol,
    Null,
    Literal(Value),
    Enum(Vec<Value>),
    /// A string constrained by a template pattern, kept for display only.
    TemplateLiteral(String),
    /// A named host type carried as an [`Opaque`](crate::Opaque) value.
    Declaration(String),
    Unknown,
    Any,
    Object,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub key: PropertyKey,
    pub shape: Shape,
    pub optional: bool,
}

impl Field {
    pub fn required(key: impl Into<PropertyKey>, shape: Shape) -> Self {
        Self {
            key: key.into(),
            shape,
            optional: false,
        }
    }

    pub fn optional(key: impl Into<PropertyKey>, shape: Shape) -> Self {
        Self {
            key: key.into(),
            shape,
            optional: true,
        }
    }
}

/// Catch-all properties: every undeclared key accepted by `parameter` holds a
/// value of shape `value`.
#[derive(Debug, Clone)]
pub struct IndexSignature {
    pub parameter: Shape,
    pub value: Shape,
}

impl IndexSignature {
    pub fn new(parameter: Shape, value: Shape) -> Self {
        Self { parameter, value }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Struct {
    pub fields: Vec<Field>,
    pub index_signatures: Vec<IndexSignature>,
}

impl Struct {
    pub fn declares(&self, key: &PropertyKey) -> bool {
        self.fields.iter().any(|field| &field.key == key)
    }

    /// The first index signature whose parameter accepts `key`.
    pub fn signature_for(&self, key: &PropertyKey) -> Option<&IndexSignature> {
        let key = key.to_value();
        self.index_signatures
            .iter()
            .find(|signature| signature.parameter.is(&key))
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    pub shape: Shape,
    pub optional: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Sequence {
    pub elements: Vec<Element>,
    pub rest: Option<Shape>,
}

impl Sequence {
    pub fn shape_at(&self, index: usize) -> Option<&Shape> {
        self.elements
            .get(index)
            .map(|element| &element.shape)
            .or(self.rest.as_ref())
    }

    pub fn required_len(&self) -> usize {
        self.elements
            .iter()
            .filter(|element| !element.optional)
            .count()
    }
}

/// Lazy reference used to describe self-referential shapes.
///
/// The resolver must hand back the same node on every call, for instance a
/// clone of a `LazyLock<Shape>` static.
#[derive(Clone)]
pub struct Suspend {
    resolver: Arc<dyn Fn() -> Shape + Send + Sync>,
}

impl Suspend {
    #[inline]
    pub fn resolve(&self) -> Shape {
        (self.resolver)()
    }
}

impl Debug for Suspend {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Suspend")
    }
}

#[derive(Clone)]
pub struct Refinement {
    pub base: Shape,
    pub name: String,
    predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Refinement {
    #[inline]
    pub fn test(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

impl Debug for Refinement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("base", &self.base)
            .field("name", &self.name)
            .finish()
    }
}

/// A type whose values are produced by decoding values of another shape.
#[derive(Debug, Clone)]
pub struct Transform {
    pub encoded: Shape,
    pub decoded: Shape,
}

impl Debug for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self.kind(), f)
    }
}

impl From<ShapeKind> for Shape {
    fn from(kind: ShapeKind) -> Self {
        Shape(Arc::new(kind))
    }
}

impl From<Leaf> for Shape {
    fn from(leaf: Leaf) -> Self {
        ShapeKind::Leaf(leaf).into()
    }
}

impl From<Struct> for Shape {
    fn from(shape: Struct) -> Self {
        ShapeKind::Struct(shape).into()
    }
}

impl From<Sequence> for Shape {
    fn from(shape: Sequence) -> Self {
        ShapeKind::Sequence(shape).into()
    }
}

static JSON: LazyLock<Shape> = LazyLock::new(|| {
    let json = Shape::suspend(|| JSON.clone());
    Shape::union([
        Shape::null(),
        Shape::boolean(),
        Shape::number(),
        Shape::string(),
        Shape::array(json.clone()),
        Shape::record(Shape::string(), json),
    ])
});

impl Shape {
    #[inline]
    pub fn kind(&self) -> &ShapeKind {
        &self.0
    }

    #[inline]
    pub fn id(&self) -> ShapeId {
        ShapeId(Arc::as_ptr(&self.0) as usize)
    }

    pub fn number() -> Shape {
        Leaf::Number.into()
    }

    pub fn string() -> Shape {
        Leaf::String.into()
    }

    pub fn boolean() -> Shape {
        Leaf::Boolean.into()
    }

    pub fn bigint() -> Shape {
        Leaf::BigInt.into()
    }

    pub fn symbol() -> Shape {
        Leaf::Symbol.into()
    }

    pub fn null() -> Shape {
        Leaf::Null.into()
    }

    pub fn unknown() -> Shape {
        Leaf::Unknown.into()
    }

    pub fn any() -> Shape {
        Leaf::Any.into()
    }

    pub fn object() -> Shape {
        Leaf::Object.into()
    }

    pub fn literal(value: impl Into<Value>) -> Shape {
        Leaf::Literal(value.into()).into()
    }

    pub fn enums<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Shape {
        Leaf::Enum(values.into_iter().map(Into::into).collect()).into()
    }

    pub fn template_literal(pattern: impl Into<String>) -> Shape {
        Leaf::TemplateLiteral(pattern.into()).into()
    }

    pub fn declaration(type_name: impl Into<String>) -> Shape {
        Leaf::Declaration(type_name.into()).into()
    }

    pub fn structure(fields: impl IntoIterator<Item = Field>) -> Shape {
        Struct {
            fields: fields.into_iter().collect(),
            index_signatures: Vec::new(),
        }
        .into()
    }

    pub fn structure_with_index(
        fields: impl IntoIterator<Item = Field>,
        index_signatures: impl IntoIterator<Item = IndexSignature>,
    ) -> Shape {
        Struct {
            fields: fields.into_iter().collect(),
            index_signatures: index_signatures.into_iter().collect(),
        }
        .into()
    }

    /// A struct with no declared fields and a single index signature.
    pub fn record(key: Shape, value: Shape) -> Shape {
        Shape::structure_with_index([], [IndexSignature::new(key, value)])
    }

    pub fn tuple(elements: impl IntoIterator<Item = Shape>) -> Shape {
        Sequence {
            elements: elements
                .into_iter()
                .map(|shape| Element {
                    shape,
                    optional: false,
                })
                .collect(),
            rest: None,
        }
        .into()
    }

    pub fn array(item: Shape) -> Shape {
        Sequence {
            elements: Vec::new(),
            rest: Some(item),
        }
        .into()
    }

    pub fn union(members: impl IntoIterator<Item = Shape>) -> Shape {
        ShapeKind::Union(members.into_iter().collect()).into()
    }

    pub fn suspend(resolver: impl Fn() -> Shape + Send + Sync + 'static) -> Shape {
        ShapeKind::Suspend(Suspend {
            resolver: Arc::new(resolver),
        })
        .into()
    }

    pub fn refine(
        self,
        name: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Shape {
        ShapeKind::Refinement(Refinement {
            base: self,
            name: name.into(),
            predicate: Arc::new(predicate),
        })
        .into()
    }

    pub fn transform(encoded: Shape, decoded: Shape) -> Shape {
        ShapeKind::Transform(Transform { encoded, decoded }).into()
    }

    /// Any JSON document: null, booleans, numbers, strings, arrays and
    /// string-keyed records of JSON values.
    pub fn json() -> Shape {
        JSON.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity() {
        let a = Shape::string();
        let b = Shape::string();
        assert_eq!(a.id(), a.clone().id());
        assert_ne!(a.id(), b.id());
        assert_eq!(Shape::json().id(), Shape::json().id());
    }

    #[test]
    fn json_shape_is_self_referential() {
        let json = Shape::json();
        let ShapeKind::Union(members) = json.kind() else {
            panic!("json shape is a union");
        };
        let ShapeKind::Sequence(sequence) = members[4].kind() else {
            panic!("fifth member is the array");
        };
        let ShapeKind::Suspend(item) = sequence.rest.as_ref().unwrap().kind() else {
            panic!("array items are suspended");
        };
        assert_eq!(item.resolve().id(), json.id());
    }

    #[test]
    fn sequence_positions() {
        let ShapeKind::Sequence(sequence) = Shape::tuple([Shape::string(), Shape::number()]).kind().clone()
        else {
            unreachable!()
        };
        assert!(sequence.shape_at(1).is_some());
        assert!(sequence.shape_at(2).is_none());
        assert_eq!(sequence.required_len(), 2);

        let ShapeKind::Sequence(sequence) = Shape::array(Shape::number()).kind().clone() else {
            unreachable!()
        };
        assert!(sequence.shape_at(100).is_some());
        assert_eq!(sequence.required_len(), 0);
    }

    #[test]
    fn debug_does_not_follow_suspensions() {
        let rendered = format!("{:?}", Shape::json());
        assert!(rendered.contains("Suspend"));
    }
}
