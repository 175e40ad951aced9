use crate::{Leaf, Sequence, Shape, ShapeKind, Struct, Value};

impl Shape {
    /// Structural guard: whether `value` is a member of this shape.
    pub fn is(&self, value: &Value) -> bool {
        match self.kind() {
            ShapeKind::Leaf(leaf) => leaf.is(value),
            ShapeKind::Struct(shape) => shape.is(value),
            ShapeKind::Sequence(shape) => shape.is(value),
            ShapeKind::Union(members) => members.iter().any(|member| member.is(value)),
            ShapeKind::Suspend(suspend) => suspend.resolve().is(value),
            ShapeKind::Refinement(refinement) => {
                refinement.base.is(value) && refinement.test(value)
            }
            ShapeKind::Transform(transform) => transform.decoded.is(value),
        }
    }
}

impl Leaf {
    pub fn is(&self, value: &Value) -> bool {
        match self {
            Leaf::Number => matches!(value, Value::Number(_)),
            Leaf::String | Leaf::TemplateLiteral(_) => matches!(value, Value::String(_)),
            Leaf::Boolean => matches!(value, Value::Bool(_)),
            Leaf::BigInt => matches!(value, Value::BigInt(_)),
            Leaf::Symbol => matches!(value, Value::Symbol(_)),
            Leaf::Null => matches!(value, Value::Null),
            Leaf::Literal(literal) => literal == value,
            Leaf::Enum(members) => members.contains(value),
            Leaf::Declaration(type_name) => {
                matches!(value, Value::Opaque(opaque) if opaque.type_name() == type_name.as_str())
            }
            Leaf::Unknown | Leaf::Any => true,
            Leaf::Object => matches!(
                value,
                Value::Object(_) | Value::Array(_) | Value::Opaque(_)
            ),
        }
    }
}

impl Struct {
    fn is(&self, value: &Value) -> bool {
        let obj = match value {
            Value::Object(obj) => obj,
            _ => return false,
        };

        let fields_match = self.fields.iter().all(|field| match obj.get(&field.key) {
            Some(value) => field.shape.is(value),
            None => field.optional,
        });

        fields_match
            && obj
                .iter()
                .filter(|(key, _)| !self.declares(key))
                .all(|(key, value)| match self.signature_for(key) {
                    Some(signature) => signature.value.is(value),
                    None => true,
                })
    }
}

impl Sequence {
    fn is(&self, value: &Value) -> bool {
        let items = match value {
            Value::Array(items) => items,
            _ => return false,
        };

        if items.len() < self.required_len()
            || (self.rest.is_none() && items.len() > self.elements.len())
        {
            return false;
        }

        items
            .iter()
            .enumerate()
            .all(|(index, item)| self.shape_at(index).map_or(false, |shape| shape.is(item)))
    }
}
