use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use shape::{Leaf, Object, PropertyKey, Shape, ShapeId, ShapeKind, Value};

use crate::{NestedOp, Op};

type NodeId = usize;

/// Slot of the shared leaf comparator; always present.
const LEAF: NodeId = 0;

#[derive(Debug)]
enum Node {
    Leaf,
    Struct {
        fields: Vec<(PropertyKey, NodeId)>,
        signatures: Vec<(Shape, NodeId)>,
    },
    Sequence {
        elements: Vec<NodeId>,
        rest: Option<NodeId>,
    },
    Union {
        members: Vec<(Probe, NodeId)>,
    },
}

/// Shallow membership test that picks a union member.
///
/// Only the outer level of a value is inspected: its container kind, which
/// keys it carries, its length, and children whose shape is a leaf. Deeper
/// structure is checked by the member's comparator while it walks the value.
#[derive(Debug)]
enum Probe {
    Never,
    Leaf(Leaf),
    Object {
        fields: Vec<(PropertyKey, bool, Option<Leaf>)>,
        parameters: Vec<Shape>,
    },
    Array {
        elements: Vec<Option<Leaf>>,
        rest: Option<Option<Leaf>>,
        required: usize,
    },
    OneOf(Vec<Probe>),
}

impl Probe {
    fn new(shape: &Shape, visiting: &mut HashSet<ShapeId>) -> Probe {
        if !visiting.insert(shape.id()) {
            return Probe::Never;
        }

        let probe = match shape.kind() {
            ShapeKind::Leaf(leaf) => Probe::Leaf(leaf.clone()),
            ShapeKind::Struct(shape_struct) => Probe::Object {
                fields: shape_struct
                    .fields
                    .iter()
                    .map(|field| (field.key.clone(), field.optional, leaf_of(&field.shape)))
                    .collect(),
                parameters: shape_struct
                    .index_signatures
                    .iter()
                    .map(|signature| signature.parameter.clone())
                    .collect(),
            },
            ShapeKind::Sequence(sequence) => Probe::Array {
                elements: sequence
                    .elements
                    .iter()
                    .map(|element| leaf_of(&element.shape))
                    .collect(),
                rest: sequence.rest.as_ref().map(leaf_of),
                required: sequence.required_len(),
            },
            ShapeKind::Union(members) => Probe::OneOf(
                members
                    .iter()
                    .map(|member| Probe::new(member, visiting))
                    .collect(),
            ),
            ShapeKind::Suspend(suspend) => Probe::new(&suspend.resolve(), visiting),
            ShapeKind::Refinement(refinement) => Probe::new(&refinement.base, visiting),
            ShapeKind::Transform(transform) => Probe::new(&transform.decoded, visiting),
        };

        visiting.remove(&shape.id());
        probe
    }

    fn admits(&self, value: &Value) -> bool {
        match self {
            Probe::Never => false,
            Probe::Leaf(leaf) => leaf.is(value),
            Probe::Object { fields, parameters } => {
                let obj = match value {
                    Value::Object(obj) => obj,
                    _ => return false,
                };

                let fields_match = fields.iter().all(|(key, optional, leaf)| match obj.get(key) {
                    Some(value) => leaf.as_ref().map_or(true, |leaf| leaf.is(value)),
                    None => *optional,
                });

                // every key must be declared or belong to an index signature
                fields_match
                    && obj.keys().all(|key| {
                        fields.iter().any(|(field, ..)| field == key) || {
                            let key = key.to_value();
                            parameters.iter().any(|parameter| parameter.is(&key))
                        }
                    })
            }
            Probe::Array {
                elements,
                rest,
                required,
            } => {
                let items = match value {
                    Value::Array(items) => items,
                    _ => return false,
                };

                items.len() >= *required
                    && (rest.is_some() || items.len() <= elements.len())
                    && items.iter().enumerate().all(|(index, item)| {
                        match elements.get(index).or(rest.as_ref()) {
                            Some(Some(leaf)) => leaf.is(item),
                            _ => true,
                        }
                    })
            }
            Probe::OneOf(probes) => probes.iter().any(|probe| probe.admits(value)),
        }
    }
}

fn leaf_of(shape: &Shape) -> Option<Leaf> {
    match shape.kind() {
        ShapeKind::Leaf(leaf) => Some(leaf.clone()),
        _ => None,
    }
}

/// Raised under a union member when the values carry a differing key the
/// member has no comparator for; the union then replaces the whole value.
#[derive(Debug)]
struct Mismatch;

/// A shape compiled into an arena of comparison nodes.
///
/// Nodes refer to each other by index, so recursive shapes become cycles in
/// the arena instead of recursive compilation.
#[derive(Debug)]
pub(crate) struct Program {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Program {
    pub(crate) fn compile(shape: &Shape) -> Program {
        let mut compiler = Compiler {
            nodes: vec![Node::Leaf],
            memo: HashMap::new(),
            visiting: HashSet::new(),
        };
        let root = compiler.compile(shape);

        tracing::debug!(
            nodes = compiler.nodes.len(),
            shapes = compiler.memo.len(),
            "differ compiled"
        );

        Program {
            nodes: compiler.nodes,
            root,
        }
    }

    #[inline]
    pub(crate) fn diff(&self, from: &Value, to: &Value) -> Op {
        self.compare(self.root, from, to, false)
            .unwrap_or_else(|Mismatch| compare_leaf(from, to))
    }

    /// Compares two values under `node`. Outside of unions undeclared keys
    /// without an index signature are ignored; under a union member
    /// (`strict`) a difference in such a key is a [`Mismatch`].
    fn compare(
        &self,
        node: NodeId,
        from: &Value,
        to: &Value,
        strict: bool,
    ) -> Result<Op, Mismatch> {
        match &self.nodes[node] {
            Node::Leaf => Ok(compare_leaf(from, to)),
            Node::Struct { fields, signatures } => {
                self.compare_struct(fields, signatures, from, to, strict)
            }
            Node::Sequence { elements, rest } => {
                self.compare_sequence(elements, *rest, from, to, strict)
            }
            Node::Union { members } => {
                let member = members
                    .iter()
                    .find(|(probe, _)| probe.admits(from) && probe.admits(to));
                Ok(match member {
                    Some((_, node)) => {
                        self.compare(*node, from, to, true)
                            .unwrap_or_else(|Mismatch| {
                                tracing::trace!(node, "undeclared key differs, replacing");
                                compare_leaf(from, to)
                            })
                    }
                    None => compare_leaf(from, to),
                })
            }
        }
    }

    fn compare_struct(
        &self,
        fields: &[(PropertyKey, NodeId)],
        signatures: &[(Shape, NodeId)],
        from: &Value,
        to: &Value,
        strict: bool,
    ) -> Result<Op, Mismatch> {
        let (from_obj, to_obj) = match (from, to) {
            (Value::Object(from_obj), Value::Object(to_obj)) => (from_obj, to_obj),
            _ => return Ok(compare_leaf(from, to)),
        };

        let mut entries = Vec::new();

        for (key, node) in fields {
            if let Some(op) =
                self.compare_property(*node, from_obj.get(key), to_obj.get(key), strict)?
            {
                entries.push((key.clone(), op));
            }
        }

        if strict || !signatures.is_empty() {
            for key in undeclared_keys(fields, from_obj, to_obj) {
                let key_value = key.to_value();
                let (from, to) = (from_obj.get(key), to_obj.get(key));
                match signatures.iter().find(|(param, _)| param.is(&key_value)) {
                    Some((_, node)) => {
                        if let Some(op) = self.compare_property(*node, from, to, strict)? {
                            entries.push((key.clone(), op));
                        }
                    }
                    None if strict && from != to => return Err(Mismatch),
                    None => {}
                }
            }
        }

        Ok(Op::object(entries))
    }

    fn compare_property(
        &self,
        node: NodeId,
        from: Option<&Value>,
        to: Option<&Value>,
        strict: bool,
    ) -> Result<Option<NestedOp>, Mismatch> {
        Ok(match (from, to) {
            (Some(from), Some(to)) => NestedOp::from_op(self.compare(node, from, to, strict)?),
            (Some(from), None) => Some(NestedOp::remove(from.clone())),
            (None, Some(to)) => Some(NestedOp::add(to.clone())),
            (None, None) => None,
        })
    }

    fn compare_sequence(
        &self,
        elements: &[NodeId],
        rest: Option<NodeId>,
        from: &Value,
        to: &Value,
        strict: bool,
    ) -> Result<Op, Mismatch> {
        let (from_items, to_items) = match (from, to) {
            (Value::Array(from_items), Value::Array(to_items)) => (from_items, to_items),
            _ => return Ok(compare_leaf(from, to)),
        };

        let node_at = |index: usize| elements.get(index).copied().or(rest).unwrap_or(LEAF);
        let common = from_items.len().min(to_items.len());
        let mut entries = Vec::new();

        for (index, (from, to)) in from_items.iter().zip(to_items).enumerate() {
            if let Some(op) = NestedOp::from_op(self.compare(node_at(index), from, to, strict)?) {
                entries.push((index, op));
            }
        }

        // only one of these is non-empty
        entries.extend(
            to_items[common..]
                .iter()
                .enumerate()
                .map(|(offset, value)| (common + offset, NestedOp::add(value.clone()))),
        );
        entries.extend(
            from_items[common..]
                .iter()
                .enumerate()
                .map(|(offset, value)| (common + offset, NestedOp::remove(value.clone()))),
        );

        Ok(Op::array(entries))
    }
}

fn compare_leaf(from: &Value, to: &Value) -> Op {
    if from == to {
        Op::Identical
    } else {
        Op::replace(from.clone(), to.clone())
    }
}

/// Keys of either object that no field declares: string keys first, in the
/// order they appear in `from` then `to`, followed by symbol keys in
/// registration order.
fn undeclared_keys<'a>(
    fields: &[(PropertyKey, NodeId)],
    from: &'a Object,
    to: &'a Object,
) -> Vec<&'a PropertyKey> {
    let keys = from
        .keys()
        .chain(to.keys())
        .filter(|key| !fields.iter().any(|(field, _)| field == *key))
        .collect::<IndexSet<_>>();

    let mut keys = keys.into_iter().collect::<Vec<_>>();
    keys.sort_by_key(|key| match key {
        PropertyKey::String(_) => None,
        PropertyKey::Symbol(symbol) => Some(symbol.id()),
    });
    keys
}

struct Compiler {
    nodes: Vec<Node>,
    /// Every shape seen so far, kept alive so its identity cannot be reused.
    memo: HashMap<ShapeId, (Shape, NodeId)>,
    visiting: HashSet<ShapeId>,
}

impl Compiler {
    fn compile(&mut self, shape: &Shape) -> NodeId {
        let id = shape.id();
        if let Some((_, node)) = self.memo.get(&id) {
            tracing::trace!(node, "reusing compiled shape");
            return *node;
        }

        // a cycle that never passes through a container, e.g. a refinement
        // whose base resolves back to the refinement itself
        if !self.visiting.insert(id) {
            tracing::trace!("degenerate shape cycle compiled as a leaf");
            return LEAF;
        }

        let node = match shape.kind() {
            ShapeKind::Leaf(_) | ShapeKind::Transform(_) => LEAF,
            ShapeKind::Refinement(refinement) => self.compile(&refinement.base),
            ShapeKind::Suspend(suspend) => self.compile(&suspend.resolve()),
            ShapeKind::Struct(shape_struct) => {
                let node = self.reserve(shape);
                let fields = shape_struct
                    .fields
                    .iter()
                    .map(|field| (field.key.clone(), self.compile(&field.shape)))
                    .collect();
                let signatures = shape_struct
                    .index_signatures
                    .iter()
                    .map(|signature| {
                        (
                            signature.parameter.clone(),
                            self.compile(&signature.value),
                        )
                    })
                    .collect();
                self.nodes[node] = Node::Struct { fields, signatures };
                node
            }
            ShapeKind::Sequence(sequence) => {
                let node = self.reserve(shape);
                let elements = sequence
                    .elements
                    .iter()
                    .map(|element| self.compile(&element.shape))
                    .collect();
                let rest = sequence.rest.as_ref().map(|rest| self.compile(rest));
                self.nodes[node] = Node::Sequence { elements, rest };
                node
            }
            ShapeKind::Union(members) => {
                let node = self.reserve(shape);
                let members = members
                    .iter()
                    .map(|member| {
                        (
                            Probe::new(member, &mut HashSet::new()),
                            self.compile(member),
                        )
                    })
                    .collect();
                self.nodes[node] = Node::Union { members };
                node
            }
        };

        self.visiting.remove(&id);
        self.memo.entry(id).or_insert_with(|| (shape.clone(), node));
        node
    }

    /// Allocates the slot of a container node and registers it before its
    /// children are compiled, so that references back to it resolve here.
    fn reserve(&mut self, shape: &Shape) -> NodeId {
        let node = self.nodes.len();
        self.nodes.push(Node::Leaf);
        self.memo.insert(shape.id(), (shape.clone(), node));
        node
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use serde_json::json;
    use shape::{Field, IndexSignature, Opaque, Symbol};

    use super::*;

    fn diff(shape: &Shape, from: serde_json::Value, to: serde_json::Value) -> Op {
        Program::compile(shape).diff(&from.into(), &to.into())
    }

    static CATEGORY: LazyLock<Shape> = LazyLock::new(|| {
        Shape::structure([
            Field::required("name", Shape::string()),
            Field::required(
                "children",
                Shape::array(Shape::suspend(|| CATEGORY.clone())),
            ),
        ])
    });

    #[test]
    fn struct_fields() {
        let shape = Shape::structure([
            Field::required("a", Shape::string()),
            Field::required("b", Shape::number()),
        ]);

        assert_eq!(
            diff(&shape, json!({"a": "a", "b": 1}), json!({"a": "b", "b": 2})),
            Op::object(vec![
                ("a".into(), NestedOp::replace("a", "b")),
                ("b".into(), NestedOp::replace(1, 2)),
            ])
        );
        assert_eq!(
            diff(&shape, json!({"a": "a", "b": 1}), json!({"b": 1, "a": "a"})),
            Op::Identical
        );
    }

    #[test]
    fn same_value_leaves() {
        let program = Program::compile(&Shape::number());
        assert_eq!(
            program.diff(&Value::Number(f64::NAN), &Value::Number(f64::NAN)),
            Op::Identical
        );
        assert_eq!(
            program.diff(&Value::Number(0.0), &Value::Number(-0.0)),
            Op::replace(0.0, -0.0)
        );
        assert_eq!(program.diff(&Value::from(1), &Value::from(1)), Op::Identical);
    }

    #[test]
    fn optional_fields() {
        let shape = Shape::structure([
            Field::required("a", Shape::number()),
            Field::optional("b", Shape::number()),
        ]);

        assert_eq!(
            diff(&shape, json!({"a": 1}), json!({"a": 1, "b": 2})),
            Op::object(vec![("b".into(), NestedOp::add(2))])
        );
        assert_eq!(
            diff(&shape, json!({"a": 1, "b": 2}), json!({"a": 1})),
            Op::object(vec![("b".into(), NestedOp::remove(2))])
        );
        assert_eq!(diff(&shape, json!({"a": 1}), json!({"a": 1})), Op::Identical);
    }

    #[test]
    fn undeclared_keys_without_signatures_are_ignored() {
        let shape = Shape::structure([Field::required("a", Shape::number())]);
        assert_eq!(
            diff(&shape, json!({"a": 1, "x": 1}), json!({"a": 1, "x": 2, "y": 3})),
            Op::Identical
        );
    }

    #[test]
    fn records() {
        let shape = Shape::record(Shape::string(), Shape::string());

        assert_eq!(
            diff(&shape, json!({}), json!({"a": "v"})),
            Op::object(vec![("a".into(), NestedOp::add("v"))])
        );
        assert_eq!(
            diff(&shape, json!({"a": "v", "b": "w"}), json!({"c": "x", "b": "y"})),
            Op::object(vec![
                ("a".into(), NestedOp::remove("v")),
                ("b".into(), NestedOp::replace("w", "y")),
                ("c".into(), NestedOp::add("x")),
            ])
        );
    }

    #[test]
    fn symbol_keys_follow_string_keys() {
        let early = Symbol::new("early");
        let late = Symbol::new("late");
        let shape = Shape::structure_with_index(
            [Field::required("id", Shape::number())],
            [
                IndexSignature::new(Shape::string(), Shape::number()),
                IndexSignature::new(Shape::symbol(), Shape::string()),
            ],
        );

        let from = Value::object([
            (PropertyKey::from(late.clone()), Value::from("a")),
            (PropertyKey::from("id"), Value::from(1)),
            (PropertyKey::from("x"), Value::from(1)),
            (PropertyKey::from(early.clone()), Value::from("b")),
        ]);
        let to = Value::object([
            (PropertyKey::from("id"), Value::from(2)),
            (PropertyKey::from(early.clone()), Value::from("c")),
            (PropertyKey::from(late.clone()), Value::from("d")),
            (PropertyKey::from("y"), Value::from(2)),
            (PropertyKey::from("x"), Value::from(1)),
        ]);

        assert_eq!(
            Program::compile(&shape).diff(&from, &to),
            Op::object(vec![
                ("id".into(), NestedOp::replace(1, 2)),
                ("y".into(), NestedOp::add(2)),
                (early.into(), NestedOp::replace("b", "c")),
                (late.into(), NestedOp::replace("a", "d")),
            ])
        );
    }

    #[test]
    fn keys_matching_no_signature_are_ignored() {
        let symbol = Symbol::new("hidden");
        let shape = Shape::record(Shape::string(), Shape::number());

        let from = Value::object([(PropertyKey::from(symbol.clone()), Value::from(1))]);
        let to = Value::object([(PropertyKey::from(symbol), Value::from(2))]);
        assert_eq!(Program::compile(&shape).diff(&from, &to), Op::Identical);
    }

    #[test]
    fn tuples() {
        let shape = Shape::tuple([Shape::string(), Shape::number()]);
        assert_eq!(
            diff(&shape, json!(["a", 1]), json!(["b", 1])),
            Op::array(vec![(0, NestedOp::replace("a", "b"))])
        );
        assert_eq!(diff(&shape, json!(["a", 1]), json!(["a", 1])), Op::Identical);
    }

    #[test]
    fn arrays_are_positional() {
        let shape = Shape::array(Shape::number());

        assert_eq!(
            diff(&shape, json!([1, 2, 3]), json!([1])),
            Op::array(vec![(1, NestedOp::remove(2)), (2, NestedOp::remove(3))])
        );
        assert_eq!(
            diff(&shape, json!([1]), json!([0, 2, 3])),
            Op::array(vec![
                (0, NestedOp::replace(1, 0)),
                (1, NestedOp::add(2)),
                (2, NestedOp::add(3)),
            ])
        );
    }

    #[test]
    fn wrong_container_kind_falls_back_to_leaf() {
        let shape = Shape::structure([Field::required("a", Shape::number())]);
        assert_eq!(
            diff(&shape, json!(null), json!({"a": 1})),
            Op::replace(Value::Null, Value::object([("a", 1)]))
        );

        let shape = Shape::array(Shape::number());
        assert_eq!(
            diff(&shape, json!([1]), json!("x")),
            Op::replace(Value::array([1]), "x")
        );
    }

    #[test]
    fn recursive_shape() {
        let program = Program::compile(&CATEGORY);
        assert_eq!(program.nodes.len(), 3);

        let op = program.diff(
            &json!({"name": "a", "children": [{"name": "b", "children": []}]}).into(),
            &json!({
                "name": "a",
                "children": [
                    {"name": "c", "children": []},
                    {"name": "d", "children": []},
                ]
            })
            .into(),
        );
        assert_eq!(
            op,
            Op::object(vec![(
                "children".into(),
                NestedOp::ArrayOps {
                    entries: vec![
                        (
                            0,
                            NestedOp::ObjectOps {
                                entries: vec![("name".into(), NestedOp::replace("b", "c"))]
                            }
                        ),
                        (
                            1,
                            NestedOp::add(Value::object([
                                ("name", Value::from("d")),
                                ("children", Value::array(Vec::<Value>::new())),
                            ]))
                        ),
                    ]
                }
            )])
        );
    }

    #[test]
    fn json_shape() {
        assert_eq!(
            diff(
                &Shape::json(),
                json!({"a": [1, 2], "b": "x"}),
                json!({"a": [1, 3], "c": true})
            ),
            Op::object(vec![
                (
                    "a".into(),
                    NestedOp::ArrayOps {
                        entries: vec![(1, NestedOp::replace(2, 3))]
                    }
                ),
                ("b".into(), NestedOp::remove("x")),
                ("c".into(), NestedOp::add(true)),
            ])
        );
        assert_eq!(
            diff(&Shape::json(), json!({"a": 1}), json!([1])),
            Op::replace(Value::object([("a", 1)]), Value::array([1]))
        );
    }

    #[test]
    fn union_members() {
        let shape = Shape::union([
            Shape::structure([
                Field::required("kind", Shape::literal("a")),
                Field::required("value", Shape::number()),
            ]),
            Shape::structure([
                Field::required("kind", Shape::literal("b")),
                Field::required("name", Shape::string()),
            ]),
        ]);

        assert_eq!(
            diff(
                &shape,
                json!({"kind": "a", "value": 1}),
                json!({"kind": "a", "value": 2})
            ),
            Op::object(vec![("value".into(), NestedOp::replace(1, 2))])
        );
        assert_eq!(
            diff(
                &shape,
                json!({"kind": "a", "value": 1}),
                json!({"kind": "b", "name": "x"})
            ),
            Op::replace(
                Value::object([("kind", Value::from("a")), ("value", Value::from(1))]),
                Value::object([("kind", "b"), ("name", "x")])
            )
        );
    }

    #[test]
    fn refinements_delegate_to_base() {
        let shape = Shape::structure([Field::required("a", Shape::number())])
            .refine("non-empty", |_| false);
        assert_eq!(
            diff(&shape, json!({"a": 1}), json!({"a": 2})),
            Op::object(vec![("a".into(), NestedOp::replace(1, 2))])
        );
    }

    #[test]
    fn opaque_values_compare_by_handle() {
        let date = Opaque::new("Date", 1_u64);
        let same_date = Opaque::new("Date", 1_u64);

        for shape in [
            Shape::declaration("Date"),
            Shape::transform(Shape::string(), Shape::declaration("Date")),
        ] {
            let program = Program::compile(&shape);
            assert_eq!(
                program.diff(&date.clone().into(), &date.clone().into()),
                Op::Identical
            );
            assert_eq!(
                program.diff(&date.clone().into(), &same_date.clone().into()),
                Op::replace(date.clone(), same_date.clone())
            );
        }
    }

    #[test]
    fn degenerate_cycles_compile_to_leaves() {
        static LOOP: LazyLock<Shape> =
            LazyLock::new(|| Shape::suspend(|| LOOP.clone()).refine("loop", |_| true));

        let program = Program::compile(&LOOP);
        assert_eq!(program.nodes.len(), 1);
        assert_eq!(
            program.diff(&Value::from(1), &Value::from(2)),
            Op::replace(1, 2)
        );
    }

    #[test]
    fn union_members_must_declare_every_key() {
        let shape = Shape::union([
            Shape::structure([Field::required("a", Shape::number())]),
            Shape::structure([
                Field::required("a", Shape::number()),
                Field::required("b", Shape::string()),
            ]),
        ]);
        let from = Value::from(json!({"a": 1, "b": "x"}));
        let to = Value::from(json!({"a": 1, "b": "y"}));

        let op = Program::compile(&shape).diff(&from, &to);
        assert_eq!(op, Op::object(vec![("b".into(), NestedOp::replace("x", "y"))]));
        assert_eq!(op.apply(&from), to);
    }

    #[test]
    fn nested_undeclared_keys_replace_the_union_value() {
        let shape = Shape::union([
            Shape::structure([Field::required(
                "a",
                Shape::structure([Field::required("x", Shape::number())]),
            )]),
            Shape::structure([Field::required(
                "a",
                Shape::structure([
                    Field::required("x", Shape::number()),
                    Field::required("y", Shape::string()),
                ]),
            )]),
        ]);
        let from = Value::from(json!({"a": {"x": 1, "y": "p"}}));
        let to = Value::from(json!({"a": {"x": 1, "y": "q"}}));

        let op = Program::compile(&shape).diff(&from, &to);
        assert_eq!(op, Op::replace(from.clone(), to.clone()));
        assert_eq!(op.apply(&from), to);

        // equal undeclared keys do not force a replacement
        assert_eq!(
            diff(
                &shape,
                json!({"a": {"x": 1, "y": "p"}}),
                json!({"a": {"x": 2, "y": "p"}})
            ),
            Op::object(vec![(
                "a".into(),
                NestedOp::ObjectOps {
                    entries: vec![("x".into(), NestedOp::replace(1, 2))]
                }
            )])
        );
    }

    #[test]
    fn probes_stop_at_the_first_level() {
        let shape = Shape::structure([
            Field::required("kind", Shape::literal("list")),
            Field::required("items", Shape::array(Shape::number())),
            Field::optional("note", Shape::string()),
        ]);
        let probe = Probe::new(&shape, &mut HashSet::new());

        assert!(probe.admits(&json!({"kind": "list", "items": []}).into()));
        // nested items are left to the comparator
        assert!(probe.admits(&json!({"kind": "list", "items": ["x"]}).into()));
        assert!(!probe.admits(&json!({"kind": "map", "items": []}).into()));
        assert!(!probe.admits(&json!({"kind": "list"}).into()));
        assert!(!probe.admits(&json!({"kind": "list", "items": [], "extra": 1}).into()));
        assert!(!probe.admits(&json!({"kind": "list", "items": [], "note": 1}).into()));

        let pair = Shape::tuple([Shape::string(), Shape::number()]);
        let pair = Probe::new(&pair, &mut HashSet::new());
        assert!(pair.admits(&json!(["a", 1]).into()));
        assert!(!pair.admits(&json!(["a", 1, 2]).into()));
        assert!(!pair.admits(&json!([1, "a"]).into()));

        let json = Probe::new(&Shape::json(), &mut HashSet::new());
        assert!(json.admits(&json!([[[["deep"]]]]).into()));
        assert!(!json.admits(&Value::BigInt(1)));
    }

    #[test]
    fn deeply_nested_json() {
        let nest = |leaf: i32| (0..200).fold(Value::from(leaf), |value, _| Value::array([value]));
        let (from, to) = (nest(1), nest(2));

        let op = Program::compile(&Shape::json()).diff(&from, &to);
        let mut depth = 0;
        let mut nested = NestedOp::from_op(op.clone());
        while let Some(NestedOp::ArrayOps { mut entries }) = nested.take() {
            depth += 1;
            nested = entries.pop().map(|(_, op)| op);
        }
        assert_eq!(depth, 200);
        assert_eq!(op.apply(&from), to);
    }
}
