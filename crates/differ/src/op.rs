use serde::Serialize;
use shape::{PropertyKey, Value};

/// Result of comparing two values of the same shape.
///
/// `Replace` keeps the previous value so that every tree can be reversed
/// without looking at the original document. Build container ops with
/// [`Op::object`] and [`Op::array`], which collapse an empty entry list to
/// `Identical`. An `ObjectOps` or `ArrayOps` written out with no entries is
/// still accepted: it applies and lowers as a no-op and counts as identical.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Op {
    Identical,
    Replace {
        from: Value,
        to: Value,
    },
    ObjectOps {
        entries: Vec<(PropertyKey, NestedOp)>,
    },
    ArrayOps {
        entries: Vec<(usize, NestedOp)>,
    },
}

/// Change to a single property or element of a container.
///
/// Array indices follow one discipline, shared by apply and lowering:
/// in-place entries (`Replace`, `ObjectOps`, `ArrayOps`) and `Remove` address
/// the source array, `Add` addresses the resulting array. In-place entries
/// must sit below every `Add`/`Remove` index, which holds for every tree a
/// differ produces.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum NestedOp {
    Replace {
        from: Value,
        to: Value,
    },
    Add {
        value: Value,
    },
    Remove {
        value: Value,
    },
    ObjectOps {
        entries: Vec<(PropertyKey, NestedOp)>,
    },
    ArrayOps {
        entries: Vec<(usize, NestedOp)>,
    },
}

impl Op {
    pub fn replace(from: impl Into<Value>, to: impl Into<Value>) -> Op {
        Op::Replace {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn object(entries: Vec<(PropertyKey, NestedOp)>) -> Op {
        if entries.is_empty() {
            Op::Identical
        } else {
            Op::ObjectOps { entries }
        }
    }

    pub fn array(entries: Vec<(usize, NestedOp)>) -> Op {
        if entries.is_empty() {
            Op::Identical
        } else {
            Op::ArrayOps { entries }
        }
    }

    #[inline]
    pub fn is_identical(&self) -> bool {
        match self {
            Op::Identical => true,
            Op::Replace { .. } => false,
            Op::ObjectOps { entries } => entries.is_empty(),
            Op::ArrayOps { entries } => entries.is_empty(),
        }
    }
}

impl NestedOp {
    pub fn replace(from: impl Into<Value>, to: impl Into<Value>) -> NestedOp {
        NestedOp::Replace {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn add(value: impl Into<Value>) -> NestedOp {
        NestedOp::Add {
            value: value.into(),
        }
    }

    pub fn remove(value: impl Into<Value>) -> NestedOp {
        NestedOp::Remove {
            value: value.into(),
        }
    }

    /// The child-level form of a comparison result; `None` when identical.
    pub fn from_op(op: Op) -> Option<NestedOp> {
        if op.is_identical() {
            return None;
        }
        match op {
            Op::Identical => None,
            Op::Replace { from, to } => Some(NestedOp::Replace { from, to }),
            Op::ObjectOps { entries } => Some(NestedOp::ObjectOps { entries }),
            Op::ArrayOps { entries } => Some(NestedOp::ArrayOps { entries }),
        }
    }

    #[inline]
    pub(crate) fn is_structural(&self) -> bool {
        matches!(self, NestedOp::Add { .. } | NestedOp::Remove { .. })
    }
}
