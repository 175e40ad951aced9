use crate::{NestedOp, Op};

impl Op {
    /// The tree that turns the target back into the source.
    ///
    /// Purely structural: values are moved, never compared, and keys and
    /// indices stay where they are.
    pub fn reverse(self) -> Op {
        match self {
            Op::Identical => Op::Identical,
            Op::Replace { from, to } => Op::Replace { from: to, to: from },
            Op::ObjectOps { entries } => Op::ObjectOps {
                entries: reverse_entries(entries),
            },
            Op::ArrayOps { entries } => Op::ArrayOps {
                entries: reverse_entries(entries),
            },
        }
    }
}

impl NestedOp {
    pub fn reverse(self) -> NestedOp {
        match self {
            NestedOp::Replace { from, to } => NestedOp::Replace { from: to, to: from },
            NestedOp::Add { value } => NestedOp::Remove { value },
            NestedOp::Remove { value } => NestedOp::Add { value },
            NestedOp::ObjectOps { entries } => NestedOp::ObjectOps {
                entries: reverse_entries(entries),
            },
            NestedOp::ArrayOps { entries } => NestedOp::ArrayOps {
                entries: reverse_entries(entries),
            },
        }
    }
}

fn reverse_entries<K>(entries: Vec<(K, NestedOp)>) -> Vec<(K, NestedOp)> {
    entries
        .into_iter()
        .map(|(key, op)| (key, op.reverse()))
        .collect()
}
