use std::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
};

use json_patch::JsonPatch;
use shape::Value;

use crate::{DecodeError, Diffable, LowerError, Op};

/// An [`Op`] tagged with the type of the values it was computed from.
pub struct Patch<A = Value> {
    op: Op,
    marker: PhantomData<fn() -> A>,
}

impl<A> Patch<A> {
    #[inline]
    pub fn new(op: Op) -> Self {
        Self {
            op,
            marker: PhantomData,
        }
    }

    #[inline]
    pub fn op(&self) -> &Op {
        &self.op
    }

    #[inline]
    pub fn into_op(self) -> Op {
        self.op
    }

    #[inline]
    pub fn is_identical(&self) -> bool {
        self.op.is_identical()
    }

    pub fn reverse(self) -> Self {
        Self::new(self.op.reverse())
    }

    /// Applies the patch to an encoded value.
    pub fn apply_value(&self, value: &Value) -> Value {
        self.op.apply(value)
    }

    pub fn to_json_patch(&self) -> Result<Vec<JsonPatch>, LowerError> {
        self.op.to_json_patch()
    }
}

impl<A: Diffable> Patch<A> {
    /// Applies the patch to `value`; only decoding the result can fail.
    pub fn apply(&self, value: &A) -> Result<A, DecodeError> {
        A::decode(self.op.apply(&value.encode()))
    }
}

impl<A> Clone for Patch<A> {
    fn clone(&self) -> Self {
        Self::new(self.op.clone())
    }
}

impl<A> Debug for Patch<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Patch").field(&self.op).finish()
    }
}

impl<A> PartialEq for Patch<A> {
    fn eq(&self, other: &Self) -> bool {
        self.op == other.op
    }
}

impl<A> Eq for Patch<A> {}

impl<A> From<Op> for Patch<A> {
    fn from(op: Op) -> Self {
        Self::new(op)
    }
}
