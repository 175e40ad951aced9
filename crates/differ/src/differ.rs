use std::{
    borrow::Cow,
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
    sync::Arc,
};

use shape::{Shape, Value};

use crate::{compile::Program, DecodeError, Patch};

/// A type that has a shape and maps to and from [`Value`].
pub trait Diffable: Sized {
    fn shape() -> Shape;

    fn encode(&self) -> Cow<'_, Value>;

    fn decode(value: Value) -> Result<Self, DecodeError>;
}

impl Diffable for Value {
    fn shape() -> Shape {
        Shape::unknown()
    }

    fn encode(&self) -> Cow<'_, Value> {
        Cow::Borrowed(self)
    }

    fn decode(value: Value) -> Result<Self, DecodeError> {
        Ok(value)
    }
}

/// A shape compiled once and reused for any number of comparisons.
///
/// Cloning shares the compiled program; a `Differ` can be used from many
/// threads at once.
pub struct Differ<A = Value> {
    program: Arc<Program>,
    marker: PhantomData<fn() -> A>,
}

impl Differ<Value> {
    /// Compiles a differ for dynamic values of `shape`.
    pub fn compile(shape: &Shape) -> Self {
        Self::with_program(Program::compile(shape))
    }
}

impl<A> Differ<A> {
    fn with_program(program: Program) -> Self {
        Self {
            program: Arc::new(program),
            marker: PhantomData,
        }
    }
}

impl<A: Diffable> Differ<A> {
    pub fn new() -> Self {
        Self::with_program(Program::compile(&A::shape()))
    }

    /// Compares two values. Never fails: values outside the shape are
    /// compared as leaves wherever their structure does not match.
    pub fn diff(&self, from: &A, to: &A) -> Patch<A> {
        Patch::new(self.program.diff(&from.encode(), &to.encode()))
    }
}

impl<A: Diffable> Default for Differ<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for Differ<A> {
    fn clone(&self) -> Self {
        Self {
            program: Arc::clone(&self.program),
            marker: PhantomData,
        }
    }
}

impl<A> Debug for Differ<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Differ")
            .field("program", &self.program)
            .finish()
    }
}
