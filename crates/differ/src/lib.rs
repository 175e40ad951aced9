//! Shape-directed structural diffing.
//!
//! A [`Differ`] is compiled once from a [`Shape`](shape::Shape) and then
//! compares pairs of values of that shape, producing an [`Op`] tree. Op trees
//! can be applied, reversed without recomputing the diff, or lowered into an
//! RFC 6902 patch document.

mod apply;
mod compile;
mod differ;
mod error;
mod json;
mod lower;
mod op;
mod patch;
mod reverse;

pub use differ::{Diffable, Differ};
pub use error::{DecodeError, JsonDiffError, LowerError};
pub use json::JsonDiffer;
pub use lower::lower;
pub use op::{NestedOp, Op};
pub use patch::Patch;
