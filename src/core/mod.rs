//! Core invoice types, the totals engine, and document numbering.
//!
//! Everything here is pure and synchronous: totals computations are
//! side-effect-free functions over immutable inputs, safe to run in
//! parallel across unrelated documents.

mod builder;
mod error;
mod numbering;
mod totals;
mod types;

pub use builder::*;
pub use error::*;
pub use numbering::*;
pub use totals::*;
pub use types::*;
