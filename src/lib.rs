//! osier: expression-level optimisation for a small block-structured IR.
//!
//! The workspace splits into [`osier_ast`] (the tree data model, builders,
//! dialect metadata and validation) and [`osier_opt`] (the passes). This
//! crate re-exports both and offers the canonical pass ordering as a
//! single call, [`simplify`].

pub use osier_ast as ast;
pub use osier_opt as opt;

pub use osier_ast::{CoreDialect, Dialect};
pub use osier_opt::error::{PassError, PassResult};

mod pipeline;
pub use pipeline::simplify;
