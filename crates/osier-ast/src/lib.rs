//! Tree IR for the osier optimiser.
//!
//! The IR is a statically scoped, expression-oriented block language:
//! blocks of statements, variable declarations and assignments, function
//! calls, and structured control flow (if/switch/for). Every node is
//! exclusively owned by its parent, so passes mutate the tree in place by
//! replacing children.

pub mod ast;
pub mod builder;
pub mod builtins;
pub mod printer;
pub mod validation;
pub mod visit;

pub use ast::{
    Assignment, Block, Expr, ForLoop, FunctionCall, FunctionDefinition, Identifier, If, Statement,
    Switch, SwitchCase, VariableDeclaration,
};
pub use builtins::{BuiltinFunction, CoreDialect, Dialect};
pub use validation::{validate, ValidationError};
pub use visit::VisitMut;
