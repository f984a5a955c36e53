//! Small shared helpers for the optimiser passes.

use osier_ast::ast::{Block, Statement};

/// Remove statements that are just empty blocks. Only direct children of
/// `block` are checked; callers that process nested blocks first get the
/// cascading effect for free.
pub fn remove_empty_blocks(block: &mut Block) {
    block
        .statements
        .retain(|statement| !matches!(statement, Statement::Block(inner) if inner.is_empty()));
}
