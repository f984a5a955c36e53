//! Expression unbreaking: undo the breaker's flattening.
//!
//! Re-inlines the single-use temporaries the breaker introduced, using the
//! joiner engine restricted to exactly those names, then deletes
//! temporaries whose last use disappeared during simplification — but only
//! when their initializer is movable, so a computation kept for its
//! effects still runs.

use std::collections::BTreeSet;

use osier_ast::Dialect;
use osier_ast::ast::{Block, Identifier, Statement};

use crate::expression_joiner::ExpressionJoiner;
use crate::name_collector::count_references;
use crate::semantics::MovableChecker;

pub struct ExpressionUnbreaker;

impl ExpressionUnbreaker {
    /// `introduced` is the set of temporary names the breaker created for
    /// this same program; nothing else is touched.
    ///
    /// Joining and pruning run to a fixed point: deleting a dead temporary
    /// can make the declarations on either side of it adjacent again and
    /// expose a join the first pass had to skip. Each round strictly
    /// shrinks the tree, so the loop terminates.
    pub fn run(block: &mut Block, dialect: &dyn Dialect, introduced: &BTreeSet<Identifier>) {
        loop {
            let before = block.clone();
            ExpressionJoiner::run_unchecked(block, dialect, Some(introduced));
            prune_unused_temporaries(block, dialect, introduced);
            if *block == before {
                break;
            }
        }
    }
}

fn prune_unused_temporaries(
    block: &mut Block,
    dialect: &dyn Dialect,
    introduced: &BTreeSet<Identifier>,
) {
    let references = count_references(block);
    let checker = MovableChecker::new(dialect);
    let prunable = |statement: &Statement| -> bool {
        let Statement::VariableDeclaration(decl) = statement else {
            return false;
        };
        let [name] = decl.names.as_slice() else {
            return false;
        };
        introduced.contains(name)
            && references.get(name).copied().unwrap_or(0) == 0
            && decl.value.as_ref().is_none_or(|value| checker.movable(value))
    };
    prune_blocks(block, &prunable);
}

fn prune_blocks(block: &mut Block, prunable: &dyn Fn(&Statement) -> bool) {
    block.statements.retain(|statement| !prunable(statement));
    for statement in &mut block.statements {
        match statement {
            Statement::Block(inner) => prune_blocks(inner, prunable),
            Statement::If(if_stmt) => prune_blocks(&mut if_stmt.body, prunable),
            Statement::Switch(switch) => {
                for case in &mut switch.cases {
                    prune_blocks(&mut case.body, prunable);
                }
                if let Some(default) = &mut switch.default {
                    prune_blocks(default, prunable);
                }
            }
            Statement::ForLoop(for_loop) => {
                prune_blocks(&mut for_loop.pre, prunable);
                prune_blocks(&mut for_loop.post, prunable);
                prune_blocks(&mut for_loop.body, prunable);
            }
            Statement::FunctionDefinition(function) => prune_blocks(&mut function.body, prunable),
            _ => {}
        }
    }
}
