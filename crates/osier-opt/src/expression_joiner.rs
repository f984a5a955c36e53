//! Expression joining: inline single-use definitions into their use site.
//!
//! Works statement by statement within one block. A single-variable
//! declaration (or the only assignment to a variable) is folded into the
//! immediately following statement when that statement holds the
//! variable's only reference in the whole program and the reference sits
//! at a position that evaluates first: the scan walks the expression left
//! to right (the IR's argument evaluation order), chains into freshly
//! substituted expressions, and stops for good once any scanned
//! subexpression is not movable — joining past it would reorder effects.
//!
//! The pass never reaches across block boundaries: loop init/condition/
//! post and all nested bodies are handled as separate blocks, so a
//! variable used inside a loop is never joined into it. After a block is
//! processed, empty block statements among its direct children are
//! dropped.

use std::collections::{BTreeMap, BTreeSet};

use osier_ast::ast::{Block, Expr, Identifier, Statement};
use osier_ast::printer::print_expr;
use osier_ast::{Dialect, validate};
use tracing::trace;

use crate::error::PassResult;
use crate::name_collector::{count_assignments, count_references};
use crate::semantics::MovableChecker;
use crate::utilities::remove_empty_blocks;

pub struct ExpressionJoiner<'a> {
    dialect: &'a dyn Dialect,
    references: BTreeMap<Identifier, usize>,
    assignments: BTreeMap<Identifier, usize>,
    /// When set, only these names are candidates (used by the unbreaker to
    /// restrict joining to breaker-introduced temporaries).
    candidates: Option<&'a BTreeSet<Identifier>>,
}

impl<'a> ExpressionJoiner<'a> {
    pub fn run(block: &mut Block, dialect: &dyn Dialect) -> PassResult<()> {
        validate(block, dialect)?;
        ExpressionJoiner::run_unchecked(block, dialect, None);
        Ok(())
    }

    /// Pipeline entry point: input was already validated by the caller.
    pub(crate) fn run_unchecked(
        block: &mut Block,
        dialect: &'a dyn Dialect,
        candidates: Option<&BTreeSet<Identifier>>,
    ) {
        let mut joiner = ExpressionJoiner {
            dialect,
            references: count_references(block),
            assignments: count_assignments(block),
            candidates,
        };
        joiner.process_block(block);
    }

    fn process_block(&mut self, block: &mut Block) {
        let statements = std::mem::take(&mut block.statements);
        let mut result: Vec<Statement> = Vec::with_capacity(statements.len());
        for mut statement in statements {
            self.process_nested(&mut statement);
            if let Some(expr) = joinable_target(&mut statement) {
                let mut barrier = false;
                self.scan(expr, &mut result, &mut barrier);
            }
            result.push(statement);
        }
        block.statements = result;
        remove_empty_blocks(block);
    }

    /// Every nested block is its own joining context.
    fn process_nested(&mut self, statement: &mut Statement) {
        match statement {
            Statement::Block(block) => self.process_block(block),
            Statement::If(if_stmt) => self.process_block(&mut if_stmt.body),
            Statement::Switch(switch) => {
                for case in &mut switch.cases {
                    self.process_block(&mut case.body);
                }
                if let Some(default) = &mut switch.default {
                    self.process_block(default);
                }
            }
            Statement::ForLoop(for_loop) => {
                self.process_block(&mut for_loop.pre);
                self.process_block(&mut for_loop.post);
                self.process_block(&mut for_loop.body);
            }
            Statement::FunctionDefinition(function) => self.process_block(&mut function.body),
            _ => {}
        }
    }

    /// Left-to-right scan for the first eligible identifier. `tail` is the
    /// already-emitted prefix of the current block; joins consume its last
    /// statement. `barrier` latches once a non-movable subexpression has
    /// been passed.
    fn scan(&mut self, expr: &mut Expr, tail: &mut Vec<Statement>, barrier: &mut bool) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Identifier(name) => {
                if !*barrier
                    && let Some(value) = self.try_take_definition(name, tail)
                {
                    trace!(variable = %name, value = %print_expr(&value), "joining definition into use site");
                    *expr = value;
                    // Chain further definitions into the substituted
                    // expression; positions inside it still evaluate first.
                    self.scan(expr, tail, barrier);
                }
            }
            Expr::Call(call) => {
                for argument in &mut call.arguments {
                    self.scan(argument, tail, barrier);
                    if !MovableChecker::new(self.dialect).movable(argument) {
                        *barrier = true;
                    }
                }
            }
        }
    }

    /// Pop and return the defining expression of `name` when the previous
    /// statement defines it and the definition is safe to move: exactly
    /// one reference in the whole program, and either a never-reassigned
    /// declaration or the variable's only assignment.
    fn try_take_definition(&mut self, name: &Identifier, tail: &mut Vec<Statement>) -> Option<Expr> {
        if let Some(candidates) = self.candidates
            && !candidates.contains(name)
        {
            return None;
        }
        if self.references.get(name).copied().unwrap_or(0) != 1 {
            return None;
        }
        let assignments = self.assignments.get(name).copied().unwrap_or(0);
        match tail.last() {
            Some(Statement::VariableDeclaration(decl))
                if assignments == 0
                    && decl.names.len() == 1
                    && decl.names[0] == *name
                    && decl.value.is_some() =>
            {
                let Some(Statement::VariableDeclaration(decl)) = tail.pop() else {
                    unreachable!("last statement was just matched as a declaration");
                };
                decl.value
            }
            Some(Statement::Assignment(assignment))
                if assignments == 1
                    && assignment.names.len() == 1
                    && assignment.names[0] == *name =>
            {
                let Some(Statement::Assignment(assignment)) = tail.pop() else {
                    unreachable!("last statement was just matched as an assignment");
                };
                Some(assignment.value)
            }
            _ => None,
        }
    }
}

/// The expressions a statement exposes for joining: evaluated exactly once
/// when control reaches the statement. Loop conditions re-evaluate and
/// nested bodies may not run; neither is a target.
fn joinable_target(statement: &mut Statement) -> Option<&mut Expr> {
    match statement {
        Statement::VariableDeclaration(decl) => decl.value.as_mut(),
        Statement::Assignment(assignment) => Some(&mut assignment.value),
        Statement::Expression(expr) => Some(expr),
        Statement::If(if_stmt) => Some(&mut if_stmt.condition),
        Statement::Switch(switch) => Some(&mut switch.expression),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osier_ast::CoreDialect;
    use osier_ast::builder::*;

    fn joined(mut b: Block) -> Block {
        ExpressionJoiner::run(&mut b, &CoreDialect::new()).unwrap();
        b
    }

    #[test]
    fn chains_through_substituted_expressions() {
        let input = block(vec![
            var_decl("a", call("mload", vec![literal(2)])),
            var_decl("x", call("calldataload", vec![ident("a")])),
            expr_stmt(call("sstore", vec![ident("x"), literal(3)])),
        ]);
        let expected = block(vec![expr_stmt(call(
            "sstore",
            vec![
                call("calldataload", vec![call("mload", vec![literal(2)])]),
                literal(3),
            ],
        ))]);
        assert_eq!(joined(input), expected);
    }

    #[test]
    fn barrier_blocks_later_positions() {
        // After `b` is joined, the substituted mload(6) is not movable, so
        // `a` (which evaluates later) must keep its declaration.
        let input = block(vec![
            var_decl("a", call("mload", vec![literal(2)])),
            var_decl("b", call("mload", vec![literal(6)])),
            var_decl("x", call("mul", vec![call("add", vec![ident("b"), ident("a")]), literal(2)])),
            expr_stmt(call("sstore", vec![ident("x"), literal(3)])),
        ]);
        let expected = block(vec![
            var_decl("a", call("mload", vec![literal(2)])),
            expr_stmt(call(
                "sstore",
                vec![
                    call(
                        "mul",
                        vec![
                            call("add", vec![call("mload", vec![literal(6)]), ident("a")]),
                            literal(2),
                        ],
                    ),
                    literal(3),
                ],
            )),
        ]);
        assert_eq!(joined(input), expected);
    }

    #[test]
    fn definitions_join_one_statement_at_a_time() {
        // `b` joins while `x` is processed; `a` is only adjacent once `x`
        // itself has been folded into the store, and joins there because
        // its position still evaluates first.
        let input = block(vec![
            var_decl("a", call("mload", vec![literal(2)])),
            var_decl("b", call("mload", vec![literal(6)])),
            var_decl("x", call("mul", vec![ident("a"), call("add", vec![literal(2), ident("b")])])),
            expr_stmt(call("sstore", vec![ident("x"), literal(3)])),
        ]);
        let expected = block(vec![expr_stmt(call(
            "sstore",
            vec![
                call(
                    "mul",
                    vec![
                        call("mload", vec![literal(2)]),
                        call("add", vec![literal(2), call("mload", vec![literal(6)])]),
                    ],
                ),
                literal(3),
            ],
        ))]);
        assert_eq!(joined(input), expected);
    }

    #[test]
    fn multiply_referenced_variables_stay() {
        let input = block(vec![
            var_decl("a", call("mload", vec![literal(2)])),
            var_decl("b", call("add", vec![ident("a"), ident("a")])),
        ]);
        assert_eq!(joined(input.clone()), input);
    }

    #[test]
    fn reassigned_variables_stay() {
        let input = block(vec![
            var_decl("a", call("mload", vec![literal(2)])),
            var_decl("b", call("mload", vec![ident("a")])),
            assign("a", literal(4)),
        ]);
        assert_eq!(joined(input.clone()), input);
    }

    #[test]
    fn sole_assignment_is_joinable() {
        let input = block(vec![
            var_decl_empty("a"),
            assign("a", call("calldataload", vec![literal(0)])),
            expr_stmt(call("sstore", vec![ident("a"), literal(1)])),
        ]);
        let expected = block(vec![
            var_decl_empty("a"),
            expr_stmt(call(
                "sstore",
                vec![call("calldataload", vec![literal(0)]), literal(1)],
            )),
        ]);
        assert_eq!(joined(input), expected);
    }

    #[test]
    fn joins_into_if_conditions_but_not_bodies() {
        let input = block(vec![
            var_decl("d", call("calldataload", vec![literal(0)])),
            if_stmt(
                ident("d"),
                block(vec![
                    var_decl("x", call("mload", vec![literal(3)])),
                    var_decl("y", call("add", vec![ident("x"), literal(3)])),
                ]),
            ),
        ]);
        let expected = block(vec![if_stmt(
            call("calldataload", vec![literal(0)]),
            block(vec![var_decl(
                "y",
                call("add", vec![call("mload", vec![literal(3)]), literal(3)]),
            )]),
        )]);
        assert_eq!(joined(input), expected);
    }

    #[test]
    fn never_joins_into_loops() {
        let in_condition = block(vec![for_loop(
            block(vec![var_decl("b", call("mload", vec![literal(1)]))]),
            ident("b"),
            block(vec![]),
            block(vec![]),
        )]);
        assert_eq!(joined(in_condition.clone()), in_condition);

        let into_body = block(vec![
            var_decl("a", call("mload", vec![literal(0)])),
            for_loop(
                block(vec![]),
                literal(1),
                block(vec![]),
                block(vec![expr_stmt(call("sstore", vec![ident("a"), literal(1)]))]),
            ),
        ]);
        assert_eq!(joined(into_body.clone()), into_body);
    }

    #[test]
    fn empty_blocks_do_not_survive_but_do_block_joins() {
        let input = block(vec![
            var_decl("a", call("mload", vec![literal(2)])),
            var_decl("x", call("calldataload", vec![ident("a")])),
            Statement::Block(block(vec![])),
            expr_stmt(call("sstore", vec![ident("x"), literal(3)])),
        ]);
        let expected = block(vec![
            var_decl("x", call("calldataload", vec![call("mload", vec![literal(2)])])),
            expr_stmt(call("sstore", vec![ident("x"), literal(3)])),
        ]);
        assert_eq!(joined(input), expected);
    }

    #[test]
    fn rejects_malformed_programs() {
        let mut b = block(vec![expr_stmt(call("sstore", vec![ident("a"), literal(3)]))]);
        assert!(ExpressionJoiner::run(&mut b, &CoreDialect::new()).is_err());
    }
}
