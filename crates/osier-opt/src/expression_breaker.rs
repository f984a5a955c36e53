//! Expression breaking: flatten nested call arguments.
//!
//! Rewrites a program so that every function call argument is a literal or
//! an identifier, by hoisting each non-atomic argument into a fresh
//! `let`-bound temporary immediately before the enclosing statement.
//! Arguments are processed left to right and inner calls before outer
//! ones, so the hoisted declarations execute in exactly the order the
//! arguments would have evaluated in place.
//!
//! For-loop conditions are re-evaluated every iteration and cannot be
//! hoisted before the loop; they are left untouched, so the flat form
//! holds everywhere except inside them.

use std::collections::BTreeSet;

use osier_ast::ast::{Block, Expr, Identifier, Statement, VariableDeclaration};
use osier_ast::printer::print_expr;
use tracing::trace;

use crate::name_dispenser::NameDispenser;

pub struct ExpressionBreaker<'a> {
    dispenser: &'a mut NameDispenser,
    /// Declarations to splice in front of the statement being processed.
    prelude: Vec<Statement>,
    introduced: BTreeSet<Identifier>,
}

impl<'a> ExpressionBreaker<'a> {
    /// Flatten `block` in place. Returns the names of the temporaries that
    /// were introduced, for the unbreaker to undo later.
    pub fn run(block: &mut Block, dispenser: &'a mut NameDispenser) -> BTreeSet<Identifier> {
        let mut breaker = ExpressionBreaker {
            dispenser,
            prelude: vec![],
            introduced: BTreeSet::new(),
        };
        breaker.process_block(block);
        breaker.introduced
    }

    fn process_block(&mut self, block: &mut Block) {
        let saved = std::mem::take(&mut self.prelude);
        let statements = std::mem::take(&mut block.statements);
        let mut result = Vec::with_capacity(statements.len());
        for mut statement in statements {
            self.process_statement(&mut statement);
            result.append(&mut self.prelude);
            result.push(statement);
        }
        block.statements = result;
        self.prelude = saved;
    }

    fn process_statement(&mut self, statement: &mut Statement) {
        match statement {
            Statement::Block(block) => self.process_block(block),
            Statement::VariableDeclaration(decl) => {
                if let Some(value) = &mut decl.value {
                    self.flatten_arguments(value);
                }
            }
            Statement::Assignment(assignment) => self.flatten_arguments(&mut assignment.value),
            Statement::Expression(expr) => self.flatten_arguments(expr),
            Statement::If(if_stmt) => {
                self.flatten_arguments(&mut if_stmt.condition);
                self.process_block(&mut if_stmt.body);
            }
            Statement::Switch(switch) => {
                self.flatten_arguments(&mut switch.expression);
                for case in &mut switch.cases {
                    self.process_block(&mut case.body);
                }
                if let Some(default) = &mut switch.default {
                    self.process_block(default);
                }
            }
            Statement::ForLoop(for_loop) => {
                // The condition is an opaque boundary.
                self.process_block(&mut for_loop.pre);
                self.process_block(&mut for_loop.post);
                self.process_block(&mut for_loop.body);
            }
            Statement::FunctionDefinition(function) => self.process_block(&mut function.body),
            Statement::Break | Statement::Continue | Statement::Leave => {}
        }
    }

    /// Make every argument of `expr` (and of its nested calls) atomic.
    /// The expression itself keeps its shape.
    fn flatten_arguments(&mut self, expr: &mut Expr) {
        if let Expr::Call(call) = expr {
            for argument in &mut call.arguments {
                self.flatten_arguments(argument);
                if !argument.is_atomic() {
                    self.hoist(argument);
                }
            }
        }
    }

    fn hoist(&mut self, argument: &mut Expr) {
        let name = self.dispenser.fresh("t");
        let value = std::mem::replace(argument, Expr::Identifier(name.clone()));
        trace!(temporary = %name, value = %print_expr(&value), "hoisting call argument");
        self.prelude.push(Statement::VariableDeclaration(VariableDeclaration {
            names: vec![name.clone()],
            value: Some(value),
        }));
        self.introduced.insert(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osier_ast::builder::*;

    fn run(block_in: &mut Block) -> BTreeSet<Identifier> {
        let mut dispenser = NameDispenser::for_block(block_in);
        ExpressionBreaker::run(block_in, &mut dispenser)
    }

    #[test]
    fn hoists_nested_calls_in_evaluation_order() {
        let mut b = block(vec![expr_stmt(call(
            "sstore",
            vec![
                call("add", vec![call("mload", vec![literal(1)]), call("mload", vec![literal(2)])]),
                literal(3),
            ],
        ))]);
        let introduced = run(&mut b);
        assert_eq!(
            b,
            block(vec![
                var_decl("t_1", call("mload", vec![literal(1)])),
                var_decl("t_2", call("mload", vec![literal(2)])),
                var_decl("t_3", call("add", vec![ident("t_1"), ident("t_2")])),
                expr_stmt(call("sstore", vec![ident("t_3"), literal(3)])),
            ])
        );
        assert_eq!(introduced.len(), 3);
    }

    #[test]
    fn already_flat_input_is_untouched() {
        let mut b = block(vec![
            var_decl("a", call("mload", vec![literal(2)])),
            expr_stmt(call("sstore", vec![ident("a"), literal(3)])),
        ]);
        let original = b.clone();
        let introduced = run(&mut b);
        assert_eq!(b, original);
        assert!(introduced.is_empty());
    }

    #[test]
    fn if_conditions_are_flattened_before_the_statement() {
        let mut b = block(vec![if_stmt(
            call("iszero", vec![call("mload", vec![literal(0)])]),
            block(vec![Statement::Break]),
        )]);
        run(&mut b);
        assert_eq!(
            b,
            block(vec![
                var_decl("t_1", call("mload", vec![literal(0)])),
                if_stmt(call("iszero", vec![ident("t_1")]), block(vec![Statement::Break])),
            ])
        );
    }

    #[test]
    fn loop_conditions_are_left_alone() {
        let mut b = block(vec![
            var_decl("i", literal(0)),
            for_loop(
                block(vec![]),
                call("lt", vec![ident("i"), call("mload", vec![literal(0)])]),
                block(vec![assign("i", call("add", vec![ident("i"), literal(1)]))]),
                block(vec![]),
            ),
        ]);
        let original = b.clone();
        run(&mut b);
        assert_eq!(b, original);
    }
}
