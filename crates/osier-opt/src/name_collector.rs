//! Name inventory and whole-program counters.
//!
//! `NameCollector` gathers every identifier a program declares or
//! references; the reference and assignment counters feed the joiner's
//! single-use analysis.

use std::collections::{BTreeMap, BTreeSet};

use osier_ast::ast::{Block, Expr, Identifier, Statement};

/// Collects every name that is declared or referenced anywhere in a block.
#[derive(Debug, Default)]
pub struct NameCollector {
    names: BTreeSet<Identifier>,
}

impl NameCollector {
    pub fn collect(block: &Block) -> BTreeSet<Identifier> {
        let mut collector = NameCollector::default();
        collector.block(block);
        collector.names
    }

    fn block(&mut self, block: &Block) {
        for statement in &block.statements {
            self.statement(statement);
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Block(block) => self.block(block),
            Statement::VariableDeclaration(decl) => {
                self.names.extend(decl.names.iter().cloned());
                if let Some(value) = &decl.value {
                    self.expr(value);
                }
            }
            Statement::Assignment(assignment) => {
                self.names.extend(assignment.names.iter().cloned());
                self.expr(&assignment.value);
            }
            Statement::Expression(expr) => self.expr(expr),
            Statement::If(if_stmt) => {
                self.expr(&if_stmt.condition);
                self.block(&if_stmt.body);
            }
            Statement::Switch(switch) => {
                self.expr(&switch.expression);
                for case in &switch.cases {
                    self.block(&case.body);
                }
                if let Some(default) = &switch.default {
                    self.block(default);
                }
            }
            Statement::ForLoop(for_loop) => {
                self.block(&for_loop.pre);
                self.expr(&for_loop.condition);
                self.block(&for_loop.post);
                self.block(&for_loop.body);
            }
            Statement::FunctionDefinition(function) => {
                self.names.insert(function.name.clone());
                self.names.extend(function.parameters.iter().cloned());
                self.names.extend(function.returns.iter().cloned());
                self.block(&function.body);
            }
            Statement::Break | Statement::Continue | Statement::Leave => {}
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Identifier(name) => {
                self.names.insert(name.clone());
            }
            Expr::Call(call) => {
                self.names.insert(call.function.clone());
                for argument in &call.arguments {
                    self.expr(argument);
                }
            }
        }
    }
}

/// Number of times each variable is referenced in expression position,
/// across the whole program.
pub fn count_references(block: &Block) -> BTreeMap<Identifier, usize> {
    let mut references = BTreeMap::new();
    for_each_expr(block, &mut |expr| {
        count_expr_references(expr, &mut references);
    });
    references
}

fn count_expr_references(expr: &Expr, references: &mut BTreeMap<Identifier, usize>) {
    match expr {
        Expr::Identifier(name) => {
            *references.entry(name.clone()).or_insert(0) += 1;
        }
        Expr::Call(call) => {
            for argument in &call.arguments {
                count_expr_references(argument, references);
            }
        }
        Expr::Literal(_) => {}
    }
}

/// Number of assignment statements targeting each variable, across the
/// whole program. Declarations do not count.
pub fn count_assignments(block: &Block) -> BTreeMap<Identifier, usize> {
    let mut assignments = BTreeMap::new();
    count_block_assignments(block, &mut assignments);
    assignments
}

fn count_block_assignments(block: &Block, assignments: &mut BTreeMap<Identifier, usize>) {
    for statement in &block.statements {
        match statement {
            Statement::Assignment(assignment) => {
                for name in &assignment.names {
                    *assignments.entry(name.clone()).or_insert(0) += 1;
                }
            }
            Statement::Block(inner) => count_block_assignments(inner, assignments),
            Statement::If(if_stmt) => count_block_assignments(&if_stmt.body, assignments),
            Statement::Switch(switch) => {
                for case in &switch.cases {
                    count_block_assignments(&case.body, assignments);
                }
                if let Some(default) = &switch.default {
                    count_block_assignments(default, assignments);
                }
            }
            Statement::ForLoop(for_loop) => {
                count_block_assignments(&for_loop.pre, assignments);
                count_block_assignments(&for_loop.post, assignments);
                count_block_assignments(&for_loop.body, assignments);
            }
            Statement::FunctionDefinition(function) => {
                count_block_assignments(&function.body, assignments);
            }
            _ => {}
        }
    }
}

/// Apply `f` to the top-level expression of every statement, recursively
/// through all nested blocks.
fn for_each_expr(block: &Block, f: &mut impl FnMut(&Expr)) {
    for statement in &block.statements {
        match statement {
            Statement::Block(inner) => for_each_expr(inner, f),
            Statement::VariableDeclaration(decl) => {
                if let Some(value) = &decl.value {
                    f(value);
                }
            }
            Statement::Assignment(assignment) => f(&assignment.value),
            Statement::Expression(expr) => f(expr),
            Statement::If(if_stmt) => {
                f(&if_stmt.condition);
                for_each_expr(&if_stmt.body, f);
            }
            Statement::Switch(switch) => {
                f(&switch.expression);
                for case in &switch.cases {
                    for_each_expr(&case.body, f);
                }
                if let Some(default) = &switch.default {
                    for_each_expr(default, f);
                }
            }
            Statement::ForLoop(for_loop) => {
                for_each_expr(&for_loop.pre, f);
                f(&for_loop.condition);
                for_each_expr(&for_loop.post, f);
                for_each_expr(&for_loop.body, f);
            }
            Statement::FunctionDefinition(function) => for_each_expr(&function.body, f),
            Statement::Break | Statement::Continue | Statement::Leave => {}
        }
    }
}
