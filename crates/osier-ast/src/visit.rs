//! In-place tree traversal.
//!
//! `VisitMut` visits every node of a block with mutable access; the default
//! methods recurse, so an implementation overrides only the node kinds it
//! rewrites and calls the matching `walk_*` to keep descending.

use crate::ast::{Block, Expr, Statement};

pub trait VisitMut {
    fn visit_block(&mut self, block: &mut Block) {
        walk_block(self, block);
    }

    fn visit_statement(&mut self, statement: &mut Statement) {
        walk_statement(self, statement);
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_block<V: VisitMut + ?Sized>(visitor: &mut V, block: &mut Block) {
    for statement in &mut block.statements {
        visitor.visit_statement(statement);
    }
}

pub fn walk_statement<V: VisitMut + ?Sized>(visitor: &mut V, statement: &mut Statement) {
    match statement {
        Statement::Block(block) => visitor.visit_block(block),
        Statement::VariableDeclaration(decl) => {
            if let Some(value) = &mut decl.value {
                visitor.visit_expr(value);
            }
        }
        Statement::Assignment(assignment) => visitor.visit_expr(&mut assignment.value),
        Statement::Expression(expr) => visitor.visit_expr(expr),
        Statement::If(if_stmt) => {
            visitor.visit_expr(&mut if_stmt.condition);
            visitor.visit_block(&mut if_stmt.body);
        }
        Statement::Switch(switch) => {
            visitor.visit_expr(&mut switch.expression);
            for case in &mut switch.cases {
                visitor.visit_block(&mut case.body);
            }
            if let Some(default) = &mut switch.default {
                visitor.visit_block(default);
            }
        }
        Statement::ForLoop(for_loop) => {
            visitor.visit_block(&mut for_loop.pre);
            visitor.visit_expr(&mut for_loop.condition);
            visitor.visit_block(&mut for_loop.post);
            visitor.visit_block(&mut for_loop.body);
        }
        Statement::FunctionDefinition(function) => visitor.visit_block(&mut function.body),
        Statement::Break | Statement::Continue | Statement::Leave => {}
    }
}

pub fn walk_expr<V: VisitMut + ?Sized>(visitor: &mut V, expr: &mut Expr) {
    if let Expr::Call(call) = expr {
        for argument in &mut call.arguments {
            visitor.visit_expr(argument);
        }
    }
}
