//! Compact text rendering of the IR.
//!
//! Used for tracing output and test-failure diagnostics; this is not a
//! round-trippable source printer.

use std::fmt::Write;

use crate::ast::{Block, Expr, Statement};

pub fn print_block(block: &Block) -> String {
    let mut out = String::new();
    write_block(&mut out, block);
    out
}

pub fn print_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

pub fn print_statement(statement: &Statement) -> String {
    let mut out = String::new();
    write_statement(&mut out, statement);
    out
}

fn write_block(out: &mut String, block: &Block) {
    out.push('{');
    for statement in &block.statements {
        out.push(' ');
        write_statement(out, statement);
    }
    out.push_str(" }");
}

fn write_statement(out: &mut String, statement: &Statement) {
    match statement {
        Statement::Block(block) => write_block(out, block),
        Statement::VariableDeclaration(decl) => {
            out.push_str("let ");
            out.push_str(&decl.names.join(", "));
            if let Some(value) = &decl.value {
                out.push_str(" := ");
                write_expr(out, value);
            }
        }
        Statement::Assignment(assignment) => {
            out.push_str(&assignment.names.join(", "));
            out.push_str(" := ");
            write_expr(out, &assignment.value);
        }
        Statement::Expression(expr) => write_expr(out, expr),
        Statement::If(if_stmt) => {
            out.push_str("if ");
            write_expr(out, &if_stmt.condition);
            out.push(' ');
            write_block(out, &if_stmt.body);
        }
        Statement::Switch(switch) => {
            out.push_str("switch ");
            write_expr(out, &switch.expression);
            for case in &switch.cases {
                let _ = write!(out, " case {} ", case.value);
                write_block(out, &case.body);
            }
            if let Some(default) = &switch.default {
                out.push_str(" default ");
                write_block(out, default);
            }
        }
        Statement::ForLoop(for_loop) => {
            out.push_str("for ");
            write_block(out, &for_loop.pre);
            out.push(' ');
            write_expr(out, &for_loop.condition);
            out.push(' ');
            write_block(out, &for_loop.post);
            out.push(' ');
            write_block(out, &for_loop.body);
        }
        Statement::FunctionDefinition(function) => {
            let _ = write!(out, "function {}({})", function.name, function.parameters.join(", "));
            if !function.returns.is_empty() {
                let _ = write!(out, " -> {}", function.returns.join(", "));
            }
            out.push(' ');
            write_block(out, &function.body);
        }
        Statement::Break => out.push_str("break"),
        Statement::Continue => out.push_str("continue"),
        Statement::Leave => out.push_str("leave"),
    }
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Literal(value) => {
            let _ = write!(out, "{value}");
        }
        Expr::Identifier(name) => out.push_str(name),
        Expr::Call(call) => {
            out.push_str(&call.function);
            out.push('(');
            for (i, argument) in call.arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, argument);
            }
            out.push(')');
        }
    }
}
