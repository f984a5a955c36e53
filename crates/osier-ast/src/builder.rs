//! Construction helpers for IR nodes.
//!
//! Passes and tests build trees through these instead of spelling out the
//! struct literals.

use crate::ast::{
    Assignment, Block, Expr, ForLoop, FunctionCall, FunctionDefinition, Identifier, If, Statement,
    Switch, SwitchCase, VariableDeclaration,
};

pub fn literal(value: u64) -> Expr {
    Expr::Literal(value)
}

pub fn ident(name: impl Into<Identifier>) -> Expr {
    Expr::Identifier(name.into())
}

pub fn call(function: impl Into<Identifier>, arguments: Vec<Expr>) -> Expr {
    Expr::Call(FunctionCall {
        function: function.into(),
        arguments,
    })
}

pub fn block(statements: Vec<Statement>) -> Block {
    Block { statements }
}

/// `let name := value`
pub fn var_decl(name: impl Into<Identifier>, value: Expr) -> Statement {
    Statement::VariableDeclaration(VariableDeclaration {
        names: vec![name.into()],
        value: Some(value),
    })
}

/// `let name` (zero-initialized)
pub fn var_decl_empty(name: impl Into<Identifier>) -> Statement {
    Statement::VariableDeclaration(VariableDeclaration {
        names: vec![name.into()],
        value: None,
    })
}

/// `let a, b, ... := value`
pub fn multi_var_decl(names: Vec<Identifier>, value: Expr) -> Statement {
    Statement::VariableDeclaration(VariableDeclaration {
        names,
        value: Some(value),
    })
}

/// `name := value`
pub fn assign(name: impl Into<Identifier>, value: Expr) -> Statement {
    Statement::Assignment(Assignment {
        names: vec![name.into()],
        value,
    })
}

pub fn expr_stmt(expr: Expr) -> Statement {
    Statement::Expression(expr)
}

pub fn if_stmt(condition: Expr, body: Block) -> Statement {
    Statement::If(If { condition, body })
}

pub fn switch_stmt(expression: Expr, cases: Vec<SwitchCase>, default: Option<Block>) -> Statement {
    Statement::Switch(Switch {
        expression,
        cases,
        default,
    })
}

pub fn switch_case(value: u64, body: Block) -> SwitchCase {
    SwitchCase { value, body }
}

pub fn for_loop(pre: Block, condition: Expr, post: Block, body: Block) -> Statement {
    Statement::ForLoop(ForLoop {
        pre,
        condition,
        post,
        body,
    })
}

pub fn function_def(
    name: impl Into<Identifier>,
    parameters: Vec<Identifier>,
    returns: Vec<Identifier>,
    body: Block,
) -> Statement {
    Statement::FunctionDefinition(FunctionDefinition {
        name: name.into(),
        parameters,
        returns,
        body,
    })
}
