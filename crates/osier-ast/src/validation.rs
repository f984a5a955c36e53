//! Scope validation.
//!
//! Passes must not transform malformed programs; they run this check first
//! and fail loudly instead of substituting a wrong value (for example when
//! an identifier has no enclosing declaration).

use std::collections::BTreeSet;

use crate::ast::{Block, Expr, Identifier, Statement};
use crate::builtins::Dialect;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ValidationError {
    #[display("reference to undeclared variable `{name}`")]
    UndeclaredVariable { name: Identifier },
    #[display("assignment to undeclared variable `{name}`")]
    AssignmentToUndeclared { name: Identifier },
    #[display("call to unknown function `{name}`")]
    UnknownFunction { name: Identifier },
    #[display("builtin `{name}` expects {expected} arguments, got {actual}")]
    BuiltinArity {
        name: Identifier,
        expected: usize,
        actual: usize,
    },
}

/// Check that every identifier is declared in an enclosing scope at its
/// point of use and that every call target is a known builtin or a visible
/// function.
pub fn validate(block: &Block, dialect: &dyn Dialect) -> Result<(), ValidationError> {
    let mut checker = ScopeChecker {
        dialect,
        variables: vec![],
        functions: vec![],
    };
    checker.check_block(block)
}

struct ScopeChecker<'a> {
    dialect: &'a dyn Dialect,
    variables: Vec<BTreeSet<&'a Identifier>>,
    functions: Vec<BTreeSet<&'a Identifier>>,
}

impl<'a> ScopeChecker<'a> {
    fn check_block(&mut self, block: &'a Block) -> Result<(), ValidationError> {
        self.enter_block(block);
        for statement in &block.statements {
            self.check_statement(statement)?;
        }
        self.leave_block();
        Ok(())
    }

    /// Function names are hoisted: visible in the whole declaring block.
    fn enter_block(&mut self, block: &'a Block) {
        self.variables.push(BTreeSet::new());
        let mut functions = BTreeSet::new();
        for statement in &block.statements {
            if let Statement::FunctionDefinition(function) = statement {
                functions.insert(&function.name);
            }
        }
        self.functions.push(functions);
    }

    fn leave_block(&mut self) {
        self.variables.pop();
        self.functions.pop();
    }

    fn check_statement(&mut self, statement: &'a Statement) -> Result<(), ValidationError> {
        match statement {
            Statement::Block(block) => self.check_block(block),
            Statement::VariableDeclaration(decl) => {
                if let Some(value) = &decl.value {
                    self.check_expr(value)?;
                }
                let scope = self
                    .variables
                    .last_mut()
                    .expect("a block scope is open while its statements are checked");
                for name in &decl.names {
                    scope.insert(name);
                }
                Ok(())
            }
            Statement::Assignment(assignment) => {
                self.check_expr(&assignment.value)?;
                for name in &assignment.names {
                    if !self.variable_visible(name) {
                        return Err(ValidationError::AssignmentToUndeclared { name: name.clone() });
                    }
                }
                Ok(())
            }
            Statement::Expression(expr) => self.check_expr(expr),
            Statement::If(if_stmt) => {
                self.check_expr(&if_stmt.condition)?;
                self.check_block(&if_stmt.body)
            }
            Statement::Switch(switch) => {
                self.check_expr(&switch.expression)?;
                for case in &switch.cases {
                    self.check_block(&case.body)?;
                }
                if let Some(default) = &switch.default {
                    self.check_block(default)?;
                }
                Ok(())
            }
            Statement::ForLoop(for_loop) => {
                // The scope of the pre block spans condition, post and body.
                self.enter_block(&for_loop.pre);
                for pre_statement in &for_loop.pre.statements {
                    self.check_statement(pre_statement)?;
                }
                self.check_expr(&for_loop.condition)?;
                self.check_block(&for_loop.body)?;
                self.check_block(&for_loop.post)?;
                self.leave_block();
                Ok(())
            }
            Statement::FunctionDefinition(function) => {
                // Function bodies see no outer variables, only functions.
                let outer_variables = std::mem::take(&mut self.variables);
                let mut scope = BTreeSet::new();
                scope.extend(function.parameters.iter());
                scope.extend(function.returns.iter());
                self.variables.push(scope);
                let result = self.check_block(&function.body);
                self.variables = outer_variables;
                result
            }
            Statement::Break | Statement::Continue | Statement::Leave => Ok(()),
        }
    }

    fn check_expr(&mut self, expr: &'a Expr) -> Result<(), ValidationError> {
        match expr {
            Expr::Literal(_) => Ok(()),
            Expr::Identifier(name) => {
                if self.variable_visible(name) {
                    Ok(())
                } else {
                    Err(ValidationError::UndeclaredVariable { name: name.clone() })
                }
            }
            Expr::Call(call) => {
                if let Some(builtin) = self.dialect.builtin(&call.function) {
                    if builtin.parameters != call.arguments.len() {
                        return Err(ValidationError::BuiltinArity {
                            name: call.function.clone(),
                            expected: builtin.parameters,
                            actual: call.arguments.len(),
                        });
                    }
                } else if !self.function_visible(&call.function) {
                    return Err(ValidationError::UnknownFunction {
                        name: call.function.clone(),
                    });
                }
                for argument in &call.arguments {
                    self.check_expr(argument)?;
                }
                Ok(())
            }
        }
    }

    fn variable_visible(&self, name: &Identifier) -> bool {
        self.variables.iter().rev().any(|scope| scope.contains(name))
    }

    fn function_visible(&self, name: &Identifier) -> bool {
        self.functions.iter().rev().any(|scope| scope.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;
    use crate::builtins::CoreDialect;

    #[test]
    fn accepts_well_scoped_program() {
        let b = block(vec![
            var_decl("a", call("mload", vec![literal(2)])),
            expr_stmt(call("sstore", vec![ident("a"), literal(3)])),
        ]);
        assert_eq!(validate(&b, &CoreDialect::new()), Ok(()));
    }

    #[test]
    fn rejects_undeclared_reference() {
        let b = block(vec![expr_stmt(call("sstore", vec![ident("a"), literal(3)]))]);
        assert_eq!(
            validate(&b, &CoreDialect::new()),
            Err(ValidationError::UndeclaredVariable { name: "a".into() })
        );
    }

    #[test]
    fn for_pre_scope_covers_condition() {
        let b = block(vec![for_loop(
            block(vec![var_decl("b", call("mload", vec![literal(1)]))]),
            ident("b"),
            block(vec![]),
            block(vec![]),
        )]);
        assert_eq!(validate(&b, &CoreDialect::new()), Ok(()));
    }

    #[test]
    fn function_bodies_cannot_see_outer_variables() {
        let b = block(vec![
            var_decl("a", literal(1)),
            function_def(
                "f",
                vec!["x".into()],
                vec!["y".into()],
                block(vec![assign("y", ident("a"))]),
            ),
        ]);
        assert_eq!(
            validate(&b, &CoreDialect::new()),
            Err(ValidationError::UndeclaredVariable { name: "a".into() })
        );
    }

    #[test]
    fn builtin_arity_is_checked() {
        let b = block(vec![expr_stmt(call("sstore", vec![literal(0)]))]);
        assert_eq!(
            validate(&b, &CoreDialect::new()),
            Err(ValidationError::BuiltinArity {
                name: "sstore".into(),
                expected: 2,
                actual: 1,
            })
        );
    }
}
