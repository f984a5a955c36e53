//! Side-effect and movability analysis.

use osier_ast::ast::Expr;
use osier_ast::Dialect;

/// Decides whether an expression can be evaluated at a different program
/// point without changing observable behavior.
///
/// Literals are trivially movable. Identifiers are always movable: moving
/// a variable reference does not re-execute its definition. A call is
/// movable iff the dialect marks its target movable and every argument is
/// movable; unknown targets never are.
pub struct MovableChecker<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> MovableChecker<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        MovableChecker { dialect }
    }

    pub fn movable(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Literal(_) | Expr::Identifier(_) => true,
            Expr::Call(call) => {
                self.dialect.is_movable_builtin(&call.function)
                    && call.arguments.iter().all(|argument| self.movable(argument))
            }
        }
    }

    /// Whether evaluating the expression writes observable state. Weaker
    /// than movability: `mload(0)` has no side effect but is not movable.
    pub fn side_effect_free(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Literal(_) | Expr::Identifier(_) => true,
            Expr::Call(call) => {
                !self.dialect.has_side_effects(&call.function)
                    && call
                        .arguments
                        .iter()
                        .all(|argument| self.side_effect_free(argument))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osier_ast::builder::*;
    use osier_ast::CoreDialect;

    #[test]
    fn atoms_are_movable() {
        let dialect = CoreDialect::new();
        let checker = MovableChecker::new(&dialect);
        assert!(checker.movable(&literal(7)));
        assert!(checker.movable(&ident("a")));
    }

    #[test]
    fn pure_calls_move_with_their_arguments() {
        let dialect = CoreDialect::new();
        let checker = MovableChecker::new(&dialect);
        assert!(checker.movable(&call("add", vec![ident("a"), literal(1)])));
        assert!(!checker.movable(&call("add", vec![call("mload", vec![literal(0)]), literal(1)])));
    }

    #[test]
    fn memory_reads_are_effect_free_but_not_movable() {
        let dialect = CoreDialect::new();
        let checker = MovableChecker::new(&dialect);
        let load = call("mload", vec![literal(0)]);
        assert!(!checker.movable(&load));
        assert!(checker.side_effect_free(&load));
        let store = call("sstore", vec![literal(0), literal(1)]);
        assert!(!checker.side_effect_free(&store));
    }
}
