//! Expression simplification driver.
//!
//! Applies the rule table bottom-up over every expression in the program.
//! At each node, matches are applied repeatedly until no rule fires; a rule
//! that discards a non-constant operand is applied only when the whole
//! expression is movable, since the discarded operand would otherwise have
//! been evaluated at this program point.
//!
//! `run` is the full pipeline: the tree is first broken into atomic form so
//! the SSA tracker and the rule matchers see simple operands, simplified,
//! then unbroken again. The output of `run` contains no trace of the
//! intermediate temporaries except where a computation must survive for
//! its placement (an orphaned memory read, for example).

use osier_ast::ast::{Block, Expr, Statement};
use osier_ast::printer::print_expr;
use osier_ast::visit::{VisitMut, walk_expr, walk_statement};
use osier_ast::{Dialect, validate};
use tracing::trace;

use crate::error::PassResult;
use crate::expression_breaker::ExpressionBreaker;
use crate::expression_unbreaker::ExpressionUnbreaker;
use crate::name_dispenser::NameDispenser;
use crate::semantics::MovableChecker;
use crate::simplification_rules::find_first_match;
use crate::ssa_value_tracker::{SsaValueTracker, SsaValues};

pub struct ExpressionSimplifier<'a> {
    ssa: SsaValues,
    checker: MovableChecker<'a>,
}

impl<'a> ExpressionSimplifier<'a> {
    pub fn new(ssa: SsaValues, dialect: &'a dyn Dialect) -> Self {
        ExpressionSimplifier {
            ssa,
            checker: MovableChecker::new(dialect),
        }
    }

    /// Break, simplify and unbreak `block` in place.
    pub fn run(block: &mut Block, dialect: &dyn Dialect) -> PassResult<()> {
        validate(block, dialect)?;
        let mut dispenser = NameDispenser::for_block(block);
        let introduced = ExpressionBreaker::run(block, &mut dispenser);
        let ssa = SsaValueTracker::build(block);
        ExpressionSimplifier::new(ssa, dialect).visit_block(block);
        ExpressionUnbreaker::run(block, dialect, &introduced);
        Ok(())
    }
}

impl VisitMut for ExpressionSimplifier<'_> {
    fn visit_statement(&mut self, statement: &mut Statement) {
        walk_statement(self, statement);
        // The tracked value map was built before any rewriting; keep it in
        // step with the tree so later uses resolve through the simplified
        // definition.
        let (names, value) = match statement {
            Statement::VariableDeclaration(decl) => (&decl.names, decl.value.as_ref()),
            Statement::Assignment(assignment) => (&assignment.names, Some(&assignment.value)),
            _ => return,
        };
        if let [name] = names.as_slice()
            && let Some(value) = value
            && self.ssa.contains_key(name)
        {
            self.ssa.insert(name.clone(), value.clone());
        }
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        // Inner expressions first, so a fold can cascade outward.
        walk_expr(self, expr);
        while let Some(m) = find_first_match(expr, &self.ssa) {
            if m.removes_non_constants && !self.checker.movable(expr) {
                break;
            }
            trace!(rule = m.rule, from = %print_expr(expr), to = %print_expr(&m.replacement), "rewriting");
            *expr = m.replacement;
        }
    }
}
