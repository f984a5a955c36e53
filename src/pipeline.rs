use osier_ast::Dialect;
use osier_ast::ast::Block;
use osier_opt::ExpressionSimplifier;
use osier_opt::error::PassResult;

/// Simplify `block` in place: break expressions into atomic form, apply
/// the algebraic rule table everywhere, then restore nesting. Fails
/// without touching the tree when the input references undeclared names
/// or misuses a builtin.
pub fn simplify(block: &mut Block, dialect: &dyn Dialect) -> PassResult<()> {
    ExpressionSimplifier::run(block, dialect)
}
