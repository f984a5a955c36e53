//! Expression rewriting passes for the osier IR.
//!
//! Every pass operates on one program tree with exclusive mutable access
//! and consults the dialect's builtin metadata for all legality decisions.
//! The canonical simplification run is
//! [`ExpressionSimplifier::run`](expression_simplifier::ExpressionSimplifier::run):
//! it flattens nested call arguments into named temporaries, rewrites
//! expressions against the algebraic rule table, and re-inlines the
//! temporaries it introduced. [`ExpressionJoiner`](expression_joiner::ExpressionJoiner)
//! is an independent cleanup pass that inlines arbitrary single-use
//! definitions into their use site.

pub mod error;
pub mod expression_breaker;
pub mod expression_joiner;
pub mod expression_simplifier;
pub mod expression_unbreaker;
pub mod name_collector;
pub mod name_dispenser;
pub mod semantics;
pub mod simplification_rules;
pub mod ssa_value_tracker;
pub mod utilities;

pub use error::PassError;
pub use expression_breaker::ExpressionBreaker;
pub use expression_joiner::ExpressionJoiner;
pub use expression_simplifier::ExpressionSimplifier;
pub use expression_unbreaker::ExpressionUnbreaker;
pub use name_collector::NameCollector;
pub use name_dispenser::NameDispenser;
pub use semantics::MovableChecker;
pub use simplification_rules::{find_first_match, Match};
pub use ssa_value_tracker::{SsaValueTracker, SsaValues};
pub use utilities::remove_empty_blocks;
