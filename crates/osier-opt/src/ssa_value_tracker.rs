//! Single-static-assignment value tracking.
//!
//! One forward traversal maps every variable with exactly one
//! unconditional definition to the expression of that definition. The map
//! is a snapshot of the tree at build time; it is stale after any mutation
//! and must be rebuilt before the next use.

use std::collections::BTreeMap;

use osier_ast::ast::{Block, Expr, Identifier, Statement};

/// Variable name to its single defining expression (cloned snapshot).
pub type SsaValues = BTreeMap<Identifier, Expr>;

#[derive(Debug, Clone)]
enum State {
    /// Declared without initializer; may still be promoted by a single
    /// assignment at the same control depth, unless read first.
    Pending { depth: usize, referenced: bool },
    Tracked(Expr),
    Poisoned,
}

/// Builds the SSA value map.
///
/// A variable qualifies iff it has exactly one defining site and that site
/// executes exactly once on every path through its scope: a declaration
/// initializer always does; an assignment does only when it sits at the
/// same control depth as a value-less declaration and no read precedes it.
/// Any second definition, or a definition under `if`/`switch`/`for`,
/// disqualifies the variable.
#[derive(Debug, Default)]
pub struct SsaValueTracker {
    states: BTreeMap<Identifier, State>,
    depth: usize,
}

impl SsaValueTracker {
    pub fn build(block: &Block) -> SsaValues {
        let mut tracker = SsaValueTracker::default();
        tracker.block(block);
        tracker
            .states
            .into_iter()
            .filter_map(|(name, state)| match state {
                State::Tracked(expr) => Some((name, expr)),
                _ => None,
            })
            .collect()
    }

    fn block(&mut self, block: &Block) {
        for statement in &block.statements {
            self.statement(statement);
        }
    }

    fn conditional(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Block(block) => self.block(block),
            Statement::VariableDeclaration(decl) => {
                if let Some(value) = &decl.value {
                    self.expr(value);
                }
                for name in &decl.names {
                    let state = match (&decl.value, decl.names.len()) {
                        (Some(value), 1) => State::Tracked(value.clone()),
                        (None, _) => State::Pending {
                            depth: self.depth,
                            referenced: false,
                        },
                        // Multi-variable declarations have no per-variable
                        // expression to track.
                        (Some(_), _) => State::Poisoned,
                    };
                    // A name seen before (shadowing) is never tracked.
                    self.states
                        .entry(name.clone())
                        .and_modify(|s| *s = State::Poisoned)
                        .or_insert(state);
                }
            }
            Statement::Assignment(assignment) => {
                self.expr(&assignment.value);
                for name in &assignment.names {
                    let promoted = assignment.names.len() == 1
                        && matches!(
                            self.states.get(name),
                            Some(State::Pending { depth, referenced })
                                if *depth == self.depth && !*referenced
                        );
                    let state = if promoted {
                        State::Tracked(assignment.value.clone())
                    } else {
                        State::Poisoned
                    };
                    self.states.insert(name.clone(), state);
                }
            }
            Statement::Expression(expr) => self.expr(expr),
            Statement::If(if_stmt) => {
                self.expr(&if_stmt.condition);
                self.conditional(|t| t.block(&if_stmt.body));
            }
            Statement::Switch(switch) => {
                self.expr(&switch.expression);
                self.conditional(|t| {
                    for case in &switch.cases {
                        t.block(&case.body);
                    }
                    if let Some(default) = &switch.default {
                        t.block(default);
                    }
                });
            }
            Statement::ForLoop(for_loop) => {
                self.block(&for_loop.pre);
                self.conditional(|t| {
                    t.expr(&for_loop.condition);
                    t.block(&for_loop.body);
                    t.block(&for_loop.post);
                });
            }
            Statement::FunctionDefinition(function) => {
                // Parameters and returns are definition targets of unknown
                // multiplicity.
                for name in function.parameters.iter().chain(&function.returns) {
                    self.states.insert(name.clone(), State::Poisoned);
                }
                self.block(&function.body);
            }
            Statement::Break | Statement::Continue | Statement::Leave => {}
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(name) => {
                if let Some(State::Pending { referenced, .. }) = self.states.get_mut(name) {
                    *referenced = true;
                }
            }
            Expr::Call(call) => {
                for argument in &call.arguments {
                    self.expr(argument);
                }
            }
            Expr::Literal(_) => {}
        }
    }
}
