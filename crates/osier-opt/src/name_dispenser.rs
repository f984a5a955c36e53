//! Fresh name generation.

use std::collections::BTreeSet;

use osier_ast::ast::{Block, Identifier};

use crate::name_collector::NameCollector;

/// Issues identifiers distinct from every name already used in the program
/// and from each other. One dispenser serves one optimisation run.
#[derive(Debug, Default)]
pub struct NameDispenser {
    used: BTreeSet<Identifier>,
    counter: usize,
}

impl NameDispenser {
    /// Seed the dispenser with every name occurring in `block`.
    pub fn for_block(block: &Block) -> Self {
        NameDispenser {
            used: NameCollector::collect(block),
            counter: 0,
        }
    }

    /// Return a name not used anywhere and reserve it. Two calls never
    /// return the same name.
    pub fn fresh(&mut self, prefix: &str) -> Identifier {
        loop {
            self.counter += 1;
            let candidate = format!("{prefix}_{}", self.counter);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
