//! Builtin function metadata.
//!
//! The optimiser has no type or alias information; the only semantic facts
//! it may rely on come from this per-dialect table. Call targets that the
//! dialect does not know are treated as user-defined functions: assumed to
//! have side effects and to be unmovable.

use std::collections::BTreeMap;

use crate::ast::Identifier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub parameters: usize,
    pub returns: usize,
    /// Evaluating the call at a different program point does not change
    /// observable behavior: no side effect, deterministic result.
    pub movable: bool,
    /// The call writes observable state (memory, storage, logs, ...).
    pub side_effects: bool,
}

/// Source of builtin metadata, queried by call target name.
pub trait Dialect {
    fn builtin(&self, name: &str) -> Option<&BuiltinFunction>;

    fn is_movable_builtin(&self, name: &str) -> bool {
        self.builtin(name).is_some_and(|b| b.movable)
    }

    fn has_side_effects(&self, name: &str) -> bool {
        self.builtin(name).is_none_or(|b| b.side_effects)
    }
}

const fn pure(name: &'static str, parameters: usize) -> BuiltinFunction {
    BuiltinFunction {
        name,
        parameters,
        returns: 1,
        movable: true,
        side_effects: false,
    }
}

const CORE_BUILTINS: &[BuiltinFunction] = &[
    pure("add", 2),
    pure("sub", 2),
    pure("mul", 2),
    pure("div", 2),
    pure("mod", 2),
    pure("and", 2),
    pure("or", 2),
    pure("xor", 2),
    pure("not", 1),
    pure("shl", 2),
    pure("shr", 2),
    pure("iszero", 1),
    pure("eq", 2),
    pure("lt", 2),
    pure("gt", 2),
    // Input data is immutable for the whole run, so reads of it move freely.
    pure("calldataload", 1),
    pure("caller", 0),
    // Memory and storage reads have no side effect but depend on program
    // point; they must not move.
    BuiltinFunction {
        name: "mload",
        parameters: 1,
        returns: 1,
        movable: false,
        side_effects: false,
    },
    BuiltinFunction {
        name: "sload",
        parameters: 1,
        returns: 1,
        movable: false,
        side_effects: false,
    },
    BuiltinFunction {
        name: "gas",
        parameters: 0,
        returns: 1,
        movable: false,
        side_effects: false,
    },
    BuiltinFunction {
        name: "mstore",
        parameters: 2,
        returns: 0,
        movable: false,
        side_effects: true,
    },
    BuiltinFunction {
        name: "sstore",
        parameters: 2,
        returns: 0,
        movable: false,
        side_effects: true,
    },
];

/// The default builtin vocabulary: wrapping 64-bit arithmetic, comparisons
/// and bitwise operations, plus memory/storage/input accessors.
#[derive(Debug)]
pub struct CoreDialect {
    builtins: BTreeMap<Identifier, BuiltinFunction>,
}

impl CoreDialect {
    pub fn new() -> Self {
        CoreDialect {
            builtins: CORE_BUILTINS
                .iter()
                .map(|b| (b.name.to_string(), *b))
                .collect(),
        }
    }
}

impl Default for CoreDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for CoreDialect {
    fn builtin(&self, name: &str) -> Option<&BuiltinFunction> {
        self.builtins.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_movable() {
        let dialect = CoreDialect::new();
        assert!(dialect.is_movable_builtin("add"));
        assert!(!dialect.has_side_effects("add"));
    }

    #[test]
    fn memory_reads_do_not_move() {
        let dialect = CoreDialect::new();
        assert!(!dialect.is_movable_builtin("mload"));
        assert!(!dialect.has_side_effects("mload"));
    }

    #[test]
    fn unknown_targets_are_impure() {
        let dialect = CoreDialect::new();
        assert!(!dialect.is_movable_builtin("my_function"));
        assert!(dialect.has_side_effects("my_function"));
    }
}
