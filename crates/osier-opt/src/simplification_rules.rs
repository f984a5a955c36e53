//! Algebraic simplification rule table.
//!
//! A fixed, ordered table of equational rewrites over the builtin call
//! vocabulary. `find_first_match` scans the table in priority order and
//! returns the first rule whose matcher succeeds, so the output of a run
//! is reproducible for identical input.
//!
//! Matchers may look "through" a variable via the SSA value map, but only
//! down to literal constants: a tracked definition may mention variables
//! that are reassigned between definition and use, so structural rules
//! (`sub(x, x)`, `not(not(x))`, ...) compare and reuse raw operands only.
//!
//! Every rule strictly shrinks the expression, which is what guarantees
//! the simplifier's rewrite loop terminates.

use osier_ast::ast::{Expr, FunctionCall};

use crate::ssa_value_tracker::SsaValues;

/// Outcome of matching one rule against one expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub rule: &'static str,
    pub replacement: Expr,
    /// True when applying the rule discards a matched subexpression that is
    /// not a compile-time constant. The simplifier refuses such a rewrite
    /// unless the whole expression is movable.
    pub removes_non_constants: bool,
}

type Matcher = fn(&FunctionCall, &SsaValues) -> Option<(Expr, bool)>;

struct SimplificationRule {
    name: &'static str,
    matcher: Matcher,
}

static RULES: &[SimplificationRule] = &[
    SimplificationRule {
        name: "constant-fold",
        matcher: constant_fold,
    },
    SimplificationRule {
        name: "identity-element",
        matcher: identity_element,
    },
    SimplificationRule {
        name: "absorbing-element",
        matcher: absorbing_element,
    },
    SimplificationRule {
        name: "equal-operands",
        matcher: equal_operands,
    },
    SimplificationRule {
        name: "double-negation",
        matcher: double_negation,
    },
    SimplificationRule {
        name: "iszero-chain",
        matcher: iszero_chain,
    },
    SimplificationRule {
        name: "eq-with-zero",
        matcher: eq_with_zero,
    },
];

/// Return the highest-priority rule match for `expr`, if any.
pub fn find_first_match(expr: &Expr, ssa: &SsaValues) -> Option<Match> {
    let Expr::Call(call) = expr else {
        return None;
    };
    for rule in RULES {
        if let Some((replacement, removes_non_constants)) = (rule.matcher)(call, ssa) {
            return Some(Match {
                rule: rule.name,
                replacement,
                removes_non_constants,
            });
        }
    }
    None
}

/// Resolve an operand to a literal constant, following single-assignment
/// variables. Scoping forbids forward references, so the chain is acyclic.
pub fn resolve_literal(expr: &Expr, ssa: &SsaValues) -> Option<u64> {
    let mut current = expr;
    loop {
        match current {
            Expr::Literal(value) => return Some(*value),
            Expr::Identifier(name) => current = ssa.get(name)?,
            Expr::Call(_) => return None,
        }
    }
}

fn binary(call: &FunctionCall) -> Option<(&Expr, &Expr)> {
    match call.arguments.as_slice() {
        [a, b] => Some((a, b)),
        _ => None,
    }
}

fn discards_non_constant(discarded: &Expr, ssa: &SsaValues) -> bool {
    resolve_literal(discarded, ssa).is_none()
}

/// All operands constant: compute the call. Division and modulo by zero
/// yield zero; shifts of 64 bits or more yield zero.
fn constant_fold(call: &FunctionCall, ssa: &SsaValues) -> Option<(Expr, bool)> {
    let operands: Vec<u64> = call
        .arguments
        .iter()
        .map(|argument| resolve_literal(argument, ssa))
        .collect::<Option<_>>()?;
    let value = match (call.function.as_str(), operands.as_slice()) {
        ("add", [a, b]) => a.wrapping_add(*b),
        ("sub", [a, b]) => a.wrapping_sub(*b),
        ("mul", [a, b]) => a.wrapping_mul(*b),
        ("div", [a, b]) => a.checked_div(*b).unwrap_or(0),
        ("mod", [a, b]) => a.checked_rem(*b).unwrap_or(0),
        ("and", [a, b]) => a & b,
        ("or", [a, b]) => a | b,
        ("xor", [a, b]) => a ^ b,
        ("not", [a]) => !a,
        ("shl", [a, bits]) => if *bits < 64 { a << bits } else { 0 },
        ("shr", [a, bits]) => if *bits < 64 { a >> bits } else { 0 },
        ("iszero", [a]) => (*a == 0) as u64,
        ("eq", [a, b]) => (a == b) as u64,
        ("lt", [a, b]) => (a < b) as u64,
        ("gt", [a, b]) => (a > b) as u64,
        _ => return None,
    };
    Some((Expr::Literal(value), false))
}

/// `op(x, e)` or `op(e, x)` where `e` is the identity element of `op`:
/// keep `x`. Nothing is discarded but the identity constant.
fn identity_element(call: &FunctionCall, ssa: &SsaValues) -> Option<(Expr, bool)> {
    let (a, b) = binary(call)?;
    let left = resolve_literal(a, ssa);
    let right = resolve_literal(b, ssa);
    let kept = match call.function.as_str() {
        "add" | "or" | "xor" if right == Some(0) => a,
        "add" | "or" | "xor" if left == Some(0) => b,
        "sub" if right == Some(0) => a,
        "mul" | "div" if right == Some(1) => a,
        "mul" if left == Some(1) => b,
        "and" if right == Some(u64::MAX) => a,
        "and" if left == Some(u64::MAX) => b,
        "shl" | "shr" if right == Some(0) => a,
        _ => return None,
    };
    Some((kept.clone(), false))
}

/// `op(x, e)` where `e` absorbs: the result is a constant and `x` is
/// discarded, so the match carries the removal flag when `x` is not
/// itself constant.
fn absorbing_element(call: &FunctionCall, ssa: &SsaValues) -> Option<(Expr, bool)> {
    let (a, b) = binary(call)?;
    let left = resolve_literal(a, ssa);
    let right = resolve_literal(b, ssa);
    let (value, discarded) = match call.function.as_str() {
        "mul" | "and" if right == Some(0) => (0, a),
        "mul" | "and" if left == Some(0) => (0, b),
        "div" if right == Some(0) => (0, a),
        "div" | "mod" if left == Some(0) => (0, b),
        "mod" if right == Some(0) || right == Some(1) => (0, a),
        _ => return None,
    };
    Some((Expr::Literal(value), discards_non_constant(discarded, ssa)))
}

/// `op(x, x)` for syntactically identical operands. One copy of `x` is
/// discarded; the movability gate keeps this away from expressions that
/// must evaluate twice for their effects.
fn equal_operands(call: &FunctionCall, ssa: &SsaValues) -> Option<(Expr, bool)> {
    let (a, b) = binary(call)?;
    if a != b {
        return None;
    }
    let replacement = match call.function.as_str() {
        "sub" | "xor" | "lt" | "gt" => Expr::Literal(0),
        "eq" => Expr::Literal(1),
        "and" | "or" => a.clone(),
        _ => return None,
    };
    Some((replacement, discards_non_constant(b, ssa)))
}

/// `not(not(x))` -> `x`, on raw operands.
fn double_negation(call: &FunctionCall, _ssa: &SsaValues) -> Option<(Expr, bool)> {
    if call.function != "not" {
        return None;
    }
    let [Expr::Call(inner)] = call.arguments.as_slice() else {
        return None;
    };
    if inner.function != "not" {
        return None;
    }
    Some((inner.arguments[0].clone(), false))
}

/// `iszero(iszero(iszero(x)))` -> `iszero(x)`. The double application is
/// left alone: it normalizes a value to 0/1, which `x` alone does not.
fn iszero_chain(call: &FunctionCall, _ssa: &SsaValues) -> Option<(Expr, bool)> {
    let mut current = call;
    for _ in 0..2 {
        if current.function != "iszero" {
            return None;
        }
        let [Expr::Call(inner)] = current.arguments.as_slice() else {
            return None;
        };
        current = inner;
    }
    if current.function != "iszero" {
        return None;
    }
    Some((Expr::Call(current.clone()), false))
}

/// `eq(x, 0)` / `eq(0, x)` -> `iszero(x)`.
fn eq_with_zero(call: &FunctionCall, ssa: &SsaValues) -> Option<(Expr, bool)> {
    if call.function != "eq" {
        return None;
    }
    let (a, b) = binary(call)?;
    let kept = if resolve_literal(b, ssa) == Some(0) {
        a
    } else if resolve_literal(a, ssa) == Some(0) {
        b
    } else {
        return None;
    };
    Some((
        Expr::Call(FunctionCall {
            function: "iszero".to_string(),
            arguments: vec![kept.clone()],
        }),
        false,
    ))
}
