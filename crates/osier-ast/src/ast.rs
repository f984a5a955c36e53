use serde::{Deserialize, Serialize};

pub type Identifier = String;

/// Ordered sequence of statements; introduces a lexical scope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statement {
    Block(Block),
    VariableDeclaration(VariableDeclaration),
    Assignment(Assignment),
    Expression(Expr),
    If(If),
    Switch(Switch),
    ForLoop(ForLoop),
    FunctionDefinition(FunctionDefinition),
    Break,
    Continue,
    Leave,
}

/// `let a, b := value` — declares fresh variables, optionally initialized.
/// Variables declared without a value start out as zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub names: Vec<Identifier>,
    pub value: Option<Expr>,
}

/// `a, b := value` — assigns to previously declared variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub names: Vec<Identifier>,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct If {
    pub condition: Expr,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Switch {
    pub expression: Expr,
    pub cases: Vec<SwitchCase>,
    pub default: Option<Block>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwitchCase {
    pub value: u64,
    pub body: Block,
}

/// `for pre condition post body` — the scope opened by `pre` extends
/// over the condition, `post` and `body`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForLoop {
    pub pre: Block,
    pub condition: Expr,
    pub post: Block,
    pub body: Block,
}

/// Function bodies are isolated scopes: they see their parameters,
/// return variables and other function names, but no outer variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: Identifier,
    pub parameters: Vec<Identifier>,
    pub returns: Vec<Identifier>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    Literal(u64),
    Identifier(Identifier),
    Call(FunctionCall),
}

/// Call of a builtin or user-defined function. Arguments are evaluated
/// left to right.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionCall {
    pub function: Identifier,
    pub arguments: Vec<Expr>,
}

impl Expr {
    /// Literals and identifiers are atomic; calls are not.
    pub fn is_atomic(&self) -> bool {
        matches!(self, Expr::Literal(_) | Expr::Identifier(_))
    }

    pub fn as_literal(&self) -> Option<u64> {
        match self {
            Expr::Literal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Expr::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

impl Block {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
